//! Registration and resolution
//!
//! A [`Registry`] collects requirements and provisions from any number of
//! independent modules, then wires them together in one
//! [`Registry::resolve_all`] pass:
//!
//! 1. Declaration: modules call `require` and the `provide*` family in any
//!    order. Nothing is checked yet; every call remembers its call site.
//! 2. Resolution: the whole store is validated, every violation is
//!    collected, and only when there are none are all slots written.
//!
//! ```
//! use std::collections::HashMap;
//! use tether_domain::{MapSlot, Registry};
//!
//! let buckets: MapSlot<String, u32> = MapSlot::new();
//! let mut registry = Registry::new();
//!
//! // interface module
//! registry.require(&buckets);
//! registry.provide(&buckets, HashMap::new());
//! // extensions
//! registry.provide_key_value(&buckets, "users".to_string(), 16);
//! registry.provide_key_value(&buckets, "orders".to_string(), 64);
//!
//! registry.resolve_all().unwrap();
//! assert_eq!(buckets.get().unwrap()["orders"], 64);
//! ```

mod errors;
mod policy;
mod resolve;
mod store;

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::candidate::Candidate;
use crate::site::Site;
use crate::slot::{AsTarget, Kind, MapSlot, MultiMapSlot, SliceSlot, Slot, TargetRef};

pub use errors::{ErrorKind, ResolveError, ResolveErrors};
pub use policy::{ResolvePolicy, UnusedScope};
pub use store::StoreStats;

use store::Store;

/// Requirement and provision store plus the resolution engine
#[derive(Default)]
pub struct Registry {
    store: Store,
    policy: ResolvePolicy,
    resolved_at: Option<Site>,
    /// Slots written by the last successful resolution
    touched: Vec<TargetRef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ResolvePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ResolvePolicy) {
        self.policy = policy;
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    /// Where the successful resolution was requested
    pub fn resolved_at(&self) -> Option<&Site> {
        self.resolved_at.as_ref()
    }

    /// Declarations stamped with an explicit owning module
    pub fn module(&mut self, name: &'static str) -> ModuleScope<'_> {
        ModuleScope {
            registry: self,
            module: name,
        }
    }

    /// Declare that `target` must be populated by resolution
    #[track_caller]
    pub fn require<T: AsTarget + ?Sized>(&mut self, target: &T) {
        self.require_at(Site::caller(), target.target_ref());
    }

    /// Provide the whole value of a slot
    #[track_caller]
    pub fn provide<K: Kind>(&mut self, slot: &Slot<K>, value: K::Value) {
        self.provide_candidate_at(Site::caller(), slot.target_ref(), Candidate::single(value));
    }

    /// Provide one entry of a map
    #[track_caller]
    pub fn provide_key_value<K, V>(&mut self, slot: &MapSlot<K, V>, key: K, value: V)
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.provide_entry_at(
            Site::caller(),
            slot.target_ref(),
            Candidate::single(key),
            Candidate::single(value),
        );
    }

    /// Append one item to the sequence stored under `key`
    #[track_caller]
    pub fn provide_key_item<K, E>(&mut self, slot: &MultiMapSlot<K, E>, key: K, item: E)
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        self.provide_entry_at(
            Site::caller(),
            slot.target_ref(),
            Candidate::single(key),
            Candidate::single(item),
        );
    }

    /// Append several items to the sequence stored under `key`
    #[track_caller]
    pub fn provide_key_items<K, E>(&mut self, slot: &MultiMapSlot<K, E>, key: K, items: Vec<E>)
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        self.provide_entry_at(
            Site::caller(),
            slot.target_ref(),
            Candidate::single(key),
            Candidate::batch(items),
        );
    }

    #[track_caller]
    pub fn provide_slice_element<E>(&mut self, slot: &SliceSlot<E>, element: E)
    where
        E: Clone + Send + Sync + 'static,
    {
        self.provide_element_at(Site::caller(), slot.target_ref(), Candidate::single(element));
    }

    /// Splice several elements, keeping their order
    #[track_caller]
    pub fn provide_slice_elements<E>(&mut self, slot: &SliceSlot<E>, elements: Vec<E>)
    where
        E: Clone + Send + Sync + 'static,
    {
        self.provide_element_at(Site::caller(), slot.target_ref(), Candidate::batch(elements));
    }

    /// Provide a whole value whose type is only checked at resolution
    #[track_caller]
    pub fn provide_candidate<T: AsTarget + ?Sized>(&mut self, target: &T, candidate: Candidate) {
        self.provide_candidate_at(Site::caller(), target.target_ref(), candidate);
    }

    #[track_caller]
    pub fn provide_key_value_candidate<T: AsTarget + ?Sized>(
        &mut self,
        target: &T,
        key: Candidate,
        value: Candidate,
    ) {
        self.provide_entry_at(Site::caller(), target.target_ref(), key, value);
    }

    #[track_caller]
    pub fn provide_slice_candidate<T: AsTarget + ?Sized>(
        &mut self,
        target: &T,
        candidate: Candidate,
    ) {
        self.provide_element_at(Site::caller(), target.target_ref(), candidate);
    }

    pub(crate) fn require_at(&mut self, site: Site, target: TargetRef) {
        debug!(target_id = %target.id(), ty = target.type_name(), site = %site, "require");
        self.store.require(target, site);
    }

    pub(crate) fn provide_candidate_at(
        &mut self,
        site: Site,
        target: TargetRef,
        candidate: Candidate,
    ) {
        debug!(target_id = %target.id(), ty = candidate.type_name(), site = %site, "provide");
        self.store.provide_value(target, site, candidate);
    }

    pub(crate) fn provide_entry_at(
        &mut self,
        site: Site,
        target: TargetRef,
        key: Candidate,
        value: Candidate,
    ) {
        debug!(target_id = %target.id(), ty = value.type_name(), site = %site, "provide entry");
        self.store.provide_entry(target, site, key, value);
    }

    pub(crate) fn provide_element_at(
        &mut self,
        site: Site,
        target: TargetRef,
        candidate: Candidate,
    ) {
        debug!(
            target_id = %target.id(),
            ty = candidate.type_name(),
            site = %site,
            "provide element"
        );
        self.store.provide_element(target, site, candidate);
    }

    /// Forget every declaration and restore every slot this registry wrote
    ///
    /// Slots go back to the value they were created with. Calling this on
    /// an empty registry does nothing.
    pub fn reset(&mut self) {
        let restored = self.touched.len();
        for target in self.touched.drain(..) {
            target.restore();
        }
        self.store.clear();
        self.resolved_at = None;
        debug!(restored, "registry reset");
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("stats", &self.stats())
            .field("policy", &self.policy)
            .field("resolved_at", &self.resolved_at)
            .finish()
    }
}

/// Registry view that stamps every declaration with one module name
///
/// Used where the source file does not identify the owning module, e.g.
/// several logical modules living in one file, or declarations generated
/// by a macro.
pub struct ModuleScope<'a> {
    registry: &'a mut Registry,
    module: &'static str,
}

impl ModuleScope<'_> {
    pub fn name(&self) -> &'static str {
        self.module
    }

    #[track_caller]
    fn site(&self) -> Site {
        Site::caller_in(self.module)
    }

    #[track_caller]
    pub fn require<T: AsTarget + ?Sized>(&mut self, target: &T) {
        let site = self.site();
        self.registry.require_at(site, target.target_ref());
    }

    #[track_caller]
    pub fn provide<K: Kind>(&mut self, slot: &Slot<K>, value: K::Value) {
        let site = self.site();
        self.registry
            .provide_candidate_at(site, slot.target_ref(), Candidate::single(value));
    }

    #[track_caller]
    pub fn provide_key_value<K, V>(&mut self, slot: &MapSlot<K, V>, key: K, value: V)
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let site = self.site();
        self.registry.provide_entry_at(
            site,
            slot.target_ref(),
            Candidate::single(key),
            Candidate::single(value),
        );
    }

    #[track_caller]
    pub fn provide_key_item<K, E>(&mut self, slot: &MultiMapSlot<K, E>, key: K, item: E)
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let site = self.site();
        self.registry.provide_entry_at(
            site,
            slot.target_ref(),
            Candidate::single(key),
            Candidate::single(item),
        );
    }

    #[track_caller]
    pub fn provide_key_items<K, E>(&mut self, slot: &MultiMapSlot<K, E>, key: K, items: Vec<E>)
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let site = self.site();
        self.registry.provide_entry_at(
            site,
            slot.target_ref(),
            Candidate::single(key),
            Candidate::batch(items),
        );
    }

    #[track_caller]
    pub fn provide_slice_element<E>(&mut self, slot: &SliceSlot<E>, element: E)
    where
        E: Clone + Send + Sync + 'static,
    {
        let site = self.site();
        self.registry
            .provide_element_at(site, slot.target_ref(), Candidate::single(element));
    }

    #[track_caller]
    pub fn provide_slice_elements<E>(&mut self, slot: &SliceSlot<E>, elements: Vec<E>)
    where
        E: Clone + Send + Sync + 'static,
    {
        let site = self.site();
        self.registry
            .provide_element_at(site, slot.target_ref(), Candidate::batch(elements));
    }

    #[track_caller]
    pub fn provide_candidate<T: AsTarget + ?Sized>(&mut self, target: &T, candidate: Candidate) {
        let site = self.site();
        self.registry
            .provide_candidate_at(site, target.target_ref(), candidate);
    }
}
