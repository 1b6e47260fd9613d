//! Process-wide registry
//!
//! Free functions over one lazily created [`Registry`], for programs that
//! prefer a single implicit registration point. Sites are captured before
//! the lock is taken, so they still point at the caller.

use std::fmt;
use std::hash::Hash;
use std::sync::LazyLock;

use parking_lot::Mutex;

use crate::candidate::Candidate;
use crate::registry::{Registry, ResolveErrors};
use crate::site::Site;
use crate::slot::{AsTarget, Kind, MapSlot, MultiMapSlot, SliceSlot, Slot};

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::new()));

/// Run `f` with exclusive access to the process-wide registry
pub fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut REGISTRY.lock())
}

#[track_caller]
pub fn require<T: AsTarget + ?Sized>(target: &T) {
    let site = Site::caller();
    REGISTRY.lock().require_at(site, target.target_ref());
}

#[track_caller]
pub fn provide<K: Kind>(slot: &Slot<K>, value: K::Value) {
    let site = Site::caller();
    REGISTRY
        .lock()
        .provide_candidate_at(site, slot.target_ref(), Candidate::single(value));
}

#[track_caller]
pub fn provide_key_value<K, V>(slot: &MapSlot<K, V>, key: K, value: V)
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let site = Site::caller();
    REGISTRY.lock().provide_entry_at(
        site,
        slot.target_ref(),
        Candidate::single(key),
        Candidate::single(value),
    );
}

#[track_caller]
pub fn provide_key_item<K, E>(slot: &MultiMapSlot<K, E>, key: K, item: E)
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let site = Site::caller();
    REGISTRY.lock().provide_entry_at(
        site,
        slot.target_ref(),
        Candidate::single(key),
        Candidate::single(item),
    );
}

#[track_caller]
pub fn provide_key_items<K, E>(slot: &MultiMapSlot<K, E>, key: K, items: Vec<E>)
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let site = Site::caller();
    REGISTRY.lock().provide_entry_at(
        site,
        slot.target_ref(),
        Candidate::single(key),
        Candidate::batch(items),
    );
}

#[track_caller]
pub fn provide_slice_element<E>(slot: &SliceSlot<E>, element: E)
where
    E: Clone + Send + Sync + 'static,
{
    let site = Site::caller();
    REGISTRY
        .lock()
        .provide_element_at(site, slot.target_ref(), Candidate::single(element));
}

#[track_caller]
pub fn provide_slice_elements<E>(slot: &SliceSlot<E>, elements: Vec<E>)
where
    E: Clone + Send + Sync + 'static,
{
    let site = Site::caller();
    REGISTRY
        .lock()
        .provide_element_at(site, slot.target_ref(), Candidate::batch(elements));
}

#[track_caller]
pub fn resolve_all() -> Result<(), ResolveErrors> {
    let site = Site::caller();
    REGISTRY.lock().resolve_at(site)
}

pub fn reset() {
    REGISTRY.lock().reset();
}
