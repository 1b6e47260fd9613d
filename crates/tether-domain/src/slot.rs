//! Typed slots
//!
//! A [`Slot`] is the caller-owned location that requirements point at and
//! that resolution fills in. Slots are cheap handles: clones share the same
//! cell and the same [`SlotId`], and two slots created separately are never
//! confused even when they hold equal values.
//!
//! The slot kind is a typed capability token; it fixes what the slot holds
//! and therefore what can be provided for it:
//!
//! | Alias | Holds |
//! |-------|-------|
//! | [`FnSlot<F>`] | `Arc<F>`, e.g. `Arc<dyn Fn(i32) -> i32 + Send + Sync>` |
//! | [`MapSlot<K, V>`] | `HashMap<K, V>`, one value per key |
//! | [`MultiMapSlot<K, E>`] | `HashMap<K, Vec<E>>`, same-key values accumulate |
//! | [`SliceSlot<E>`] | `Vec<E>` |
//!
//! ```
//! use std::sync::Arc;
//! use tether_domain::{FnSlot, Registry};
//!
//! type Add = dyn Fn(i32, i32) -> i32 + Send + Sync;
//!
//! let add: FnSlot<Add> = FnSlot::new();
//! let implementation: Arc<Add> = Arc::new(|x, y| x + y);
//! let mut registry = Registry::new();
//! registry.require(&add);
//! registry.provide(&add, implementation);
//! registry.resolve_all().unwrap();
//!
//! assert_eq!((add.resolved().unwrap())(3, 2), 5);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockReadGuard};

use crate::candidate::Candidate;
use crate::check::{Shape, TypeDesc};
use crate::error::{Error, Result};

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

impl SlotId {
    fn next() -> Self {
        Self(NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A contribution to a container slot
#[derive(Debug, Clone, Copy)]
pub enum Part<'a> {
    Entry {
        key: &'a Candidate,
        value: &'a Candidate,
    },
    Element(&'a Candidate),
}

/// Slot kind: what a slot holds and how provisions build its value
pub trait Kind: 'static {
    type Value: Clone + Send + Sync + 'static;

    fn shape() -> Shape;

    /// Build the resolved value
    ///
    /// `base` is the whole-value provision if there is one; otherwise the
    /// slot's current value is the starting point. Returns `None` when a
    /// candidate does not hold the expected type.
    fn assemble(
        current: Option<&Self::Value>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<Self::Value>;

    fn same_key(_a: &Candidate, _b: &Candidate) -> bool {
        false
    }

    fn render_key(key: &Candidate) -> String {
        key.type_name().to_string()
    }
}

/// Single implementation of `F`, held as `Arc<F>`
pub struct Func<F: ?Sized>(PhantomData<fn() -> Box<F>>);

/// Map with one value per key
pub struct Map<K, V>(PhantomData<fn() -> (K, V)>);

/// Map whose values are sequences; same-key provisions append
pub struct MultiMap<K, E>(PhantomData<fn() -> (K, E)>);

/// Appendable sequence
pub struct Seq<E>(PhantomData<fn() -> E>);

pub type FnSlot<F> = Slot<Func<F>>;
pub type MapSlot<K, V> = Slot<Map<K, V>>;
pub type MultiMapSlot<K, E> = Slot<MultiMap<K, E>>;
pub type SliceSlot<E> = Slot<Seq<E>>;

impl<F: ?Sized + Send + Sync + 'static> Kind for Func<F> {
    type Value = Arc<F>;

    fn shape() -> Shape {
        Shape::Function {
            signature: TypeDesc::of::<Arc<F>>(),
        }
    }

    fn assemble(
        _current: Option<&Arc<F>>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<Arc<F>> {
        if !parts.is_empty() {
            return None;
        }
        base?.cloned::<Arc<F>>()
    }
}

impl<K, V> Kind for Map<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Value = HashMap<K, V>;

    fn shape() -> Shape {
        Shape::Map {
            map: TypeDesc::of::<HashMap<K, V>>(),
            key: TypeDesc::of::<K>(),
            value: TypeDesc::of::<V>(),
            item: None,
        }
    }

    fn assemble(
        current: Option<&HashMap<K, V>>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<HashMap<K, V>> {
        let mut map = start_from(current, base)?;
        for part in parts {
            let Part::Entry { key, value } = part else {
                return None;
            };
            map.insert(key.cloned::<K>()?, value.cloned::<V>()?);
        }
        Some(map)
    }

    fn same_key(a: &Candidate, b: &Candidate) -> bool {
        matches!((a.peek::<K>(), b.peek::<K>()), (Some(a), Some(b)) if a == b)
    }

    fn render_key(key: &Candidate) -> String {
        key.peek::<K>()
            .map_or_else(|| key.type_name().to_string(), |k| format!("{k:?}"))
    }
}

impl<K, E> Kind for MultiMap<K, E>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    type Value = HashMap<K, Vec<E>>;

    fn shape() -> Shape {
        Shape::Map {
            map: TypeDesc::of::<HashMap<K, Vec<E>>>(),
            key: TypeDesc::of::<K>(),
            value: TypeDesc::of::<Vec<E>>(),
            item: Some(TypeDesc::of::<E>()),
        }
    }

    fn assemble(
        current: Option<&HashMap<K, Vec<E>>>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<HashMap<K, Vec<E>>> {
        let mut map = start_from(current, base)?;
        for part in parts {
            let Part::Entry { key, value } = part else {
                return None;
            };
            map.entry(key.cloned::<K>()?)
                .or_default()
                .extend(value.items::<E>()?);
        }
        Some(map)
    }

    fn same_key(a: &Candidate, b: &Candidate) -> bool {
        matches!((a.peek::<K>(), b.peek::<K>()), (Some(a), Some(b)) if a == b)
    }

    fn render_key(key: &Candidate) -> String {
        key.peek::<K>()
            .map_or_else(|| key.type_name().to_string(), |k| format!("{k:?}"))
    }
}

impl<E: Clone + Send + Sync + 'static> Kind for Seq<E> {
    type Value = Vec<E>;

    fn shape() -> Shape {
        Shape::Slice {
            slice: TypeDesc::of::<Vec<E>>(),
            element: TypeDesc::of::<E>(),
        }
    }

    fn assemble(
        current: Option<&Vec<E>>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<Vec<E>> {
        let mut items = start_from(current, base)?;
        for part in parts {
            let Part::Element(candidate) = part else {
                return None;
            };
            items.extend(candidate.items::<E>()?);
        }
        Some(items)
    }
}

/// Base provision if present, else the current value, else empty
fn start_from<T: Clone + Default + 'static>(
    current: Option<&T>,
    base: Option<&Candidate>,
) -> Option<T> {
    match base {
        Some(candidate) => candidate.cloned::<T>(),
        None => Some(current.cloned().unwrap_or_default()),
    }
}

struct SlotCell<K: Kind> {
    id: SlotId,
    settable: bool,
    initial: Option<K::Value>,
    state: RwLock<Option<K::Value>>,
}

/// A caller-owned location awaiting a value
pub struct Slot<K: Kind> {
    cell: Arc<SlotCell<K>>,
}

impl<K: Kind> Slot<K> {
    /// An unset, settable slot
    pub fn new() -> Self {
        Self::build(true, None)
    }

    /// A settable slot that its owner already initialized
    ///
    /// Containers created this way accept contributions without a base
    /// provision; `reset` restores them to `value`.
    pub fn with_value(value: K::Value) -> Self {
        Self::build(true, Some(value))
    }

    /// An immutable slot the registry must never write
    pub fn fixed(value: Option<K::Value>) -> Self {
        Self::build(false, value)
    }

    fn build(settable: bool, initial: Option<K::Value>) -> Self {
        Self {
            cell: Arc::new(SlotCell {
                id: SlotId::next(),
                settable,
                state: RwLock::new(initial.clone()),
                initial,
            }),
        }
    }

    pub fn id(&self) -> SlotId {
        self.cell.id
    }

    pub fn is_settable(&self) -> bool {
        self.cell.settable
    }

    pub fn is_set(&self) -> bool {
        self.cell.state.read().is_some()
    }

    /// Clone of the current value
    pub fn get(&self) -> Option<K::Value> {
        self.cell.state.read().clone()
    }

    /// Current value, or an error naming the unresolved slot
    pub fn resolved(&self) -> Result<K::Value> {
        self.get().ok_or_else(|| Error::Unresolved {
            slot: self.id(),
            type_name: std::any::type_name::<K::Value>(),
        })
    }

    /// Borrow the current value without cloning it
    pub fn read(&self) -> RwLockReadGuard<'_, Option<K::Value>> {
        self.cell.state.read()
    }

    pub fn with<R>(&self, f: impl FnOnce(Option<&K::Value>) -> R) -> R {
        f(self.cell.state.read().as_ref())
    }
}

impl<K: Kind> Default for Slot<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kind> Clone for Slot<K> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<K: Kind> fmt::Debug for Slot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.cell.id)
            .field("type", &std::any::type_name::<K::Value>())
            .field("settable", &self.cell.settable)
            .field("set", &self.is_set())
            .finish()
    }
}

/// A staged assignment, applied only once every target has staged
pub trait Staged: Send {
    fn commit(self: Box<Self>);
}

/// Type-erased view of a slot used by the registry
pub trait Target: Send + Sync {
    fn id(&self) -> SlotId;
    fn type_name(&self) -> &'static str;
    fn shape(&self) -> Shape;
    fn is_settable(&self) -> bool;
    /// Whether the slot holds its zero value
    fn is_unset(&self) -> bool;
    fn same_key(&self, a: &Candidate, b: &Candidate) -> bool;
    fn render_key(&self, key: &Candidate) -> String;
    fn stage(
        self: Arc<Self>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<Box<dyn Staged>>;
    /// Put the slot back to the value it was created with
    fn restore(&self);
}

struct Pending<K: Kind> {
    cell: Arc<SlotCell<K>>,
    value: K::Value,
}

impl<K: Kind> Staged for Pending<K> {
    fn commit(self: Box<Self>) {
        *self.cell.state.write() = Some(self.value);
    }
}

impl<K: Kind> Target for SlotCell<K> {
    fn id(&self) -> SlotId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<K::Value>()
    }

    fn shape(&self) -> Shape {
        K::shape()
    }

    fn is_settable(&self) -> bool {
        self.settable
    }

    fn is_unset(&self) -> bool {
        self.state.read().is_none()
    }

    fn same_key(&self, a: &Candidate, b: &Candidate) -> bool {
        K::same_key(a, b)
    }

    fn render_key(&self, key: &Candidate) -> String {
        K::render_key(key)
    }

    fn stage(
        self: Arc<Self>,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<Box<dyn Staged>> {
        let value = {
            let current = self.state.read();
            K::assemble(current.as_ref(), base, parts)?
        };
        Some(Box::new(Pending { cell: self, value }))
    }

    fn restore(&self) {
        if self.settable {
            *self.state.write() = self.initial.clone();
        }
    }
}

/// Shared, type-erased reference to a slot
#[derive(Clone)]
pub struct TargetRef(Arc<dyn Target>);

impl TargetRef {
    pub fn id(&self) -> SlotId {
        self.0.id()
    }

    pub(crate) fn stage(
        &self,
        base: Option<&Candidate>,
        parts: &[Part<'_>],
    ) -> Option<Box<dyn Staged>> {
        Arc::clone(&self.0).stage(base, parts)
    }
}

impl std::ops::Deref for TargetRef {
    type Target = dyn Target;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRef")
            .field("id", &self.0.id())
            .field("type", &self.0.type_name())
            .finish()
    }
}

/// Anything that can be registered as a target
pub trait AsTarget {
    fn target_ref(&self) -> TargetRef;
}

impl<K: Kind> AsTarget for Slot<K> {
    fn target_ref(&self) -> TargetRef {
        TargetRef(Arc::clone(&self.cell) as Arc<dyn Target>)
    }
}

impl AsTarget for TargetRef {
    fn target_ref(&self) -> TargetRef {
        self.clone()
    }
}
