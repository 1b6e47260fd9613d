//! Type compatibility checks
//!
//! Slots describe what they accept with a [`Shape`]; provided values carry
//! a runtime [`TypeDesc`] inside their [`Candidate`]. The checker compares
//! the two. Type identity is `TypeId` identity, so a type alias and the
//! type it names are interchangeable.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::candidate::{Candidate, Form};

/// Runtime descriptor of a Rust type
#[derive(Clone, Copy)]
pub struct TypeDesc {
    id: TypeId,
    name: &'static str,
}

impl TypeDesc {
    /// Descriptor of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What a slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single implementation (`Arc<dyn Fn..>` or any `Arc<dyn Trait>`)
    Function { signature: TypeDesc },
    /// A keyed extension point
    Map {
        map: TypeDesc,
        key: TypeDesc,
        value: TypeDesc,
        /// Element type when values are sequences that accumulate
        item: Option<TypeDesc>,
    },
    /// An appendable extension point
    Slice { slice: TypeDesc, element: TypeDesc },
}

impl Shape {
    /// Type of the whole slot value
    pub fn whole(&self) -> TypeDesc {
        match self {
            Shape::Function { signature } => *signature,
            Shape::Map { map, .. } => *map,
            Shape::Slice { slice, .. } => *slice,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, Shape::Function { .. })
    }
}

/// Which part of a provision failed the check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Func,
    StorageImpl,
    StorageKey,
    StorageValue,
}

/// A failed compatibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incompatibility {
    pub mismatch: Mismatch,
    pub required: TypeDesc,
    pub offered: TypeDesc,
}

impl Incompatibility {
    fn new(mismatch: Mismatch, required: TypeDesc, offered: TypeDesc) -> Self {
        Self {
            mismatch,
            required,
            offered,
        }
    }
}

/// Check a whole-value provision against a slot
pub fn check_whole(shape: &Shape, candidate: &Candidate) -> Result<(), Incompatibility> {
    let required = shape.whole();
    let mismatch = if shape.is_container() {
        Mismatch::StorageImpl
    } else {
        Mismatch::Func
    };
    match candidate.form() {
        Form::Single(ty) if ty == required => Ok(()),
        _ => Err(Incompatibility::new(mismatch, required, candidate.type_desc())),
    }
}

/// Check a key-value provision against a slot
///
/// Key and value are checked independently; both failures are returned.
pub fn check_entry(shape: &Shape, key: &Candidate, value: &Candidate) -> Vec<Incompatibility> {
    let mut failures = Vec::new();
    match shape {
        Shape::Map {
            key: key_ty,
            value: value_ty,
            item,
            ..
        } => {
            if !matches!(key.form(), Form::Single(ty) if ty == *key_ty) {
                failures.push(Incompatibility::new(
                    Mismatch::StorageKey,
                    *key_ty,
                    key.type_desc(),
                ));
            }
            let accepted = match item {
                Some(item) => accepts_item(value, *item),
                None => matches!(value.form(), Form::Single(ty) if ty == *value_ty),
            };
            if !accepted {
                failures.push(Incompatibility::new(
                    Mismatch::StorageValue,
                    item.unwrap_or(*value_ty),
                    value.type_desc(),
                ));
            }
        }
        Shape::Slice { .. } => failures.push(Incompatibility::new(
            Mismatch::StorageValue,
            shape.whole(),
            value.type_desc(),
        )),
        Shape::Function { signature } => failures.push(Incompatibility::new(
            Mismatch::Func,
            *signature,
            value.type_desc(),
        )),
    }
    failures
}

/// Check a slice-element provision against a slot
pub fn check_element(shape: &Shape, candidate: &Candidate) -> Result<(), Incompatibility> {
    match shape {
        Shape::Slice { element, .. } if accepts_item(candidate, *element) => Ok(()),
        Shape::Slice { element, .. } => Err(Incompatibility::new(
            Mismatch::StorageValue,
            *element,
            candidate.type_desc(),
        )),
        Shape::Map { .. } => Err(Incompatibility::new(
            Mismatch::StorageValue,
            shape.whole(),
            candidate.type_desc(),
        )),
        Shape::Function { signature } => Err(Incompatibility::new(
            Mismatch::Func,
            *signature,
            candidate.type_desc(),
        )),
    }
}

/// A single item or a batch of items of the element type
fn accepts_item(candidate: &Candidate, item: TypeDesc) -> bool {
    match candidate.form() {
        Form::Single(ty) => ty == item,
        Form::Batch { element, .. } => element == item,
    }
}
