//! Type-erased provided values
//!
//! A [`Candidate`] is what a provision offers: either a single value or a
//! batch (a `Vec` of items to splice into a sequence). Candidates are only
//! ever read during resolution; assembling a slot value clones out of them,
//! so a failed resolution leaves every declaration intact.

use std::any::Any;
use std::fmt;

use crate::check::TypeDesc;

/// Whether a candidate is one value or a batch of items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Single(TypeDesc),
    Batch { sequence: TypeDesc, element: TypeDesc },
}

/// A provided value with its runtime type
pub struct Candidate {
    value: Box<dyn Any + Send + Sync>,
    form: Form,
}

impl Candidate {
    /// Offer a single value
    pub fn single<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            form: Form::Single(TypeDesc::of::<T>()),
        }
    }

    /// Offer a batch of items to be spliced into a sequence
    pub fn batch<T: Send + Sync + 'static>(items: Vec<T>) -> Self {
        Self {
            value: Box::new(items),
            form: Form::Batch {
                sequence: TypeDesc::of::<Vec<T>>(),
                element: TypeDesc::of::<T>(),
            },
        }
    }

    pub fn form(&self) -> Form {
        self.form
    }

    /// Runtime type of the held value (`Vec<T>` for batches)
    pub fn type_desc(&self) -> TypeDesc {
        match self.form {
            Form::Single(ty) => ty,
            Form::Batch { sequence, .. } => sequence,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_desc().name()
    }

    /// Borrow the held value as `T`
    pub fn peek<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Clone the held value out as `T`
    pub fn cloned<T: Clone + 'static>(&self) -> Option<T> {
        self.peek::<T>().cloned()
    }

    /// Clone the held value out as a list of items
    ///
    /// A single `E` yields one item, a batch of `E` yields all of them.
    pub fn items<E: Clone + 'static>(&self) -> Option<Vec<E>> {
        match self.form {
            Form::Single(_) => self.cloned::<E>().map(|item| vec![item]),
            Form::Batch { .. } => self.cloned::<Vec<E>>(),
        }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("form", &self.form).finish()
    }
}
