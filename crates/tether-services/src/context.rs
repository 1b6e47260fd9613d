//! Service context
//!
//! Passed through every service start. Each service may return a context
//! extended with its own values; the next service receives that one.
//! Values are keyed by type or by name and never mutated in place, so a
//! context handed out earlier keeps seeing what it saw.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

#[derive(Clone, PartialEq, Eq, Hash)]
enum Key {
    Type(TypeId),
    Name(String),
}

type Values = HashMap<Key, Arc<dyn Any + Send + Sync>>;

/// Cancellation plus an immutable value bag
#[derive(Clone, Default)]
pub struct ServiceContext {
    token: CancellationToken,
    values: Arc<Values>,
}

impl ServiceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context cancelled together with `token`
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            values: Arc::default(),
        }
    }

    /// A copy of this context that also carries `value`
    ///
    /// A previous value of the same type is shadowed.
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        self.extend(Key::Type(TypeId::of::<T>()), Arc::new(value))
    }

    /// Like [`with_value`](Self::with_value), keyed by `name` instead of type
    #[must_use]
    pub fn with_named_value<T: Any + Send + Sync>(
        &self,
        name: impl Into<String>,
        value: T,
    ) -> Self {
        self.extend(Key::Name(name.into()), Arc::new(value))
    }

    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.lookup(&Key::Type(TypeId::of::<T>()))
    }

    /// Value stored under `name`, if it has type `T`
    pub fn named_value<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        self.lookup(&Key::Name(name.to_string()))
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&Key::Type(TypeId::of::<T>()))
    }

    fn extend(&self, key: Key, value: Arc<dyn Any + Send + Sync>) -> Self {
        let mut values = Values::clone(&self.values);
        values.insert(key, value);
        Self {
            token: self.token.clone(),
            values: Arc::new(values),
        }
    }

    fn lookup<T: Any + Send + Sync>(&self, key: &Key) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    /// A context with the same values that can be cancelled on its own
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            values: Arc::clone(&self.values),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the context is cancelled
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("cancelled", &self.token.is_cancelled())
            .field("values", &self.values.len())
            .finish()
    }
}
