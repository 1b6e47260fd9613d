//! Key-value store interface

use std::sync::{Arc, LazyLock};

use tether_domain::error::Result;
use tether_domain::{FnSlot, MapSlot};
use tether_services::ServiceContext;

/// Named group of keys
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BucketDef {
    pub key: String,
}

impl BucketDef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Save `value` under `key` in `bucket`
pub type Put = dyn Fn(&ServiceContext, &BucketDef, &str, String) -> Result<()> + Send + Sync;

/// Value stored under `key` in `bucket`
pub type Get = dyn Fn(&ServiceContext, &BucketDef, &str) -> Result<Option<String>> + Send + Sync;

pub static PUT: LazyLock<FnSlot<Put>> = LazyLock::new(FnSlot::new);
pub static GET: LazyLock<FnSlot<Get>> = LazyLock::new(FnSlot::new);

/// Buckets the store must serve, by key; users add theirs
pub static BUCKETS: LazyLock<MapSlot<String, BucketDef>> = LazyLock::new(MapSlot::new);

/// Resolved [`PUT`]
pub fn put() -> Result<Arc<Put>> {
    PUT.resolved()
}

/// Resolved [`GET`]
pub fn get() -> Result<Arc<Get>> {
    GET.resolved()
}
