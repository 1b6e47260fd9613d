//! In-memory key-value store

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tether_domain::declare::{DECLARATIONS, Declaration};
use tether_domain::error::{Error, Result};
use tether_domain::ModuleScope;
use tether_services::ServiceContext;
use tracing::debug;

use super::ikvdb::{BUCKETS, BucketDef, GET, Get, PUT, Put};

type Store = HashMap<String, HashMap<String, String>>;

static STORE: LazyLock<RwLock<Store>> = LazyLock::new(RwLock::default);

#[linkme::distributed_slice(DECLARATIONS)]
static KVDB: Declaration = Declaration {
    module: "demo::kvdb",
    description: "in-memory key-value store",
    declare: declare_kvdb,
};

fn declare_kvdb(scope: &mut ModuleScope<'_>) {
    let put: Arc<Put> = Arc::new(put);
    let get: Arc<Get> = Arc::new(get);
    scope.provide(&*PUT, put);
    scope.provide(&*GET, get);
    scope.provide(&*BUCKETS, HashMap::new());
    scope.require(&*BUCKETS);
}

/// Bucket must be declared in [`BUCKETS`]
fn check_bucket(bucket: &BucketDef) -> Result<()> {
    let known = BUCKETS.with(|buckets| buckets.is_some_and(|b| b.contains_key(&bucket.key)));
    if known {
        Ok(())
    } else {
        Err(Error::service(format!("Bucket not found: {}", bucket.key)))
    }
}

fn put(_ctx: &ServiceContext, bucket: &BucketDef, key: &str, value: String) -> Result<()> {
    check_bucket(bucket)?;
    debug!(bucket = %bucket.key, key, "put");
    STORE
        .write()
        .entry(bucket.key.clone())
        .or_default()
        .insert(key.to_string(), value);
    Ok(())
}

fn get(_ctx: &ServiceContext, bucket: &BucketDef, key: &str) -> Result<Option<String>> {
    check_bucket(bucket)?;
    Ok(STORE
        .read()
        .get(&bucket.key)
        .and_then(|entries| entries.get(key).cloned()))
}

/// Drop every stored value
pub fn clear() {
    STORE.write().clear();
}
