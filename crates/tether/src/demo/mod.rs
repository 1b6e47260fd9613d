//! Key-value store wired through link-time declarations
//!
//! ```text
//! ikvdb     interface: PUT, GET, BUCKETS          (declares nothing)
//! kvdb      provides PUT, GET, base BUCKETS; requires BUCKETS
//! recorder  requires PUT; adds bucket "recorder"; adds a service
//! report    requires GET
//! ```
//!
//! None of these modules reference each other's declarations; they meet
//! only through the slots in [`ikvdb`].

pub mod ikvdb;
pub mod kvdb;
pub mod recorder;

use tether_domain::declare::{DECLARATIONS, Declaration};
use tether_domain::error::Result;
use tether_domain::ModuleScope;
use tether_services::ServiceContext;

use self::ikvdb::{BucketDef, GET};

#[linkme::distributed_slice(DECLARATIONS)]
static REPORT: Declaration = Declaration {
    module: "demo::report",
    description: "reads back what the recorder stored",
    declare: declare_report,
};

fn declare_report(scope: &mut ModuleScope<'_>) {
    scope.require(&*GET);
}

/// Keys the recorder writes, paired with their stored values
pub fn report(ctx: &ServiceContext) -> Result<Vec<(&'static str, Option<String>)>> {
    let get = ikvdb::get()?;
    let bucket = BucketDef::new(recorder::BUCKET);
    recorder::KEYS
        .iter()
        .map(|&key| Ok((key, get(ctx, &bucket, key)?)))
        .collect()
}
