//! Service that records who started it and when

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tether_domain::declare::{DECLARATIONS, Declaration};
use tether_domain::error::Result;
use tether_domain::ModuleScope;
use tether_services::{SERVICES, Service, ServiceContext, async_trait};
use tracing::{debug, info};

use super::ikvdb::{self, BUCKETS, BucketDef, PUT};

/// Bucket the recorder writes to
pub const BUCKET: &str = "recorder";

/// Keys the recorder writes
pub const KEYS: [&str; 3] = ["startedBy", "startedTime", "stoppedTime"];

/// Context value naming the user who starts the services
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserName(pub String);

#[linkme::distributed_slice(DECLARATIONS)]
static RECORDER: Declaration = Declaration {
    module: "demo::recorder",
    description: "records service start and stop in the store",
    declare: declare_recorder,
};

fn declare_recorder(scope: &mut ModuleScope<'_>) {
    scope.require(&*PUT);
    scope.provide_key_value(&*BUCKETS, BUCKET.to_string(), BucketDef::new(BUCKET));
    scope.provide_slice_element(&*SERVICES, Arc::new(Recorder) as Arc<dyn Service>);
}

pub struct Recorder;

fn now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl Service for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn start(&self, ctx: ServiceContext) -> Result<ServiceContext> {
        let put = ikvdb::put()?;
        let bucket = BucketDef::new(BUCKET);
        let user = ctx
            .value::<UserName>()
            .map_or_else(|| "anonymous".to_string(), |user| user.0.clone());

        put(&ctx, &bucket, "startedTime", now())?;
        put(&ctx, &bucket, "startedBy", user.clone())?;
        info!(user = %user, "recorder started");
        Ok(ctx)
    }

    async fn stop(&self, ctx: &ServiceContext) {
        let bucket = BucketDef::new(BUCKET);
        let recorded = ikvdb::put().and_then(|put| put(ctx, &bucket, "stoppedTime", now()));
        if let Err(error) = recorded {
            debug!(error = %error, "recorder could not record its stop");
        }
    }
}
