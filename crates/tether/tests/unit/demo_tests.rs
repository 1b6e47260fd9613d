//! End-to-end tests of the linked demo
//!
//! The demo lives in process-wide slots, so everything touching them runs
//! in one test.

use tether::cli::{check, demo};
use tether::demo::ikvdb::{self, BUCKETS, PUT};
use tether::demo::recorder::Recorder;
use tether::services::SERVICES;
use tether::{ResolvePolicy, Service, ServiceContext, TetherConfig};

#[tokio::test]
async fn test_demo_end_to_end() {
    let mut config = TetherConfig::default();

    let stats = check(&config).expect("linked declarations resolve");
    assert!(stats.targets >= 4);
    assert!(!PUT.is_set());

    config.resolution = ResolvePolicy::symbol_scoped().with_unused_containers(true);
    check(&config).expect("nothing linked is unused");

    config.resolution = ResolvePolicy::default();
    let report = demo(&config, "Peter").await.expect("demo runs");
    let value = |key: &str| {
        report
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, value)| value.clone())
    };
    assert_eq!(value("startedBy").as_deref(), Some("Peter"));
    assert!(value("startedTime").is_some_and(|secs| secs.parse::<u64>().is_ok()));
    assert_eq!(value("stoppedTime"), None);

    // everything is reset after the demo
    assert!(!PUT.is_set());
    assert!(!BUCKETS.is_set());
    assert!(!SERVICES.is_set());

    // stopping with the store unwired is logged, not fatal
    assert!(ikvdb::put().is_err());
    Recorder.stop(&ServiceContext::new()).await;
    assert!(!PUT.is_set());
}
