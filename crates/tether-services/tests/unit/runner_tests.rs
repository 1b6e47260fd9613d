//! Unit tests for sequential start and reverse stop

use std::time::Duration;

use tether_services::{ServiceContext, ServiceError, runner};

use crate::support::{Behavior, TestService, as_services, entries, journal};

#[tokio::test]
async fn test_start_threads_context_through_services() {
    let log = journal();
    let services = vec![TestService::new("first", &log), TestService::new("second", &log)];

    let startup = runner::start(ServiceContext::new(), &as_services(&services), false).await;
    assert!(startup.is_ok());
    assert_eq!(startup.started.len(), 2);

    // second starts with what first returned
    let seen = services[1].seen().expect("second started");
    assert_eq!(seen.named_value::<String>("first").map(String::as_str), Some("first"));
    assert!(seen.named_value::<String>("second").is_none());

    for name in ["first", "second"] {
        assert_eq!(startup.ctx.named_value::<String>(name).map(String::as_str), Some(name));
    }
    assert!(services.iter().all(|service| service.state() == 1));
}

#[tokio::test]
async fn test_failed_start_stops_the_sequence() {
    let log = journal();
    let services = vec![
        TestService::new("first", &log),
        TestService::with_behavior("second", &log, Behavior::FailStart),
        TestService::new("third", &log),
    ];

    let startup = runner::start(ServiceContext::new(), &as_services(&services), true).await;
    let error = startup.error.expect("start must fail");

    assert!(matches!(error, ServiceError::Failed { .. }));
    assert_eq!(error.service(), Some("second"));
    let message = error.to_string();
    assert!(message.contains("second"));
    assert!(!message.contains("first"));

    assert_eq!(startup.started.len(), 1);
    assert_eq!(startup.started[0].name(), "first");
    assert_eq!(services[0].state(), 1);
    assert_eq!(services[1].state(), 0);
    assert!(services[2].seen().is_none());
}

#[tokio::test]
async fn test_panicking_start_is_captured() {
    let log = journal();
    let services = vec![
        TestService::new("first", &log),
        TestService::with_behavior("second", &log, Behavior::PanicStart),
    ];

    let startup = runner::start(ServiceContext::new(), &as_services(&services), false).await;
    match startup.error {
        Some(ServiceError::Panicked { service, message }) => {
            assert_eq!(service, "second");
            assert_eq!(message, "second exploded");
        }
        other => panic!("expected a captured panic, got {other:?}"),
    }
    assert_eq!(startup.started.len(), 1);
}

#[tokio::test]
async fn test_stop_runs_in_reverse_start_order() {
    let log = journal();
    let names: Vec<String> = (0..100).map(|i| format!("service-{i}")).collect();
    let services: Vec<_> = names.iter().map(|name| TestService::new(name, &log)).collect();

    let startup = runner::start(ServiceContext::new(), &as_services(&services), false).await;
    assert!(startup.is_ok());
    runner::stop(&startup.ctx, &startup.started, false).await;

    let expected: Vec<String> = names
        .iter()
        .map(|name| format!("start {name}"))
        .chain(names.iter().rev().map(|name| format!("stop {name}")))
        .collect();
    assert_eq!(entries(&log), expected);
    assert!(services.iter().all(|service| service.state() == 0));
}

#[tokio::test]
async fn test_panicking_stop_does_not_skip_others() {
    let log = journal();
    let services = vec![
        TestService::new("first", &log),
        TestService::with_behavior("second", &log, Behavior::PanicStop),
    ];

    let startup = runner::start(ServiceContext::new(), &as_services(&services), false).await;
    runner::stop(&startup.ctx, &startup.started, false).await;

    assert_eq!(services[0].state(), 0);
    assert_eq!(services[1].state(), 1);
    assert_eq!(
        entries(&log),
        vec!["start first", "start second", "stop first"]
    );
}

#[tokio::test]
async fn test_stop_timeout_is_reported() {
    let log = journal();
    let services = vec![TestService::with_behavior("slow", &log, Behavior::SlowStop)];

    let startup = runner::start(ServiceContext::new(), &as_services(&services), false).await;
    let finished = runner::stop_with_timeout(
        &startup.ctx,
        &startup.started,
        false,
        Some(Duration::from_millis(20)),
    )
    .await;

    assert!(!finished);
    assert_eq!(services[0].state(), 1);
}

#[tokio::test]
async fn test_stop_without_timeout_waits() {
    let log = journal();
    let services = vec![TestService::new("only", &log)];

    let startup = runner::start(ServiceContext::new(), &as_services(&services), false).await;
    assert!(runner::stop_with_timeout(&startup.ctx, &startup.started, false, None).await);
    assert_eq!(services[0].state(), 0);
}
