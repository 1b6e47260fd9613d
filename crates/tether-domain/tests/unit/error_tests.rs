//! Unit tests for the crate error type

use std::sync::Arc;

use tether_domain::{Error, FnSlot, Registry};

type AddFn = dyn Fn(i32, i32) -> i32 + Send + Sync;

#[test]
fn test_resolution_errors_convert_into_error() {
    let f: FnSlot<AddFn> = FnSlot::new();
    let mut registry = Registry::new();
    registry.require(&f);

    let result: tether_domain::Result<()> = registry.resolve_all().map_err(Error::from);
    let error = result.unwrap_err();
    assert!(error.to_string().starts_with("Resolution failed: Requirement"));
    assert_eq!(error.resolution_errors().map(|e| e.len()), Some(1));
}

#[test]
fn test_unresolved_slot_error_names_the_type() {
    let f: FnSlot<AddFn> = FnSlot::new();
    let error = f.resolved().err().unwrap();
    assert!(matches!(error, Error::Unresolved { .. }));
    assert!(error.to_string().contains("is not resolved"));

    let implementation: Arc<AddFn> = Arc::new(|x, y| x + y);
    let mut registry = Registry::new();
    registry.require(&f);
    registry.provide(&f, implementation);
    registry.resolve_all().unwrap();
    assert!(f.resolved().is_ok());
}

#[test]
fn test_error_constructors() {
    assert!(Error::config("bad").to_string().contains("Configuration error: bad"));
    assert!(Error::service("boom").to_string().contains("Service error: boom"));
    let io = std::io::Error::other("disk");
    let error = Error::io_with_source("reading", io);
    assert!(error.to_string().contains("reading"));
    assert!(std::error::Error::source(&error).is_some());
}
