//! Unit tests for error context extensions

use std::io;

use tether_domain::Error;
use tether_infrastructure::error_ext::ErrorContext;

fn failing() -> Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
}

#[test]
fn test_context_wraps_as_infrastructure_error() {
    let error = failing().context("loading plugins").unwrap_err();
    assert!(matches!(error, Error::Infrastructure { .. }));
    assert!(error.to_string().contains("loading plugins: missing"));
}

#[test]
fn test_with_context_is_lazy() {
    let mut called = false;
    let ok: Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| {
            called = true;
            "never"
        })
        .unwrap();
    assert_eq!(value, 1);
    assert!(!called);

    let error = failing().with_context(|| "reading").unwrap_err();
    assert!(error.to_string().contains("reading: missing"));
}

#[test]
fn test_typed_contexts() {
    assert!(matches!(
        failing().io_context("disk").unwrap_err(),
        Error::Io { .. }
    ));
    assert!(matches!(
        failing().config_context("config").unwrap_err(),
        Error::Configuration { .. }
    ));
}
