//! Sequential start and reverse-order stop
//!
//! ```text
//! start:  S1 ──► S2 ──► S3        (context threads through)
//! stop:   S3 ──► S2 ──► S1        (only the ones that started)
//! ```
//!
//! Start stops at the first failure and reports which services made it.
//! Stopping is best effort: a panicking `stop` is logged and the remaining
//! services are still stopped.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::context::ServiceContext;
use crate::error::ServiceError;
use crate::service::Service;

const LOG_TARGET: &str = "tether::services";

/// Progress logging; `info` when verbose, `debug` otherwise
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!(target: LOG_TARGET, $($arg)+);
        } else {
            debug!(target: LOG_TARGET, $($arg)+);
        }
    };
}

/// Outcome of [`start`]
#[derive(Debug)]
pub struct Startup {
    /// Context returned by the last service that started
    pub ctx: ServiceContext,
    /// Services that started, in start order
    pub started: Vec<Arc<dyn Service>>,
    /// Failure that stopped the sequence, if any
    pub error: Option<ServiceError>,
}

impl Startup {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Start `services` one after the other
///
/// Each service receives the context returned by its predecessor. A service
/// that fails or panics is not counted as started.
pub async fn start(ctx: ServiceContext, services: &[Arc<dyn Service>], verbose: bool) -> Startup {
    progress!(verbose, count = services.len(), "Starting services...");

    let mut ctx = ctx;
    let mut started = Vec::with_capacity(services.len());

    for service in services {
        let name = service.name().to_string();
        progress!(verbose, service = %name, "Starting {name}...");

        let outcome = AssertUnwindSafe(service.start(ctx.clone())).catch_unwind().await;
        let error = match outcome {
            Ok(Ok(next)) => {
                ctx = next;
                started.push(Arc::clone(service));
                continue;
            }
            Ok(Err(source)) => ServiceError::Failed {
                service: name,
                source,
            },
            Err(payload) => ServiceError::Panicked {
                service: name,
                message: panic_message(payload.as_ref()),
            },
        };

        error!(target: LOG_TARGET, error = %error, started = started.len(), "Service start failed");
        return Startup {
            ctx,
            started,
            error: Some(error),
        };
    }

    progress!(verbose, "All services started");
    Startup {
        ctx,
        started,
        error: None,
    }
}

/// Stop `started` in reverse order
pub async fn stop(ctx: &ServiceContext, started: &[Arc<dyn Service>], verbose: bool) {
    progress!(verbose, count = started.len(), "Stopping services...");

    for service in started.iter().rev() {
        let name = service.name();
        progress!(verbose, service = %name, "Stopping {name}...");

        if let Err(payload) = AssertUnwindSafe(service.stop(ctx)).catch_unwind().await {
            error!(
                target: LOG_TARGET,
                service = %name,
                panic = %panic_message(payload.as_ref()),
                "Service panicked while stopping"
            );
        }
    }

    progress!(verbose, "All services stopped");
}

/// [`stop`] bounded by `timeout`
///
/// Returns `false` when the deadline passed before every service stopped.
/// `None` waits indefinitely.
pub async fn stop_with_timeout(
    ctx: &ServiceContext,
    started: &[Arc<dyn Service>],
    verbose: bool,
    timeout: Option<Duration>,
) -> bool {
    let Some(timeout) = timeout else {
        stop(ctx, started, verbose).await;
        return true;
    };

    if tokio::time::timeout(timeout, stop(ctx, started, verbose))
        .await
        .is_ok()
    {
        true
    } else {
        warn!(
            target: LOG_TARGET,
            timeout_secs = timeout.as_secs_f64(),
            "Services did not stop within the timeout"
        );
        false
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
