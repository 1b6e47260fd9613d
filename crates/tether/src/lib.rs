//! # Tether
//!
//! Modules declare what they require and what they provide against shared
//! slots; one resolution pass checks the whole graph and fills every slot.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether::{FnSlot, Registry};
//!
//! type Greet = dyn Fn(&str) -> String + Send + Sync;
//! let greet: FnSlot<Greet> = FnSlot::new();
//!
//! let mut registry = Registry::new();
//! registry.require(&greet);
//! let implementation: Arc<Greet> = Arc::new(|name| format!("hello {name}"));
//! registry.provide(&greet, implementation);
//! registry.resolve_all()?;
//!
//! assert_eq!(greet.resolved()?("tether"), "hello tether");
//! ```
//!
//! ## Architecture
//!
//! - `domain` - slots, registry, resolution, errors
//! - `infrastructure` - configuration, logging, bootstrap
//! - `services` - service lifecycle driven by the registry
//! - [`demo`] - key-value store wired through link-time declarations
//! - [`cli`] - commands behind the `tether` binary

/// Domain layer - slots, registry and resolution
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use tether_domain::*;
}

/// Infrastructure layer - configuration, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use tether_infrastructure::*;
}

/// Service lifecycle
///
/// Re-exports from the services crate for convenience
pub mod services {
    pub use tether_services::*;
}

pub mod cli;
pub mod demo;

// Re-export commonly used domain types at the crate root
pub use domain::*;

pub use infrastructure::{ConfigLoader, TetherConfig, bootstrap};
pub use services::{Lifecycle, Service, ServiceContext};
