//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the tether registry.
//!
//! ### Configuration & Bootstrap
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`bootstrap`] | Registry creation from configuration and linked declarations |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context for foreign errors |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use bootstrap::{bootstrap, bootstrap_and_resolve};
pub use config::{ConfigLoader, TetherConfig};
pub use error_ext::ErrorContext;
