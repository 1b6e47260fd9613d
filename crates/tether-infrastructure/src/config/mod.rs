//! Configuration management
//!
//! Defaults, then a TOML file, then `TETHER_` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{LoggingConfig, ServicesConfig, TetherConfig};
