//! Composition root
//!
//! Turns a [`TetherConfig`] into a [`Registry`] holding every linked
//! declaration.
//!
//! ```text
//! TetherConfig → Registry::with_policy → declare_all (linkme) → resolve_all
//! ```

use tether_domain::Registry;
use tether_domain::error::Result;
use tracing::info;

use crate::config::TetherConfig;

/// Create a registry with the configured policy and run every declaration
pub fn bootstrap(config: &TetherConfig) -> Registry {
    let mut registry = Registry::with_policy(config.resolution);
    let declared = registry.declare_all();
    let stats = registry.stats();
    info!(
        declared,
        targets = stats.targets,
        requirements = stats.requirements,
        provisions = stats.provisions,
        "declarations collected"
    );
    registry
}

/// [`bootstrap`] followed by resolution
pub fn bootstrap_and_resolve(config: &TetherConfig) -> Result<Registry> {
    let mut registry = bootstrap(config);
    registry.resolve_all()?;
    Ok(registry)
}
