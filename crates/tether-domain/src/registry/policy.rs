//! Resolution policy

use serde::{Deserialize, Serialize};

/// Granularity of the unused-provision check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnusedScope {
    /// Every unrequired provision is reported on its own
    Symbol,
    /// A module is reported only when nothing it provides is required
    #[default]
    Module,
}

/// Knobs for [`super::Registry::resolve_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvePolicy {
    pub unused_scope: UnusedScope,
    /// Also treat unrequired map and slice provisions as unused
    pub report_unused_containers: bool,
}

impl ResolvePolicy {
    pub fn symbol_scoped() -> Self {
        Self {
            unused_scope: UnusedScope::Symbol,
            ..Self::default()
        }
    }

    pub fn with_unused_containers(mut self, report: bool) -> Self {
        self.report_unused_containers = report;
        self
    }
}
