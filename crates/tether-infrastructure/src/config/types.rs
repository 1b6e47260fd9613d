//! Configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tether_domain::ResolvePolicy;
use tether_domain::constants::DEFAULT_STOP_TIMEOUT_SECS;

use crate::constants::{DEFAULT_LOG_LEVEL, LOG_MAX_FILES};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// How `resolve_all` treats unused provisions
    pub resolution: ResolvePolicy,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Service lifecycle configuration
    pub services: ServicesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,

    /// Maximum number of rotated files to keep
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
            max_files: LOG_MAX_FILES,
        }
    }
}

/// Service lifecycle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Report every service start and stop at info level
    pub verbose: bool,

    /// Time all services together get to stop (seconds, 0 waits forever)
    pub stop_timeout_secs: u64,
}

impl ServicesConfig {
    pub fn stop_timeout(&self) -> Option<Duration> {
        (self.stop_timeout_secs > 0).then(|| Duration::from_secs(self.stop_timeout_secs))
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
        }
    }
}
