//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "tether.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "tether";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "TETHER";

/// Separator for nested keys in environment variables (`TETHER_LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "TETHER_LOG";

/// Maximum number of rotated files to keep
pub const LOG_MAX_FILES: usize = 5;
