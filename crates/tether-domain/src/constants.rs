//! Domain layer constants
//!
//! Values shared by the crates built on the registry. Infrastructure
//! specific constants remain in `tether_infrastructure::constants`.

// ============================================================================
// SERVICE LIFECYCLE CONSTANTS
// ============================================================================

/// Time all started services together get to stop before the rest are
/// abandoned (seconds)
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 30;
