//! Service lifecycle errors

use tether_domain::ResolveErrors;
use thiserror::Error;

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Why services could not be brought up
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A service returned an error from `start`
    #[error("Service {service} failed to start: {source}")]
    Failed {
        /// Name of the failing service
        service: String,
        /// Error returned by the service
        #[source]
        source: tether_domain::Error,
    },

    /// A service panicked inside `start`
    #[error("Service {service} panicked: {message}")]
    Panicked {
        /// Name of the panicking service
        service: String,
        /// Panic payload, if it was a string
        message: String,
    },

    /// Dependencies could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolveErrors),
}

impl ServiceError {
    /// Name of the service at fault, if a service is at fault
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Failed { service, .. } | Self::Panicked { service, .. } => Some(service),
            Self::Resolution(_) => None,
        }
    }
}
