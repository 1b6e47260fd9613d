//! Service trait

use async_trait::async_trait;
use tether_domain::error::Result;

use crate::context::ServiceContext;

/// A startable, stoppable unit provided into the service list
///
/// # Example
///
/// ```ignore
/// struct Recorder;
///
/// #[async_trait::async_trait]
/// impl Service for Recorder {
///     async fn start(&self, ctx: ServiceContext) -> Result<ServiceContext> {
///         Ok(ctx.with_value(StartedAt(SystemTime::now())))
///     }
///
///     async fn stop(&self, _ctx: &ServiceContext) {}
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Start the service
    ///
    /// Returns the context the following services start with.
    async fn start(&self, ctx: ServiceContext) -> Result<ServiceContext>;

    /// Stop the service; must not fail
    async fn stop(&self, ctx: &ServiceContext);
}

impl std::fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
