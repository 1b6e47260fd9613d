//! Registry-driven service lifecycle
//!
//! Services are contributed to a [`SliceSlot`] like any other dependency:
//!
//! ```ignore
//! let mut lifecycle = Lifecycle::new();
//! registry.provide_slice_element(lifecycle.services(), Arc::new(Recorder) as Arc<dyn Service>);
//! lifecycle.run(&mut registry, ServiceContext::new()).await?;
//! ```
//!
//! [`Lifecycle::run`] resolves, starts every service in provision order,
//! waits for Ctrl-C, [`Terminator::terminate`] or cancellation of the given
//! context, then stops what was started and resets the registry.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use tether_domain::constants::DEFAULT_STOP_TIMEOUT_SECS;
use tether_domain::declare::{DECLARATIONS, Declaration};
use tether_domain::{ModuleScope, Registry, SliceSlot};
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::context::ServiceContext;
use crate::error::Result;
use crate::runner;
use crate::service::Service;

/// Module name of the lifecycle's own declarations
pub const MODULE: &str = "tether::services";

/// Default bound on stopping all services
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(DEFAULT_STOP_TIMEOUT_SECS);

/// Process-wide service list, for declarations submitted at link time
pub static SERVICES: LazyLock<SliceSlot<Arc<dyn Service>>> = LazyLock::new(SliceSlot::new);

#[linkme::distributed_slice(DECLARATIONS)]
static SERVICES_DECLARATION: Declaration = Declaration {
    module: MODULE,
    description: "process-wide service list",
    declare: declare_services,
};

fn declare_services(scope: &mut ModuleScope<'_>) {
    scope.provide(&*SERVICES, Vec::new());
    scope.require(&*SERVICES);
}

/// Wakes a running [`Lifecycle::run`]
///
/// A termination requested before `run` starts waiting is kept and ends the
/// next wait immediately.
#[derive(Clone, Debug, Default)]
pub struct Terminator {
    notify: Arc<Notify>,
}

impl Terminator {
    pub fn terminate(&self) {
        self.notify.notify_one();
    }

    pub async fn terminated(&self) {
        self.notify.notified().await;
    }
}

/// Starts and stops the services provided into its slot
pub struct Lifecycle {
    services: SliceSlot<Arc<dyn Service>>,
    /// `false` when the service list is declared at link time
    owns_declaration: bool,
    /// Set once the list is declared, cleared by `stop_and_reset`
    declared: bool,
    verbose: bool,
    stop_timeout: Option<Duration>,
    terminator: Terminator,
    ctx: ServiceContext,
    started: Vec<Arc<dyn Service>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A lifecycle with its own, unshared service list
    pub fn new() -> Self {
        Self::with_services(SliceSlot::new())
    }

    /// A lifecycle over the process-wide [`SERVICES`] list
    ///
    /// The list is declared by [`Registry::declare_all`], so the registry
    /// passed to this lifecycle must have run it.
    pub fn global() -> Self {
        Self {
            owns_declaration: false,
            ..Self::with_services(SERVICES.clone())
        }
    }

    pub fn with_services(services: SliceSlot<Arc<dyn Service>>) -> Self {
        Self {
            services,
            owns_declaration: true,
            declared: false,
            verbose: true,
            stop_timeout: Some(DEFAULT_STOP_TIMEOUT),
            terminator: Terminator::default(),
            ctx: ServiceContext::new(),
            started: Vec::new(),
        }
    }

    /// Log progress at `info` (default) instead of `debug`
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Bound on stopping all services; `None` waits indefinitely
    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Slot to provide services into
    pub fn services(&self) -> &SliceSlot<Arc<dyn Service>> {
        &self.services
    }

    /// Handle that ends [`run`](Self::run)
    pub fn terminator(&self) -> Terminator {
        self.terminator.clone()
    }

    /// Services started by the last start, in start order
    pub fn started(&self) -> &[Arc<dyn Service>] {
        &self.started
    }

    /// Bound on stopping all started services; `None` waits forever
    pub fn stop_timeout(&self) -> Option<Duration> {
        self.stop_timeout
    }

    /// Provide an empty service list and require it
    ///
    /// The base provision lets resolution succeed when nobody contributes a
    /// service. Runs once per registration epoch: calls after the first are
    /// ignored until [`stop_and_reset`](Self::stop_and_reset). Does nothing
    /// for [`global`](Self::global) lifecycles.
    pub fn declare(&mut self, registry: &mut Registry) {
        if !self.owns_declaration || self.declared {
            return;
        }
        let mut scope = registry.module(MODULE);
        scope.provide(&self.services, Vec::new());
        scope.require(&self.services);
        self.declared = true;
    }

    /// Declare, resolve, then start every provided service
    pub async fn resolve_and_start(
        &mut self,
        registry: &mut Registry,
        ctx: ServiceContext,
    ) -> Result<ServiceContext> {
        self.declare(registry);
        info!(target: MODULE, "Resolving dependencies...");
        registry.resolve_all()?;
        self.start_services(ctx).await
    }

    /// Start the resolved services in provision order
    ///
    /// On failure the services that did start are remembered, so a following
    /// [`stop_services`](Self::stop_services) still stops them.
    pub async fn start_services(&mut self, ctx: ServiceContext) -> Result<ServiceContext> {
        let services = self.services.get().unwrap_or_default();
        let startup = runner::start(ctx, &services, self.verbose).await;
        self.ctx = startup.ctx.clone();
        self.started = startup.started;
        match startup.error {
            Some(error) => Err(error),
            None => Ok(startup.ctx),
        }
    }

    /// Stop started services in reverse order
    ///
    /// Returns `false` when the stop timeout elapsed first.
    pub async fn stop_services(&mut self) -> bool {
        let started = std::mem::take(&mut self.started);
        runner::stop_with_timeout(&self.ctx, &started, self.verbose, self.stop_timeout).await
    }

    /// Stop started services, then reset `registry`
    pub async fn stop_and_reset(&mut self, registry: &mut Registry) {
        self.stop_services().await;
        registry.reset();
        self.declared = false;
    }

    /// Resolve, start, wait for termination, stop and reset
    ///
    /// The context handed to services is a child of `ctx` and is cancelled
    /// before services are stopped. Errors from resolution or start are
    /// returned after the cleanup ran.
    pub async fn run(&mut self, registry: &mut Registry, ctx: ServiceContext) -> Result<()> {
        let ctx = ctx.child();
        let outcome = match self.resolve_and_start(registry, ctx.clone()).await {
            Ok(_) => {
                self.wait_for_termination(&ctx).await;
                Ok(())
            }
            Err(error) => Err(error),
        };

        ctx.cancel();
        self.stop_and_reset(registry).await;
        outcome
    }

    async fn wait_for_termination(&self, ctx: &ServiceContext) {
        let interrupt = async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(target: MODULE, error = %error, "Failed to listen for interrupt");
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            () = interrupt => info!(target: MODULE, "Signal received: interrupt"),
            () = self.terminator.terminated() => info!(target: MODULE, "Termination requested"),
            () = ctx.cancelled() => info!(target: MODULE, "Context cancelled"),
        }
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("services", &self.services.id())
            .field("owns_declaration", &self.owns_declaration)
            .field("declared", &self.declared)
            .field("verbose", &self.verbose)
            .field("stop_timeout", &self.stop_timeout)
            .field("started", &self.started)
            .finish()
    }
}
