//! Test services that record what happens to them

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tether_domain::Error;
use tether_services::{Service, ServiceContext, async_trait};

/// Shared start/stop journal
pub type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    FailStart,
    PanicStart,
    PanicStop,
    SlowStop,
}

/// Service whose state is 1 while started, 0 otherwise
pub struct TestService {
    pub name: String,
    pub state: AtomicI32,
    pub behavior: Behavior,
    pub journal: Journal,
    pub seen: Mutex<Option<ServiceContext>>,
}

impl TestService {
    pub fn new(name: &str, journal: &Journal) -> Arc<Self> {
        Self::with_behavior(name, journal, Behavior::Normal)
    }

    pub fn with_behavior(name: &str, journal: &Journal, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            state: AtomicI32::new(0),
            behavior,
            journal: Arc::clone(journal),
            seen: Mutex::new(None),
        })
    }

    pub fn state(&self) -> i32 {
        self.state.load(Ordering::SeqCst)
    }

    /// Context this service was started with
    pub fn seen(&self) -> Option<ServiceContext> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, event: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{event} {}", self.name));
    }
}

#[async_trait]
impl Service for TestService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, ctx: ServiceContext) -> tether_domain::Result<ServiceContext> {
        *self.seen.lock().unwrap() = Some(ctx.clone());
        match self.behavior {
            Behavior::FailStart => return Err(Error::service(format!("{} refused", self.name))),
            Behavior::PanicStart => panic!("{} exploded", self.name),
            _ => {}
        }
        self.record("start");
        self.state.store(1, Ordering::SeqCst);
        Ok(ctx.with_named_value(self.name.clone(), self.name.clone()))
    }

    async fn stop(&self, _ctx: &ServiceContext) {
        match self.behavior {
            Behavior::PanicStop => panic!("{} failed to stop", self.name),
            Behavior::SlowStop => tokio::time::sleep(Duration::from_secs(60)).await,
            _ => {}
        }
        self.record("stop");
        self.state.store(0, Ordering::SeqCst);
    }
}

pub fn journal() -> Journal {
    Arc::default()
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

pub fn as_services(services: &[Arc<TestService>]) -> Vec<Arc<dyn Service>> {
    services
        .iter()
        .map(|service| Arc::clone(service) as Arc<dyn Service>)
        .collect()
}
