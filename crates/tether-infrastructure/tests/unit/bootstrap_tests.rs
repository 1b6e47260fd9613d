//! Unit tests for registry bootstrap

use std::sync::LazyLock;

use tether_domain::declare::{DECLARATIONS, Declaration};
use tether_domain::{ModuleScope, SliceSlot};
use tether_infrastructure::{TetherConfig, bootstrap, bootstrap_and_resolve};

static GREETINGS: LazyLock<SliceSlot<&'static str>> = LazyLock::new(SliceSlot::new);

#[linkme::distributed_slice(DECLARATIONS)]
static GREETINGS_DECLARATION: Declaration = Declaration {
    module: "greetings",
    description: "greeting extension point",
    declare: declare_greetings,
};

fn declare_greetings(scope: &mut ModuleScope<'_>) {
    scope.require(&*GREETINGS);
    scope.provide(&*GREETINGS, vec!["hello"]);
    scope.provide_slice_element(&*GREETINGS, "hi");
}

#[test]
fn test_bootstrap_collects_and_resolves_declarations() {
    let config = TetherConfig::default();

    let registry = bootstrap(&config);
    assert_eq!(registry.policy(), config.resolution);
    assert_eq!(registry.stats().requirements, 1);
    assert_eq!(registry.stats().provisions, 2);
    assert!(!registry.is_resolved());
    assert!(!GREETINGS.is_set());

    let mut registry = bootstrap_and_resolve(&config).expect("resolves");
    assert!(registry.is_resolved());
    assert_eq!(GREETINGS.get(), Some(vec!["hello", "hi"]));

    registry.reset();
    assert!(!GREETINGS.is_set());
}
