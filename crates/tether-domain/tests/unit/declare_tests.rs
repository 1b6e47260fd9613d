//! Unit tests for link-time declarations

use std::sync::{Arc, LazyLock};

use tether_domain::declare::{DECLARATIONS, Declaration, list_declarations};
use tether_domain::{ErrorKind, FnSlot, ModuleScope, Registry, ResolveError, SliceSlot};

type GreetFn = dyn Fn(&str) -> String + Send + Sync;

static GREET: LazyLock<FnSlot<GreetFn>> = LazyLock::new(FnSlot::new);
static ORPHAN: LazyLock<FnSlot<GreetFn>> = LazyLock::new(FnSlot::new);
static LINKED: LazyLock<SliceSlot<&'static str>> = LazyLock::new(SliceSlot::new);

fn greeter() -> Arc<GreetFn> {
    Arc::new(|name: &str| format!("hello {name}"))
}

fn declare_consumer(scope: &mut ModuleScope<'_>) {
    scope.require(&*GREET);
}

fn declare_greeter(scope: &mut ModuleScope<'_>) {
    scope.provide(&*GREET, greeter());
}

fn declare_orphan(scope: &mut ModuleScope<'_>) {
    scope.provide(&*ORPHAN, greeter());
}

static LOCAL: [Declaration; 3] = [
    Declaration {
        module: "orphan",
        description: "provides something nobody needs",
        declare: declare_orphan,
    },
    Declaration {
        module: "greeter",
        description: "provides the greeting",
        declare: declare_greeter,
    },
    Declaration {
        module: "consumer",
        description: "requires the greeting",
        declare: declare_consumer,
    },
];

#[linkme::distributed_slice(DECLARATIONS)]
static LINKED_DECLARATION: Declaration = Declaration {
    module: "declare-tests",
    description: "linked from the test binary",
    declare: declare_linked,
};

fn declare_linked(scope: &mut ModuleScope<'_>) {
    scope.require(&*LINKED);
    scope.provide(&*LINKED, vec!["base"]);
    scope.provide_slice_element(&*LINKED, "linked");
}

#[test]
fn test_declare_from_stamps_module_names() {
    let mut registry = Registry::new();
    assert_eq!(registry.declare_from(&LOCAL), 3);
    assert_eq!(registry.stats().requirements, 1);
    assert_eq!(registry.stats().provisions, 2);

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::ModuleNotUsed]);
    match &errors[0] {
        ResolveError::ModuleNotUsed { module, provisions } => {
            assert_eq!(module, "orphan");
            assert!(provisions[0].file().ends_with("declare_tests.rs"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!GREET.is_set());
    registry.reset();
}

#[test]
fn test_declare_all_runs_linked_declarations() {
    assert!(list_declarations().contains(&("declare-tests", "linked from the test binary")));

    let mut registry = Registry::new();
    assert!(registry.declare_all() >= 1);
    registry.resolve_all().unwrap();

    assert_eq!(LINKED.get(), Some(vec!["base", "linked"]));
    registry.reset();
    assert!(!LINKED.is_set());
}
