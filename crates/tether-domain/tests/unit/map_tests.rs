//! Unit tests for map and multimap slots

use std::collections::HashMap;
use std::sync::Arc;

use tether_domain::{
    Candidate, ErrorKind, FnSlot, MapSlot, MultiMapSlot, Registry, ResolveError, ResolvePolicy,
    Site, SliceSlot,
};

type Buckets = MapSlot<String, i32>;

fn key(name: &str) -> String {
    name.to_string()
}

#[test]
fn test_map_basic_usage() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.require(&buckets);
    registry.provide(&buckets, HashMap::new());
    registry.provide_key_value(&buckets, key("users"), 16);
    registry.provide_key_value(&buckets, key("orders"), 64);
    registry.resolve_all().unwrap();

    let map = buckets.resolved().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["users"], 16);
    assert_eq!(map["orders"], 64);

    registry.reset();
    assert!(!buckets.is_set());
}

#[test]
fn test_map_base_keeps_its_entries() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.require(&buckets);
    registry.provide(&buckets, HashMap::from([(key("a"), 1)]));
    registry.provide_key_value(&buckets, key("b"), 2);
    registry.resolve_all().unwrap();

    assert_eq!(
        buckets.get(),
        Some(HashMap::from([(key("a"), 1), (key("b"), 2)]))
    );
}

#[test]
fn test_required_entries_without_base_are_not_provided() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    let line = line!() + 1;
    registry.require(&buckets);
    registry.provide_key_value(&buckets, key("users"), 16);

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::ImplementationNotProvided]);
    assert_eq!(errors[0].locations()[0].line(), line);
    assert!(!buckets.is_set());
}

#[test]
fn test_unrequired_contributions_without_base_stay_inert() {
    let buckets = Buckets::new();
    let plugins: SliceSlot<i32> = SliceSlot::new();
    let spare = Buckets::new();
    let mut registry = Registry::new();

    registry
        .module("plugins")
        .provide_key_value(&buckets, key("users"), 16);
    registry.module("plugins").provide_slice_element(&plugins, 1);
    registry.module("storage").provide(&spare, HashMap::new());
    registry.resolve_all().unwrap();

    assert!(!buckets.is_set());
    assert!(!plugins.is_set());
    assert!(!spare.is_set());
}

#[test]
fn test_required_map_without_anything_is_not_provided() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.require(&buckets);
    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::ImplementationNotProvided]);
}

#[test]
fn test_initialized_map_accepts_entries_and_reset_restores_it() {
    let buckets = Buckets::with_value(HashMap::from([(key("a"), 1)]));
    let mut registry = Registry::new();

    registry.require(&buckets);
    registry.provide_key_value(&buckets, key("b"), 2);
    registry.resolve_all().unwrap();
    assert_eq!(buckets.with(|map| map.map_or(0, HashMap::len)), 2);

    registry.reset();
    assert_eq!(buckets.get(), Some(HashMap::from([(key("a"), 1)])));
}

#[test]
fn test_map_provided_for_non_nil() {
    let buckets = Buckets::with_value(HashMap::new());
    let mut registry = Registry::new();

    registry.provide(&buckets, HashMap::new());
    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(
        errors.kinds(),
        vec![ErrorKind::ImplementationProvidedForNonNil]
    );
}

#[test]
fn test_multiple_storage_implementations() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    let first = line!() + 1;
    registry.provide(&buckets, HashMap::new());
    let second = line!() + 1;
    registry.provide(&buckets, HashMap::new());

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(
        errors.kinds(),
        vec![ErrorKind::MultipleStorageImplementations]
    );
    let lines: Vec<u32> = errors[0].locations().into_iter().map(Site::line).collect();
    assert_eq!(lines, vec![first, second]);
}

#[test]
fn test_incompatible_key_and_value_are_reported_separately() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.provide(&buckets, HashMap::new());
    registry.provide_key_value_candidate(
        &buckets,
        Candidate::single(1_u8),
        Candidate::single("sixteen"),
    );

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(
        errors.kinds(),
        vec![
            ErrorKind::IncompatibleStorageKey,
            ErrorKind::IncompatibleStorageValue
        ]
    );
}

#[test]
fn test_incompatible_storage_impl() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.provide_candidate(&buckets, Candidate::single(HashMap::<String, u8>::new()));

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::IncompatibleStorageImpl]);
}

#[test]
fn test_multiple_values_for_one_key() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.provide(&buckets, HashMap::new());
    let first = line!() + 1;
    registry.provide_key_value(&buckets, key("users"), 16);
    registry.provide_key_value(&buckets, key("orders"), 64);
    let second = line!() + 1;
    registry.provide_key_value(&buckets, key("users"), 32);

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ResolveError::MultipleValues { key, provisions } => {
            assert_eq!(key, "\"users\"");
            let lines: Vec<u32> = provisions.iter().map(Site::line).collect();
            assert_eq!(lines, vec![first, second]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_incompatible_value_assigns_nothing() {
    type AddFn = dyn Fn(i32, i32) -> i32 + Send + Sync;

    let add: FnSlot<AddFn> = FnSlot::new();
    let buckets = Buckets::new();
    let implementation: Arc<AddFn> = Arc::new(|x, y| x + y);
    let mut registry = Registry::new();

    registry.require(&add);
    registry.provide(&add, implementation);
    registry.provide(&buckets, HashMap::new());
    registry.provide_key_value(&buckets, key("users"), 16);
    let line = line!() + 1;
    registry.provide_key_value_candidate(
        &buckets,
        Candidate::single(key("x")),
        Candidate::single(1.5_f64),
    );

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::IncompatibleStorageValue]);
    assert_eq!(errors[0].locations()[0].line(), line);
    assert!(!add.is_set());
    assert!(!buckets.is_set());
}

#[test]
fn test_unrequired_map_is_tolerated_but_not_assigned() {
    let buckets = Buckets::new();
    let mut registry = Registry::new();

    registry.module("storage").provide(&buckets, HashMap::new());
    registry
        .module("plugins")
        .provide_key_value(&buckets, key("users"), 16);
    registry.resolve_all().unwrap();
    assert!(!buckets.is_set());

    registry.reset();
    assert!(!buckets.is_set());
}

#[test]
fn test_unrequired_map_reported_when_containers_count() {
    let buckets = Buckets::new();
    let mut registry =
        Registry::with_policy(ResolvePolicy::default().with_unused_containers(true));

    registry.module("storage").provide(&buckets, HashMap::new());
    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::ModuleNotUsed]);
}

#[test]
fn test_multimap_appends_to_existing_values() {
    let handlers: MultiMapSlot<String, i32> =
        MultiMapSlot::with_value(HashMap::from([(key("k"), vec![42])]));
    let mut registry = Registry::new();

    registry.require(&handlers);
    registry.provide_key_item(&handlers, key("k"), 44);
    registry.provide_key_item(&handlers, key("k"), 43);
    registry.resolve_all().unwrap();

    assert_eq!(handlers.resolved().unwrap()["k"], vec![42, 44, 43]);
}

#[test]
fn test_multimap_items_and_batches_share_a_key() {
    let handlers: MultiMapSlot<String, i32> = MultiMapSlot::new();
    let mut registry = Registry::new();

    registry.require(&handlers);
    registry.provide(&handlers, HashMap::new());
    registry.provide_key_items(&handlers, key("k"), vec![1]);
    registry.provide_key_item(&handlers, key("k"), 2);
    registry.provide_key_items(&handlers, key("other"), vec![7, 8]);
    registry.resolve_all().unwrap();

    let map = handlers.resolved().unwrap();
    assert_eq!(map["k"], vec![1, 2]);
    assert_eq!(map["other"], vec![7, 8]);
}

#[test]
fn test_multimap_rejects_foreign_items() {
    let handlers: MultiMapSlot<String, i32> = MultiMapSlot::new();
    let mut registry = Registry::new();

    registry.provide(&handlers, HashMap::new());
    registry.provide_key_value_candidate(
        &handlers,
        Candidate::single(key("k")),
        Candidate::batch(vec!["x".to_string()]),
    );

    let errors = registry.resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::IncompatibleStorageValue]);
}
