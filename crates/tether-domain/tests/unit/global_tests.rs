//! Unit tests for the process-wide registry
//!
//! Kept in a single test: the registry is shared by every test in the binary.

use std::collections::HashMap;
use std::sync::Arc;

use tether_domain::{ErrorKind, FnSlot, MapSlot, MultiMapSlot, SliceSlot, global};

type AddFn = dyn Fn(i32, i32) -> i32 + Send + Sync;

#[test]
fn test_global_registry_lifecycle() {
    let add: FnSlot<AddFn> = FnSlot::new();
    let sizes: MapSlot<String, usize> = MapSlot::new();
    let tags: MultiMapSlot<String, String> = MultiMapSlot::new();
    let hooks: SliceSlot<u8> = SliceSlot::new();
    let implementation: Arc<AddFn> = Arc::new(|x, y| x + y);

    global::require(&add);
    global::require(&sizes);
    global::require(&tags);
    global::require(&hooks);
    global::provide(&add, implementation);
    global::provide(&sizes, HashMap::new());
    global::provide_key_value(&sizes, "small".to_string(), 1);
    global::provide(&tags, HashMap::new());
    global::provide_key_item(&tags, "k".to_string(), "a".to_string());
    global::provide_key_items(&tags, "k".to_string(), vec!["b".to_string()]);
    global::provide(&hooks, Vec::new());
    global::provide_slice_element(&hooks, 1);
    global::provide_slice_elements(&hooks, vec![2, 3]);

    assert_eq!(global::with_registry(|r| r.stats().targets), 4);

    let resolved = line!() + 1;
    global::resolve_all().unwrap();
    assert_eq!(add.resolved().unwrap()(3, 2), 5);
    assert_eq!(sizes.resolved().unwrap()["small"], 1);
    assert_eq!(tags.resolved().unwrap()["k"], vec!["a", "b"]);
    assert_eq!(hooks.get(), Some(vec![1, 2, 3]));

    let errors = global::resolve_all().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::AlreadyResolved]);
    assert_eq!(errors[0].locations()[0].line(), resolved);

    global::reset();
    assert!(!add.is_set());
    assert!(!hooks.is_set());
    assert!(!global::with_registry(|r| r.is_resolved()));
}
