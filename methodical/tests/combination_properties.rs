//! Property tests for dispatch ordering.

use std::sync::{Arc, Mutex};

use methodical::{GenericFunction, Role, TypeTable, Value};
use proptest::prelude::*;

type Log = Arc<Mutex<Vec<String>>>;

const SPECIALIZERS: &[&str] = &["*", "Object", "Root", "Mid", "Leaf", "Array", "number"];
const CLASSES: &[&str] = &["Root", "Mid", "Leaf", "Other"];

fn hierarchy() -> Arc<TypeTable> {
    let mut table = TypeTable::with_builtins();
    table.define("Root", None).unwrap();
    table.define("Mid", Some("Root")).unwrap();
    table.define("Leaf", Some("Mid")).unwrap();
    table.define("Other", None).unwrap();
    Arc::new(table)
}

/// Specificity of `specializer` for an instance of `class` under the
/// hierarchy above: ancestry hops, with the root one past the end of the
/// chain and the wildcard last. `None` when it does not apply.
fn depth(specializer: &str, class: &str) -> Option<u64> {
    const WILDCARD: u64 = 1 << 32;
    match (specializer, class) {
        ("*", _) => Some(WILDCARD),
        ("Object", "Leaf") => Some(3),
        ("Object", "Mid") => Some(2),
        ("Object", "Root" | "Other") => Some(1),
        ("Root", "Root") | ("Mid", "Mid") | ("Leaf", "Leaf") => Some(0),
        ("Root", "Mid") | ("Mid", "Leaf") => Some(1),
        ("Root", "Leaf") => Some(2),
        _ => None,
    }
}

fn specializer() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SPECIALIZERS)
}

fn class() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CLASSES)
}

/// Register a logging method for each signature in the given role; the
/// label is the registration index.
fn register(gf: &GenericFunction<Value>, log: &Log, role: Role, signatures: &[&'static str]) {
    for (index, signature) in signatures.iter().enumerate() {
        let log = Arc::clone(log);
        gf.defmethod_with_role(role, signature, move |_, _| {
            log.lock().unwrap().push(format!("{}:{}", role, index));
            Ok(None)
        })
        .unwrap();
    }
}

fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

proptest! {
    #[test]
    fn prop_invocation_is_deterministic(
        befores in prop::collection::vec(specializer(), 0..6),
        afters in prop::collection::vec(specializer(), 0..6),
        primaries in prop::collection::vec(specializer(), 1..6),
        arg in class(),
    ) {
        let log = Log::default();
        let gf: GenericFunction<Value> = GenericFunction::new("visit", hierarchy());
        register(&gf, &log, Role::Before, &befores);
        register(&gf, &log, Role::After, &afters);
        register(&gf, &log, Role::Primary, &primaries);

        let first = gf.invoke(vec![Value::object(arg)]).unwrap();
        let first_log = take(&log);
        let second = gf.invoke(vec![Value::object(arg)]).unwrap();
        let second_log = take(&log);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_log, second_log);
    }

    #[test]
    fn prop_after_methods_mirror_before_methods_across_scores(
        signatures in prop::sample::subsequence(SPECIALIZERS, 1..=SPECIALIZERS.len())
            .prop_shuffle(),
        arg in class(),
    ) {
        let log = Log::default();
        let gf: GenericFunction<Value> = GenericFunction::new("visit", hierarchy());
        register(&gf, &log, Role::Before, &signatures);
        register(&gf, &log, Role::After, &signatures);

        gf.invoke(vec![Value::object(arg)]).unwrap();
        let entries = take(&log);

        let before: Vec<usize> = entries
            .iter()
            .filter_map(|e| e.strip_prefix("before:"))
            .map(|index| index.parse::<usize>().unwrap())
            .collect();
        let mut after: Vec<usize> = entries
            .iter()
            .filter_map(|e| e.strip_prefix("after:"))
            .map(|index| index.parse::<usize>().unwrap())
            .collect();
        after.reverse();

        // Distinct specializers score differently for any one class.
        let mut expected: Vec<usize> = (0..signatures.len())
            .filter(|&index| depth(signatures[index], arg).is_some())
            .collect();
        expected.sort_by_key(|&index| depth(signatures[index], arg));

        prop_assert_eq!(&before, &expected);
        prop_assert_eq!(&after, &expected);
    }

    #[test]
    fn prop_most_specific_primary_wins(
        primaries in prop::collection::vec(specializer(), 1..6),
        arg in class(),
    ) {
        let gf: GenericFunction<Value> = GenericFunction::new("visit", hierarchy());
        for (index, signature) in primaries.iter().enumerate() {
            gf.defmethod(signature, move |_, _| Ok(Some(Value::Number(index as f64))))
                .unwrap();
        }

        // Lowest depth wins; equal depths go to the earliest registration.
        let expected = primaries
            .iter()
            .enumerate()
            .filter_map(|(index, signature)| depth(signature, arg).map(|d| (d, index)))
            .min()
            .map(|(_, index)| Value::Number(index as f64));
        let result = gf.invoke(vec![Value::object(arg)]).unwrap();

        prop_assert_eq!(result.value().cloned(), expected);
    }
}
