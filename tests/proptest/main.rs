// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for the admission gate.
//!
//! Uses proptest to generate random configuration documents and verify the
//! gate's invariants: defaulting is idempotent, clean documents produce no
//! warnings, null entries are always reported deterministically, and
//! foreign kinds are rejected at every entry point.

use proptest::prelude::*;
use serde_json::Value;

use otelcol_operator::CollectorWebhook;

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::CollectorBuilder;

/// Strategy for scalar document nodes (no nulls).
fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| Value::Number(n.into())),
        "[a-z]{1,8}".prop_map(Value::String),
    ]
}

/// Strategy for arbitrary nested documents containing no null nodes.
fn document_without_nulls() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for configuration documents (mapping root, no nulls).
fn config_without_nulls() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,8}", document_without_nulls(), 0..4)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

proptest! {
    #[test]
    fn no_nulls_means_no_warnings(config in config_without_nulls()) {
        let handle = CollectorBuilder::new("prop").config(config).build();
        let warnings = CollectorWebhook.validate_create(Some(&handle)).unwrap();
        prop_assert!(warnings.is_empty());
    }

    #[test]
    fn every_null_key_is_reported_once(keys in prop::collection::btree_set("[a-z]{1,8}", 1..5)) {
        let mut config = serde_json::Map::new();
        for key in &keys {
            config.insert(key.clone(), Value::Null);
        }
        let handle = CollectorBuilder::new("prop")
            .config(Value::Object(config))
            .build();

        let warnings = CollectorWebhook.validate_create(Some(&handle)).unwrap();
        prop_assert_eq!(warnings.len(), 1);

        let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
        let expected = format!("null objects: {}.", joined);
        prop_assert!(warnings[0].contains(&expected));

        // Repeated evaluation yields byte-identical warning text.
        let again = CollectorWebhook.validate_create(Some(&handle)).unwrap();
        prop_assert_eq!(&warnings, &again);
    }

    #[test]
    fn defaulting_is_idempotent(config in config_without_nulls()) {
        let mut handle = CollectorBuilder::new("prop").config(config).build();

        CollectorWebhook.default(Some(&mut handle)).unwrap();
        let once = serde_json::to_value(&handle).unwrap();

        CollectorWebhook.default(Some(&mut handle)).unwrap();
        let twice = serde_json::to_value(&handle).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn foreign_kinds_are_rejected(kind in "[A-Z][a-z]{0,11}") {
        let handle = CollectorBuilder::new("prop").kind(kind.clone()).build();
        let expected = format!("expected an OpenTelemetryCollector, received {}", kind);

        prop_assert_eq!(
            CollectorWebhook.validate_create(Some(&handle)).unwrap_err().to_string(),
            expected.clone()
        );
        prop_assert_eq!(
            CollectorWebhook.validate_update(None, Some(&handle)).unwrap_err().to_string(),
            expected.clone()
        );
        prop_assert_eq!(
            CollectorWebhook.validate_delete(Some(&handle)).unwrap_err().to_string(),
            expected.clone()
        );

        let mut mutable = handle.clone();
        prop_assert_eq!(
            CollectorWebhook.default(Some(&mut mutable)).unwrap_err().to_string(),
            expected
        );
    }
}
