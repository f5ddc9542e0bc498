//! Property-based tests for handle caching.
//!
//! Every built-in codec must give back exactly what was written, through the
//! writing handle's cache and through a fresh handle alike. Values a codec
//! cannot represent are refused without touching the file or the cache.

use super::{CacheState, PathHandle};
use crate::error::Error;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tempfile::tempdir;

/// JSON values without floats, so equality after a round trip is exact.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Scalars every structured document format can hold.
fn document_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z][a-zA-Z0-9 _-]{0,12}".prop_map(Value::String),
    ]
}

/// A top-level table of scalars, scalar arrays and tables of scalars.
fn document() -> impl Strategy<Value = Value> {
    let field = prop_oneof![
        document_scalar(),
        prop::collection::vec(document_scalar(), 0..4).prop_map(Value::Array),
        prop::collection::btree_map(key(), document_scalar(), 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect())),
    ];
    prop::collection::btree_map(key(), field, 0..5)
        .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>()))
}

/// Anything that is not a table.
fn non_table() -> impl Strategy<Value = Value> {
    json_value().prop_filter("tables are valid documents", |v| !v.is_object())
}

/// Anything that is not a string.
fn non_string() -> impl Strategy<Value = Value> {
    json_value().prop_filter("strings are valid text", |v| !v.is_string())
}

/// Writes `value` to `name` and checks both read paths.
fn assert_round_trip(name: &str, value: &Value) -> Result<(), TestCaseError> {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);

    let mut writer = PathHandle::new(&path).unwrap();
    writer.write(value).unwrap();
    prop_assert_eq!(&writer.read().unwrap(), value);
    prop_assert_eq!(writer.stats().reads, 0);

    let mut reader = PathHandle::new(&path).unwrap();
    prop_assert_eq!(&reader.read().unwrap(), value);
    Ok(())
}

/// Writes `accepted`, then checks that `rejected` is refused cleanly.
fn assert_refused(name: &str, accepted: &Value, rejected: &Value) -> Result<(), TestCaseError> {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);

    let mut handle = PathHandle::new(&path).unwrap();
    handle.write(accepted).unwrap();
    let on_disk = std::fs::read(&path).unwrap();
    let signature = handle.signature();

    let err = handle.write(rejected).unwrap_err();
    prop_assert!(matches!(err, Error::Encode { .. }), "got {:?}", err);
    prop_assert_eq!(handle.state(), CacheState::Fresh);
    prop_assert_eq!(handle.signature(), signature);
    prop_assert_eq!(handle.stats().writes, 1);
    prop_assert_eq!(std::fs::read(&path).unwrap(), on_disk);
    prop_assert_eq!(&handle.read().unwrap(), accepted);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        .. ProptestConfig::default()
    })]

    #[test]
    fn json_round_trip(value in json_value()) {
        assert_round_trip("value.json", &value)?;
    }

    #[test]
    fn text_round_trip(text in any::<String>()) {
        assert_round_trip("value.txt", &Value::String(text))?;
    }

    #[test]
    fn toml_round_trip(value in document()) {
        assert_round_trip("value.toml", &value)?;
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_round_trip(value in document()) {
        assert_round_trip("value.yaml", &value)?;
    }

    // Unknown extensions fall back to text and obey the same law.
    #[test]
    fn fallback_round_trip(text in any::<String>()) {
        assert_round_trip("value.unknown", &Value::String(text))?;
    }

    #[test]
    fn text_refuses_non_strings(text in any::<String>(), rejected in non_string()) {
        assert_refused("value.txt", &Value::String(text), &rejected)?;
    }

    #[test]
    fn toml_refuses_non_tables(accepted in document(), rejected in non_table()) {
        assert_refused("value.toml", &accepted, &rejected)?;
    }

    // The last of several writes wins, and the cache stays fresh throughout.
    #[test]
    fn last_write_wins(values in prop::collection::vec(json_value(), 1..6)) {
        let dir = tempdir().unwrap();
        let mut handle = PathHandle::new(dir.path().join("seq.json")).unwrap();

        for value in &values {
            handle.write(value).unwrap();
            prop_assert_eq!(handle.state(), CacheState::Fresh);
        }
        handle.invalidate();
        prop_assert_eq!(Some(handle.read().unwrap()), values.last().cloned());
    }
}
