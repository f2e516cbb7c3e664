//! Domain-specific assertion macros for telenorm harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear which canonical-output invariant was violated.

use serde_json::Value;

/// True if any value in the tree is JSON `null`.
pub fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

/// Assert that normalizing `$raw` from `$source` drops the record with the
/// given [`MalformedReason`](telenorm::MalformedReason).
///
/// ```rust
/// assert_dropped!(engine, b"not a json", "misp", MalformedReason::NotJson);
/// ```
#[macro_export]
macro_rules! assert_dropped {
    ($engine:expr, $raw:expr, $source:expr, $reason:expr) => {{
        let raw: &[u8] = $raw.as_ref();
        match $engine.normalize(raw, $source) {
            Ok(event) => panic!(
                "assert_dropped! failed: record was emitted.\n  input: {}\n  output: {:?}",
                String::from_utf8_lossy(raw),
                event
            ),
            Err(err) => pretty_assertions::assert_eq!(
                err.malformed_reason(),
                Some($reason),
                "wrong drop reason for input {}",
                String::from_utf8_lossy(raw)
            ),
        }
    }};
}

/// Assert the invariants every emitted event carries: non-empty vendor and
/// product, and `entity_type` present exactly when an entity is.
#[macro_export]
macro_rules! assert_canonical_invariants {
    ($event:expr) => {{
        let event: &telenorm::CanonicalEvent = &$event;
        assert!(!event.metadata.vendor_name.is_empty(), "empty vendor_name: {:?}", event.metadata);
        assert!(!event.metadata.product_name.is_empty(), "empty product_name: {:?}", event.metadata);
        pretty_assertions::assert_eq!(
            event.metadata.entity_type,
            event.entity.as_ref().map(|e| e.kind()),
            "entity_type does not describe the populated entity"
        );
        let json = serde_json::to_value(event).unwrap();
        assert!(!$crate::common::contains_null(&json), "null emitted: {json}");
    }};
}

/// Assert that a serialized timestamp is RFC 3339 UTC with milliseconds.
#[macro_export]
macro_rules! assert_canonical_timestamp {
    ($value:expr, $expected:expr) => {{
        let value: &serde_json::Value = &$value;
        let text = value.as_str().unwrap_or_else(|| panic!("timestamp is not a string: {value}"));
        pretty_assertions::assert_eq!(text, $expected);
        assert!(
            text.len() == 24 && text.ends_with('Z'),
            "assert_canonical_timestamp! failed: {text:?} is not YYYY-MM-DDTHH:MM:SS.mmmZ"
        );
    }};
}
