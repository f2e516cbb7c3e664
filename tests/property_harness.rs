#![allow(unused)]
//! Property harness for canonical-output guarantees.
//!
//! # What this covers
//!
//! - **Idempotence**: normalizing the same bytes twice yields byte-identical
//!   output.
//! - **Unknown-enum totality**: unmapped status and threat-level codes become
//!   the enumeration's UNKNOWN member, never blank and never the raw code.
//! - **Entity exclusivity**: at most one entity shape, with at most one hash.
//! - **Timestamp canonicalization**: RFC 3339 `Z`, offset with excess
//!   fractional digits, and epoch seconds for the same instant produce the
//!   same canonical text.
//!
//! # Running
//!
//! ```sh
//! cargo test --test property_harness
//! PROPTEST_CASES=2000 cargo test --test property_harness
//! ```

mod common;
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Utc};
use common::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::Value;
use telenorm::normalizer::{parse_timestamp, TimestampFormat};
use telenorm::types::{AuthenticationStatus, Severity};

fn indicator_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ip-dst".to_string()),
        Just("ip-src".to_string()),
        Just("domain".to_string()),
        Just("sha256".to_string()),
        Just("sha1".to_string()),
        Just("md5".to_string()),
        "[a-z0-9|-]{1,12}",
    ]
}

proptest! {
    #[test]
    fn normalization_is_idempotent(
        email in "[a-z]{1,8}@[a-z]{1,8}\\.example",
        status in "[A-Z_]{0,14}",
        sources in ".{0,24}",
        seen in 0i64..4_102_444_800,
    ) {
        let engine = builtin_engine();
        let raw = HashcastRecordBuilder::new(email)
            .status(status)
            .field("sources", sources)
            .first_seen(Utc.timestamp_opt(seen, 0).unwrap().to_rfc3339())
            .to_bytes();

        let first = engine.normalize(&raw, "hashcast").unwrap().to_json_line().unwrap();
        let second = engine.normalize(&raw, "hashcast").unwrap().to_json_line().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unmapped_status_is_unknown(status in "[A-Za-z_]{1,20}") {
        prop_assume!(status != "ACTIVE" && status != "DEPROVISIONED");
        let raw = HashcastRecordBuilder::new("a@b").status(status).to_bytes();
        let event = builtin_engine().normalize(&raw, "hashcast").unwrap();
        prop_assert_eq!(
            event.principal.user.user_authentication_status,
            AuthenticationStatus::UnknownAuthenticationStatus
        );
        let value = serde_json::to_value(&event).unwrap();
        prop_assert_eq!(
            &value["principal"]["user"]["user_authentication_status"],
            &Value::String("UNKNOWN_AUTHENTICATION_STATUS".into())
        );
    }

    #[test]
    fn unmapped_threat_level_is_unknown(level in ".{0,6}") {
        prop_assume!(!["1", "2", "3"].contains(&level.trim()));
        let raw = MispAttributeBuilder::new("u").attr("id", "1").threat_level(level).to_bytes();
        let threat = builtin_engine().normalize(&raw, "misp").unwrap().threat.unwrap();
        prop_assert_eq!(threat.severity, Severity::UnknownSeverity);
    }

    #[test]
    fn at_most_one_entity_shape(kind in indicator_type(), value in "[ -~]{0,40}") {
        let raw = MispAttributeBuilder::new("u").indicator(&kind, &value).to_bytes();
        let event = builtin_engine().normalize(&raw, "misp").unwrap();
        assert_canonical_invariants!(event);

        let json = serde_json::to_value(&event).unwrap();
        if let Some(entity) = json.get("entity") {
            let shape = entity.as_object().unwrap();
            prop_assert_eq!(shape.len(), 1);
            if let Some(file) = shape.get("file") {
                prop_assert_eq!(file.as_object().unwrap().len(), 1);
            }
        }
    }

    #[test]
    fn timestamp_encodings_agree(
        secs in 0i64..4_102_444_800,
        millis in 0u32..1000,
        extra in 0u32..1000,
        offset_minutes in prop::sample::select(vec![-720i32, -330, -60, 0, 60, 330, 540, 840]),
    ) {
        let instant = Utc.timestamp_opt(secs, millis * 1_000_000).unwrap();

        let zulu = instant.to_rfc3339_opts(SecondsFormat::Millis, true);
        let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
        let local = instant.with_timezone(&offset);
        let with_offset = format!(
            "{}{:03}{}",
            local.format("%Y-%m-%dT%H:%M:%S%.3f"),
            extra,
            local.format("%:z")
        );
        let epoch = format!("{secs}.{millis:03}");

        let a = parse_timestamp(&zulu, &[TimestampFormat::Iso8601]).unwrap();
        let b = parse_timestamp(&with_offset, &[TimestampFormat::Iso8601Millis]).unwrap();
        let c = parse_timestamp(&epoch, &[TimestampFormat::Unix]).unwrap();

        prop_assert_eq!(a, instant);
        prop_assert_eq!(b, instant);
        prop_assert_eq!(c, instant);
        prop_assert_eq!(b.to_rfc3339_opts(SecondsFormat::Millis, true), zulu);
    }
}
