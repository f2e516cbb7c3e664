//! Static record corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of raw input lines as a vendor
//! feed would deliver them.

use super::builders::MispAttributeBuilder;
use std::sync::Arc;
use telenorm::Engine;

/// The documented Hashcast example record.
pub const HASHCAST_SCENARIO_A: &str = r#"{"email":"user@domain","password-type":"PLAIN","first-seen":"2024-12-31T14:52:11.122Z","password-value":"myleakedpass","detected-at":"2024-12-31T14:59:30.76Z","sources":"BIG_LEAKS","status":"ACTIVE"}"#;

/// Scenario A without `status`.
pub const HASHCAST_SCENARIO_B: &str = r#"{"email":"user@domain","password-type":"PLAIN","first-seen":"2024-12-31T14:52:11.122Z","password-value":"myleakedpass","detected-at":"2024-12-31T14:59:30.76Z","sources":"BIG_LEAKS"}"#;

/// MISP attribute carrying an `ip-dst` indicator.
pub const MISP_SCENARIO_C: &str = r#"{"Attribute":{"id":"1001","event_id":"12","uuid":"5f2b-attr","type":"ip-dst","category":"Network activity","value":"1.2.3.4","timestamp":"1717200000","Event":{"uuid":"5f2b-event","info":"C2 infrastructure","threat_level_id":"1","Orgc":{"name":"CIRCL"},"Tag":[{"name":"tlp:green"},{"name":"c2"}]}}}"#;

/// MISP attribute with neither threat detail nor a recognized indicator.
pub const MISP_SCENARIO_D: &str = r#"{"Attribute":{"uuid":"5f2b-attr","value":"1.2.3.4","comment":"orphan"}}"#;

pub const MALFORMED_SCENARIO_E: &str = "not a json";

pub const CORPUS_HASHCAST: &[&str] = &[
    HASHCAST_SCENARIO_A,
    HASHCAST_SCENARIO_B,
    r#"{"email":"ops@corp.example","password-type":"HASH","password-value":"5f4dcc3b5aa765d61d8327deb882cf99","sources":"COMBOLIST","status":"DEPROVISIONED","first-seen":"2025-01-02T03:04:05","detected-at":"2025-01-02T03:04:05+02:00"}"#,
    r#"{"email":"dev@corp.example","status":"LOCKED","detected-at":"yesterday"}"#,
];

pub const CORPUS_MISP: &[&str] = &[
    MISP_SCENARIO_C,
    r#"{"Attribute":{"id":"1002","event_id":"12","uuid":"a-2","type":"domain","category":"Network activity","value":"evil.example","Event":{"uuid":"e-12","info":"Phishing","threat_level_id":"2","Orgc":{"name":"CIRCL"}}}}"#,
    r#"{"Attribute":{"id":"1003","event_id":"13","uuid":"a-3","type":"sha256","category":"Payload delivery","value":"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855","first_seen":"2024-06-01T10:00:00.123456+00:00","last_seen":"2024-06-03T10:00:00.654321+00:00","Event":{"uuid":"e-13","threat_level_id":"3"}}}"#,
    r#"{"Attribute":{"id":"1004","event_id":"14","uuid":"a-4","type":"btc","category":"Financial fraud","value":"1BoatSLRHtKNngkdXEeobR76b53LETtpyT","Event":{"threat_level_id":"4"}}}"#,
];

/// Lines that never decode to a JSON object.
pub const CORPUS_MALFORMED: &[&str] = &[
    MALFORMED_SCENARIO_E,
    "[1,2,3]",
    "\"just a string\"",
    "{\"truncated\":",
    "42",
];

/// The engine built from the embedded rule tables only.
pub fn builtin_engine() -> Engine {
    telenorm::engine(None).expect("built-in rule tables must compile")
}

pub fn shared_engine() -> Arc<Engine> {
    Arc::new(builtin_engine())
}

/// `n` synthetic MISP lines cycling through indicator types.
pub fn corpus_misp_high_volume(n: usize) -> Vec<String> {
    const TYPES: &[(&str, &str)] = &[
        ("ip-src", "10.0.0.1"),
        ("ip-dst", "192.0.2.10"),
        ("domain", "bad.example"),
        ("md5", "d41d8cd98f00b204e9800998ecf8427e"),
        ("sha1", "da39a3ee5e6b4b0d3255bfef95601890afd80709"),
        ("url", "http://bad.example/x"),
    ];
    (0..n)
        .map(|i| {
            let (kind, value) = TYPES[i % TYPES.len()];
            MispAttributeBuilder::new(format!("attr-{i}"))
                .indicator(kind, value)
                .threat_level(((i % 4) + 1).to_string())
                .tag("tlp:white")
                .to_line()
        })
        .collect()
}
