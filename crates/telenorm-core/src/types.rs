//! Canonical event types for telenorm-core.
//!
//! Every vendor feed normalizes into [`CanonicalEvent`]. The shape is fixed:
//! `metadata` and `principal` are always present, the remaining blocks are
//! present only when at least one rule wrote into them. Untouched text is an
//! empty string, untouched lists are empty, untouched enumerations carry
//! their UNKNOWN/UNSPECIFIED variant. `null` is never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The normalized output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub metadata: Metadata,
    pub principal: Principal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_result: Option<SecurityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat: Option<ThreatDetail>,
}

impl CanonicalEvent {
    /// Serialize to a single JSON line. Field order is fixed, so the same
    /// event always produces the same bytes.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `metadata` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub vendor_name: String,
    pub product_name: String,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub product_event_type: String,
    #[serde(default)]
    pub product_entity_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "utc_millis", skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "utc_millis", skip_serializing_if = "Option::is_none")]
    pub collected_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
    /// Kind of the populated [`Entity`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityKind>,
}

/// Validity window of an entity (threat-intel attributes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(default, with = "utc_millis", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "utc_millis", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// `principal` block: the subject the event is about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub userid: String,
    #[serde(default)]
    pub user_authentication_status: AuthenticationStatus,
}

/// `security_result` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityResult {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_details: Vec<String>,
}

/// `threat` block: threat-intelligence context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatDetail {
    #[serde(default)]
    pub threat_id: String,
    #[serde(default)]
    pub threat_feed_name: String,
    #[serde(default)]
    pub url_back_to_product: String,
    #[serde(default)]
    pub category_details: Vec<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub severity_details: String,
}

/// The single indicator an event may carry. Being a sum type, at most one
/// entity shape can ever be populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entity {
    Ip { ip: Vec<String> },
    Hostname { hostname: String },
    File { file: FileHashes },
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Ip { .. } => EntityKind::IpAddress,
            Entity::Hostname { .. } => EntityKind::DomainName,
            Entity::File { .. } => EntityKind::File,
        }
    }
}

/// File hash variants. Exactly one is set when produced by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileHashes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

// ---------------------------------------------------------------------------
// Canonical enumerations
// ---------------------------------------------------------------------------

/// Severity level, shared by `security_result` and `threat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    UnknownSeverity,
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::UnknownSeverity,
        Severity::Informational,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::UnknownSeverity => "UNKNOWN_SEVERITY",
            Severity::Informational => "INFORMATIONAL",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication state of `principal.user`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticationStatus {
    #[default]
    UnknownAuthenticationStatus,
    Active,
    Suspended,
    NoActiveCredentials,
    Deleted,
}

impl AuthenticationStatus {
    pub const ALL: [AuthenticationStatus; 5] = [
        AuthenticationStatus::UnknownAuthenticationStatus,
        AuthenticationStatus::Active,
        AuthenticationStatus::Suspended,
        AuthenticationStatus::NoActiveCredentials,
        AuthenticationStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationStatus::UnknownAuthenticationStatus => "UNKNOWN_AUTHENTICATION_STATUS",
            AuthenticationStatus::Active => "ACTIVE",
            AuthenticationStatus::Suspended => "SUSPENDED",
            AuthenticationStatus::NoActiveCredentials => "NO_ACTIVE_CREDENTIALS",
            AuthenticationStatus::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for AuthenticationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical event type in `metadata.event_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    #[default]
    EventTypeUnspecified,
    GenericEvent,
    UserLogin,
    UserUncategorized,
    StatusUpdate,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::EventTypeUnspecified,
        EventType::GenericEvent,
        EventType::UserLogin,
        EventType::UserUncategorized,
        EventType::StatusUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::EventTypeUnspecified => "EVENT_TYPE_UNSPECIFIED",
            EventType::GenericEvent => "GENERIC_EVENT",
            EventType::UserLogin => "USER_LOGIN",
            EventType::UserUncategorized => "USER_UNCATEGORIZED",
            EventType::StatusUpdate => "STATUS_UPDATE",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kind selected by the IOC classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    IpAddress,
    DomainName,
    File,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::IpAddress => write!(f, "IP_ADDRESS"),
            EntityKind::DomainName => write!(f, "DOMAIN_NAME"),
            EntityKind::File => write!(f, "FILE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp serialization
// ---------------------------------------------------------------------------

/// Canonical instants are RFC 3339, UTC, millisecond precision, `Z` suffix.
pub(crate) mod utc_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
