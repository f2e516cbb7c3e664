//! Error taxonomy.
//!
//! Per-record failures ([`MalformedError`]) are values the caller decides
//! what to do with. Configuration failures ([`ConfigError`]) are operator
//! faults and surface at load time or on the first lookup of a missing
//! source.

use serde::Serialize;

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MalformedReason {
    /// Input bytes are not a JSON object.
    #[serde(rename = "NotJSON")]
    NotJson,
    /// A rule set mandated a field the record did not carry.
    MissingRequiredField,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::NotJson => write!(f, "NotJSON"),
            MalformedReason::MissingRequiredField => write!(f, "MissingRequiredField"),
        }
    }
}

/// A record could not be normalized and was dropped. No partial output
/// exists for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed record ({reason})")]
pub struct MalformedError {
    pub reason: MalformedReason,
}

impl MalformedError {
    pub fn not_json() -> Self {
        Self { reason: MalformedReason::NotJson }
    }

    pub fn missing_required_field() -> Self {
        Self { reason: MalformedReason::MissingRequiredField }
    }
}

/// A single rule failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule declares no action")]
    NoAction,
    #[error("rule declares more than one action: {0}")]
    MultipleActions(String),
    #[error("unknown canonical field {0:?}")]
    UnknownField(String),
    #[error("action {action} cannot target {field} ({kind} field)")]
    IncompatibleField {
        action: &'static str,
        field: &'static str,
        kind: &'static str,
    },
    #[error("action {0} needs exactly one of `value`, `from`, or `each`")]
    ValueSource(&'static str),
    #[error("{value:?} is not a member of the {field} enumeration")]
    UnknownEnumValue { field: &'static str, value: String },
    #[error("timestamp rule needs `from` and at least one entry in `formats`")]
    TimestampSpec,
    #[error("lookup rule needs a `default` value")]
    MissingDefault,
    #[error("lookup case {0} needs exactly one of `when` or `is`; `is` needs `from` on the rule")]
    LookupCase(usize),
    #[error("ioc rule needs non-empty `type` and `value` paths")]
    IocSpec,
}

/// Configuration fault. Never produced while normalizing an individual
/// record except for an unknown source identifier.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no rule set configured for source {0:?}")]
    UnknownSource(String),
    #[error("unsupported rule configuration version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("source {source_id:?} must declare non-empty vendor_name and product_name")]
    MissingIdentity { source_id: String },
    #[error("source {source_id:?}, rule #{index}: {error}")]
    Rule {
        source_id: String,
        index: usize,
        error: RuleError,
    },
    #[error("failed to load rule configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Anything [`Engine::normalize`](crate::normalizer::Engine::normalize) can
/// return.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Malformed(#[from] MalformedError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NormalizeError {
    /// True for per-record drops; false for configuration faults.
    pub fn is_malformed(&self) -> bool {
        matches!(self, NormalizeError::Malformed(_))
    }

    pub fn malformed_reason(&self) -> Option<MalformedReason> {
        match self {
            NormalizeError::Malformed(e) => Some(e.reason),
            NormalizeError::Config(_) => None,
        }
    }
}
