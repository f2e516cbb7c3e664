//! Enumeration mapper.
//!
//! Vendor status and severity codes are mapped to canonical enumerations
//! through first-match-wins lookup tables whose last arm always matches.

use super::rules::Guard;
use crate::types::{AuthenticationStatus, EventType, Severity};
use serde_json::Value;

/// A canonical enumeration with a designated UNKNOWN member.
pub trait CanonicalEnum: Copy + Sized + 'static {
    const UNKNOWN: Self;

    fn members() -> &'static [Self];
    fn as_code(&self) -> &'static str;

    /// Strict parse of a canonical code.
    fn parse(code: &str) -> Option<Self> {
        Self::members().iter().copied().find(|m| m.as_code() == code)
    }

    /// Total mapping: unknown codes become [`Self::UNKNOWN`].
    fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or(Self::UNKNOWN)
    }
}

impl CanonicalEnum for Severity {
    const UNKNOWN: Self = Severity::UnknownSeverity;

    fn members() -> &'static [Self] {
        &Severity::ALL
    }

    fn as_code(&self) -> &'static str {
        self.as_str()
    }
}

impl CanonicalEnum for AuthenticationStatus {
    const UNKNOWN: Self = AuthenticationStatus::UnknownAuthenticationStatus;

    fn members() -> &'static [Self] {
        &AuthenticationStatus::ALL
    }

    fn as_code(&self) -> &'static str {
        self.as_str()
    }
}

impl CanonicalEnum for EventType {
    const UNKNOWN: Self = EventType::EventTypeUnspecified;

    fn members() -> &'static [Self] {
        &EventType::ALL
    }

    fn as_code(&self) -> &'static str {
        self.as_str()
    }
}

/// Ordered `(guard, canonical code)` arms. Construction appends the fallback
/// as an `Always` arm, so resolution never comes up empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumLookup {
    arms: Vec<(Guard, String)>,
}

impl EnumLookup {
    pub fn new(cases: Vec<(Guard, String)>, fallback: String) -> Self {
        let mut arms = cases;
        arms.push((Guard::Always, fallback));
        Self { arms }
    }

    /// Canonical code of the first arm whose guard matches.
    pub fn resolve(&self, record: &Value) -> &str {
        self.arms
            .iter()
            .find(|(guard, _)| guard.matches(record))
            .or(self.arms.last())
            .map(|(_, code)| code.as_str())
            .unwrap_or_default()
    }
}
