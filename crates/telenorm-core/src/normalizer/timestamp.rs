//! Timestamp normalizer.
//!
//! Parses vendor timestamp encodings into a UTC instant. Formats are tried in
//! the order the rule lists them; the first that parses wins.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::LazyLock;

/// A timestamp encoding a rule may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// RFC 3339, any fractional precision, `Z` or offset. Naive values are UTC.
    Iso8601,
    /// `YYYY-MM-DDTHH:MM:SS.mmm` plus zone. Longer fractions are truncated to
    /// milliseconds before parsing.
    Iso8601Millis,
    /// `YYYY-MM-DDTHH:MM:SS`, optional zone. Naive values are UTC.
    Iso8601Seconds,
    /// Epoch seconds, optionally fractional.
    Unix,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp {0:?} matches none of the configured formats")]
    Unparseable(String),
    #[error("no timestamp formats configured")]
    NoFormats,
}

/// Parse `raw` with the first matching format in `formats`.
pub fn parse_timestamp(raw: &str, formats: &[TimestampFormat]) -> Result<DateTime<Utc>, TimestampError> {
    if formats.is_empty() {
        return Err(TimestampError::NoFormats);
    }
    let raw = raw.trim();
    formats
        .iter()
        .find_map(|format| format.parse(raw))
        .ok_or_else(|| TimestampError::Unparseable(raw.to_string()))
}

impl TimestampFormat {
    fn parse(self, raw: &str) -> Option<DateTime<Utc>> {
        match self {
            TimestampFormat::Iso8601 => parse_iso8601(raw),
            TimestampFormat::Iso8601Millis => parse_iso8601_millis(raw),
            TimestampFormat::Iso8601Seconds => parse_iso8601_seconds(raw),
            TimestampFormat::Unix => parse_unix(raw),
        }
    }
}

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

static EXCESS_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3})\d+(Z|[+-]\d{2}:\d{2})$")
        .expect("static regex is valid")
});

/// Keep only the first three fractional digits when more precede the zone.
pub fn truncate_fraction(raw: &str) -> Cow<'_, str> {
    EXCESS_FRACTION.replace(raw, "$1$2")
}

static MILLIS_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}(Z|[+-]\d{2}:\d{2})$").expect("static regex is valid")
});

static SECONDS_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(Z|[+-]\d{2}:\d{2})?$").expect("static regex is valid")
});

fn parse_iso8601_millis(raw: &str) -> Option<DateTime<Utc>> {
    let truncated = truncate_fraction(raw);
    if !MILLIS_SHAPE.is_match(&truncated) {
        return None;
    }
    DateTime::parse_from_rfc3339(&truncated)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_iso8601_seconds(raw: &str) -> Option<DateTime<Utc>> {
    let zone = SECONDS_SHAPE.captures(raw)?.get(1);
    match zone {
        Some(_) => DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc)),
        None => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc()),
    }
}

fn parse_unix(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(secs) = raw.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    let (whole, frac) = raw.split_once('.')?;
    let secs = whole.parse::<i64>().ok()?;
    if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = frac.chars().chain(std::iter::repeat('0')).take(9).collect();
    let nanos = digits.parse::<u32>().ok()?;
    // The fraction carries the sign of the whole part, "-0.5" included.
    if whole.starts_with('-') && nanos > 0 {
        return Utc.timestamp_opt(secs - 1, 1_000_000_000 - nanos).single();
    }
    Utc.timestamp_opt(secs, nanos).single()
}
