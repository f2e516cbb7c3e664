//! telenorm-feeds: built-in rule tables for the recognized vendor feeds.
//!
//! Each feed ships as a TOML rule-set document embedded at compile time.
//! [`builtin_config`] layers all of them (plus an optional operator file)
//! into one [`RuleConfig`]; [`engine`] compiles the result.

use std::path::Path;
use telenorm_core::{ConfigError, Engine, RuleConfig};
use tracing::info;

/// A vendor feed with a built-in rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedId {
    /// Axur Hashcast leaked-credential alerts.
    Hashcast,
    /// CIRCL MISP threat-intelligence attributes.
    Misp,
}

impl FeedId {
    pub const ALL: [FeedId; 2] = [FeedId::Hashcast, FeedId::Misp];

    /// Source identifier used as the `[sources.<id>]` key.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedId::Hashcast => "hashcast",
            FeedId::Misp => "misp",
        }
    }

    /// The embedded rule-set document.
    pub fn document(self) -> &'static str {
        match self {
            FeedId::Hashcast => include_str!("../rules/hashcast.toml"),
            FeedId::Misp => include_str!("../rules/misp.toml"),
        }
    }
}

/// Every built-in document, layered in [`FeedId::ALL`] order, with `overlay`
/// on top.
pub fn builtin_config(overlay: Option<&Path>) -> Result<RuleConfig, ConfigError> {
    let documents: Vec<&str> = FeedId::ALL.iter().map(|feed| feed.document()).collect();
    if let Some(path) = overlay {
        info!(path = %path.display(), "layering operator rule file");
    }
    RuleConfig::load(&documents, overlay)
}

/// Compile the built-in rule sets (and `overlay`, if any) into an [`Engine`].
pub fn engine(overlay: Option<&Path>) -> Result<Engine, ConfigError> {
    Engine::from_config(&builtin_config(overlay)?)
}
