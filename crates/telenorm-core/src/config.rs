//! Rule-set configuration documents.
//!
//! [`RuleConfig::load`] layers any number of embedded documents with an
//! optional operator file on top. Tables merge key by key; an array such as
//! a source's `rules` is replaced wholesale by a later layer.
//! [`default_overlay_path`] resolves the operator file location.

use crate::error::ConfigError;
use crate::normalizer::RuleDef;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The only schema version this build understands.
pub const CONFIG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// A whole rule-set document, possibly merged from several layers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceDef>,
}

/// `[sources.<id>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDef {
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

fn default_version() -> u32 { CONFIG_VERSION }

impl RuleConfig {
    /// Parse a single TOML document.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Self::load(&[document], None)
    }

    /// Layer `documents` (TOML, in order) and then `overlay`, if given.
    ///
    /// The overlay format follows its file extension (`.toml`, `.yaml`,
    /// `.json`). An explicitly named overlay that does not exist is an error.
    pub fn load(documents: &[&str], overlay: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        for document in documents {
            builder = builder.add_source(config::File::from_str(document, config::FileFormat::Toml));
        }
        if let Some(path) = overlay {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        Ok(builder.build()?.try_deserialize()?)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/telenorm/rules.toml`, falling back to
/// `$HOME/.config/telenorm/rules.toml`.
pub fn overlay_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("telenorm")
        .join("rules.toml")
}

/// [`overlay_path`] if a file exists there.
pub fn default_overlay_path() -> Option<PathBuf> {
    let path = overlay_path();
    path.is_file().then_some(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
