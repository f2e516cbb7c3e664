//! Normalizer: turns raw vendor records into [`CanonicalEvent`] values.
//!
//! For each record: decode JSON, pick the [`SourceRuleSet`] for the feed,
//! run its rules in order over a fresh [`IntermediateContext`], then
//! assemble. Rule sets are compiled once and only read afterwards, so an
//! [`Engine`] can be shared across any number of worker threads.

mod context;
mod enums;
mod fields;
mod ioc;
mod record;
mod rules;
mod timestamp;

pub use context::IntermediateContext;
pub use enums::{CanonicalEnum, EnumLookup};
pub use fields::{Block, CanonicalField, FieldKind};
pub use ioc::{classify, EntitySlot, Indicator};
pub use record::Template;
pub use rules::{Action, CaseDef, Guard, IocDef, Rule, RuleDef, ValueSource};
pub use timestamp::{parse_timestamp, truncate_fraction, TimestampError, TimestampFormat};

use crate::config::{RuleConfig, SourceDef, CONFIG_VERSION};
use crate::error::{ConfigError, MalformedError, NormalizeError};
use crate::types::CanonicalEvent;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, trace};

/// Decode raw bytes into a JSON object.
pub fn decode(raw: &[u8]) -> Result<Value, MalformedError> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        _ => Err(MalformedError::not_json()),
    }
}

/// The compiled, immutable rule table for one vendor feed.
#[derive(Debug, Clone)]
pub struct SourceRuleSet {
    id: String,
    revision: String,
    vendor_name: String,
    product_name: String,
    vars: BTreeMap<String, String>,
    rules: Vec<Rule>,
}

impl SourceRuleSet {
    /// Validate and compile a rule-set definition.
    pub fn compile(id: &str, def: &SourceDef) -> Result<Self, ConfigError> {
        if def.vendor_name.trim().is_empty() || def.product_name.trim().is_empty() {
            return Err(ConfigError::MissingIdentity { source_id: id.to_string() });
        }
        let rules = def
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Rule::try_from(rule.clone()).map_err(|error| ConfigError::Rule {
                    source_id: id.to_string(),
                    index,
                    error,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: id.to_string(),
            revision: def.revision.clone(),
            vendor_name: def.vendor_name.clone(),
            product_name: def.product_name.clone(),
            vars: def.vars.clone(),
            rules,
        })
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run every rule over an already decoded record and assemble the
    /// result. Stops at the first abort.
    pub fn apply(&self, record: &Value) -> Result<CanonicalEvent, MalformedError> {
        let mut ctx = IntermediateContext::new();
        for (index, rule) in self.rules.iter().enumerate() {
            rule.apply(record, &self.vars, &mut ctx)?;
            trace!(source = %self.id, index, action = rule.action.name(), "rule evaluated");
        }
        Ok(ctx.assemble(&self.vendor_name, &self.product_name))
    }
}

/// All configured rule sets, keyed by source identifier.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    sources: HashMap<String, SourceRuleSet>,
}

impl Engine {
    /// Compile every source in `config`. Any invalid rule fails the whole load.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion { found: config.version, expected: CONFIG_VERSION });
        }
        let mut sources = HashMap::with_capacity(config.sources.len());
        for (id, def) in &config.sources {
            let set = SourceRuleSet::compile(id, def)?;
            info!(source = %id, revision = %set.revision, rules = set.rules.len(), "rule set compiled");
            sources.insert(id.clone(), set);
        }
        Ok(Self { sources })
    }

    pub fn rule_set(&self, source_id: &str) -> Result<&SourceRuleSet, ConfigError> {
        self.sources
            .get(source_id)
            .ok_or_else(|| ConfigError::UnknownSource(source_id.to_string()))
    }

    /// Source identifiers in sorted order.
    pub fn source_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Normalize one raw record from `source_id`.
    ///
    /// The record is decoded before the source is looked up, so a line that
    /// is not a JSON object is a drop even for an unknown source.
    pub fn normalize(&self, raw: &[u8], source_id: &str) -> Result<CanonicalEvent, NormalizeError> {
        let dropped = |e: MalformedError| {
            debug!(source = %source_id, reason = %e.reason, "record dropped");
            NormalizeError::from(e)
        };
        let record = decode(raw).map_err(dropped)?;
        self.rule_set(source_id)?.apply(&record).map_err(dropped)
    }
}
