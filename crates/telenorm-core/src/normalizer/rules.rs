//! Source rule sets: guards, actions, and compilation from configuration.
//!
//! A [`RuleDef`] is what an operator writes; [`Rule`] is the validated form
//! the engine evaluates. Compilation happens once at load, so evaluation
//! never meets an unknown field path or an invalid enumeration value.

use super::context::IntermediateContext;
use super::enums::{CanonicalEnum, EnumLookup};
use super::fields::{CanonicalField, FieldKind};
use super::ioc;
use super::record::{self, Template};
use super::timestamp::{parse_timestamp, TimestampFormat};
use crate::error::{MalformedError, RuleError};
use crate::types::{AuthenticationStatus, EventType, Severity};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Predicate over the decoded record. Guards never look at the context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    #[default]
    Always,
    Present(String),
    Equals { path: String, value: String },
    In { path: String, values: Vec<String> },
    All(Vec<Guard>),
    Any(Vec<Guard>),
    Not(Box<Guard>),
}

impl Guard {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Guard::Always => true,
            Guard::Present(path) => record::is_present(record::lookup(record, path)),
            Guard::Equals { path, value } => text_at(record, path).is_some_and(|t| &t == value),
            Guard::In { path, values } => text_at(record, path).is_some_and(|t| values.contains(&t)),
            Guard::All(guards) => guards.iter().all(|g| g.matches(record)),
            Guard::Any(guards) => guards.iter().any(|g| g.matches(record)),
            Guard::Not(guard) => !guard.matches(record),
        }
    }
}

fn text_at(record: &Value, path: &str) -> Option<String> {
    record::lookup(record, path).and_then(record::scalar_text)
}

// ---------------------------------------------------------------------------
// Configuration form
// ---------------------------------------------------------------------------

/// `ioc = { type = "...", value = "..." }`
#[derive(Debug, Clone, Deserialize)]
pub struct IocDef {
    #[serde(rename = "type")]
    pub type_path: String,
    pub value: String,
}

/// One arm of a lookup: either a full guard or `is`, which compares the
/// rule's `from` path for equality.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseDef {
    #[serde(default)]
    pub when: Option<Guard>,
    #[serde(default)]
    pub is: Option<String>,
    pub value: String,
}

/// A rule as written in a rule-set document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDef {
    #[serde(default)]
    pub when: Option<Guard>,

    // actions
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub append: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub lookup: Option<String>,
    #[serde(default)]
    pub ioc: Option<IocDef>,
    #[serde(default)]
    pub abort: bool,

    // value sources
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub each: Option<String>,
    #[serde(default)]
    pub key: Option<String>,

    // timestamp options
    #[serde(default)]
    pub formats: Vec<TimestampFormat>,
    #[serde(default)]
    pub required: bool,

    // lookup options
    #[serde(default)]
    pub cases: Vec<CaseDef>,
    #[serde(default)]
    pub default: Option<String>,
}

// ---------------------------------------------------------------------------
// Compiled form
// ---------------------------------------------------------------------------

/// Where `set`/`append` take their values from.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    Template(Template),
    Field(String),
    Each { path: String, key: Option<String> },
}

impl ValueSource {
    fn resolve(&self, record: &Value, vars: &BTreeMap<String, String>) -> Vec<String> {
        match self {
            ValueSource::Template(t) => {
                let rendered = t.render(record, vars);
                if rendered.is_empty() {
                    Vec::new()
                } else {
                    vec![rendered]
                }
            }
            ValueSource::Field(path) => record::texts_at(record, path),
            ValueSource::Each { path, key } => record::each_at(record, path, key.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Set { field: CanonicalField, source: ValueSource },
    Append { field: CanonicalField, source: ValueSource },
    Timestamp { field: CanonicalField, from: String, formats: Vec<TimestampFormat>, required: bool },
    Lookup { field: CanonicalField, table: EnumLookup },
    Ioc { type_path: String, value_path: String },
    Abort,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Set { .. } => "set",
            Action::Append { .. } => "append",
            Action::Timestamp { .. } => "timestamp",
            Action::Lookup { .. } => "lookup",
            Action::Ioc { .. } => "ioc",
            Action::Abort => "abort",
        }
    }
}

/// Guard plus action.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub when: Guard,
    pub action: Action,
}

impl Rule {
    /// Apply to `ctx` if the guard matches. Only `abort` and a failing
    /// `required` timestamp return an error.
    pub fn apply(
        &self,
        record: &Value,
        vars: &BTreeMap<String, String>,
        ctx: &mut IntermediateContext,
    ) -> Result<(), MalformedError> {
        if !self.when.matches(record) {
            return Ok(());
        }
        match &self.action {
            Action::Set { field, source } => ctx.replace(*field, source.resolve(record, vars)),
            Action::Append { field, source } => ctx.append(*field, source.resolve(record, vars)),
            Action::Timestamp { field, from, formats, required } => {
                let raw = text_at(record, from).filter(|s| !s.is_empty());
                match raw.as_deref().map(|raw| parse_timestamp(raw, formats)) {
                    Some(Ok(instant)) => ctx.set_instant(*field, instant),
                    Some(Err(e)) => {
                        debug!(field = %field, error = %e, "timestamp left unset");
                        if *required {
                            return Err(MalformedError::missing_required_field());
                        }
                    }
                    None if *required => return Err(MalformedError::missing_required_field()),
                    None => {}
                }
            }
            Action::Lookup { field, table } => ctx.replace(*field, vec![table.resolve(record).to_string()]),
            Action::Ioc { type_path, value_path } => {
                let ioc_type = text_at(record, type_path).unwrap_or_default();
                let ioc_value = text_at(record, value_path).unwrap_or_default();
                if let Some(indicator) = ioc::classify(&ioc_type, &ioc_value) {
                    ctx.set_indicator(indicator);
                }
            }
            Action::Abort => return Err(MalformedError::missing_required_field()),
        }
        Ok(())
    }
}

impl TryFrom<RuleDef> for Rule {
    type Error = RuleError;

    fn try_from(def: RuleDef) -> Result<Self, Self::Error> {
        let mut declared = Vec::new();
        if def.set.is_some() {
            declared.push("set");
        }
        if def.append.is_some() {
            declared.push("append");
        }
        if def.timestamp.is_some() {
            declared.push("timestamp");
        }
        if def.lookup.is_some() {
            declared.push("lookup");
        }
        if def.ioc.is_some() {
            declared.push("ioc");
        }
        if def.abort {
            declared.push("abort");
        }
        match declared.len() {
            0 => return Err(RuleError::NoAction),
            1 => {}
            _ => return Err(RuleError::MultipleActions(declared.join(", "))),
        }

        let when = def.when.clone().unwrap_or_default();
        let action = match declared[0] {
            "set" => {
                let field = target(def.set.as_deref())?;
                if field.kind() == FieldKind::Timestamp {
                    return Err(incompatible("set", field));
                }
                let source = value_source(&def, "set")?;
                if let ValueSource::Template(t) = &source {
                    if let Some(literal) = t.literal() {
                        validate_enum_value(field, &literal)?;
                    }
                }
                Action::Set { field, source }
            }
            "append" => {
                let field = target(def.append.as_deref())?;
                if field.kind() != FieldKind::List {
                    return Err(incompatible("append", field));
                }
                Action::Append { field, source: value_source(&def, "append")? }
            }
            "timestamp" => {
                let field = target(def.timestamp.as_deref())?;
                if field.kind() != FieldKind::Timestamp {
                    return Err(incompatible("timestamp", field));
                }
                let from = def.from.clone().filter(|p| !p.is_empty()).ok_or(RuleError::TimestampSpec)?;
                if def.formats.is_empty() {
                    return Err(RuleError::TimestampSpec);
                }
                Action::Timestamp { field, from, formats: def.formats.clone(), required: def.required }
            }
            "lookup" => {
                let field = target(def.lookup.as_deref())?;
                if !field.kind().is_enum() {
                    return Err(incompatible("lookup", field));
                }
                let fallback = def.default.clone().ok_or(RuleError::MissingDefault)?;
                validate_enum_value(field, &fallback)?;
                let mut cases = Vec::with_capacity(def.cases.len());
                for (i, case) in def.cases.iter().enumerate() {
                    let guard = match (&case.when, &case.is, &def.from) {
                        (Some(guard), None, _) => guard.clone(),
                        (None, Some(is), Some(from)) => Guard::Equals { path: from.clone(), value: is.clone() },
                        _ => return Err(RuleError::LookupCase(i)),
                    };
                    validate_enum_value(field, &case.value)?;
                    cases.push((guard, case.value.clone()));
                }
                Action::Lookup { field, table: EnumLookup::new(cases, fallback) }
            }
            "ioc" => {
                let ioc = def.ioc.as_ref().ok_or(RuleError::IocSpec)?;
                if ioc.type_path.is_empty() || ioc.value.is_empty() {
                    return Err(RuleError::IocSpec);
                }
                Action::Ioc { type_path: ioc.type_path.clone(), value_path: ioc.value.clone() }
            }
            _ => Action::Abort,
        };

        Ok(Rule { when, action })
    }
}

fn target(path: Option<&str>) -> Result<CanonicalField, RuleError> {
    let path = path.unwrap_or_default();
    path.parse().map_err(|_| RuleError::UnknownField(path.to_string()))
}

fn incompatible(action: &'static str, field: CanonicalField) -> RuleError {
    RuleError::IncompatibleField { action, field: field.path(), kind: field.kind().name() }
}

fn value_source(def: &RuleDef, action: &'static str) -> Result<ValueSource, RuleError> {
    match (&def.value, &def.from, &def.each) {
        (Some(value), None, None) => Ok(ValueSource::Template(Template::parse(value))),
        (None, Some(from), None) => Ok(ValueSource::Field(from.clone())),
        (None, None, Some(each)) => Ok(ValueSource::Each { path: each.clone(), key: def.key.clone() }),
        _ => Err(RuleError::ValueSource(action)),
    }
}

fn validate_enum_value(field: CanonicalField, value: &str) -> Result<(), RuleError> {
    let valid = match field.kind() {
        FieldKind::Severity => Severity::parse(value).is_some(),
        FieldKind::AuthStatus => AuthenticationStatus::parse(value).is_some(),
        FieldKind::EventType => EventType::parse(value).is_some(),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(RuleError::UnknownEnumValue { field: field.path(), value: value.to_string() })
    }
}
