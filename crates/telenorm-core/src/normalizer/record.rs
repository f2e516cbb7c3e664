//! Read-only access to decoded records: dotted path lookup, presence,
//! scalar text, and `%{path}` templates.

use serde_json::Value;
use std::collections::BTreeMap;

/// Resolve a dot-separated path. Numeric segments index into arrays.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(record, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// A value is present when it exists, is not null, and is not an empty
/// string, array, or object.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

/// Textual form of a scalar. Containers and null have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Every non-empty scalar at `path`. An array of scalars yields each
/// element in order.
pub fn texts_at(record: &Value, path: &str) -> Vec<String> {
    match lookup(record, path) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).filter(|s| !s.is_empty()).collect(),
        Some(v) => scalar_text(v).filter(|s| !s.is_empty()).into_iter().collect(),
        None => Vec::new(),
    }
}

/// `key` of every element of the array at `path`, or the elements
/// themselves when `key` is `None`.
pub fn each_at(record: &Value, path: &str, key: Option<&str>) -> Vec<String> {
    let Some(Value::Array(items)) = lookup(record, path) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match key {
            Some(key) => lookup(item, key),
            None => Some(item),
        })
        .filter_map(scalar_text)
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Field(String),
}

/// A string with `%{path}` placeholders, parsed once at rule compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut parts = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find("%{") {
            let Some(len) = rest[start + 2..].find('}') else {
                break;
            };
            if start > 0 {
                parts.push(Part::Text(rest[..start].to_string()));
            }
            parts.push(Part::Field(rest[start + 2..start + 2 + len].to_string()));
            rest = &rest[start + 2 + len + 1..];
        }
        if !rest.is_empty() {
            parts.push(Part::Text(rest.to_string()));
        }
        Self { parts }
    }

    /// The template text when it has no placeholders.
    pub fn literal(&self) -> Option<String> {
        self.parts
            .iter()
            .map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Field(_) => None,
            })
            .collect()
    }

    /// Render against the record, falling back to `vars`. Missing
    /// placeholders render as empty text.
    pub fn render(&self, record: &Value, vars: &BTreeMap<String, String>) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(t) => out.push_str(t),
                Part::Field(path) => {
                    if let Some(text) = lookup(record, path).and_then(scalar_text) {
                        out.push_str(&text);
                    } else if let Some(var) = vars.get(path) {
                        out.push_str(var);
                    }
                }
            }
        }
        out
    }
}
