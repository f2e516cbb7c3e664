//! Test builders: ergonomic constructors for vendor input records.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// HashcastRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for Hashcast leaked-credential records.
///
/// ```rust
/// let raw = HashcastRecordBuilder::new("user@domain").status("ACTIVE").to_bytes();
/// ```
pub struct HashcastRecordBuilder {
    fields: Map<String, Value>,
}

impl HashcastRecordBuilder {
    pub fn new(email: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("email".into(), Value::String(email.into()));
        fields.insert("password-type".into(), "PLAIN".into());
        fields.insert("password-value".into(), "hunter2".into());
        fields.insert("sources".into(), "BIG_LEAKS".into());
        Self { fields }
    }

    pub fn status(self, status: impl Into<String>) -> Self {
        self.field("status", status.into())
    }

    pub fn first_seen(self, ts: impl Into<Value>) -> Self {
        self.field("first-seen", ts)
    }

    pub fn detected_at(self, ts: impl Into<Value>) -> Self {
        self.field("detected-at", ts)
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.fields).unwrap()
    }
}

// ---------------------------------------------------------------------------
// MispAttributeBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for MISP `{"Attribute": {...}}` records.
pub struct MispAttributeBuilder {
    attribute: Map<String, Value>,
    event: Map<String, Value>,
    tags: Vec<Value>,
}

impl MispAttributeBuilder {
    pub fn new(uuid: impl Into<String>) -> Self {
        let mut attribute = Map::new();
        attribute.insert("uuid".into(), Value::String(uuid.into()));
        Self { attribute, event: Map::new(), tags: Vec::new() }
    }

    pub fn indicator(mut self, kind: &str, value: &str) -> Self {
        self.attribute.insert("type".into(), kind.into());
        self.attribute.insert("value".into(), value.into());
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attribute.insert(key.to_string(), value.into());
        self
    }

    pub fn event(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.event.insert(key.to_string(), value.into());
        self
    }

    pub fn threat_level(self, level: impl Into<Value>) -> Self {
        self.event("threat_level_id", level)
    }

    pub fn org(self, name: &str) -> Self {
        self.event("Orgc", json!({ "name": name }))
    }

    pub fn tag(mut self, name: &str) -> Self {
        self.tags.push(json!({ "name": name }));
        self
    }

    pub fn build(&self) -> Value {
        let mut attribute = self.attribute.clone();
        let mut event = self.event.clone();
        if !self.tags.is_empty() {
            event.insert("Tag".into(), Value::Array(self.tags.clone()));
        }
        if !event.is_empty() {
            attribute.insert("Event".into(), Value::Object(event));
        }
        json!({ "Attribute": attribute })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).unwrap()
    }

    pub fn to_line(&self) -> String {
        self.build().to_string()
    }
}
