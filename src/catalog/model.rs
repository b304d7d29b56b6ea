//! Deserializable representation of one bound service instance.
//!
//! The fields mirror what the platform writes into `VCAP_SERVICES` for each
//! binding. Anything the crate does not model explicitly is kept in `extra` so
//! filters can still match on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A bound service instance and its credentials.
pub struct ServiceDescriptor {
    /// Service type, e.g. `postgres`. Filled from the enclosing catalog group
    /// when the platform leaves it out.
    #[serde(default)]
    pub label: String,
    /// Instance name assigned by the user at bind time.
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Opaque credentials payload handed back to callers unchanged.
    #[serde(default = "empty_credentials")]
    pub credentials: Value,
    /// Every other property (`plan`, `provider`, ...) exactly as the platform
    /// wrote it, explicit `null`s included.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_credentials() -> Value {
    Value::Object(Map::new())
}

impl ServiceDescriptor {
    /// Minimal descriptor with no tags, plan, or extra properties.
    pub fn new(label: impl Into<String>, name: impl Into<String>, credentials: Value) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            tags: Vec::new(),
            credentials,
            extra: Map::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.extra
            .insert("plan".to_string(), Value::String(plan.into()));
        self
    }

    pub fn plan(&self) -> Option<&str> {
        self.extra.get("plan").and_then(Value::as_str)
    }

    /// Look up a property by its JSON name.
    ///
    /// Returns `None` when the descriptor does not carry the property at all,
    /// which filters treat as a mismatch.
    pub fn property(&self, key: &str) -> Option<Value> {
        match key {
            "label" => Some(Value::String(self.label.clone())),
            "name" => Some(Value::String(self.name.clone())),
            "tags" => Some(Value::from(self.tags.clone())),
            "credentials" => Some(self.credentials.clone()),
            other => self.extra.get(other).cloned(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}
