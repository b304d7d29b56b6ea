//! Match criteria for catalog lookups.
//!
//! A filter is either a bare instance name, a set of property conditions that
//! must all hold, or a caller-supplied predicate. Property conditions compare
//! against the descriptor's JSON representation, with `tag` as the one special
//! key: it tests membership in the descriptor's tag list instead of equality.

use crate::catalog::model::ServiceDescriptor;
use crate::error::ResolveError;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

const TAG_KEY: &str = "tag";

type Predicate = Arc<dyn Fn(&ServiceDescriptor) -> bool + Send + Sync>;

#[derive(Clone)]
/// Criteria deciding which catalog entries satisfy one query key.
pub enum ServiceFilter {
    /// Shorthand for `{"name": ...}`.
    Name(String),
    /// Every entry must match. An empty map matches everything.
    Properties(Map<String, Value>),
    Predicate(Predicate),
}

impl ServiceFilter {
    /// Filter that accepts every descriptor.
    pub fn any() -> Self {
        ServiceFilter::Properties(Map::new())
    }

    pub fn name(name: impl Into<String>) -> Self {
        ServiceFilter::Name(name.into())
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::any().with("label", label.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::any().with(TAG_KEY, tag.into())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&ServiceDescriptor) -> bool + Send + Sync + 'static,
    {
        ServiceFilter::Predicate(Arc::new(predicate))
    }

    /// Add a property condition.
    ///
    /// A `Name` filter is widened into a property map first; adding a
    /// condition to a predicate wraps it so both must hold.
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match self {
            ServiceFilter::Name(name) => {
                let mut props = Map::new();
                props.insert("name".to_string(), Value::String(name));
                props.insert(key, value);
                ServiceFilter::Properties(props)
            }
            ServiceFilter::Properties(mut props) => {
                props.insert(key, value);
                ServiceFilter::Properties(props)
            }
            ServiceFilter::Predicate(inner) => {
                let mut props = Map::new();
                props.insert(key, value);
                ServiceFilter::predicate(move |service| {
                    inner(service) && properties_match(&props, service)
                })
            }
        }
    }

    /// Decode criteria from JSON: a string is an instance name, an object is a
    /// property map. Anything else is rejected.
    pub fn from_value(value: &Value) -> Result<Self, ResolveError> {
        match value {
            Value::String(name) => Ok(ServiceFilter::Name(name.clone())),
            Value::Object(props) => Ok(ServiceFilter::Properties(props.clone())),
            other => Err(ResolveError::InvalidArgument(format!(
                "service filter must be a string or an object, got {other}"
            ))),
        }
    }

    pub fn matches(&self, service: &ServiceDescriptor) -> bool {
        match self {
            ServiceFilter::Name(name) => service.name == *name,
            ServiceFilter::Properties(props) => properties_match(props, service),
            ServiceFilter::Predicate(predicate) => predicate(service),
        }
    }
}

fn properties_match(props: &Map<String, Value>, service: &ServiceDescriptor) -> bool {
    props.iter().all(|(key, expected)| {
        if key == TAG_KEY {
            tag_matches(expected, service)
        } else {
            service.property(key).as_ref() == Some(expected)
        }
    })
}

// A list under `tag` is a subset test: the descriptor must carry all of them.
fn tag_matches(expected: &Value, service: &ServiceDescriptor) -> bool {
    match expected {
        Value::String(tag) => service.has_tag(tag),
        Value::Array(tags) => tags
            .iter()
            .all(|tag| tag.as_str().is_some_and(|tag| service.has_tag(tag))),
        _ => false,
    }
}

impl Default for ServiceFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl From<&str> for ServiceFilter {
    fn from(name: &str) -> Self {
        ServiceFilter::name(name)
    }
}

impl From<String> for ServiceFilter {
    fn from(name: String) -> Self {
        ServiceFilter::Name(name)
    }
}

impl From<Map<String, Value>> for ServiceFilter {
    fn from(props: Map<String, Value>) -> Self {
        ServiceFilter::Properties(props)
    }
}

impl TryFrom<&Value> for ServiceFilter {
    type Error = ResolveError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        ServiceFilter::from_value(value)
    }
}

impl fmt::Debug for ServiceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceFilter::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ServiceFilter::Properties(props) => f.debug_tuple("Properties").field(props).finish(),
            ServiceFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl fmt::Display for ServiceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceFilter::Name(name) => f.write_str(name),
            ServiceFilter::Properties(props) => write!(f, "{}", Value::Object(props.clone())),
            ServiceFilter::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}
