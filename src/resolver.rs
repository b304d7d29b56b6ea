//! Resolution of a service query against the catalog and defaults file.
//!
//! Each query key must match exactly one catalog entry. Keys with no live
//! match fall back to the defaults file, which is read at most once per call
//! and only when some key actually misses. Any failure aborts the whole call.

use crate::catalog::{ServiceCatalog, ServiceFilter};
use crate::defaults::{DefaultServices, DefaultsSource};
use crate::error::ResolveError;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Logical service name to resolved credentials.
pub type ResolvedServices = BTreeMap<String, Value>;

#[derive(Clone, Debug, Default)]
/// Logical service names mapped to the criteria that select them.
///
/// Keys iterate in sorted order, which fixes which error surfaces first when
/// several keys would fail.
pub struct Query {
    entries: BTreeMap<String, ServiceFilter>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, filter: impl Into<ServiceFilter>) -> Self {
        self.insert(key, filter);
        self
    }

    /// Add or replace the criteria for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        filter: impl Into<ServiceFilter>,
    ) -> Option<ServiceFilter> {
        self.entries.insert(key.into(), filter.into())
    }

    /// Decode a query from JSON.
    ///
    /// The value must be an object whose members are each a valid filter; the
    /// whole query is checked before any lookup runs.
    pub fn from_value(value: &Value) -> Result<Self, ResolveError> {
        let Value::Object(members) = value else {
            return Err(ResolveError::InvalidArgument(format!(
                "query must be an object, got {value}"
            )));
        };
        let mut query = Self::new();
        for (key, criteria) in members {
            let filter = ServiceFilter::from_value(criteria).map_err(|err| match err {
                ResolveError::InvalidArgument(detail) => {
                    ResolveError::InvalidArgument(format!("{key}: {detail}"))
                }
                other => other,
            })?;
            query.insert(key.clone(), filter);
        }
        Ok(query)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceFilter)> {
        self.entries.iter().map(|(key, filter)| (key.as_str(), filter))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, F> FromIterator<(K, F)> for Query
where
    K: Into<String>,
    F: Into<ServiceFilter>,
{
    fn from_iter<I: IntoIterator<Item = (K, F)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, filter) in iter {
            query.insert(key, filter);
        }
        query
    }
}

impl TryFrom<&Value> for Query {
    type Error = ResolveError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Query::from_value(value)
    }
}

/// Resolve every key of `query` against `catalog`, falling back to `defaults`.
///
/// Returns either a mapping with one entry per key or the first error hit.
/// The defaults mapping lives only for the duration of this call.
pub fn resolve<D>(
    catalog: &ServiceCatalog,
    query: &Query,
    defaults: &D,
) -> Result<ResolvedServices, ResolveError>
where
    D: DefaultsSource + ?Sized,
{
    let mut fallback: Option<DefaultServices> = None;
    let mut resolved = ResolvedServices::new();

    for (key, filter) in query.iter() {
        let credentials = match catalog.credentials(key, filter) {
            Ok(credentials) => credentials.clone(),
            Err(ResolveError::NotFound { .. }) => {
                let loaded = match fallback {
                    Some(ref loaded) => loaded,
                    None => &*fallback.insert(defaults.load_defaults()?),
                };
                let Some(value) = loaded.get(key) else {
                    return Err(ResolveError::NotFound {
                        key: key.to_string(),
                    });
                };
                debug!(
                    key,
                    path = %loaded.source().map(|p| p.display().to_string()).unwrap_or_default(),
                    "no bound service matches; returning default configuration"
                );
                value.clone()
            }
            Err(err) => return Err(err),
        };
        resolved.insert(key.to_string(), credentials);
    }

    Ok(resolved)
}
