//! Snapshot of the bound services visible to the process.
//!
//! The catalog is immutable once built. `filter` never fails: an empty match
//! list is an ordinary answer. `credentials` applies the one-match rule a
//! lookup key needs.

use crate::catalog::filter::ServiceFilter;
use crate::catalog::model::ServiceDescriptor;
use crate::error::ResolveError;
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq)]
/// Ordered list of service descriptors read at one point in time.
pub struct ServiceCatalog {
    services: Vec<ServiceDescriptor>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Descriptors satisfying `filter`, in catalog order.
    pub fn filter(&self, filter: &ServiceFilter) -> Vec<&ServiceDescriptor> {
        self.services
            .iter()
            .filter(|service| filter.matches(service))
            .collect()
    }

    /// Credentials of the single descriptor matching `filter`.
    ///
    /// `key` is the logical name the caller is resolving; it is what errors
    /// report.
    pub fn credentials(&self, key: &str, filter: &ServiceFilter) -> Result<&Value, ResolveError> {
        match self.filter(filter).as_slice() {
            [service] => Ok(&service.credentials),
            [] => Err(ResolveError::NotFound {
                key: key.to_string(),
            }),
            many => Err(ResolveError::AmbiguousMatch {
                key: key.to_string(),
                count: many.len(),
            }),
        }
    }
}

impl FromIterator<ServiceDescriptor> for ServiceCatalog {
    fn from_iter<I: IntoIterator<Item = ServiceDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
