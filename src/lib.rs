//! Lookup of bound platform services.
//!
//! Applications describe the services they need as a [`Query`]: logical names
//! mapped to [`ServiceFilter`] criteria. [`get_services`] matches each entry
//! against the catalog the platform injects through `VCAP_SERVICES` and falls
//! back to a local `default-services.json` for anything not bound, which keeps
//! local development working without a platform.
//!
//! Lookups are all-or-nothing: a key with several matching instances, or with
//! no match and no default, fails the whole call with a [`ResolveError`]
//! naming the key.

pub mod catalog;
pub mod defaults;
pub mod error;
pub mod resolver;

pub use catalog::{ServiceCatalog, ServiceDescriptor, ServiceFilter};
pub use defaults::{DefaultServices, DefaultsFile, DefaultsSource};
pub use error::ResolveError;
pub use resolver::{Query, ResolvedServices, resolve};

use serde_json::Value;

/// Environment variable the platform uses to publish bound services.
pub const SERVICES_ENV_VAR: &str = "VCAP_SERVICES";

/// Defaults file consulted when the caller does not name one.
pub const DEFAULT_SERVICES_FILE: &str = "default-services.json";

/// Resolve `query` against the services bound to this process.
///
/// The catalog is read fresh from `VCAP_SERVICES` on every call; an unset
/// variable behaves like an empty catalog so every key goes to `defaults`.
pub fn get_services(
    query: &Query,
    defaults: &DefaultsFile,
) -> Result<ResolvedServices, ResolveError> {
    let catalog = ServiceCatalog::from_env().map_err(ResolveError::Catalog)?;
    resolve(&catalog, query, defaults)
}

/// Same as [`get_services`] for a query given as JSON.
///
/// The query shape is validated before the catalog is read.
pub fn get_services_from_value(
    query: &Value,
    defaults: &DefaultsFile,
) -> Result<ResolvedServices, ResolveError> {
    let query = Query::from_value(query)?;
    get_services(&query, defaults)
}
