//! Service catalog wiring.
//!
//! This module wraps the bound-service list the platform injects into the
//! process so the resolver can query a consistent snapshot. `model` mirrors
//! one catalog entry, `filter` describes match criteria, `index` holds the
//! snapshot and runs lookups, and `source` decodes it from the environment.

pub mod filter;
pub mod index;
pub mod model;
pub mod source;

pub use filter::ServiceFilter;
pub use index::ServiceCatalog;
pub use model::ServiceDescriptor;
