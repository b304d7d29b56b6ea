//! Failure modes of a service lookup.
//!
//! Every variant aborts the whole call; there is no partial result to
//! recover. Callers match on the variant rather than the message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The query itself is malformed, detected before any matching.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Found {count} services matching {key}")]
    AmbiguousMatch { key: String, count: usize },

    #[error("No service matches {key}")]
    NotFound { key: String },

    #[error("Could not parse {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // anyhow::Error is not a std error, so the chain is folded into the message.
    #[error("Could not load service catalog: {0:#}")]
    Catalog(anyhow::Error),
}

impl ResolveError {
    /// Query key the failure refers to, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            ResolveError::AmbiguousMatch { key, .. } | ResolveError::NotFound { key } => {
                Some(key.as_str())
            }
            _ => None,
        }
    }
}
