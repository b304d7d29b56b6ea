//! Local fallback configuration for services missing from the catalog.
//!
//! The defaults file maps logical service names to credentials objects. It is
//! meant for local development, so a missing file is not an error; a file that
//! exists but does not hold a JSON object is.

use crate::DEFAULT_SERVICES_FILE;
use crate::error::ResolveError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Which defaults file, if any, backs a lookup.
pub enum DefaultsFile {
    /// Never consult a defaults file.
    Disabled,
    /// `default-services.json` in the current working directory.
    #[default]
    Conventional,
    Path(PathBuf),
}

impl DefaultsFile {
    /// Map an optional caller argument onto a selector.
    ///
    /// `None` disables defaults; an empty string falls back to the
    /// conventional file name, same as passing nothing at all.
    pub fn from_option(path: Option<&str>) -> Self {
        match path {
            None => DefaultsFile::Disabled,
            Some(path) => DefaultsFile::from(path),
        }
    }

    /// The file to read, or `None` when defaults are disabled.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DefaultsFile::Disabled => None,
            DefaultsFile::Conventional => Some(Path::new(DEFAULT_SERVICES_FILE)),
            DefaultsFile::Path(path) => Some(path.as_path()),
        }
    }
}

impl From<&str> for DefaultsFile {
    fn from(path: &str) -> Self {
        if path.is_empty() {
            DefaultsFile::Conventional
        } else {
            DefaultsFile::Path(PathBuf::from(path))
        }
    }
}

impl From<PathBuf> for DefaultsFile {
    fn from(path: PathBuf) -> Self {
        if path.as_os_str().is_empty() {
            DefaultsFile::Conventional
        } else {
            DefaultsFile::Path(path)
        }
    }
}

impl From<&Path> for DefaultsFile {
    fn from(path: &Path) -> Self {
        DefaultsFile::from(path.to_path_buf())
    }
}

/// Produces the defaults mapping for one lookup.
///
/// The resolver calls `load_defaults` at most once per call, and only after
/// some key has no live match.
pub trait DefaultsSource {
    fn load_defaults(&self) -> Result<DefaultServices, ResolveError>;
}

impl DefaultsSource for DefaultsFile {
    fn load_defaults(&self) -> Result<DefaultServices, ResolveError> {
        DefaultServices::load(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Logical service name to credentials, as read from a defaults file.
pub struct DefaultServices {
    source: Option<PathBuf>,
    entries: Map<String, Value>,
}

impl DefaultServices {
    /// Load the mapping selected by `file`.
    ///
    /// Performs at most one existence check and one read. Disabled or absent
    /// files yield an empty mapping.
    pub fn load(file: &DefaultsFile) -> Result<Self, ResolveError> {
        let Some(path) = file.path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "no default service configuration");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading default service configuration");
        let data = fs::read(path).map_err(|source| ResolveError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        // Encoding problems are parse failures, not I/O failures.
        let entries: Map<String, Value> =
            serde_json::from_slice(&data).map_err(|source| ResolveError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            source: Some(path.to_path_buf()),
            entries,
        })
    }

    /// In-memory mapping not backed by any file.
    pub fn from_entries(entries: Map<String, Value>) -> Self {
        Self {
            source: None,
            entries,
        }
    }

    /// Credentials configured for `key`. A JSON `null` entry counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|value| !value.is_null())
    }

    /// File the mapping was read from, if one was read.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
