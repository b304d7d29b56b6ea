//! Decoding the catalog from the platform environment.
//!
//! The platform injects a JSON object keyed by service label, each value an
//! array of bound instances. The snapshot flattens those groups in label order.

use crate::SERVICES_ENV_VAR;
use crate::catalog::index::ServiceCatalog;
use crate::catalog::model::ServiceDescriptor;
use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::env::{self, VarError};
use tracing::debug;

impl ServiceCatalog {
    /// Parse a catalog blob. Blank input yields an empty catalog.
    pub fn from_json(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let groups: BTreeMap<String, Vec<ServiceDescriptor>> =
            serde_json::from_str(raw).context("parsing service catalog JSON")?;

        let mut services = Vec::new();
        for (label, group) in groups {
            for mut service in group {
                if service.label.is_empty() {
                    service.label = label.clone();
                }
                services.push(service);
            }
        }
        Ok(Self::new(services))
    }

    /// Read the catalog from an arbitrary environment variable.
    ///
    /// An unset variable is an empty catalog, which is the normal state when
    /// running outside the platform.
    pub fn from_env_var(name: &str) -> Result<Self> {
        let raw = match env::var(name) {
            Ok(raw) => raw,
            Err(VarError::NotPresent) => {
                debug!(var = name, "service catalog variable not set");
                return Ok(Self::default());
            }
            Err(VarError::NotUnicode(_)) => bail!("{name} is not valid UTF-8"),
        };
        let catalog = Self::from_json(&raw).with_context(|| format!("reading {name}"))?;
        debug!(var = name, services = catalog.len(), "loaded service catalog");
        Ok(catalog)
    }

    /// Read the catalog from `VCAP_SERVICES`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(SERVICES_ENV_VAR)
    }
}
