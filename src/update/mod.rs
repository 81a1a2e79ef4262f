//! Dependency range resolution
//!
//! This module provides:
//! - VersionCatalog: per-run, de-duplicated cache of published versions
//! - RangeResolver: picks the newest version satisfying a declared range

mod catalog;

pub use catalog::VersionCatalog;

use crate::domain::RangeSpec;
use crate::error::RegistryError;
use crate::registry::RegistryConfig;
use semver::Version;
use std::sync::Arc;
use tracing::debug;

/// Resolves declared caret/tilde ranges against the catalog
#[derive(Clone)]
pub struct RangeResolver {
    catalog: Arc<VersionCatalog>,
    strict: bool,
}

impl RangeResolver {
    /// Create a resolver; `strict` keeps the operators' own semver semantics
    pub fn new(catalog: Arc<VersionCatalog>, strict: bool) -> Self {
        Self { catalog, strict }
    }

    /// Compute the effective range for a declared dependency.
    ///
    /// Workspace members and unsupported specifiers come back unchanged, as
    /// does any range no catalog version satisfies. Only fetch failures are
    /// errors.
    pub async fn resolve(
        &self,
        name: &str,
        declared: &str,
        is_workspace_member: bool,
        config: &RegistryConfig,
    ) -> Result<String, RegistryError> {
        if is_workspace_member {
            debug!("Not processing workspace package {}", name);
            return Ok(declared.to_string());
        }

        let Some(spec) = RangeSpec::parse(declared) else {
            debug!("Not processing range {} for {}", declared, name);
            return Ok(declared.to_string());
        };

        let requirement = spec.requirement(self.strict);
        if !self.strict {
            debug!(
                "Extending version for {} from {} to {}",
                name, declared, requirement
            );
        }

        let versions = self
            .catalog
            .get_versions(name, config, spec.is_prerelease())
            .await?;

        let best = versions.iter().find(|candidate| {
            Version::parse(candidate)
                .map(|v| requirement.matches(&v))
                .unwrap_or(false)
        });

        match best {
            Some(version) => Ok(spec.format_updated(version)),
            None => {
                debug!("No version of {} satisfies {}", name, declared);
                Ok(declared.to_string())
            }
        }
    }
}
