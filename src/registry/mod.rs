//! Registry adapters for fetching package metadata
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm registry adapter
//! - Registry configuration merged from `.npmrc` files

mod client;
mod config;
mod npm;

pub use client::HttpClient;
pub use config::RegistryConfig;
pub use npm::NpmRegistry;

use crate::error::RegistryError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Metadata for a single published version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMetadata {
    /// Whether the publisher deprecated this version
    pub deprecated: bool,
}

/// Published versions of a package keyed by version string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    pub versions: HashMap<String, VersionMetadata>,
}

impl PackageMetadata {
    /// Build metadata from `(version, deprecated)` pairs
    pub fn from_versions<'a>(versions: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        Self {
            versions: versions
                .into_iter()
                .map(|(v, deprecated)| (v.to_string(), VersionMetadata { deprecated }))
                .collect(),
        }
    }
}

/// Source of package metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch every published version of a package
    async fn fetch_metadata(
        &self,
        package: &str,
        config: &RegistryConfig,
    ) -> Result<PackageMetadata, RegistryError>;
}
