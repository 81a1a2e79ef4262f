//! npm Registry adapter
//!
//! Fetches package metadata from the npm registry.
//! API endpoint: {registry}/{package}

use crate::error::RegistryError;
use crate::registry::client::RequestOptions;
use crate::registry::{HttpClient, MetadataSource, PackageMetadata, RegistryConfig, VersionMetadata};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Accept header asking for abbreviated ("corgi") metadata
const ABBREVIATED_METADATA: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

/// npm Registry adapter
pub struct NpmRegistry {
    client: HttpClient,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(default)]
    versions: HashMap<String, NpmVersion>,
}

#[derive(Debug, Deserialize)]
struct NpmVersion {
    #[serde(default)]
    deprecated: Option<Value>,
}

impl NpmVersion {
    fn is_deprecated(&self) -> bool {
        match &self.deprecated {
            Some(Value::String(message)) => !message.is_empty(),
            Some(Value::Bool(flag)) => *flag,
            _ => false,
        }
    }
}

impl NpmRegistry {
    /// Create a new npm adapter
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the URL for a package (scoped names keep their `@` but escape `/`)
    fn build_url(registry_url: &str, package: &str) -> String {
        format!("{}{}", registry_url, package.replace('/', "%2F"))
    }
}

#[async_trait]
impl MetadataSource for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_metadata(
        &self,
        package: &str,
        config: &RegistryConfig,
    ) -> Result<PackageMetadata, RegistryError> {
        let registry_url = config.registry_url(package);
        let url = Self::build_url(&registry_url, package);
        debug!("Fetching {}", url);

        let options = RequestOptions {
            accept: Some(ABBREVIATED_METADATA),
            bearer: config.auth_token(&registry_url),
        };
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name(), options)
            .await?;

        let versions = response
            .versions
            .into_iter()
            .map(|(version, info)| {
                let deprecated = info.is_deprecated();
                (version, VersionMetadata { deprecated })
            })
            .collect();

        Ok(PackageMetadata { versions })
    }
}
