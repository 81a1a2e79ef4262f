//! Version catalog
//!
//! Caches, per package, the published versions newest first. Concurrent
//! lookups for the same key share a single in-flight fetch; failed fetches
//! are forgotten so a later lookup can retry.

use crate::error::RegistryError;
use crate::registry::{MetadataSource, PackageMetadata, RegistryConfig};
use futures::future::{BoxFuture, FutureExt, Shared};
use semver::Version;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

type VersionList = Arc<Vec<String>>;
type PendingVersions = Shared<BoxFuture<'static, Result<VersionList, RegistryError>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CatalogKey {
    name: String,
    include_prerelease: bool,
}

/// Per-run cache of available versions
pub struct VersionCatalog {
    source: Arc<dyn MetadataSource>,
    entries: Mutex<HashMap<CatalogKey, PendingVersions>>,
}

impl VersionCatalog {
    /// Create an empty catalog backed by a metadata source
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Pre-populate an entry without fetching.
    ///
    /// The versions are filtered and sorted exactly like fetched ones.
    pub fn seed<'a>(
        &self,
        name: &str,
        include_prerelease: bool,
        versions: impl IntoIterator<Item = &'a str>,
    ) {
        let metadata = PackageMetadata::from_versions(versions.into_iter().map(|v| (v, false)));
        let list = Arc::new(available_versions(&metadata, include_prerelease));
        let key = CatalogKey {
            name: name.to_string(),
            include_prerelease,
        };
        let ready = futures::future::ready(Ok(list)).boxed().shared();
        self.lock_entries().insert(key, ready);
    }

    /// Available versions for a package, newest first
    pub async fn get_versions(
        &self,
        name: &str,
        config: &RegistryConfig,
        include_prerelease: bool,
    ) -> Result<VersionList, RegistryError> {
        let key = CatalogKey {
            name: name.to_string(),
            include_prerelease,
        };

        let pending = {
            let mut entries = self.lock_entries();
            match entries.get(&key) {
                Some(pending) => {
                    debug!("Returning cached versions for {}", name);
                    pending.clone()
                }
                None => {
                    debug!("Retrieving versions for package {}", name);
                    let source = Arc::clone(&self.source);
                    let package = name.to_string();
                    let config = config.clone();
                    let pending = async move {
                        let metadata = source.fetch_metadata(&package, &config).await?;
                        Ok(Arc::new(available_versions(&metadata, include_prerelease)))
                    }
                    .boxed()
                    .shared();
                    entries.insert(key.clone(), pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;
        if result.is_err() {
            let mut entries = self.lock_entries();
            if entries.get(&key).is_some_and(|p| p.ptr_eq(&pending)) {
                entries.remove(&key);
            }
        }
        result
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<CatalogKey, PendingVersions>> {
        // The map is only touched in short critical sections that cannot panic
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Non-deprecated, valid versions sorted newest first
fn available_versions(metadata: &PackageMetadata, include_prerelease: bool) -> Vec<String> {
    let mut versions: Vec<(Version, &String)> = metadata
        .versions
        .iter()
        .filter(|(_, info)| !info.deprecated)
        .filter_map(|(raw, _)| Version::parse(raw).ok().map(|parsed| (parsed, raw)))
        .filter(|(parsed, _)| include_prerelease || parsed.pre.is_empty())
        .collect();

    versions.sort_by(|(a, _), (b, _)| b.cmp(a));
    versions.into_iter().map(|(_, raw)| raw.clone()).collect()
}
