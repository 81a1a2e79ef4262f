//! Workspace registry
//!
//! Tracks the current version of every package in a workspace tree and
//! notifies observers, in subscription order, whenever one of them moves
//! forward. Observers may record further updates from inside a
//! notification; no lock is held while they run.

use crate::error::WorkspaceError;
use semver::Version;
use std::sync::{Arc, Mutex, MutexGuard};

/// Receives workspace version changes
pub trait WorkspaceObserver: Send + Sync {
    /// Called once for every version change recorded in `registry`
    fn on_version_change(
        &self,
        registry: &WorkspaceRegistry,
        name: &str,
        version: &Version,
    ) -> Result<(), WorkspaceError>;
}

/// Shared name → version table of a workspace
#[derive(Default)]
pub struct WorkspaceRegistry {
    // Registration order is kept for iteration
    versions: Mutex<Vec<(String, Version)>>,
    observers: Mutex<Vec<Arc<dyn WorkspaceObserver>>>,
}

impl WorkspaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package, defaulting to `0.0.0` when it has no version
    pub fn register(&self, name: &str, version: Option<Version>) -> Result<(), WorkspaceError> {
        let mut versions = self.lock_versions();
        if versions.iter().any(|(n, _)| n == name) {
            return Err(WorkspaceError::duplicate_package(name));
        }
        versions.push((name.to_string(), version.unwrap_or(Version::new(0, 0, 0))));
        Ok(())
    }

    /// Record a new version for a registered package.
    ///
    /// Equal versions are ignored; lower ones are rejected. A higher version
    /// is stored and then delivered to every observer.
    pub fn record_update(&self, name: &str, version: &Version) -> Result<(), WorkspaceError> {
        {
            let mut versions = self.lock_versions();
            let entry = versions
                .iter_mut()
                .find(|(n, _)| n == name)
                .ok_or_else(|| WorkspaceError::unknown_package(name))?;

            if *version < entry.1 {
                return Err(WorkspaceError::VersionRegression {
                    name: name.to_string(),
                    current: entry.1.to_string(),
                    attempted: version.to_string(),
                });
            }
            if *version == entry.1 {
                return Ok(());
            }
            entry.1 = version.clone();
        }

        let observers: Vec<Arc<dyn WorkspaceObserver>> = self.lock_observers().clone();
        for observer in observers {
            observer.on_version_change(self, name, version)?;
        }
        Ok(())
    }

    /// Add an observer; delivery follows subscription order
    pub fn subscribe(&self, observer: Arc<dyn WorkspaceObserver>) {
        self.lock_observers().push(observer);
    }

    /// Returns true if a package with this name is registered
    pub fn has(&self, name: &str) -> bool {
        self.lock_versions().iter().any(|(n, _)| n == name)
    }

    /// Snapshot of all `(name, version)` pairs in registration order
    pub fn entries(&self) -> Vec<(String, Version)> {
        self.lock_versions().clone()
    }

    fn lock_versions(&self) -> MutexGuard<'_, Vec<(String, Version)>> {
        self.versions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<Arc<dyn WorkspaceObserver>>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
