//! Update result summary types
//!
//! Provides structures for tracking update results at manifest, input and
//! overall levels.

use super::DependencyChange;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Changes made to a single manifest during its update pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestReport {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Package name, if declared
    pub name: Option<String>,
    /// Package version when the update pass started
    pub version: String,
    /// Reported dependency changes, sorted by name
    pub changes: Vec<DependencyChange>,
}

impl ManifestReport {
    /// Creates an empty report
    pub fn new(path: impl Into<PathBuf>, name: Option<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name,
            version: version.into(),
            changes: Vec::new(),
        }
    }

    /// Returns true if any dependency change was reported
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// A package whose own version moved during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionUpdate {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Package name, if declared
    pub name: Option<String>,
    /// Version at load time
    pub from: String,
    /// Version after bumping and alignment
    pub to: String,
}

/// Result of processing one top-level input manifest and its workspaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSummary {
    /// Path of the top-level manifest
    pub path: PathBuf,
    /// Reports in processing order (workspaces before their root)
    pub manifests: Vec<ManifestReport>,
    /// Package versions changed by bumping or alignment
    pub versions: Vec<VersionUpdate>,
    /// Version every workspace package was aligned to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aligned: Option<String>,
    /// Whether this manifest or any of its workspaces changed
    pub changed: bool,
}

impl InputSummary {
    /// Creates an empty summary for an input
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            manifests: Vec::new(),
            versions: Vec::new(),
            aligned: None,
            changed: false,
        }
    }

    /// Returns the number of reported dependency changes
    pub fn total_changes(&self) -> usize {
        self.manifests.iter().map(|m| m.changes.len()).sum()
    }
}

/// Overall summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    /// Results for each input, in input order
    pub inputs: Vec<InputSummary>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl UpdateSummary {
    /// Creates a new UpdateSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            inputs: Vec::new(),
            dry_run,
        }
    }

    /// Adds the result of one input
    pub fn add_input(&mut self, input: InputSummary) {
        self.inputs.push(input);
    }

    /// Returns true if any input changed
    pub fn has_changes(&self) -> bool {
        self.inputs.iter().any(|i| i.changed)
    }

    /// Returns the total number of dependency changes across all inputs
    pub fn total_changes(&self) -> usize {
        self.inputs.iter().map(|i| i.total_changes()).sum()
    }

    /// Returns all manifest reports across inputs
    pub fn manifests(&self) -> impl Iterator<Item = &ManifestReport> {
        self.inputs.iter().flat_map(|i| i.manifests.iter())
    }
}

impl Default for UpdateSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
