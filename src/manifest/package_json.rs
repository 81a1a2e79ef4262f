//! package.json document model
//!
//! The document is kept as an ordered JSON object so fields the updater does
//! not know about survive a rewrite in their original position.

use crate::domain::DependencyKind;
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::path::Path;

/// An in-memory package.json
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDocument {
    root: Map<String, Value>,
}

impl PackageDocument {
    /// Parse package.json content, rejecting anything but a JSON object
    pub fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        match json {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ManifestError::invalid_manifest(path)),
        }
    }

    /// Package name
    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    /// Declared package version
    pub fn version(&self) -> Option<&str> {
        self.root.get("version").and_then(Value::as_str)
    }

    /// Replace the package version
    pub fn set_version(&mut self, version: &str) {
        self.root
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Workspace entries, from either `"workspaces": [...]` or
    /// `"workspaces": { "packages": [...] }`
    pub fn workspaces(&self) -> Vec<String> {
        let entries = match self.root.get("workspaces") {
            Some(Value::Array(entries)) => entries,
            Some(Value::Object(config)) => match config.get("packages") {
                Some(Value::Array(entries)) => entries,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };
        entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }

    /// String-valued entries of a dependency group, in document order
    pub fn dependencies(&self, kind: DependencyKind) -> Vec<(String, String)> {
        self.group(kind)
            .map(|deps| {
                deps.iter()
                    .filter_map(|(name, value)| {
                        value.as_str().map(|range| (name.clone(), range.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Declared range of one dependency
    pub fn dependency(&self, kind: DependencyKind, name: &str) -> Option<&str> {
        self.group(kind)?.get(name)?.as_str()
    }

    /// Overwrite the declared range of an existing dependency
    pub fn set_dependency(&mut self, kind: DependencyKind, name: &str, range: &str) -> bool {
        match self.root.get_mut(kind.key()).and_then(Value::as_object_mut) {
            Some(deps) if deps.contains_key(name) => {
                deps.insert(name.to_string(), Value::String(range.to_string()));
                true
            }
            _ => false,
        }
    }

    /// Sort every dependency group by name and drop empty groups
    pub fn normalize_dependencies(&mut self) {
        for kind in DependencyKind::all() {
            let Some(Value::Object(deps)) = self.root.get_mut(kind.key()) else {
                continue;
            };
            if deps.is_empty() {
                self.root.shift_remove(kind.key());
                continue;
            }
            let mut entries: Vec<(String, Value)> = std::mem::take(deps).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            deps.extend(entries);
        }
    }

    /// Serialize with two-space indentation and a trailing newline
    pub fn to_json_string(&self, path: &Path) -> Result<String, ManifestError> {
        let mut json = serde_json::to_string_pretty(&self.root)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    fn group(&self, kind: DependencyKind) -> Option<&Map<String, Value>> {
        self.root.get(kind.key()).and_then(Value::as_object)
    }
}
