//! Registry configuration merged from `.npmrc` files
//!
//! Files are read lowest priority first:
//! - global: `$NPM_CONFIG_GLOBALCONFIG` or `/etc/npmrc`
//! - user: `$NPM_CONFIG_USERCONFIG` or `$HOME/.npmrc`
//! - project: `.npmrc` next to the package.json
//!
//! The update engine never looks inside; only the npm adapter reads the
//! `registry`, `@scope:registry` and `//host/path/:_authToken` keys.

use crate::error::ConfigError;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Registry used when no configuration overrides it
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{?([^}]*)\}?$").expect("env pattern is valid"));

/// Flat key/value registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    values: BTreeMap<String, String>,
}

impl RegistryConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a raw configuration value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Load and merge the configuration applicable to a manifest file
    pub fn load_for(manifest: &Path) -> Result<Self, ConfigError> {
        let global = std::env::var_os("NPM_CONFIG_GLOBALCONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/etc/npmrc"));
        let user = std::env::var_os("NPM_CONFIG_USERCONFIG")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".npmrc")));
        let project = manifest
            .parent()
            .map(|dir| dir.join(".npmrc"))
            .unwrap_or_else(|| PathBuf::from(".npmrc"));

        let mut config = Self::new();
        config.merge_file(&global)?;
        if let Some(user) = user {
            config.merge_file(&user)?;
        }
        config.merge_file(&project)?;
        Ok(config)
    }

    /// Merge an npmrc file on top of this configuration; missing files are ignored
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                self.merge_str(&content);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Merge npmrc formatted content on top of this configuration
    pub fn merge_str(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim());
            self.values
                .insert(key.trim().to_string(), substitute_env(value));
        }
    }

    /// Registry base URL for a package, honouring `@scope:registry`
    pub fn registry_url(&self, package: &str) -> String {
        let scoped = package
            .strip_prefix('@')
            .and_then(|rest| rest.split_once('/'))
            .and_then(|(scope, _)| self.get(&format!("@{}:registry", scope)));

        let url = scoped
            .or_else(|| self.get("registry"))
            .unwrap_or(DEFAULT_REGISTRY);
        if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        }
    }

    /// Auth token configured for a registry URL (`//host/path/:_authToken`)
    pub fn auth_token(&self, registry_url: &str) -> Option<&str> {
        let nerfed = registry_url
            .split_once("//")
            .map(|(_, rest)| format!("//{}", rest))?;
        self.get(&format!("{}:_authToken", nerfed))
            .filter(|token| !token.is_empty())
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn substitute_env(value: &str) -> String {
    match ENV_REFERENCE.captures(value) {
        Some(caps) => std::env::var(&caps[1]).unwrap_or_default(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_registry() {
        let config = RegistryConfig::new();
        assert_eq!(config.registry_url("lodash"), DEFAULT_REGISTRY);
    }

    #[test]
    fn test_merge_str_parses_keys() {
        let mut config = RegistryConfig::new();
        config.merge_str(
            "# comment\n; another\nregistry = https://npm.example.com\n\n@acme:registry=\"https://acme.example.com/npm/\"\n",
        );
        assert_eq!(config.registry_url("lodash"), "https://npm.example.com/");
        assert_eq!(
            config.registry_url("@acme/widgets"),
            "https://acme.example.com/npm/"
        );
        assert_eq!(
            config.registry_url("@other/widgets"),
            "https://npm.example.com/"
        );
    }

    #[test]
    fn test_later_values_override() {
        let mut config = RegistryConfig::new();
        config.merge_str("registry=https://one.example.com/");
        config.merge_str("registry=https://two.example.com/");
        assert_eq!(config.get("registry"), Some("https://two.example.com/"));
    }

    #[test]
    fn test_env_substitution() {
        let mut config = RegistryConfig::new();
        config.merge_str("//npm.example.com/:_authToken=${PKGBUMP_TEST_SURELY_UNSET_TOKEN}");
        assert_eq!(
            config.get("//npm.example.com/:_authToken"),
            Some("")
        );
        assert_eq!(config.auth_token("https://npm.example.com/"), None);

        let path = std::env::var("PATH").unwrap_or_default();
        config.merge_str("path_value=$PATH");
        assert_eq!(config.get("path_value"), Some(path.as_str()));
    }

    #[test]
    fn test_auth_token_lookup() {
        let config = RegistryConfig::new()
            .with("//npm.example.com/private/:_authToken", "abc123");
        assert_eq!(
            config.auth_token("https://npm.example.com/private/"),
            Some("abc123")
        );
        assert_eq!(config.auth_token("https://npm.example.com/"), None);
    }

    #[test]
    fn test_merge_file_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut config = RegistryConfig::new();
        config.merge_file(&dir.path().join(".npmrc")).unwrap();
        assert_eq!(config, RegistryConfig::new());
    }

    #[test]
    fn test_merge_file_reads_project_npmrc() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".npmrc"), "registry=https://local.example.com/\n")
            .unwrap();
        let mut config = RegistryConfig::new();
        config.merge_file(&dir.path().join(".npmrc")).unwrap();
        assert_eq!(config.registry_url("x"), "https://local.example.com/");
    }
}
