//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with package.json loading, versions and writing
//! - WorkspaceError: Integrity violations of the shared workspace registry
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with input patterns and registry configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Workspace registry consistency errors
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// The document is valid JSON but not an object
    #[error("file {path} is not a valid \"package.json\" file")]
    InvalidManifest { path: PathBuf },

    /// The package version is not a semantic version
    #[error("invalid version '{version}' in {path}")]
    InvalidVersion { path: PathBuf, version: String },

    /// Attempt to move a package version below the one it was loaded with
    #[error("unable to set version for {path} to {attempted}: less than original version {original}")]
    VersionBelowOriginal {
        path: PathBuf,
        original: String,
        attempted: String,
    },

    /// Attempt to move a package version below its current (bumped) one
    #[error("unable to set version for {path} to {attempted}: less than current version {current}")]
    VersionBelowCurrent {
        path: PathBuf,
        current: String,
        attempted: String,
    },
}

/// Errors raised by the workspace registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// Package name registered twice
    #[error("package '{name}' already registered")]
    DuplicatePackage { name: String },

    /// Update for a package that was never registered
    #[error("package '{name}' not registered")]
    UnknownPackage { name: String },

    /// Update that would move a package version backwards
    #[error("package '{name}' new version {attempted} less than old {current}")]
    VersionRegression {
        name: String,
        current: String,
        attempted: String,
    },
}

/// Errors related to package registry communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Authentication error
    #[error("authentication failed for {registry}: {message}")]
    AuthenticationError { registry: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid file or workspace glob pattern
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Failed to read a registry configuration file
    #[error("failed to read registry configuration {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidManifest error
    pub fn invalid_manifest(path: impl Into<PathBuf>) -> Self {
        ManifestError::InvalidManifest { path: path.into() }
    }
}

impl WorkspaceError {
    /// Creates a new DuplicatePackage error
    pub fn duplicate_package(name: impl Into<String>) -> Self {
        WorkspaceError::DuplicatePackage { name: name.into() }
    }

    /// Creates a new UnknownPackage error
    pub fn unknown_package(name: impl Into<String>) -> Self {
        WorkspaceError::UnknownPackage { name: name.into() }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}
