//! pkgbump - package.json dependency range updater library
//!
//! This library provides the core functionality for updating the declared
//! dependency ranges of package.json files:
//! - Caret and tilde range resolution against the npm registry
//! - npm workspaces with version propagation between members
//! - Package version bumping and workspace version alignment

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
pub mod workspace;
