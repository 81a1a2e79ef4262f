//! package.json handling
//!
//! This module provides:
//! - PackageDocument: order-preserving package.json model
//! - ManifestNode: a manifest and its workspace members
//! - File reading and writing helpers

mod node;
mod package_json;
mod writer;

pub use node::{ManifestNode, NodeContext, UpdateOptions};
pub use package_json::PackageDocument;
pub use writer::{read_manifest, write_manifest};
