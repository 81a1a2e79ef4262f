//! Core domain models
//!
//! This module contains the fundamental types used throughout the application:
//! - Declared range specifiers (caret/tilde) and their matching windows
//! - Dependency groups and change records
//! - Version bump levels
//! - Summary and result structures

mod bump;
mod dependency;
mod summary;
mod version_spec;

pub use bump::BumpLevel;
pub use dependency::{DependencyChange, DependencyKind};
pub use summary::{InputSummary, ManifestReport, UpdateSummary, VersionUpdate};
pub use version_spec::{RangeOperator, RangeSpec};
