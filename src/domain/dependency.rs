//! Dependency groups and change records

use serde::{Deserialize, Serialize};
use std::fmt;

/// The dependency groups of a package.json, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `dependencies`
    Main,
    /// `devDependencies`
    Dev,
    /// `peerDependencies`
    Peer,
    /// `optionalDependencies`
    Optional,
}

impl DependencyKind {
    /// All dependency groups, main first
    pub fn all() -> &'static [DependencyKind] {
        &[
            DependencyKind::Main,
            DependencyKind::Dev,
            DependencyKind::Peer,
            DependencyKind::Optional,
        ]
    }

    /// The key of this group in package.json
    pub fn key(&self) -> &'static str {
        match self {
            DependencyKind::Main => "dependencies",
            DependencyKind::Dev => "devDependencies",
            DependencyKind::Peer => "peerDependencies",
            DependencyKind::Optional => "optionalDependencies",
        }
    }

    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Main => "main",
            DependencyKind::Dev => "dev",
            DependencyKind::Peer => "peer",
            DependencyKind::Optional => "optional",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A dependency whose declared range was rewritten during an update pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChange {
    /// Package name
    pub name: String,
    /// Range as declared before the update
    pub declared: String,
    /// Range after resolution
    pub updated: String,
    /// Group the dependency was declared in
    pub kind: DependencyKind,
}

impl DependencyChange {
    /// Creates a new change record
    pub fn new(
        name: impl Into<String>,
        declared: impl Into<String>,
        updated: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        Self {
            name: name.into(),
            declared: declared.into(),
            updated: updated.into(),
            kind,
        }
    }
}

impl fmt::Display for DependencyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} [{}]",
            self.name, self.declared, self.updated, self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_keys() {
        assert_eq!(DependencyKind::Main.key(), "dependencies");
        assert_eq!(DependencyKind::Dev.key(), "devDependencies");
        assert_eq!(DependencyKind::Peer.key(), "peerDependencies");
        assert_eq!(DependencyKind::Optional.key(), "optionalDependencies");
    }

    #[test]
    fn test_all_starts_with_main() {
        assert_eq!(DependencyKind::all()[0], DependencyKind::Main);
        assert_eq!(DependencyKind::all().len(), 4);
    }

    #[test]
    fn test_change_display() {
        let change = DependencyChange::new("lodash", "^4.0.0", "^4.17.21", DependencyKind::Dev);
        assert_eq!(change.to_string(), "lodash: ^4.0.0 -> ^4.17.21 [dev]");
    }

    #[test]
    fn test_serde_kind() {
        let json = serde_json::to_string(&DependencyKind::Optional).unwrap();
        assert_eq!(json, "\"optional\"");
    }
}
