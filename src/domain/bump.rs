//! Package version increments

use clap::ValueEnum;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic version component to advance when a package changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

impl BumpLevel {
    /// Increment `version` by this level.
    ///
    /// A prerelease is released rather than skipped over: `1.0.0-rc.1`
    /// bumps to `1.0.0` at every level that would otherwise land there.
    pub fn apply(&self, version: &Version) -> Version {
        let pre = !version.pre.is_empty();
        let mut next = version.clone();
        next.pre = Prerelease::EMPTY;
        next.build = BuildMetadata::EMPTY;

        match self {
            BumpLevel::Major => {
                if !(pre && version.minor == 0 && version.patch == 0) {
                    next.major = next.major.saturating_add(1);
                }
                next.minor = 0;
                next.patch = 0;
            }
            BumpLevel::Minor => {
                if !(pre && version.patch == 0) {
                    next.minor = next.minor.saturating_add(1);
                }
                next.patch = 0;
            }
            BumpLevel::Patch => {
                if !pre {
                    next.patch = next.patch.saturating_add(1);
                }
            }
        }
        next
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BumpLevel::Major => "major",
            BumpLevel::Minor => "minor",
            BumpLevel::Patch => "patch",
        };
        write!(f, "{}", label)
    }
}
