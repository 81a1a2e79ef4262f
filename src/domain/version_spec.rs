//! Declared range specifiers
//!
//! Only the two shapes the updater rewrites are recognised:
//! - caret: `^1`, `^1.2`, `^1.2.3`, `^1.2.3-beta.1`
//! - tilde: `~1`, `~1.2`, `~1.2.3`, `~1.2.3-rc.0`
//!
//! Anything else (exact pins, `>=` ranges, `||` unions, tags, URLs) does not
//! parse and is left untouched by the resolver.

use regex::Regex;
use semver::{Comparator, Op, Prerelease, Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([~^])\s*(\d+)(?:\.(\d+)(?:\.(\d+))?)?(?:-([0-9A-Za-z][0-9A-Za-z.-]*))?\s*$")
        .expect("range pattern is valid")
});

/// Operator of a declared range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeOperator {
    /// Caret range (e.g., `^1.2.3`) - compatible with the leading nonzero component
    Caret,
    /// Tilde range (e.g., `~1.2.3`) - compatible within the same minor
    Tilde,
}

impl RangeOperator {
    /// The prefix written in front of the version
    pub fn prefix(&self) -> &'static str {
        match self {
            RangeOperator::Caret => "^",
            RangeOperator::Tilde => "~",
        }
    }

    fn op(&self) -> Op {
        match self {
            RangeOperator::Caret => Op::Caret,
            RangeOperator::Tilde => Op::Tilde,
        }
    }
}

/// A parsed caret or tilde range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    /// The range operator, preserved across updates
    pub operator: RangeOperator,
    /// Anchor version padded to three components
    pub anchor: Version,
    minor: Option<u64>,
    patch: Option<u64>,
}

impl RangeSpec {
    /// Parse a declared range, returning `None` for unsupported shapes
    pub fn parse(declared: &str) -> Option<Self> {
        let caps = RANGE_PATTERN.captures(declared)?;

        let operator = match &caps[1] {
            "^" => RangeOperator::Caret,
            _ => RangeOperator::Tilde,
        };
        let major: u64 = caps[2].parse().ok()?;
        let minor: Option<u64> = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        let patch: Option<u64> = match caps.get(4) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        let mut anchor = Version::new(major, minor.unwrap_or(0), patch.unwrap_or(0));
        if let Some(pre) = caps.get(5) {
            anchor.pre = Prerelease::new(pre.as_str()).ok()?;
        }

        Some(Self {
            operator,
            anchor,
            minor,
            patch,
        })
    }

    /// Returns true if the anchor sits on a prerelease track
    pub fn is_prerelease(&self) -> bool {
        !self.anchor.pre.is_empty()
    }

    /// The matching window for this range.
    ///
    /// Strict mode keeps the operator's own semantics. Otherwise a caret
    /// accepts anything at or above the anchor and a tilde anything below
    /// the next major.
    pub fn requirement(&self, strict: bool) -> VersionReq {
        if strict {
            // A prerelease anchor needs every component for the comparator
            let (minor, patch) = if self.is_prerelease() {
                (Some(self.anchor.minor), Some(self.anchor.patch))
            } else {
                (self.minor, self.patch)
            };
            return VersionReq {
                comparators: vec![Comparator {
                    op: self.operator.op(),
                    major: self.anchor.major,
                    minor,
                    patch,
                    pre: self.anchor.pre.clone(),
                }],
            };
        }

        let mut comparators = vec![Comparator {
            op: Op::GreaterEq,
            major: self.anchor.major,
            minor: Some(self.anchor.minor),
            patch: Some(self.anchor.patch),
            pre: self.anchor.pre.clone(),
        }];
        // No upper bound when the major cannot be incremented
        if let (RangeOperator::Tilde, Some(major)) =
            (self.operator, self.anchor.major.checked_add(1))
        {
            comparators.push(Comparator {
                op: Op::Less,
                major,
                minor: Some(0),
                patch: Some(0),
                pre: Prerelease::EMPTY,
            });
        }
        VersionReq { comparators }
    }

    /// Formats a resolved version with this range's operator
    pub fn format_updated(&self, version: &str) -> String {
        format!("{}{}", self.operator.prefix(), version)
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.prefix(), self.anchor)
    }
}
