//! Upgrade tiers and the version-prefix constraints derived from them

use super::SemanticVersion;
use serde::Serialize;
use std::fmt;

/// How far a dependency may advance from its declared version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeTier {
    /// No restriction (same as Major)
    None,
    /// Any newer version, including new majors
    #[default]
    Major,
    /// Stay on the declared major
    Minor,
    /// Stay on the declared major.minor
    Patch,
}

impl fmt::Display for UpgradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpgradeTier::None => "none",
            UpgradeTier::Major => "major",
            UpgradeTier::Minor => "minor",
            UpgradeTier::Patch => "patch",
        };
        f.write_str(label)
    }
}

/// Version prefix a candidate must share with the declared version.
///
/// Matching is component-wise: the prefix `1` admits `1.4.0` but not `10.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ConstraintPrefix {
    major: Option<u64>,
    minor: Option<u64>,
}

impl ConstraintPrefix {
    /// The empty prefix; every version qualifies
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Only versions with this major qualify
    pub fn major(major: u64) -> Self {
        Self {
            major: Some(major),
            minor: None,
        }
    }

    /// Only versions with this major.minor qualify
    pub fn major_minor(major: u64, minor: u64) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
        }
    }

    /// Returns true if the version shares this prefix
    pub fn matches(&self, version: &SemanticVersion) -> bool {
        if let Some(major) = self.major {
            if version.major() != major {
                return false;
            }
        }
        if let Some(minor) = self.minor {
            if version.minor() != minor {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for ConstraintPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.major, self.minor) {
            (Some(major), Some(minor)) => write!(f, "{}.{}", major, minor),
            (Some(major), None) => write!(f, "{}", major),
            _ => Ok(()),
        }
    }
}

/// Derive the prefix constraint for a declared version under a tier
pub fn derive_constraint(current: &SemanticVersion, tier: UpgradeTier) -> ConstraintPrefix {
    match tier {
        UpgradeTier::None | UpgradeTier::Major => ConstraintPrefix::unconstrained(),
        UpgradeTier::Minor => ConstraintPrefix::major(current.major()),
        UpgradeTier::Patch => ConstraintPrefix::major_minor(current.major(), current.minor()),
    }
}
