//! Declared dependency entries

use super::{PackageId, SemanticVersion};
use crate::error::VersionError;
use serde::Serialize;
use std::fmt;

/// A package reference as declared in a project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEntry {
    /// Package identifier
    pub id: PackageId,
    /// Declared version string, verbatim
    pub version: String,
}

impl DependencyEntry {
    /// Creates a new dependency entry
    pub fn new(id: impl Into<PackageId>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Entries without an id or without a version are left alone
    pub fn is_actionable(&self) -> bool {
        !self.id.is_empty() && !self.version.trim().is_empty()
    }

    /// Parse the declared version
    pub fn current_version(&self) -> Result<SemanticVersion, VersionError> {
        SemanticVersion::parse(&self.version)
    }
}

impl fmt::Display for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}
