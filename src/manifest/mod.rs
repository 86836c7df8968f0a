//! Project and solution files
//!
//! This module provides:
//! - The manifest port used by the batch driver (entries, apply, persist)
//! - The sibling-reference predicate used for reference-switcher gating
//! - `.csproj`/`.vbproj`/`.fsproj` documents and `.sln` enumeration
//! - Expansion of command-line inputs into project files

mod detector;
mod project;
mod solution;

pub use detector::{collect_project_files, is_project_file, is_solution_file, CollectedInputs};
pub use project::ProjectFile;
pub use solution::Solution;

use crate::domain::{DependencyEntry, PackageId};
use crate::error::ManifestError;
use std::path::Path;

/// Project file extensions handled by the updater
pub const PROJECT_EXTENSIONS: &[&str] = &["csproj", "vbproj", "fsproj"];

/// Solution file extension
pub const SOLUTION_EXTENSION: &str = "sln";

/// A manifest whose dependency versions can be updated
pub trait ManifestDocument {
    /// Location of the manifest
    fn path(&self) -> &Path;

    /// Declared dependencies, in document order
    fn dependency_entries(&self) -> Vec<DependencyEntry>;

    /// Stage a new version for the declaration at `index` of
    /// [`dependency_entries`](Self::dependency_entries). Other declarations
    /// of the same package keep their own versions.
    fn apply_version(&mut self, index: usize, version: &str) -> Result<(), ManifestError>;

    /// Write staged changes back. Returns whether anything was written.
    fn persist(&mut self) -> Result<bool, ManifestError>;
}

/// Answers whether a package has a matching sibling project reference
pub trait SiblingReferences {
    fn has_sibling_reference(&self, package: &PackageId) -> bool;
}

impl<F> SiblingReferences for F
where
    F: Fn(&PackageId) -> bool,
{
    fn has_sibling_reference(&self, package: &PackageId) -> bool {
        self(package)
    }
}
