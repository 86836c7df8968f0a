//! Run result summary types
//!
//! Provides structures for tracking results at manifest and run level.

use super::{EntryOutcome, EntryState};
use serde::Serialize;
use std::path::PathBuf;

/// Result of processing a single project file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestReport {
    /// Path to the project file
    pub path: PathBuf,
    /// Per-entry outcomes, in declaration order
    pub outcomes: Vec<EntryOutcome>,
    /// Whether any entry was staged for update
    pub any_changed: bool,
    /// Whether the staged versions were written back
    pub persisted: bool,
    /// Whether this run was read-only
    pub read_only: bool,
    /// Load or save failure for this manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ManifestReport {
    /// Creates an empty report for a manifest
    pub fn new(path: impl Into<PathBuf>, read_only: bool) -> Self {
        Self {
            path: path.into(),
            outcomes: Vec::new(),
            any_changed: false,
            persisted: false,
            read_only,
            error: None,
        }
    }

    /// Creates a report for a manifest that could not be processed
    pub fn failed(path: impl Into<PathBuf>, read_only: bool, error: impl Into<String>) -> Self {
        let mut report = Self::new(path, read_only);
        report.error = Some(error.into());
        report
    }

    /// Display name of the manifest (file name only)
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Number of entries staged for update
    pub fn update_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_update()).count()
    }

    /// Number of entries that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Number of decided updates that could not be staged
    pub fn not_applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.state, EntryState::NotApplied { .. }))
            .count()
    }

    /// Returns true if the manifest itself or any entry failed
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.failure_count() > 0
    }
}

/// Overall summary of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Reports for every manifest, in processing order
    pub manifests: Vec<ManifestReport>,
    /// Whether this was a read-only run
    pub read_only: bool,
}

impl RunSummary {
    pub fn new(read_only: bool) -> Self {
        Self {
            manifests: Vec::new(),
            read_only,
        }
    }

    pub fn add_manifest(&mut self, report: ManifestReport) {
        self.manifests.push(report);
    }

    /// Number of manifests processed
    pub fn files_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Number of manifests written back
    pub fn files_modified(&self) -> usize {
        self.manifests.iter().filter(|m| m.persisted).count()
    }

    /// Number of entries staged for update across all manifests
    pub fn total_updates(&self) -> usize {
        self.manifests.iter().map(|m| m.update_count()).sum()
    }

    /// Number of failed entries and manifests
    pub fn total_errors(&self) -> usize {
        self.manifests
            .iter()
            .map(|m| m.failure_count() + usize::from(m.error.is_some()))
            .sum()
    }

    pub fn has_errors(&self) -> bool {
        self.manifests.iter().any(|m| m.has_errors())
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
