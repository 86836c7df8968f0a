//! Core domain models for refup
//!
//! This module contains the fundamental types used throughout the application:
//! - Case-insensitive package identities
//! - Semantic versions and their ordering
//! - Upgrade tiers and the prefix constraints derived from them
//! - Declared dependency entries
//! - Resolution results and update decisions
//! - Manifest and run summaries

mod decision;
mod dependency;
mod package_id;
mod summary;
mod tier;
mod version;

pub use decision::{EntryOutcome, EntryState, ResolutionResult, UpdateDecision};
pub use dependency::DependencyEntry;
pub use package_id::PackageId;
pub use summary::{ManifestReport, RunSummary};
pub use tier::{derive_constraint, ConstraintPrefix, UpgradeTier};
pub use version::SemanticVersion;
