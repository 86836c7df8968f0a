//! Update decision policy

use crate::domain::{ResolutionResult, SemanticVersion, UpdateDecision};

/// Classify one entry.
///
/// First match wins: gated, then nothing published within the tier, then
/// not newer than the current version, then update. The global latest in
/// `resolution` is only carried for reporting and never changes the branch.
pub fn decide(
    current: &SemanticVersion,
    resolution: &ResolutionResult,
    is_gated: bool,
) -> UpdateDecision {
    if is_gated {
        return UpdateDecision::Gated;
    }

    match &resolution.constrained_latest {
        None => UpdateDecision::NotFound,
        Some(latest) if latest <= current => UpdateDecision::AlreadyLatest,
        Some(latest) => UpdateDecision::Update(latest.clone()),
    }
}
