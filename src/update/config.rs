//! Update configuration
//!
//! An immutable value threaded into the resolution engine, the decision
//! policy and the batch driver.

use crate::domain::UpgradeTier;

/// Settings for one update run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateConfig {
    /// How far versions may advance
    pub tier: UpgradeTier,
    /// Consider prerelease versions
    pub include_prerelease: bool,
    /// Only update packages that have a matching project reference
    pub reference_switcher: bool,
    /// Compute and report, never write back
    pub read_only: bool,
}

impl UpdateConfig {
    /// Create a new UpdateConfig with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upgrade tier
    pub fn with_tier(mut self, tier: UpgradeTier) -> Self {
        self.tier = tier;
        self
    }

    /// Set whether prerelease versions are considered
    pub fn with_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Set reference-switcher gating
    pub fn with_reference_switcher(mut self, enabled: bool) -> Self {
        self.reference_switcher = enabled;
        self
    }

    /// Set read-only mode
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Gate for one package: switcher mode on and no sibling reference
    pub fn is_gated(&self, has_sibling_reference: bool) -> bool {
        self.reference_switcher && !has_sibling_reference
    }
}
