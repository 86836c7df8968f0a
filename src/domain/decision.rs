//! Resolution results and per-entry update decisions

use super::{DependencyEntry, SemanticVersion};
use serde::Serialize;
use std::fmt;

/// Versions found in the registry for one dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Highest version inside the tier constraint
    pub constrained_latest: Option<SemanticVersion>,
    /// Highest version with no tier restriction (reporting only)
    pub global_latest: Option<SemanticVersion>,
}

impl ResolutionResult {
    pub fn new(
        constrained_latest: Option<SemanticVersion>,
        global_latest: Option<SemanticVersion>,
    ) -> Self {
        Self {
            constrained_latest,
            global_latest,
        }
    }

    /// The global latest, when it differs from the constrained latest
    pub fn newer_outside_tier(&self) -> Option<&SemanticVersion> {
        match (&self.constrained_latest, &self.global_latest) {
            (_, None) => None,
            (Some(constrained), Some(global)) if constrained == global => None,
            (_, Some(global)) => Some(global),
        }
    }
}

/// Outcome of the update decision for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "version", rename_all = "snake_case")]
pub enum UpdateDecision {
    /// Nothing published inside the tier
    NotFound,
    /// Declared version is already the highest inside the tier
    AlreadyLatest,
    /// Excluded by the reference-switcher gate
    Gated,
    /// Move to this version
    Update(SemanticVersion),
}

impl UpdateDecision {
    /// Returns true if this decision changes the declared version
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateDecision::Update(_))
    }

    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            UpdateDecision::NotFound => "not found",
            UpdateDecision::AlreadyLatest => "latest",
            UpdateDecision::Gated => "skip",
            UpdateDecision::Update(_) => "update",
        }
    }
}

impl fmt::Display for UpdateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateDecision::Update(version) => write!(f, "update to {}", version),
            other => f.write_str(other.label()),
        }
    }
}

/// Terminal state of one entry after a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EntryState {
    /// The engine produced a decision
    Decided { decision: UpdateDecision },
    /// Declared version could not be parsed; entry left untouched
    InvalidVersion { message: String },
    /// Registry could not be asked; entry left untouched
    RegistryUnavailable { message: String },
    /// An update was decided but could not be written into the document
    NotApplied {
        version: SemanticVersion,
        message: String,
    },
}

/// Everything known about one entry after a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    /// The entry as declared
    pub entry: DependencyEntry,
    /// What happened to it
    #[serde(flatten)]
    pub state: EntryState,
    /// Registry findings (empty when no query was made)
    pub resolution: ResolutionResult,
}

impl EntryOutcome {
    pub fn decided(
        entry: DependencyEntry,
        decision: UpdateDecision,
        resolution: ResolutionResult,
    ) -> Self {
        Self {
            entry,
            state: EntryState::Decided { decision },
            resolution,
        }
    }

    pub fn invalid_version(entry: DependencyEntry, message: impl Into<String>) -> Self {
        Self {
            entry,
            state: EntryState::InvalidVersion {
                message: message.into(),
            },
            resolution: ResolutionResult::default(),
        }
    }

    pub fn registry_unavailable(entry: DependencyEntry, message: impl Into<String>) -> Self {
        Self {
            entry,
            state: EntryState::RegistryUnavailable {
                message: message.into(),
            },
            resolution: ResolutionResult::default(),
        }
    }

    /// Turn a decided update into a staging failure. Other states are kept.
    pub fn mark_not_applied(&mut self, message: impl Into<String>) {
        if let Some(version) = self.new_version().cloned() {
            self.state = EntryState::NotApplied {
                version,
                message: message.into(),
            };
        }
    }

    /// The decision, if one was reached
    pub fn decision(&self) -> Option<&UpdateDecision> {
        match &self.state {
            EntryState::Decided { decision } => Some(decision),
            _ => None,
        }
    }

    /// The staged new version, if the entry is to be updated
    pub fn new_version(&self) -> Option<&SemanticVersion> {
        match self.decision() {
            Some(UpdateDecision::Update(version)) => Some(version),
            _ => None,
        }
    }

    pub fn is_update(&self) -> bool {
        self.new_version().is_some()
    }

    /// Returns true if the entry failed (invalid version, registry error or staging)
    pub fn is_failure(&self) -> bool {
        !matches!(self.state, EntryState::Decided { .. })
    }
}
