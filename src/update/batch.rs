//! Batch driver
//!
//! Applies the resolution engine and the decision policy to every entry of
//! one manifest. Registry lookups for distinct entries run concurrently;
//! outcomes are always reported in declaration order.

use super::{decide, Resolver, UpdateConfig};
use crate::domain::{
    derive_constraint, DependencyEntry, EntryOutcome, ManifestReport, ResolutionResult,
};
use crate::manifest::{ManifestDocument, SiblingReferences};
use crate::progress::Progress;
use crate::registry::VersionSource;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Default number of registry lookups in flight
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Result of applying the engine to a list of entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// One outcome per actionable entry, in entry order
    pub outcomes: Vec<EntryOutcome>,
    /// Whether at least one entry was decided as an update
    pub any_changed: bool,
}

enum Pending {
    Ready(EntryOutcome),
    Resolving(DependencyEntry, JoinHandle<EntryOutcome>),
}

/// Drives resolution and decisions across the entries of a manifest
pub struct BatchDriver {
    resolver: Resolver,
    config: UpdateConfig,
    semaphore: Arc<Semaphore>,
}

impl BatchDriver {
    pub fn new(source: Arc<dyn VersionSource>, config: UpdateConfig) -> Self {
        Self {
            resolver: Resolver::new(source),
            config,
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
        }
    }

    /// Limit the number of concurrent registry lookups
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Decide every entry without touching any manifest
    pub async fn apply<G>(&self, entries: &[DependencyEntry], gate: &G) -> BatchOutcome
    where
        G: SiblingReferences + ?Sized,
    {
        self.apply_with_progress(entries, gate, &Progress::disabled())
            .await
    }

    /// Like [`apply`](Self::apply), advancing `progress` once per entry
    pub async fn apply_with_progress<G>(
        &self,
        entries: &[DependencyEntry],
        gate: &G,
        progress: &Progress,
    ) -> BatchOutcome
    where
        G: SiblingReferences + ?Sized,
    {
        let pending: Vec<Pending> = entries
            .iter()
            .filter(|entry| entry.is_actionable())
            .map(|entry| self.start(entry, gate))
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        for item in pending {
            let outcome = match item {
                Pending::Ready(outcome) => outcome,
                Pending::Resolving(entry, handle) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::warn!(package = %entry.id, error = %e, "resolution task failed");
                        EntryOutcome::registry_unavailable(entry, e.to_string())
                    }
                },
            };
            progress.set_message(outcome.entry.id.as_str());
            progress.inc();
            outcomes.push(outcome);
        }

        let any_changed = outcomes.iter().fold(false, |acc, o| acc || o.is_update());
        BatchOutcome {
            outcomes,
            any_changed,
        }
    }

    /// Parse, gate, and, when needed, spawn the registry lookup for one entry
    fn start<G>(&self, entry: &DependencyEntry, gate: &G) -> Pending
    where
        G: SiblingReferences + ?Sized,
    {
        let current = match entry.current_version() {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(package = %entry.id, version = %entry.version, "unparseable declared version");
                return Pending::Ready(EntryOutcome::invalid_version(entry.clone(), e.to_string()));
            }
        };

        if self
            .config
            .is_gated(gate.has_sibling_reference(&entry.id))
        {
            let resolution = ResolutionResult::default();
            let decision = decide(&current, &resolution, true);
            tracing::debug!(package = %entry.id, "gated: no matching project reference");
            return Pending::Ready(EntryOutcome::decided(entry.clone(), decision, resolution));
        }

        let constraint = derive_constraint(&current, self.config.tier);
        let include_prerelease = self.config.include_prerelease;
        let resolver = self.resolver.clone();
        let semaphore = Arc::clone(&self.semaphore);
        let task_entry = entry.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return EntryOutcome::registry_unavailable(task_entry, e.to_string()),
            };

            match resolver
                .resolve(&task_entry.id, &constraint, include_prerelease)
                .await
            {
                Ok(resolution) => {
                    let decision = decide(&current, &resolution, false);
                    tracing::debug!(
                        package = %task_entry.id,
                        current = %current,
                        decision = %decision,
                        "decided"
                    );
                    EntryOutcome::decided(task_entry, decision, resolution)
                }
                Err(e) => {
                    tracing::warn!(package = %task_entry.id, error = %e, "registry unavailable");
                    EntryOutcome::registry_unavailable(task_entry, e.to_string())
                }
            }
        });

        Pending::Resolving(entry.clone(), handle)
    }

    /// Decide, stage and (unless read-only) persist one manifest.
    ///
    /// A declaration that cannot be staged is reported on its own outcome;
    /// the remaining updates are still written.
    pub async fn run_manifest<D>(&self, document: &mut D, progress: &Progress) -> ManifestReport
    where
        D: ManifestDocument + SiblingReferences,
    {
        let entries = document.dependency_entries();
        let batch = self
            .apply_with_progress(&entries, &*document, progress)
            .await;

        // outcomes line up with the actionable entries, in order
        let positions = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_actionable())
            .map(|(index, _)| index);

        let mut outcomes = batch.outcomes;
        for (index, outcome) in positions.zip(outcomes.iter_mut()) {
            let Some(version) = outcome.new_version().map(ToString::to_string) else {
                continue;
            };
            if let Err(e) = document.apply_version(index, &version) {
                tracing::warn!(package = %outcome.entry.id, error = %e, "could not stage update");
                outcome.mark_not_applied(e.to_string());
            }
        }

        let mut report = ManifestReport::new(document.path(), self.config.read_only);
        report.any_changed = outcomes.iter().fold(false, |acc, o| acc || o.is_update());

        if report.any_changed && !self.config.read_only {
            match document.persist() {
                Ok(written) => report.persisted = written,
                Err(e) => {
                    tracing::warn!(path = %document.path().display(), error = %e, "persist failed");
                    report.error = Some(e.to_string());
                }
            }
        }

        report.outcomes = outcomes;
        report
    }
}
