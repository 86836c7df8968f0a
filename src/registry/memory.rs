//! In-memory registry snapshot

use crate::domain::{ConstraintPrefix, PackageId};
use crate::error::RegistryError;
use crate::registry::{filter_versions, VersionSource};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed package → versions table.
///
/// Packages can be marked as failing to simulate a registry that cannot be
/// reached. Every query is counted.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    packages: HashMap<PackageId, Vec<String>>,
    failing: HashSet<PackageId>,
    queries: AtomicUsize,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish versions for a package
    pub fn with_package<I, S>(mut self, id: &str, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages
            .entry(PackageId::new(id))
            .or_default()
            .extend(versions.into_iter().map(Into::into));
        self
    }

    /// Make every query for this package fail
    pub fn with_failure(mut self, id: &str) -> Self {
        self.failing.insert(PackageId::new(id));
        self
    }

    /// Number of queries answered or failed so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionSource for InMemoryRegistry {
    fn registry_name(&self) -> &str {
        "in-memory"
    }

    async fn query_versions(
        &self,
        package: &PackageId,
        constraint: &ConstraintPrefix,
        include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(package) {
            return Err(RegistryError::network_error(
                package.as_str(),
                self.registry_name(),
                "simulated transport failure",
            ));
        }

        Ok(self
            .packages
            .get(package)
            .map(|versions| {
                filter_versions(
                    versions.iter().map(String::as_str),
                    constraint,
                    include_prerelease,
                )
            })
            .unwrap_or_default())
    }
}
