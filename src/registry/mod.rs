//! Registry adapters for fetching published package versions
//!
//! This module provides:
//! - The `VersionSource` port queried by the resolution engine
//! - HTTP client shared foundation
//! - NuGet v3 flat-container adapter
//! - In-memory snapshot registry for offline runs and tests

mod client;
mod memory;
mod nuget;

pub use client::HttpClient;
pub use memory::InMemoryRegistry;
pub use nuget::{NuGetAdapter, NUGET_FLAT_CONTAINER_URL};

use crate::domain::{ConstraintPrefix, PackageId, SemanticVersion};
use crate::error::RegistryError;
use async_trait::async_trait;

/// Source of published versions for a package
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &str;

    /// Published versions of `package` that share `constraint` and pass the
    /// prerelease policy. Unknown packages yield an empty list, not an error.
    async fn query_versions(
        &self,
        package: &PackageId,
        constraint: &ConstraintPrefix,
        include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError>;
}

/// Keep the versions that parse, share the prefix and pass the prerelease policy
pub fn filter_versions<'a>(
    versions: impl IntoIterator<Item = &'a str>,
    constraint: &ConstraintPrefix,
    include_prerelease: bool,
) -> Vec<String> {
    versions
        .into_iter()
        .filter(|raw| match SemanticVersion::parse(raw) {
            Ok(version) => {
                constraint.matches(&version) && (include_prerelease || !version.is_prerelease())
            }
            Err(_) => false,
        })
        .map(str::to_string)
        .collect()
}
