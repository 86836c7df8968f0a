//! NuGet v3 registry adapter
//!
//! Fetches published versions from the flat-container resource.
//! API endpoint: {base}/{lower-case-id}/index.json

use crate::domain::{ConstraintPrefix, PackageId};
use crate::error::RegistryError;
use crate::registry::{filter_versions, HttpClient, VersionSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// nuget.org flat-container base URL
pub const NUGET_FLAT_CONTAINER_URL: &str = "https://api.nuget.org/v3-flatcontainer";

/// Flat-container version index
#[derive(Debug, Deserialize)]
struct VersionIndex {
    versions: Vec<String>,
}

/// NuGet registry adapter.
///
/// The raw version list of a package is fetched once per adapter and shared
/// by every constrained and unconstrained query for that package.
pub struct NuGetAdapter {
    client: HttpClient,
    base_url: String,
    fetched: Mutex<HashMap<PackageId, Arc<Vec<String>>>>,
}

impl NuGetAdapter {
    /// Create an adapter for nuget.org
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NUGET_FLAT_CONTAINER_URL)
    }

    /// Create an adapter for another flat-container feed
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            fetched: Mutex::new(HashMap::new()),
        }
    }

    /// Build the index URL for a package
    fn build_url(&self, package: &PackageId) -> String {
        format!("{}/{}/index.json", self.base_url, package.lookup_key())
    }

    /// All published versions, from the memo or the feed
    async fn published_versions(&self, package: &PackageId) -> Result<Arc<Vec<String>>, RegistryError> {
        if let Some(versions) = self.fetched.lock().await.get(package) {
            return Ok(Arc::clone(versions));
        }

        let url = self.build_url(package);
        tracing::debug!(package = %package, url = %url, "querying registry");
        let index: Option<VersionIndex> = self
            .client
            .get_json_optional(&url, package.as_str(), self.registry_name())
            .await?;

        let versions = Arc::new(index.map(|i| i.versions).unwrap_or_default());
        tracing::debug!(package = %package, count = versions.len(), "registry answered");

        self.fetched
            .lock()
            .await
            .insert(package.clone(), Arc::clone(&versions));
        Ok(versions)
    }
}

#[async_trait]
impl VersionSource for NuGetAdapter {
    fn registry_name(&self) -> &str {
        "NuGet"
    }

    async fn query_versions(
        &self,
        package: &PackageId,
        constraint: &ConstraintPrefix,
        include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError> {
        let versions = self.published_versions(package).await?;
        Ok(filter_versions(
            versions.iter().map(String::as_str),
            constraint,
            include_prerelease,
        ))
    }
}
