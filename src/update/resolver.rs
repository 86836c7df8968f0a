//! Resolution engine
//!
//! Asks the registry twice per package: once within the tier constraint and
//! once unconstrained, both under the same prerelease policy.

use crate::domain::{ConstraintPrefix, PackageId, ResolutionResult, SemanticVersion};
use crate::error::RegistryError;
use crate::registry::VersionSource;
use std::sync::Arc;

/// Computes constrained-latest and global-latest for a package
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn VersionSource>,
}

impl Resolver {
    pub fn new(source: Arc<dyn VersionSource>) -> Self {
        Self { source }
    }

    /// Resolve both latest versions for `package`
    pub async fn resolve(
        &self,
        package: &PackageId,
        constraint: &ConstraintPrefix,
        include_prerelease: bool,
    ) -> Result<ResolutionResult, RegistryError> {
        let constrained = self
            .source
            .query_versions(package, constraint, include_prerelease)
            .await?;
        let constrained_latest = highest(&constrained, |v| constraint.matches(v));

        let global = self
            .source
            .query_versions(package, &ConstraintPrefix::unconstrained(), include_prerelease)
            .await?;
        let global_latest = highest(&global, |_| true);

        if let (Some(c), Some(g)) = (&constrained_latest, &global_latest) {
            if c > g {
                tracing::warn!(
                    package = %package,
                    constrained = %c,
                    global = %g,
                    "registry returned a constrained version above the global latest"
                );
            }
        }

        tracing::debug!(
            package = %package,
            constraint = %constraint,
            constrained_latest = ?constrained_latest.as_ref().map(ToString::to_string),
            global_latest = ?global_latest.as_ref().map(ToString::to_string),
            "resolved"
        );

        Ok(ResolutionResult::new(constrained_latest, global_latest))
    }
}

/// Highest parseable version accepted by `keep`
fn highest(
    versions: &[String],
    keep: impl Fn(&SemanticVersion) -> bool,
) -> Option<SemanticVersion> {
    versions
        .iter()
        .filter_map(|raw| match SemanticVersion::parse(raw) {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::debug!(version = %raw, error = %e, "ignoring unparseable published version");
                None
            }
        })
        .filter(|v| keep(v))
        .max()
}
