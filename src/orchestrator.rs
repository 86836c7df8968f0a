//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: collect → load → resolve → decide → write → report
//! - Configuration built once from CLI arguments
//! - Error handling with partial continuation: one failing project never
//!   stops the others

use crate::cli::CliArgs;
use crate::domain::{ManifestReport, RunSummary};
use crate::error::{ManifestError, RegistryError};
use crate::manifest::{collect_project_files, ManifestDocument, ProjectFile};
use crate::output::ReportSink;
use crate::progress::Progress;
use crate::registry::{HttpClient, NuGetAdapter, VersionSource};
use crate::update::{BatchDriver, UpdateConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    args: CliArgs,
    source: Arc<dyn VersionSource>,
    show_progress: bool,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct OrchestratorResult {
    /// Reports for every processed project
    pub summary: RunSummary,
    /// Failures encountered along the way
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Process exit code: 0 on success, 2 when anything failed
    pub fn exit_code(&self) -> u8 {
        if self.errors.is_empty() && !self.summary.has_errors() {
            0
        } else {
            2
        }
    }
}

/// Errors that can occur during orchestration
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] RegistryError),

    /// An input could not be expanded into project files
    #[error("Failed to expand {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// A project file could not be loaded
    #[error("Failed to load {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Staging or saving updates failed
    #[error("Failed to update {path}: {message}")]
    Update { path: PathBuf, message: String },

    /// Writing the report failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl Orchestrator {
    /// Create an orchestrator querying the configured NuGet feed
    pub fn new(args: CliArgs) -> Result<Self, OrchestratorError> {
        let client = HttpClient::new()?;
        let source: Arc<dyn VersionSource> =
            Arc::new(NuGetAdapter::with_base_url(client, args.source.as_str()));
        Ok(Self::with_source(args, source))
    }

    /// Create an orchestrator with a custom version source
    pub fn with_source(args: CliArgs, source: Arc<dyn VersionSource>) -> Self {
        let show_progress = !args.quiet && !args.json;
        Self {
            args,
            source,
            show_progress,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Build the immutable update configuration from CLI arguments
    pub fn build_config(&self) -> UpdateConfig {
        UpdateConfig::new()
            .with_tier(self.args.tier())
            .with_prerelease(self.args.prerelease)
            .with_reference_switcher(self.args.reference_switcher)
            .with_read_only(self.args.read_only)
    }

    /// Run the update workflow, streaming reports into `sink`
    pub async fn run(
        &self,
        sink: &mut dyn ReportSink,
    ) -> Result<OrchestratorResult, OrchestratorError> {
        let config = self.build_config();
        tracing::debug!(
            tier = %config.tier,
            prerelease = config.include_prerelease,
            reference_switcher = config.reference_switcher,
            read_only = config.read_only,
            registry = self.source.registry_name(),
            "starting run"
        );

        let driver = BatchDriver::new(Arc::clone(&self.source), config);
        let mut progress = Progress::new(self.show_progress);
        let mut summary = RunSummary::new(config.read_only);
        let mut errors = Vec::new();

        sink.begin()?;

        progress.spinner("Collecting project files...");
        let collected = collect_project_files(&self.args.paths);
        progress.finish_and_clear();

        for error in collected.errors {
            tracing::warn!(error = %error, "skipping input");
            let report = ManifestReport::failed(error.path(), config.read_only, error.to_string());
            errors.push(OrchestratorError::Input {
                path: error.path().to_path_buf(),
                message: error.to_string(),
            });
            sink.manifest(&report)?;
            summary.add_manifest(report);
        }

        for path in &collected.projects {
            let report = match self.process_project(&driver, path, &mut progress).await {
                Ok(report) => {
                    if let Some(message) = &report.error {
                        errors.push(OrchestratorError::Update {
                            path: path.clone(),
                            message: message.clone(),
                        });
                    }
                    report
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not load project");
                    errors.push(OrchestratorError::Load {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                    ManifestReport::failed(path, config.read_only, e.to_string())
                }
            };

            sink.manifest(&report)?;
            summary.add_manifest(report);
        }

        sink.finish(&summary)?;
        Ok(OrchestratorResult { summary, errors })
    }

    async fn process_project(
        &self,
        driver: &BatchDriver,
        path: &Path,
        progress: &mut Progress,
    ) -> Result<ManifestReport, ManifestError> {
        let mut project = ProjectFile::load(path)?;

        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let total = project
            .dependency_entries()
            .iter()
            .filter(|e| e.is_actionable())
            .count();
        progress.start(total as u64, &label);

        let report = driver.run_manifest(&mut project, progress).await;
        progress.finish_and_clear();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpgradeTier;
    use crate::output::{TextReporter, Verbosity};
    use crate::registry::InMemoryRegistry;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn make_args(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args)
    }

    fn make_args_with_path(path: &Path, extra_args: &[&str]) -> CliArgs {
        let path_str = path.to_str().unwrap();
        let mut args = vec!["refup"];
        args.extend(extra_args);
        args.push(path_str);
        CliArgs::parse_from(&args)
    }

    fn orchestrator(args: CliArgs, registry: InMemoryRegistry) -> Orchestrator {
        Orchestrator::with_source(args, Arc::new(registry)).with_progress(false)
    }

    const PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog" Version="2.10.0" />
  </ItemGroup>
</Project>
"#;

    #[test]
    fn test_build_config_defaults() {
        let orchestrator = orchestrator(make_args(&["refup", "x"]), InMemoryRegistry::new());
        let config = orchestrator.build_config();
        assert_eq!(config, UpdateConfig::new());
    }

    #[test]
    fn test_build_config_from_flags() {
        let args = make_args(&[
            "refup",
            "--patch",
            "--prerelease",
            "--reference-switcher",
            "--read-only",
            "x",
        ]);
        let config = orchestrator(args, InMemoryRegistry::new()).build_config();
        assert_eq!(config.tier, UpgradeTier::Patch);
        assert!(config.include_prerelease);
        assert!(config.reference_switcher);
        assert!(config.read_only);
    }

    #[test]
    fn test_progress_hidden_for_json_and_quiet() {
        let json = Orchestrator::with_source(
            make_args(&["refup", "--json", "x"]),
            Arc::new(InMemoryRegistry::new()),
        );
        assert!(!json.show_progress);

        let quiet = Orchestrator::with_source(
            make_args(&["refup", "-q", "x"]),
            Arc::new(InMemoryRegistry::new()),
        );
        assert!(!quiet.show_progress);
    }

    #[tokio::test]
    async fn test_run_updates_project() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("App.csproj");
        fs::write(&project, PROJECT).unwrap();

        let registry = InMemoryRegistry::new().with_package("Serilog", ["2.10.0", "2.12.0"]);
        let mut sink = TextReporter::new(Vec::new(), Verbosity::Normal, false);
        let result = orchestrator(make_args_with_path(&project, &[]), registry)
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.summary.files_modified(), 1);
        assert!(fs::read_to_string(&project).unwrap().contains(r#"Version="2.12.0""#));

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains("Processing 'App.csproj'"));
        assert!(text.contains("Packages have been updated"));
    }

    #[tokio::test]
    async fn test_run_read_only_leaves_file() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("App.csproj");
        fs::write(&project, PROJECT).unwrap();

        let registry = InMemoryRegistry::new().with_package("Serilog", ["2.10.0", "2.12.0"]);
        let mut sink = TextReporter::new(Vec::new(), Verbosity::Normal, false);
        let result = orchestrator(make_args_with_path(&project, &["--ro"]), registry)
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.summary.total_updates(), 1);
        assert_eq!(result.summary.files_modified(), 0);
        assert_eq!(fs::read_to_string(&project).unwrap(), PROJECT);
    }

    #[tokio::test]
    async fn test_broken_project_does_not_stop_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.csproj"), "<Project><ItemGroup>").unwrap();
        fs::write(dir.path().join("B.csproj"), PROJECT).unwrap();

        let registry = InMemoryRegistry::new().with_package("Serilog", ["2.10.0", "3.0.0"]);
        let mut sink = TextReporter::new(Vec::new(), Verbosity::Normal, false);
        let result = orchestrator(make_args_with_path(dir.path(), &[]), registry)
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(result.exit_code(), 2);
        assert_eq!(result.summary.files_processed(), 2);
        assert!(matches!(result.errors[0], OrchestratorError::Load { .. }));
        assert!(fs::read_to_string(dir.path().join("B.csproj"))
            .unwrap()
            .contains("3.0.0"));
    }

    #[tokio::test]
    async fn test_unsupported_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("notes.txt");
        fs::write(&other, "hello").unwrap();

        let mut sink = TextReporter::new(Vec::new(), Verbosity::Normal, false);
        let result = orchestrator(make_args_with_path(&other, &[]), InMemoryRegistry::new())
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(result.exit_code(), 2);
        assert!(matches!(result.errors[0], OrchestratorError::Input { .. }));
    }

    #[tokio::test]
    async fn test_registry_failure_sets_error_exit() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("App.csproj");
        fs::write(&project, PROJECT).unwrap();

        let registry = InMemoryRegistry::new().with_failure("Serilog");
        let mut sink = TextReporter::new(Vec::new(), Verbosity::Normal, false);
        let result = orchestrator(make_args_with_path(&project, &[]), registry)
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(result.exit_code(), 2);
        assert!(result.errors.is_empty());
        assert_eq!(result.summary.total_errors(), 1);
        assert_eq!(fs::read_to_string(&project).unwrap(), PROJECT);
    }

    #[test]
    fn test_orchestrator_error_display() {
        let err = OrchestratorError::Load {
            path: PathBuf::from("/src/App.csproj"),
            message: "invalid".to_string(),
        };
        assert!(err.to_string().contains("Failed to load /src/App.csproj"));

        let err = OrchestratorError::Update {
            path: PathBuf::from("/src/App.csproj"),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("Failed to update"));

        let err = OrchestratorError::from(std::io::Error::other("broken pipe"));
        assert!(err.to_string().contains("Output error"));
    }
}
