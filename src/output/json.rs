//! JSON output for machine processing
//!
//! Manifest reports are collected and written as a single document once the
//! run finishes.

use crate::domain::{ManifestReport, RunSummary};
use crate::output::ReportSink;
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter writing to any `Write`
pub struct JsonReporter<W: Write> {
    writer: W,
}

/// JSON representation of the full run
#[derive(Serialize)]
struct JsonOutput<'a> {
    tool: &'static str,
    version: &'static str,
    read_only: bool,
    summary: JsonSummary,
    manifests: &'a [ManifestReport],
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    files: usize,
    files_modified: usize,
    updates: usize,
    errors: usize,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(summary: &RunSummary) -> serde_json::Result<String> {
        let output = JsonOutput {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            read_only: summary.read_only,
            summary: JsonSummary {
                files: summary.files_processed(),
                files_modified: summary.files_modified(),
                updates: summary.total_updates(),
                errors: summary.total_errors(),
            },
            manifests: &summary.manifests,
        };
        serde_json::to_string_pretty(&output)
    }
}

impl<W: Write> ReportSink for JsonReporter<W> {
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn manifest(&mut self, _report: &ManifestReport) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        let json = Self::render(summary).map_err(io::Error::other)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DependencyEntry, EntryOutcome, ResolutionResult, SemanticVersion, UpdateDecision,
    };
    use serde_json::Value;

    fn run(summary: &RunSummary) -> Value {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.begin().unwrap();
        for manifest in &summary.manifests {
            reporter.manifest(manifest).unwrap();
        }
        reporter.finish(summary).unwrap();
        serde_json::from_slice(&reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_run() {
        let value = run(&RunSummary::new(false));
        assert_eq!(value["tool"], "refup");
        assert_eq!(value["read_only"], false);
        assert_eq!(value["summary"]["files"], 0);
        assert!(value["manifests"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_update_outcome_shape() {
        let mut report = ManifestReport::new("App.csproj", true);
        report.any_changed = true;
        report.outcomes.push(EntryOutcome::decided(
            DependencyEntry::new("Foo", "1.2.3"),
            UpdateDecision::Update(SemanticVersion::new(1, 2, 9)),
            ResolutionResult::new(
                Some(SemanticVersion::new(1, 2, 9)),
                Some(SemanticVersion::new(2, 0, 0)),
            ),
        ));
        let mut summary = RunSummary::new(true);
        summary.add_manifest(report);

        let value = run(&summary);
        let outcome = &value["manifests"][0]["outcomes"][0];

        assert_eq!(outcome["entry"]["id"], "Foo");
        assert_eq!(outcome["entry"]["version"], "1.2.3");
        assert_eq!(outcome["state"], "decided");
        assert_eq!(outcome["decision"]["type"], "update");
        assert_eq!(outcome["decision"]["version"], "1.2.9");
        assert_eq!(outcome["resolution"]["global_latest"], "2.0.0");
        assert_eq!(value["summary"]["updates"], 1);
    }

    #[test]
    fn test_failed_manifest_has_error() {
        let mut summary = RunSummary::new(false);
        summary.add_manifest(ManifestReport::failed("Bad.csproj", false, "not xml"));

        let value = run(&summary);
        assert_eq!(value["manifests"][0]["error"], "not xml");
        assert_eq!(value["summary"]["errors"], 1);
    }
}
