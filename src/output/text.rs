//! Text output for human-readable display
//!
//! Layout:
//! - A header with tool name, version and a rule
//! - `Processing '<file>'` per manifest, then one line per entry
//! - A per-manifest footer and a final summary

use crate::domain::{EntryOutcome, EntryState, ManifestReport, RunSummary, UpdateDecision};
use crate::output::{ReportSink, Verbosity};
use colored::Colorize;
use std::io::{self, Write};

/// Width of the "Id Version" column
const NAME_WIDTH: usize = 50;

/// Width of the header rule
const RULE_WIDTH: usize = 70;

/// Text reporter writing to any `Write`
pub struct TextReporter<W: Write> {
    writer: W,
    verbosity: Verbosity,
    color: bool,
}

impl<W: Write> TextReporter<W> {
    pub fn new(writer: W, verbosity: Verbosity, color: bool) -> Self {
        Self {
            writer,
            verbosity,
            color,
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Render one entry line, without trailing newline
    pub fn entry_line(&self, outcome: &EntryOutcome) -> String {
        let name = format!("{:<width$}", outcome.entry.to_string(), width = NAME_WIDTH);
        let annotation = outcome
            .resolution
            .newer_outside_tier()
            .map(|global| format!(" [{}]", global))
            .unwrap_or_default();

        let status = match &outcome.state {
            EntryState::Decided { decision } => match decision {
                UpdateDecision::Update(version) => {
                    if self.color {
                        format!("→ {}{}", version.to_string().bright_blue(), annotation)
                    } else {
                        format!("→ {}{}", version, annotation)
                    }
                }
                UpdateDecision::AlreadyLatest => self.paint("latest", |s| s.green().to_string()),
                UpdateDecision::NotFound => format!("not found{}", annotation),
                UpdateDecision::Gated => {
                    return format!(
                        "  {} {}",
                        self.paint(&name, |s| s.bright_black().to_string()),
                        self.paint("skip", |s| s.bright_black().to_string())
                    );
                }
            },
            EntryState::InvalidVersion { message } => self.paint(
                &format!("invalid version ({})", message),
                |s| s.yellow().to_string(),
            ),
            EntryState::RegistryUnavailable { message } => {
                self.paint(&format!("error: {}", message), |s| s.red().to_string())
            }
            EntryState::NotApplied { version, message } => self.paint(
                &format!("→ {} not applied: {}", version, message),
                |s| s.red().to_string(),
            ),
        };

        format!("  {} {}", name, status)
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }

    /// Closing line for a manifest
    fn footer(&self, report: &ManifestReport) -> String {
        if let Some(error) = &report.error {
            // a save is only attempted for writable runs with staged updates
            let text = if report.any_changed && !report.read_only {
                format!("failed to save: {}", error)
            } else {
                format!("failed: {}", error)
            };
            return self.paint(&text, |s| s.red().to_string());
        }

        let not_applied = report.not_applied_count();
        if not_applied > 0 && !report.any_changed {
            return self.paint(
                &format!("{} update(s) could not be applied", not_applied),
                |s| s.red().to_string(),
            );
        }

        let text = if !report.any_changed {
            "All packages have been checked and no updates were necessary."
        } else if report.read_only {
            "Updates are available. No changes were made"
        } else {
            "Packages have been updated"
        };

        if not_applied > 0 {
            let text = format!("{}; {} update(s) could not be applied", text, not_applied);
            self.paint(&text, |s| s.yellow().to_string())
        } else if report.any_changed && report.read_only {
            self.paint(text, |s| s.yellow().to_string())
        } else {
            self.paint(text, |s| s.green().to_string())
        }
    }

    fn summary_line(&self, summary: &RunSummary) -> String {
        let updates = summary.total_updates();
        let files = summary.files_processed();
        let errors = summary.total_errors();

        let mut line = if summary.read_only {
            format!(
                "{} update(s) available in {} file(s), no changes made",
                updates, files
            )
        } else {
            format!(
                "{} package(s) updated in {} of {} file(s)",
                updates,
                summary.files_modified(),
                files
            )
        };
        if errors > 0 {
            line.push_str(&format!(", {} error(s)", errors));
        }

        if !self.color {
            line
        } else if errors > 0 {
            line.red().to_string()
        } else {
            line.bold().to_string()
        }
    }
}

impl<W: Write> ReportSink for TextReporter<W> {
    fn begin(&mut self) -> io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }
        let title = format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        if self.color {
            writeln!(self.writer, "{}", title.bold())?;
        } else {
            writeln!(self.writer, "{}", title)?;
        }
        writeln!(self.writer, "{}", "-".repeat(RULE_WIDTH))
    }

    fn manifest(&mut self, report: &ManifestReport) -> io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            if report.has_errors() {
                let footer = self.footer(report);
                writeln!(self.writer, "{}: {}", report.file_name(), footer)?;
            }
            return Ok(());
        }

        writeln!(self.writer, "Processing '{}'", report.file_name())?;
        for outcome in &report.outcomes {
            let line = self.entry_line(outcome);
            writeln!(self.writer, "{}", line)?;
        }

        let footer = self.footer(report);
        writeln!(self.writer, "  {}", footer)?;

        if self.verbosity == Verbosity::Verbose {
            let counts = format!(
                "{} entries, {} update(s), {} failure(s)",
                report.outcomes.len(),
                report.update_count(),
                report.failure_count()
            );
            writeln!(self.writer, "  {}", self.paint(&counts, |s| s.dimmed().to_string()))?;
        }
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            writeln!(self.writer)?;
        }
        let line = self.summary_line(summary);
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyEntry, ResolutionResult, SemanticVersion};

    fn v(text: &str) -> SemanticVersion {
        SemanticVersion::parse(text).unwrap()
    }

    fn plain() -> TextReporter<Vec<u8>> {
        TextReporter::new(Vec::new(), Verbosity::Normal, false)
    }

    fn decided(
        id: &str,
        version: &str,
        decision: UpdateDecision,
        constrained: Option<&str>,
        global: Option<&str>,
    ) -> EntryOutcome {
        EntryOutcome::decided(
            DependencyEntry::new(id, version),
            decision,
            ResolutionResult::new(constrained.map(v), global.map(v)),
        )
    }

    fn output(reporter: TextReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_update_line_with_newer_outside_tier() {
        let outcome = decided(
            "Foo",
            "1.2.3",
            UpdateDecision::Update(v("1.2.9")),
            Some("1.2.9"),
            Some("2.0.0"),
        );
        let line = plain().entry_line(&outcome);
        assert_eq!(line, format!("  {:<50} → 1.2.9 [2.0.0]", "Foo 1.2.3"));
    }

    #[test]
    fn test_update_line_without_annotation() {
        let outcome = decided(
            "Foo",
            "1.0.0",
            UpdateDecision::Update(v("1.1.0")),
            Some("1.1.0"),
            Some("1.1.0"),
        );
        assert!(plain().entry_line(&outcome).ends_with("→ 1.1.0"));
    }

    #[test]
    fn test_latest_and_not_found_lines() {
        let latest = decided("A", "2.0.0", UpdateDecision::AlreadyLatest, Some("2.0.0"), Some("2.0.0"));
        assert!(plain().entry_line(&latest).ends_with(" latest"));

        let missing = decided("B", "1.0.0", UpdateDecision::NotFound, None, Some("3.0.0"));
        assert!(plain().entry_line(&missing).ends_with(" not found [3.0.0]"));

        let nothing = decided("C", "1.0.0", UpdateDecision::NotFound, None, None);
        assert!(plain().entry_line(&nothing).ends_with(" not found"));
    }

    #[test]
    fn test_skip_and_failure_lines() {
        let gated = decided("Foo", "1.0.0", UpdateDecision::Gated, None, None);
        assert!(plain().entry_line(&gated).ends_with(" skip"));

        let invalid = EntryOutcome::invalid_version(DependencyEntry::new("Foo", "abc"), "bad");
        assert!(plain().entry_line(&invalid).ends_with("invalid version (bad)"));

        let failed =
            EntryOutcome::registry_unavailable(DependencyEntry::new("Foo", "1.0.0"), "timeout");
        assert!(plain().entry_line(&failed).ends_with("error: timeout"));

        let mut unstaged = decided("Moq", "4.16.0", UpdateDecision::Update(v("4.20.72")), None, None);
        unstaged.mark_not_applied("no rewritable version");
        assert!(plain()
            .entry_line(&unstaged)
            .ends_with("→ 4.20.72 not applied: no rewritable version"));
    }

    #[test]
    fn test_manifest_block() {
        let mut report = ManifestReport::new("/src/App/App.csproj", false);
        report.outcomes.push(decided(
            "Serilog",
            "2.10.0",
            UpdateDecision::Update(v("2.12.0")),
            Some("2.12.0"),
            Some("2.12.0"),
        ));
        report.any_changed = true;
        report.persisted = true;

        let mut reporter = plain();
        reporter.manifest(&report).unwrap();
        let text = output(reporter);

        assert!(text.starts_with("Processing 'App.csproj'\n"));
        assert!(text.contains("Serilog 2.10.0"));
        assert!(text.contains("  Packages have been updated\n"));
    }

    #[test]
    fn test_footers() {
        let reporter = plain();

        let mut read_only = ManifestReport::new("A.csproj", true);
        read_only.any_changed = true;
        assert_eq!(
            reporter.footer(&read_only),
            "Updates are available. No changes were made"
        );

        let unchanged = ManifestReport::new("A.csproj", false);
        assert_eq!(
            reporter.footer(&unchanged),
            "All packages have been checked and no updates were necessary."
        );

        let broken = ManifestReport::failed("A.csproj", false, "not xml");
        assert_eq!(reporter.footer(&broken), "failed: not xml");

        let mut unsaved = ManifestReport::new("A.csproj", false);
        unsaved.any_changed = true;
        unsaved.error = Some("permission denied".to_string());
        assert_eq!(reporter.footer(&unsaved), "failed to save: permission denied");
    }

    #[test]
    fn test_staging_failure_footers() {
        let reporter = plain();
        let mut unstaged = decided("Moq", "4.16.0", UpdateDecision::Update(v("4.20.72")), None, None);
        unstaged.mark_not_applied("no rewritable version");

        let mut only_failed = ManifestReport::new("A.csproj", false);
        only_failed.outcomes.push(unstaged.clone());
        assert_eq!(
            reporter.footer(&only_failed),
            "1 update(s) could not be applied"
        );

        let mut partly = ManifestReport::new("A.csproj", false);
        partly.outcomes.push(unstaged);
        partly.outcomes.push(decided(
            "Serilog",
            "2.10.0",
            UpdateDecision::Update(v("2.12.0")),
            None,
            None,
        ));
        partly.any_changed = true;
        partly.persisted = true;
        let footer = reporter.footer(&partly);
        assert_eq!(
            footer,
            "Packages have been updated; 1 update(s) could not be applied"
        );
        assert!(!footer.contains("failed to save"));
    }

    #[test]
    fn test_header_and_summary() {
        let mut reporter = plain();
        reporter.begin().unwrap();
        reporter.finish(&RunSummary::new(true)).unwrap();
        let text = output(reporter);

        assert!(text.starts_with(&format!("refup v{}\n", env!("CARGO_PKG_VERSION"))));
        assert!(text.contains(&"-".repeat(70)));
        assert!(text.contains("0 update(s) available in 0 file(s), no changes made"));
    }

    #[test]
    fn test_quiet_only_reports_failures_and_summary() {
        let mut reporter = TextReporter::new(Vec::new(), Verbosity::Quiet, false);
        reporter.begin().unwrap();
        reporter.manifest(&ManifestReport::new("Ok.csproj", false)).unwrap();
        reporter
            .manifest(&ManifestReport::failed("Bad.csproj", false, "not xml"))
            .unwrap();

        let mut summary = RunSummary::new(false);
        summary.add_manifest(ManifestReport::failed("Bad.csproj", false, "not xml"));
        reporter.finish(&summary).unwrap();

        let text = output(reporter);
        assert_eq!(
            text,
            "Bad.csproj: failed: not xml\n0 package(s) updated in 0 of 1 file(s), 1 error(s)\n"
        );
    }

    #[test]
    fn test_color_output_contains_ansi() {
        colored::control::set_override(true);
        let reporter = TextReporter::new(Vec::new(), Verbosity::Normal, true);
        let outcome = decided("A", "1.0.0", UpdateDecision::AlreadyLatest, None, None);
        assert!(reporter.entry_line(&outcome).contains("\u{1b}["));
    }
}
