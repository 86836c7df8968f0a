//! Reporting of update results
//!
//! This module provides:
//! - The reporting sink the orchestrator streams results into
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

use crate::domain::{ManifestReport, RunSummary};
use std::io::{self, Write};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Failures and the final summary only
    Quiet,
    /// One line per entry
    #[default]
    Normal,
    /// Adds per-manifest counts
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Whether to use colors
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: color && format == OutputFormat::Text,
        }
    }
}

/// Receives results as the run progresses
pub trait ReportSink {
    /// Called once before the first manifest
    fn begin(&mut self) -> io::Result<()>;

    /// Called after each manifest has been processed
    fn manifest(&mut self, report: &ManifestReport) -> io::Result<()>;

    /// Called once after the last manifest
    fn finish(&mut self, summary: &RunSummary) -> io::Result<()>;
}

/// Create a reporter based on configuration
pub fn create_reporter<W>(config: OutputConfig, writer: W) -> Box<dyn ReportSink>
where
    W: Write + 'static,
{
    match config.format {
        OutputFormat::Text => Box::new(TextReporter::new(writer, config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonReporter::new(writer)),
    }
}
