//! CLI argument parsing module for refup

use crate::domain::UpgradeTier;
use crate::error::ConfigError;
use crate::registry::NUGET_FLAT_CONTAINER_URL;
use clap::{ArgGroup, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Tier-aware PackageReference updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "refup",
    version,
    about = "Updates NuGet PackageReference versions in project and solution files",
    group(ArgGroup::new("tier").args(["major", "minor", "patch"]))
)]
pub struct CliArgs {
    /// Solution files, project files or directories to process
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    // Upgrade tier
    /// Update up to the highest major version (default)
    #[arg(long)]
    pub major: bool,

    /// Update up to the highest minor version; the major version stays
    #[arg(long)]
    pub minor: bool,

    /// Update up to the highest patch version; major and minor stay
    #[arg(long)]
    pub patch: bool,

    /// Allow prerelease versions
    #[arg(long)]
    pub prerelease: bool,

    /// Only update packages that have a matching ProjectReference
    #[arg(long)]
    pub reference_switcher: bool,

    /// Report available updates without changing any file
    #[arg(short, long, visible_aliases = ["readonly", "nochange", "ro"])]
    pub read_only: bool,

    // Output options
    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print failures and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// NuGet flat-container base URL
    #[arg(long, value_name = "URL", default_value = NUGET_FLAT_CONTAINER_URL)]
    pub source: String,
}

impl CliArgs {
    /// The selected upgrade tier
    pub fn tier(&self) -> UpgradeTier {
        if self.patch {
            UpgradeTier::Patch
        } else if self.minor {
            UpgradeTier::Minor
        } else {
            UpgradeTier::Major
        }
    }

    /// Whether to colorize, given whether stdout is a terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            is_terminal
        }
    }

    /// Check that every input path exists
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.paths.iter().find(|p| !p.exists()) {
            Some(missing) => Err(ConfigError::InvalidPath {
                path: missing.clone(),
                message: "no such file or directory".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Long option for a legacy switch name (lower-case, without prefix)
fn legacy_switch(name: &str) -> Option<Option<&'static str>> {
    let long = match name {
        "help" | "?" => "--help",
        "referenceswitcher" => "--reference-switcher",
        "major" => "--major",
        "minor" => "--minor",
        "patch" => "--patch",
        "prerelease" => "--prerelease",
        "ro" | "readonly" | "nochange" => "--read-only",
        "color" => "--color",
        "nocolor" => "--no-color",
        // Console encoding is left to the terminal
        "unicode" => return Some(None),
        _ => return None,
    };
    Some(Some(long))
}

/// Rewrite `-Switch`, `--Switch` and `/Switch` forms to long options.
///
/// Matching is case-insensitive. Arguments that are not a known switch, and
/// everything after `--`, are passed through unchanged. A `/Switch` that
/// names an existing path is kept as a path.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    normalize_legacy_args_with(args, |path| path.exists())
}

fn normalize_legacy_args_with<I, T>(args: I, exists: impl Fn(&Path) -> bool) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || passthrough {
            normalized.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let name = text
            .strip_prefix("--")
            .or_else(|| text.strip_prefix('-'))
            .or_else(|| text.strip_prefix('/').filter(|_| !exists(Path::new(text))));
        match name.and_then(|n| legacy_switch(&n.to_ascii_lowercase())) {
            Some(Some(long)) => normalized.push(OsString::from(long)),
            Some(None) => {}
            None => normalized.push(arg),
        }
    }

    normalized
}
