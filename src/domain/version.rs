//! Semantic version parsing and ordering
//!
//! Wraps `semver::Version` with the leniency NuGet version strings need:
//! - `1.2` is read as `1.2.0`
//! - `1.2.3.0` is read as `1.2.3` (a non-zero fourth part is rejected)
//!
//! Ordering follows SemVer 2.0.0 precedence. Build metadata is ignored for
//! both ordering and equality.

use crate::error::VersionError;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed semantic version
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    inner: semver::Version,
}

impl SemanticVersion {
    /// Creates a release version from its numeric parts
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Parse a version string
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionError::parse(text, "empty version"));
        }

        // Split the numeric core from `-prerelease` / `+build`
        let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        let (core, suffix) = trimmed.split_at(split_at);

        let parts: Vec<&str> = core.split('.').collect();
        let mut numbers = Vec::with_capacity(parts.len());
        for part in &parts {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::parse(
                    text,
                    format!("'{}' is not a numeric version component", part),
                ));
            }
            let number: u64 = part
                .parse()
                .map_err(|_| VersionError::parse(text, "version component out of range"))?;
            numbers.push(number);
        }

        let (major, minor, patch) = match numbers.as_slice() {
            [major, minor] => (*major, *minor, 0),
            [major, minor, patch] => (*major, *minor, *patch),
            [major, minor, patch, 0] => (*major, *minor, *patch),
            [_, _, _, _] => {
                return Err(VersionError::parse(
                    text,
                    "a non-zero revision component is not supported",
                ))
            }
            _ => {
                return Err(VersionError::parse(
                    text,
                    "expected major.minor[.patch]",
                ))
            }
        };

        let normalized = format!("{}.{}.{}{}", major, minor, patch, suffix);
        let inner = semver::Version::parse(&normalized)
            .map_err(|e| VersionError::parse(text, e.to_string()))?;

        Ok(Self { inner })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Returns true if the version carries a prerelease label
    pub fn is_prerelease(&self) -> bool {
        !self.inner.pre.is_empty()
    }

    /// The prerelease label, empty for releases
    pub fn prerelease(&self) -> &str {
        self.inner.pre.as_str()
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .major
            .cmp(&other.inner.major)
            .then(self.inner.minor.cmp(&other.inner.minor))
            .then(self.inner.patch.cmp(&other.inner.patch))
            .then_with(|| self.inner.pre.cmp(&other.inner.pre))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
