//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed version strings (declared or published)
//! - RegistryError: Package registry could not be asked
//! - ManifestError: Project/solution file read, parse and write failures
//! - ConfigError: Invalid command line configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while parsing a semantic version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The text is not a valid version
    #[error("invalid version '{input}': {message}")]
    Parse { input: String, message: String },
}

/// Errors related to package registry communication.
///
/// Every variant means the registry could not be asked. "Asked successfully,
/// nothing published" is an empty result, never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },
}

/// Errors related to project and solution files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Project XML could not be parsed
    #[error("failed to parse XML in {path}: {message}")]
    XmlParseError { path: PathBuf, message: String },

    /// The package to update has no version to rewrite in the file
    #[error("package '{package}' has no rewritable version in {path}")]
    EntryNotFound { path: PathBuf, package: String },

    /// Unsupported manifest format
    #[error("unsupported file type: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input path does not exist or cannot be used
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

impl VersionError {
    /// Creates a new Parse error
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::Parse {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::XmlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The file this error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            ManifestError::ReadError { path, .. }
            | ManifestError::WriteError { path, .. }
            | ManifestError::XmlParseError { path, .. }
            | ManifestError::EntryNotFound { path, .. }
            | ManifestError::UnsupportedFormat { path } => path,
        }
    }
}
