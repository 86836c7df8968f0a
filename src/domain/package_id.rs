//! Case-insensitive package identity

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Package identifier as declared in a project file.
///
/// The original spelling is kept for display and for rewriting the file;
/// equality, hashing and registry lookups ignore ASCII case.
#[derive(Debug, Clone, Eq)]
pub struct PackageId {
    name: String,
}

impl PackageId {
    /// Creates a new package id, trimming surrounding whitespace
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        let name = if trimmed.len() == name.len() {
            name
        } else {
            trimmed.to_string()
        };
        Self { name }
    }

    /// The id as it was written
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Lower-cased form used for registry URLs and lookups
    pub fn lookup_key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Returns true if the id is empty
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Case-insensitive comparison against a plain string
    pub fn matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other.trim())
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.name.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for PackageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PackageId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Serialize for PackageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_case() {
        assert_eq!(PackageId::new("Newtonsoft.Json"), PackageId::new("newtonsoft.json"));
        assert_ne!(PackageId::new("Serilog"), PackageId::new("Serilog.Sinks"));
    }

    #[test]
    fn test_hash_ignores_case() {
        let mut set = HashSet::new();
        set.insert(PackageId::new("Serilog"));
        assert!(set.contains(&PackageId::new("SERILOG")));
    }

    #[test]
    fn test_display_keeps_original_spelling() {
        let id = PackageId::new("  Microsoft.Extensions.Logging ");
        assert_eq!(id.to_string(), "Microsoft.Extensions.Logging");
        assert_eq!(id.lookup_key(), "microsoft.extensions.logging");
    }

    #[test]
    fn test_matches() {
        let id = PackageId::new("xunit");
        assert!(id.matches("XUnit"));
        assert!(!id.matches("xunit.runner"));
    }

    #[test]
    fn test_is_empty() {
        assert!(PackageId::new("   ").is_empty());
        assert!(!PackageId::new("a").is_empty());
    }
}
