//! Visual Studio solution files

use crate::error::ManifestError;
use crate::manifest::PROJECT_EXTENSIONS;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// Project("{type-guid}") = "Name", "relative\path.csproj", "{project-guid}"
static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*Project\("\{[^}]+\}"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]+)""#)
        .expect("valid solution project pattern")
});

/// A solution and the project files it lists
#[derive(Debug, Clone)]
pub struct Solution {
    path: PathBuf,
    projects: Vec<PathBuf>,
}

impl Solution {
    /// Read a solution file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Ok(Self::parse(path, &content))
    }

    /// Parse solution text that was read from `path`
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let projects = PROJECT_LINE
            .captures_iter(content)
            .filter_map(|caps| {
                let relative = caps[2].trim().replace('\\', "/");
                let candidate = PathBuf::from(&relative);
                let supported = candidate
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        PROJECT_EXTENSIONS
                            .iter()
                            .any(|known| known.eq_ignore_ascii_case(ext))
                    })
                    .unwrap_or(false);
                // Solution folders and web sites are listed with a name or URL, not a project file
                supported.then(|| base.join(candidate))
            })
            .collect();

        Self { path, projects }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Project files in solution order
    pub fn projects(&self) -> &[PathBuf] {
        &self.projects
    }
}
