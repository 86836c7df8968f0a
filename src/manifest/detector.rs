//! Expansion of command-line inputs into project files
//!
//! - A `.sln` file expands to the projects it lists
//! - A project file is used as-is
//! - A directory expands to its `.sln` files, or to its project files when
//!   it contains no solution

use crate::error::ManifestError;
use crate::manifest::{Solution, PROJECT_EXTENSIONS, SOLUTION_EXTENSION};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Project files found for a set of inputs, plus the inputs that failed
#[derive(Debug, Default)]
pub struct CollectedInputs {
    /// Project files in input order, without duplicates
    pub projects: Vec<PathBuf>,
    /// Inputs that could not be expanded
    pub errors: Vec<ManifestError>,
}

impl CollectedInputs {
    fn push(&mut self, seen: &mut HashSet<PathBuf>, project: PathBuf) {
        if seen.insert(project.clone()) {
            self.projects.push(project);
        }
    }
}

fn has_extension(path: &Path, wanted: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| wanted.iter().any(|w| w.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Check if a path names a project file
pub fn is_project_file(path: &Path) -> bool {
    has_extension(path, PROJECT_EXTENSIONS)
}

/// Check if a path names a solution file
pub fn is_solution_file(path: &Path) -> bool {
    has_extension(path, &[SOLUTION_EXTENSION])
}

/// Expand inputs into the project files to process
pub fn collect_project_files(inputs: &[PathBuf]) -> CollectedInputs {
    let mut collected = CollectedInputs::default();
    let mut seen = HashSet::new();

    for input in inputs {
        if input.is_dir() {
            match directory_inputs(input) {
                Ok(files) => {
                    for file in files {
                        expand_file(&file, &mut collected, &mut seen);
                    }
                }
                Err(e) => collected.errors.push(e),
            }
        } else {
            expand_file(input, &mut collected, &mut seen);
        }
    }

    tracing::debug!(
        projects = collected.projects.len(),
        errors = collected.errors.len(),
        "collected project files"
    );
    collected
}

fn expand_file(path: &Path, collected: &mut CollectedInputs, seen: &mut HashSet<PathBuf>) {
    if is_solution_file(path) {
        match Solution::load(path) {
            Ok(solution) => {
                for project in solution.projects() {
                    collected.push(seen, project.clone());
                }
            }
            Err(e) => collected.errors.push(e),
        }
    } else if is_project_file(path) {
        collected.push(seen, path.to_path_buf());
    } else {
        collected.errors.push(ManifestError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
}

/// Solutions in a directory, or its project files when there are none (sorted)
fn directory_inputs(dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let mut solutions = Vec::new();
    let mut projects = Vec::new();

    let entries = fs::read_dir(dir).map_err(|e| ManifestError::read_error(dir, e))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_solution_file(&path) {
            solutions.push(path);
        } else if is_project_file(&path) {
            projects.push(path);
        }
    }

    let mut files = if solutions.is_empty() {
        projects
    } else {
        solutions
    };
    files.sort();
    Ok(files)
}
