//! End-to-end tests for refup CLI
//!
//! These tests verify:
//! - Argument parsing, including the legacy switch forms
//! - Exit codes for invalid paths, unsupported files and failed entries
//! - Text and JSON output for runs that need no registry access
//!
//! Every run here either avoids the registry entirely or points `--source`
//! at a closed local port, so the suite works offline.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UNREACHABLE_SOURCE: &str = "http://127.0.0.1:9/v3-flatcontainer";

fn refup() -> Command {
    Command::new(env!("CARGO_BIN_EXE_refup"))
}

/// Create a test directory with one project file
fn create_test_project(name: &str, content: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join(name), content).expect("Failed to write project");
    temp_dir
}

fn project_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

const EMPTY_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

const GATED_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog" Version="2.10.0" />
  </ItemGroup>
</Project>
"#;

const INVALID_VERSION_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog" Version="$(SerilogVersion)" />
  </ItemGroup>
</Project>
"#;

mod arguments {
    use super::*;

    #[test]
    fn test_help() {
        refup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--reference-switcher"))
            .stdout(predicate::str::contains("--read-only"));
    }

    #[test]
    fn test_legacy_help_switch() {
        refup()
            .arg("-?")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_version() {
        refup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_paths_required() {
        refup().assert().failure();
    }

    #[test]
    fn test_tier_flags_conflict() {
        refup()
            .args(["--minor", "--patch", "App.csproj"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }

    #[test]
    fn test_missing_path_is_config_error() {
        refup()
            .arg("/definitely/not/here/App.csproj")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid path"));
    }
}

mod runs {
    use super::*;

    #[test]
    fn test_unsupported_file_exits_with_errors() {
        let dir = create_test_project("notes.txt", "not a project");

        refup()
            .args(["--ro", "--no-color", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "notes.txt"))
            .assert()
            .code(2)
            .stdout(predicate::str::contains("unsupported file type"));
    }

    #[test]
    fn test_project_without_references() {
        let dir = create_test_project("App.csproj", EMPTY_PROJECT);

        refup()
            .args(["--no-color", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "App.csproj"))
            .assert()
            .success()
            .stdout(predicate::str::contains("refup v"))
            .stdout(predicate::str::contains(
                "All packages have been checked and no updates were necessary.",
            ));

        assert_eq!(read(dir.path().join("App.csproj")), EMPTY_PROJECT);
    }

    #[test]
    fn test_reference_switcher_skips_without_registry() {
        let dir = create_test_project("App.csproj", GATED_PROJECT);

        refup()
            .args(["-ReferenceSwitcher", "/NoColor", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "App.csproj"))
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"Serilog\s+skip").unwrap());

        assert_eq!(read(dir.path().join("App.csproj")), GATED_PROJECT);
    }

    #[test]
    fn test_invalid_version_exits_with_errors() {
        let dir = create_test_project("App.csproj", INVALID_VERSION_PROJECT);

        refup()
            .args(["--no-color", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "App.csproj"))
            .assert()
            .code(2)
            .stdout(predicate::str::contains("invalid version"));

        assert_eq!(read(dir.path().join("App.csproj")), INVALID_VERSION_PROJECT);
    }

    #[test]
    fn test_unreachable_registry_leaves_file_untouched() {
        let dir = create_test_project("App.csproj", GATED_PROJECT);

        refup()
            .args(["--no-color", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "App.csproj"))
            .assert()
            .code(2)
            .stdout(predicate::str::contains("error:"));

        assert_eq!(read(dir.path().join("App.csproj")), GATED_PROJECT);
    }

    #[test]
    fn test_quiet_prints_only_summary() {
        let dir = create_test_project("App.csproj", EMPTY_PROJECT);

        refup()
            .args(["-q", "--no-color", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "App.csproj"))
            .assert()
            .success()
            .stdout("0 package(s) updated in 0 of 1 file(s)\n");
    }
}

mod json_output {
    use super::*;

    #[test]
    fn test_json_schema() {
        let dir = create_test_project("App.csproj", INVALID_VERSION_PROJECT);

        let output = refup()
            .args(["--json", "--read-only", "--source", UNREACHABLE_SOURCE])
            .arg(project_path(&dir, "App.csproj"))
            .output()
            .expect("Failed to run refup");
        assert_eq!(output.status.code(), Some(2));

        let json: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Invalid JSON output");
        assert_eq!(json["tool"], "refup");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["read_only"], true);
        assert_eq!(json["summary"]["files"], 1);
        assert_eq!(json["summary"]["files_modified"], 0);
        assert_eq!(json["summary"]["updates"], 0);
        assert_eq!(json["summary"]["errors"], 1);
        assert!(json["manifests"].is_array());
    }
}
