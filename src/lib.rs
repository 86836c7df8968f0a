//! refup - tier-aware NuGet PackageReference updater library
//!
//! This library provides the core functionality for keeping the package
//! versions declared in .NET project files current:
//! - Version resolution within a major/minor/patch upgrade tier
//! - Update decisions with optional reference-switcher gating
//! - Project (.csproj, .vbproj, .fsproj) and solution (.sln) handling
//! - Text and JSON reporting

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
