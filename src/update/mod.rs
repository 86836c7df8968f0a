//! Version resolution and update decisions
//!
//! This module provides:
//! - The immutable run configuration (tier, prerelease, gating, read-only)
//! - The resolution engine computing constrained and global latest versions
//! - The decision policy classifying each entry
//! - The batch driver applying both across a manifest

mod batch;
mod config;
mod policy;
mod resolver;

pub use batch::{BatchDriver, BatchOutcome, DEFAULT_CONCURRENCY};
pub use config::UpdateConfig;
pub use policy::decide;
pub use resolver::Resolver;
