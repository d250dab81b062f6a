//! Content loaders for reading unit catalogs and challenge settings from
//! files.
//!
//! Unit catalogs are RON, challenge configuration is TOML.

pub mod config;
pub mod units;

pub use config::ConfigLoader;
pub use units::UnitLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
