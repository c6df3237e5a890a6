//! Content loaders for reading game data from files.
//!
//! Loaders convert RON level files and TOML config overrides into the core
//! types a session consumes.

pub mod config;
pub mod level;

pub use config::ConfigLoader;
pub use level::{LevelData, LevelLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
