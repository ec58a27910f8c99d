//! Content loaders for reading interop data from files.

pub mod config;
pub mod cubes;

pub use config::ConfigLoader;
pub use cubes::{CubeCatalog, CubeEntry};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
