//! Interop configuration loader.

use std::path::Path;

use anyhow::Context;
use interop_core::InteropConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`InteropConfig`] from a TOML file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> LoadResult<InteropConfig> {
        Self::load_as(path)
    }

    /// Load any TOML-deserialisable config type, such as a host config that
    /// embeds [`InteropConfig`] as a table.
    pub fn load_as<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
        let content = read_file(path)?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config TOML {}", path.display()))?;
        debug!(target: "interop::content", path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse<T: DeserializeOwned>(content: &str) -> LoadResult<T> {
        Ok(toml::from_str(content)?)
    }
}
