//! Host configuration.

use std::path::{Path, PathBuf};

use interop_content::ConfigLoader;
use interop_core::InteropConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level host configuration, read from TOML.
///
/// ```toml
/// log_filter = "interop=debug,info"
/// cube_catalog = "data/cubes.ron"
///
/// [interop]
/// hopper_round_robin = false
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub interop: InteropConfig,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Cube catalog supplying ore classification for hoppers.
    pub cube_catalog: Option<PathBuf>,
}

impl RuntimeConfig {
    pub const DEFAULT_LOG_FILTER: &'static str = "info";

    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigLoader::load_as(path)?)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            interop: InteropConfig::default(),
            log_filter: Self::DEFAULT_LOG_FILTER.to_owned(),
            cube_catalog: None,
        }
    }
}
