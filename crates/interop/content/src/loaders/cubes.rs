//! Cube catalog loader.
//!
//! Maps symbolic cube keys such as `"OreCopper"` to the numeric
//! `(cube_type, value)` pair used in item records.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use interop_core::Cube;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeEntry {
    pub cube_type: u16,
    #[serde(default)]
    pub value: u16,
    /// Ore cube types are counted by type regardless of value.
    #[serde(default)]
    pub ore: bool,
}

impl CubeEntry {
    pub fn cube(&self) -> Cube {
        Cube::new(self.cube_type, self.value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CubeCatalog {
    cubes: BTreeMap<String, CubeEntry>,
}

impl CubeCatalog {
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)
            .with_context(|| format!("Failed to parse cube catalog RON {}", path.display()))?;
        debug!(
            target: "interop::content",
            path = %path.display(),
            entries = catalog.len(),
            "cube catalog loaded"
        );
        Ok(catalog)
    }

    pub fn parse(content: &str) -> LoadResult<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Cube registered under `key`; `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<Cube> {
        self.cubes.get(key).map(CubeEntry::cube)
    }

    pub fn entry(&self, key: &str) -> Option<&CubeEntry> {
        self.cubes.get(key)
    }

    /// Key of the first entry matching `cube` exactly.
    pub fn key_of(&self, cube: Cube) -> Option<&str> {
        self.cubes
            .iter()
            .find(|(_, entry)| entry.cube() == cube)
            .map(|(key, _)| key.as_str())
    }

    pub fn is_ore(&self, cube_type: u16) -> bool {
        self.cubes
            .values()
            .any(|entry| entry.ore && entry.cube_type == cube_type)
    }

    /// Every cube type flagged as ore.
    pub fn ore_types(&self) -> BTreeSet<u16> {
        self.cubes
            .values()
            .filter(|entry| entry.ore)
            .map(|entry| entry.cube_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CATALOG: &str = r#"(
        cubes: {
            "Stone": (cube_type: 1),
            "OreCopper": (cube_type: 200, ore: true),
            "CopperBar": (cube_type: 210, value: 3),
        },
    )"#;

    #[test]
    fn resolves_known_keys() {
        let catalog = CubeCatalog::parse(CATALOG).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("CopperBar"), Some(Cube::new(210, 3)));
        assert_eq!(catalog.get("Stone"), Some(Cube::new(1, 0)));
        assert_eq!(catalog.key_of(Cube::new(200, 0)), Some("OreCopper"));
    }

    #[test]
    fn unknown_key_is_none() {
        let catalog = CubeCatalog::parse(CATALOG).unwrap();

        assert_eq!(catalog.get("OreUnobtainium"), None);
        assert_eq!(catalog.key_of(Cube::new(9, 9)), None);
    }

    #[test]
    fn ore_flags() {
        let catalog = CubeCatalog::parse(CATALOG).unwrap();

        assert!(catalog.is_ore(200));
        assert!(!catalog.is_ore(1));
        assert_eq!(catalog.ore_types().into_iter().collect::<Vec<_>>(), vec![200]);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{CATALOG}").unwrap();

        let catalog = CubeCatalog::load(file.path()).unwrap();

        assert!(catalog.entry("OreCopper").is_some_and(|e| e.ore));
    }

    #[test]
    fn bundled_catalog_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/cubes.ron");
        let catalog = CubeCatalog::load(&path).unwrap();

        assert!(!catalog.is_empty());
        assert!(!catalog.ore_types().is_empty());
    }
}
