//! Data-driven content for the interop layer.
//!
//! Loaders read TOML configuration and the RON cube catalog into
//! `interop-core` types. Content feeds the host at startup and is never
//! consulted by the core itself.

pub mod loaders;

pub use loaders::{ConfigLoader, CubeCatalog, CubeEntry, LoadResult};
