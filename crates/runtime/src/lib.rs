//! Reference host for the item-storage interop layer.
//!
//! This crate supplies what `interop-core` expects from a game world: a
//! segmented world that can load and unload regions, concrete providers that
//! hold items, and a bootstrap that builds the adapter registry from
//! configuration.
//!
//! Modules are organized by responsibility:
//! - [`world`] owns segments and the entities inside them
//! - [`entities`] holds the hopper, conveyor, chest and machine providers
//! - [`bootstrap`] registers adapters, builds the [`Dispatcher`] and sizes
//!   list-backed providers
//! - [`config`] and [`logging`] set up the process
//!
//! [`Dispatcher`]: interop_core::Dispatcher
pub mod bootstrap;
pub mod config;
pub mod entities;
pub mod error;
pub mod logging;
pub mod world;

pub use bootstrap::{ProviderFactory, build_dispatcher, build_registry, load_catalog};
pub use config::RuntimeConfig;
pub use entities::{ConveyorBelt, MachineBuffer, NativeChest, Recipe, StorageHopper};
pub use error::{Result, RuntimeError};
pub use world::{SEGMENT_SIZE, SegmentCoord, SegmentWorld, WorldSegment};
