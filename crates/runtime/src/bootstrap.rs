//! Registry, dispatcher and provider construction.

use std::sync::Arc;

use interop_content::CubeCatalog;
use interop_core::{
    AdapterRegistry, ConveyorAdapter, DefaultItemSpawner, Dispatcher, HopperAdapter,
    InteropConfig, ItemSpawner, WorldPosition,
};
use tracing::info;

use crate::config::RuntimeConfig;
use crate::entities::{ConveyorBelt, MachineBuffer, NativeChest, StorageHopper};
use crate::error::Result;

/// Registers the adapters for every host provider type that lacks a native
/// storage contract.
pub fn build_registry(config: &InteropConfig, spawner: Arc<dyn ItemSpawner>) -> AdapterRegistry {
    let hopper = if config.hopper_round_robin {
        HopperAdapter::<StorageHopper>::new(Arc::clone(&spawner))
    } else {
        HopperAdapter::<StorageHopper>::legacy(Arc::clone(&spawner))
    };
    let conveyor = ConveyorAdapter::<ConveyorBelt>::new(spawner, config.conveyor)
        .with_tolerance(config.float_tolerance);

    AdapterRegistry::builder()
        .register::<StorageHopper, _>(hopper)
        .register::<ConveyorBelt, _>(conveyor)
        .build()
}

pub fn build_dispatcher(config: &InteropConfig) -> Dispatcher {
    let registry = build_registry(config, Arc::new(DefaultItemSpawner));
    info!(
        target: "runtime",
        adapters = ?registry.adapter_names().collect::<Vec<_>>(),
        conveyor = ?config.conveyor,
        "dispatcher ready"
    );
    Dispatcher::new(registry)
}

/// Builds list-backed providers sized by
/// [`InteropConfig::default_list_capacity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderFactory {
    capacity: u32,
}

impl ProviderFactory {
    pub fn new(config: &InteropConfig) -> Self {
        Self {
            capacity: config.default_list_capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn chest(&self, position: WorldPosition) -> NativeChest {
        NativeChest::new(position, self.capacity)
    }

    pub fn hopper(&self, position: WorldPosition) -> StorageHopper {
        StorageHopper::new(position, self.capacity)
    }

    pub fn machine(&self, position: WorldPosition) -> MachineBuffer {
        MachineBuffer::new(position, self.capacity)
    }
}

/// Loads the configured cube catalog, or an empty one when none is set.
pub fn load_catalog(config: &RuntimeConfig) -> Result<CubeCatalog> {
    match &config.cube_catalog {
        Some(path) => Ok(CubeCatalog::load(path)?),
        None => Ok(CubeCatalog::default()),
    }
}
