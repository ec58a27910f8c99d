//! Traits describing the host world.
//!
//! The host owns segment loading, entity storage and item spawning. The core
//! only needs to ask which segment holds a coordinate, which entity occupies
//! a coordinate, and how to mint a cube stack. Hosts implement these traits
//! and pass them in explicitly; nothing here is global.
use std::any::Any;

use crate::item::{Cube, ItemRecord};
use crate::storage::ItemStorage;
use crate::types::{WorldOffset, WorldPosition};

/// Object-safe access to the concrete type behind a trait object.
///
/// Implemented for every sized `'static` type. Call it through
/// `&dyn SegmentEntity`, never on a `Box`, or the box itself is returned.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An entity occupying a world coordinate.
pub trait SegmentEntity: AsAny {
    fn position(&self) -> WorldPosition;

    /// Forward direction for directional entities such as conveyors.
    fn orientation(&self) -> Option<WorldOffset> {
        None
    }

    /// Native storage contract, if the entity implements one.
    fn item_storage(&self) -> Option<&dyn ItemStorage> {
        None
    }

    fn item_storage_mut(&mut self) -> Option<&mut dyn ItemStorage> {
        None
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A loaded region of the world.
pub trait Segment {
    fn entity_at(&self, position: WorldPosition) -> Option<&dyn SegmentEntity>;
}

/// World lookup used by the neighbor finder and the surrounding transfers.
pub trait WorldOracle {
    /// Segment containing `position`, or `None` if it is not loaded.
    fn segment(&self, position: WorldPosition) -> Option<&dyn Segment>;

    fn entity_at_mut(&mut self, position: WorldPosition) -> Option<&mut dyn SegmentEntity>;
}

/// Mints new item records on behalf of adapters.
pub trait ItemSpawner: Send + Sync {
    fn spawn_cube_stack(&self, cube: Cube, amount: u32) -> ItemRecord;
}

/// Spawner that builds plain [`ItemRecord::cube_stack`] records.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultItemSpawner;

impl ItemSpawner for DefaultItemSpawner {
    fn spawn_cube_stack(&self, cube: Cube, amount: u32) -> ItemRecord {
        ItemRecord::cube_stack(cube.cube_type, cube.value, amount)
    }
}
