//! Adapter for single-slot conveyor belts.
//!
//! A conveyor slot moves through three states per item:
//!
//! ```text
//! Ready --give--> Loaded(pending) --carry timer--> Loaded(available) --take--> Ready
//! ```
//!
//! Calls made outside those transitions return `false` or `None`.
use std::marker::PhantomData;
use std::sync::Arc;

use bitflags::bitflags;
use tracing::{debug, trace};

use super::{StorageAdapter, provider, provider_mut, require_caller};
use crate::env::{ItemSpawner, SegmentEntity};
use crate::error::InteropResult;
use crate::item::{Cube, FLOAT_TOLERANCE, ItemRecord};
use crate::spatial::is_conveyor_facing;
use crate::storage::{Operation, StockReport};
use crate::types::WorldOffset;

bitflags! {
    /// Behavior variants of the conveyor adapter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ConveyorFlags: u8 {
        /// Only yield cargo to the entity the belt points at.
        const REQUIRE_FACING     = 1 << 0;
        /// Run the belt's pre-offload transform before yielding cargo.
        const CONVERT_ON_OFFLOAD = 1 << 1;
    }
}

impl Default for ConveyorFlags {
    fn default() -> Self {
        Self::REQUIRE_FACING
    }
}

/// Native API of a conveyor belt segment.
pub trait ConveyorSlot: SegmentEntity {
    /// True while the slot is empty and will accept new cargo.
    fn ready_to_convey(&self) -> bool;

    /// Remaining travel time of the current cargo; zero once it has arrived.
    fn carry_timer(&self) -> f32;

    fn forwards(&self) -> WorldOffset;

    fn carried_cube(&self) -> Option<Cube>;
    fn carried_item(&self) -> Option<&ItemRecord>;

    fn add_cube(&mut self, cube: Cube);
    fn add_item(&mut self, item: &ItemRecord);

    fn remove_cube(&mut self);
    fn remove_item(&mut self);

    /// Resumes belt motion once cargo has been handed off.
    fn finalise_offloading_cargo(&mut self);

    /// Transforms the carried cargo in place before it is handed off.
    ///
    /// Belts that craft while carrying override this; it is expected to
    /// advance the belt's animation state as well. Cargo that is already
    /// converted must be left as it is.
    fn pre_offload_transform(&mut self) {}
}

/// Storage contract over a [`ConveyorSlot`] provider of type `C`.
pub struct ConveyorAdapter<C> {
    flags: ConveyorFlags,
    tolerance: f32,
    spawner: Arc<dyn ItemSpawner>,
    _provider: PhantomData<fn() -> C>,
}

impl<C: ConveyorSlot> ConveyorAdapter<C> {
    pub fn new(spawner: Arc<dyn ItemSpawner>, flags: ConveyorFlags) -> Self {
        Self {
            flags,
            tolerance: FLOAT_TOLERANCE,
            spawner,
            _provider: PhantomData,
        }
    }

    /// Tolerance used when matching the carried item against an example.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn flags(&self) -> ConveyorFlags {
        self.flags
    }

    fn carries(&self, belt: &C, item: &ItemRecord) -> bool {
        if belt.ready_to_convey() || belt.carry_timer() > 0.0 {
            return false;
        }
        match item.cube() {
            Some(cube) => belt.carried_cube() == Some(cube),
            None => belt
                .carried_item()
                .is_some_and(|carried| item.compare_deep_with(carried, self.tolerance)),
        }
    }

    /// Checks every take precondition except the cargo match.
    fn can_offload(
        &self,
        caller: Option<&dyn SegmentEntity>,
        belt: &C,
        operation: Operation,
    ) -> InteropResult<bool> {
        if belt.ready_to_convey() || belt.carry_timer() > 0.0 {
            return Ok(false);
        }
        if self.flags.contains(ConveyorFlags::REQUIRE_FACING) {
            let caller = require_caller(caller, operation)?;
            if !is_conveyor_facing(caller.position(), belt.position(), belt.forwards()) {
                trace!(
                    target: "interop::adapters::conveyor",
                    belt = %belt.position(),
                    caller = %caller.position(),
                    "belt not facing caller"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn convert(&self, belt: &mut C) {
        if self.flags.contains(ConveyorFlags::CONVERT_ON_OFFLOAD) {
            belt.pre_offload_transform();
        }
    }

    /// Hands off the carried cargo as it is now.
    fn offload(&self, belt: &mut C) -> Option<ItemRecord> {
        let cargo = match belt.carried_cube() {
            Some(cube) if !cube.is_air() => Some(self.spawner.spawn_cube_stack(cube, 1)),
            _ => belt.carried_item().cloned(),
        }?;

        belt.remove_cube();
        belt.remove_item();
        belt.finalise_offloading_cargo();
        debug!(
            target: "interop::adapters::conveyor",
            belt = %belt.position(),
            item = %cargo.item_type(),
            "cargo offloaded"
        );
        Some(cargo)
    }
}

impl<C: ConveyorSlot> StorageAdapter for ConveyorAdapter<C> {
    fn name(&self) -> &'static str {
        "conveyor"
    }

    fn caller_required(&self, operation: Operation) -> bool {
        self.flags.contains(ConveyorFlags::REQUIRE_FACING)
            && matches!(operation, Operation::TakeItem | Operation::TakeAnyItem)
    }

    fn has_any_items(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<bool> {
        let belt = provider::<C>(self.name(), entity)?;
        Ok(!belt.ready_to_convey()
            && belt.carry_timer() <= 0.0
            && (belt.carried_cube().is_some_and(|c| !c.is_air()) || belt.carried_item().is_some()))
    }

    fn has_item(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool> {
        let belt = provider::<C>(self.name(), entity)?;
        Ok(self.carries(belt, item))
    }

    fn has_items(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<StockReport> {
        Ok(if self.has_item(caller, entity, item)? {
            StockReport::of(1)
        } else {
            StockReport::NONE
        })
    }

    fn has_free_space(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        amount: u32,
    ) -> InteropResult<bool> {
        if amount > 1 {
            return Ok(false);
        }
        Ok(self.free_space(caller, entity)? >= amount)
    }

    fn free_space(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<u32> {
        let belt = provider::<C>(self.name(), entity)?;
        Ok(u32::from(belt.ready_to_convey()))
    }

    fn give_item(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool> {
        let belt = provider_mut::<C>(self.name(), entity)?;
        // A slot carries exactly one unit.
        if !belt.ready_to_convey() || item.amount() != 1 {
            return Ok(false);
        }
        match item.cube() {
            Some(cube) => belt.add_cube(cube),
            None => belt.add_item(item),
        }
        Ok(true)
    }

    fn take_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<Option<ItemRecord>> {
        let belt = provider_mut::<C>(self.name(), entity)?;
        if !self.can_offload(caller, belt, Operation::TakeItem)? {
            return Ok(None);
        }
        // Requests match the cargo as it would leave the belt.
        self.convert(belt);
        if !self.carries(belt, item) {
            return Ok(None);
        }
        Ok(self.offload(belt))
    }

    fn take_any_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
    ) -> InteropResult<Option<ItemRecord>> {
        let belt = provider_mut::<C>(self.name(), entity)?;
        if !self.can_offload(caller, belt, Operation::TakeAnyItem)? {
            return Ok(None);
        }
        self.convert(belt);
        Ok(self.offload(belt))
    }
}
