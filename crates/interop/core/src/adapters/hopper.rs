//! Adapter for fixed-capacity storage hoppers.
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{StorageAdapter, provider, provider_mut};
use crate::env::{ItemSpawner, SegmentEntity};
use crate::error::{InteropError, InteropResult};
use crate::item::{Cube, ItemId, ItemRecord};
use crate::storage::{Operation, StockReport};

/// Who may move items in and out of a hopper.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HopperPermissions {
    #[default]
    AddAndRemove,
    AddOnly,
    RemoveOnly,
    Locked,
}

/// Native API of a storage hopper.
///
/// Capacity is tracked by the hopper as a free-space counter; the adapter
/// observes that counter to learn whether a cube was accepted.
pub trait HopperStorage: SegmentEntity {
    fn storage_free(&self) -> u32;
    fn storage_used(&self) -> u32;
    fn permissions(&self) -> HopperPermissions;

    /// False when the hopper opted out of automated logistics.
    fn allows_logistics(&self) -> bool;

    fn count_item(&self, id: ItemId) -> u32;
    fn count_cube(&self, cube: Cube) -> u32;

    /// Counts every value of an ore cube type.
    fn count_ore(&self, cube_type: u16) -> u32;

    fn is_ore(&self, _cube_type: u16) -> bool {
        false
    }

    fn add_item(&mut self, item: &ItemRecord) -> bool;
    fn add_cube(&mut self, cube: Cube);

    fn remove_item_by_id(&mut self, id: ItemId) -> Option<ItemRecord>;
    fn remove_cube_stack(&mut self, cube: Cube) -> Option<ItemRecord>;

    /// Removes one cube chosen by the hopper's round-robin cursor.
    fn take_cube_round_robin(&mut self) -> Option<Cube>;

    /// Removes one item or cube chosen by the round-robin cursor.
    fn take_any_round_robin(&mut self) -> Option<ItemRecord>;

    fn record_logistics_operation(&mut self);
    fn request_immediate_update(&mut self);
}

/// Storage contract over a [`HopperStorage`] provider of type `H`.
pub struct HopperAdapter<H> {
    spawner: Arc<dyn ItemSpawner>,
    round_robin: bool,
    _provider: PhantomData<fn() -> H>,
}

impl<H: HopperStorage> HopperAdapter<H> {
    pub const NAME: &'static str = "hopper";
    pub const LEGACY_NAME: &'static str = "hopper_legacy";

    /// Adapter with round-robin `take_any_item`.
    pub fn new(spawner: Arc<dyn ItemSpawner>) -> Self {
        Self {
            spawner,
            round_robin: true,
            _provider: PhantomData,
        }
    }

    /// Adapter whose `take_any_item` is an explicit unsupported stub.
    pub fn legacy(spawner: Arc<dyn ItemSpawner>) -> Self {
        Self {
            round_robin: false,
            ..Self::new(spawner)
        }
    }
}

impl<H: HopperStorage> StorageAdapter for HopperAdapter<H> {
    fn name(&self) -> &'static str {
        if self.round_robin {
            Self::NAME
        } else {
            Self::LEGACY_NAME
        }
    }

    fn has_any_items(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<bool> {
        let hopper = provider::<H>(self.name(), entity)?;
        Ok(hopper.storage_used() > 0)
    }

    fn has_items(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<StockReport> {
        let hopper = provider::<H>(self.name(), entity)?;
        let amount = match item.cube() {
            None => hopper.count_item(item.id()),
            Some(cube) if hopper.is_ore(cube.cube_type) => hopper.count_ore(cube.cube_type),
            Some(cube) => hopper.count_cube(cube),
        };
        Ok(StockReport::of(amount))
    }

    fn free_space(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<u32> {
        Ok(provider::<H>(self.name(), entity)?.storage_free())
    }

    fn give_item(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool> {
        let hopper = provider_mut::<H>(self.name(), entity)?;
        let Some(cube) = item.cube() else {
            return Ok(hopper.add_item(item));
        };

        let before = hopper.storage_free();
        if before < item.amount() {
            return Ok(false);
        }
        // Cube insertion reports nothing; a changed free counter means it landed.
        for _ in 0..item.amount() {
            hopper.add_cube(cube);
        }
        let accepted = before != hopper.storage_free();
        trace!(
            target: "interop::adapters::hopper",
            cube_type = cube.cube_type,
            value = cube.value,
            before,
            after = hopper.storage_free(),
            accepted,
            "add cube"
        );
        Ok(accepted)
    }

    fn take_item(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<Option<ItemRecord>> {
        let hopper = provider_mut::<H>(self.name(), entity)?;
        Ok(match item.cube() {
            None => hopper.remove_item_by_id(item.id()),
            Some(cube) => hopper.remove_cube_stack(cube),
        })
    }

    fn take_any_item(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
    ) -> InteropResult<Option<ItemRecord>> {
        if !self.round_robin {
            return Err(InteropError::Unsupported {
                adapter: self.name(),
                operation: Operation::TakeAnyItem,
            });
        }

        let hopper = provider_mut::<H>(self.name(), entity)?;
        if hopper.permissions() == HopperPermissions::Locked || !hopper.allows_logistics() {
            debug!(
                target: "interop::adapters::hopper",
                position = %hopper.position(),
                permissions = %hopper.permissions(),
                "hopper closed to logistics"
            );
            return Ok(None);
        }
        if hopper.storage_used() == 0 {
            return Ok(None);
        }

        let taken = match hopper.take_cube_round_robin() {
            Some(cube) if !cube.is_air() => Some(self.spawner.spawn_cube_stack(cube, 1)),
            _ => hopper.take_any_round_robin(),
        };

        if taken.is_some() {
            hopper.record_logistics_operation();
            hopper.request_immediate_update();
        }
        Ok(taken)
    }
}
