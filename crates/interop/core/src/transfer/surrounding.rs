//! Machine-level transfers with the six neighboring providers.
//!
//! Conveyors are directional: they only accept cargo from behind and only
//! yield it to the entity they point at. Neighbors are tried in scan order
//! and the first provider that acts wins.
use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::dispatch::Dispatcher;
use crate::env::{SegmentEntity, WorldOracle};
use crate::error::InteropResult;
use crate::item::ItemRecord;
use crate::spatial::{find_neighbors, is_facing};
use crate::types::WorldPosition;

/// Offers `item` to each neighbor until one accepts it.
///
/// Returns `true` if a provider took the item; it now owns a copy and the
/// caller should drop its own. Conveyors pointing at `machine` are skipped.
/// `machine` must not be borrowed from `world`.
pub fn give_to_surrounding<W>(
    dispatcher: &Dispatcher,
    world: &mut W,
    machine: &dyn SegmentEntity,
    item: &ItemRecord,
) -> InteropResult<bool>
where
    W: WorldOracle + ?Sized,
{
    let center = machine.position();
    let targets = candidates(dispatcher, world, center, |entity| !is_facing(entity, center));

    for position in targets {
        let Some(entity) = world.entity_at_mut(position) else {
            continue;
        };
        if dispatcher.give_item(Some(machine), entity, item)? {
            debug!(
                target: "interop::transfer",
                machine = %center,
                %position,
                item = %item.item_type(),
                amount = item.amount(),
                "gave item to neighbor"
            );
            return Ok(true);
        }
    }
    Ok(false)
}

/// Takes whatever the first willing neighbor offers.
///
/// Directional neighbors are only asked when they point at `machine`.
pub fn take_from_surrounding<W>(
    dispatcher: &Dispatcher,
    world: &mut W,
    machine: &dyn SegmentEntity,
) -> InteropResult<Option<ItemRecord>>
where
    W: WorldOracle + ?Sized,
{
    let center = machine.position();
    let sources = candidates(dispatcher, world, center, |entity| yields_to(entity, center));

    for position in sources {
        let Some(entity) = world.entity_at_mut(position) else {
            continue;
        };
        if let Some(taken) = dispatcher.take_any_item(Some(machine), entity)? {
            log_taken(center, position, &taken);
            return Ok(Some(taken));
        }
    }
    Ok(None)
}

/// Takes `item` from the first neighbor that holds it.
pub fn take_item_from_surrounding<W>(
    dispatcher: &Dispatcher,
    world: &mut W,
    machine: &dyn SegmentEntity,
    item: &ItemRecord,
) -> InteropResult<Option<ItemRecord>>
where
    W: WorldOracle + ?Sized,
{
    let center = machine.position();
    let sources = candidates(dispatcher, world, center, |entity| yields_to(entity, center));

    for position in sources {
        let Some(entity) = world.entity_at_mut(position) else {
            continue;
        };
        if let Some(taken) = dispatcher.take_item(Some(machine), entity, item)? {
            log_taken(center, position, &taken);
            return Ok(Some(taken));
        }
    }
    Ok(None)
}

fn yields_to(entity: &dyn SegmentEntity, center: WorldPosition) -> bool {
    entity.orientation().is_none() || is_facing(entity, center)
}

/// Positions of supported neighbors accepted by `filter`, in scan order.
fn candidates<W, F>(
    dispatcher: &Dispatcher,
    world: &W,
    center: WorldPosition,
    filter: F,
) -> ArrayVec<WorldPosition, 6>
where
    W: WorldOracle + ?Sized,
    F: Fn(&dyn SegmentEntity) -> bool,
{
    let scan = find_neighbors(world, center, |entity| {
        dispatcher.supports(entity) && filter(entity)
    });
    if scan.unloaded_encountered() {
        trace!(target: "interop::transfer", machine = %center, "some neighbors unloaded");
    }
    scan.positions().collect()
}

fn log_taken(center: WorldPosition, position: WorldPosition, taken: &ItemRecord) {
    debug!(
        target: "interop::transfer",
        machine = %center,
        %position,
        item = %taken.item_type(),
        amount = taken.amount(),
        "took item from neighbor"
    );
}
