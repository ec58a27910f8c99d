use interop_core::item::item_count;
use interop_core::transfer::{
    ItemFilter, MoveRequest, add_list_item, give_to_surrounding, move_items, remove_list_item,
    take_from_surrounding,
};
use interop_core::{Dispatcher, ItemRecord, SegmentEntity, WorldOracle, WorldPosition};
use tracing::{debug, warn};

use crate::error::Result;

/// Machine with an internal item buffer that exchanges cargo with its
/// neighbors one transfer at a time.
///
/// Pulled cargo that does not fit the buffer is parked in a spill slot and
/// must be pushed out before the machine pulls again.
#[derive(Clone, Debug)]
pub struct MachineBuffer {
    position: WorldPosition,
    capacity: u32,
    buffer: Vec<ItemRecord>,
    spill: Option<ItemRecord>,
}

impl MachineBuffer {
    pub fn new(position: WorldPosition, capacity: u32) -> Self {
        Self {
            position,
            capacity,
            buffer: Vec::new(),
            spill: None,
        }
    }

    pub fn buffer(&self) -> &[ItemRecord] {
        &self.buffer
    }

    pub fn spill(&self) -> Option<&ItemRecord> {
        self.spill.as_ref()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(item_count(&self.buffer))
    }

    /// Stores `item` directly, returning what did not fit.
    pub fn insert(&mut self, item: ItemRecord) -> Option<ItemRecord> {
        add_list_item(item, &mut self.buffer, self.capacity)
    }

    /// Pulls one offer from the neighbors into the buffer.
    ///
    /// Returns the number of units stored.
    pub fn pull<W>(&mut self, dispatcher: &Dispatcher, world: &mut W) -> Result<u32>
    where
        W: WorldOracle + ?Sized,
    {
        if self.spill.is_some() || self.free_space() == 0 {
            return Ok(0);
        }
        let Some(item) = take_from_surrounding(dispatcher, world, &*self)? else {
            return Ok(0);
        };

        let offered = item.amount();
        let stored = match self.insert(item) {
            None => offered,
            Some(rest) => {
                let stored = offered - rest.amount();
                warn!(
                    target: "runtime::machine",
                    position = %self.position,
                    spilled = rest.amount(),
                    "pulled more than the buffer holds"
                );
                self.spill = Some(rest);
                stored
            }
        };
        Ok(stored)
    }

    /// Pushes one unit of the oldest cargo to a neighbor.
    ///
    /// Spilled cargo goes first. Returns whether anything left the machine.
    pub fn push<W>(&mut self, dispatcher: &Dispatcher, world: &mut W) -> Result<bool>
    where
        W: WorldOracle + ?Sized,
    {
        if let Some(spill) = self.spill.take() {
            let accepted = give_to_surrounding(dispatcher, world, &*self, &spill)?;
            if !accepted {
                self.spill = Some(spill);
            }
            return Ok(accepted);
        }

        let Some(unit) = self.buffer.first().map(|entry| entry.with_amount(1)) else {
            return Ok(false);
        };
        if !give_to_surrounding(dispatcher, world, &*self, &unit)? {
            return Ok(false);
        }
        let removed = remove_list_item(&unit, &mut self.buffer, false);
        debug!(
            target: "runtime::machine",
            position = %self.position,
            removed = removed.is_some(),
            "unit pushed"
        );
        Ok(true)
    }

    /// Moves buffered units into `target`, honoring its capacity.
    pub fn transfer_to(
        &mut self,
        target: &mut MachineBuffer,
        amount: u32,
        filter: ItemFilter<'_>,
    ) -> u32 {
        let request = MoveRequest {
            filter,
            ..MoveRequest::new(amount, target.capacity)
        };
        move_items(&mut self.buffer, &mut target.buffer, &request)
    }
}

impl SegmentEntity for MachineBuffer {
    fn position(&self) -> WorldPosition {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use interop_core::ItemId;

    use super::*;

    #[test]
    fn transfer_respects_target_capacity_and_filter() {
        let mut source = MachineBuffer::new(WorldPosition::ORIGIN, 100);
        assert!(source.insert(ItemRecord::cube_stack(4, 0, 10)).is_none());
        assert!(source.insert(ItemRecord::stack(ItemId(9), 5)).is_none());
        let mut target = MachineBuffer::new(WorldPosition::new(1, 0, 0), 6);

        let blocked = [ItemRecord::stack(ItemId(9), 1)];
        let moved = source.transfer_to(&mut target, 50, ItemFilter::Blacklist(&blocked));

        assert_eq!(moved, 6);
        assert_eq!(target.free_space(), 0);
        assert_eq!(item_count(source.buffer()), 9);
    }

    #[test]
    fn insert_reports_overflow() {
        let mut machine = MachineBuffer::new(WorldPosition::ORIGIN, 3);

        let rest = machine.insert(ItemRecord::cube_stack(1, 0, 5)).unwrap();

        assert_eq!(rest.amount(), 2);
        assert_eq!(machine.free_space(), 0);
    }
}
