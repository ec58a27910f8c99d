use interop_core::item::{item_count, item_count_like};
use interop_core::transfer::{add_list_item, remove_list_item};
use interop_core::{ItemRecord, ItemStorage, SegmentEntity, StockReport, WorldPosition};
use tracing::warn;

/// Chest implementing [`ItemStorage`] itself; no adapter is involved.
#[derive(Clone, Debug)]
pub struct NativeChest {
    position: WorldPosition,
    capacity: u32,
    items: Vec<ItemRecord>,
}

impl NativeChest {
    pub fn new(position: WorldPosition, capacity: u32) -> Self {
        Self {
            position,
            capacity,
            items: Vec::new(),
        }
    }

    /// Prefills the chest. Units beyond capacity are discarded with a warning.
    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemRecord>) -> Self {
        for item in items {
            if let Some(overflow) = add_list_item(item, &mut self.items, self.capacity) {
                warn!(
                    target: "runtime::chest",
                    position = %self.position,
                    item = %overflow.item_type(),
                    discarded = overflow.amount(),
                    "prefill exceeds chest capacity"
                );
            }
        }
        self
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }
}

impl ItemStorage for NativeChest {
    fn has_any_items(&self) -> bool {
        item_count(&self.items) > 0
    }

    fn has_items(&self, item: &ItemRecord) -> StockReport {
        StockReport::of(item_count_like(&self.items, item))
    }

    fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(item_count(&self.items))
    }

    /// Accepts the whole record or nothing.
    fn give_item(&mut self, item: &ItemRecord) -> bool {
        if !self.has_free_space(item.amount()) {
            return false;
        }
        add_list_item(item.clone(), &mut self.items, self.capacity).is_none()
    }

    fn take_item(&mut self, item: &ItemRecord) -> Option<ItemRecord> {
        remove_list_item(item, &mut self.items, false)
    }

    fn take_any_item(&mut self) -> Option<ItemRecord> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0))
    }
}

impl SegmentEntity for NativeChest {
    fn position(&self) -> WorldPosition {
        self.position
    }

    fn item_storage(&self) -> Option<&dyn ItemStorage> {
        Some(self)
    }

    fn item_storage_mut(&mut self) -> Option<&mut dyn ItemStorage> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use interop_core::ItemId;

    use super::*;

    #[test]
    fn give_is_all_or_nothing() {
        let mut chest = NativeChest::new(WorldPosition::ORIGIN, 5);

        assert!(chest.give_item(&ItemRecord::stack(ItemId(1), 4)));
        assert!(!chest.give_item(&ItemRecord::stack(ItemId(1), 2)));
        assert!(chest.give_item(&ItemRecord::stack(ItemId(1), 1)));

        assert_eq!(chest.items(), [ItemRecord::stack(ItemId(1), 5)]);
        assert_eq!(chest.free_space(), 0);
    }

    #[test]
    fn take_item_leaves_remainder() {
        let mut chest =
            NativeChest::new(WorldPosition::ORIGIN, 64).with_items([ItemRecord::cube_stack(3, 1, 10)]);

        let taken = chest.take_item(&ItemRecord::cube_stack(3, 1, 4)).unwrap();

        assert_eq!(taken.amount(), 4);
        assert_eq!(chest.has_items(&ItemRecord::cube_stack(3, 1, 1)), StockReport::of(6));
        assert!(chest.take_item(&ItemRecord::cube_stack(3, 1, 7)).is_none());
    }

    #[test]
    fn prefill_stops_at_capacity() {
        let chest = NativeChest::new(WorldPosition::ORIGIN, 3)
            .with_items([ItemRecord::stack(ItemId(1), 2), ItemRecord::stack(ItemId(2), 4)]);

        assert_eq!(
            chest.items(),
            [ItemRecord::stack(ItemId(1), 2), ItemRecord::stack(ItemId(2), 1)]
        );
        assert_eq!(chest.free_space(), 0);
    }

    #[test]
    fn take_any_returns_whole_entries_in_order() {
        let mut chest = NativeChest::new(WorldPosition::ORIGIN, 64)
            .with_items([ItemRecord::single(ItemId(2)), ItemRecord::stack(ItemId(3), 9)]);

        assert_eq!(chest.take_any_item(), Some(ItemRecord::single(ItemId(2))));
        assert_eq!(chest.take_any_item(), Some(ItemRecord::stack(ItemId(3), 9)));
        assert!(!chest.has_any_items());
        assert_eq!(chest.take_any_item(), None);
    }
}
