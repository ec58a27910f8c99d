use std::collections::BTreeSet;

use interop_core::item::{item_count, item_count_by_cube, item_count_by_id};
use interop_core::transfer::{add_list_item, remove_list_item};
use interop_core::{
    Cube, HopperPermissions, HopperStorage, ItemId, ItemRecord, SegmentEntity, WorldPosition,
};
use tracing::trace;

/// Fixed-capacity hopper with a round-robin output cursor.
#[derive(Clone, Debug)]
pub struct StorageHopper {
    position: WorldPosition,
    capacity: u32,
    inventory: Vec<ItemRecord>,
    permissions: HopperPermissions,
    logistics: bool,
    cursor: usize,
    ore_types: BTreeSet<u16>,
    logistics_operations: u64,
    update_requested: bool,
}

impl StorageHopper {
    pub fn new(position: WorldPosition, capacity: u32) -> Self {
        Self {
            position,
            capacity,
            inventory: Vec::new(),
            permissions: HopperPermissions::default(),
            logistics: true,
            cursor: 0,
            ore_types: BTreeSet::new(),
            logistics_operations: 0,
            update_requested: false,
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: HopperPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Cube types counted as ore regardless of value.
    #[must_use]
    pub fn with_ore_types(mut self, ore_types: impl IntoIterator<Item = u16>) -> Self {
        self.ore_types = ore_types.into_iter().collect();
        self
    }

    pub fn set_permissions(&mut self, permissions: HopperPermissions) {
        self.permissions = permissions;
    }

    pub fn set_logistics(&mut self, enabled: bool) {
        self.logistics = enabled;
    }

    pub fn inventory(&self) -> &[ItemRecord] {
        &self.inventory
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn logistics_operations(&self) -> u64 {
        self.logistics_operations
    }

    /// Returns and clears the pending broadcast request.
    pub fn take_update_request(&mut self) -> bool {
        std::mem::take(&mut self.update_requested)
    }

    fn accepts_input(&self) -> bool {
        matches!(
            self.permissions,
            HopperPermissions::AddAndRemove | HopperPermissions::AddOnly
        )
    }

    fn allows_output(&self) -> bool {
        matches!(
            self.permissions,
            HopperPermissions::AddAndRemove | HopperPermissions::RemoveOnly
        )
    }

    fn insert(&mut self, item: ItemRecord) {
        if let Some(overflow) = add_list_item(item, &mut self.inventory, self.capacity) {
            // Callers check free space first.
            trace!(target: "runtime::hopper", amount = overflow.amount(), "overflow dropped");
        }
    }

    /// Removes one unit of the entry at `index`.
    fn take_unit(&mut self, index: usize) -> Option<ItemRecord> {
        let entry = self.inventory.get_mut(index)?;
        if entry.is_stackable() && entry.amount() > 1 {
            entry.decrement(1);
            return Some(entry.with_amount(1));
        }
        Some(self.inventory.remove(index))
    }

    /// Index of the next entry accepted by `filter`, starting at the cursor.
    fn next_index(&mut self, filter: impl Fn(&ItemRecord) -> bool) -> Option<usize> {
        let len = self.inventory.len();
        let index = (0..len)
            .map(|step| (self.cursor + step) % len)
            .find(|&index| filter(&self.inventory[index]))?;
        self.cursor = (index + 1) % len;
        Some(index)
    }
}

impl SegmentEntity for StorageHopper {
    fn position(&self) -> WorldPosition {
        self.position
    }
}

impl HopperStorage for StorageHopper {
    fn storage_free(&self) -> u32 {
        self.capacity.saturating_sub(self.storage_used())
    }

    fn storage_used(&self) -> u32 {
        item_count(&self.inventory)
    }

    fn permissions(&self) -> HopperPermissions {
        self.permissions
    }

    fn allows_logistics(&self) -> bool {
        self.logistics
    }

    fn count_item(&self, id: ItemId) -> u32 {
        item_count_by_id(&self.inventory, id)
    }

    fn count_cube(&self, cube: Cube) -> u32 {
        item_count_by_cube(&self.inventory, cube)
    }

    fn count_ore(&self, cube_type: u16) -> u32 {
        item_count(
            self.inventory
                .iter()
                .filter(|item| item.cube().is_some_and(|c| c.cube_type == cube_type)),
        )
    }

    fn is_ore(&self, cube_type: u16) -> bool {
        self.ore_types.contains(&cube_type)
    }

    fn add_item(&mut self, item: &ItemRecord) -> bool {
        if !self.accepts_input() || self.storage_free() < item.amount() {
            return false;
        }
        self.insert(item.clone());
        true
    }

    fn add_cube(&mut self, cube: Cube) {
        if self.accepts_input() && self.storage_free() > 0 {
            self.insert(ItemRecord::cube_stack(cube.cube_type, cube.value, 1));
        }
    }

    fn remove_item_by_id(&mut self, id: ItemId) -> Option<ItemRecord> {
        if !self.allows_output() {
            return None;
        }
        let index = self
            .inventory
            .iter()
            .position(|item| item.cube().is_none() && item.id() == id)?;
        self.take_unit(index)
    }

    fn remove_cube_stack(&mut self, cube: Cube) -> Option<ItemRecord> {
        if !self.allows_output() {
            return None;
        }
        let unit = ItemRecord::cube_stack(cube.cube_type, cube.value, 1);
        remove_list_item(&unit, &mut self.inventory, false)
    }

    fn take_cube_round_robin(&mut self) -> Option<Cube> {
        if !self.allows_output() {
            return None;
        }
        let index = self.next_index(|item| item.cube().is_some())?;
        self.take_unit(index)?.cube()
    }

    fn take_any_round_robin(&mut self) -> Option<ItemRecord> {
        if !self.allows_output() {
            return None;
        }
        let index = self.next_index(|_| true)?;
        self.take_unit(index)
    }

    fn record_logistics_operation(&mut self) {
        self.logistics_operations += 1;
    }

    fn request_immediate_update(&mut self) {
        self.update_requested = true;
    }
}
