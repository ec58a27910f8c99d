//! Transfers over plain item buffers.
//!
//! Buffers are mutated in place. Capacity is measured in units, so a stack of
//! 40 occupies 40 of it and a non-stackable record occupies 1.
use tracing::debug;

use crate::item::{ItemRecord, item_count};

/// Which source entries [`move_items`] may touch.
///
/// Filter entries match by base equality, so durability and charge are
/// ignored. Cube stacks match only the same cube. An empty whitelist allows
/// everything.
#[derive(Clone, Copy, Debug, Default)]
pub enum ItemFilter<'f> {
    #[default]
    Any,
    Whitelist(&'f [ItemRecord]),
    Blacklist(&'f [ItemRecord]),
}

impl ItemFilter<'_> {
    pub fn allows(&self, item: &ItemRecord) -> bool {
        match self {
            ItemFilter::Any => true,
            ItemFilter::Whitelist(list) => list.is_empty() || matches_any(list, item),
            ItemFilter::Blacklist(list) => !matches_any(list, item),
        }
    }
}

fn matches_any(list: &[ItemRecord], item: &ItemRecord) -> bool {
    list.iter().any(|filter| match (filter.cube(), item.cube()) {
        (Some(wanted), Some(cube)) => wanted == cube,
        _ => filter.compare(item),
    })
}

/// Parameters for [`move_items`].
#[derive(Clone, Copy, Debug)]
pub struct MoveRequest<'f> {
    /// Units to move at most.
    pub amount: u32,
    /// Unit capacity of the target buffer.
    pub capacity: u32,
    pub filter: ItemFilter<'f>,
    /// Stop after the first entry that moved anything.
    pub first_only: bool,
}

impl MoveRequest<'_> {
    pub fn new(amount: u32, capacity: u32) -> Self {
        Self {
            amount,
            capacity,
            filter: ItemFilter::Any,
            first_only: false,
        }
    }
}

/// Adds `item` to `list`, merging into a mergeable entry when one exists.
///
/// At most `capacity - item_count(list)` units are inserted. Whatever does
/// not fit comes back as a new record that the caller must place elsewhere.
#[must_use = "overflow that is dropped is lost"]
pub fn add_list_item(
    item: ItemRecord,
    list: &mut Vec<ItemRecord>,
    capacity: u32,
) -> Option<ItemRecord> {
    let free = capacity.saturating_sub(item_count(list.iter()));
    let wanted = item.amount();
    if wanted == 0 {
        return None;
    }
    if free == 0 {
        return Some(item);
    }

    if !item.is_stackable() {
        list.push(item);
        return None;
    }

    let inserted = wanted.min(free);
    let overflow = (inserted < wanted).then(|| item.with_amount(wanted - inserted));
    merge_into(list, item.with_amount(inserted));
    overflow
}

/// Removes `item.amount()` units matching `item` from `list`.
///
/// Stackable items match by mergeability. An entry holding more than the
/// requested amount is decremented; one holding exactly that amount is
/// removed. An entry holding less is removed and returned only when
/// `allow_partial` is set. Non-stackable items remove the first base-equal
/// entry.
pub fn remove_list_item(
    item: &ItemRecord,
    list: &mut Vec<ItemRecord>,
    allow_partial: bool,
) -> Option<ItemRecord> {
    if !item.is_stackable() {
        let index = list.iter().position(|entry| entry.compare(item))?;
        return Some(list.remove(index));
    }

    let wanted = item.amount();
    for index in 0..list.len() {
        let entry = &mut list[index];
        if !entry.is_mergeable(item) {
            continue;
        }
        let held = entry.amount();
        if held > wanted {
            entry.decrement(wanted);
            return Some(entry.with_amount(wanted));
        }
        if held == wanted || allow_partial {
            return Some(list.remove(index));
        }
    }
    None
}

/// Moves units from `source` to `target`, returning how many moved.
///
/// Entries are visited in order. Each contributes the lesser of the
/// remaining request, its own stock and the target's free capacity; entries
/// consumed completely leave `source`.
pub fn move_items(
    source: &mut Vec<ItemRecord>,
    target: &mut Vec<ItemRecord>,
    request: &MoveRequest<'_>,
) -> u32 {
    let mut remaining = request.amount;
    let mut moved = 0u32;
    let mut index = 0;

    while index < source.len() && remaining > 0 {
        let free = request.capacity.saturating_sub(item_count(target.iter()));
        if free == 0 {
            break;
        }

        let entry = &mut source[index];
        let take = remaining.min(entry.amount()).min(free);
        if take == 0 || !request.filter.allows(entry) {
            index += 1;
            continue;
        }

        let portion = if take == entry.amount() {
            source.remove(index)
        } else {
            index += 1;
            match entry.split_off(take) {
                Some(portion) => portion,
                None => continue,
            }
        };

        merge_into(target, portion);
        moved += take;
        remaining -= take;
        if request.first_only {
            break;
        }
    }

    if moved > 0 {
        debug!(target: "interop::transfer", moved, requested = request.amount, "items moved");
    }
    moved
}

fn merge_into(list: &mut Vec<ItemRecord>, item: ItemRecord) {
    match list.iter_mut().find(|entry| entry.is_mergeable(&item)) {
        Some(entry) => entry.increment(item.amount()),
        None => list.push(item),
    }
}
