//! Quantity sums over collections of item records.
use super::{Cube, ItemId, ItemRecord};

/// Sum of [`ItemRecord::amount`] over every record.
pub fn item_count<'a>(items: impl IntoIterator<Item = &'a ItemRecord>) -> u32 {
    items
        .into_iter()
        .fold(0u32, |total, item| total.saturating_add(item.amount()))
}

/// Sum restricted to records with the given item id.
pub fn item_count_by_id<'a>(items: impl IntoIterator<Item = &'a ItemRecord>, id: ItemId) -> u32 {
    item_count(items.into_iter().filter(|item| item.id() == id))
}

/// Sum restricted to cube stacks of exactly `cube`.
pub fn item_count_by_cube<'a>(items: impl IntoIterator<Item = &'a ItemRecord>, cube: Cube) -> u32 {
    item_count(items.into_iter().filter(|item| item.cube() == Some(cube)))
}

/// Counts by cube when `example` is a cube stack, otherwise by item id.
pub fn item_count_like<'a>(
    items: impl IntoIterator<Item = &'a ItemRecord>,
    example: &ItemRecord,
) -> u32 {
    match example.cube() {
        Some(cube) => item_count_by_cube(items, cube),
        None => item_count_by_id(items, example.id()),
    }
}
