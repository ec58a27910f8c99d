//! The storage capability contract.
//!
//! [`ItemStorage`] is what a provider implements to take part in item
//! exchange without an adapter. Adapters in [`crate::adapters`] express the
//! same operations over providers that never heard of this trait.

use crate::item::ItemRecord;

/// Contract operations, used for logging, errors and caller requirements.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    HasAnyItems,
    HasItem,
    HasItems,
    HasFreeSpace,
    GetFreeSpace,
    GiveItem,
    TakeItem,
    TakeAnyItem,
}

/// Answer to a stock query: whether matching stock exists and how much.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StockReport {
    pub present: bool,
    pub amount: u32,
}

impl StockReport {
    pub const NONE: Self = Self {
        present: false,
        amount: 0,
    };

    /// Report for `amount` matching units; present iff `amount > 0`.
    pub const fn of(amount: u32) -> Self {
        Self {
            present: amount > 0,
            amount,
        }
    }
}

/// Storage capability contract for providers that implement it natively.
///
/// Query methods never mutate. `give_item` stores its own copy of the record
/// and only on success, so callers drop theirs once it returns `true`.
/// `take_item` and `take_any_item` hand back an owned record carrying the
/// amount actually withdrawn.
pub trait ItemStorage {
    fn has_any_items(&self) -> bool;

    fn has_item(&self, item: &ItemRecord) -> bool {
        let report = self.has_items(item);
        report.present && report.amount > 0
    }

    fn has_items(&self, item: &ItemRecord) -> StockReport;

    fn has_free_space(&self, amount: u32) -> bool {
        self.free_space() >= amount
    }

    fn free_space(&self) -> u32;

    fn give_item(&mut self, item: &ItemRecord) -> bool;

    fn take_item(&mut self, item: &ItemRecord) -> Option<ItemRecord>;

    fn take_any_item(&mut self) -> Option<ItemRecord>;
}
