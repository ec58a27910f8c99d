//! Adapters that drive providers lacking a native [`ItemStorage`] contract.
//!
//! Each adapter is registered against one concrete provider type and
//! reaches that type's own API by downcasting the entity it is handed.
//!
//! [`ItemStorage`]: crate::storage::ItemStorage
mod conveyor;
mod hopper;

pub use conveyor::{ConveyorAdapter, ConveyorFlags, ConveyorSlot};
pub use hopper::{HopperAdapter, HopperPermissions, HopperStorage};

use crate::env::SegmentEntity;
use crate::error::{InteropError, InteropResult};
use crate::item::ItemRecord;
use crate::storage::{Operation, StockReport};

/// Translates the storage contract onto one provider type's native API.
///
/// Adapters assume validated input: the dispatcher checks
/// [`caller_required`](Self::caller_required) before forwarding. Returning
/// [`InteropError::Unsupported`] or [`InteropError::ProviderMismatch`] is
/// safe; the dispatcher turns both into the operation's neutral result.
pub trait StorageAdapter: Send + Sync {
    /// Stable adapter name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether `operation` needs the calling entity.
    fn caller_required(&self, _operation: Operation) -> bool {
        false
    }

    fn has_any_items(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<bool>;

    fn has_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool> {
        let report = self.has_items(caller, entity, item)?;
        Ok(report.present && report.amount > 0)
    }

    fn has_items(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<StockReport>;

    fn has_free_space(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        amount: u32,
    ) -> InteropResult<bool> {
        Ok(self.free_space(caller, entity)? >= amount)
    }

    fn free_space(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<u32>;

    fn give_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool>;

    fn take_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<Option<ItemRecord>>;

    /// Withdraws whatever is available. Adapters that cannot choose stock on
    /// their own keep this default stub.
    fn take_any_item(
        &self,
        _caller: Option<&dyn SegmentEntity>,
        _entity: &mut dyn SegmentEntity,
    ) -> InteropResult<Option<ItemRecord>> {
        Err(InteropError::Unsupported {
            adapter: self.name(),
            operation: Operation::TakeAnyItem,
        })
    }
}

/// Downcasts `entity` to the provider type an adapter was registered for.
pub(crate) fn provider<'e, P: SegmentEntity>(
    adapter: &'static str,
    entity: &'e dyn SegmentEntity,
) -> InteropResult<&'e P> {
    let found = entity.type_name();
    entity
        .as_any()
        .downcast_ref::<P>()
        .ok_or(InteropError::ProviderMismatch { adapter, found })
}

pub(crate) fn provider_mut<'e, P: SegmentEntity>(
    adapter: &'static str,
    entity: &'e mut dyn SegmentEntity,
) -> InteropResult<&'e mut P> {
    let found = entity.type_name();
    entity
        .as_any_mut()
        .downcast_mut::<P>()
        .ok_or(InteropError::ProviderMismatch { adapter, found })
}

/// Returns the caller or the `MissingCaller` error for `operation`.
pub(crate) fn require_caller(
    caller: Option<&dyn SegmentEntity>,
    operation: Operation,
) -> InteropResult<&dyn SegmentEntity> {
    caller.ok_or(InteropError::MissingCaller { operation })
}
