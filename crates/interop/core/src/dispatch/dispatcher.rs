//! Contract dispatch over native providers and registered adapters.

use tracing::{debug, warn};

use super::registry::{AdapterRegistry, Resolution};
use crate::adapters::StorageAdapter;
use crate::env::SegmentEntity;
use crate::error::{InteropError, InteropFailure, InteropResult};
use crate::item::ItemRecord;
use crate::storage::{Operation, StockReport};

/// Forwards storage contract calls to whichever implementation a provider has.
///
/// Unsupported providers, stubbed adapter operations and adapter/type
/// mismatches all produce the operation's neutral result (`false`, `0` or
/// `None`). The only error that reaches the caller is
/// [`InteropError::MissingCaller`].
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    registry: AdapterRegistry,
}

impl Dispatcher {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// True if the provider has an adapter or a native contract.
    pub fn supports(&self, entity: &dyn SegmentEntity) -> bool {
        self.registry.resolve(entity).is_supported()
    }

    pub fn has_any_items(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<bool> {
        let op = Operation::HasAnyItems;
        match self.registry.resolve(entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(adapter, op, adapter.has_any_items(caller, entity), false)
            }
            Resolution::Native => Ok(entity.item_storage().is_some_and(|s| s.has_any_items())),
            Resolution::Unsupported => Ok(unsupported(entity, op, false)),
        }
    }

    pub fn has_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool> {
        let op = Operation::HasItem;
        match self.registry.resolve(entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(adapter, op, adapter.has_item(caller, entity, item), false)
            }
            Resolution::Native => Ok(entity.item_storage().is_some_and(|s| s.has_item(item))),
            Resolution::Unsupported => Ok(unsupported(entity, op, false)),
        }
    }

    pub fn has_items(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<StockReport> {
        let op = Operation::HasItems;
        match self.registry.resolve(entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(
                    adapter,
                    op,
                    adapter.has_items(caller, entity, item),
                    StockReport::NONE,
                )
            }
            Resolution::Native => Ok(entity
                .item_storage()
                .map_or(StockReport::NONE, |s| s.has_items(item))),
            Resolution::Unsupported => Ok(unsupported(entity, op, StockReport::NONE)),
        }
    }

    pub fn has_free_space(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
        amount: u32,
    ) -> InteropResult<bool> {
        let op = Operation::HasFreeSpace;
        match self.registry.resolve(entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(
                    adapter,
                    op,
                    adapter.has_free_space(caller, entity, amount),
                    false,
                )
            }
            Resolution::Native => Ok(entity
                .item_storage()
                .is_some_and(|s| s.has_free_space(amount))),
            Resolution::Unsupported => Ok(unsupported(entity, op, false)),
        }
    }

    pub fn free_space(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &dyn SegmentEntity,
    ) -> InteropResult<u32> {
        let op = Operation::GetFreeSpace;
        match self.registry.resolve(entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(adapter, op, adapter.free_space(caller, entity), 0)
            }
            Resolution::Native => Ok(entity.item_storage().map_or(0, |s| s.free_space())),
            Resolution::Unsupported => Ok(unsupported(entity, op, 0)),
        }
    }

    /// Offers `item` to the provider. On `Ok(true)` the provider holds its own
    /// copy and the caller should drop theirs.
    pub fn give_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<bool> {
        let op = Operation::GiveItem;
        match self.registry.resolve(&*entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(adapter, op, adapter.give_item(caller, entity, item), false)
            }
            Resolution::Native => Ok(entity
                .item_storage_mut()
                .is_some_and(|s| s.give_item(item))),
            Resolution::Unsupported => Ok(unsupported(&*entity, op, false)),
        }
    }

    pub fn take_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        item: &ItemRecord,
    ) -> InteropResult<Option<ItemRecord>> {
        let op = Operation::TakeItem;
        match self.registry.resolve(&*entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(adapter, op, adapter.take_item(caller, entity, item), None)
            }
            Resolution::Native => Ok(entity.item_storage_mut().and_then(|s| s.take_item(item))),
            Resolution::Unsupported => Ok(unsupported(&*entity, op, None)),
        }
    }

    pub fn take_any_item(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
    ) -> InteropResult<Option<ItemRecord>> {
        let op = Operation::TakeAnyItem;
        match self.registry.resolve(&*entity) {
            Resolution::Adapter(adapter) => {
                self.check_caller(adapter, op, caller)?;
                settle(adapter, op, adapter.take_any_item(caller, entity), None)
            }
            Resolution::Native => Ok(entity.item_storage_mut().and_then(|s| s.take_any_item())),
            Resolution::Unsupported => Ok(unsupported(&*entity, op, None)),
        }
    }

    /// Takes a single cube of the given type and value from the provider.
    pub fn take_cube(
        &self,
        caller: Option<&dyn SegmentEntity>,
        entity: &mut dyn SegmentEntity,
        cube_type: u16,
        cube_value: u16,
    ) -> InteropResult<Option<ItemRecord>> {
        let example = ItemRecord::cube_stack(cube_type, cube_value, 1);
        self.take_item(caller, entity, &example)
    }

    fn check_caller(
        &self,
        adapter: &dyn StorageAdapter,
        operation: Operation,
        caller: Option<&dyn SegmentEntity>,
    ) -> InteropResult<()> {
        if caller.is_none() && adapter.caller_required(operation) {
            let err = InteropError::MissingCaller { operation };
            warn!(
                target: "interop::dispatch",
                adapter = adapter.name(),
                code = err.error_code(),
                "{}", err
            );
            return Err(err);
        }
        Ok(())
    }
}

/// Replaces neutral adapter errors with `neutral`, propagating the rest.
fn settle<T>(
    adapter: &dyn StorageAdapter,
    operation: Operation,
    result: InteropResult<T>,
    neutral: T,
) -> InteropResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_neutral() => {
            if err.severity().is_recoverable() {
                debug!(
                    target: "interop::dispatch",
                    adapter = adapter.name(),
                    %operation,
                    code = err.error_code(),
                    "{}", err
                );
            } else {
                // Adapter wired to the wrong provider type.
                warn!(
                    target: "interop::dispatch",
                    adapter = adapter.name(),
                    %operation,
                    severity = %err.severity(),
                    code = err.error_code(),
                    "{}", err
                );
            }
            Ok(neutral)
        }
        Err(err) => Err(err),
    }
}

fn unsupported<T>(entity: &dyn SegmentEntity, operation: Operation, neutral: T) -> T {
    debug!(
        target: "interop::dispatch",
        provider = entity.type_name(),
        %operation,
        "provider not supported"
    );
    neutral
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::{ConveyorAdapter, ConveyorFlags, ConveyorSlot};
    use crate::env::DefaultItemSpawner;
    use crate::item::{Cube, ItemId};
    use crate::storage::ItemStorage;
    use crate::types::{WorldOffset, WorldPosition};

    struct Rock;

    impl SegmentEntity for Rock {
        fn position(&self) -> WorldPosition {
            WorldPosition::ORIGIN
        }
    }

    #[derive(Default)]
    struct Crate {
        items: Vec<ItemRecord>,
    }

    impl ItemStorage for Crate {
        fn has_any_items(&self) -> bool {
            !self.items.is_empty()
        }
        fn has_items(&self, item: &ItemRecord) -> StockReport {
            StockReport::of(crate::item::item_count_like(&self.items, item))
        }
        fn free_space(&self) -> u32 {
            8 - self.items.len() as u32
        }
        fn give_item(&mut self, item: &ItemRecord) -> bool {
            if self.free_space() == 0 {
                return false;
            }
            self.items.push(item.clone());
            true
        }
        fn take_item(&mut self, item: &ItemRecord) -> Option<ItemRecord> {
            let index = self.items.iter().position(|i| i.compare(item))?;
            Some(self.items.remove(index))
        }
        fn take_any_item(&mut self) -> Option<ItemRecord> {
            self.items.pop()
        }
    }

    impl SegmentEntity for Crate {
        fn position(&self) -> WorldPosition {
            WorldPosition::ORIGIN
        }
        fn item_storage(&self) -> Option<&dyn ItemStorage> {
            Some(self)
        }
        fn item_storage_mut(&mut self) -> Option<&mut dyn ItemStorage> {
            Some(self)
        }
    }

    struct Chute {
        loaded: Option<Cube>,
    }

    impl SegmentEntity for Chute {
        fn position(&self) -> WorldPosition {
            WorldPosition::new(1, 0, 0)
        }
    }

    impl ConveyorSlot for Chute {
        fn ready_to_convey(&self) -> bool {
            self.loaded.is_none()
        }
        fn carry_timer(&self) -> f32 {
            0.0
        }
        fn forwards(&self) -> WorldOffset {
            WorldOffset::NEG_X
        }
        fn carried_cube(&self) -> Option<Cube> {
            self.loaded
        }
        fn carried_item(&self) -> Option<&ItemRecord> {
            None
        }
        fn add_cube(&mut self, cube: Cube) {
            self.loaded = Some(cube);
        }
        fn add_item(&mut self, _item: &ItemRecord) {}
        fn remove_cube(&mut self) {
            self.loaded = None;
        }
        fn remove_item(&mut self) {}
        fn finalise_offloading_cargo(&mut self) {}
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            AdapterRegistry::builder()
                .register::<Chute, _>(ConveyorAdapter::<Chute>::new(
                    Arc::new(DefaultItemSpawner),
                    ConveyorFlags::REQUIRE_FACING,
                ))
                .build(),
        )
    }

    #[test]
    fn unsupported_provider_gets_neutral_results() {
        let dispatcher = dispatcher();
        let mut rock = Rock;
        let item = ItemRecord::stack(ItemId(1), 2);

        assert!(!dispatcher.supports(&rock));
        assert!(!dispatcher.has_any_items(None, &rock).unwrap());
        assert!(!dispatcher.has_item(None, &rock, &item).unwrap());
        assert_eq!(dispatcher.has_items(None, &rock, &item).unwrap(), StockReport::NONE);
        assert!(!dispatcher.has_free_space(None, &rock, 1).unwrap());
        assert_eq!(dispatcher.free_space(None, &rock).unwrap(), 0);
        assert!(!dispatcher.give_item(None, &mut rock, &item).unwrap());
        assert!(dispatcher.take_item(None, &mut rock, &item).unwrap().is_none());
        assert!(dispatcher.take_any_item(None, &mut rock).unwrap().is_none());
    }

    #[test]
    fn native_providers_are_called_directly() {
        let dispatcher = dispatcher();
        let mut chest = Crate::default();
        let item = ItemRecord::stack(ItemId(4), 3);

        assert!(matches!(dispatcher.registry().resolve(&chest), Resolution::Native));
        assert!(dispatcher.give_item(None, &mut chest, &item).unwrap());
        assert_eq!(dispatcher.has_items(None, &chest, &item).unwrap().amount, 3);
        assert_eq!(dispatcher.free_space(None, &chest).unwrap(), 7);
        assert_eq!(dispatcher.take_any_item(None, &mut chest).unwrap(), Some(item));
    }

    #[test]
    fn registered_adapter_wins() {
        let dispatcher = dispatcher();
        let chute = Chute { loaded: None };

        assert!(matches!(dispatcher.registry().resolve(&chute), Resolution::Adapter(_)));
        assert_eq!(dispatcher.free_space(None, &chute).unwrap(), 1);
    }

    #[test]
    fn missing_caller_is_rejected_at_the_boundary() {
        let dispatcher = dispatcher();
        let mut chute = Chute {
            loaded: Some(Cube::new(2, 1)),
        };

        let err = dispatcher.take_any_item(None, &mut chute).unwrap_err();
        assert!(matches!(err, InteropError::MissingCaller { .. }));
        assert_eq!(chute.loaded, Some(Cube::new(2, 1)));

        let machine = Rock;
        let cargo = dispatcher.take_cube(Some(&machine), &mut chute, 2, 1).unwrap();
        assert_eq!(cargo, Some(ItemRecord::cube_stack(2, 1, 1)));
    }

    #[test]
    fn mismatched_adapter_is_neutral() {
        let dispatcher = Dispatcher::new(
            AdapterRegistry::builder()
                .register::<Rock, _>(ConveyorAdapter::<Chute>::new(
                    Arc::new(DefaultItemSpawner),
                    ConveyorFlags::empty(),
                ))
                .build(),
        );

        assert_eq!(dispatcher.free_space(None, &Rock).unwrap(), 0);
    }
}
