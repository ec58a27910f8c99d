//! Cross-provider item storage interoperability.
//!
//! `interop-core` lets a machine query and transact with any neighboring
//! storage provider through one contract, whether the provider implements
//! [`ItemStorage`] natively or is reached through a registered
//! [`StorageAdapter`]. All provider access flows through [`Dispatcher`], and
//! host crates implement the collaborator traits in [`env`].
pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod item;
pub mod spatial;
pub mod storage;
pub mod transfer;
pub mod types;

pub use adapters::{
    ConveyorAdapter, ConveyorFlags, ConveyorSlot, HopperAdapter, HopperPermissions,
    HopperStorage, StorageAdapter,
};
pub use config::InteropConfig;
pub use dispatch::{AdapterRegistry, AdapterRegistryBuilder, Dispatcher, Resolution};
pub use env::{AsAny, DefaultItemSpawner, ItemSpawner, Segment, SegmentEntity, WorldOracle};
pub use error::{ErrorSeverity, InteropError, InteropFailure, InteropResult};
pub use item::{Cube, ItemId, ItemKind, ItemRecord, ItemType};
pub use spatial::{Face, Neighbor, NeighborScan, find_neighbors, is_conveyor_facing, is_facing};
pub use storage::{ItemStorage, Operation, StockReport};
pub use transfer::{
    ItemFilter, MoveRequest, add_list_item, give_to_surrounding, move_items, remove_list_item,
    take_from_surrounding, take_item_from_surrounding,
};
pub use types::{LookVector, WorldOffset, WorldPosition};
