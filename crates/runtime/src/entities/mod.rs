//! Concrete providers placed in a [`SegmentWorld`](crate::world::SegmentWorld).
//!
//! [`StorageHopper`] and [`ConveyorBelt`] expose their own APIs and are
//! reached through adapters. [`NativeChest`] implements the storage contract
//! directly. [`MachineBuffer`] is a consumer that pulls from and pushes to
//! its neighbors.
mod chest;
mod conveyor;
mod hopper;
mod machine;

pub use chest::NativeChest;
pub use conveyor::{ConveyorBelt, Recipe};
pub use hopper::StorageHopper;
pub use machine::MachineBuffer;
