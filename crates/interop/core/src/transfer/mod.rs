//! Moving items between in-memory buffers and neighboring providers.
mod list;
mod surrounding;

pub use list::{ItemFilter, MoveRequest, add_list_item, move_items, remove_list_item};
pub use surrounding::{give_to_surrounding, take_from_surrounding, take_item_from_surrounding};
