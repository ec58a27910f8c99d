//! Provider resolution and contract forwarding.
mod dispatcher;
mod registry;

pub use dispatcher::Dispatcher;
pub use registry::{AdapterRegistry, AdapterRegistryBuilder, Resolution};
