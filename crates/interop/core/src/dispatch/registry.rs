//! Adapter registry keyed by concrete provider type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::StorageAdapter;
use crate::env::SegmentEntity;

/// How a provider will be driven.
#[derive(Clone, Copy)]
pub enum Resolution<'r> {
    /// A registered adapter for the provider's exact type.
    Adapter(&'r dyn StorageAdapter),
    /// The provider implements the storage contract itself.
    Native,
    /// No adapter and no native contract.
    Unsupported,
}

impl Resolution<'_> {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Resolution::Unsupported)
    }
}

impl std::fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Adapter(adapter) => f.debug_tuple("Adapter").field(&adapter.name()).finish(),
            Resolution::Native => f.write_str("Native"),
            Resolution::Unsupported => f.write_str("Unsupported"),
        }
    }
}

/// Immutable mapping from provider type to adapter, built once at startup.
///
/// Resolution order:
/// 1. an adapter registered for the provider's exact type
/// 2. the provider's native [`ItemStorage`](crate::storage::ItemStorage)
/// 3. unsupported
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<TypeId, Arc<dyn StorageAdapter>>,
}

impl AdapterRegistry {
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::default()
    }

    pub fn resolve(&self, entity: &dyn SegmentEntity) -> Resolution<'_> {
        let type_id = Any::type_id(entity.as_any());
        if let Some(adapter) = self.adapters.get(&type_id) {
            return Resolution::Adapter(adapter.as_ref());
        }
        if entity.item_storage().is_some() {
            return Resolution::Native;
        }
        Resolution::Unsupported
    }

    /// Adapter registered for provider type `P`.
    pub fn get<P: SegmentEntity>(&self) -> Option<&Arc<dyn StorageAdapter>> {
        self.adapters.get(&TypeId::of::<P>())
    }

    /// Returns the number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Returns an iterator over registered adapter names (for debugging).
    pub fn adapter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.values().map(|a| a.name())
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapter_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`AdapterRegistry`].
#[derive(Default)]
pub struct AdapterRegistryBuilder {
    adapters: HashMap<TypeId, Arc<dyn StorageAdapter>>,
}

impl AdapterRegistryBuilder {
    /// Registers `adapter` for provider type `P`, replacing any previous one.
    #[must_use]
    pub fn register<P, A>(mut self, adapter: A) -> Self
    where
        P: SegmentEntity,
        A: StorageAdapter + 'static,
    {
        debug!(
            target: "interop::dispatch",
            provider = std::any::type_name::<P>(),
            adapter = adapter.name(),
            "register adapter"
        );
        self.adapters.insert(TypeId::of::<P>(), Arc::new(adapter));
        self
    }

    pub fn build(self) -> AdapterRegistry {
        AdapterRegistry {
            adapters: self.adapters,
        }
    }
}
