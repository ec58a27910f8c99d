use crate::adapters::ConveyorFlags;
use crate::item::FLOAT_TOLERANCE;

/// Tunable parameters of the interop layer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteropConfig {
    /// Relative tolerance for float fields in deep comparison.
    pub float_tolerance: f32,
    /// Conveyor adapter behavior.
    pub conveyor: ConveyorFlags,
    /// Register the hopper adapter with round-robin withdrawal. When false
    /// the legacy variant is registered, which cannot take arbitrary stock.
    pub hopper_round_robin: bool,
    /// Capacity used by list transfers when the caller gives none.
    pub default_list_capacity: u32,
}

impl InteropConfig {
    pub const DEFAULT_FLOAT_TOLERANCE: f32 = FLOAT_TOLERANCE;
    pub const DEFAULT_LIST_CAPACITY: u32 = u32::MAX;

    pub fn new() -> Self {
        Self {
            float_tolerance: Self::DEFAULT_FLOAT_TOLERANCE,
            conveyor: ConveyorFlags::default(),
            hopper_round_robin: true,
            default_list_capacity: Self::DEFAULT_LIST_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_conveyor(mut self, conveyor: ConveyorFlags) -> Self {
        self.conveyor = conveyor;
        self
    }

    #[must_use]
    pub fn with_hopper_round_robin(mut self, enabled: bool) -> Self {
        self.hopper_round_robin = enabled;
        self
    }
}

impl Default for InteropConfig {
    fn default() -> Self {
        Self::new()
    }
}
