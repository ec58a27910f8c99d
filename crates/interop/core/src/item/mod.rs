//! Item records and their quantity operations.
//!
//! An [`ItemRecord`] is a numeric item identifier plus an [`ItemKind`]
//! payload. Comparison rules live in [`compare`], and sums over
//! collections live in [`count`].
pub mod compare;
pub mod count;

use crate::types::{LookVector, WorldPosition};

pub use compare::{FLOAT_TOLERANCE, approx_eq};
pub use count::{item_count, item_count_by_cube, item_count_by_id, item_count_like};

/// Numeric identifier of an item definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub i32);

impl ItemId {
    /// Identifier shared by every cube stack; cubes are told apart by [`Cube`].
    pub const CUBE_STACK: Self = Self(-1);
}

/// Terrain cube type plus its sub-type value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cube {
    pub cube_type: u16,
    pub value: u16,
}

impl Cube {
    /// Cube type 0 means "no cube" in provider state.
    pub const AIR: Self = Self::new(0, 0);

    pub const fn new(cube_type: u16, value: u16) -> Self {
        Self { cube_type, value }
    }

    pub const fn is_air(self) -> bool {
        self.cube_type == 0
    }
}

/// Discriminant of an [`ItemRecord`].
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
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemType {
    CubeStack,
    Stack,
    Single,
    Durability,
    Charge,
    Location,
}

impl ItemType {
    /// Only cube stacks and plain stacks carry an amount.
    pub const fn is_stackable(self) -> bool {
        matches!(self, Self::CubeStack | Self::Stack)
    }
}

/// Variant-specific payload of an item record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Stack of terrain cubes.
    CubeStack { cube: Cube, amount: u32 },

    /// Stack of plain items.
    Stack { amount: u32 },

    /// A single non-stackable item.
    Single,

    /// Tool or equipment with wear.
    Durability { current: u32, max: u32 },

    /// Rechargeable item.
    Charge { level: f32 },

    /// Item bound to a world location and facing.
    Location {
        position: WorldPosition,
        look: LookVector,
    },
}

impl ItemKind {
    pub const fn item_type(&self) -> ItemType {
        match self {
            Self::CubeStack { .. } => ItemType::CubeStack,
            Self::Stack { .. } => ItemType::Stack,
            Self::Single => ItemType::Single,
            Self::Durability { .. } => ItemType::Durability,
            Self::Charge { .. } => ItemType::Charge,
            Self::Location { .. } => ItemType::Location,
        }
    }
}

/// A concrete item or stack of items.
///
/// Records are immutable apart from their amount, which only changes through
/// [`set_amount`](Self::set_amount), [`increment`](Self::increment) and
/// [`decrement`](Self::decrement). All three are no-ops on non-stackable
/// records, whose amount is always 1.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    id: ItemId,
    kind: ItemKind,
}

impl ItemRecord {
    pub fn cube_stack(cube_type: u16, value: u16, amount: u32) -> Self {
        Self {
            id: ItemId::CUBE_STACK,
            kind: ItemKind::CubeStack {
                cube: Cube::new(cube_type, value),
                amount,
            },
        }
    }

    pub fn stack(id: ItemId, amount: u32) -> Self {
        Self {
            id,
            kind: ItemKind::Stack { amount },
        }
    }

    pub fn single(id: ItemId) -> Self {
        Self {
            id,
            kind: ItemKind::Single,
        }
    }

    pub fn durability(id: ItemId, current: u32, max: u32) -> Self {
        Self {
            id,
            kind: ItemKind::Durability { current, max },
        }
    }

    pub fn charge(id: ItemId, level: f32) -> Self {
        Self {
            id,
            kind: ItemKind::Charge { level },
        }
    }

    pub fn location(id: ItemId, position: WorldPosition, look: LookVector) -> Self {
        Self {
            id,
            kind: ItemKind::Location { position, look },
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    /// Returns the cube carried by a cube stack.
    pub fn cube(&self) -> Option<Cube> {
        match self.kind {
            ItemKind::CubeStack { cube, .. } => Some(cube),
            _ => None,
        }
    }

    pub fn is_stackable(&self) -> bool {
        self.item_type().is_stackable()
    }

    /// Number of units this record represents; 1 for non-stackable records.
    pub fn amount(&self) -> u32 {
        match self.kind {
            ItemKind::CubeStack { amount, .. } | ItemKind::Stack { amount } => amount,
            _ => 1,
        }
    }

    pub fn set_amount(&mut self, value: u32) {
        if let ItemKind::CubeStack { amount, .. } | ItemKind::Stack { amount } = &mut self.kind {
            *amount = value;
        }
    }

    pub fn increment(&mut self, by: u32) {
        if let ItemKind::CubeStack { amount, .. } | ItemKind::Stack { amount } = &mut self.kind {
            *amount = amount.saturating_add(by);
        }
    }

    /// Lowers the amount, stopping at zero.
    pub fn decrement(&mut self, by: u32) {
        if let ItemKind::CubeStack { amount, .. } | ItemKind::Stack { amount } = &mut self.kind {
            *amount = amount.saturating_sub(by);
        }
    }

    /// New record with the same identity and an independent amount.
    ///
    /// Non-stackable records ignore `amount` and come back as plain copies.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        let mut copy = self.clone();
        copy.set_amount(amount);
        copy
    }

    /// Moves `amount` units out of this stack into a new record.
    ///
    /// The split is clamped to the available amount. Non-stackable records
    /// cannot be split and return `None`.
    pub fn split_off(&mut self, amount: u32) -> Option<Self> {
        if !self.is_stackable() {
            return None;
        }
        let taken = amount.min(self.amount());
        self.decrement(taken);
        Some(self.with_amount(taken))
    }
}
