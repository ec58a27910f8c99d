//! Equality rules for item records.
//!
//! Three levels of equality are used across the crate:
//!
//! - **base** ([`ItemRecord::compare`]): same item id and discriminant
//! - **deep** ([`ItemRecord::compare_deep`]): base plus every payload field,
//!   with floats compared through [`approx_eq`]
//! - **mergeable** ([`ItemRecord::is_mergeable`]): both stackable, base-equal,
//!   and for cube stacks the same cube; amounts never participate
//!
//! The free functions accept absent records and return `false` for them.

use super::{ItemKind, ItemRecord};

/// Relative tolerance applied to floating-point payload fields.
pub const FLOAT_TOLERANCE: f32 = 0.1;

/// Relative float comparison: `|a - b| <= |a * tolerance|`.
///
/// Bitwise-identical values always compare equal, so NaN and infinities are
/// equal to themselves.
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    a.to_bits() == b.to_bits() || (a - b).abs() <= (a * tolerance).abs()
}

impl ItemRecord {
    /// Base equality: item id and discriminant match.
    pub fn compare(&self, other: &ItemRecord) -> bool {
        self.id == other.id && self.item_type() == other.item_type()
    }

    /// Deep equality using [`FLOAT_TOLERANCE`].
    pub fn compare_deep(&self, other: &ItemRecord) -> bool {
        self.compare_deep_with(other, FLOAT_TOLERANCE)
    }

    /// Deep equality with an explicit float tolerance.
    ///
    /// Stack amounts are not compared.
    pub fn compare_deep_with(&self, other: &ItemRecord, tolerance: f32) -> bool {
        if !self.compare(other) {
            return false;
        }
        match (&self.kind, &other.kind) {
            (ItemKind::CubeStack { cube: a, .. }, ItemKind::CubeStack { cube: b, .. }) => a == b,
            (ItemKind::Stack { .. }, ItemKind::Stack { .. }) => true,
            (ItemKind::Single, ItemKind::Single) => true,
            (
                ItemKind::Durability {
                    current: a_current,
                    max: a_max,
                },
                ItemKind::Durability {
                    current: b_current,
                    max: b_max,
                },
            ) => a_current == b_current && a_max == b_max,
            (ItemKind::Charge { level: a }, ItemKind::Charge { level: b }) => {
                approx_eq(*a, *b, tolerance)
            }
            (
                ItemKind::Location {
                    position: a_pos,
                    look: a_look,
                },
                ItemKind::Location {
                    position: b_pos,
                    look: b_look,
                },
            ) => {
                a_pos == b_pos
                    && approx_eq(a_look.x, b_look.x, tolerance)
                    && approx_eq(a_look.y, b_look.y, tolerance)
                    && approx_eq(a_look.z, b_look.z, tolerance)
            }
            _ => false,
        }
    }

    /// Returns true if `other` could be folded into this stack.
    pub fn is_mergeable(&self, other: &ItemRecord) -> bool {
        if !self.is_stackable() || !other.is_stackable() || !self.compare(other) {
            return false;
        }
        match (&self.kind, &other.kind) {
            (ItemKind::CubeStack { cube: a, .. }, ItemKind::CubeStack { cube: b, .. }) => a == b,
            _ => true,
        }
    }
}

pub fn compare(a: Option<&ItemRecord>, b: Option<&ItemRecord>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.compare(b))
}

pub fn compare_deep(a: Option<&ItemRecord>, b: Option<&ItemRecord>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.compare_deep(b))
}

pub fn is_mergeable(a: Option<&ItemRecord>, b: Option<&ItemRecord>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.is_mergeable(b))
}
