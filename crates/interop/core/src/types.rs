//! Coordinate and vector types shared across the crate.
use std::fmt;
use std::ops::Add;

/// Integer world coordinate of a single cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPosition {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl WorldPosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Returns the position displaced by `offset`.
    ///
    /// Coordinates wrap at the `i64` bounds.
    pub const fn offset(self, offset: WorldOffset) -> Self {
        Self {
            x: self.x.wrapping_add(offset.dx),
            y: self.y.wrapping_add(offset.dy),
            z: self.z.wrapping_add(offset.dz),
        }
    }
}

impl Add<WorldOffset> for WorldPosition {
    type Output = WorldPosition;

    fn add(self, rhs: WorldOffset) -> WorldPosition {
        self.offset(rhs)
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Integer displacement between two world positions.
///
/// Conveyors express their forward direction as a unit offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldOffset {
    pub dx: i64,
    pub dy: i64,
    pub dz: i64,
}

impl WorldOffset {
    pub const ZERO: Self = Self::new(0, 0, 0);
    pub const NEG_X: Self = Self::new(-1, 0, 0);
    pub const POS_X: Self = Self::new(1, 0, 0);
    pub const NEG_Y: Self = Self::new(0, -1, 0);
    pub const POS_Y: Self = Self::new(0, 1, 0);
    pub const NEG_Z: Self = Self::new(0, 0, -1);
    pub const POS_Z: Self = Self::new(0, 0, 1);

    pub const fn new(dx: i64, dy: i64, dz: i64) -> Self {
        Self { dx, dy, dz }
    }
}

/// Floating-point direction vector carried by location items.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LookVector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
