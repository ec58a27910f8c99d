//! Axis-aligned adjacency around a machine.
mod neighbors;

pub use neighbors::{Neighbor, NeighborScan, find_neighbors, is_conveyor_facing, is_facing};

use crate::types::WorldOffset;

/// One of the six faces of a cube, in scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Face {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl Face {
    /// Faces in scan order: -x, +x, -y, +y, -z, +z.
    pub const ALL: [Face; 6] = [
        Face::NegX,
        Face::PosX,
        Face::NegY,
        Face::PosY,
        Face::NegZ,
        Face::PosZ,
    ];

    pub const fn offset(self) -> WorldOffset {
        match self {
            Face::NegX => WorldOffset::NEG_X,
            Face::PosX => WorldOffset::POS_X,
            Face::NegY => WorldOffset::NEG_Y,
            Face::PosY => WorldOffset::POS_Y,
            Face::NegZ => WorldOffset::NEG_Z,
            Face::PosZ => WorldOffset::POS_Z,
        }
    }
}
