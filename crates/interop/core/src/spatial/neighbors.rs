use arrayvec::ArrayVec;
use tracing::trace;

use super::Face;
use crate::env::{SegmentEntity, WorldOracle};
use crate::types::{WorldOffset, WorldPosition};

/// An entity found next to the scan center.
#[derive(Clone, Copy)]
pub struct Neighbor<'w> {
    pub face: Face,
    pub position: WorldPosition,
    pub entity: &'w dyn SegmentEntity,
}

impl std::fmt::Debug for Neighbor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neighbor")
            .field("face", &self.face)
            .field("position", &self.position)
            .field("entity", &self.entity.type_name())
            .finish()
    }
}

/// Result of a six-direction neighbor scan.
#[derive(Debug, Default)]
pub struct NeighborScan<'w> {
    neighbors: ArrayVec<Neighbor<'w>, 6>,
    unloaded_encountered: bool,
}

impl<'w> NeighborScan<'w> {
    /// Matching neighbors in scan order.
    pub fn neighbors(&self) -> &[Neighbor<'w>] {
        &self.neighbors
    }

    /// True if at least one neighbor position lies in an unloaded segment.
    pub fn unloaded_encountered(&self) -> bool {
        self.unloaded_encountered
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = WorldPosition> + '_ {
        self.neighbors.iter().map(|n| n.position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor<'w>> {
        self.neighbors.iter()
    }
}

/// Scans the six axis-aligned neighbors of `center`.
///
/// Positions in unloaded segments are skipped and flagged; the scan never
/// stops early. Entities rejected by `filter` are left out.
pub fn find_neighbors<'w, W, F>(world: &'w W, center: WorldPosition, filter: F) -> NeighborScan<'w>
where
    W: WorldOracle + ?Sized,
    F: Fn(&dyn SegmentEntity) -> bool,
{
    let mut scan = NeighborScan::default();

    for face in Face::ALL {
        let position = center.offset(face.offset());
        let Some(segment) = world.segment(position) else {
            trace!(target: "interop::spatial", %position, %face, "segment not loaded");
            scan.unloaded_encountered = true;
            continue;
        };

        match segment.entity_at(position) {
            Some(entity) if filter(entity) => scan.neighbors.push(Neighbor {
                face,
                position,
                entity,
            }),
            _ => {}
        }
    }

    scan
}

/// True if a conveyor at `conveyor` moving along `forwards` delivers into
/// `center`.
pub fn is_conveyor_facing(
    center: WorldPosition,
    conveyor: WorldPosition,
    forwards: WorldOffset,
) -> bool {
    conveyor.offset(forwards) == center
}

/// True if `entity` is directional and points at `center`.
pub fn is_facing(entity: &dyn SegmentEntity, center: WorldPosition) -> bool {
    entity
        .orientation()
        .is_some_and(|forwards| is_conveyor_facing(center, entity.position(), forwards))
}
