//! In-memory segmented world served through [`interop_core::WorldOracle`].
use std::collections::HashMap;
use std::fmt;

use interop_core::{Segment, SegmentEntity, WorldOracle, WorldPosition};
use tracing::{debug, trace};

use crate::error::{Result, RuntimeError};

/// Edge length of a cubic segment.
pub const SEGMENT_SIZE: i64 = 16;

/// Coordinate of a segment in segment units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl SegmentCoord {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Segment containing `position`. Negative coordinates round toward
    /// negative infinity.
    pub fn containing(position: WorldPosition) -> Self {
        Self {
            x: position.x.div_euclid(SEGMENT_SIZE),
            y: position.y.div_euclid(SEGMENT_SIZE),
            z: position.z.div_euclid(SEGMENT_SIZE),
        }
    }

    /// Lowest world position inside this segment.
    pub fn origin(self) -> WorldPosition {
        WorldPosition::new(
            self.x * SEGMENT_SIZE,
            self.y * SEGMENT_SIZE,
            self.z * SEGMENT_SIZE,
        )
    }
}

impl fmt::Display for SegmentCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}

/// A loaded segment and the entities placed in it.
pub struct WorldSegment {
    coord: SegmentCoord,
    entities: HashMap<WorldPosition, Box<dyn SegmentEntity>>,
}

impl WorldSegment {
    fn new(coord: SegmentCoord) -> Self {
        Self {
            coord,
            entities: HashMap::new(),
        }
    }

    pub fn coord(&self) -> SegmentCoord {
        self.coord
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl fmt::Debug for WorldSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldSegment")
            .field("coord", &self.coord)
            .field("entities", &self.entities.len())
            .finish()
    }
}

impl Segment for WorldSegment {
    fn entity_at(&self, position: WorldPosition) -> Option<&dyn SegmentEntity> {
        self.entities.get(&position).map(|entity| &**entity)
    }
}

/// Segments keyed by coordinate. Only loaded segments exist.
#[derive(Debug, Default)]
pub struct SegmentWorld {
    segments: HashMap<SegmentCoord, WorldSegment>,
}

impl SegmentWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an empty segment. Returns false if it was already loaded.
    pub fn load_segment(&mut self, coord: SegmentCoord) -> bool {
        if self.segments.contains_key(&coord) {
            return false;
        }
        debug!(target: "runtime::world", %coord, "segment loaded");
        self.segments.insert(coord, WorldSegment::new(coord));
        true
    }

    /// Loads the segment containing `position`.
    pub fn load_segment_at(&mut self, position: WorldPosition) -> bool {
        self.load_segment(SegmentCoord::containing(position))
    }

    /// Unloads a segment, handing back its entities.
    pub fn unload_segment(&mut self, coord: SegmentCoord) -> Option<WorldSegment> {
        let segment = self.segments.remove(&coord)?;
        debug!(
            target: "runtime::world",
            %coord,
            entities = segment.len(),
            "segment unloaded"
        );
        Some(segment)
    }

    pub fn is_loaded(&self, position: WorldPosition) -> bool {
        self.segments
            .contains_key(&SegmentCoord::containing(position))
    }

    pub fn loaded_segments(&self) -> usize {
        self.segments.len()
    }

    /// Places `entity` at its own position.
    pub fn place(&mut self, entity: impl SegmentEntity) -> Result<()> {
        self.place_boxed(Box::new(entity))
    }

    pub fn place_boxed(&mut self, entity: Box<dyn SegmentEntity>) -> Result<()> {
        let position = entity.position();
        let coord = SegmentCoord::containing(position);
        let segment = self
            .segments
            .get_mut(&coord)
            .ok_or(RuntimeError::SegmentNotLoaded { coord, position })?;
        if segment.entities.contains_key(&position) {
            return Err(RuntimeError::Occupied(position));
        }
        trace!(
            target: "runtime::world",
            %position,
            kind = entity.type_name(),
            "entity placed"
        );
        segment.entities.insert(position, entity);
        Ok(())
    }

    pub fn remove(&mut self, position: WorldPosition) -> Option<Box<dyn SegmentEntity>> {
        self.segments
            .get_mut(&SegmentCoord::containing(position))?
            .entities
            .remove(&position)
    }

    pub fn entity_at(&self, position: WorldPosition) -> Option<&dyn SegmentEntity> {
        self.segments
            .get(&SegmentCoord::containing(position))?
            .entity_at(position)
    }

    /// Typed view of the entity at `position`.
    pub fn get<T: SegmentEntity>(&self, position: WorldPosition) -> Option<&T> {
        self.entity_at(position)?.as_any().downcast_ref()
    }

    pub fn get_mut<T: SegmentEntity>(&mut self, position: WorldPosition) -> Option<&mut T> {
        WorldOracle::entity_at_mut(self, position)?
            .as_any_mut()
            .downcast_mut()
    }

    /// Runs `f` with the entity at `position` lifted out of the world.
    ///
    /// Machines that live in the world use this to act on their neighbors
    /// while holding themselves mutably. The entity is put back afterwards.
    pub fn with_detached<T, R, F>(&mut self, position: WorldPosition, f: F) -> Result<R>
    where
        T: SegmentEntity,
        F: FnOnce(&mut T, &mut Self) -> R,
    {
        let mut entity = self
            .remove(position)
            .ok_or(RuntimeError::NoEntity(position))?;
        let result = match (*entity).as_any_mut().downcast_mut::<T>() {
            Some(typed) => Ok(f(typed, self)),
            None => Err(RuntimeError::NoEntity(position)),
        };
        self.reinsert(position, entity);
        result
    }

    fn reinsert(&mut self, position: WorldPosition, entity: Box<dyn SegmentEntity>) {
        // The segment may have been unloaded by the callback; load it back so
        // the entity is not lost.
        let coord = SegmentCoord::containing(position);
        self.segments
            .entry(coord)
            .or_insert_with(|| WorldSegment::new(coord))
            .entities
            .insert(position, entity);
    }
}

impl WorldOracle for SegmentWorld {
    fn segment(&self, position: WorldPosition) -> Option<&dyn Segment> {
        self.segments
            .get(&SegmentCoord::containing(position))
            .map(|segment| segment as &dyn Segment)
    }

    fn entity_at_mut(&mut self, position: WorldPosition) -> Option<&mut dyn SegmentEntity> {
        let entity = self
            .segments
            .get_mut(&SegmentCoord::containing(position))?
            .entities
            .get_mut(&position)?;
        Some(&mut **entity)
    }
}
