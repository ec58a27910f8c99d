//! Errors raised by the reference host.

use interop_core::{InteropError, WorldPosition};
use thiserror::Error;

use crate::world::SegmentCoord;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("segment {coord} containing {position} is not loaded")]
    SegmentNotLoaded {
        coord: SegmentCoord,
        position: WorldPosition,
    },

    #[error("position {0} is already occupied")]
    Occupied(WorldPosition),

    #[error("no entity at {0}")]
    NoEntity(WorldPosition),

    #[error("logging already initialised: {0}")]
    Logging(String),

    #[error(transparent)]
    Interop(#[from] InteropError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
