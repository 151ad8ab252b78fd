//! Level geometry: the `MAPHEAD` index and the `GAMEMAPS` level records it
//! points into.

mod head;
mod level;

pub use head::{LevelPointer, MAX_LEVELS, MapHead};
pub use level::{
    LEVEL_HEADER_SIZE, LEVEL_SIGNATURE, Level, LevelError, LevelHeader, NUM_PLANES, Plane,
};
