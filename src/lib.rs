//! Maze terrain generation library
//!
//! Sculpts a noise heightmap, carves a maze of walls into it and derives
//! texture-layer weights. Re-exports modules for use by binaries and tools.

pub mod alpha;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod maze;
pub mod noise_field;
pub mod sculpt;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod utils;

pub use config::MazeTerrainConfig;
pub use error::{Result, TerrainError};
pub use grid::{CellCoord, CellGrid, MarkerCoord, WallDirection};
pub use seeds::TerrainSeeds;
pub use terrain::{MazeTerrain, TerrainSnapshot, TerrainState, ToggleMode};
pub use tilemap::Tilemap;
