//! Maze terrain generation pipeline
//!
//! One generation run:
//! 1. Validate the configuration (before any buffer is allocated)
//! 2. Sculpt relief from the terrain noise field
//! 3. Fill the heightmap: wall borders at full height, floors at ground
//!    height plus optional relief
//! 4. Carve the maze, lowering wall strips between connected cells
//! 5. Blend texture layers over the finished heightmap
//!
//! The heightmap is owned by the run and only published through
//! [`MazeTerrain::snapshot`]. Wall toggles are the one later write path; they
//! need `&mut MazeTerrain` and re-run the blending pass.

use serde::{Deserialize, Serialize};

use crate::alpha::{self, AlphaMap};
use crate::config::MazeTerrainConfig;
use crate::error::{Result, TerrainError};
use crate::grid::{CellGrid, LocalOffset, MarkerCoord, MarkerKind};
use crate::maze::{MazeCarver, MazeLayout};
use crate::noise_field::NoiseField;
use crate::sculpt::HeightSculptor;
use crate::tilemap::Tilemap;

/// Normalized height of a wall sample.
pub const WALL_VALUE: f32 = 1.0;
/// Normalized height of a hole sample.
pub const HOLE_VALUE: f32 = 0.0;

const STATE_EPSILON: f32 = 1e-6;
/// Relief never lifts a floor closer than this to wall height.
const RELIEF_MARGIN: f32 = 0.01;

/// What a heightmap sample currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainState {
    Wall,
    Ground,
    Hole,
}

/// How [`MazeTerrain::toggle_walls`] rewrites addressed samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToggleMode {
    /// Ground becomes wall, anything else becomes ground
    #[default]
    AutoInvert,
    ForceWall,
    ForceGround,
    ForceHole,
}

/// A clickable marker as exposed to the interaction layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub coord: MarkerCoord,
    pub kind: MarkerKind,
    pub state: TerrainState,
}

impl Marker {
    pub fn is_wall(&self) -> bool {
        self.state == TerrainState::Wall
    }
}

/// Immutable output handed to a renderer.
#[derive(Clone, Debug, Serialize)]
pub struct TerrainSnapshot {
    pub width: usize,
    pub height: usize,
    /// Physical height of a normalized `1.0`
    pub vertical_size: f32,
    pub heightmap: Tilemap<f32>,
    pub alpha: AlphaMap,
}

/// A generated maze terrain.
#[derive(Clone, Debug)]
pub struct MazeTerrain {
    config: MazeTerrainConfig,
    grid: CellGrid,
    heightmap: Tilemap<f32>,
    alpha: AlphaMap,
    maze: MazeLayout,
}

impl MazeTerrain {
    /// Run the full pipeline.
    pub fn generate(config: MazeTerrainConfig) -> Result<Self> {
        config.validate()?;

        let grid = config.cell_grid();
        let (width, height) = config.heightmap_size()?;
        let ground = config.ground_value();

        log::debug!(
            "Generating {}x{} maze on a {}x{} heightmap (cell {}, wall {})",
            grid.cols(),
            grid.rows(),
            width,
            height,
            grid.cell_size(),
            grid.wall_thickness()
        );

        let sculptor = HeightSculptor::new(NoiseField::new(config.terrain_noise.clone()), config.sculpt.clone());
        let (relief, plateau) = sculptor.sculpt_with_plateau(width - 1, height - 1);

        let mut heightmap = fill_cells(&grid, &relief, plateau, config.relief, ground, (width, height));

        let maze_noise = NoiseField::new(config.maze_noise.clone());
        let maze = MazeCarver::new(&grid, &maze_noise).carve(&mut heightmap, ground);

        let alpha = alpha::blend(&heightmap, &config.layers);

        log::info!(
            "Generated maze terrain: {} cells, {} passages, {}x{} samples, {} texture layers",
            maze.visited_count(),
            maze.passages.len(),
            width,
            height,
            alpha.layers
        );

        Ok(Self {
            config,
            grid,
            heightmap,
            alpha,
            maze,
        })
    }

    /// Regenerate in place. On error the current terrain is left untouched.
    pub fn regenerate(&mut self, config: MazeTerrainConfig) -> Result<()> {
        *self = Self::generate(config)?;
        Ok(())
    }

    pub fn config(&self) -> &MazeTerrainConfig {
        &self.config
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn heightmap(&self) -> &Tilemap<f32> {
        &self.heightmap
    }

    pub fn alpha(&self) -> &AlphaMap {
        &self.alpha
    }

    pub fn maze(&self) -> &MazeLayout {
        &self.maze
    }

    /// Copy of the current heightmap and weights for a renderer.
    pub fn snapshot(&self) -> TerrainSnapshot {
        TerrainSnapshot {
            width: self.heightmap.width,
            height: self.heightmap.height,
            vertical_size: self.config.wall_height,
            heightmap: self.heightmap.clone(),
            alpha: self.alpha.clone(),
        }
    }

    fn height_for(&self, state: TerrainState) -> f32 {
        match state {
            TerrainState::Wall => WALL_VALUE,
            TerrainState::Ground => self.config.ground_value(),
            TerrainState::Hole => HOLE_VALUE,
        }
    }

    /// Classify a sample.
    pub fn state_at(&self, x: usize, z: usize) -> TerrainState {
        classify(*self.heightmap.get(x, z), self.config.ground_value())
    }

    fn check_marker(&self, coord: MarkerCoord) -> Result<()> {
        if self.grid.contains_marker(coord) {
            return Ok(());
        }
        let (width, height) = self.grid.marker_dims();
        Err(TerrainError::MarkerOutOfBounds {
            x: coord.x,
            z: coord.z,
            width,
            height,
        })
    }

    pub fn marker(&self, coord: MarkerCoord) -> Result<Marker> {
        self.check_marker(coord)?;
        let (x, z) = self.grid.marker_sample(coord, self.heightmap.width, self.heightmap.height);
        Ok(Marker {
            coord,
            kind: coord.kind(),
            state: self.state_at(x, z),
        })
    }

    /// Every marker, row by row along z.
    pub fn markers(&self) -> Vec<Marker> {
        let (mx, mz) = self.grid.marker_dims();
        let mut markers = Vec::with_capacity(mx * mz);
        for z in 0..mz {
            for x in 0..mx {
                let coord = MarkerCoord::new(x, z);
                let (hx, hz) = self.grid.marker_sample(coord, self.heightmap.width, self.heightmap.height);
                markers.push(Marker {
                    coord,
                    kind: coord.kind(),
                    state: self.state_at(hx, hz),
                });
            }
        }
        markers
    }

    /// Rewrite the samples under each marker, then re-blend texture layers.
    ///
    /// All coordinates are checked before anything is written.
    pub fn toggle_walls(&mut self, markers: &[MarkerCoord], mode: ToggleMode) -> Result<()> {
        for &coord in markers {
            self.check_marker(coord)?;
        }

        let ground = self.config.ground_value();
        let mut changed = 0usize;
        for &coord in markers {
            let footprint = self.grid.marker_footprint(coord);
            for (x, z) in footprint.samples() {
                let target = match mode {
                    ToggleMode::AutoInvert => match classify(*self.heightmap.get(x, z), ground) {
                        TerrainState::Ground => TerrainState::Wall,
                        TerrainState::Wall | TerrainState::Hole => TerrainState::Ground,
                    },
                    ToggleMode::ForceWall => TerrainState::Wall,
                    ToggleMode::ForceGround => TerrainState::Ground,
                    ToggleMode::ForceHole => TerrainState::Hole,
                };
                let value = self.height_for(target);
                self.heightmap.set(x, z, value);
                changed += 1;
            }
        }

        self.alpha = alpha::blend(&self.heightmap, &self.config.layers);
        log::debug!("Toggled {} markers ({:?}), {} samples rewritten", markers.len(), mode, changed);
        Ok(())
    }
}

fn classify(h: f32, ground: f32) -> TerrainState {
    if h >= WALL_VALUE - STATE_EPSILON {
        TerrainState::Wall
    } else if h <= HOLE_VALUE + STATE_EPSILON && ground > HOLE_VALUE + STATE_EPSILON {
        TerrainState::Hole
    } else {
        TerrainState::Ground
    }
}

/// Initial cell layout: borders at wall height, floors at ground height offset
/// by the relief's distance from its plateau.
fn fill_cells(
    grid: &CellGrid,
    relief: &Tilemap<f32>,
    plateau: f32,
    relief_amount: f32,
    ground: f32,
    (width, height): (usize, usize),
) -> Tilemap<f32> {
    let mut heightmap = Tilemap::new_with(width, height, WALL_VALUE);
    let (_, relief_max) = relief.min_max();
    let cs = grid.cell_size();
    let ceiling = ground.max(WALL_VALUE - RELIEF_MARGIN);

    for z in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.is_border(LocalOffset { x: x % cs, z: z % cs }) {
                continue;
            }
            let offset = if relief_max > 0.0 {
                (*relief.get(x, z) - plateau) / relief_max * relief_amount
            } else {
                0.0
            };
            heightmap.set(x, z, (ground + offset).clamp(HOLE_VALUE, ceiling));
        }
    }
    heightmap
}
