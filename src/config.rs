//! Generation parameters and configuration files

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alpha::{self, TerrainLayer};
use crate::error::{Result, TerrainError};
use crate::grid::CellGrid;
use crate::noise_field::NoiseSettings;
use crate::sculpt::SculptParams;
use crate::seeds::TerrainSeeds;

/// Everything a generation run reads. Loaded from JSON or built in code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeTerrainConfig {
    // =========================================================================
    // Grid
    // =========================================================================

    /// Maze cells along z
    pub rows: usize,
    /// Maze cells along x
    pub cols: usize,
    /// Heightmap samples per cell side
    pub cell_size: usize,
    /// Width of the wall border inside each cell, in samples
    pub wall_thickness: usize,
    /// Physical wall height; heights are normalized against it
    pub wall_height: f32,
    /// Physical floor height, at most `wall_height`
    pub ground_height: f32,
    /// Explicit heightmap size `(x, z)`. Defaults to the maze footprint;
    /// anything smaller is rejected.
    pub terrain_size: Option<(usize, usize)>,

    // =========================================================================
    // Noise & sculpting
    // =========================================================================

    /// Relief field fed to the height sculptor
    pub terrain_noise: NoiseSettings,
    /// Branching field sampled at cell coordinates by the maze carver
    pub maze_noise: NoiseSettings,
    pub sculpt: SculptParams,
    /// How much sculpted relief shows through cell floors (0.0 = flat floors)
    pub relief: f32,

    // =========================================================================
    // Texturing
    // =========================================================================

    /// Texture layers, sorted by `height_position`
    pub layers: Vec<TerrainLayer>,
}

impl Default for MazeTerrainConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            cell_size: 50,
            wall_thickness: 4,
            wall_height: 20.0,
            ground_height: 10.0,
            terrain_size: None,
            terrain_noise: NoiseSettings::default(),
            maze_noise: NoiseSettings::coarse(0),
            sculpt: SculptParams::default(),
            relief: 0.0,
            layers: vec![
                TerrainLayer::new("hole", 0.0, 0.25),
                TerrainLayer::new("ground", 0.5, 0.5),
                TerrainLayer::new("wall", 1.0, 0.0),
            ],
        }
    }
}

fn check_fraction(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TerrainError::invalid(format!("{} must be within [0, 1], got {}", name, value)));
    }
    Ok(())
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TerrainError::invalid(format!("{} must be finite", name)));
    }
    Ok(())
}

fn check_noise(name: &str, noise: &NoiseSettings) -> Result<()> {
    check_finite(&format!("{}.x_scale", name), noise.x_scale)?;
    check_finite(&format!("{}.x_offset", name), noise.x_offset)?;
    check_finite(&format!("{}.z_scale", name), noise.z_scale)?;
    check_finite(&format!("{}.z_offset", name), noise.z_offset)?;
    if !(noise.amplitude.is_finite() && noise.amplitude >= 0.0) {
        return Err(TerrainError::invalid(format!("{}.amplitude must be non-negative", name)));
    }
    Ok(())
}

impl MazeTerrainConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reseed both noise fields from a master seed.
    pub fn with_seeds(mut self, seeds: &TerrainSeeds) -> Self {
        self.terrain_noise.seed = seeds.terrain;
        self.maze_noise.seed = seeds.maze;
        self
    }

    /// Replace the layer list with `count` evenly spaced layers.
    pub fn with_layer_count(mut self, count: usize, blend_percent: f32) -> Self {
        self.layers = TerrainLayer::evenly_spaced(count, blend_percent);
        self
    }

    /// Floor height normalized against the wall height.
    pub fn ground_value(&self) -> f32 {
        self.ground_height / self.wall_height
    }

    /// Samples covered by the maze, `(x, z)`.
    pub fn maze_footprint(&self) -> Result<(usize, usize)> {
        let width = self.cols.checked_mul(self.cell_size);
        let height = self.rows.checked_mul(self.cell_size);
        match (width, height) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(TerrainError::invalid(format!(
                "{}x{} cells of size {} overflow the heightmap",
                self.cols, self.rows, self.cell_size
            ))),
        }
    }

    /// Heightmap size, `(x, z)`.
    pub fn heightmap_size(&self) -> Result<(usize, usize)> {
        match self.terrain_size {
            Some(size) => Ok(size),
            None => self.maze_footprint(),
        }
    }

    pub fn cell_grid(&self) -> CellGrid {
        CellGrid::new(self.rows, self.cols, self.cell_size, self.wall_thickness)
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TerrainError::invalid("grid must have at least one row and one column"));
        }
        if self.wall_thickness == 0 {
            return Err(TerrainError::invalid("wall_thickness must be positive"));
        }
        let walls = self
            .wall_thickness
            .checked_mul(2)
            .ok_or_else(|| TerrainError::invalid("wall_thickness is too large"))?;
        if walls >= self.cell_size {
            return Err(TerrainError::invalid(format!(
                "cell_size {} leaves no interior for wall_thickness {}",
                self.cell_size, self.wall_thickness
            )));
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(TerrainError::invalid("wall_height must be positive"));
        }
        if !(self.ground_height.is_finite() && self.ground_height >= 0.0 && self.ground_height <= self.wall_height) {
            return Err(TerrainError::invalid("ground_height must be within [0, wall_height]"));
        }

        let required = self.maze_footprint()?;
        let actual = self.heightmap_size()?;
        if actual.0 < required.0 || actual.1 < required.1 {
            return Err(TerrainError::HeightmapTooSmall { required, actual });
        }
        if actual.0.checked_mul(actual.1).is_none() {
            return Err(TerrainError::invalid(format!(
                "heightmap {}x{} is too large",
                actual.0, actual.1
            )));
        }

        check_noise("terrain_noise", &self.terrain_noise)?;
        check_noise("maze_noise", &self.maze_noise)?;

        let sculpt = &self.sculpt;
        if !(sculpt.scale_multiplier.is_finite() && sculpt.scale_multiplier >= 0.0) {
            return Err(TerrainError::invalid("sculpt.scale_multiplier must be non-negative"));
        }
        if !(sculpt.vertical_scale.is_finite() && sculpt.vertical_scale >= 0.0) {
            return Err(TerrainError::invalid("sculpt.vertical_scale must be non-negative"));
        }
        let flatten = &sculpt.flatten;
        check_fraction("flatten.min_between", flatten.min_between)?;
        check_fraction("flatten.ground_level", flatten.ground_level)?;
        check_fraction("flatten.max_between", flatten.max_between)?;
        if !(flatten.min_between <= flatten.ground_level && flatten.ground_level <= flatten.max_between) {
            return Err(TerrainError::invalid(
                "flatten fractions must satisfy min_between <= ground_level <= max_between",
            ));
        }
        check_fraction("relief", self.relief)?;

        for layer in &self.layers {
            check_fraction(&format!("layer '{}' height_position", layer.name), layer.height_position)?;
            check_fraction(&format!("layer '{}' blend_percent", layer.name), layer.blend_percent)?;
        }
        if !alpha::is_sorted(&self.layers) {
            log::warn!("Layer thresholds are not ascending; texture blending will be undefined");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MazeTerrainConfig::default();
        config.validate().unwrap();
        assert_eq!(config.heightmap_size().unwrap(), (1000, 1000));
        assert_eq!(config.ground_value(), 0.5);
    }

    #[test]
    fn test_rejects_small_heightmap() {
        let config = MazeTerrainConfig {
            terrain_size: Some((999, 1000)),
            ..MazeTerrainConfig::default()
        };
        match config.validate() {
            Err(TerrainError::HeightmapTooSmall { required, actual }) => {
                assert_eq!(required, (1000, 1000));
                assert_eq!(actual, (999, 1000));
            }
            other => panic!("expected HeightmapTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_thick_walls() {
        let config = MazeTerrainConfig {
            cell_size: 8,
            wall_thickness: 4,
            ..MazeTerrainConfig::default()
        };
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig { .. })));
    }

    #[test]
    fn test_huge_wall_thickness_is_rejected() {
        let config: MazeTerrainConfig = serde_json::from_str(&format!(r#"{{ "wall_thickness": {} }}"#, usize::MAX)).unwrap();
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig { .. })));
    }

    #[test]
    fn test_overflowing_footprint_is_rejected() {
        let config: MazeTerrainConfig = serde_json::from_str(&format!(r#"{{ "cols": {} }}"#, usize::MAX / 4)).unwrap();
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig { .. })));
        assert!(config.maze_footprint().is_err());

        let config = MazeTerrainConfig {
            rows: usize::MAX / 50,
            cols: usize::MAX / 50,
            ..MazeTerrainConfig::default()
        };
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_misordered_flatten_band() {
        let mut config = MazeTerrainConfig::default();
        config.sculpt.flatten.ground_level = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_ground_above_wall() {
        let config = MazeTerrainConfig {
            ground_height: 25.0,
            ..MazeTerrainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsorted_layers_are_accepted() {
        let mut config = MazeTerrainConfig::default();
        config.layers.reverse();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MazeTerrainConfig = serde_json::from_str(r#"{ "rows": 3, "cols": 4, "sculpt": { "scale_multiplier": 3.0 } }"#).unwrap();
        assert_eq!(config.rows, 3);
        assert_eq!(config.cols, 4);
        assert_eq!(config.cell_size, 50);
        assert_eq!(config.sculpt.scale_multiplier, 3.0);
        assert_eq!(config.sculpt.flatten, crate::sculpt::FlattenParams::default());
    }

    #[test]
    fn test_with_seeds_reseeds_both_fields() {
        let seeds = TerrainSeeds::from_master(7);
        let config = MazeTerrainConfig::default().with_seeds(&seeds);
        assert_eq!(config.terrain_noise.seed, seeds.terrain);
        assert_eq!(config.maze_noise.seed, seeds.maze);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("maze_terrain_config_{}.json", std::process::id()));
        let config = MazeTerrainConfig::default().with_layer_count(4, 0.3);
        config.save(&path).unwrap();
        let loaded = MazeTerrainConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
