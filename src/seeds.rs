//! Seed management for terrain generation
//!
//! The terrain relief and the maze branching each sample their own noise
//! field. Both seeds are derived from one master seed by default so a single
//! number reproduces a whole terrain, and either can be overridden.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeds for the two noise fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Relief noise sampled by the height sculptor
    pub terrain: u32,
    /// Branching noise sampled by the maze carver
    pub maze: u32,
}

impl TerrainSeeds {
    /// Derive both sub-seeds from a master seed.
    ///
    /// Uses a ChaCha8 stream so the derivation is stable across toolchains
    /// and platforms.
    pub fn from_master(master: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(master);
        let terrain = rng.gen::<u32>();
        let maze = rng.gen::<u32>();
        Self {
            master,
            terrain,
            maze,
        }
    }

    /// Create a builder for overriding individual seeds.
    pub fn builder(master: u64) -> TerrainSeedsBuilder {
        TerrainSeedsBuilder {
            seeds: TerrainSeeds::from_master(master),
        }
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct TerrainSeedsBuilder {
    seeds: TerrainSeeds,
}

impl TerrainSeedsBuilder {
    /// Override the relief seed
    pub fn terrain(mut self, seed: u32) -> Self {
        self.seeds.terrain = seed;
        self
    }

    /// Override the maze seed
    pub fn maze(mut self, seed: u32) -> Self {
        self.seeds.maze = seed;
        self
    }

    pub fn build(self) -> TerrainSeeds {
        self.seeds
    }
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, terrain: {}, maze: {} }}",
            self.master, self.terrain, self.maze
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        assert_eq!(TerrainSeeds::from_master(12345), TerrainSeeds::from_master(12345));
    }

    #[test]
    fn test_fields_get_different_seeds() {
        let seeds = TerrainSeeds::from_master(12345);
        assert_ne!(seeds.terrain, seeds.maze);
        assert_ne!(TerrainSeeds::from_master(1).terrain, TerrainSeeds::from_master(2).terrain);
    }

    #[test]
    fn test_builder_override() {
        let seeds = TerrainSeeds::builder(12345).maze(99999).build();
        assert_eq!(seeds.maze, 99999);
        assert_eq!(seeds.terrain, TerrainSeeds::from_master(12345).terrain);
    }
}
