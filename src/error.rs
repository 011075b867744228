//! Error type shared by the generation pipeline, configuration and export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Heightmap of {actual:?} is smaller than the maze footprint {required:?}")]
    HeightmapTooSmall {
        required: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Marker ({x}, {z}) is outside the {width}x{height} marker grid")]
    MarkerOutOfBounds {
        x: usize,
        z: usize,
        width: usize,
        height: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),
}

impl TerrainError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TerrainError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
