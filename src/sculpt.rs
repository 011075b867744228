//! Noise-driven terrain sculpting.
//!
//! Turns a raw [`NoiseField`] into a bounded heightmap in three passes:
//! 1. Sample the field on every lattice vertex
//! 2. Sharpen peaks with a power curve against the observed range
//! 3. Flatten a percentile band into a walkable plateau with ramps at its edges

use serde::{Deserialize, Serialize};

use crate::noise_field::NoiseField;
use crate::tilemap::Tilemap;
use crate::utils::{inverse_lerp, lerp};

/// Plateau band, expressed as fractions of the sculpted height range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenParams {
    /// Lower edge of the plateau band (0.0-1.0)
    pub min_between: f32,
    /// Plateau height (0.0-1.0)
    pub ground_level: f32,
    /// Upper edge of the plateau band (0.0-1.0)
    pub max_between: f32,
}

impl Default for FlattenParams {
    fn default() -> Self {
        Self {
            min_between: 0.35,
            ground_level: 0.45,
            max_between: 0.55,
        }
    }
}

/// Parameters for the sculpting passes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SculptParams {
    /// Exponent applied to the normalized height (higher = sharper peaks)
    pub scale_multiplier: f32,
    /// Vertical scale factor applied after the power curve
    pub vertical_scale: f32,
    pub flatten: FlattenParams,
}

impl Default for SculptParams {
    fn default() -> Self {
        Self {
            scale_multiplier: 2.0,
            vertical_scale: 1.0,
            flatten: FlattenParams::default(),
        }
    }
}

/// Remap a single height against the post-sharpening range `(min, max)`.
///
/// Values inside the band collapse onto the plateau, values outside it are
/// stretched into `[0, plateau]` below and `[plateau, max]` above.
pub fn flatten_value(v: f32, min: f32, max: f32, params: &FlattenParams) -> f32 {
    let low = lerp(min, max, params.min_between);
    let high = lerp(min, max, params.max_between);
    let plateau = lerp(min, max, params.ground_level);

    if v > high {
        lerp(plateau, max, inverse_lerp(high, max, v))
    } else if v < low {
        lerp(0.0, plateau, inverse_lerp(min, low, v))
    } else {
        plateau
    }
}

/// Flatten a heightmap in place against its own observed range.
/// Returns the plateau height.
pub fn flatten(heightmap: &mut Tilemap<f32>, params: &FlattenParams) -> f32 {
    let (min, max) = heightmap.min_max();
    for (_, _, h) in heightmap.iter_mut() {
        *h = flatten_value(*h, min, max, params);
    }
    lerp(min, max, params.ground_level)
}

/// Power-curve sharpening: low areas shrink faster than high ones.
pub fn sharpen_peaks(heightmap: &mut Tilemap<f32>, scale_multiplier: f32, vertical_scale: f32) {
    let (min, max) = heightmap.min_max();
    for (_, _, h) in heightmap.iter_mut() {
        let t = inverse_lerp(min, max, *h);
        *h = t.powf(scale_multiplier) * vertical_scale * *h;
    }
}

/// Produces vertex heightmaps from a noise field.
#[derive(Clone, Debug)]
pub struct HeightSculptor {
    noise: NoiseField,
    params: SculptParams,
}

impl HeightSculptor {
    pub fn new(noise: NoiseField, params: SculptParams) -> Self {
        Self { noise, params }
    }

    pub fn params(&self) -> &SculptParams {
        &self.params
    }

    /// Sculpt a `(width + 1) x (height + 1)` vertex heightmap.
    pub fn sculpt(&self, width: usize, height: usize) -> Tilemap<f32> {
        self.sculpt_with_plateau(width, height).0
    }

    /// Like [`sculpt`](Self::sculpt), also returning the plateau height.
    pub fn sculpt_with_plateau(&self, width: usize, height: usize) -> (Tilemap<f32>, f32) {
        let mut heightmap = Tilemap::new_with(width + 1, height + 1, 0.0f32);
        for (x, z, h) in heightmap.iter_mut() {
            *h = self.noise.value_at(x, z);
        }

        sharpen_peaks(&mut heightmap, self.params.scale_multiplier, self.params.vertical_scale);
        let plateau = flatten(&mut heightmap, &self.params.flatten);

        let (min_h, max_h) = heightmap.min_max();
        log::debug!(
            "Sculpted {}x{} vertices, range {:.3}..{:.3}, plateau {:.3}",
            heightmap.width,
            heightmap.height,
            min_h,
            max_h,
            plateau
        );
        (heightmap, plateau)
    }
}
