//! Texture-layer weights from height thresholds.
//!
//! Each layer starts at a normalized height. Between two consecutive layers a
//! blend band opens at the lower threshold, sized as a fraction of the gap,
//! inside which the weights cross-fade linearly. Every weight vector is
//! non-negative and sums to one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;
use crate::utils::inverse_lerp;

/// One texture layer and where it starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainLayer {
    pub name: String,
    /// Normalized height where the layer begins (0.0-1.0)
    pub height_position: f32,
    /// Fraction of the gap to the next layer used for cross-fading (0.0-1.0).
    /// Ignored on the last layer.
    pub blend_percent: f32,
}

impl TerrainLayer {
    pub fn new(name: impl Into<String>, height_position: f32, blend_percent: f32) -> Self {
        Self {
            name: name.into(),
            height_position,
            blend_percent,
        }
    }

    /// Rebuild a sorted threshold list for `count` layers spread over `[0, 1]`.
    pub fn evenly_spaced(count: usize, blend_percent: f32) -> Vec<TerrainLayer> {
        match count {
            0 => Vec::new(),
            1 => vec![TerrainLayer::new("layer_0", 0.0, blend_percent)],
            _ => (0..count)
                .map(|i| {
                    let position = i as f32 / (count - 1) as f32;
                    TerrainLayer::new(format!("layer_{}", i), position, blend_percent)
                })
                .collect(),
        }
    }
}

/// Whether thresholds are non-decreasing, which blending assumes.
pub fn is_sorted(layers: &[TerrainLayer]) -> bool {
    layers.windows(2).all(|pair| pair[0].height_position <= pair[1].height_position)
}

/// Write the weight vector for height `h` into `out` (`out.len() == layers.len()`).
pub fn layer_weights(h: f32, layers: &[TerrainLayer], out: &mut [f32]) {
    debug_assert_eq!(out.len(), layers.len());
    out.fill(0.0);
    let Some(last) = layers.len().checked_sub(1) else {
        return;
    };

    if h <= layers[0].height_position {
        out[0] = 1.0;
        return;
    }
    if h >= layers[last].height_position {
        out[last] = 1.0;
        return;
    }

    for i in 0..last {
        let lower = layers[i].height_position;
        let upper = layers[i + 1].height_position;
        if !(lower < h && h <= upper) {
            continue;
        }

        let band_end = lower + (upper - lower) * layers[i].blend_percent;
        if h <= band_end {
            if band_end == lower {
                out[i + 1] = 1.0;
            } else {
                let t = inverse_lerp(lower, band_end, h);
                out[i] = 1.0 - t;
                out[i + 1] = t;
            }
        } else if h < upper {
            out[i] = 1.0;
        } else {
            out[i + 1] = 1.0;
        }
        return;
    }

    // Only reachable with unsorted thresholds
    out[last] = 1.0;
}

/// Per-sample layer weights, stored sample-major (`(z * width + x) * layers + layer`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlphaMap {
    pub width: usize,
    pub height: usize,
    pub layers: usize,
    weights: Vec<f32>,
}

impl AlphaMap {
    pub fn weights_at(&self, x: usize, z: usize) -> &[f32] {
        let start = (z * self.width + x) * self.layers;
        &self.weights[start..start + self.layers]
    }

    /// Layer with the largest weight at a sample (first one on ties).
    pub fn dominant_layer(&self, x: usize, z: usize) -> Option<usize> {
        let weights = self.weights_at(x, z);
        let mut best: Option<(usize, f32)> = None;
        for (i, &w) in weights.iter().enumerate() {
            match best {
                Some((_, best_w)) if w <= best_w => {}
                _ => best = Some((i, w)),
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }
}

/// Compute weights for every heightmap sample.
pub fn blend(heightmap: &Tilemap<f32>, layers: &[TerrainLayer]) -> AlphaMap {
    let width = heightmap.width;
    let height = heightmap.height;
    let count = layers.len();

    if !is_sorted(layers) {
        log::warn!("Terrain layers are not sorted by height; blending is undefined");
    }
    if count == 0 {
        return AlphaMap {
            width,
            height,
            layers: 0,
            weights: Vec::new(),
        };
    }

    let heights = heightmap.as_slice();
    let mut weights = vec![0.0f32; width * height * count];
    weights
        .par_chunks_mut(count)
        .zip(heights.par_iter())
        .for_each(|(out, &h)| layer_weights(h, layers, out));

    AlphaMap {
        width,
        height,
        layers: count,
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_layers() -> Vec<TerrainLayer> {
        vec![
            TerrainLayer::new("hole", 0.0, 0.5),
            TerrainLayer::new("ground", 0.4, 0.5),
            TerrainLayer::new("wall", 0.8, 0.0),
        ]
    }

    fn weights(h: f32, layers: &[TerrainLayer]) -> Vec<f32> {
        let mut out = vec![0.0; layers.len()];
        layer_weights(h, layers, &mut out);
        out
    }

    #[test]
    fn test_below_first_and_above_last() {
        let layers = three_layers();
        assert_eq!(weights(-0.2, &layers), vec![1.0, 0.0, 0.0]);
        assert_eq!(weights(0.0, &layers), vec![1.0, 0.0, 0.0]);
        assert_eq!(weights(0.8, &layers), vec![0.0, 0.0, 1.0]);
        assert_eq!(weights(1.0, &layers), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cross_fade_inside_band() {
        let layers = three_layers();
        // Band between layer 1 and 2 is [0.4, 0.6]
        let w = weights(0.5, &layers);
        assert!((w[1] - 0.5).abs() < 1e-5);
        assert!((w[2] - 0.5).abs() < 1e-5);
        assert_eq!(w[0], 0.0);

        let near_end = weights(0.59, &layers);
        assert!((near_end[1] - 0.05).abs() < 1e-4);
        assert!((near_end[2] - 0.95).abs() < 1e-4);
    }

    #[test]
    fn test_past_band_keeps_lower_layer() {
        let layers = three_layers();
        assert_eq!(weights(0.7, &layers), vec![0.0, 1.0, 0.0]);
        assert_eq!(weights(0.3, &layers), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_exact_inner_threshold_goes_to_upper_layer() {
        // Band between layer 0 and 1 ends at 0.2, so 0.4 sits on layer 1's threshold past it
        assert_eq!(weights(0.4, &three_layers()), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_blend_is_a_hard_step() {
        let layers = vec![TerrainLayer::new("a", 0.0, 0.0), TerrainLayer::new("b", 0.5, 0.0)];
        assert_eq!(weights(0.25, &layers), vec![1.0, 0.0]);
        assert_eq!(weights(0.5, &layers), vec![0.0, 1.0]);
    }

    #[test]
    fn test_full_blend_reaches_next_threshold() {
        let layers = vec![TerrainLayer::new("a", 0.0, 1.0), TerrainLayer::new("b", 1.0, 0.0)];
        let w = weights(0.25, &layers);
        assert!((w[0] - 0.75).abs() < 1e-6);
        assert!((w[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_evenly_spaced_layers() {
        assert!(TerrainLayer::evenly_spaced(0, 0.5).is_empty());
        let one = TerrainLayer::evenly_spaced(1, 0.5);
        assert_eq!(one[0].height_position, 0.0);

        let four = TerrainLayer::evenly_spaced(4, 0.25);
        let positions: Vec<f32> = four.iter().map(|l| l.height_position).collect();
        assert_eq!(positions, vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
        assert!(is_sorted(&four));
    }

    #[test]
    fn test_blend_map_layout() {
        let mut heightmap = Tilemap::new_with(3, 2, 0.0f32);
        heightmap.set(2, 1, 1.0);
        let alpha = blend(&heightmap, &three_layers());
        assert_eq!(alpha.layers, 3);
        assert_eq!(alpha.as_slice().len(), 18);
        assert_eq!(alpha.weights_at(0, 0), &[1.0, 0.0, 0.0]);
        assert_eq!(alpha.weights_at(2, 1), &[0.0, 0.0, 1.0]);
        assert_eq!(alpha.dominant_layer(2, 1), Some(2));
    }

    #[test]
    fn test_blend_without_layers() {
        let heightmap = Tilemap::new_with(4, 4, 0.5f32);
        let alpha = blend(&heightmap, &[]);
        assert_eq!(alpha.layers, 0);
        assert!(alpha.as_slice().is_empty());
        assert_eq!(alpha.dominant_layer(1, 1), None);
    }

    #[test]
    fn test_unsorted_layers_still_normalized() {
        let layers = vec![
            TerrainLayer::new("a", 0.6, 0.5),
            TerrainLayer::new("b", 0.2, 0.5),
            TerrainLayer::new("c", 0.9, 0.5),
        ];
        assert!(!is_sorted(&layers));
        for i in 0..=20 {
            let w = weights(i as f32 / 20.0, &layers);
            assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    fn sorted_layers() -> impl Strategy<Value = Vec<TerrainLayer>> {
        prop::collection::vec((0.0f32..=1.0, 0.0f32..=1.0), 1..6).prop_map(|mut raw| {
            raw.sort_by(|a, b| a.0.total_cmp(&b.0));
            raw.into_iter()
                .enumerate()
                .map(|(i, (pos, blend))| TerrainLayer::new(format!("l{}", i), pos, blend))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_weights_are_normalized(layers in sorted_layers(), h in -0.5f32..1.5) {
            let w = weights(h, &layers);
            prop_assert!(w.iter().all(|&v| v >= 0.0));
            prop_assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }
}
