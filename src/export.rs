use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::alpha::AlphaMap;
use crate::error::Result;
use crate::terrain::{Marker, TerrainSnapshot};
use crate::tilemap::Tilemap;

/// Layer colors used by the alpha preview, cycled when there are more layers.
const LAYER_PALETTE: [[f32; 3]; 6] = [
    [0.18, 0.14, 0.12], // Dark soil
    [0.42, 0.62, 0.30], // Grass
    [0.62, 0.60, 0.56], // Stone
    [0.85, 0.78, 0.55], // Sand
    [0.30, 0.45, 0.70], // Water
    [0.95, 0.95, 0.97], // Snow
];

/// Export a heightmap using spectral colormap.
/// Values are expected to be normalized (0.0-1.0).
pub fn export_heightmap(heightmap: &Tilemap<f32>, path: impl AsRef<Path>) -> Result<()> {
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, z, &val) in heightmap.iter() {
        let color = spectral_colormap(val.clamp(0.0, 1.0));
        img.put_pixel(x as u32, z as u32, Rgb(color));
    }

    img.save(path)?;
    Ok(())
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],  // Blue
        [0.40, 0.76, 0.65],  // Teal
        [0.67, 0.87, 0.64],  // Light green
        [0.90, 0.96, 0.60],  // Yellow-green
        [1.00, 1.00, 0.75],  // Light yellow / white
        [1.00, 0.88, 0.55],  // Yellow
        [0.99, 0.68, 0.38],  // Light orange
        [0.96, 0.43, 0.26],  // Orange
        [0.84, 0.24, 0.31],  // Red
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Render heightmap to image buffer, normalizing to its own range first.
pub fn render_heightmap(heightmap: &Tilemap<f32>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    let (min_val, max_val) = heightmap.min_max();
    let range = max_val - min_val;
    if range < 0.001 {
        // Flat heightmap, return gray
        for pixel in img.pixels_mut() {
            *pixel = Rgb([128, 128, 128]);
        }
        return img;
    }

    for (x, z, &val) in heightmap.iter() {
        let normalized = (val - min_val) / range;
        img.put_pixel(x as u32, z as u32, Rgb(spectral_colormap(normalized)));
    }
    img
}

/// Render texture weights by mixing a fixed palette.
pub fn render_alpha(alpha: &AlphaMap) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(alpha.width as u32, alpha.height as u32);

    for z in 0..alpha.height {
        for x in 0..alpha.width {
            let mut rgb = [0.0f32; 3];
            for (i, &w) in alpha.weights_at(x, z).iter().enumerate() {
                let c = LAYER_PALETTE[i % LAYER_PALETTE.len()];
                rgb[0] += c[0] * w;
                rgb[1] += c[1] * w;
                rgb[2] += c[2] * w;
            }
            let color = [
                (rgb[0].clamp(0.0, 1.0) * 255.0) as u8,
                (rgb[1].clamp(0.0, 1.0) * 255.0) as u8,
                (rgb[2].clamp(0.0, 1.0) * 255.0) as u8,
            ];
            img.put_pixel(x as u32, z as u32, Rgb(color));
        }
    }
    img
}

pub fn export_alpha_preview(alpha: &AlphaMap, path: impl AsRef<Path>) -> Result<()> {
    render_alpha(alpha).save(path)?;
    Ok(())
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Write marker records for the interaction layer.
pub fn export_markers(markers: &[Marker], path: impl AsRef<Path>) -> Result<()> {
    write_json(&markers, path.as_ref())
}

/// Write the full snapshot (heights and weights) as JSON.
pub fn export_snapshot(snapshot: &TerrainSnapshot, path: impl AsRef<Path>) -> Result<()> {
    write_json(snapshot, path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha::{blend, TerrainLayer};

    #[test]
    fn test_spectral_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        assert_eq!(spectral_colormap(1.0), [158, 0, 66]);
    }

    #[test]
    fn test_flat_heightmap_renders_gray() {
        let img = render_heightmap(&Tilemap::new_with(4, 3, 0.5f32));
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(*img.get_pixel(2, 1), Rgb([128, 128, 128]));
    }

    #[test]
    fn test_alpha_preview_uses_layer_colors() {
        let mut heightmap = Tilemap::new_with(2, 1, 0.0f32);
        heightmap.set(1, 0, 1.0);
        let layers = vec![TerrainLayer::new("low", 0.0, 0.0), TerrainLayer::new("high", 1.0, 0.0)];
        let img = render_alpha(&blend(&heightmap, &layers));
        assert_eq!(*img.get_pixel(0, 0), Rgb([45, 35, 30]));
        assert_eq!(*img.get_pixel(1, 0), Rgb([107, 158, 76]));
    }
}
