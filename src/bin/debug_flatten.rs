//! Debug tool for comparing sculpting parameters visually
//! Generates a grid of heightmaps with different flatten bands and peak sharpening

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};
use maze_terrain::export::render_heightmap;
use maze_terrain::noise_field::{NoiseField, NoiseSettings};
use maze_terrain::sculpt::{FlattenParams, HeightSculptor, SculptParams};
use maze_terrain::TerrainSeeds;

const SIZE: usize = 256;
const SEED: u64 = 42;

fn variant(scale_multiplier: f32, min_between: f32, ground_level: f32, max_between: f32) -> SculptParams {
    SculptParams {
        scale_multiplier,
        vertical_scale: 1.0,
        flatten: FlattenParams {
            min_between,
            ground_level,
            max_between,
        },
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("Generating flatten comparison grid...");

    let seeds = TerrainSeeds::from_master(SEED);
    let settings = NoiseSettings {
        seed: seeds.terrain,
        x_scale: 0.02,
        z_scale: 0.02,
        ..NoiseSettings::default()
    };
    let noise = NoiseField::new(settings);

    let variants: Vec<(&str, SculptParams)> = vec![
        ("1. No Band", variant(1.0, 0.5, 0.5, 0.5)),
        ("2. Default Params", SculptParams::default()),
        ("3. Wide Band", variant(2.0, 0.2, 0.45, 0.8)),
        ("4. Low Plateau", variant(2.0, 0.35, 0.2, 0.55)),
        ("5. High Plateau", variant(2.0, 0.35, 0.55, 0.55)),
        ("6. Narrow Band", variant(2.0, 0.45, 0.5, 0.55)),
        ("7. Linear Peaks", variant(1.0, 0.35, 0.45, 0.55)),
        ("8. Sharp Peaks", variant(4.0, 0.35, 0.45, 0.55)),
        ("9. Sharp Wide", variant(4.0, 0.2, 0.45, 0.8)),
    ];

    let mut images: Vec<RgbImage> = Vec::new();
    for (name, params) in variants {
        let sculptor = HeightSculptor::new(noise.clone(), params);
        let (heightmap, plateau) = sculptor.sculpt_with_plateau(SIZE - 1, SIZE - 1);
        let (min_h, max_h) = heightmap.min_max();
        println!("  {}: range {:.2}..{:.2}, plateau {:.2}", name, min_h, max_h, plateau);
        images.push(render_heightmap(&heightmap));
    }

    let grid = create_grid(&images, 3, 3);
    grid.save("flatten_comparison.png")?;

    println!("Saved flatten_comparison.png");
    Ok(())
}

fn create_grid(images: &[RgbImage], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].width();
    let cell_height = images[0].height();
    let gap = 4u32;

    let grid_width = (cell_width + gap) * cols as u32 - gap;
    let grid_height = (cell_height + gap) * rows as u32 - gap;

    let mut grid: RgbImage = ImageBuffer::from_pixel(grid_width, grid_height, Rgb([40, 40, 40]));

    for (idx, img) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = col as u32 * (cell_width + gap);
        let y_offset = row as u32 * (cell_height + gap);
        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, y_offset + y, *pixel);
        }
    }

    grid
}
