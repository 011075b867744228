use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use maze_terrain::export;
use maze_terrain::grid::MarkerKind;
use maze_terrain::{MarkerCoord, MazeTerrain, MazeTerrainConfig, TerrainSeeds, ToggleMode};

#[derive(Parser, Debug)]
#[command(name = "maze_terrain")]
#[command(about = "Generate a maze carved into a sculpted noise heightmap")]
struct Args {
    /// JSON configuration file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maze rows
    #[arg(short, long)]
    rows: Option<usize>,

    /// Maze columns
    #[arg(short = 'C', long)]
    cols: Option<usize>,

    /// Heightmap samples per cell side
    #[arg(long)]
    cell_size: Option<usize>,

    /// Wall thickness in samples
    #[arg(long)]
    wall_thickness: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the relief noise seed derived from --seed
    #[arg(long)]
    terrain_seed: Option<u32>,

    /// Override the maze noise seed derived from --seed
    #[arg(long)]
    maze_seed: Option<u32>,

    /// How much sculpted relief shows through cell floors (0.0-1.0)
    #[arg(long)]
    relief: Option<f32>,

    /// Replace the texture layers with N evenly spaced layers
    #[arg(long)]
    layers: Option<usize>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Write the effective configuration to config.json
    #[arg(long)]
    dump_config: bool,

    /// Write marker records to markers.json
    #[arg(long)]
    markers: bool,

    /// Write heights and layer weights to snapshot.json
    #[arg(long)]
    snapshot: bool,

    /// Toggle a marker before export, as "x,z" (repeatable)
    #[arg(long, value_parser = parse_marker)]
    toggle: Vec<MarkerCoord>,

    /// How --toggle rewrites the addressed markers
    #[arg(long, value_enum, default_value_t = ToggleArg::Auto)]
    toggle_mode: ToggleArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ToggleArg {
    /// Ground becomes wall, wall or hole becomes ground
    Auto,
    Wall,
    Ground,
    Hole,
}

impl From<ToggleArg> for ToggleMode {
    fn from(arg: ToggleArg) -> Self {
        match arg {
            ToggleArg::Auto => ToggleMode::AutoInvert,
            ToggleArg::Wall => ToggleMode::ForceWall,
            ToggleArg::Ground => ToggleMode::ForceGround,
            ToggleArg::Hole => ToggleMode::ForceHole,
        }
    }
}

fn parse_marker(s: &str) -> Result<MarkerCoord, String> {
    let (x, z) = s.split_once(',').ok_or_else(|| format!("expected x,z, got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let z = z.trim().parse().map_err(|e| format!("bad z in '{}': {}", s, e))?;
    Ok(MarkerCoord::new(x, z))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MazeTerrainConfig::load(path)?,
        None => MazeTerrainConfig::default(),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(cell_size) = args.cell_size {
        config.cell_size = cell_size;
    }
    if let Some(wall_thickness) = args.wall_thickness {
        config.wall_thickness = wall_thickness;
    }
    if let Some(relief) = args.relief {
        config.relief = relief;
    }
    if let Some(count) = args.layers {
        let blend = config.layers.first().map(|l| l.blend_percent).unwrap_or(0.25);
        config = config.with_layer_count(count, blend);
    }

    // A config file keeps its own seeds unless a seed is given explicitly
    let overridden = args.terrain_seed.is_some() || args.maze_seed.is_some();
    if args.seed.is_some() || args.config.is_none() || overridden {
        let seed = args.seed.unwrap_or_else(rand::random);
        let mut builder = TerrainSeeds::builder(seed);
        if let Some(terrain_seed) = args.terrain_seed {
            builder = builder.terrain(terrain_seed);
        }
        if let Some(maze_seed) = args.maze_seed {
            builder = builder.maze(maze_seed);
        }
        let seeds = builder.build();
        println!("Generating maze terrain with seed: {}", seed);
        println!("{}", seeds);
        config = config.with_seeds(&seeds);
    }

    let (width, height) = config.heightmap_size()?;
    println!("Maze: {}x{} cells, cell size {}, wall thickness {}", config.cols, config.rows, config.cell_size, config.wall_thickness);
    println!("Heightmap size: {}x{}", width, height);

    std::fs::create_dir_all(&args.output)?;
    if args.dump_config {
        let path = args.output.join("config.json");
        config.save(&path)?;
        println!("Saved {}", path.display());
    }

    println!("Sculpting terrain and carving maze...");
    let mut terrain = MazeTerrain::generate(config)?;
    let maze = terrain.maze();
    println!(
        "Carved {} passages, {}/{} cells reachable from origin",
        maze.passages.len(),
        maze.reachable_from_origin(),
        maze.cell_count()
    );

    if !args.toggle.is_empty() {
        let mode = ToggleMode::from(args.toggle_mode);
        println!("Toggling {} markers ({:?})...", args.toggle.len(), mode);
        terrain.toggle_walls(&args.toggle, mode)?;
    }

    println!("Exporting...");
    let path = args.output.join("heightmap.png");
    export::export_heightmap(terrain.heightmap(), &path)?;
    println!("Saved {}", path.display());

    let path = args.output.join("alpha.png");
    export::export_alpha_preview(terrain.alpha(), &path)?;
    println!("Saved {}", path.display());

    if args.markers {
        let markers = terrain.markers();
        let walls = markers.iter().filter(|m| m.kind == MarkerKind::Wall && m.is_wall()).count();
        let path = args.output.join("markers.json");
        export::export_markers(&markers, &path)?;
        println!("Saved {} ({} markers, {} closed walls)", path.display(), markers.len(), walls);
    }

    if args.snapshot {
        let path = args.output.join("snapshot.json");
        export::export_snapshot(&terrain.snapshot(), &path)?;
        println!("Saved {}", path.display());
    }

    println!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marker() {
        assert_eq!(parse_marker("3, 4"), Ok(MarkerCoord::new(3, 4)));
        assert!(parse_marker("3").is_err());
        assert!(parse_marker("a,4").is_err());
    }

    #[test]
    fn test_toggle_mode_flag() {
        let args = Args::try_parse_from(["maze_terrain", "--toggle", "1,2", "--toggle-mode", "hole"]).unwrap();
        assert_eq!(args.toggle, vec![MarkerCoord::new(1, 2)]);
        assert_eq!(ToggleMode::from(args.toggle_mode), ToggleMode::ForceHole);

        let args = Args::try_parse_from(["maze_terrain"]).unwrap();
        assert_eq!(ToggleMode::from(args.toggle_mode), ToggleMode::AutoInvert);
    }

    #[test]
    fn test_seed_overrides() {
        let args = Args::try_parse_from(["maze_terrain", "--seed", "7", "--maze-seed", "99"]).unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.maze_seed, Some(99));
        assert_eq!(args.terrain_seed, None);
    }
}
