//! Noise-biased depth-first maze carving ("growing tree" with backtracking).
//!
//! The carver walks a path stack starting at cell `(0, 0)`. At every step the
//! unvisited neighbour with the highest noise value is chosen, the wall strips
//! on both sides of the shared boundary are lowered to ground height, and the
//! neighbour is pushed. Dead ends are popped until a cell with unvisited
//! neighbours is back on top. With deterministic noise the whole carve order
//! is deterministic, so regeneration reproduces the same maze.

use std::collections::VecDeque;

use serde::Serialize;

use crate::grid::{CellCoord, CellGrid, WallDirection};
use crate::noise_field::NoiseField;
use crate::tilemap::Tilemap;

/// Topology of a carved maze: a spanning tree over the cell grid.
#[derive(Clone, Debug, Serialize)]
pub struct MazeLayout {
    pub rows: usize,
    pub cols: usize,
    /// Carved passages in carve order, `(from, to)`
    pub passages: Vec<(CellCoord, CellCoord)>,
    /// Open sides per cell, one bit per [`WallDirection::index`]
    openings: Tilemap<u8>,
    visited: usize,
}

impl MazeLayout {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            passages: Vec::with_capacity((rows * cols).saturating_sub(1)),
            openings: Tilemap::new(cols, rows),
            visited: 0,
        }
    }

    fn open(&mut self, a: CellCoord, b: CellCoord) {
        let dir = WallDirection::between(a, b);
        *self.openings.get_mut(a.x, a.y) |= 1 << dir.index();
        *self.openings.get_mut(b.x, b.y) |= 1 << dir.opposite().index();
        self.passages.push((a, b));
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the wall on `dir` side of `cell` was carved.
    pub fn is_open(&self, cell: CellCoord, dir: WallDirection) -> bool {
        *self.openings.get(cell.x, cell.y) & (1 << dir.index()) != 0
    }

    /// Cells connected to `cell` through carved passages.
    pub fn open_neighbors(&self, cell: CellCoord) -> Vec<CellCoord> {
        WallDirection::ALL
            .iter()
            .filter(|&&dir| self.is_open(cell, dir))
            .filter_map(|&dir| {
                let (dx, dy) = dir.offset();
                let x = cell.x as i64 + dx;
                let y = cell.y as i64 + dy;
                if self.openings.in_bounds(x, y) {
                    Some(CellCoord::new(x as usize, y as usize))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Number of cells reachable from `(0, 0)` through carved passages.
    pub fn reachable_from_origin(&self) -> usize {
        if self.cell_count() == 0 {
            return 0;
        }
        let mut seen = Tilemap::new_with(self.cols, self.rows, false);
        let mut queue = VecDeque::new();
        seen.set(0, 0, true);
        queue.push_back(CellCoord::ORIGIN);
        let mut count = 0;

        while let Some(cell) = queue.pop_front() {
            count += 1;
            for next in self.open_neighbors(cell) {
                if !*seen.get(next.x, next.y) {
                    seen.set(next.x, next.y, true);
                    queue.push_back(next);
                }
            }
        }
        count
    }
}

/// Carves a perfect maze into a heightmap.
pub struct MazeCarver<'a> {
    grid: &'a CellGrid,
    noise: &'a NoiseField,
}

impl<'a> MazeCarver<'a> {
    pub fn new(grid: &'a CellGrid, noise: &'a NoiseField) -> Self {
        Self { grid, noise }
    }

    /// Unvisited in-bounds neighbours of `cell`, in `WallDirection::ALL` order.
    fn candidates(&self, cell: CellCoord, visited: &Tilemap<bool>) -> Vec<CellCoord> {
        WallDirection::ALL
            .iter()
            .filter_map(|&dir| self.grid.neighbor(cell, dir))
            .filter(|next| !*visited.get(next.x, next.y))
            .collect()
    }

    /// Highest noise wins; the earliest candidate wins ties.
    fn choose(&self, candidates: &[CellCoord]) -> Option<CellCoord> {
        let mut best: Option<(CellCoord, f32)> = None;
        for &cell in candidates {
            let value = self.noise.value_at(cell.x, cell.y);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((cell, value)),
            }
        }
        best.map(|(cell, _)| cell)
    }

    fn lower_wall(&self, heightmap: &mut Tilemap<f32>, cell: CellCoord, dir: WallDirection, ground: f32) {
        for (x, z) in self.grid.wall_samples(cell, dir) {
            heightmap.set(x, z, ground);
        }
    }

    /// Carve the full maze, writing `ground` over every removed wall strip.
    ///
    /// The heightmap must cover the grid; the pipeline checks this before
    /// generation starts.
    pub fn carve(&self, heightmap: &mut Tilemap<f32>, ground: f32) -> MazeLayout {
        let rows = self.grid.rows();
        let cols = self.grid.cols();
        let mut layout = MazeLayout::new(rows, cols);
        let total = self.grid.cell_count();
        if total == 0 {
            return layout;
        }

        let mut visited = Tilemap::new_with(cols, rows, false);
        visited.set(0, 0, true);
        layout.visited = 1;
        let mut path = vec![CellCoord::ORIGIN];

        while layout.visited < total {
            let Some(&current) = path.last() else {
                break;
            };
            let candidates = self.candidates(current, &visited);
            let Some(next) = self.choose(&candidates) else {
                path.pop();
                continue;
            };

            let dir = WallDirection::between(current, next);
            self.lower_wall(heightmap, current, dir, ground);
            self.lower_wall(heightmap, next, dir.opposite(), ground);

            visited.set(next.x, next.y, true);
            layout.visited += 1;
            layout.open(current, next);
            path.push(next);
        }

        log::debug!(
            "Carved {} passages over {}x{} cells ({} visited)",
            layout.passages.len(),
            cols,
            rows,
            layout.visited
        );
        layout
    }
}
