//! Coordinate algebra between maze cells, wall strips, clickable markers and
//! the flat heightmap index space.
//!
//! Every maze cell owns a `cell_size x cell_size` block of heightmap samples.
//! A `wall_thickness` border around the block is wall by default. The border
//! is split into four directional strips that can be carved, plus four corner
//! squares that belong to no strip and always stay wall.
//!
//! Markers live on a grid twice as fine as the cells, plus one: even marker
//! indices sit on cell boundaries, odd ones on cell centres.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Integer coordinate of a maze cell: `x` in `[0, cols)`, `y` in `[0, rows)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub const ORIGIN: CellCoord = CellCoord { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Offset of a sample inside a cell block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalOffset {
    pub x: usize,
    pub z: usize,
}

/// Side of a cell. `Top`/`Bottom` face `+x`/`-x`, `Left`/`Right` face `-y`/`+y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl WallDirection {
    /// Fixed precedence used for neighbour enumeration and tie-breaking.
    pub const ALL: [WallDirection; 4] = [
        WallDirection::Top,
        WallDirection::Bottom,
        WallDirection::Left,
        WallDirection::Right,
    ];

    pub fn index(self) -> usize {
        match self {
            WallDirection::Top => 0,
            WallDirection::Bottom => 1,
            WallDirection::Left => 2,
            WallDirection::Right => 3,
        }
    }

    /// Cell-space step `(dx, dy)` towards the neighbour behind this wall.
    pub fn offset(self) -> (i64, i64) {
        match self {
            WallDirection::Top => (1, 0),
            WallDirection::Bottom => (-1, 0),
            WallDirection::Left => (0, -1),
            WallDirection::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            WallDirection::Top => WallDirection::Bottom,
            WallDirection::Bottom => WallDirection::Top,
            WallDirection::Left => WallDirection::Right,
            WallDirection::Right => WallDirection::Left,
        }
    }

    /// Direction from `a` facing `b`. The cells must be 4-adjacent.
    pub fn between(a: CellCoord, b: CellCoord) -> Self {
        debug_assert!(
            a.x.abs_diff(b.x) + a.y.abs_diff(b.y) == 1,
            "cells {} and {} are not adjacent",
            a,
            b
        );
        if a.x != b.x {
            if a.x < b.x { WallDirection::Top } else { WallDirection::Bottom }
        } else if a.y > b.y {
            WallDirection::Left
        } else {
            WallDirection::Right
        }
    }
}

/// Coordinate on the clickable marker grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerCoord {
    pub x: usize,
    pub z: usize,
}

impl MarkerCoord {
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    pub fn kind(&self) -> MarkerKind {
        match (self.x % 2, self.z % 2) {
            (0, 0) => MarkerKind::Post,
            (1, 1) => MarkerKind::Cell,
            _ => MarkerKind::Wall,
        }
    }
}

/// What a marker sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Crossing of two cell boundaries
    Post,
    /// Boundary between two cells (or a cell and the outside)
    Wall,
    /// Interior of a cell
    Cell,
}

/// Heightmap rectangle addressed by a marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerFootprint {
    pub xs: Range<usize>,
    pub zs: Range<usize>,
}

impl MarkerFootprint {
    pub fn samples(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.zs.clone().flat_map(move |z| self.xs.clone().map(move |x| (x, z)))
    }

    pub fn len(&self) -> usize {
        self.xs.len() * self.zs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Geometry of the maze grid laid over a heightmap.
#[derive(Clone, Debug)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    cell_size: usize,
    wall_thickness: usize,
    segments: [Vec<LocalOffset>; 4],
}

impl CellGrid {
    /// Callers validate `2 * wall_thickness < cell_size` beforehand.
    pub fn new(rows: usize, cols: usize, cell_size: usize, wall_thickness: usize) -> Self {
        debug_assert!(2 * wall_thickness < cell_size, "wall thickness leaves no interior");
        let mut segments: [Vec<LocalOffset>; 4] = Default::default();
        let inner = wall_thickness..cell_size - wall_thickness;

        for z in 0..cell_size {
            for x in 0..cell_size {
                let offset = LocalOffset { x, z };
                if inner.contains(&z) {
                    if x >= cell_size - wall_thickness {
                        segments[WallDirection::Top.index()].push(offset);
                    }
                    if x < wall_thickness {
                        segments[WallDirection::Bottom.index()].push(offset);
                    }
                }
                if inner.contains(&x) {
                    if z < wall_thickness {
                        segments[WallDirection::Left.index()].push(offset);
                    }
                    if z >= cell_size - wall_thickness {
                        segments[WallDirection::Right.index()].push(offset);
                    }
                }
            }
        }

        Self {
            rows,
            cols,
            cell_size,
            wall_thickness,
            segments,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn wall_thickness(&self) -> usize {
        self.wall_thickness
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Heightmap samples covered by the grid along x.
    pub fn width(&self) -> usize {
        self.cols * self.cell_size
    }

    /// Heightmap samples covered by the grid along z.
    pub fn height(&self) -> usize {
        self.rows * self.cell_size
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x < self.cols && cell.y < self.rows
    }

    /// Whether a local offset lies in the wall border of its block.
    pub fn is_border(&self, local: LocalOffset) -> bool {
        let wt = self.wall_thickness;
        let far = self.cell_size - wt;
        local.x < wt || local.x >= far || local.z < wt || local.z >= far
    }

    /// Neighbouring cell behind `dir`, if it is inside the grid.
    pub fn neighbor(&self, cell: CellCoord, dir: WallDirection) -> Option<CellCoord> {
        let (dx, dy) = dir.offset();
        let x = cell.x as i64 + dx;
        let y = cell.y as i64 + dy;
        if x < 0 || y < 0 || x >= self.cols as i64 || y >= self.rows as i64 {
            return None;
        }
        Some(CellCoord::new(x as usize, y as usize))
    }

    /// Local offsets of the carvable strip on one side of a cell.
    /// Identical for every cell.
    pub fn wall_segment(&self, dir: WallDirection) -> &[LocalOffset] {
        &self.segments[dir.index()]
    }

    pub fn to_absolute(&self, cell: CellCoord, local: LocalOffset) -> (usize, usize) {
        (
            local.x + self.cell_size * cell.x,
            local.z + self.cell_size * cell.y,
        )
    }

    /// Absolute heightmap samples of one wall strip.
    pub fn wall_samples(&self, cell: CellCoord, dir: WallDirection) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.wall_segment(dir).iter().map(move |&local| self.to_absolute(cell, local))
    }

    /// Marker grid dimensions `(along x, along z)`.
    pub fn marker_dims(&self) -> (usize, usize) {
        (2 * self.cols + 1, 2 * self.rows + 1)
    }

    pub fn contains_marker(&self, marker: MarkerCoord) -> bool {
        let (mx, mz) = self.marker_dims();
        marker.x < mx && marker.z < mz
    }

    fn marker_centre(&self, index: usize) -> usize {
        index * self.cell_size / 2
    }

    fn marker_span(&self, index: usize, cells: usize) -> Range<usize> {
        let cs = self.cell_size;
        let wt = self.wall_thickness;
        let centre = self.marker_centre(index);

        let (mut start, mut end) = if index % 2 == 0 {
            (centre.saturating_sub(wt), centre + wt)
        } else {
            (centre - (cs / 2 - wt), centre + ((cs + 1) / 2 - wt))
        };
        if index == 0 {
            start = 0;
        }
        if index == 2 * cells {
            end = centre;
        }
        start..end
    }

    /// Heightmap rectangle toggled by a marker.
    pub fn marker_footprint(&self, marker: MarkerCoord) -> MarkerFootprint {
        MarkerFootprint {
            xs: self.marker_span(marker.x, self.cols),
            zs: self.marker_span(marker.z, self.rows),
        }
    }

    /// Sample read to classify a marker, clamped to the last heightmap index.
    pub fn marker_sample(&self, marker: MarkerCoord, width: usize, height: usize) -> (usize, usize) {
        (
            self.marker_centre(marker.x).min(width.saturating_sub(1)),
            self.marker_centre(marker.z).min(height.saturating_sub(1)),
        )
    }
}
