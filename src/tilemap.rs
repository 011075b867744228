use serde::Serialize;

/// A dense 2D grid stored row-major (`z * width + x`). Edges are hard: no wrapping.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.height, "({}, {}) outside {}x{}", x, z, self.width, self.height);
        z * self.width + x
    }

    pub fn in_bounds(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.height
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    pub fn get_mut(&mut self, x: usize, z: usize) -> &mut T {
        let idx = self.index(x, z);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }
}

impl Tilemap<f32> {
    /// Observed `(min, max)`. An empty map reports `(0.0, 0.0)`.
    pub fn min_max(&self) -> (f32, f32) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(min_h, max_h), &h| (min_h.min(h), max_h.max(h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut map = Tilemap::new_with(3, 2, 0u8);
        map.set(2, 1, 7);
        assert_eq!(map.as_slice()[5], 7);
        assert_eq!(*map.get(2, 1), 7);

        let coords: Vec<(usize, usize)> = map.iter().map(|(x, z, _)| (x, z)).collect();
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[3], (0, 1));
    }

    #[test]
    fn test_min_max() {
        let mut map = Tilemap::new_with(2, 2, 0.5f32);
        map.set(0, 1, -1.0);
        map.set(1, 1, 3.0);
        assert_eq!(map.min_max(), (-1.0, 3.0));

        let empty: Tilemap<f32> = Tilemap::new(0, 0);
        assert_eq!(empty.min_max(), (0.0, 0.0));
    }

    #[test]
    fn test_in_bounds() {
        let map: Tilemap<u8> = Tilemap::new(2, 3);
        assert!(map.in_bounds(1, 2));
        assert!(!map.in_bounds(-1, 0));
        assert!(!map.in_bounds(2, 0));
        assert!(!map.in_bounds(0, 3));
    }
}
