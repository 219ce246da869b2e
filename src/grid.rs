/// A dense 2D grid of values, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// Height samples for one map. Every stage of the generation pipeline
/// produces a fresh one and hands it off read-only to the next stage.
pub type HeightMap = Grid<f32>;

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Fill the entire grid with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::new_with(4, 4, 0.0f32);
        grid.set(1, 2, 7.5);
        assert_eq!(*grid.get(1, 2), 7.5);
        assert_eq!(*grid.get(2, 1), 0.0);
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut grid = Grid::new_with(3, 2, 0i32);
        grid.set(2, 0, 1);
        grid.set(0, 1, 2);

        let cells: Vec<(usize, usize, i32)> = grid.iter().map(|(x, y, &v)| (x, y, v)).collect();
        assert_eq!(cells[2], (2, 0, 1));
        assert_eq!(cells[3], (0, 1, 2));
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_fill() {
        let mut grid = Grid::new_with(2, 2, 1.0f32);
        grid.fill(0.25);
        assert!(grid.iter().all(|(_, _, &v)| v == 0.25));
    }
}
