//! Fixed-size boolean bitmap for walls and food.
//!
//! Cells are stored column-major so [`Grid::as_list`] walks columns in
//! increasing x and, within a column, rows in increasing y.
//!
//! Game states share grids behind an `Arc` and copy them on first write,
//! so `Clone` here is always a full duplicate.

use serde::{Deserialize, Serialize};

use super::position::Coord;

/// Width × height matrix of booleans.
///
/// Dimensions are fixed at construction. Indexing outside
/// `[0, width) × [0, height)` is a caller bug and panics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a grid with every cell `false`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, false)
    }

    /// Create a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: bool) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        x * self.height + y
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.offset(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let offset = self.offset(x, y);
        self.cells[offset] = value;
    }

    /// Like [`Grid::get`], but out-of-range cells read as `None`.
    #[must_use]
    pub fn try_get(&self, cell: Coord) -> Option<bool> {
        (cell.x < self.width && cell.y < self.height).then(|| self.get(cell.x, cell.y))
    }

    /// Number of cells equal to `value`.
    #[must_use]
    pub fn count(&self, value: bool) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    /// Every cell equal to `value`, x-major then y.
    #[must_use]
    pub fn as_list(&self, value: bool) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == value)
            .map(|(i, _)| Coord::new(i / self.height, i % self.height))
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "T" } else { "F" })?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(3, 2);
        assert!(!grid.get(2, 1));
        grid.set(2, 1, true);
        assert!(grid.get(2, 1));
        assert_eq!(grid.count(true), 1);
        assert_eq!(grid.count(false), 5);
    }

    #[test]
    fn test_as_list_order() {
        let mut grid = Grid::new(3, 3);
        grid.set(2, 0, true);
        grid.set(0, 2, true);
        grid.set(0, 1, true);

        assert_eq!(
            grid.as_list(true),
            vec![Coord::new(0, 1), Coord::new(0, 2), Coord::new(2, 0)]
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut grid = Grid::filled(2, 2, true);
        let copy = grid.clone();
        grid.set(0, 0, false);

        assert!(copy.get(0, 0));
        assert_ne!(grid, copy);
    }

    #[test]
    fn test_try_get() {
        let grid = Grid::filled(2, 2, true);
        assert_eq!(grid.try_get(Coord::new(1, 1)), Some(true));
        assert_eq!(grid.try_get(Coord::new(2, 0)), None);
    }

    #[test]
    fn test_display_top_row_first() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 1, true);
        assert_eq!(grid.to_string(), "TF\nFF");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let grid = Grid::new(2, 2);
        let _ = grid.get(2, 0);
    }
}
