// Import our tile type
use crate::tile::TileCategory;

// Random utilities for generating the initial terrain
use rand::Rng;

// Serialization support for dumping grids
use serde::{Deserialize, Serialize};

use std::fmt;

/// A candidate map: a fixed-size 2-D array of tile categories
///
/// This is the "chromosome" in our genetic algorithm. Cells are stored in a
/// single row-major `Vec` so that a whole row is one contiguous slice, which
/// keeps crossover (row copies) and scoring (linear scans) cheap.
///
/// **Rust Concept: Exclusive ownership**
/// A `Grid` owns its cells outright. Cloning it produces a completely
/// independent copy, so mutating a child can never touch the parent it was
/// bred from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<TileCategory>,
}

impl Grid {
    /// Create a grid with every cell set to `fill`
    ///
    /// # Panics
    /// Panics if either dimension is zero
    pub fn filled(width: usize, height: usize, fill: TileCategory) -> Self {
        assert!(width > 0 && height > 0, "Grid dimensions must be positive");

        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Generate a raw, not-yet-constrained random grid
    ///
    /// Border cells start as Mountain; every other cell is a uniformly random
    /// category. The result still has to go through the
    /// [`ConstraintEnforcer`](crate::ConstraintEnforcer) before it is a valid map.
    pub fn generate_random<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let mut grid = Self::filled(width, height, TileCategory::Mountain);

        for y in 0..height {
            for x in 0..width {
                if !grid.is_border(x, y) {
                    grid.set(x, y, TileCategory::random(rng));
                }
            }
        }

        grid
    }

    /// Get grid dimensions as `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read the tile at `(x, y)`
    ///
    /// # Panics
    /// Panics if the coordinate is outside the grid
    pub fn get(&self, x: usize, y: usize) -> TileCategory {
        self.cells[self.index(x, y)]
    }

    /// Overwrite the tile at `(x, y)`
    ///
    /// # Panics
    /// Panics if the coordinate is outside the grid
    pub fn set(&mut self, x: usize, y: usize, tile: TileCategory) {
        let idx = self.index(x, y);
        self.cells[idx] = tile;
    }

    /// Whether `(x, y)` lies on the outermost ring of cells
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Borrow one row as a slice
    pub fn row(&self, y: usize) -> &[TileCategory] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Mutably borrow one row as a slice
    pub fn row_mut(&mut self, y: usize) -> &mut [TileCategory] {
        let start = y * self.width;
        &mut self.cells[start..start + self.width]
    }

    /// Iterate over every cell as `(x, y, tile)`, row by row
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileCategory)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &tile)| (i % width, i / width, tile))
    }

    /// Mutably iterate over the raw cells in row-major order
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TileCategory> {
        self.cells.iter_mut()
    }

    /// Count the cells holding `tile`
    pub fn count(&self, tile: TileCategory) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// Replace every `from` cell with `to`
    pub fn replace_all(&mut self, from: TileCategory, to: TileCategory) {
        for cell in self.cells.iter_mut().filter(|c| **c == from) {
            *cell = to;
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

/// ASCII view of the map, one text line per row
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let line: String = self.row(y).iter().map(|t| t.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_grid_has_mountain_border() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let grid = Grid::generate_random(30, 20, &mut rng);

        assert_eq!(grid.dimensions(), (30, 20));
        for (x, y, tile) in grid.iter() {
            if grid.is_border(x, y) {
                assert_eq!(tile, TileCategory::Mountain, "border cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_random_grid_interior_is_mixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let grid = Grid::generate_random(30, 30, &mut rng);

        // 784 interior cells drawn uniformly from 4 categories
        for tile in TileCategory::ALL {
            assert!(grid.count(tile) > 0, "{tile:?} should appear");
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = Grid::generate_random(12, 12, &mut ChaCha8Rng::seed_from_u64(99));
        let b = Grid::generate_random(12, 12, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_get_set_and_rows() {
        let mut grid = Grid::filled(4, 3, TileCategory::Plains);
        grid.set(2, 1, TileCategory::Rock);

        assert_eq!(grid.get(2, 1), TileCategory::Rock);
        assert_eq!(grid.row(1)[2], TileCategory::Rock);
        assert_eq!(grid.count(TileCategory::Rock), 1);

        grid.replace_all(TileCategory::Rock, TileCategory::River);
        assert_eq!(grid.count(TileCategory::Rock), 0);
        assert_eq!(grid.get(2, 1), TileCategory::River);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Grid::filled(5, 5, TileCategory::Plains);
        let mut copy = original.clone();
        copy.set(2, 2, TileCategory::Rock);

        assert_eq!(original.get(2, 2), TileCategory::Plains);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_display_ascii() {
        let mut grid = Grid::filled(3, 2, TileCategory::Mountain);
        grid.set(1, 1, TileCategory::River);

        assert_eq!(grid.to_string(), "^^^\n^~^\n");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let grid = Grid::filled(3, 3, TileCategory::Plains);
        grid.get(3, 0);
    }
}
