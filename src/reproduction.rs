// Genetic operators: how new maps are derived from their parents.

use crate::constraints::ConstraintEnforcer;
use crate::grid::Grid;
use crate::tile::TileCategory;

use rand::Rng;

/// Breed two maps with a single fixed-point crossover
///
/// Rows above the vertical midpoint (`height / 2`) come from `parent_a`, rows
/// at and below it from `parent_b`. The split row is never randomized.
///
/// **Rust Concept: Borrowing vs Ownership**
/// - Takes `&Grid` (borrowed references), not `Grid`
/// - The parents are only read, so they stay usable for the next child
/// - The child is a brand new value that owns its own cells
///
/// # Panics
/// Panics if the parents have different dimensions
pub fn crossover(parent_a: &Grid, parent_b: &Grid) -> Grid {
    assert_eq!(
        parent_a.dimensions(),
        parent_b.dimensions(),
        "Parents must have same dimensions"
    );

    let mut child = parent_b.clone();
    let mid = parent_a.height() / 2;

    for y in 0..mid {
        child.row_mut(y).copy_from_slice(parent_a.row(y));
    }

    child
}

/// Independently replace each cell with probability `rate`
///
/// This is the raw noise sweep. It leaves the grid structurally invalid;
/// [`mutate`] follows it with the constraint pass.
pub fn mutate_cells<R: Rng + ?Sized>(grid: &mut Grid, rate: f64, rng: &mut R) {
    for cell in grid.cells_mut() {
        if rng.gen_bool(rate) {
            *cell = TileCategory::random(rng);
        }
    }
}

/// Mutate a map in place, then restore its structure
///
/// After the noise sweep the full re-enforcement pipeline runs (core, river,
/// rock reset and repaint), so the returned grid is always valid no matter
/// what state it arrived in. Returns the same grid for chaining.
pub fn mutate<'a, R: Rng + ?Sized>(
    grid: &'a mut Grid,
    rate: f64,
    enforcer: &ConstraintEnforcer,
    rng: &mut R,
) -> &'a mut Grid {
    mutate_cells(grid, rate, rng);
    enforcer.reenforce(grid, rng);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::check_invariants;
    use crate::layout::MapLayout;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_crossover_takes_top_from_a_and_bottom_from_b() {
        let a = Grid::filled(6, 7, TileCategory::Plains);
        let b = Grid::filled(6, 7, TileCategory::Rock);

        let child = crossover(&a, &b);

        // mid = 7 / 2 = 3
        for y in 0..3 {
            assert!(child.row(y).iter().all(|&t| t == TileCategory::Plains), "row {y}");
        }
        for y in 3..7 {
            assert!(child.row(y).iter().all(|&t| t == TileCategory::Rock), "row {y}");
        }
    }

    #[test]
    fn test_crossover_does_not_touch_parents() {
        let a = Grid::filled(4, 4, TileCategory::Plains);
        let b = Grid::filled(4, 4, TileCategory::Mountain);

        let mut child = crossover(&a, &b);
        child.set(0, 0, TileCategory::River);
        child.set(3, 3, TileCategory::River);

        assert_eq!(a, Grid::filled(4, 4, TileCategory::Plains));
        assert_eq!(b, Grid::filled(4, 4, TileCategory::Mountain));
    }

    #[test]
    fn test_self_crossover_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let a = Grid::generate_random(10, 10, &mut rng);
        assert_eq!(crossover(&a, &a), a);
    }

    #[test]
    #[should_panic(expected = "Parents must have same dimensions")]
    fn test_crossover_dimension_mismatch() {
        let a = Grid::filled(4, 4, TileCategory::Plains);
        let b = Grid::filled(5, 4, TileCategory::Plains);
        crossover(&a, &b);
    }

    #[test]
    fn test_zero_rate_changes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let original = Grid::generate_random(10, 10, &mut rng);
        let mut grid = original.clone();

        mutate_cells(&mut grid, 0.0, &mut rng);

        assert_eq!(grid, original);
    }

    #[test]
    fn test_full_rate_rerolls_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut grid = Grid::filled(20, 20, TileCategory::Plains);

        mutate_cells(&mut grid, 1.0, &mut rng);

        // Each cell re-drawn uniformly: roughly three quarters change
        let changed = 400 - grid.count(TileCategory::Plains);
        assert!(changed > 200, "only {changed} cells changed");
    }

    #[test]
    fn test_mutate_restores_structure() {
        let layout = MapLayout::new(30, 30);
        let enforcer = ConstraintEnforcer::new(layout);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut grid = Grid::generate_random(30, 30, &mut rng);

        mutate(&mut grid, 0.5, &enforcer, &mut rng);

        let violations = check_invariants(&grid, &layout);
        assert!(violations.is_empty(), "{violations:?}");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Crossover rows come from the right parent for any pair of maps.
        #[test]
        fn prop_crossover_row_provenance(seed in any::<u64>(), width in 3usize..20, height in 3usize..20) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let a = Grid::generate_random(width, height, &mut rng);
            let b = Grid::generate_random(width, height, &mut rng);

            let child = crossover(&a, &b);
            let mid = height / 2;

            for y in 0..height {
                let expected = if y < mid { a.row(y) } else { b.row(y) };
                prop_assert_eq!(child.row(y), expected);
            }
        }

        /// Mutation always yields a valid map, whatever it started from.
        #[test]
        fn prop_mutate_yields_valid_grid(seed in any::<u64>(), rate in 0.0f64..=1.0) {
            let layout = MapLayout::new(30, 30);
            let enforcer = ConstraintEnforcer::new(layout);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            // Start from raw noise, not an enforced map
            let mut grid = Grid::filled(30, 30, TileCategory::River);
            mutate_cells(&mut grid, 0.7, &mut rng);

            mutate(&mut grid, rate, &enforcer, &mut rng);

            let violations = check_invariants(&grid, &layout);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
    }
}
