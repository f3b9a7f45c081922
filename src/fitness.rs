// Import the grid and the shared geometry
use crate::config::RunConfig;
use crate::grid::Grid;
use crate::layout::MapLayout;
use crate::tile::TileCategory;

/// Reward for a Plains cell inside the central circle (and penalty otherwise)
const CENTRAL_MATCH: i64 = 1;
/// Penalty for a mountain inside the exclusion circle
const MOUNTAIN_TOO_CLOSE: i64 = -10;
/// Reward for a mountain outside the exclusion circle
const MOUNTAIN_FAR: i64 = 5;
/// Reward for a column whose band holds river
const RIVER_PRESENT: i64 = 50;
/// Penalty for a column whose band has no river
const RIVER_MISSING: i64 = -500;
/// Reward for a rock count inside the target band
const ROCK_IN_BAND: i64 = 50;

/// The four independent terms of a map's fitness
///
/// Useful for reporting *why* a map scores the way it does; the total is the
/// [`FitnessScore`](FitnessEvaluator::score) used for selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitnessBreakdown {
    /// +1 per Plains cell in the central circle, -1 per other cell there
    pub central: i64,
    /// -10 per mountain inside the exclusion circle, +5 per mountain outside it
    pub mountains: i64,
    /// +50 per column with river in its band, -500 per column without
    pub river: i64,
    /// +50 when the rock count is in the target band, else minus its distance from the target
    pub rocks: i64,
}

impl FitnessBreakdown {
    pub fn total(&self) -> i64 {
        self.central + self.mountains + self.river + self.rocks
    }
}

/// Scores a map against the layout objectives (higher is better)
///
/// **Rust Concept: Pure functions**
/// `score` takes `&self` and `&Grid` - shared borrows only. It cannot change
/// the grid or the evaluator, so calling it twice always gives the same answer
/// and many threads can call it at once.
#[derive(Clone, Debug)]
pub struct FitnessEvaluator {
    layout: MapLayout,
    rock_band: (usize, usize),
    rock_target: usize,
}

impl FitnessEvaluator {
    /// Evaluator with the default rock targets (band 20-40, anchor 22)
    pub fn new(layout: MapLayout) -> Self {
        Self {
            layout,
            rock_band: (20, 40),
            rock_target: 22,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            layout: MapLayout::from_config(config),
            rock_band: config.rock_count_target_band,
            rock_target: config.rock_count_target,
        }
    }

    /// Total fitness of a grid
    pub fn score(&self, grid: &Grid) -> i64 {
        self.breakdown(grid).total()
    }

    /// Fitness of a grid, term by term
    pub fn breakdown(&self, grid: &Grid) -> FitnessBreakdown {
        FitnessBreakdown {
            central: self.central_term(grid),
            mountains: self.mountain_term(grid),
            river: self.river_term(grid),
            rocks: self.rock_term(grid),
        }
    }

    fn central_term(&self, grid: &Grid) -> i64 {
        grid.iter()
            .filter(|&(x, y, _)| self.layout.in_central_circle(x, y))
            .map(|(_, _, tile)| {
                if tile == TileCategory::Plains {
                    CENTRAL_MATCH
                } else {
                    -CENTRAL_MATCH
                }
            })
            .sum()
    }

    fn mountain_term(&self, grid: &Grid) -> i64 {
        grid.iter()
            .filter(|&(_, _, tile)| tile == TileCategory::Mountain)
            .map(|(x, y, _)| {
                if self.layout.in_exclusion_circle(x, y) {
                    MOUNTAIN_TOO_CLOSE
                } else {
                    MOUNTAIN_FAR
                }
            })
            .sum()
    }

    fn river_term(&self, grid: &Grid) -> i64 {
        (0..grid.width())
            .map(|x| {
                let found = self
                    .layout
                    .river_band(x)
                    .any(|y| grid.get(x, y) == TileCategory::River);
                if found {
                    RIVER_PRESENT
                } else {
                    RIVER_MISSING
                }
            })
            .sum()
    }

    fn rock_term(&self, grid: &Grid) -> i64 {
        let rock_count = grid.count(TileCategory::Rock);
        let (low, high) = self.rock_band;

        if (low..=high).contains(&rock_count) {
            ROCK_IN_BAND
        } else {
            -(rock_count.abs_diff(self.rock_target) as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintEnforcer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn layout() -> MapLayout {
        MapLayout::new(30, 30)
    }

    #[test]
    fn test_all_plains_map() {
        let evaluator = FitnessEvaluator::new(layout());
        let grid = Grid::filled(30, 30, TileCategory::Plains);

        let b = evaluator.breakdown(&grid);

        // π·8² ≈ 197 cells; exact lattice count for radius 8 is 197
        assert_eq!(b.central, 197);
        assert_eq!(b.mountains, 0);
        assert_eq!(b.river, 30 * RIVER_MISSING);
        assert_eq!(b.rocks, -22);
        assert_eq!(evaluator.score(&grid), b.total());
    }

    #[test]
    fn test_all_mountain_map() {
        let evaluator = FitnessEvaluator::new(layout());
        let grid = Grid::filled(30, 30, TileCategory::Mountain);

        let b = evaluator.breakdown(&grid);

        let close = (0..30)
            .flat_map(|y| (0..30).map(move |x| (x, y)))
            .filter(|&(x, y)| layout().in_exclusion_circle(x, y))
            .count() as i64;

        assert_eq!(b.central, -197);
        assert_eq!(b.mountains, close * -10 + (900 - close) * 5);
    }

    #[test]
    fn test_river_term_counts_columns() {
        let evaluator = FitnessEvaluator::new(layout());
        let mut grid = Grid::filled(30, 30, TileCategory::Plains);
        let l = layout();

        // River only in the first ten columns
        for x in 0..10 {
            let y = l.river_row(x) as usize;
            grid.set(x, y, TileCategory::River);
        }

        assert_eq!(evaluator.breakdown(&grid).river, 10 * 50 + 20 * -500);
    }

    #[test]
    fn test_rock_term_band_and_penalty() {
        let evaluator = FitnessEvaluator::new(layout());

        let with_rocks = |n: usize| {
            let mut grid = Grid::filled(30, 30, TileCategory::Plains);
            for i in 0..n {
                grid.set(1 + i % 28, 1 + i / 28, TileCategory::Rock);
            }
            evaluator.breakdown(&grid).rocks
        };

        assert_eq!(with_rocks(0), -22);
        assert_eq!(with_rocks(19), -3);
        assert_eq!(with_rocks(20), 50);
        assert_eq!(with_rocks(40), 50);
        assert_eq!(with_rocks(41), -19);
    }

    #[test]
    fn test_score_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let enforcer = ConstraintEnforcer::new(layout());
        let evaluator = FitnessEvaluator::new(layout());

        let mut grid = Grid::generate_random(30, 30, &mut rng);
        enforcer.enforce(&mut grid, &mut rng);

        let first = evaluator.score(&grid);
        let second = evaluator.score(&grid);
        assert_eq!(first, second);
    }

    #[test]
    fn test_enforced_map_has_full_river_bonus() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let enforcer = ConstraintEnforcer::new(layout());
        let evaluator = FitnessEvaluator::new(layout());

        let mut grid = Grid::generate_random(30, 30, &mut rng);
        enforcer.enforce(&mut grid, &mut rng);

        assert_eq!(evaluator.breakdown(&grid).river, 30 * 50);
    }

    #[test]
    fn test_custom_rock_targets() {
        let config = RunConfig {
            rock_count_target_band: (0, 0),
            rock_count_target: 5,
            ..RunConfig::default()
        };
        let evaluator = FitnessEvaluator::from_config(&config);
        let grid = Grid::filled(30, 30, TileCategory::Plains);

        assert_eq!(evaluator.breakdown(&grid).rocks, 50);
    }
}
