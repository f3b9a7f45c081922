// Import the grid and the shared geometry
use crate::config::RunConfig;
use crate::grid::Grid;
use crate::layout::MapLayout;
use crate::tile::TileCategory;

use rand::Rng;

use std::fmt;

/// Deterministic rule passes that force the structural features onto a grid
///
/// Every grid-producing operation (random generation, mutation) must be
/// followed by one of the two pipelines below:
/// - [`enforce`](Self::enforce) for freshly generated grids
/// - [`reenforce`](Self::reenforce) after mutation, which also repaints rocks
///
/// The passes run in a fixed order so that later ones win: the river and
/// rock clusters override the central plains in their footprint.
#[derive(Clone, Debug)]
pub struct ConstraintEnforcer {
    layout: MapLayout,
    rock_cluster_count: usize,
    cluster_size: (usize, usize),
    seed_margin: usize,
}

impl ConstraintEnforcer {
    /// Enforcer with the default rock settings (8 clusters of 3-5, margin 5)
    pub fn new(layout: MapLayout) -> Self {
        Self {
            layout,
            rock_cluster_count: 8,
            cluster_size: (3, 5),
            seed_margin: 5,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            layout: MapLayout::from_config(config),
            rock_cluster_count: config.rock_cluster_count,
            cluster_size: config.rock_cluster_size_range,
            seed_margin: config.rock_seed_margin,
        }
    }

    /// Override the number of rock clusters painted per pass
    pub fn with_rock_clusters(mut self, count: usize) -> Self {
        self.rock_cluster_count = count;
        self
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    /// Full pipeline for a freshly generated grid: core, river, rocks
    pub fn enforce<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        self.enforce_core(grid);
        self.place_river(grid);
        self.place_rock_clusters(grid, rng);
    }

    /// Full pipeline after mutation
    ///
    /// Same as [`enforce`](Self::enforce) but clears every existing rock first,
    /// so rocks are repainted from scratch instead of piling up over generations.
    pub fn reenforce<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        self.enforce_core(grid);
        self.place_river(grid);
        grid.replace_all(TileCategory::Rock, TileCategory::Plains);
        self.place_rock_clusters(grid, rng);
    }

    /// Force the central circle to Plains, then the border to Mountain
    ///
    /// The border goes last so a circle touching the edge still leaves a
    /// mountain ring.
    pub fn enforce_core(&self, grid: &mut Grid) {
        let (width, height) = grid.dimensions();

        for y in 0..height {
            for x in 0..width {
                if self.layout.in_central_circle(x, y) {
                    grid.set(x, y, TileCategory::Plains);
                }
            }
        }

        for x in 0..width {
            grid.set(x, 0, TileCategory::Mountain);
            grid.set(x, height - 1, TileCategory::Mountain);
        }
        for y in 0..height {
            grid.set(0, y, TileCategory::Mountain);
            grid.set(width - 1, y, TileCategory::Mountain);
        }
    }

    /// Paint the three-row river band in every column
    ///
    /// Only border rows are clipped: the river runs through the first and last
    /// columns, so it enters and leaves the map through the side mountains.
    /// Stray river cells outside the band (left over from random generation or
    /// mutation) are turned back into Plains, so the band is the only water.
    pub fn place_river(&self, grid: &mut Grid) {
        let (width, height) = grid.dimensions();

        for y in 0..height {
            for x in 0..width {
                if grid.get(x, y) == TileCategory::River && !self.layout.in_river_band(x, y) {
                    grid.set(x, y, TileCategory::Plains);
                }
            }
        }

        for x in 0..width {
            for y in self.layout.river_band_interior(x) {
                grid.set(x, y, TileCategory::River);
            }
        }
    }

    /// Scatter small rock clusters over the plains
    ///
    /// Each cluster picks a seed cell that is not Mountain, keeping
    /// `seed_margin` cells away from the edge where the map allows it, then
    /// makes `size` attempts at a random neighbour (the seed itself included).
    /// Only Plains cells turn into Rock, so rivers and mountains are never
    /// overwritten and the final rock count is only approximate.
    pub fn place_rock_clusters<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        let (width, height) = grid.dimensions();
        if width < 3 || height < 3 {
            return;
        }

        let (x_lo, x_hi) = seed_span(width, self.seed_margin);
        let (y_lo, y_hi) = seed_span(height, self.seed_margin);

        // Rock placement never creates or removes mountains, so the seed
        // candidates stay valid for every cluster of this pass
        let seeds: Vec<(usize, usize)> = (y_lo..=y_hi)
            .flat_map(|y| (x_lo..=x_hi).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.get(x, y) != TileCategory::Mountain)
            .collect();

        if seeds.is_empty() {
            return;
        }

        let (min_size, max_size) = self.cluster_size;

        for _ in 0..self.rock_cluster_count {
            let (cx, cy) = seeds[rng.gen_range(0..seeds.len())];
            let size = rng.gen_range(min_size..=max_size);

            for _ in 0..size {
                let nx = cx as i64 + rng.gen_range(-1..=1);
                let ny = cy as i64 + rng.gen_range(-1..=1);

                // interior only
                if nx <= 0 || ny <= 0 || nx >= width as i64 - 1 || ny >= height as i64 - 1 {
                    continue;
                }

                let (nx, ny) = (nx as usize, ny as usize);
                if grid.get(nx, ny) == TileCategory::Plains {
                    grid.set(nx, ny, TileCategory::Rock);
                }
            }
        }
    }
}

/// Inclusive range of seed coordinates along one axis
///
/// `[margin, len - margin]` clipped to the interior; falls back to the whole
/// interior when the margin leaves nothing.
fn seed_span(len: usize, margin: usize) -> (usize, usize) {
    let lo = margin.max(1);
    let hi = len.saturating_sub(margin).min(len - 2);
    if lo > hi {
        (1, len - 2)
    } else {
        (lo, hi)
    }
}

/// A structural rule that a grid breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub x: usize,
    pub y: usize,
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}): {}", self.x, self.y, self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check every structural invariant of an enforced grid
///
/// Returns all violations found, or an empty list when the grid is valid:
/// - every border cell is Mountain, except where the river band crosses the
///   left and right edges
/// - every non-border cell of the central circle is Plains, unless the river
///   or a rock cluster claimed it
/// - every column has at least one River cell in its band
/// - River appears nowhere outside the band
/// - no Rock lies on the border
#[must_use]
pub fn check_invariants(grid: &Grid, layout: &MapLayout) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |x: usize, y: usize, message: String| {
        violations.push(InvariantViolation { x, y, message });
    };

    for (x, y, tile) in grid.iter() {
        let on_border = grid.is_border(x, y);
        let in_band = layout.in_river_band(x, y);

        // The river enters and leaves through the left and right edges
        let river_mouth = tile == TileCategory::River
            && in_band
            && (x == 0 || x == grid.width() - 1)
            && y > 0
            && y < grid.height() - 1;

        if on_border && tile != TileCategory::Mountain && !river_mouth {
            report(x, y, format!("border cell is {tile:?}, expected Mountain"));
        }

        if !on_border && layout.in_central_circle(x, y) {
            let allowed = match tile {
                TileCategory::Plains | TileCategory::Rock => true,
                TileCategory::River => in_band,
                TileCategory::Mountain => false,
            };
            if !allowed {
                report(x, y, format!("central cell is {tile:?}, expected Plains"));
            }
        }

        if tile == TileCategory::River && !in_band {
            report(x, y, "river outside its band".to_string());
        }
    }

    for x in 0..grid.width() {
        let has_river = layout
            .river_band(x)
            .any(|y| grid.get(x, y) == TileCategory::River);
        if !has_river {
            report(
                x,
                layout.river_row(x).max(0) as usize,
                "column has no river in its band".to_string(),
            );
        }
    }

    violations
}
