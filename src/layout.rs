// Map geometry shared by the constraint pass and the fitness function.
//
// Both sides must agree on where the central plains, the mountain exclusion
// zone and the river band are, so the shapes live here once.

use crate::config::RunConfig;
use std::f64::consts::PI;

/// Geometry of the target layout for one map size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapLayout {
    pub width: usize,
    pub height: usize,
    /// Center of both circles, `(width / 2, height / 2)` by default
    pub center: (usize, usize),
    /// Cells within this distance of the center are forced to Plains
    pub central_radius: f64,
    /// Mountains within this distance of the center are penalized
    pub exclusion_radius: f64,
    /// Vertical swing of the river curve
    pub river_amplitude: f64,
}

impl MapLayout {
    /// Layout centered on the grid with the default radii (8 and 13) and amplitude 3
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            center: (width / 2, height / 2),
            central_radius: 8.0,
            exclusion_radius: 13.0,
            river_amplitude: 3.0,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            central_radius: config.central_radius,
            exclusion_radius: config.outer_exclusion_radius,
            river_amplitude: config.river_amplitude,
            ..Self::new(config.map_width, config.map_height)
        }
    }

    /// Whether `(x, y)` lies within `radius` of the center (boundary inclusive)
    pub fn within(&self, x: usize, y: usize, radius: f64) -> bool {
        let dx = x as f64 - self.center.0 as f64;
        let dy = y as f64 - self.center.1 as f64;
        dx * dx + dy * dy <= radius * radius
    }

    pub fn in_central_circle(&self, x: usize, y: usize) -> bool {
        self.within(x, y, self.central_radius)
    }

    pub fn in_exclusion_circle(&self, x: usize, y: usize) -> bool {
        self.within(x, y, self.exclusion_radius)
    }

    /// Row the river is centered on at column `x`
    ///
    /// `floor(center_y + amplitude * sin(2π·x / width))`: one full sine period
    /// across the map width. May fall outside the grid for extreme amplitudes,
    /// hence the signed return type.
    pub fn river_row(&self, x: usize) -> i64 {
        let phase = 2.0 * PI * x as f64 / self.width as f64;
        (self.center.1 as f64 + self.river_amplitude * phase.sin()).floor() as i64
    }

    /// The three-row band around the river row at column `x`, restricted to rows inside the grid
    pub fn river_band(&self, x: usize) -> impl Iterator<Item = usize> {
        let row = self.river_row(x);
        let height = self.height as i64;
        (row - 1..=row + 1)
            .filter(move |&y| (0..height).contains(&y))
            .map(|y| y as usize)
    }

    /// The river band at column `x`, restricted to interior rows (border rows excluded)
    pub fn river_band_interior(&self, x: usize) -> impl Iterator<Item = usize> {
        let last = self.height.saturating_sub(1);
        self.river_band(x).filter(move |&y| y > 0 && y < last)
    }

    /// Whether `(x, y)` is one of the band cells for its column
    pub fn in_river_band(&self, x: usize, y: usize) -> bool {
        self.river_band(x).any(|row| row == y)
    }
}
