// Run configuration: every knob of the search, with defaults matching the
// classic 30x30 map setup.

use crate::error::{Error, Result};
use crate::layout::MapLayout;

// Serialization support so a run can be described in a JSON file
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::Path;

/// Parameters controlling map generation and the evolution process
///
/// These are the "knobs" you can turn. Everything has a sensible default, so a
/// config file only needs to list what it changes.
///
/// **Rust Concept: `#[serde(default)]`**
/// Missing JSON keys are filled from `RunConfig::default()` instead of
/// being a parse error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Map width in tiles
    pub map_width: usize,
    /// Map height in tiles
    pub map_height: usize,
    /// Number of candidate maps per generation
    pub population_size: usize,
    /// Per-cell probability of being replaced during mutation (0.0-1.0)
    pub mutation_rate: f64,
    /// Generations per run (no early stopping)
    pub generations: usize,
    /// Independent runs performed by the CLI
    pub num_runs: usize,
    /// Radius of the forced-plains circle around the center
    pub central_radius: f64,
    /// Radius inside which mountains are penalized by the fitness function
    pub outer_exclusion_radius: f64,
    /// Vertical swing of the sinusoidal river
    pub river_amplitude: f64,
    /// Rock clusters painted by each constraint pass
    pub rock_cluster_count: usize,
    /// Inclusive `(min, max)` placement attempts per cluster
    pub rock_cluster_size_range: (usize, usize),
    /// Inclusive `(low, high)` rock count that earns the bonus
    pub rock_count_target_band: (usize, usize),
    /// Rock count the out-of-band penalty is measured from
    pub rock_count_target: usize,
    /// Distance from the map edge that cluster seeds keep
    pub rock_seed_margin: usize,
    /// Top individuals copied unchanged into the next generation
    pub elite_count: usize,
    /// Parents are drawn from this many of the best individuals
    pub parent_pool_size: usize,
    /// Seed for the run's random generator; `None` draws one from the OS
    pub random_seed: Option<u64>,
    /// Progress report interval in generations (CLI only)
    pub progress_interval: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            map_width: 30,
            map_height: 30,
            population_size: 50,
            mutation_rate: 0.03,
            generations: 200,
            num_runs: 10,
            central_radius: 8.0,
            outer_exclusion_radius: 13.0,
            river_amplitude: 3.0,
            rock_cluster_count: 8,
            rock_cluster_size_range: (3, 5),
            rock_count_target_band: (20, 40),
            rock_count_target: 22,
            rock_seed_margin: 5,
            elite_count: 5,
            parent_pool_size: 15,
            random_seed: None,
            progress_interval: 10,
        }
    }
}

impl RunConfig {
    /// Load a config from a JSON file
    ///
    /// The result is not validated yet; call [`RunConfig::validate`] once any
    /// command-line overrides have been applied.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reject configurations that would make the search undefined
    ///
    /// Checked once, before any population is built. Nothing inside the
    /// generation loop can fail after this passes.
    pub fn validate(&self) -> Result<()> {
        if self.map_width < 3 || self.map_height < 3 {
            return Err(invalid(format!(
                "map must be at least 3x3 to have an interior, got {}x{}",
                self.map_width, self.map_height
            )));
        }

        if self.population_size < self.elite_count + 1 {
            return Err(invalid(format!(
                "population size {} must exceed the elite count {}",
                self.population_size, self.elite_count
            )));
        }

        if self.parent_pool_size == 0 {
            return Err(invalid("parent pool size must be at least 1".into()));
        }

        if !self.mutation_rate.is_finite() || !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid(format!(
                "mutation rate {} must be within [0, 1]",
                self.mutation_rate
            )));
        }

        let half_side = self.map_width.min(self.map_height) as f64 / 2.0;
        if !self.central_radius.is_finite() || self.central_radius < 0.0 {
            return Err(invalid(format!(
                "central radius {} must be a non-negative number",
                self.central_radius
            )));
        }
        if self.central_radius >= half_side {
            return Err(invalid(format!(
                "central radius {} must be smaller than half the shorter side ({half_side})",
                self.central_radius
            )));
        }

        if !self.outer_exclusion_radius.is_finite() || self.outer_exclusion_radius < 0.0 {
            return Err(invalid(format!(
                "outer exclusion radius {} must be a non-negative number",
                self.outer_exclusion_radius
            )));
        }

        if !self.river_amplitude.is_finite() {
            return Err(invalid("river amplitude must be finite".into()));
        }

        let layout = MapLayout::from_config(self);
        if let Some(x) = (0..self.map_width).find(|&x| layout.river_band_interior(x).next().is_none()) {
            return Err(invalid(format!(
                "river amplitude {} pushes the river off the map at column {x}",
                self.river_amplitude
            )));
        }

        let (min_size, max_size) = self.rock_cluster_size_range;
        if min_size == 0 || min_size > max_size {
            return Err(invalid(format!(
                "rock cluster size range ({min_size}, {max_size}) must satisfy 1 <= min <= max"
            )));
        }

        let (low, high) = self.rock_count_target_band;
        if low > high {
            return Err(invalid(format!(
                "rock count target band ({low}, {high}) is empty"
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> Error {
    Error::InvalidConfiguration(reason)
}
