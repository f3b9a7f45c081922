// Library root for the genetic map generator
//
// This file is the entry point for the library crate (genetic_map).
// It declares all the modules that make up our library, leaves first.

// The map representation
pub mod tile;
pub mod grid;
pub mod layout;

// Structure and scoring
pub mod constraints;
pub mod fitness;

// Genetic Algorithm Engine
pub mod reproduction;
pub mod population;
pub mod evolution;

// Configuration, errors and image output
pub mod config;
pub mod error;
pub mod render;

// Re-export commonly used types at the library root for convenience
// This allows users to write:
//   use genetic_map::Grid;
// instead of:
//   use genetic_map::grid::Grid;
pub use config::RunConfig;
pub use constraints::{check_invariants, ConstraintEnforcer, InvariantViolation};
pub use error::{Error, Result};
pub use evolution::{EvolutionEngine, GenerationStats, Phase, RunOutcome};
pub use fitness::{FitnessBreakdown, FitnessEvaluator};
pub use grid::Grid;
pub use layout::MapLayout;
pub use population::{Individual, Population};
pub use render::{MapRenderer, TileSet};
pub use reproduction::{crossover, mutate, mutate_cells};
pub use tile::TileCategory;
