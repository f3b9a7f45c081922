// Import our map types and the scoring function
use crate::constraints::ConstraintEnforcer;
use crate::fitness::FitnessEvaluator;
use crate::grid::Grid;

// Rayon for parallel fitness evaluation
use rayon::prelude::*;

use rand::Rng;
use std::cmp::Reverse;

/// A single individual in the population
///
/// In genetic algorithms, an "individual" is a potential solution.
/// Here, each individual is a candidate map.
///
/// **Rust Concept: Option<T>**
/// Why use `Option<i64>` for fitness?
/// - Newly bred children haven't been evaluated yet
/// - Using Option forces us to handle the "not yet evaluated" case explicitly
#[derive(Clone, Debug)]
pub struct Individual {
    /// The map (genetic representation)
    pub grid: Grid,

    /// Fitness score (higher is better)
    /// `None` means not yet evaluated
    pub fitness: Option<i64>,
}

impl Individual {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            fitness: None,
        }
    }
}

/// One generation of candidate maps
///
/// A population is rebuilt from scratch every generation; only the elites
/// are carried over unchanged.
#[derive(Clone, Debug, Default)]
pub struct Population {
    /// All individuals in the current generation
    pub individuals: Vec<Individual>,

    /// Current generation number (starts at 0)
    pub generation: usize,
}

impl Population {
    /// Create `size` random maps, each passed through the full constraint pipeline
    pub fn random<R: Rng + ?Sized>(
        size: usize,
        width: usize,
        height: usize,
        enforcer: &ConstraintEnforcer,
        rng: &mut R,
    ) -> Self {
        let individuals = (0..size)
            .map(|_| {
                let mut grid = Grid::generate_random(width, height, rng);
                enforcer.enforce(&mut grid, rng);
                Individual::new(grid)
            })
            .collect();

        Self {
            individuals,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Score every individual in parallel
    ///
    /// **Rust Concept: Parallel Mutation**
    /// - `.par_iter_mut()` hands each thread exclusive access to different individuals
    /// - Each score is written back into its own slot, so the result does not
    ///   depend on which thread finished first
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator) {
        self.individuals.par_iter_mut().for_each(|individual| {
            individual.fitness = Some(evaluator.score(&individual.grid));
        });
    }

    /// The highest-scoring evaluated individual
    ///
    /// Ties go to the individual that comes first in population order.
    /// Returns `None` if nothing has been evaluated.
    pub fn best(&self) -> Option<&Individual> {
        let mut best: Option<(&Individual, i64)> = None;

        for individual in &self.individuals {
            if let Some(score) = individual.fitness {
                match best {
                    Some((_, top)) if score <= top => {}
                    _ => best = Some((individual, score)),
                }
            }
        }

        best.map(|(individual, _)| individual)
    }

    /// Mean fitness over the evaluated individuals
    pub fn average_fitness(&self) -> Option<f64> {
        let scores: Vec<i64> = self.individuals.iter().filter_map(|i| i.fitness).collect();
        if scores.is_empty() {
            return None;
        }

        let sum: i64 = scores.iter().sum();
        Some(sum as f64 / scores.len() as f64)
    }

    /// Sort best-first
    ///
    /// The sort is stable, so equal scores keep their population order.
    /// Unevaluated individuals sink to the end.
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by_key(|i| Reverse(i.fitness.unwrap_or(i64::MIN)));
    }
}
