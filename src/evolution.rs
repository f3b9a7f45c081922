// Import types we need
use crate::config::RunConfig;
use crate::constraints::ConstraintEnforcer;
use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::grid::Grid;
use crate::population::{Individual, Population};
use crate::reproduction::{crossover, mutate};

// Seedable random generator: the same seed replays the same run bit for bit
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Where the engine is in its generation cycle
///
/// ```text
/// Initializing -> Evaluating -> Selecting -> Reproducing -+-> Evaluating ...
///                                                          |
///                                                          +-> Terminated
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Evaluating,
    Selecting,
    Reproducing,
    Terminated,
}

/// Fitness statistics for one evaluated generation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationStats {
    /// Generation number (0-based)
    pub generation: usize,
    pub best: i64,
    pub mean: f64,
    pub worst: i64,
}

/// Result of a complete run
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// The highest-scoring map of the final population
    pub best: Grid,
    /// Its fitness
    pub fitness: i64,
    /// Statistics for every generation, in order
    pub history: Vec<GenerationStats>,
    /// Seed the run was started from
    pub seed: u64,
}

/// Orchestrates the population lifecycle for one run
///
/// The engine owns the only random generator of the run and threads it
/// explicitly through generation, cluster placement, parent selection and
/// mutation. Nothing reads process-wide random state.
pub struct EvolutionEngine {
    config: RunConfig,
    enforcer: ConstraintEnforcer,
    evaluator: FitnessEvaluator,
    rng: ChaCha8Rng,
    seed: u64,
    population: Population,
    phase: Phase,
}

impl EvolutionEngine {
    /// Validate the configuration and set up an engine in the `Initializing` phase
    ///
    /// Without a configured seed, one is drawn from the OS and can be read back
    /// with [`seed`](Self::seed) to replay the run.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` before anything is built if the config is unusable.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(|| rand::thread_rng().gen());

        Ok(Self {
            enforcer: ConstraintEnforcer::from_config(&config),
            evaluator: FitnessEvaluator::from_config(&config),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            population: Population::default(),
            phase: Phase::Initializing,
            config,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Build the initial population (generation + full constraint pass)
    pub fn initialize(&mut self) {
        self.population = Population::random(
            self.config.population_size,
            self.config.map_width,
            self.config.map_height,
            &self.enforcer,
            &mut self.rng,
        );
        self.phase = Phase::Evaluating;
    }

    /// Score the current population and summarize it
    pub fn evaluate(&mut self) -> GenerationStats {
        self.population.evaluate(&self.evaluator);

        let scores = self.population.individuals.iter().filter_map(|i| i.fitness);
        let (best, worst) = scores.fold((i64::MIN, i64::MAX), |(best, worst), s| {
            (best.max(s), worst.min(s))
        });

        if self.phase != Phase::Terminated {
            self.phase = Phase::Selecting;
        }

        GenerationStats {
            generation: self.population.generation,
            best,
            mean: self.population.average_fitness().unwrap_or(0.0),
            worst,
        }
    }

    /// Rank the population best-first (stable for equal scores)
    fn select(&mut self) {
        self.population.sort_by_fitness();
        self.phase = Phase::Reproducing;
    }

    /// Build the next generation from the ranked population
    ///
    /// The top `elite_count` maps are carried over untouched. Every other slot
    /// gets one child: two parents are drawn uniformly *with replacement* from
    /// the top `parent_pool_size` (so a map may be crossed with itself), then
    /// crossed over and mutated.
    fn reproduce(&mut self) {
        let size = self.config.population_size;
        let ranked = &self.population.individuals;
        let elites = self.config.elite_count.min(ranked.len());
        let pool = self.config.parent_pool_size.min(ranked.len());

        let mut next: Vec<Individual> = Vec::with_capacity(size);
        next.extend(ranked.iter().take(elites).cloned());

        while next.len() < size {
            let parent_a = &ranked[self.rng.gen_range(0..pool)].grid;
            let parent_b = &ranked[self.rng.gen_range(0..pool)].grid;

            // crossover hands back a fresh grid, so mutating it never reaches a parent
            let mut child = crossover(parent_a, parent_b);
            mutate(&mut child, self.config.mutation_rate, &self.enforcer, &mut self.rng);
            next.push(Individual::new(child));
        }

        self.population.individuals = next;
        self.population.generation += 1;
        self.phase = if self.population.generation >= self.config.generations {
            Phase::Terminated
        } else {
            Phase::Evaluating
        };
    }

    /// Run one full generation: evaluate, select, reproduce
    ///
    /// Initializes the population first if needed. Returns the statistics of
    /// the generation that was evaluated, or `None` once the engine has terminated.
    pub fn step(&mut self) -> Option<GenerationStats> {
        if self.phase == Phase::Initializing {
            self.initialize();
            if self.config.generations == 0 {
                self.phase = Phase::Terminated;
            }
        }

        if self.phase == Phase::Terminated {
            return None;
        }

        let stats = self.evaluate();
        self.select();
        self.reproduce();
        Some(stats)
    }

    /// Run every generation, then return the best map of the final population
    ///
    /// `on_generation` is called once per generation with that generation's
    /// statistics; the CLI uses it for progress output.
    pub fn run_with<F>(mut self, mut on_generation: F) -> RunOutcome
    where
        F: FnMut(&GenerationStats),
    {
        let mut history = Vec::with_capacity(self.config.generations);

        while let Some(stats) = self.step() {
            on_generation(&stats);
            history.push(stats);
        }

        // Terminated: one last evaluation of the final population
        self.evaluate();
        let (best, fitness) = match self.population.best() {
            Some(Individual {
                grid,
                fitness: Some(score),
            }) => (grid.clone(), *score),
            // validate() guarantees a non-empty population
            _ => unreachable!("final population is never empty"),
        };

        RunOutcome {
            best,
            fitness,
            history,
            seed: self.seed,
        }
    }

    /// Run every generation without progress reporting
    pub fn run(self) -> RunOutcome {
        self.run_with(|_| {})
    }
}
