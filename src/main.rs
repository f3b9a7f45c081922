// Import the clap Parser derive macro for CLI argument parsing
use clap::Parser;

// Import our library types
use genetic_map::{EvolutionEngine, MapRenderer, RunConfig, TileSet};

// Import indicatif for progress bars
use indicatif::{ProgressBar, ProgressStyle};

use rand::Rng;
use std::fs;
use std::path::PathBuf;

/// Genetic Map Generator - Evolve tile maps toward a hand-scored layout
///
/// Each run evolves a population of random maps (mountain border, central
/// plains, a winding river and scattered rock clusters) and saves the best
/// one as a PNG assembled from tile images.
#[derive(Parser)]
#[command(name = "genetic-map")]
#[command(about = "Generate game maps using genetic algorithms", long_about = None)]
#[command(version)]
struct Args {
    /// JSON run configuration (any field left out keeps its default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding grass.png, mountain.png, river.png and rock.png
    #[arg(long, default_value = ".")]
    tiles: PathBuf,

    /// Output directory for generated maps
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Number of independent runs (one image each)
    #[arg(short, long)]
    runs: Option<usize>,

    /// Generations per run
    #[arg(short, long)]
    generations: Option<usize>,

    /// Population size (must exceed the elite count of 5)
    #[arg(short, long)]
    population: Option<usize>,

    /// Per-cell mutation probability (0.0-1.0)
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// Map width in tiles
    #[arg(long)]
    width: Option<usize>,

    /// Map height in tiles
    #[arg(long)]
    height: Option<usize>,

    /// Base random seed; run N uses seed + N
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of threads for parallel fitness evaluation
    ///
    /// Limits Rayon's thread pool size. By default, uses all available CPU cores.
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Also print each best map as ASCII
    #[arg(long)]
    ascii: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Load the config file (if any) and apply command-line overrides on top
    fn run_config(&self) -> Result<RunConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(runs) = self.runs {
            config.num_runs = runs;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(rate) = self.mutation_rate {
            config.mutation_rate = rate;
        }
        if let Some(width) = self.width {
            config.map_width = width;
        }
        if let Some(height) = self.height {
            config.map_height = height;
        }
        if self.seed.is_some() {
            config.random_seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Main entry point for the CLI application
fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run every configured search and save one image per run
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
    }

    // Fail fast: bad options or assets are reported before any evolution starts
    let config = args.run_config()?;
    let tiles = TileSet::load_dir(&args.tiles)?;
    fs::create_dir_all(&args.output)?;

    let base_seed = config
        .random_seed
        .unwrap_or_else(|| rand::thread_rng().gen());

    println!("Evolving maps...");
    println!("  Map size: {}x{}", config.map_width, config.map_height);
    println!("  Population size: {}", config.population_size);
    println!("  Generations: {}", config.generations);
    println!("  Mutation rate: {:.1}%", config.mutation_rate * 100.0);
    println!("  Runs: {}", config.num_runs);
    println!("  Seed: {}", base_seed);

    let renderer = MapRenderer;

    for run_index in 0..config.num_runs {
        let run_config = RunConfig {
            random_seed: Some(base_seed.wrapping_add(run_index as u64)),
            ..config.clone()
        };
        let interval = run_config.progress_interval;

        let pb = if args.quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(run_config.generations as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | {msg}")?
                    .progress_chars("=>-"),
            );
            pb
        };

        println!("\nRun {} of {}", run_index + 1, run_config.num_runs);

        let engine = EvolutionEngine::new(run_config)?;
        let outcome = engine.run_with(|stats| {
            if interval > 0 && stats.generation % interval == 0 {
                pb.println(format!(
                    "Generation {} - Best: {}, Avg: {}",
                    stats.generation + 1,
                    stats.best,
                    stats.mean as i64
                ));
            }
            pb.set_message(format!("Best: {}, Avg: {:.1}", stats.best, stats.mean));
            pb.inc(1);
        });
        pb.finish_and_clear();

        let path = args.output.join(format!("generated_map{}.png", run_index));
        renderer.save(&outcome.best, &tiles, &path)?;

        println!(
            "Best map (fitness {}, seed {}) saved to {}",
            outcome.fitness,
            outcome.seed,
            path.display()
        );
        if args.ascii {
            print!("{}", outcome.best);
        }
    }

    Ok(())
}
