use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod error;
mod export;
mod grid;
mod heightmap;
mod methods;
mod settings;
mod stats;

#[derive(Parser, Debug)]
#[command(name = "heightmapper")]
#[command(about = "Generate height maps from layered procedural noise")]
struct Args {
    /// Path to the generator configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory the generated images are written to
    #[arg(short, long, default_value = "img")]
    output_dir: String,

    /// Path of the timing statistics CSV
    #[arg(long, default_value = "statistics.csv")]
    stats: String,

    /// Override the iteration count from the configuration file
    #[arg(short, long)]
    iterations: Option<usize>,
}

fn main() {
    let args = Args::parse();

    println!("Loading configuration from {}...", args.config);
    let config = match settings::load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let iterations = args.iterations.unwrap_or(config.iterations).max(1);

    println!("Generating {} map(s) with seed: {}", iterations, seed);
    println!("Map size: {0}x{0}", config.map_size);
    println!("Configured layers: {}", config.layers.len());

    if let Err(e) = fs::create_dir_all(&args.output_dir) {
        eprintln!("Failed to create output directory {}: {}", args.output_dir, e);
        std::process::exit(1);
    }

    let mut timings = stats::RunStatistics::new();

    for iter in 0..iterations {
        let run = settings::randomized_run_settings(&config, &mut rng);
        let active = run.layers.iter().filter(|layer| layer.active).count();
        println!("Iteration {}: {} active layer(s)", iter + 1, active);

        let start = Instant::now();
        let map = match heightmap::generate(&run) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("Generation failed: {}", e);
                std::process::exit(1);
            }
        };
        timings.record(start.elapsed());

        let path = Path::new(&args.output_dir).join(format!("height_map_{}.png", iter));
        let path = path.to_string_lossy();
        match export::export_heightmap(&map, &path) {
            Ok(()) => println!("  Saved {}", path),
            Err(e) => eprintln!("Failed to export height map: {}", e),
        }
    }

    if let Some(summary) = timings.summary() {
        println!(
            "Timing: max {:.3} ms, mean {:.3} ms, min {:.3} ms, std dev {:.3} ms",
            summary.max_ms, summary.mean_ms, summary.min_ms, summary.std_dev_ms
        );
    }
    match timings.write_csv(&args.stats) {
        Ok(()) => println!("Wrote timing statistics to {}", args.stats),
        Err(e) => eprintln!("Failed to write timing statistics: {}", e),
    }
}
