//! Headless Simulation Runner
//!
//! Runs one simulation to completion (or a turn cap) and prints a run report.

use clap::Parser;
use ksao_sim::core::config::SimulationConfig;
use ksao_sim::core::types::LeadershipMode;
use ksao_sim::simulation::engine::SimulationEngine;
use ksao_sim::simulation::output::{ReportFormat, RunReport};
use tracing_subscriber::EnvFilter;

/// Headless KSAO simulation runner
#[derive(Parser, Debug)]
#[command(name = "batch_sim")]
#[command(about = "Run a team KSAO simulation without the interactive front end")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Start in shared leadership mode instead of the configured one
    #[arg(long)]
    shared: bool,

    /// Maximum turns before giving up
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    format: ReportFormat,

    /// Log every turn to stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "ksao_sim=debug" } else { "ksao_sim=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => match SimulationConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    if args.print_config {
        match config.to_toml_string() {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut engine = match SimulationEngine::with_seed(config, seed) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if args.shared {
        engine.initialize(Some(LeadershipMode::Shared));
    }

    let played = engine.run(args.max_turns);
    if !engine.is_finished() {
        tracing::warn!("Stopped after {} turns with subtasks still open", played);
    } else {
        // Records the closing log line
        engine.step();
    }

    let report = RunReport::new(engine.get_state(), Some(seed));
    match report.render(args.format) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to render report: {}", e);
            std::process::exit(1);
        }
    }
}
