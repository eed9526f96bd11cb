//! KSAO Sim - Entry Point
//!
//! Interactive terminal front end: reads commands from stdin, advances the
//! simulation, and prints the requested view after each command.

use ksao_sim::core::config::SimulationConfig;
use ksao_sim::core::error::Result;
use ksao_sim::core::types::LeadershipMode;
use ksao_sim::simulation::engine::SimulationEngine;
use ksao_sim::ui::render::{render_introduction, render_log, render_status, render_tab};
use ksao_sim::ui::state::{Tab, ViewState};

use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ksao_sim=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::var("KSAO_SIM_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading config from {}", path);
            SimulationConfig::load(&path)?
        }
        Err(_) => SimulationConfig::default(),
    };

    let mut engine = match seed_from_env(std::env::var("KSAO_SIM_SEED").ok().as_deref()) {
        Some(seed) => SimulationEngine::with_seed(config, seed)?,
        None => SimulationEngine::new(config)?,
    };
    tracing::info!("KSAO Sim starting (seed {})", engine.seed());

    let mut view = ViewState::new();

    println!("\n=== TEAM KSAO LEADERSHIP SIMULATION ===");
    println!();
    println!("{}", render_introduction(engine.get_state()));
    println!();

    loop {
        println!("{}", render_status(engine.get_state()));

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next();

        match command {
            "quit" | "q" => break,
            "step" | "s" => {
                let before = engine.get_state().log.len();
                engine.step();
                print_new_log_lines(&engine, before);
            }
            "run" => match argument.and_then(|a| a.parse::<u32>().ok()) {
                Some(n) => {
                    let played = engine.run(n);
                    println!("Ran {} turn(s). Now at turn {}.", played, engine.get_state().turn);
                    if engine.is_finished() {
                        println!("All subtasks are complete.");
                    }
                }
                None => println!("Usage: run <number>"),
            },
            "reset" => match argument.map(str::parse::<LeadershipMode>) {
                None => {
                    engine.initialize(None);
                    println!("Simulation reset in {} leadership mode.", engine.mode());
                }
                Some(Ok(mode)) => {
                    engine.initialize(Some(mode));
                    println!("Simulation reset in {} leadership mode.", mode);
                }
                Some(Err(e)) => println!("{}", e),
            },
            "mode" => match argument.map(str::parse::<LeadershipMode>) {
                Some(Ok(mode)) => {
                    engine.set_leadership_mode(mode);
                    println!("Leadership mode is now {}.", mode);
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("Current mode: {}. Usage: mode <shared|traditional>", engine.mode()),
            },
            "status" => {
                let state = engine.get_state();
                println!(
                    "Mode {} | turn {} | entropy {:.3} (max reference {:.3}) | finished: {}",
                    state.mode,
                    state.turn,
                    state.entropy,
                    engine.max_entropy_reference(),
                    engine.is_finished()
                );
            }
            word => match Tab::parse(word) {
                Some(tab) => {
                    if tab == Tab::Log {
                        if let Some(n) = argument.and_then(|a| a.parse::<usize>().ok()) {
                            view.set_log_tail(n);
                        }
                    }
                    view.open(tab);
                    println!(
                        "{}",
                        render_tab(tab, engine.get_state(), &view, engine.max_entropy_reference())
                    );
                }
                None => println!("Unknown command '{}'. Type 'help' for commands.", word),
            },
        }
    }

    let state = engine.get_state();
    println!(
        "\nGoodbye! Final state: {} turns, {} of {} subtasks completed.",
        state.turn,
        state.completed_subtasks.len(),
        state.subtasks.len()
    );
    Ok(())
}

/// Seed from the `KSAO_SIM_SEED` value, warning when it is not a `u64`
fn seed_from_env(value: Option<&str>) -> Option<u64> {
    let raw = value?.trim();
    match raw.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            tracing::warn!(
                "Ignoring KSAO_SIM_SEED={:?}: not an unsigned integer, using a random seed",
                raw
            );
            None
        }
    }
}

/// Print log lines appended since `before`
fn print_new_log_lines(engine: &SimulationEngine, before: usize) {
    let state = engine.get_state();
    let fresh = state.log.len().saturating_sub(before);
    println!("{}", render_log(state, fresh));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_from_env() {
        assert_eq!(seed_from_env(None), None);
        assert_eq!(seed_from_env(Some("42")), Some(42));
        assert_eq!(seed_from_env(Some(" 7 ")), Some(7));
        assert_eq!(seed_from_env(Some("forty-two")), None);
        assert_eq!(seed_from_env(Some("-1")), None);
    }
}
