//! Headless Arena Duel simulation
//!
//! Runs a duel without rendering and prints a summary every simulated
//! second. Mostly useful to watch two AI fighters (`ai_vs_ai`) go at it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use arena_simulation::logger::{self, LogLevel};
use arena_simulation::{
    create_arena_app, ArenaMode, ArenaPosition, CombatAi, Health, MatchPhase, Side,
    SimulationConfig,
};
use bevy::prelude::*;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "arena_simulation")]
#[command(about = "Headless arena duel driven by combat AI", long_about = None)]
#[command(version)]
struct Arguments {
    /// TOML config file (defaults are used for missing keys)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of fixed ticks to simulate
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the arena mode (ai_vs_ai, player_vs_bot, player_vs_player)
    #[arg(short, long)]
    mode: Option<ArenaMode>,

    /// Log every AI transition and hit
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let arguments = Arguments::parse();

    let mut config = match &arguments.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = arguments.seed {
        config.seed = seed;
    }
    if let Some(ticks) = arguments.ticks {
        config.ticks = ticks;
    }
    if let Some(mode) = arguments.mode {
        config.mode = mode;
    }

    logger::init_logger();
    logger::set_log_level(if arguments.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });
    logger::log_info(&format!(
        "Starting arena simulation (seed: {}, mode: {:?}, {} ticks at {} Hz)",
        config.seed, config.mode, config.ticks, config.tick_hz
    ));

    let mut app = create_arena_app(&config);
    // First update only primes the clock
    app.update();

    let report_every = config.tick_hz.round().max(1.0) as u64;
    let mut simulated = 0;
    for tick in 1..=config.ticks {
        app.update();
        simulated = tick;

        if tick % report_every == 0 {
            report(&mut app, tick);
        }
        if *app.world().resource::<MatchPhase>() == MatchPhase::GameOver {
            logger::log_info(&format!("Match over after {} ticks", tick));
            break;
        }
    }

    report(&mut app, simulated);
    logger::log_info("Simulation complete!");
    Ok(())
}

fn report(app: &mut App, tick: u64) {
    let phase = *app.world().resource::<MatchPhase>();
    let mut query = app
        .world_mut()
        .query::<(Entity, &Side, &ArenaPosition, &Health, Option<&CombatAi>)>();
    let mut lines: Vec<String> = query
        .iter(app.world())
        .map(|(entity, side, position, health, ai)| {
            let driver = match ai {
                Some(ai) if side.is_ai() => format!("{:?}", ai.0.state()),
                _ => "human".to_string(),
            };
            format!(
                "{:?} {:?}: x={:.2} hp={:.0}% {}",
                entity,
                side,
                position.0.x,
                health.percent(),
                driver
            )
        })
        .collect();
    lines.sort();
    logger::log_info(&format!("Tick {} [{:?}] {}", tick, phase, lines.join(" | ")));
}
