//! Headless match runner

use std::path::PathBuf;

use anyhow::{Context, Result};
use botfighters::Tuning;
use botfighters::sim::{Arena, Match, PlayerControl};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "botfighters")]
#[command(about = "Run a headless BotFighters match and report the outcome")]
struct Cli {
    /// Seed for spawns, coins and pilots
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Tick budget (60 ticks per second of game time)
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Tuning overrides as JSON; missing fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Arena layout as JSON; the built-in labyrinth otherwise
    #[arg(long)]
    arena: Option<PathBuf>,
    /// Leave the player craft idle instead of flying the scan agent
    #[arg(long)]
    manual: bool,
    /// Print a JSON snapshot to stdout every N ticks
    #[arg(long)]
    snapshot_every: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let arena = match &cli.arena {
        Some(path) => Arena::load(path)
            .with_context(|| format!("loading arena from {}", path.display()))?,
        None => Arena::labyrinth(),
    };
    let control = if cli.manual {
        PlayerControl::Manual
    } else {
        PlayerControl::Agent
    };

    let mut game = Match::new(cli.seed, tuning, arena, control).context("starting match")?;

    let every = cli.snapshot_every.filter(|&n| n > 0);
    let mut json_error = None;
    let summary = game.run(cli.ticks, |snapshot| {
        let Some(n) = every else {
            return;
        };
        if snapshot.tick % n == 0 && json_error.is_none() {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => json_error = Some(e),
            }
        }
    })?;
    if let Some(e) = json_error {
        return Err(e).context("serializing snapshot");
    }

    log::info!(
        "Match over after {} ticks: player {} / drones {}, player {}, {} craft left",
        summary.ticks,
        summary.score[0],
        summary.score[1],
        if summary.player_alive { "alive" } else { "down" },
        summary.crafts
    );
    println!("{}", serde_json::to_string(&summary).context("serializing summary")?);
    Ok(())
}
