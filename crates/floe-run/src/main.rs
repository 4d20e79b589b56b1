//! Replays a move script against a level and prints the final board.
//!
//! Usage:
//!   floe-run levels/first.txt --script "RRD.L"
//!   RUST_LOG=debug floe-run levels/first.json --config sim.json
//!
//! Script characters: `U`, `D`, `L`, `R` tap a direction and wait for the
//! board to come to rest; `.` runs a single idle tick; `+` presses the grab
//! key and `-` releases it. Whitespace is ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use floe_engine::{render_board, Direction, InputEvent, LevelDesc, SimConfig, SimEvent, Simulation};
use log::info;

/// Upper bound on idle ticks spent waiting for a move to finish.
const SETTLE_TICKS: u32 = 600;

#[derive(Parser)]
#[command(name = "floe-run")]
#[command(about = "Replay an input script against a floe level")]
struct Args {
    /// Level file (plain text, or JSON when it ends in .json)
    level: PathBuf,
    /// Moves to replay, e.g. "RRD.L"
    #[arg(short, long, default_value = "")]
    script: String,
    /// JSON simulation config; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Tap(Direction),
    Idle,
    Grab(bool),
}

fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| match c.to_ascii_uppercase() {
            'U' => Ok(Step::Tap(Direction::UP)),
            'D' => Ok(Step::Tap(Direction::DOWN)),
            'L' => Ok(Step::Tap(Direction::LEFT)),
            'R' => Ok(Step::Tap(Direction::RIGHT)),
            '.' => Ok(Step::Idle),
            '+' => Ok(Step::Grab(true)),
            '-' => Ok(Step::Grab(false)),
            _ => Err(anyhow!("unexpected script character {c:?} at position {}", i + 1)),
        })
        .collect()
}

fn load_level(path: &Path) -> Result<LevelDesc> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let desc = if path.extension().is_some_and(|ext| ext == "json") {
        LevelDesc::from_json(&text)
    } else {
        LevelDesc::parse(&text)
    };
    desc.with_context(|| format!("loading level {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    SimConfig::from_json(&text).with_context(|| format!("loading config {}", path.display()))
}

fn replay(sim: &mut Simulation, steps: &[Step]) -> Result<()> {
    let dt = sim.config().fixed_dt;
    for step in steps {
        match *step {
            Step::Tap(dir) => {
                let key_code = sim
                    .config()
                    .bindings
                    .primary_code(dir)
                    .ok_or_else(|| anyhow!("no key bound to {dir:?}"))?;
                sim.push_input(InputEvent::KeyDown { key_code });
                sim.frame(dt);
                sim.push_input(InputEvent::KeyUp { key_code });
                sim.settle(SETTLE_TICKS);
            }
            Step::Idle => sim.tick(Direction::NONE),
            Step::Grab(held) => {
                let key_code = *sim
                    .config()
                    .bindings
                    .grab
                    .first()
                    .ok_or_else(|| anyhow!("no key bound to grab"))?;
                sim.push_input(if held {
                    InputEvent::KeyDown { key_code }
                } else {
                    InputEvent::KeyUp { key_code }
                });
                // Zero-length frame: folds the key into the pad without ticking.
                sim.frame(0.0);
            }
        }
        if sim.is_solved() {
            break;
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let desc = load_level(&args.level)?;
    let config = load_config(args.config.as_deref())?;
    let steps = parse_script(&args.script)?;

    let mut sim = Simulation::from_level(&desc, config)?;
    replay(&mut sim, &steps)?;

    let events = sim.drain_events();
    let count = |pred: fn(&SimEvent) -> bool| events.iter().filter(|e| pred(e)).count();
    info!(
        "{} ticks, {} blocked pushes, {} rejected moves, {} goals reached",
        sim.ticks(),
        count(|e| matches!(e, SimEvent::PushBlocked { .. })),
        count(|e| matches!(e, SimEvent::MoveRejected { .. })),
        count(|e| matches!(e, SimEvent::GoalReached { .. })),
    );

    println!("{}", render_board(sim.world()));
    println!("{}", if sim.is_solved() { "solved" } else { "unsolved" });
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
