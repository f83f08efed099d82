//! Shadowcrawl headless runner
//!
//! Loads an arena, drives the simulation with a simple autopilot standing in
//! for a human, and logs what happens. Useful for smoke-testing tuning files
//! and arenas without a renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use shadowcrawl::consts::SIM_DT;
use shadowcrawl::sim::{ActorKind, GameEvent, Simulation, TickInput, WorldSnapshot};
use shadowcrawl::{Arena, Settings};

const DEMO_ARENA: &str = "\
##########################
#@.......#...............#
#........#.......A.......#
#........#...............#
#.....a..#####....####...#
#..................#.....#
#.....##...........#..A..#
#.....##.......+...#.....#
#..................#.....#
#####......A.............#
#........................#
#...A.........####.....a.#
##########################
";

#[derive(Debug, Parser)]
#[command(name = "shadowcrawl", about = "Run the arena simulation headless")]
struct Cli {
    /// Arena file in the plain-text format (built-in demo arena if omitted)
    #[arg(long)]
    arena: Option<PathBuf>,

    /// JSON tuning overrides
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of 60 Hz frames to run
    #[arg(long, default_value_t = 1800)]
    frames: u32,

    /// Print the final world snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let arena = match &cli.arena {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading arena {}", path.display()))?;
            Arena::from_ascii(&text).with_context(|| format!("parsing arena {}", path.display()))?
        }
        None => Arena::from_ascii(DEMO_ARENA).context("parsing built-in arena")?,
    };
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut sim = Simulation::new(arena, settings, cli.seed);
    log::info!(
        "Shadowcrawl starting: {} wall segments, {} frames",
        sim.walls().len(),
        cli.frames
    );

    for frame in 0..cli.frames {
        let input = autopilot(&sim.snapshot(), frame);
        for event in sim.step_frame(SIM_DT, &input) {
            report(frame, event);
        }
        if !sim.is_active() {
            break;
        }
    }

    let snapshot = sim.snapshot();
    log::info!(
        "Finished at tick {}: health {}/{}, ammo {}, kills {}, visibility {} points",
        snapshot.tick,
        snapshot.player.health,
        snapshot.player.max_health,
        snapshot.player.ammo,
        snapshot.player.kills,
        sim.visibility().len()
    );
    if cli.snapshot {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

/// Walk toward the nearest pickup, shoot at the nearest agent
fn autopilot(snapshot: &WorldSnapshot, frame: u32) -> TickInput {
    let Some(me) = snapshot.entities.first() else {
        return TickInput::default();
    };
    let nearest = |kind: ActorKind| {
        snapshot
            .of_kind(kind)
            .min_by(|a, b| a.pos.distance(me.pos).total_cmp(&b.pos.distance(me.pos)))
            .map(|e| e.pos)
    };

    // Keep the current facing unless there is something to shoot at
    let mut input = TickInput {
        aim: snapshot.reticle(32.0).unwrap_or(me.pos + Vec2::X),
        ..Default::default()
    };
    if let Some(target) = nearest(ActorKind::Pickup) {
        let to = target - me.pos;
        input.left = to.x < -4.0;
        input.right = to.x > 4.0;
        input.up = to.y < -4.0;
        input.down = to.y > 4.0;
        input.interact = to.length() < 32.0;
    }
    if let Some(enemy) = nearest(ActorKind::Agent) {
        input.aim = enemy;
        input.fire = frame % 20 == 0 && enemy.distance(me.pos) < 300.0;
    }
    input.use_medkit = snapshot.player.health < snapshot.player.max_health / 2;
    input.reload = snapshot.player.ammo == 0;
    input
}

fn report(frame: u32, event: GameEvent) {
    match event {
        GameEvent::DamageTaken { amount } => log::warn!("[{frame}] took {amount} damage"),
        GameEvent::EntityKilled { kind } => log::info!("[{frame}] {kind:?} killed"),
        GameEvent::ItemPickedUp { kind } => log::info!("[{frame}] picked up {kind:?}"),
        GameEvent::PlayerDied => log::warn!("[{frame}] player died"),
        GameEvent::ShotFired { .. } => log::debug!("[{frame}] shot fired"),
        other => log::debug!("[{frame}] {other:?}"),
    }
}
