use anyhow::{Context, Result};
use log::info;
use slime_field::engine::{GameLoop, FIXED_TIMESTEP_DURATION};
use slime_field::{ArenaConfig, SlimeArena, SpawnEvent};
use std::time::Duration;

/// Simulated time when none is given on the command line
const DEFAULT_RUN_SECS: u64 = 60;

/// Length of one presented frame, not a multiple of the fixed step
const DEFAULT_FRAME_MS: u64 = 25;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Usage: slime-field [config.json] [seconds] [frame_ms]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ArenaConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => ArenaConfig::default(),
    };
    let run_for = match args.next() {
        Some(secs) => Duration::from_secs(secs.parse().context("seconds must be a whole number")?),
        None => Duration::from_secs(DEFAULT_RUN_SECS),
    };
    let frame_time = match args.next() {
        Some(ms) => Duration::from_millis(ms.parse().context("frame_ms must be a whole number")?),
        None => Duration::from_millis(DEFAULT_FRAME_MS),
    };
    anyhow::ensure!(!frame_time.is_zero(), "frame_ms must be positive");

    info!("Starting Slime Field for {:?} of simulated time", run_for);

    let mut game_loop = GameLoop::new();
    let mut arena = SlimeArena::new(config);

    while game_loop.simulated_time() < run_for {
        for _ in 0..game_loop.begin_frame(frame_time) {
            for event in arena.step(FIXED_TIMESTEP_DURATION) {
                match event {
                    SpawnEvent::Died { id, type_name } => info!("{} #{} died", type_name, id),
                    SpawnEvent::SpawnFailed { error, .. } => info!("Spawn failed: {}", error),
                    _ => {}
                }
            }
        }
    }

    for creature in arena.manager().entities() {
        let status = creature.status();
        info!(
            "{} #{}: {}/{} HP ({})",
            creature.type_name, creature.id, status.hp, status.max_hp, status.condition
        );
    }

    let alive = arena.manager().alive_count();
    arena.shutdown();
    info!(
        "Done after {} frames ({} updates): {} alive, {} spawned, {} died",
        game_loop.frame_count(),
        game_loop.update_count(),
        alive,
        arena.spawned(),
        arena.deaths()
    );

    Ok(())
}
