//! Block Siege headless driver
//!
//! Generates a world, drops bombs on it and lets an auto-aiming turret
//! defend, alternating tick and render exactly as an interactive frontend
//! would. Draw calls go to a recording sink.
//!
//! Usage: `block-siege [seed] [frames] [settings.json]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use block_siege::consts::{CELL_SIZE, FRAME_RATE};
use block_siege::renderer::DrawList;
use block_siege::sim::{Bomb, Entity, EntityId, Turret};
use block_siege::{ConfigError, Settings, World};

const DEFAULT_FRAMES: u32 = 30 * FRAME_RATE;
/// Seconds between bomb drops
const BOMB_INTERVAL: f32 = 1.5;

struct Args {
    seed: u64,
    frames: u32,
    settings: Option<String>,
}

fn parse_args() -> Args {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    Args {
        seed,
        frames,
        settings: args.next(),
    }
}

/// Point the turret at the lowest bomb, firing when one is in view
fn defend(world: &mut World, turret: EntityId) {
    let Some(origin) = world.lookup(turret).map(|e| e.rect().center()) else {
        return;
    };
    let target = world
        .entities()
        .filter(|e| e.is_bomb())
        .map(|e| e.rect().center())
        .max_by(|a, b| a.y.total_cmp(&b.y));
    let Some(target) = target else {
        return;
    };

    let delta = target - origin;
    let aim = delta.x.atan2(-delta.y).to_degrees();
    if let Some(turret) = world.lookup_mut(turret).and_then(Entity::as_turret_mut) {
        turret.set_aim_angle(aim);
    }
    world.fire_turret(turret);
}

fn run(args: Args) -> Result<(), ConfigError> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut world = World::try_new(settings)?;
    world.generate_new_world(args.seed);

    let width = world.width() as f32 * CELL_SIZE;
    let turret = world.spawn(Turret::spawn_at(Vec2::new(width * 0.5, 0.0)));

    let mut drops = Pcg32::seed_from_u64(args.seed ^ 0xb0b);
    let mut until_drop = 0.0;
    let mut list = DrawList::new();
    let mut draw_calls = 0usize;

    for _ in 0..args.frames {
        until_drop -= world.frame_time();
        if until_drop <= 0.0 {
            let x = drops.random_range(0.0..width);
            world.spawn(Bomb::spawn(Vec2::new(x, -20.0), turret));
            until_drop += BOMB_INTERVAL;
        }

        defend(&mut world, turret);
        world.tick();

        list.clear();
        world.render(&mut list);
        draw_calls += list.len();
    }

    let (score, missed) = world
        .lookup(turret)
        .and_then(Entity::as_turret)
        .map_or((0, 0), |t| (t.score(), t.bombs_missed()));
    log::info!(
        "Ran {} frames: score {}, bombs missed {}, {} blocks left, {} entities, {} draw calls",
        args.frames,
        score,
        missed,
        world.block_count(),
        world.entity_count(),
        draw_calls
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Block Siege (headless) starting...");

    if let Err(err) = run(parse_args()) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
