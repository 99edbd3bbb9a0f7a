//! Ricochet headless driver
//!
//! Builds a small walled arena with a few tanks and crates, fires seeded
//! volleys and runs the fixed-step simulation, then prints a JSON summary.
//!
//! Usage: `ricochet [tuning.json]`. Set `RUST_LOG=debug` for a per-hit trace.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use ricochet::Tuning;
use ricochet::consts::SIM_DT;
use ricochet::sim::{
    Actor, ActorRoster, HitKind, Lifetime, Obstacle, ObstacleField, ProjectileConfig,
    ProjectileManager, TileGrid,
};

const SEED: u64 = 0x5EED_B411;
const TICKS: u32 = 600;
const VOLLEY_INTERVAL: u32 = 30;

const ARENA: &[&str] = &[
    "########################",
    "#......................#",
    "#...##.........##......#",
    "#...##.........##......#",
    "#......................#",
    "#..........##..........#",
    "#..........##..........#",
    "#......................#",
    "#...##.........##......#",
    "#...##.........##......#",
    "#......................#",
    "########################",
];

/// Event tallies for the whole run
#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    ticks: u32,
    shots_fired: u32,
    shots_dropped: u32,
    wall: usize,
    ricochet: usize,
    actor_hits: usize,
    kills: usize,
    obstacle_hits: usize,
    obstacles_destroyed: usize,
    projectile_collisions: usize,
    still_flying: usize,
    actors_alive: usize,
    obstacles_standing: usize,
}

impl Summary {
    fn tally(&mut self, kind: HitKind) {
        match kind {
            HitKind::Wall => self.wall += 1,
            HitKind::Ricochet => self.ricochet += 1,
            HitKind::Actor { killed } => {
                self.actor_hits += 1;
                if killed {
                    self.kills += 1;
                }
            }
            HitKind::Obstacle { destroyed } => {
                self.obstacle_hits += 1;
                if destroyed {
                    self.obstacles_destroyed += 1;
                }
            }
            HitKind::ProjectileVsProjectile => self.projectile_collisions += 1,
        }
    }
}

fn build_actors() -> ActorRoster {
    let mut actors = ActorRoster::new();
    actors.add(Actor::new(1, Vec2::new(-9.0, -3.5), 0.45, 40));
    actors.add(Actor::new(2, Vec2::new(9.0, 3.5), 0.45, 40));
    actors.add(Actor::new(3, Vec2::new(-9.0, 3.5), 0.45, 40));
    actors.add(Actor::new(4, Vec2::new(9.0, -3.5), 0.45, 40));
    actors
}

fn build_obstacles() -> ObstacleField {
    let mut obstacles = ObstacleField::new();
    for x in [-4.5, 4.5] {
        for y in [-1.5, 1.5] {
            obstacles.add(Obstacle::tile(Vec2::new(x, y), 1.0, 15));
        }
    }
    obstacles
}

fn main() {
    env_logger::init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    log::info!("Ricochet headless run starting (seed={:#x})", SEED);

    let grid = TileGrid::from_rows(ARENA, 1.0);
    let mut actors = build_actors();
    let mut obstacles = build_obstacles();
    let mut manager = ProjectileManager::new(tuning);
    let mut rng = Pcg32::seed_from_u64(SEED);

    let shell = ProjectileConfig {
        speed: 11.25,
        max_bounces: 2,
        lifetime: Lifetime::Finite(4.0),
        damage: 5,
    };

    let mut summary = Summary {
        seed: SEED,
        ticks: TICKS,
        ..Default::default()
    };

    for tick in 0..TICKS {
        if tick % VOLLEY_INTERVAL == 0 {
            let shooters: Vec<(u32, Vec2)> = actors
                .iter()
                .filter(|a| !a.is_dead())
                .map(|a| (a.id, a.position))
                .collect();

            for (id, position) in shooters {
                let direction = Vec2::from_angle(rng.random_range(0.0..TAU));
                match manager.spawn(position, direction, &shell, id) {
                    Ok(_) => summary.shots_fired += 1,
                    Err(_) => summary.shots_dropped += 1,
                }
            }
        }

        manager.update(&grid, &mut actors, &mut obstacles, SIM_DT);
        for event in manager.drain_hit_events() {
            summary.tally(event.kind);
        }
    }

    summary.still_flying = manager.active_count();
    summary.actors_alive = actors.alive_count();
    summary.obstacles_standing = obstacles.standing_count();
    log::info!(
        "Run complete: {} shots, {} hits, {} ricochets",
        summary.shots_fired,
        summary.actor_hits,
        summary.ricochet
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}
