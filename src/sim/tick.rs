//! Fixed timestep projectile update
//!
//! Each tick every live projectile runs a time-sliced loop: it tries to cover
//! its whole step, and each wall reflection consumes part of the step and
//! restarts the loop from the reflection point. Within a sub-step the order of
//! checks is fixed: actors, then other projectiles, then walls and obstacles.
//! Projectiles are processed in slot order, so identical inputs give identical
//! results.

use glam::Vec2;

use super::actor::{ActorId, ActorQuery};
use super::collision::{Circle, circle_circle, reflect_velocity};
use super::events::{HitEvent, HitKind, HitLog};
use super::raycast::{MapQuery, ObstacleHit, ObstacleQuery, RayHit};
use super::state::{Projectile, ProjectileConfig, ProjectilePool, SlotIndex};
use crate::consts::{MAX_BOUNCES_PER_TICK, MOVE_EPSILON, TIME_EPSILON};
use crate::error::SpawnError;
use crate::tuning::Tuning;

/// Nearest surface along a movement segment
enum Surface {
    Wall(RayHit),
    Obstacle(ObstacleHit),
}

/// Closer of the two hits; ties go to the wall
fn nearest_surface(wall: Option<RayHit>, obstacle: Option<ObstacleHit>) -> Option<Surface> {
    match (wall, obstacle) {
        (Some(w), Some(o)) if o.hit.distance < w.distance => Some(Surface::Obstacle(o)),
        (Some(w), _) => Some(Surface::Wall(w)),
        (None, Some(o)) => Some(Surface::Obstacle(o)),
        (None, None) => None,
    }
}

/// Owns the projectile pool and the per-tick hit log
#[derive(Debug, Clone)]
pub struct ProjectileManager {
    pool: ProjectilePool,
    hits: HitLog,
    tuning: Tuning,
}

impl Default for ProjectileManager {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl ProjectileManager {
    pub fn new(tuning: Tuning) -> Self {
        log::info!(
            "Projectile manager created (slots={}, hit log={})",
            tuning.pool_capacity,
            tuning.hit_log_capacity
        );
        Self {
            pool: ProjectilePool::with_capacity(tuning.pool_capacity),
            hits: HitLog::with_capacity(tuning.hit_log_capacity),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    /// Mutable pool access for systems that destroy projectiles outside the
    /// resolver (mines, shields)
    pub fn pool_mut(&mut self) -> &mut ProjectilePool {
        &mut self.pool
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn count_by_owner(&self, owner_id: ActorId) -> usize {
        self.pool.count_by_owner(owner_id)
    }

    /// Fire a projectile; a full pool drops the shot
    pub fn spawn(
        &mut self,
        position: Vec2,
        direction: Vec2,
        config: &ProjectileConfig,
        owner_id: ActorId,
    ) -> Result<SlotIndex, SpawnError> {
        match self.pool.spawn(position, direction, config, owner_id) {
            Ok(slot) => {
                log::debug!(
                    "Projectile {} spawned at ({:.2}, {:.2}) owner={}",
                    slot,
                    position.x,
                    position.y,
                    owner_id
                );
                Ok(slot)
            }
            Err(e) => {
                log::warn!("Shot from owner {} dropped: {}", owner_id, e);
                Err(e)
            }
        }
    }

    /// Events recorded by the last update
    pub fn hit_events(&self) -> &[HitEvent] {
        self.hits.events()
    }

    /// Take the events recorded by the last update
    ///
    /// Must be called before the next update, which clears the log.
    pub fn drain_hit_events(&mut self) -> std::vec::Drain<'_, HitEvent> {
        self.hits.drain()
    }

    /// Session end: free every slot and forget pending events
    pub fn clear(&mut self) {
        self.pool.clear();
        self.hits.clear();
    }

    /// Advance every live projectile by one fixed timestep
    pub fn update<M, A, O>(&mut self, map: &M, actors: &mut A, obstacles: &mut O, dt: f32)
    where
        M: MapQuery + ?Sized,
        A: ActorQuery + ?Sized,
        O: ObstacleQuery + ?Sized,
    {
        self.hits.clear();

        for slot in 0..self.pool.capacity() {
            let Some(mut projectile) = self.pool.get(slot).copied() else {
                continue;
            };

            projectile.age += dt;
            if projectile.lifetime.tick(dt) {
                log::debug!("Projectile {} expired", slot);
                self.pool.release(slot);
                continue;
            }

            if self.resolve(slot, &mut projectile, map, actors, obstacles, dt) {
                self.pool.store(slot, projectile);
            } else {
                self.pool.release(slot);
            }
        }

        if self.hits.dropped() > 0 {
            log::warn!(
                "Hit log full: dropped {} events this tick",
                self.hits.dropped()
            );
        }
    }

    /// Run one projectile's swept motion for the tick; false if it was destroyed
    fn resolve<M, A, O>(
        &mut self,
        slot: SlotIndex,
        projectile: &mut Projectile,
        map: &M,
        actors: &mut A,
        obstacles: &mut O,
        dt: f32,
    ) -> bool
    where
        M: MapQuery + ?Sized,
        A: ActorQuery + ?Sized,
        O: ObstacleQuery + ?Sized,
    {
        let radius = self.tuning.projectile_radius;
        let mut remaining = dt;
        let mut bounces_this_tick = 0;

        while remaining > TIME_EPSILON {
            let target = projectile.position + projectile.velocity * remaining;

            // Actors: the owner is immune until the grace period ends
            let exclude = (projectile.age < self.tuning.self_hit_grace_period)
                .then_some(projectile.owner_id);
            if let Some(actor) = actors.check_collision(target, radius, exclude) {
                let killed = actors.apply_damage(actor, projectile.damage);
                log::info!(
                    "Projectile {} hit actor {} (damage={}, killed={})",
                    slot,
                    actor,
                    projectile.damage,
                    killed
                );
                self.hits.record(HitKind::Actor { killed }, target);
                return false;
            }

            // Other projectiles: each pair is tested once, from its lower slot
            if let Some(other) = self.find_projectile_collision(slot, target, radius) {
                let other_position = self.pool.get(other).map_or(target, |p| p.position);
                let midpoint = (target + other_position) * 0.5;
                self.pool.release(other);
                log::debug!("Projectiles {} and {} collided", slot, other);
                self.hits.record(HitKind::ProjectileVsProjectile, midpoint);
                return false;
            }

            // Walls and obstacles along the movement segment
            let motion = target - projectile.position;
            let motion_len = motion.length();
            let surface = if motion_len > MOVE_EPSILON {
                nearest_surface(
                    map.raycast(projectile.position, target),
                    obstacles.raycast(projectile.position, target),
                )
            } else {
                None
            };

            match surface {
                Some(Surface::Obstacle(hit)) => {
                    let destroyed = obstacles.damage_obstacle(hit.obstacle, projectile.damage);
                    log::info!(
                        "Projectile {} hit obstacle {} (destroyed={})",
                        slot,
                        hit.obstacle,
                        destroyed
                    );
                    self.hits.record(HitKind::Obstacle { destroyed }, hit.hit.point);
                    return false;
                }
                Some(Surface::Wall(hit)) => {
                    if projectile.bounces_remaining == 0
                        || bounces_this_tick >= MAX_BOUNCES_PER_TICK
                    {
                        log::debug!(
                            "Projectile {} destroyed on wall ({} bounces left)",
                            slot,
                            projectile.bounces_remaining
                        );
                        self.hits.record(HitKind::Wall, hit.point);
                        return false;
                    }

                    projectile.bounces_remaining -= 1;
                    bounces_this_tick += 1;
                    projectile.position = hit.point + hit.normal * self.tuning.push_epsilon;
                    projectile.velocity = reflect_velocity(projectile.velocity, hit.normal)
                        .normalize_or_zero()
                        * projectile.speed;
                    remaining *= (1.0 - hit.distance / motion_len).max(0.0);
                    self.hits.record(HitKind::Ricochet, hit.point);
                    log::debug!(
                        "Projectile {} bounced, {} bounces left",
                        slot,
                        projectile.bounces_remaining
                    );

                    if !map.in_bounds(projectile.position) {
                        return false;
                    }
                }
                None => {
                    if !map.in_bounds(target) {
                        log::debug!("Projectile {} left the world", slot);
                        return false;
                    }
                    projectile.position = target;
                    remaining = 0.0;
                }
            }
        }

        true
    }

    /// First live projectile after `slot` within two radii of `position`
    fn find_projectile_collision(
        &self,
        slot: SlotIndex,
        position: Vec2,
        radius: f32,
    ) -> Option<SlotIndex> {
        let probe = Circle::new(position, radius);
        (slot + 1..self.pool.capacity()).find(|&other| {
            self.pool
                .get(other)
                .is_some_and(|p| circle_circle(probe, Circle::new(p.position, radius)).is_some())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::actor::{Actor, ActorRoster};
    use crate::sim::grid::TileGrid;
    use crate::sim::obstacle::{Obstacle, ObstacleField};
    use crate::sim::state::Lifetime;
    use proptest::prelude::*;

    /// 20x20 unit tiles with a solid row whose lower face sits at y = 5
    fn wall_ahead() -> TileGrid {
        let mut grid = TileGrid::new(20, 20, 1.0);
        for x in 0..20 {
            grid.set_solid(x, 15, true);
        }
        grid
    }

    /// Open world with two horizontal walls at `y = 0` and `y = gap`
    struct ParallelWalls {
        gap: f32,
    }

    impl MapQuery for ParallelWalls {
        fn raycast(&self, start: Vec2, end: Vec2) -> Option<RayHit> {
            let delta = end - start;
            let length = delta.length();
            let (plane, normal) = if delta.y > 0.0 {
                (self.gap, Vec2::NEG_Y)
            } else if delta.y < 0.0 {
                (0.0, Vec2::Y)
            } else {
                return None;
            };
            let t = (plane - start.y) / delta.y;
            if !(0.0..=1.0).contains(&t) {
                return None;
            }
            Some(RayHit {
                point: start + delta * t,
                normal,
                distance: t * length,
            })
        }

        fn in_bounds(&self, position: Vec2) -> bool {
            position.x.abs() < 1000.0 && position.y >= -0.5 && position.y <= self.gap + 0.5
        }
    }

    fn config(speed: f32, max_bounces: u32) -> ProjectileConfig {
        ProjectileConfig {
            speed,
            max_bounces,
            lifetime: Lifetime::Infinite,
            damage: 5,
        }
    }

    #[test]
    fn test_straight_flight() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut mgr = ProjectileManager::default();
        let slot = mgr.spawn(Vec2::ZERO, Vec2::X, &config(6.0, 1), 1).unwrap();

        mgr.update(&grid, &mut (), &mut (), 0.5);

        let p = mgr.pool().get(slot).unwrap();
        assert!((p.position - Vec2::new(3.0, 0.0)).length() < 1e-5);
        assert_eq!(p.age, 0.5);
        assert!(mgr.hit_events().is_empty());
    }

    #[test]
    fn test_wall_reflection_reverses_velocity() {
        let grid = wall_ahead();
        let mut mgr = ProjectileManager::default();
        let slot = mgr.spawn(Vec2::ZERO, Vec2::Y, &config(10.0, 1), 1).unwrap();

        mgr.update(&grid, &mut (), &mut (), 0.6);

        let p = mgr.pool().get(slot).expect("projectile survives one bounce");
        assert_eq!(p.velocity, Vec2::new(0.0, -10.0));
        assert_eq!(p.bounces_remaining, 0);
        // Bounced at y = 5 with 0.1s of the step left
        assert!((p.position.y - 3.99).abs() < 1e-4);

        let events: Vec<_> = mgr.drain_hit_events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Ricochet);
        assert!((events[0].position - Vec2::new(0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_no_bounces_left_destroys_on_wall() {
        let grid = wall_ahead();
        let mut mgr = ProjectileManager::default();
        let slot = mgr.spawn(Vec2::ZERO, Vec2::Y, &config(10.0, 0), 1).unwrap();

        mgr.update(&grid, &mut (), &mut (), 0.6);

        assert!(mgr.pool().get(slot).is_none());
        assert_eq!(mgr.active_count(), 0);
        assert_eq!(mgr.hit_events().len(), 1);
        assert_eq!(mgr.hit_events()[0].kind, HitKind::Wall);
        assert!((mgr.hit_events()[0].position - Vec2::new(0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_bounce_ceiling_per_tick() {
        let walls = ParallelWalls { gap: 0.5 };
        let mut mgr = ProjectileManager::default();
        let slot = mgr
            .spawn(Vec2::new(0.0, 0.25), Vec2::Y, &config(100.0, 50), 1)
            .unwrap();

        // 10 units of travel between walls half a unit apart
        mgr.update(&walls, &mut (), &mut (), 0.1);

        assert!(mgr.pool().get(slot).is_none());
        assert_eq!(mgr.hits.count(HitKind::Ricochet), MAX_BOUNCES_PER_TICK as usize);
        assert_eq!(mgr.hits.count(HitKind::Wall), 1);
    }

    #[test]
    fn test_bounce_ceiling_ignores_tuning_document() {
        let tuning = Tuning::from_json(r#"{ "max_bounces_per_tick": 50 }"#).unwrap();
        let walls = ParallelWalls { gap: 0.5 };
        let mut mgr = ProjectileManager::new(tuning);
        mgr.spawn(Vec2::new(0.0, 0.25), Vec2::Y, &config(100.0, 50), 1)
            .unwrap();

        mgr.update(&walls, &mut (), &mut (), 0.1);

        assert_eq!(mgr.active_count(), 0);
        assert_eq!(mgr.hits.count(HitKind::Ricochet), MAX_BOUNCES_PER_TICK as usize);
        assert_eq!(mgr.hits.count(HitKind::Wall), 1);
    }

    #[test]
    fn test_multiple_bounces_within_budget() {
        let walls = ParallelWalls { gap: 1.0 };
        let mut mgr = ProjectileManager::default();
        let slot = mgr
            .spawn(Vec2::new(0.0, 0.5), Vec2::Y, &config(10.0, 5), 1)
            .unwrap();

        // 2 units of travel: bounce at the top, bottom, then coast
        mgr.update(&walls, &mut (), &mut (), 0.2);

        let p = mgr.pool().get(slot).expect("budget not exhausted");
        assert_eq!(p.bounces_remaining, 3);
        assert_eq!(mgr.hits.count(HitKind::Ricochet), 2);
        assert!((p.velocity.length() - p.speed).abs() < 1e-4);
        assert!(p.velocity.y > 0.0);
    }

    #[test]
    fn test_projectiles_collide_at_midpoint() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut mgr = ProjectileManager::default();
        let a = mgr.spawn(Vec2::new(-0.5, 0.0), Vec2::X, &config(30.0, 1), 1).unwrap();
        let b = mgr.spawn(Vec2::new(0.2, 0.0), Vec2::NEG_X, &config(30.0, 1), 2).unwrap();

        // A's step ends at the origin, within two radii of B
        mgr.update(&grid, &mut (), &mut (), 1.0 / 60.0);

        assert!(mgr.pool().get(a).is_none());
        assert!(mgr.pool().get(b).is_none());
        assert_eq!(mgr.active_count(), 0);

        let events: Vec<_> = mgr.drain_hit_events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::ProjectileVsProjectile);
        assert!((events[0].position - Vec2::new(0.1, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_actor_hit_applies_damage() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut actors = ActorRoster::new();
        actors.add(Actor::new(7, Vec2::new(2.0, 0.0), 0.5, 5));

        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::ZERO, Vec2::X, &config(12.0, 1), 1).unwrap();

        for _ in 0..10 {
            mgr.update(&grid, &mut actors, &mut (), SIM_DT);
            if mgr.active_count() == 0 {
                break;
            }
        }

        assert_eq!(mgr.active_count(), 0);
        assert!(actors.get(7).unwrap().is_dead());
        assert_eq!(mgr.hit_events().len(), 1);
        assert_eq!(mgr.hit_events()[0].kind, HitKind::Actor { killed: true });
    }

    #[test]
    fn test_owner_immune_during_grace_period() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut actors = ActorRoster::new();
        actors.add(Actor::new(1, Vec2::ZERO, 0.5, 10));

        let mut mgr = ProjectileManager::default();
        // Fired from inside its owner, moving slowly
        let slot = mgr.spawn(Vec2::ZERO, Vec2::X, &config(0.1, 1), 1).unwrap();

        for _ in 0..29 {
            mgr.update(&grid, &mut actors, &mut (), SIM_DT);
        }
        assert!(mgr.pool().get(slot).is_some());
        assert_eq!(actors.get(1).unwrap().health, 10);

        // Grace period over: the owner can now be hit
        let mut events = Vec::new();
        for _ in 0..2 {
            mgr.update(&grid, &mut actors, &mut (), SIM_DT);
            events.extend(mgr.drain_hit_events());
        }
        assert!(mgr.pool().get(slot).is_none());
        assert_eq!(actors.get(1).unwrap().health, 5);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Actor { killed: false });
    }

    #[test]
    fn test_actor_checked_before_wall() {
        let grid = wall_ahead();
        let mut actors = ActorRoster::new();
        // Actor overlapping the end of a step that also crosses the wall
        actors.add(Actor::new(3, Vec2::new(0.0, 5.5), 1.0, 10));

        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::ZERO, Vec2::Y, &config(10.0, 1), 1).unwrap();
        mgr.update(&grid, &mut actors, &mut (), 0.6);

        assert_eq!(mgr.hit_events().len(), 1);
        assert_eq!(mgr.hit_events()[0].kind, HitKind::Actor { killed: false });
    }

    #[test]
    fn test_actor_checked_before_projectile_pair() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut actors = ActorRoster::new();
        actors.add(Actor::new(3, Vec2::new(0.5, -0.5), 0.45, 10));

        let mut mgr = ProjectileManager::default();
        let a = mgr.spawn(Vec2::ZERO, Vec2::X, &config(30.0, 1), 1).unwrap();
        // Slow drifter clear of the actor but within two radii of A's step
        let b = mgr.spawn(Vec2::new(0.5, 0.25), Vec2::Y, &config(0.01, 1), 2).unwrap();

        mgr.update(&grid, &mut actors, &mut (), 1.0 / 60.0);

        // A's step ends at (0.5, 0): touching the actor and 0.25 from B
        assert!(mgr.pool().get(a).is_none());
        assert!(mgr.pool().get(b).is_some());
        assert_eq!(mgr.active_count(), 1);
        assert_eq!(actors.get(3).unwrap().health, 5);

        let events: Vec<_> = mgr.drain_hit_events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Actor { killed: false });
        assert!((events[0].position - Vec2::new(0.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_projectile_pair_checked_before_wall() {
        let grid = wall_ahead();
        let mut mgr = ProjectileManager::default();
        let a = mgr.spawn(Vec2::new(0.0, 4.0), Vec2::Y, &config(10.0, 1), 1).unwrap();
        // Resting past the wall face, within two radii of A's target
        let b = mgr.spawn(Vec2::new(0.0, 5.9), Vec2::X, &config(0.01, 1), 2).unwrap();

        // A's segment 4.0 -> 6.0 crosses the wall face at y = 5
        mgr.update(&grid, &mut (), &mut (), 0.2);

        assert!(mgr.pool().get(a).is_none());
        assert!(mgr.pool().get(b).is_none());
        assert_eq!(mgr.hits.count(HitKind::ProjectileVsProjectile), 1);
        assert_eq!(mgr.hits.count(HitKind::Wall), 0);
        assert_eq!(mgr.hits.count(HitKind::Ricochet), 0);
        assert_eq!(mgr.hit_events().len(), 1);
    }

    #[test]
    fn test_obstacle_absorbs_projectile() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut obstacles = ObstacleField::new();
        let id = obstacles.add(Obstacle::tile(Vec2::new(2.0, 0.0), 1.0, 5));

        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::ZERO, Vec2::X, &config(10.0, 3), 1).unwrap();
        mgr.update(&grid, &mut (), &mut obstacles, 0.5);

        assert_eq!(mgr.active_count(), 0);
        assert!(obstacles.get(id).unwrap().is_destroyed());
        assert_eq!(mgr.hit_events().len(), 1);
        let event = mgr.hit_events()[0];
        assert_eq!(event.kind, HitKind::Obstacle { destroyed: true });
        assert!((event.position - Vec2::new(1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_wall_closer_than_obstacle_wins() {
        let grid = wall_ahead();
        let mut obstacles = ObstacleField::new();
        obstacles.add(Obstacle::tile(Vec2::new(0.0, 6.5), 1.0, 5));

        let mut mgr = ProjectileManager::default();
        let slot = mgr.spawn(Vec2::ZERO, Vec2::Y, &config(10.0, 1), 1).unwrap();
        mgr.update(&grid, &mut (), &mut obstacles, 0.8);

        assert!(mgr.pool().get(slot).is_some());
        assert_eq!(obstacles.standing_count(), 1);
        assert_eq!(mgr.hit_events()[0].kind, HitKind::Ricochet);
    }

    #[test]
    fn test_leaving_world_is_silent() {
        struct OpenField;
        impl MapQuery for OpenField {
            fn raycast(&self, _start: Vec2, _end: Vec2) -> Option<RayHit> {
                None
            }
            fn in_bounds(&self, position: Vec2) -> bool {
                position.length() < 1.0
            }
        }

        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::ZERO, Vec2::X, &config(10.0, 1), 1).unwrap();
        mgr.update(&OpenField, &mut (), &mut (), 0.5);

        assert_eq!(mgr.active_count(), 0);
        assert!(mgr.hit_events().is_empty());
    }

    #[test]
    fn test_lifetime_expiry_is_silent() {
        let grid = TileGrid::new(20, 20, 1.0);
        let mut mgr = ProjectileManager::default();
        let cfg = ProjectileConfig {
            lifetime: Lifetime::Finite(0.5),
            ..config(1.0, 1)
        };
        let slot = mgr.spawn(Vec2::ZERO, Vec2::X, &cfg, 1).unwrap();

        mgr.update(&grid, &mut (), &mut (), 0.25);
        assert!(mgr.pool().get(slot).is_some());
        mgr.update(&grid, &mut (), &mut (), 0.25);
        assert!(mgr.pool().get(slot).is_none());
        assert!(mgr.hit_events().is_empty());
    }

    #[test]
    fn test_spawn_on_full_pool() {
        let mut mgr = ProjectileManager::new(Tuning {
            pool_capacity: 2,
            ..Default::default()
        });
        let cfg = ProjectileConfig::default();
        mgr.spawn(Vec2::ZERO, Vec2::X, &cfg, 1).unwrap();
        mgr.spawn(Vec2::ZERO, Vec2::X, &cfg, 1).unwrap();

        assert_eq!(
            mgr.spawn(Vec2::ZERO, Vec2::X, &cfg, 1),
            Err(SpawnError::Full { capacity: 2 })
        );
        assert_eq!(mgr.active_count(), 2);
        assert_eq!(mgr.count_by_owner(1), 2);
    }

    #[test]
    fn test_hit_log_capacity_and_clear() {
        let grid = wall_ahead();
        let mut mgr = ProjectileManager::new(Tuning {
            hit_log_capacity: 2,
            ..Default::default()
        });
        for i in 0..4 {
            let x = i as f32 - 2.0;
            mgr.spawn(Vec2::new(x, 0.0), Vec2::Y, &config(10.0, 0), 1).unwrap();
        }

        mgr.update(&grid, &mut (), &mut (), 0.6);
        assert_eq!(mgr.active_count(), 0);
        assert_eq!(mgr.hit_events().len(), 2);

        // Next tick starts from an empty log
        mgr.update(&grid, &mut (), &mut (), 0.6);
        assert!(mgr.hit_events().is_empty());
    }

    #[test]
    fn test_clear_session() {
        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::ZERO, Vec2::X, &ProjectileConfig::default(), 1).unwrap();
        mgr.clear();
        assert_eq!(mgr.active_count(), 0);
        assert!(mgr.hit_events().is_empty());
    }

    #[test]
    fn test_determinism() {
        let grid = TileGrid::from_rows(
            &[
                "##########",
                "#........#",
                "#..#.....#",
                "#.....#..#",
                "#........#",
                "##########",
            ],
            1.0,
        );

        let run = || {
            let mut mgr = ProjectileManager::default();
            let mut log = Vec::new();
            for i in 0..8 {
                let position = Vec2::new(-3.5 + i as f32, -1.5);
                let angle = i as f32 * 0.7;
                mgr.spawn(position, Vec2::from_angle(angle), &config(9.0, 3), i)
                    .unwrap();
            }
            for _ in 0..120 {
                mgr.update(&grid, &mut (), &mut (), SIM_DT);
                log.extend(mgr.drain_hit_events());
            }
            let state: Vec<Projectile> = mgr.pool().iter().map(|(_, p)| *p).collect();
            (log, state)
        };

        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn bounces_never_exceed_tick_ceiling(
            gap in 0.05f32..0.5,
            speed in 20.0f32..200.0,
            angle in 0.2f32..1.4,
        ) {
            let walls = ParallelWalls { gap };
            let mut mgr = ProjectileManager::default();
            let slot = mgr
                .spawn(Vec2::new(0.0, gap * 0.5), Vec2::from_angle(angle), &config(speed, 100), 1)
                .unwrap();

            mgr.update(&walls, &mut (), &mut (), SIM_DT);

            prop_assert!(
                mgr.hits.count(HitKind::Ricochet) <= MAX_BOUNCES_PER_TICK as usize
            );
            if let Some(p) = mgr.pool().get(slot) {
                prop_assert!(100 - p.bounces_remaining <= MAX_BOUNCES_PER_TICK);
                prop_assert!((p.velocity.length() - speed).abs() < 1e-2 * speed);
            }
        }
    }
}
