//! Destructible obstacles
//!
//! Boxes with health that absorb projectiles. Destroyed obstacles keep their
//! index so ids handed out by raycasts stay valid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Circle, circle_aabb};
use super::raycast::{ObstacleHit, ObstacleId, ObstacleQuery, slab_raycast_closest};

/// A destructible box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub health: u32,
}

impl Obstacle {
    pub fn new(bounds: Aabb, health: u32) -> Self {
        Self { bounds, health }
    }

    /// Square obstacle occupying one tile centered at `center`
    pub fn tile(center: Vec2, tile_size: f32, health: u32) -> Self {
        Self::new(Aabb::from_center(center, Vec2::splat(tile_size * 0.5)), health)
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

/// Obstacles in placement order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obstacle: Obstacle) -> ObstacleId {
        self.obstacles.push(obstacle);
        self.obstacles.len() - 1
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    /// Standing obstacles with their ids
    pub fn standing(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_destroyed())
    }

    pub fn standing_count(&self) -> usize {
        self.standing().count()
    }

    /// Push-out vector for a circle overlapping any standing obstacle
    ///
    /// Used by actor movement; the first overlapping obstacle wins.
    pub fn resolve_circle(&self, circle: Circle) -> Option<Vec2> {
        self.standing().find_map(|(_, o)| circle_aabb(circle, o.bounds))
    }
}

impl ObstacleQuery for ObstacleField {
    fn raycast(&self, start: Vec2, end: Vec2) -> Option<ObstacleHit> {
        slab_raycast_closest(start, end, self.standing().map(|(id, o)| (id, &o.bounds)))
    }

    fn damage_obstacle(&mut self, obstacle: ObstacleId, amount: u32) -> bool {
        let Some(target) = self.obstacles.get_mut(obstacle) else {
            return false;
        };
        if target.is_destroyed() {
            return false;
        }

        target.health = target.health.saturating_sub(amount);
        log::debug!("Obstacle {} hit for {} damage, health={}", obstacle, amount, target.health);

        if target.is_destroyed() {
            log::info!("Obstacle {} destroyed", obstacle);
            return true;
        }
        false
    }
}
