//! Projectile state and the slot pool that owns it
//!
//! Slots are allocated first-fit so that identical spawn sequences always land
//! in identical slots; the resolver relies on slot order for determinism.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use crate::consts::MAX_PROJECTILES;
use crate::direction_or_forward;
use crate::error::SpawnError;

/// Index of a projectile slot in the pool
pub type SlotIndex = usize;

/// How long a projectile may fly before expiring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// Seconds remaining
    Finite(f32),
    /// Only walls, actors, obstacles and other projectiles end the flight
    Infinite,
}

impl Lifetime {
    /// Count down by `dt`; returns true once a finite lifetime runs out
    pub fn tick(&mut self, dt: f32) -> bool {
        match self {
            Lifetime::Finite(secs) => {
                *secs -= dt;
                *secs <= 0.0
            }
            Lifetime::Infinite => false,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Lifetime::Infinite)
    }
}

/// Per-shot configuration passed to `spawn`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Movement speed (units/sec)
    pub speed: f32,
    /// Wall reflections before destruction
    pub max_bounces: u32,
    pub lifetime: Lifetime,
    /// Damage dealt to actors and obstacles
    pub damage: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 11.25,
            max_bounces: 1,
            lifetime: Lifetime::Infinite,
            damage: 5,
        }
    }
}

/// A live projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Magnitude of `velocity`, fixed at spawn
    pub speed: f32,
    /// Wall bounces left before the next wall destroys it
    pub bounces_remaining: u32,
    pub lifetime: Lifetime,
    /// Simulation seconds since spawn
    pub age: f32,
    /// Actor that fired it (immune during the self-hit grace period)
    pub owner_id: ActorId,
    pub damage: u32,
}

impl Projectile {
    /// Build a projectile heading along `direction` (degenerate directions fly forward)
    pub fn new(
        position: Vec2,
        direction: Vec2,
        config: &ProjectileConfig,
        owner_id: ActorId,
    ) -> Self {
        let direction = direction_or_forward(direction);
        Self {
            position,
            velocity: direction * config.speed,
            speed: config.speed,
            bounces_remaining: config.max_bounces,
            lifetime: config.lifetime,
            age: 0.0,
            owner_id,
            damage: config.damage,
        }
    }

    /// Unit heading (forward when stationary)
    pub fn direction(&self) -> Vec2 {
        direction_or_forward(self.velocity)
    }
}

/// Fixed-capacity projectile storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectilePool {
    slots: Vec<Option<Projectile>>,
    active_count: usize,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::with_capacity(MAX_PROJECTILES)
    }
}

impl ProjectilePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            active_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn is_full(&self) -> bool {
        self.active_count == self.slots.len()
    }

    /// Place a new projectile in the first free slot
    pub fn spawn(
        &mut self,
        position: Vec2,
        direction: Vec2,
        config: &ProjectileConfig,
        owner_id: ActorId,
    ) -> Result<SlotIndex, SpawnError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(SpawnError::Full {
                capacity: self.slots.len(),
            })?;

        self.slots[slot] = Some(Projectile::new(position, direction, config, owner_id));
        self.active_count += 1;
        Ok(slot)
    }

    pub fn get(&self, slot: SlotIndex) -> Option<&Projectile> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut Projectile> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Overwrite an occupied slot; empty slots are left untouched
    pub(crate) fn store(&mut self, slot: SlotIndex, projectile: Projectile) {
        if let Some(current) = self.get_mut(slot) {
            *current = projectile;
        }
    }

    /// Deactivate a slot, returning the projectile that occupied it
    pub fn release(&mut self, slot: SlotIndex) -> Option<Projectile> {
        let projectile = self.slots.get_mut(slot)?.take()?;
        self.active_count -= 1;
        Some(projectile)
    }

    /// Live projectiles in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Projectile)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, p)| p.as_ref().map(|p| (slot, p)))
    }

    /// Live projectiles fired by `owner_id`
    pub fn count_by_owner(&self, owner_id: ActorId) -> usize {
        self.iter().filter(|(_, p)| p.owner_id == owner_id).count()
    }

    /// Free every slot (session end)
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.active_count = 0;
    }
}
