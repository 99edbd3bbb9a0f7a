//! Actor collision and damage
//!
//! Actors (tanks, turrets, anything that can be shot) live outside the engine.
//! The resolver only needs a hit test and a way to apply damage, expressed by
//! [`ActorQuery`]. [`ActorRoster`] is a plain list of circular actors that
//! implements it for headless runs and tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, circle_circle};

/// Identifies an actor (and the owner of a projectile)
pub type ActorId = u32;

/// Hit test and damage service for shootable actors
pub trait ActorQuery {
    /// First actor whose body overlaps the circle, skipping `exclude`
    fn check_collision(
        &self,
        position: Vec2,
        radius: f32,
        exclude: Option<ActorId>,
    ) -> Option<ActorId>;

    /// Apply damage; returns true if the actor was killed by it
    fn apply_damage(&mut self, actor: ActorId, amount: u32) -> bool;
}

/// No actors: nothing is ever hit
impl ActorQuery for () {
    fn check_collision(
        &self,
        _position: Vec2,
        _radius: f32,
        _exclude: Option<ActorId>,
    ) -> Option<ActorId> {
        None
    }

    fn apply_damage(&mut self, _actor: ActorId, _amount: u32) -> bool {
        false
    }
}

/// A circular actor with health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub position: Vec2,
    pub radius: f32,
    pub health: u32,
    /// Ignores damage (spawn protection, scripted sequences)
    #[serde(default)]
    pub invulnerable: bool,
}

impl Actor {
    pub fn new(id: ActorId, position: Vec2, radius: f32, health: u32) -> Self {
        Self {
            id,
            position,
            radius,
            health,
            invulnerable: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn body(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

/// Actors kept in insertion order; queries scan linearly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorRoster {
    actors: Vec<Actor>,
}

impl ActorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn alive_count(&self) -> usize {
        self.actors.iter().filter(|a| !a.is_dead()).count()
    }
}

impl ActorQuery for ActorRoster {
    fn check_collision(
        &self,
        position: Vec2,
        radius: f32,
        exclude: Option<ActorId>,
    ) -> Option<ActorId> {
        let probe = Circle::new(position, radius);
        self.actors
            .iter()
            .filter(|a| !a.is_dead() && Some(a.id) != exclude)
            .find(|a| circle_circle(probe, a.body()).is_some())
            .map(|a| a.id)
    }

    fn apply_damage(&mut self, actor: ActorId, amount: u32) -> bool {
        let Some(actor) = self.get_mut(actor) else {
            return false;
        };
        if actor.is_dead() || actor.invulnerable {
            return false;
        }

        actor.health = actor.health.saturating_sub(amount);
        log::debug!("Actor {} took {} damage, health={}", actor.id, amount, actor.health);

        if actor.is_dead() {
            log::info!("Actor {} destroyed", actor.id);
            return true;
        }
        false
    }
}
