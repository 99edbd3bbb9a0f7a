//! Deterministic simulation module
//!
//! All projectile logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies
//!
//! The world (map, actors, obstacles) is supplied by the caller through the
//! query traits in [`actor`] and [`raycast`].

pub mod actor;
pub mod collision;
pub mod events;
pub mod grid;
pub mod obstacle;
pub mod raycast;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorId, ActorQuery, ActorRoster};
pub use collision::{Aabb, Circle, Contact, aabb_aabb, circle_aabb, circle_circle, reflect_velocity};
pub use events::{HitEvent, HitKind, HitLog};
pub use grid::TileGrid;
pub use obstacle::{Obstacle, ObstacleField};
pub use raycast::{MapQuery, ObstacleHit, ObstacleId, ObstacleQuery, RayHit};
pub use state::{Lifetime, Projectile, ProjectileConfig, ProjectilePool, SlotIndex};
pub use tick::ProjectileManager;
