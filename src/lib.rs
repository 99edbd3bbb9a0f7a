//! Ricochet - deterministic projectile ballistics for top-down arena games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision primitives, raycasts, projectile pool,
//!   swept resolver)
//! - `tuning`: Data-driven engine constants loaded from JSON
//! - `error`: Error types returned at the API boundary

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{SpawnError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Projectile collision radius (actor and projectile-pair tests)
    pub const PROJECTILE_RADIUS: f32 = 0.15;
    /// Seconds after spawn during which a projectile ignores its owner
    pub const SELF_HIT_GRACE_PERIOD: f32 = 0.5;
    /// Hard ceiling on wall reflections per projectile per tick
    pub const MAX_BOUNCES_PER_TICK: u32 = 4;
    /// Distance a reflected projectile is pushed off the surface
    pub const PUSH_EPSILON: f32 = 0.01;

    /// Projectile pool capacity
    pub const MAX_PROJECTILES: usize = 64;
    /// Hit events recorded per tick before the log starts dropping
    pub const MAX_HIT_EVENTS: usize = 32;

    /// Remaining tick time below which the swept loop stops
    pub const TIME_EPSILON: f32 = 1e-6;
    /// Movement length below which raycasts are skipped
    pub const MOVE_EPSILON: f32 = 1e-4;
    /// Squared length below which a direction is treated as zero
    pub const DIRECTION_EPSILON_SQ: f32 = 1e-6;
}

/// Canonical forward direction used when a requested direction is degenerate
pub const FORWARD: Vec2 = Vec2::new(0.0, 1.0);

/// Normalize a direction, falling back to [`FORWARD`] for near-zero input
#[inline]
pub fn direction_or_forward(direction: Vec2) -> Vec2 {
    if direction.length_squared() < consts::DIRECTION_EPSILON_SQ || !direction.is_finite() {
        FORWARD
    } else {
        direction.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_or_forward() {
        assert_eq!(direction_or_forward(Vec2::ZERO), FORWARD);
        assert_eq!(direction_or_forward(Vec2::new(1e-5, 0.0)), FORWARD);
        assert_eq!(direction_or_forward(Vec2::new(f32::NAN, 1.0)), FORWARD);

        let dir = direction_or_forward(Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
    }
}
