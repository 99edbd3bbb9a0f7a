//! Engine tuning
//!
//! Data-driven engine constants, loaded from JSON. Any field missing from the
//! document keeps its default from [`crate::consts`]. The per-tick bounce
//! ceiling is not tunable: the resolver always uses
//! [`MAX_BOUNCES_PER_TICK`](crate::consts::MAX_BOUNCES_PER_TICK), and an
//! unknown `max_bounces_per_tick` key in a document is ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Engine-wide tuning values shared by every projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Collision radius used for actor and projectile-pair tests
    pub projectile_radius: f32,
    /// Seconds after spawn during which the owner cannot be hit
    ///
    /// Defaults to the fixed engine value [`SELF_HIT_GRACE_PERIOD`] (0.5s).
    pub self_hit_grace_period: f32,
    /// Push-off distance after a reflection
    ///
    /// Defaults to the fixed engine value [`PUSH_EPSILON`] (0.01).
    pub push_epsilon: f32,
    /// Number of projectile slots
    pub pool_capacity: usize,
    /// Hit events kept per tick
    pub hit_log_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            projectile_radius: PROJECTILE_RADIUS,
            self_hit_grace_period: SELF_HIT_GRACE_PERIOD,
            push_epsilon: PUSH_EPSILON,
            pool_capacity: MAX_PROJECTILES,
            hit_log_capacity: MAX_HIT_EVENTS,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Read tuning from a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the resolver's termination or geometry
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.projectile_radius > 0.0) {
            return Err(TuningError::Invalid {
                field: "projectile_radius",
                reason: "must be positive",
            });
        }
        if !(self.self_hit_grace_period >= 0.0) {
            return Err(TuningError::Invalid {
                field: "self_hit_grace_period",
                reason: "must not be negative",
            });
        }
        if !(self.push_epsilon >= 0.0) {
            return Err(TuningError::Invalid {
                field: "push_epsilon",
                reason: "must not be negative",
            });
        }
        if self.pool_capacity == 0 {
            return Err(TuningError::Invalid {
                field: "pool_capacity",
                reason: "must be at least 1",
            });
        }
        if self.hit_log_capacity == 0 {
            return Err(TuningError::Invalid {
                field: "hit_log_capacity",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
