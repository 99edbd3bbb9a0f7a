//! Frame-scoped hit events
//!
//! The resolver reports every collision outcome here so particles, audio and
//! scoring can react without the engine knowing about them. The log is cleared
//! at the start of each update and holds a fixed number of events; anything
//! past capacity is dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a projectile ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    /// Destroyed on a wall (no bounces left, or per-tick bounce ceiling reached)
    Wall,
    /// Reflected off a wall and kept flying
    Ricochet,
    /// Struck an actor; `killed` reports whether the damage was fatal
    Actor { killed: bool },
    /// Absorbed by a destructible obstacle
    Obstacle { destroyed: bool },
    /// Two projectiles annihilated each other
    ProjectileVsProjectile,
}

/// A single collision outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub kind: HitKind,
    pub position: Vec2,
}

impl HitEvent {
    pub fn new(kind: HitKind, position: Vec2) -> Self {
        Self { kind, position }
    }
}

/// Bounded, append-only event log for one tick
#[derive(Debug, Clone)]
pub struct HitLog {
    events: Vec<HitEvent>,
    capacity: usize,
    dropped: usize,
}

impl HitLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Append an event; returns false (and drops it) when the log is full
    pub fn push(&mut self, event: HitEvent) -> bool {
        if self.events.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn record(&mut self, kind: HitKind, position: Vec2) -> bool {
        self.push(HitEvent::new(kind, position))
    }

    /// Forget all events and the drop counter
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }

    /// Take every recorded event, leaving the log empty
    pub fn drain(&mut self) -> std::vec::Drain<'_, HitEvent> {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[HitEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events dropped since the last clear
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of recorded events of a given kind
    pub fn count(&self, kind: HitKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_past_capacity_is_dropped() {
        let mut log = HitLog::with_capacity(2);
        assert!(log.record(HitKind::Wall, Vec2::ZERO));
        assert!(log.record(HitKind::Ricochet, Vec2::ONE));
        assert!(!log.record(HitKind::ProjectileVsProjectile, Vec2::ONE));

        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped(), 1);
        assert_eq!(log.events()[1].kind, HitKind::Ricochet);
    }

    #[test]
    fn test_drain_empties_log() {
        let mut log = HitLog::with_capacity(4);
        log.record(HitKind::Actor { killed: true }, Vec2::new(1.0, 2.0));
        log.record(HitKind::Wall, Vec2::ZERO);

        let drained: Vec<_> = log.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, HitKind::Actor { killed: true });
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 4);
    }

    #[test]
    fn test_clear_resets_drop_counter() {
        let mut log = HitLog::with_capacity(1);
        log.record(HitKind::Wall, Vec2::ZERO);
        log.record(HitKind::Wall, Vec2::ZERO);
        assert_eq!(log.count(HitKind::Wall), 1);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.dropped(), 0);
    }
}
