//! Segment raycasts against static and destructible geometry
//!
//! The resolver casts each sub-step's movement segment through two surface
//! sets: the map grid ([`MapQuery`]) and the destructible obstacle list
//! ([`ObstacleQuery`]). Both report the nearest entry point along the segment.

use glam::Vec2;

use super::collision::Aabb;
use crate::consts::MOVE_EPSILON;

/// Nearest surface crossing along a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entry point on the surface
    pub point: Vec2,
    /// Unit surface normal, facing back toward the segment start
    pub normal: Vec2,
    /// Distance from the segment start to `point`
    pub distance: f32,
}

/// Static world geometry
pub trait MapQuery {
    /// Nearest solid crossing on the segment `start..end`
    ///
    /// Must be a pure function of the map and the segment.
    fn raycast(&self, start: Vec2, end: Vec2) -> Option<RayHit>;

    /// Whether `position` lies inside the playable world
    fn in_bounds(&self, position: Vec2) -> bool;
}

/// Index of an obstacle within its owning collection
pub type ObstacleId = usize;

/// Nearest obstacle crossing along a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    pub hit: RayHit,
    pub obstacle: ObstacleId,
}

/// Destructible obstacles that absorb projectiles
pub trait ObstacleQuery {
    /// Nearest obstacle crossing on the segment `start..end`
    fn raycast(&self, start: Vec2, end: Vec2) -> Option<ObstacleHit>;

    /// Apply damage; returns true if the obstacle was destroyed by it
    fn damage_obstacle(&mut self, obstacle: ObstacleId, amount: u32) -> bool;
}

/// No obstacles
impl ObstacleQuery for () {
    fn raycast(&self, _start: Vec2, _end: Vec2) -> Option<ObstacleHit> {
        None
    }

    fn damage_obstacle(&mut self, _obstacle: ObstacleId, _amount: u32) -> bool {
        false
    }
}

/// Normal opposing the dominant axis of `dir`
pub fn dominant_axis_normal(dir: Vec2) -> Vec2 {
    if dir.x.abs() > dir.y.abs() {
        Vec2::new(if dir.x > 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if dir.y > 0.0 { -1.0 } else { 1.0 })
    }
}

/// Parametric range of a segment still inside every slab clipped so far
#[derive(Debug, Clone, Copy)]
struct SlabClip {
    t_min: f32,
    t_max: f32,
    /// Normal of the face crossed at `t_min`, zero while the start is inside
    normal: Vec2,
}

impl SlabClip {
    fn new() -> Self {
        Self {
            t_min: 0.0,
            t_max: 1.0,
            normal: Vec2::ZERO,
        }
    }

    /// Clip against the slab `min..max` on one axis
    ///
    /// Returns false when the segment runs parallel to the slab and outside it.
    fn clip(&mut self, start: f32, delta: f32, min: f32, max: f32, axis_normal: Vec2) -> bool {
        if delta.abs() <= MOVE_EPSILON {
            return start >= min && start <= max;
        }

        let mut t1 = (min - start) / delta;
        let mut t2 = (max - start) / delta;
        // Entering through the min face means the face normal points negative
        let mut n1 = -axis_normal;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            n1 = axis_normal;
        }

        if t1 > self.t_min {
            self.t_min = t1;
            self.normal = n1;
        }
        self.t_max = self.t_max.min(t2);
        true
    }
}

/// Slab-method raycast of the segment `start..end` against one box
///
/// Returns the entry parameter `t` in `[0, 1]` and the entering face normal.
/// A segment starting inside the box hits at `t = 0` with a normal opposing
/// its dominant direction.
pub fn slab_raycast(start: Vec2, end: Vec2, aabb: &Aabb) -> Option<(f32, Vec2)> {
    let delta = end - start;
    if delta.length() < MOVE_EPSILON {
        return None;
    }

    let mut range = SlabClip::new();
    if !range.clip(start.x, delta.x, aabb.min.x, aabb.max.x, Vec2::X) {
        return None;
    }
    if !range.clip(start.y, delta.y, aabb.min.y, aabb.max.y, Vec2::Y) {
        return None;
    }

    if range.t_max < range.t_min {
        return None;
    }
    let normal = if range.normal == Vec2::ZERO {
        dominant_axis_normal(delta)
    } else {
        range.normal
    };
    Some((range.t_min, normal))
}

/// Closest slab hit across a set of boxes, as `(index, RayHit)`
///
/// Equal distances keep the earlier box.
pub fn slab_raycast_closest<'a>(
    start: Vec2,
    end: Vec2,
    boxes: impl IntoIterator<Item = (ObstacleId, &'a Aabb)>,
) -> Option<ObstacleHit> {
    let delta = end - start;
    let length = delta.length();

    let mut closest: Option<(f32, Vec2, ObstacleId)> = None;
    for (id, aabb) in boxes {
        if let Some((t, normal)) = slab_raycast(start, end, aabb) {
            if closest.is_none_or(|(best, _, _)| t < best) {
                closest = Some((t, normal, id));
            }
        }
    }

    closest.map(|(t, normal, obstacle)| ObstacleHit {
        hit: RayHit {
            point: start + delta * t,
            normal,
            distance: t * length,
        },
        obstacle,
    })
}
