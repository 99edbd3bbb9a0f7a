//! Collision primitives
//!
//! Pure geometric overlap tests between circles and axis-aligned boxes, plus
//! the reflection used for wall bounces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Squared distance below which two points are treated as coincident
const CONTACT_EPSILON_SQ: f32 = 0.000001;

/// A circle collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned bounding box (`min <= max` componentwise)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` extending `half_extents` each way
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Point containment, inclusive of the edges
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Contact between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Circle vs circle overlap
///
/// Touching circles do not collide. Coincident centers report `(1, 0)` as
/// the normal and the full radius sum as penetration.
pub fn circle_circle(a: Circle, b: Circle) -> Option<Contact> {
    let delta = b.center - a.center;
    let dist_sq = delta.length_squared();
    let radius_sum = a.radius + b.radius;

    if dist_sq >= radius_sum * radius_sum {
        return None;
    }

    if dist_sq > CONTACT_EPSILON_SQ {
        let dist = dist_sq.sqrt();
        Some(Contact {
            normal: delta / dist,
            penetration: radius_sum - dist,
        })
    } else {
        Some(Contact {
            normal: Vec2::X,
            penetration: radius_sum,
        })
    }
}

/// Circle vs box overlap
///
/// Returns the vector that moves the circle out of the box. When the center
/// is inside the box, the circle is pushed through the nearest face.
pub fn circle_aabb(circle: Circle, aabb: Aabb) -> Option<Vec2> {
    let nearest = circle.center.clamp(aabb.min, aabb.max);
    let delta = circle.center - nearest;
    let dist_sq = delta.length_squared();

    if dist_sq >= circle.radius * circle.radius {
        return None;
    }

    if dist_sq > CONTACT_EPSILON_SQ {
        let dist = dist_sq.sqrt();
        return Some(delta / dist * (circle.radius - dist));
    }

    // Center inside the box: nearest face wins, ties keep the earlier face
    let faces = [
        (circle.center.x - aabb.min.x, Vec2::NEG_X),
        (aabb.max.x - circle.center.x, Vec2::X),
        (circle.center.y - aabb.min.y, Vec2::NEG_Y),
        (aabb.max.y - circle.center.y, Vec2::Y),
    ];
    let (min_dist, normal) = faces
        .into_iter()
        .fold(faces[0], |best, face| if face.0 < best.0 { face } else { best });

    Some(normal * (circle.radius + min_dist))
}

/// Box vs box overlap (separating axis test, touching counts as overlap)
pub fn aabb_aabb(a: Aabb, b: Aabb) -> bool {
    if a.max.x < b.min.x || a.min.x > b.max.x {
        return false;
    }
    if a.max.y < b.min.y || a.min.y > b.max.y {
        return false;
    }
    true
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, `normal` must be unit length.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
