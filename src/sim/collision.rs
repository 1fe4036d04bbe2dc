//! Collision detection and response for circles
//!
//! Shared by ball physics (ball vs ball) and combat (ball vs player).

use glam::Vec2;

use crate::normalize_or_zero;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (midway through the overlap)
    pub point: Vec2,
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles.
///
/// Exactly coincident centers have no defined normal; +X is used so the pair
/// can still be separated.
pub fn circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;

    if dist >= min_dist {
        return CollisionResult::miss();
    }

    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };

    CollisionResult {
        hit: true,
        point: a_pos + normal * (a_radius - (min_dist - dist) / 2.0),
        normal,
        penetration: min_dist - dist,
    }
}

/// Equal-mass impulse along `normal` (pointing from a to b).
///
/// Returns the new velocities, or `None` when the bodies are already
/// separating and no impulse should be applied.
pub fn elastic_impulse(va: Vec2, vb: Vec2, normal: Vec2, restitution: f32) -> Option<(Vec2, Vec2)> {
    let closing = (va - vb).dot(normal);
    if closing <= 0.0 {
        return None;
    }
    let j = (1.0 + restitution) * closing / 2.0;
    Some((va - normal * j, vb + normal * j))
}

/// Bounce a moving body off another body along the contact normal.
///
/// `normal` points from the struck body toward the moving one; `other_vel` is
/// the struck body's velocity. The struck body is treated as immovable, so
/// only the normal component of the relative velocity is reversed and scaled.
pub fn bounce_off(vel: Vec2, other_vel: Vec2, normal: Vec2, bounce: f32) -> Vec2 {
    let n = normalize_or_zero(normal);
    let rel = vel - other_vel;
    let approach = rel.dot(n);
    if approach >= 0.0 {
        return vel;
    }
    vel - (1.0 + bounce) * approach * n
}
