//! Dodge Arena - A two-team dodgeball arena simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (motion, ball physics, AI, combat, match flow)
//! - `settings`: Match configuration accepted at match start
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{MatchConfig, MatchMode};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (the center line splits the teams at ARENA_WIDTH / 2)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Roster limits
    pub const MAX_TEAM_SIZE: u8 = 6;
    pub const MAX_NICKNAME_LEN: usize = 16;

    /// Player movement
    pub const PLAYER_RADIUS: f32 = 18.0;
    /// Acceleration applied along the steering direction (pixels/s²)
    pub const PLAYER_ACCEL: f32 = 1800.0;
    pub const PLAYER_MAX_SPEED: f32 = 240.0;
    /// Per-tick velocity multiplier, applied after the speed clamp
    pub const PLAYER_FRICTION: f32 = 0.88;
    /// Human steering stops accelerating inside this distance of the target
    pub const ARRIVE_RADIUS: f32 = 4.0;
    /// Fraction of velocity kept when bumping the arena edge or center line
    pub const WALL_DAMPING: f32 = 0.3;
    /// Speed multiplier for the aura holder
    pub const AURA_SPEED_MULT: f32 = 1.35;
    /// Minimum streak before a player can hold the aura
    pub const AURA_MIN_KILLS: u32 = 2;
    /// Rotation (radians) per pixel travelled, cosmetic
    pub const ROTATION_PER_PIXEL: f32 = 0.02;
    /// Player trail is only recorded above this speed
    pub const TRAIL_SPEED_THRESHOLD: f32 = 120.0;
    pub const PLAYER_TRAIL_LENGTH: usize = 8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Launch speed of a throw (pixels/s)
    pub const THROW_FORCE: f32 = 620.0;
    /// Per-tick velocity multiplier for free balls
    pub const BALL_DAMPING: f32 = 0.985;
    /// Below this speed a ball settles to rest and stops being lethal
    pub const BALL_STOP_SPEED: f32 = 20.0;
    /// Fraction of speed kept along the normal after hitting a wall or a player
    pub const WALL_BOUNCE: f32 = 0.6;
    /// Restitution for ball-ball impacts
    pub const BALL_RESTITUTION: f32 = 0.9;
    /// Ball-ball impacts faster than this emit particles
    pub const BALL_IMPACT_FX_SPEED: f32 = 150.0;
    /// A ball-less player touching a neutral ball inside this distance picks it up
    pub const PICKUP_RADIUS: f32 = PLAYER_RADIUS + BALL_RADIUS + 4.0;

    /// Timers measured on the simulation clock (seconds)
    pub const RESPAWN_SECS: f64 = 3.0;
    pub const SPAWN_GRACE_SECS: f64 = 2.0;
    pub const HIT_FLASH_SECS: f64 = 0.25;

    /// AI tuning (tick counted)
    pub const REACTION_MIN_TICKS: u32 = 8;
    pub const REACTION_MAX_TICKS: u32 = 20;
    pub const THROW_DELAY_MIN_TICKS: u32 = 45;
    pub const THROW_DELAY_MAX_TICKS: u32 = 120;
    /// Lethal balls closer than this are treated as threats
    pub const THREAT_RADIUS: f32 = 160.0;
    /// Acceleration multiplier while evading
    pub const EVADE_BOOST: f32 = 1.6;
    /// Weight of the sideways dodge relative to the flee direction
    pub const DODGE_WEIGHT: f32 = 0.7;
    /// How much of the predicted enemy travel is used when leading a throw
    pub const LEAD_DAMPING: f32 = 0.6;
    /// Chance per tick that an idle bot takes a wander step
    pub const WANDER_CHANCE: f64 = 0.05;
    pub const WANDER_STRENGTH: f32 = 0.5;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector in the direction of `v`, or zero for a zero-length vector
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Reflect a velocity about a unit normal: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Confine one coordinate to `[min, max]`, damping and reversing the velocity
/// component when it pushes past a bound. Returns true on contact.
#[inline]
pub fn bounce_axis(pos: &mut f32, vel: &mut f32, min: f32, max: f32, damping: f32) -> bool {
    if *pos < min {
        *pos = min;
        if *vel < 0.0 {
            *vel = -*vel * damping;
        }
        true
    } else if *pos > max {
        *pos = max;
        if *vel > 0.0 {
            *vel = -*vel * damping;
        }
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize_or_zero(Vec2::ZERO), Vec2::ZERO);
        let n = normalize_or_zero(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec2::new(100.0, 20.0), Vec2::new(-1.0, 0.0));
        assert!((r.x + 100.0).abs() < 1e-4);
        assert!((r.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_axis() {
        let (mut p, mut v) = (-5.0, -10.0);
        assert!(bounce_axis(&mut p, &mut v, 0.0, 100.0, 0.5));
        assert_eq!(p, 0.0);
        assert_eq!(v, 5.0);

        let (mut p, mut v) = (50.0, 10.0);
        assert!(!bounce_axis(&mut p, &mut v, 0.0, 100.0, 0.5));
        assert_eq!(v, 10.0);
    }
}
