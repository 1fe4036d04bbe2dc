//! Player movement
//!
//! Acceleration-based steering: intent direction times `PLAYER_ACCEL`, speed
//! clamp, per-tick friction, then confinement to the player's own half.

use glam::Vec2;

use super::state::{MatchState, Player};
use crate::consts::*;
use crate::{bounce_axis, normalize_or_zero};

/// Where a player wants to go this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Steering {
    /// No input: friction brings the player to rest
    #[default]
    None,
    /// Head for a point (human pointer/touch target)
    Toward(Vec2),
    /// Raw acceleration vector from the AI; its length is the accel multiplier
    Push(Vec2),
}

impl Steering {
    /// Acceleration direction for a player at `pos`, scaled by the multiplier
    pub fn acceleration(&self, pos: Vec2) -> Vec2 {
        match *self {
            Steering::None => Vec2::ZERO,
            Steering::Toward(target) => {
                let to_target = target - pos;
                if to_target.length() <= ARRIVE_RADIUS {
                    Vec2::ZERO
                } else {
                    normalize_or_zero(to_target)
                }
            }
            Steering::Push(v) => {
                if v.is_finite() {
                    v
                } else {
                    Vec2::ZERO
                }
            }
        }
    }
}

pub fn max_speed(player: &Player) -> f32 {
    if player.aura {
        PLAYER_MAX_SPEED * AURA_SPEED_MULT
    } else {
        PLAYER_MAX_SPEED
    }
}

/// Keep a player inside its own half and the vertical bounds, with a soft bump
/// on contact. Returns true if any bound was touched.
pub fn confine(player: &mut Player) -> bool {
    let (min_x, max_x) = player.team.x_bounds(player.radius);
    let min_y = player.radius;
    let max_y = ARENA_HEIGHT - player.radius;

    let hit_x = bounce_axis(&mut player.pos.x, &mut player.vel.x, min_x, max_x, WALL_DAMPING);
    let hit_y = bounce_axis(&mut player.pos.y, &mut player.vel.y, min_y, max_y, WALL_DAMPING);
    hit_x || hit_y
}

/// Integrate one living player for one tick
pub fn step_player(player: &mut Player, steering: Steering, dt: f32) {
    let accel = steering.acceleration(player.pos);
    player.vel += accel * PLAYER_ACCEL * dt;
    player.vel = player.vel.clamp_length_max(max_speed(player));
    player.vel *= PLAYER_FRICTION;
    player.pos += player.vel * dt;
    confine(player);

    // Cosmetic
    let speed = player.vel.length();
    player.rotation = (player.rotation + speed * dt * ROTATION_PER_PIXEL) % std::f32::consts::TAU;
    player.scale = (player.scale + dt * 4.0).min(1.0);
    if speed > TRAIL_SPEED_THRESHOLD {
        player.record_trail();
    } else {
        player.trail.pop_back();
    }
}

/// Move every player. The human follows `human_steering`, bots follow the
/// intent the AI produced last tick. Dead players only animate.
pub fn update_players(state: &mut MatchState, human_steering: Steering, dt: f32) {
    for player in &mut state.players {
        if !player.alive {
            player.vel = Vec2::ZERO;
            player.death_anim = (player.death_anim + dt * 2.0).min(1.0);
            player.scale = 1.0 - player.death_anim;
            player.trail.pop_back();
            continue;
        }

        let steering = if player.is_human {
            human_steering
        } else {
            player.intent.steering
        };
        step_player(player, steering, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Team;
    use proptest::prelude::*;

    fn player_at(team: Team, pos: Vec2) -> Player {
        Player::new(0, team, 0, pos)
    }

    #[test]
    fn test_zero_direction_does_not_accelerate() {
        let mut p = player_at(Team::Left, Vec2::new(100.0, 100.0));
        step_player(&mut p, Steering::Toward(Vec2::new(100.0, 100.0)), SIM_DT);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_steer_toward_target() {
        let mut p = player_at(Team::Left, Vec2::new(100.0, 100.0));
        for _ in 0..10 {
            step_player(&mut p, Steering::Toward(Vec2::new(300.0, 100.0)), SIM_DT);
        }
        assert!(p.pos.x > 100.0);
        assert!((p.pos.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_input_decelerates_to_rest() {
        let mut p = player_at(Team::Left, Vec2::new(100.0, 250.0));
        p.vel = Vec2::new(200.0, 0.0);
        for _ in 0..200 {
            step_player(&mut p, Steering::None, SIM_DT);
        }
        assert!(p.vel.length() < 1e-3);
    }

    #[test]
    fn test_speed_clamp_and_aura() {
        let mut p = player_at(Team::Left, Vec2::new(100.0, 250.0));
        p.vel = Vec2::new(10_000.0, 0.0);
        step_player(&mut p, Steering::Push(Vec2::X), SIM_DT);
        assert!(p.vel.length() <= PLAYER_MAX_SPEED * PLAYER_FRICTION + 1e-3);

        let mut q = player_at(Team::Left, Vec2::new(100.0, 250.0));
        q.aura = true;
        q.vel = Vec2::new(10_000.0, 0.0);
        step_player(&mut q, Steering::Push(Vec2::X), SIM_DT);
        assert!(q.vel.length() > PLAYER_MAX_SPEED * PLAYER_FRICTION);
    }

    #[test]
    fn test_center_line_soft_bump() {
        let mid = ARENA_WIDTH / 2.0;
        let mut p = player_at(Team::Left, Vec2::new(mid - PLAYER_RADIUS - 1.0, 250.0));
        p.vel = Vec2::new(PLAYER_MAX_SPEED, 0.0);
        step_player(&mut p, Steering::Push(Vec2::X), SIM_DT);
        assert_eq!(p.pos.x, mid - PLAYER_RADIUS);
        // Reflected with damping, not a full bounce
        assert!(p.vel.x < 0.0);
        assert!(p.vel.x.abs() < PLAYER_MAX_SPEED * WALL_DAMPING + 1e-3);
    }

    #[test]
    fn test_right_team_cannot_cross() {
        let mid = ARENA_WIDTH / 2.0;
        let mut p = player_at(Team::Right, Vec2::new(mid + PLAYER_RADIUS + 2.0, 250.0));
        for _ in 0..60 {
            step_player(&mut p, Steering::Toward(Vec2::new(0.0, 250.0)), SIM_DT);
            assert!(p.pos.x >= mid + PLAYER_RADIUS);
        }
    }

    proptest! {
        /// Property: no single tick can push a player outside its half
        #[test]
        fn prop_confined_to_own_half(
            left in any::<bool>(),
            fx in 0.0f32..1.0f32,
            fy in 0.0f32..1.0f32,
            vx in -20_000.0f32..20_000.0f32,
            vy in -20_000.0f32..20_000.0f32,
            aura in any::<bool>(),
        ) {
            let team = if left { Team::Left } else { Team::Right };
            let (min_x, max_x) = team.x_bounds(PLAYER_RADIUS);
            let min_y = PLAYER_RADIUS;
            let max_y = ARENA_HEIGHT - PLAYER_RADIUS;
            let start = Vec2::new(min_x + fx * (max_x - min_x), min_y + fy * (max_y - min_y));

            let mut p = player_at(team, start);
            p.aura = aura;
            p.vel = Vec2::new(vx, vy);
            let push = Vec2::new(vx, vy).normalize_or_zero() * EVADE_BOOST;
            step_player(&mut p, Steering::Push(push), SIM_DT);

            prop_assert!(p.pos.x >= min_x && p.pos.x <= max_x);
            prop_assert!(p.pos.y >= min_y && p.pos.y <= max_y);
        }
    }
}
