//! Ball physics
//!
//! Owned balls are rigidly attached to their holder. Free balls coast with
//! damping, bounce off the arena walls and off each other. The center line is
//! not a wall for balls.

use glam::Vec2;

use super::collision::{circle_collision, elastic_impulse};
use super::particles::{Burst, COLOR_IMPACT, COLOR_WALL, ParticleSystem};
use super::state::{Ball, MatchState};
use crate::bounce_axis;
use crate::consts::*;

/// Advance every ball one tick
pub fn update_balls(state: &mut MatchState, dt: f32) {
    follow_owners(state);
    integrate_free_balls(state, dt);
    resolve_ball_collisions(state);
    settle_free_balls(state);
}

/// Snap held balls to their holder. A ball whose holder is dead (or missing)
/// is released where it is.
pub fn follow_owners(state: &mut MatchState) {
    for ball in &mut state.balls {
        let Some(owner_id) = ball.owner else {
            continue;
        };
        match state.players.get_mut(owner_id as usize) {
            Some(owner) if owner.alive => {
                ball.pos = owner.pos;
                ball.vel = Vec2::ZERO;
                owner.has_ball = true;
            }
            Some(owner) => {
                owner.has_ball = false;
                ball.owner = None;
                ball.vel = Vec2::ZERO;
                log::debug!("Ball {} released by dead player {}", ball.id, owner_id);
            }
            None => {
                ball.owner = None;
                ball.vel = Vec2::ZERO;
            }
        }
    }
}

/// Keep a ball inside the arena. Returns true on wall contact.
fn bounce_off_walls(ball: &mut Ball) -> bool {
    let r = ball.radius;
    let hit_x = bounce_axis(&mut ball.pos.x, &mut ball.vel.x, r, ARENA_WIDTH - r, WALL_BOUNCE);
    let hit_y = bounce_axis(&mut ball.pos.y, &mut ball.vel.y, r, ARENA_HEIGHT - r, WALL_BOUNCE);
    hit_x || hit_y
}

/// Wall contact for a free ball, however it got there. A ball that touched a
/// wall is no longer hot.
fn hit_wall(ball: &mut Ball, particles: &mut ParticleSystem) -> bool {
    if !bounce_off_walls(ball) {
        return false;
    }
    ball.neutralize();
    if ball.vel.length() > BALL_STOP_SPEED {
        particles.burst(ball.pos, COLOR_WALL, Burst::WALL);
    }
    true
}

pub fn integrate_free_balls(state: &mut MatchState, dt: f32) {
    for ball in state.balls.iter_mut().filter(|b| b.is_free()) {
        ball.pos += ball.vel * dt;
        ball.vel *= BALL_DAMPING;
        hit_wall(ball, &mut state.particles);
    }
}

/// Pairwise free-ball collisions: positional separation, then an impulse if
/// the pair is closing.
pub fn resolve_ball_collisions(state: &mut MatchState) {
    let n = state.balls.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = state.balls.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            if !a.is_free() || !b.is_free() {
                continue;
            }

            let contact = circle_collision(a.pos, a.radius, b.pos, b.radius);
            if !contact.hit {
                continue;
            }

            let half = contact.penetration / 2.0;
            a.pos -= contact.normal * half;
            b.pos += contact.normal * half;

            if let Some((va, vb)) =
                elastic_impulse(a.vel, b.vel, contact.normal, BALL_RESTITUTION)
            {
                let impact = (a.vel - b.vel).dot(contact.normal);
                a.vel = va;
                b.vel = vb;
                if impact > BALL_IMPACT_FX_SPEED {
                    state
                        .particles
                        .burst((a.pos + b.pos) / 2.0, COLOR_IMPACT, Burst::IMPACT);
                }
            }

            // A ball pushed into a wall can't give way; the other one takes
            // the rest of the correction
            let a_pinned = hit_wall(a, &mut state.particles);
            let b_pinned = hit_wall(b, &mut state.particles);
            if a_pinned || b_pinned {
                let rest = circle_collision(a.pos, a.radius, b.pos, b.radius);
                if rest.hit {
                    if !b_pinned {
                        b.pos += rest.normal * rest.penetration;
                        hit_wall(b, &mut state.particles);
                    } else {
                        a.pos -= rest.normal * rest.penetration;
                        hit_wall(a, &mut state.particles);
                    }
                }
            }
        }
    }
}

/// Slow balls stop dead and lose lethality. Moving balls record their trail.
pub fn settle_free_balls(state: &mut MatchState) {
    for ball in state.balls.iter_mut().filter(|b| b.is_free()) {
        if ball.vel.length() < BALL_STOP_SPEED {
            ball.vel = Vec2::ZERO;
            ball.neutralize();
        }
        if ball.vel != Vec2::ZERO {
            ball.record_trail();
        } else {
            ball.trail.pop_back();
        }
    }
}
