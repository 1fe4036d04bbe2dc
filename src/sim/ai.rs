//! Bot decision making
//!
//! Each bot runs a four-state machine (Idle, Chase, Attack, Evade). The
//! transition itself is the pure function [`decide`]; randomness is drawn up
//! front into [`Rolls`] so priorities can be tested without an RNG.
//!
//! Clock basis: `ai_timer` and `throw_delay` count ticks.
//!
//! Ties between equidistant balls or threats go to the lowest ball id.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::motion::Steering;
use super::particles::{Burst, COLOR_THROW};
use super::state::{AiState, MatchState, PlayerId, roll_ticks};
use crate::consts::*;
use crate::{distance, normalize_or_zero};

/// What a player wants to do next tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    pub steering: Steering,
    /// Throw the held ball at this point
    pub throw_at: Option<Vec2>,
}

/// A lethal ball thrown by an opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threat {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyInfo {
    pub id: PlayerId,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Everything a bot knows when it decides
#[derive(Debug, Clone, Default)]
pub struct Perception {
    pub pos: Vec2,
    pub has_ball: bool,
    /// Throw delay has run out
    pub throw_ready: bool,
    /// Nearest threat inside `THREAT_RADIUS`
    pub threat: Option<Threat>,
    /// Nearest neutral ball the bot can reach from its half
    pub nearest_free_ball: Option<Vec2>,
    /// Living opponents in id order
    pub enemies: Vec<EnemyInfo>,
}

/// Random draws for one decision
#[derive(Debug, Clone, Copy, Default)]
pub struct Rolls {
    /// Dodge to the left of the ball's path (else right)
    pub dodge_left: bool,
    /// Uniform in [0, 1), selects the throw target
    pub enemy_pick: f32,
    /// Wander direction, when the wander chance fired
    pub wander: Option<Vec2>,
}

impl Rolls {
    /// Draw a full set every tick so RNG consumption doesn't depend on state
    pub fn draw(rng: &mut Pcg32) -> Self {
        let dodge_left = rng.random_bool(0.5);
        let enemy_pick = rng.random_range(0.0..1.0);
        let wander_fires = rng.random_bool(WANDER_CHANCE);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Self {
            dodge_left,
            enemy_pick,
            wander: wander_fires.then(|| Vec2::new(angle.cos(), angle.sin())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub state: AiState,
    pub intent: Intent,
}

/// Fixed priority: Evade > Chase > Attack > Idle
pub fn choose_state(p: &Perception) -> AiState {
    if p.threat.is_some() {
        AiState::Evade
    } else if !p.has_ball && p.nearest_free_ball.is_some() {
        AiState::Chase
    } else if p.has_ball && !p.enemies.is_empty() {
        AiState::Attack
    } else {
        AiState::Idle
    }
}

/// Aim point for a throw at `enemy`, leading its motion by the flight time
pub fn lead_target(from: Vec2, enemy: &EnemyInfo) -> Vec2 {
    let flight_time = distance(from, enemy.pos) / THROW_FORCE;
    enemy.pos + enemy.vel * flight_time * LEAD_DAMPING
}

/// Intent for a given state under the current perception. A held state whose
/// target has vanished yields no steering.
pub fn intent_for(state: AiState, p: &Perception, rolls: &Rolls) -> Intent {
    match state {
        AiState::Evade => {
            let Some(threat) = p.threat else {
                return Intent::default();
            };
            let away = normalize_or_zero(p.pos - threat.pos);
            let path = normalize_or_zero(threat.vel);
            let side = if path == Vec2::ZERO { away.perp() } else { path.perp() };
            let side = if rolls.dodge_left { side } else { -side };
            let dir = normalize_or_zero(away + side * DODGE_WEIGHT);
            Intent {
                steering: Steering::Push(dir * EVADE_BOOST),
                throw_at: None,
            }
        }
        AiState::Chase => match p.nearest_free_ball {
            Some(ball) if !p.has_ball => Intent {
                steering: Steering::Push(normalize_or_zero(ball - p.pos)),
                throw_at: None,
            },
            _ => Intent::default(),
        },
        AiState::Attack => {
            if !p.has_ball || !p.throw_ready || p.enemies.is_empty() {
                return Intent::default();
            }
            let pick = ((rolls.enemy_pick * p.enemies.len() as f32) as usize)
                .min(p.enemies.len() - 1);
            Intent {
                steering: Steering::None,
                throw_at: Some(lead_target(p.pos, &p.enemies[pick])),
            }
        }
        AiState::Idle => Intent {
            steering: rolls
                .wander
                .map_or(Steering::None, |dir| Steering::Push(dir * WANDER_STRENGTH)),
            throw_at: None,
        },
    }
}

/// State transition. Between reaction-timer expiries the current state is
/// kept; its intent is still refreshed from the latest perception.
pub fn decide(current: AiState, reevaluate: bool, p: &Perception, rolls: &Rolls) -> Decision {
    let state = if reevaluate { choose_state(p) } else { current };
    Decision {
        state,
        intent: intent_for(state, p, rolls),
    }
}

/// Build what bot `id` can see in the current (post-update) world
pub fn perceive(state: &MatchState, id: PlayerId) -> Perception {
    let Some(bot) = state.player(id) else {
        return Perception::default();
    };

    let mut threat: Option<(f32, Threat)> = None;
    let mut free_ball: Option<(f32, Vec2)> = None;
    let (min_x, max_x) = bot.team.x_bounds(bot.radius);

    for ball in &state.balls {
        let d = distance(bot.pos, ball.pos);
        if ball.is_hot() {
            let hostile = ball
                .thrown_by
                .and_then(|t| state.player(t))
                .is_some_and(|t| t.alive && t.team != bot.team);
            if hostile && d < THREAT_RADIUS && threat.is_none_or(|(best, _)| d < best) {
                let seen = Threat {
                    pos: ball.pos,
                    vel: ball.vel,
                };
                threat = Some((d, seen));
            }
        } else if ball.is_loose() {
            let reachable =
                ball.pos.x >= min_x - PICKUP_RADIUS && ball.pos.x <= max_x + PICKUP_RADIUS;
            if reachable && free_ball.is_none_or(|(best, _)| d < best) {
                free_ball = Some((d, ball.pos));
            }
        }
    }

    let enemies = state
        .players
        .iter()
        .filter(|p| p.alive && p.team != bot.team)
        .map(|p| EnemyInfo {
            id: p.id,
            pos: p.pos,
            vel: p.vel,
        })
        .collect();

    Perception {
        pos: bot.pos,
        has_ball: bot.has_ball,
        throw_ready: bot.throw_delay == 0,
        threat: threat.map(|(_, t)| t),
        nearest_free_ball: free_ball.map(|(_, pos)| pos),
        enemies,
    }
}

/// Run every living bot's decision for the next tick
pub fn update_bots(state: &mut MatchState) {
    for i in 0..state.players.len() {
        let player = &mut state.players[i];
        if !player.alive || player.is_human {
            continue;
        }
        if player.has_ball {
            player.throw_delay = player.throw_delay.saturating_sub(1);
        }
        let id = player.id;

        let perception = perceive(state, id);
        let rolls = Rolls::draw(&mut state.rng);
        let reaction = roll_ticks(&mut state.rng, REACTION_MIN_TICKS, REACTION_MAX_TICKS);
        let next_delay = roll_ticks(&mut state.rng, THROW_DELAY_MIN_TICKS, THROW_DELAY_MAX_TICKS);

        let player = &mut state.players[i];
        let reevaluate = player.ai_timer == 0;
        if reevaluate {
            player.ai_timer = reaction;
        } else {
            player.ai_timer -= 1;
        }

        let decision = decide(player.ai_state, reevaluate, &perception, &rolls);
        if decision.state != player.ai_state {
            log::trace!(
                "Bot {} {:?} -> {:?}",
                player.id,
                player.ai_state,
                decision.state
            );
        }
        player.ai_state = decision.state;
        if decision.intent.throw_at.is_some() {
            player.throw_delay = next_delay;
            player.ai_timer = reaction;
        }
        player.intent = decision.intent;
    }
}

/// Throw the ball held by `id` at `target`.
///
/// Atomic: the ball is detached, launched and flagged lethal in one step.
/// Does nothing (returns false) if the player is dead or holds no ball. Aiming
/// exactly at oneself drops the ball at rest instead of launching it.
pub fn throw_ball(state: &mut MatchState, id: PlayerId, target: Vec2) -> bool {
    let Some(thrower) = state.player(id) else {
        return false;
    };
    if !thrower.alive {
        return false;
    }
    let Some(ball_idx) = state.ball_of(id) else {
        return false;
    };
    let from = thrower.pos;
    let dir = normalize_or_zero(target - from);

    let ball = &mut state.balls[ball_idx];
    ball.owner = None;
    ball.pos = from;
    ball.clear_trail();
    if dir == Vec2::ZERO {
        ball.vel = Vec2::ZERO;
        ball.neutralize();
    } else {
        ball.vel = dir * THROW_FORCE;
        ball.just_thrown = true;
        ball.thrown_by = Some(id);
    }

    if let Some(thrower) = state.player_mut(id) {
        thrower.has_ball = false;
    }
    state.particles.burst(from, COLOR_THROW, Burst::THROW);
    log::debug!("Player {} threw ball {} toward {:?}", id, ball_idx, target);
    true
}

/// Execute throws the bots queued last tick
pub fn apply_bot_throws(state: &mut MatchState) {
    for i in 0..state.players.len() {
        let player = &mut state.players[i];
        if player.is_human {
            continue;
        }
        if let Some(target) = player.intent.throw_at.take() {
            let id = player.id;
            throw_ball(state, id, target);
        }
    }
}
