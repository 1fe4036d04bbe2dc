//! Hits, pickups, respawns and scoring
//!
//! Clock basis: `respawn_at`, `invulnerable_until` and `hit_at` are compared
//! against the simulation clock `MatchState::clock` (seconds).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::Intent;
use super::collision::{bounce_off, circle_collision};
use super::particles::{Burst, COLOR_IMPACT, COLOR_PICKUP};
use super::state::{MatchOutcome, MatchState, PlayerId, Team, spawn_point};
use crate::consts::*;
use crate::{distance, normalize_or_zero};

/// One elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillEvent {
    pub killer: PlayerId,
    pub victim: PlayerId,
    pub ball: u32,
}

/// Living players per team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub left_alive: usize,
    pub right_alive: usize,
}

impl ScoreSnapshot {
    pub fn alive(&self, team: Team) -> usize {
        match team {
            Team::Left => self.left_alive,
            Team::Right => self.right_alive,
        }
    }
}

pub fn score(state: &MatchState) -> ScoreSnapshot {
    ScoreSnapshot {
        left_alive: state.alive_count(Team::Left),
        right_alive: state.alive_count(Team::Right),
    }
}

/// Respawn every dead player whose scheduled time has come (infinite mode only)
pub fn process_respawns(state: &mut MatchState) -> Vec<PlayerId> {
    let mut respawned = Vec::new();
    if !state.mode().respawns() {
        return respawned;
    }
    let now = state.clock;
    let team_size = state.config.team_size;

    for player in &mut state.players {
        if player.alive || !player.respawn_at.is_some_and(|t| now >= t) {
            continue;
        }
        let spawn = spawn_point(player.team, player.index, team_size);
        player.respawn(spawn, now + SPAWN_GRACE_SECS);
        respawned.push(player.id);
        log::debug!("Player {} respawned at {:?}", player.id, spawn);
    }
    respawned
}

/// Test each hot ball against the living players. A ball kills at most once
/// per tick: the hit neutralizes it, so later checks skip it.
pub fn resolve_hits(state: &mut MatchState) -> Vec<KillEvent> {
    let mut kills = Vec::new();
    let now = state.clock;
    let respawns = state.mode().respawns();

    for bi in 0..state.balls.len() {
        if !state.balls[bi].is_hot() {
            continue;
        }

        // Without a living thrower there is no team to attribute, so the ball goes neutral
        let thrower = state.balls[bi]
            .thrown_by
            .and_then(|id| state.player(id))
            .filter(|p| p.alive)
            .map(|p| (p.id, p.team));
        let Some((killer, killer_team)) = thrower else {
            state.balls[bi].neutralize();
            continue;
        };

        let (ball_pos, ball_radius) = (state.balls[bi].pos, state.balls[bi].radius);
        let victim = state
            .players
            .iter()
            .find(|p| {
                p.alive
                    && p.id != killer
                    && p.team != killer_team
                    && !p.is_invulnerable(now)
                    && circle_collision(ball_pos, ball_radius, p.pos, p.radius).hit
            })
            .map(|p| p.id);
        let Some(victim) = victim else {
            continue;
        };

        let (victim_pos, victim_vel, victim_team) = {
            let v = &mut state.players[victim as usize];
            v.alive = false;
            v.has_ball = false;
            v.kills = 0;
            v.aura = false;
            v.hit_at = Some(now);
            v.death_anim = 0.0;
            v.intent = Intent::default();
            v.respawn_at = respawns.then_some(now + RESPAWN_SECS);
            (v.pos, v.vel, v.team)
        };
        if let Some(held) = state.ball_of(victim) {
            let dropped = &mut state.balls[held];
            dropped.owner = None;
            dropped.vel = Vec2::ZERO;
            dropped.neutralize();
        }
        state.players[killer as usize].kills += 1;

        let ball = &mut state.balls[bi];
        let mut normal = normalize_or_zero(ball.pos - victim_pos);
        if normal == Vec2::ZERO {
            normal = -normalize_or_zero(ball.vel);
        }
        ball.vel = bounce_off(ball.vel, victim_vel, normal, WALL_BOUNCE);
        if ball.vel.length() < BALL_STOP_SPEED {
            ball.vel = Vec2::ZERO;
        }
        ball.neutralize();
        let ball_id = ball.id;
        let impact_at = ball.pos;

        state.particles.burst(victim_pos, victim_team.color(), Burst::HIT);
        state.particles.burst(impact_at, COLOR_IMPACT, Burst::IMPACT);

        log::debug!("Player {} eliminated player {} with ball {}", killer, victim, ball_id);
        kills.push(KillEvent {
            killer,
            victim,
            ball: ball_id,
        });
    }
    kills
}

/// Neutral free balls go to the first (lowest id) living, empty-handed player
/// in reach. No team restriction.
pub fn resolve_pickups(state: &mut MatchState) -> usize {
    let mut picked = 0;
    for bi in 0..state.balls.len() {
        if !state.balls[bi].is_loose() {
            continue;
        }
        let pos = state.balls[bi].pos;
        let picker = state
            .players
            .iter()
            .find(|p| p.alive && !p.has_ball && distance(p.pos, pos) <= PICKUP_RADIUS)
            .map(|p| p.id as usize);
        let Some(pi) = picker else {
            continue;
        };

        state.balls[bi].attach(&state.players[pi]);
        state.players[pi].has_ball = true;
        state.particles.burst(pos, COLOR_PICKUP, Burst::PICKUP);
        picked += 1;
    }
    picked
}

/// Whether the match has ended under the configured mode
pub fn match_over(state: &MatchState) -> bool {
    let human_dead = state.human().is_none_or(|h| !h.alive);
    if state.mode().respawns() {
        return human_dead;
    }
    let s = score(state);
    human_dead || s.left_alive == 0 || s.right_alive == 0
}

/// Victory iff the human's team still has living members
pub fn outcome(state: &MatchState) -> MatchOutcome {
    let team = state.human().map_or(Team::Left, |h| h.team);
    if state.alive_count(team) > 0 {
        MatchOutcome::Victory
    } else {
        MatchOutcome::Defeat
    }
}

/// Give the aura to the living player with the strictly highest streak of at
/// least `AURA_MIN_KILLS`. Equal streaks go to the lowest id.
pub fn update_aura(state: &mut MatchState) {
    let mut best: Option<(usize, u32)> = None;
    for (i, p) in state.players.iter().enumerate() {
        if p.alive && p.kills >= AURA_MIN_KILLS && best.is_none_or(|(_, k)| p.kills > k) {
            best = Some((i, p.kills));
        }
    }
    for (i, p) in state.players.iter_mut().enumerate() {
        p.aura = best.is_some_and(|(b, _)| b == i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MatchConfig, MatchMode};
    use crate::sim::ai::throw_ball;

    /// Match with the start grace already over
    fn started(team_size: u32, mode: MatchMode) -> MatchState {
        let mut state = MatchState::new(&MatchConfig::new(team_size, mode)).unwrap();
        state.clock = SPAWN_GRACE_SECS + 1.0;
        state
    }

    /// Throw from `thrower` and place the ball touching `victim`
    fn hot_ball_on(state: &mut MatchState, thrower: PlayerId, victim: PlayerId) -> usize {
        let target = state.players[victim as usize].pos;
        assert!(throw_ball(state, thrower, target));
        let bi = thrower as usize;
        state.balls[bi].pos = target - Vec2::new(PLAYER_RADIUS, 0.0);
        bi
    }

    #[test]
    fn test_hit_eliminates_opponent() {
        let mut state = started(1, MatchMode::Rounds);
        let bi = hot_ball_on(&mut state, 0, 1);

        let kills = resolve_hits(&mut state);
        assert_eq!(
            kills,
            vec![KillEvent {
                killer: 0,
                victim: 1,
                ball: 0,
            }]
        );
        assert!(!state.players[1].alive);
        assert_eq!(state.players[1].hit_at, Some(state.clock));
        assert_eq!(state.players[1].respawn_at, None);
        assert_eq!(state.players[0].kills, 1);
        assert!(!state.balls[bi].just_thrown);
        assert_eq!(state.balls[bi].thrown_by, None);
        // Bounced back toward the thrower
        assert!(state.balls[bi].vel.x < 0.0);
        // Victim dropped its own ball
        assert_eq!(state.balls[1].owner, None);
        assert!(!state.players[1].has_ball);
    }

    #[test]
    fn test_teammate_contact_is_not_a_kill() {
        let mut state = started(2, MatchMode::Rounds);
        hot_ball_on(&mut state, 0, 1);
        assert!(resolve_hits(&mut state).is_empty());
        assert!(state.players[1].alive);
        assert_eq!(state.players[0].kills, 0);
        assert!(state.balls[0].just_thrown);
    }

    #[test]
    fn test_invulnerable_player_survives() {
        let mut state = started(1, MatchMode::Rounds);
        state.players[1].invulnerable_until = Some(state.clock + 1.0);
        hot_ball_on(&mut state, 0, 1);
        assert!(resolve_hits(&mut state).is_empty());
        assert!(state.players[1].alive);
    }

    #[test]
    fn test_double_hit_same_tick_counts_once() {
        let mut state = started(2, MatchMode::Rounds);
        // Both left players throw at right player 2
        hot_ball_on(&mut state, 0, 2);
        hot_ball_on(&mut state, 1, 2);

        let kills = resolve_hits(&mut state);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].victim, 2);
        assert_eq!(state.players[0].kills + state.players[1].kills, 1);
        // The second ball found no living target and stays hot
        assert!(state.balls[1].just_thrown);
    }

    #[test]
    fn test_dead_thrower_neutralizes_ball() {
        let mut state = started(1, MatchMode::Rounds);
        hot_ball_on(&mut state, 0, 1);
        state.players[0].alive = false;
        assert!(resolve_hits(&mut state).is_empty());
        assert!(state.players[1].alive);
        assert!(!state.balls[0].just_thrown);
    }

    #[test]
    fn test_streaks() {
        let mut state = started(2, MatchMode::Infinite);
        state.players[2].kills = 4;
        hot_ball_on(&mut state, 0, 2);
        resolve_hits(&mut state);
        assert_eq!(state.players[2].kills, 0);
        assert_eq!(state.players[0].kills, 1);
        assert_eq!(state.players[1].kills, 0);
        assert_eq!(state.players[3].kills, 0);
    }

    #[test]
    fn test_pickup_no_team_restriction() {
        let mut state = started(1, MatchMode::Rounds);
        // Right player throws its ball away, then a neutral ball lands next to it
        state.balls[1].owner = None;
        state.players[1].has_ball = false;
        state.balls[0].owner = None;
        state.players[0].has_ball = false;
        state.balls[0].pos = state.players[1].pos + Vec2::new(10.0, 0.0);
        state.balls[1].pos = Vec2::new(400.0, 20.0);

        assert_eq!(resolve_pickups(&mut state), 1);
        assert_eq!(state.balls[0].owner, Some(1));
        assert!(state.players[1].has_ball);
        assert_eq!(state.balls[0].pos, state.players[1].pos);
    }

    #[test]
    fn test_hot_ball_cannot_be_picked_up() {
        let mut state = started(2, MatchMode::Rounds);
        hot_ball_on(&mut state, 0, 1);
        state.players[1].has_ball = false;
        state.balls[1].owner = None;
        state.balls[1].pos = Vec2::new(400.0, 20.0);
        resolve_pickups(&mut state);
        assert_eq!(state.balls[0].owner, None);
    }

    #[test]
    fn test_respawn_schedule() {
        let mut state = started(1, MatchMode::Infinite);
        hot_ball_on(&mut state, 0, 1);
        resolve_hits(&mut state);
        let due = state.players[1].respawn_at.unwrap();
        assert!((due - (state.clock + RESPAWN_SECS)).abs() < 1e-9);

        state.clock = due - 0.01;
        assert!(process_respawns(&mut state).is_empty());
        assert!(!state.players[1].alive);

        state.players[1].pos = Vec2::new(700.0, 30.0);
        state.clock = due;
        assert_eq!(process_respawns(&mut state), vec![1]);
        let p = &state.players[1];
        assert!(p.alive);
        assert!(!p.has_ball);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.pos, spawn_point(Team::Right, 0, 1));
        assert!(p.is_invulnerable(state.clock));
    }

    #[test]
    fn test_match_over_rules() {
        let mut state = started(2, MatchMode::Rounds);
        assert!(!match_over(&state));
        state.players[2].alive = false;
        state.players[3].alive = false;
        assert!(match_over(&state));
        assert_eq!(outcome(&state), MatchOutcome::Victory);

        let mut state = started(2, MatchMode::Rounds);
        state.players[0].alive = false;
        assert!(match_over(&state));
        // Human's teammate is still standing
        assert_eq!(outcome(&state), MatchOutcome::Victory);

        let mut state = started(2, MatchMode::Infinite);
        state.players[2].alive = false;
        state.players[3].alive = false;
        assert!(!match_over(&state));
        state.players[0].alive = false;
        state.players[1].alive = false;
        assert!(match_over(&state));
        assert_eq!(outcome(&state), MatchOutcome::Defeat);
    }

    #[test]
    fn test_aura_goes_to_top_streak() {
        let mut state = started(2, MatchMode::Infinite);
        state.players[1].kills = AURA_MIN_KILLS;
        state.players[2].kills = AURA_MIN_KILLS;
        update_aura(&mut state);
        assert!(state.players[1].aura);
        assert!(!state.players[2].aura);

        state.players[2].kills = AURA_MIN_KILLS + 1;
        update_aura(&mut state);
        assert!(!state.players[1].aura);
        assert!(state.players[2].aura);

        state.players[2].alive = false;
        state.players[1].kills = AURA_MIN_KILLS - 1;
        update_aura(&mut state);
        assert!(state.players.iter().all(|p| !p.aura));
    }

    #[test]
    fn test_score_counts_living() {
        let mut state = started(3, MatchMode::Rounds);
        state.players[4].alive = false;
        let s = score(&state);
        assert_eq!(s.alive(Team::Left), 3);
        assert_eq!(s.alive(Team::Right), 2);
    }
}
