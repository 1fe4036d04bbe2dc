//! Fixed timestep simulation tick
//!
//! One call runs a full step to completion, in a fixed order:
//! respawns, queued throws, player motion, ball physics, hits and pickups,
//! bot decisions for the next tick, particles, aura and win check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{self, Rolls, apply_bot_throws, throw_ball, update_bots};
use super::ball::update_balls;
use super::combat::{
    KillEvent, match_over, outcome, process_respawns, resolve_hits, resolve_pickups, update_aura,
};
use super::motion::{Steering, update_players};
use super::state::{GamePhase, MatchOutcome, MatchState, PlayerId};

/// Autopilot throws at most once per this many ticks
const AUTOPILOT_THROW_TICKS: u64 = 40;

/// Human input for a single tick, sampled at tick start (last value wins)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering target or velocity; `Steering::None` decelerates to rest
    pub steering: Steering,
    /// Throw request; ignored unless the human holds a ball
    pub throw_at: Option<Vec2>,
    /// Demo mode - the bot brain drives the human
    pub autopilot: bool,
}

/// What happened during a tick (or a frame of ticks)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub kills: Vec<KillEvent>,
    pub respawned: Vec<PlayerId>,
    /// Set on the tick the match ended
    pub ended: Option<MatchOutcome>,
}

impl TickReport {
    pub fn merge(&mut self, other: TickReport) {
        self.kills.extend(other.kills);
        self.respawned.extend(other.respawned);
        if other.ended.is_some() {
            self.ended = other.ended;
        }
    }
}

/// Human input derived from the bot brain, without reaction delay
fn autopilot_input(state: &mut MatchState) -> TickInput {
    let Some(human) = state.human_id() else {
        return TickInput::default();
    };
    let mut perception = ai::perceive(state, human);
    perception.throw_ready = state.time_ticks % AUTOPILOT_THROW_TICKS == 0;
    let rolls = Rolls::draw(&mut state.rng);
    let intent = ai::intent_for(ai::choose_state(&perception), &perception, &rolls);
    TickInput {
        steering: intent.steering,
        throw_at: intent.throw_at,
        autopilot: true,
    }
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();
    if state.phase == GamePhase::Over {
        return report;
    }

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.clock += dt as f64;

    report.respawned = process_respawns(state);

    if let (Some(target), Some(human)) = (input.throw_at, state.human_id()) {
        throw_ball(state, human, target);
    }
    apply_bot_throws(state);

    update_players(state, input.steering, dt);
    update_balls(state, dt);
    report.kills = resolve_hits(state);
    resolve_pickups(state);
    update_bots(state);
    state.particles.update(dt);
    update_aura(state);

    if match_over(state) {
        let result = outcome(state);
        state.phase = GamePhase::Over;
        state.outcome = Some(result);
        report.ended = Some(result);
        log::info!(
            "Match over after {} ticks ({:.1}s): {:?}",
            state.time_ticks,
            state.clock,
            result
        );
    }

    report
}
