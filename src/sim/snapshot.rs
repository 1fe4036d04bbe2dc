//! Read-only end-of-tick view for the renderer and HUD

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::{self, ScoreSnapshot};
use super::state::{AiState, GamePhase, MatchOutcome, MatchState, PlayerId, Team};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub team: Team,
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub alive: bool,
    pub is_human: bool,
    pub has_ball: bool,
    pub aura: bool,
    /// Inside the hit flash window
    pub flashing: bool,
    pub invulnerable: bool,
    pub ai_state: AiState,
    pub kills: u32,
    pub nickname: String,
    pub avatar: Option<String>,
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub owner: Option<PlayerId>,
    /// In the lethal flight window
    pub hot: bool,
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    /// Remaining life fraction (0-1)
    pub life: f32,
    pub color: u32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub clock: f64,
    pub phase: GamePhase,
    pub outcome: Option<MatchOutcome>,
    pub score: ScoreSnapshot,
    pub players: Vec<PlayerView>,
    pub balls: Vec<BallView>,
    pub particles: Vec<ParticleView>,
}

impl MatchState {
    pub fn score(&self) -> ScoreSnapshot {
        combat::score(self)
    }

    /// Snapshot of the state between ticks
    pub fn snapshot(&self) -> MatchSnapshot {
        let now = self.clock;
        MatchSnapshot {
            tick: self.time_ticks,
            clock: now,
            phase: self.phase,
            outcome: self.outcome,
            score: self.score(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    team: p.team,
                    pos: p.pos,
                    rotation: p.rotation,
                    scale: p.scale,
                    alive: p.alive,
                    is_human: p.is_human,
                    has_ball: p.has_ball,
                    aura: p.aura,
                    flashing: p.is_flashing(now),
                    invulnerable: p.is_invulnerable(now),
                    ai_state: p.ai_state,
                    kills: p.kills,
                    nickname: p.nickname.clone(),
                    avatar: p.avatar.clone(),
                    trail: p.trail.iter().map(|t| t.pos).collect(),
                })
                .collect(),
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    id: b.id,
                    pos: b.pos,
                    owner: b.owner,
                    hot: b.is_hot(),
                    trail: b.trail.iter().map(|t| t.pos).collect(),
                })
                .collect(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    life: p.life.clamp(0.0, 1.0),
                    color: p.color,
                    size: p.size,
                })
                .collect(),
        }
    }
}
