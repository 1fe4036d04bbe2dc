//! Match state and core simulation types
//!
//! `MatchState` is the single owner of every player, ball and particle. Phase
//! functions borrow it for one call and never keep a handle across ticks.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::Intent;
use super::particles::ParticleSystem;
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::{MatchConfig, MatchMode};

/// Dense player id: equals the player's slot in `MatchState::players`
pub type PlayerId = u32;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Match ended; further ticks are no-ops
    Over,
}

/// Result of a finished match, from the human's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Human's team, occupies x < ARENA_WIDTH / 2
    Left,
    Right,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Left => Team::Right,
            Team::Right => Team::Left,
        }
    }

    /// Team color (packed 0xRRGGBB), used for particles
    pub fn color(self) -> u32 {
        match self {
            Team::Left => 0x3FA9F5,
            Team::Right => 0xF5563F,
        }
    }

    /// Horizontal bounds of this team's half for a body of the given radius
    pub fn x_bounds(self, radius: f32) -> (f32, f32) {
        let mid = ARENA_WIDTH / 2.0;
        match self {
            Team::Left => (radius, mid - radius),
            Team::Right => (mid + radius, ARENA_WIDTH - radius),
        }
    }
}

/// Bot behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Attack,
    Evade,
}

/// Trail point for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Maximum number of trail points stored per ball
pub const TRAIL_LENGTH: usize = 20;

/// Push a point to the front of a bounded trail, dropping the oldest
fn push_trail(trail: &mut VecDeque<TrailPoint>, point: TrailPoint, cap: usize) {
    trail.push_front(point);
    if trail.len() > cap {
        trail.pop_back();
    }
}

/// A player (human or bot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team: Team,
    /// Slot within the team, used for the spawn point
    pub index: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    pub is_human: bool,
    pub has_ball: bool,
    /// Current kill streak; zeroed on death
    pub kills: u32,
    /// Speed buff held by the top streak
    pub aura: bool,

    pub ai_state: AiState,
    /// Ticks until the bot re-evaluates its state
    pub ai_timer: u32,
    /// Ticks a ball must be held before the bot throws it
    pub throw_delay: u32,
    /// Steering and throw intent for the next tick (bots only)
    #[serde(skip)]
    pub intent: Intent,

    /// Sim-clock time of the scheduled respawn. Only set while dead in infinite mode.
    pub respawn_at: Option<f64>,
    /// Sim-clock time the spawn grace ends
    pub invulnerable_until: Option<f64>,
    /// Sim-clock time of the last hit, for the hit flash
    pub hit_at: Option<f64>,

    /// Cosmetic state, never read by gameplay
    pub scale: f32,
    pub rotation: f32,
    /// Death animation progress (0 = none, 1 = finished)
    pub death_anim: f32,
    #[serde(skip)]
    pub trail: VecDeque<TrailPoint>,
    pub nickname: String,
    pub avatar: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, team: Team, index: u32, pos: Vec2) -> Self {
        Self {
            id,
            team,
            index,
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            alive: true,
            is_human: false,
            has_ball: false,
            kills: 0,
            aura: false,
            ai_state: AiState::Idle,
            ai_timer: 0,
            throw_delay: THROW_DELAY_MIN_TICKS,
            intent: Intent::default(),
            respawn_at: None,
            invulnerable_until: None,
            hit_at: None,
            scale: 1.0,
            rotation: 0.0,
            death_anim: 0.0,
            trail: VecDeque::with_capacity(PLAYER_TRAIL_LENGTH),
            nickname: String::new(),
            avatar: None,
        }
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        self.invulnerable_until.is_some_and(|t| now < t)
    }

    pub fn is_flashing(&self, now: f64) -> bool {
        self.hit_at.is_some_and(|t| now - t < HIT_FLASH_SECS)
    }

    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        push_trail(
            &mut self.trail,
            TrailPoint {
                pos: self.pos,
                speed,
            },
            PLAYER_TRAIL_LENGTH,
        );
    }

    /// Put the player back at its spawn point, alive and empty-handed
    pub fn respawn(&mut self, spawn: Vec2, grace_until: f64) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.alive = true;
        self.has_ball = false;
        self.respawn_at = None;
        self.invulnerable_until = Some(grace_until);
        self.ai_state = AiState::Idle;
        self.intent = Intent::default();
        self.scale = 0.0;
        self.death_anim = 0.0;
        self.trail.clear();
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Holder, if any. An owned ball never moves on its own.
    pub owner: Option<PlayerId>,
    /// In the lethal flight window
    pub just_thrown: bool,
    /// Thrower, only meaningful while `just_thrown`
    pub thrown_by: Option<PlayerId>,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: VecDeque<TrailPoint>,
}

impl Ball {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            owner: None,
            just_thrown: false,
            thrown_by: None,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Free and lethal
    pub fn is_hot(&self) -> bool {
        self.owner.is_none() && self.just_thrown
    }

    /// Free and neutral: can be picked up by anybody
    pub fn is_loose(&self) -> bool {
        self.owner.is_none() && !self.just_thrown
    }

    /// End the lethal flight window
    pub fn neutralize(&mut self) {
        self.just_thrown = false;
        self.thrown_by = None;
    }

    /// Record current position to trail (call each tick when free)
    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        push_trail(
            &mut self.trail,
            TrailPoint {
                pos: self.pos,
                speed,
            },
            TRAIL_LENGTH,
        );
    }

    /// Clear trail (on throw/pickup)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Attach to a holder: rigid follow, no velocity, not lethal
    pub fn attach(&mut self, owner: &Player) {
        self.owner = Some(owner.id);
        self.pos = owner.pos;
        self.vel = Vec2::ZERO;
        self.neutralize();
        self.clear_trail();
    }
}

/// Spawn point for a team slot: a column at the middle of the team's half,
/// slots spread evenly top to bottom
pub fn spawn_point(team: Team, index: u32, team_size: u32) -> Vec2 {
    let x = match team {
        Team::Left => ARENA_WIDTH * 0.25,
        Team::Right => ARENA_WIDTH * 0.75,
    };
    let y = ARENA_HEIGHT * (index + 1) as f32 / (team_size + 1) as f32;
    Vec2::new(x, y)
}

/// Random value in an inclusive tick range
pub fn roll_ticks(rng: &mut Pcg32, min: u32, max: u32) -> u32 {
    rng.random_range(min..=max)
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub config: MatchConfig,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock (seconds), basis for respawn, grace and flash timers
    pub clock: f64,
    pub phase: GamePhase,
    pub outcome: Option<MatchOutcome>,
    /// Indexed by `PlayerId`; left team first
    pub players: Vec<Player>,
    /// One per player, ids match the player that started with it
    pub balls: Vec<Ball>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    /// Gameplay RNG (bot decisions)
    pub rng: Pcg32,
}

impl MatchState {
    /// Build a fresh match from a validated config
    pub fn new(config: &MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            config: config.clone(),
            time_ticks: 0,
            clock: 0.0,
            phase: GamePhase::Playing,
            outcome: None,
            players: Vec::new(),
            balls: Vec::new(),
            particles: ParticleSystem::new(config.seed),
            rng: Pcg32::seed_from_u64(config.seed),
        };
        state.build_roster();
        Ok(state)
    }

    /// Rebuild roster and balls from a (possibly different) config
    pub fn reset(&mut self, config: &MatchConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    fn build_roster(&mut self) {
        let n = self.config.team_size;
        let grace = self.clock + SPAWN_GRACE_SECS;

        for team in [Team::Left, Team::Right] {
            for index in 0..n {
                let id = self.players.len() as PlayerId;
                let mut player = Player::new(id, team, index, spawn_point(team, index, n));
                player.invulnerable_until = Some(grace);
                player.ai_timer =
                    roll_ticks(&mut self.rng, REACTION_MIN_TICKS, REACTION_MAX_TICKS);
                player.throw_delay =
                    roll_ticks(&mut self.rng, THROW_DELAY_MIN_TICKS, THROW_DELAY_MAX_TICKS);
                if team == Team::Left && index == 0 {
                    player.is_human = true;
                    player.nickname = self.config.nickname.clone();
                    player.avatar = self.config.avatar.clone();
                } else {
                    player.nickname = format!("Bot {}", id);
                }

                let mut ball = Ball::new(id);
                ball.attach(&player);
                player.has_ball = true;

                self.players.push(player);
                self.balls.push(ball);
            }
        }

        log::info!(
            "Match ready: {} players, {} mode, seed {}",
            self.players.len(),
            self.config.mode.as_str(),
            self.config.seed
        );
    }

    pub fn mode(&self) -> MatchMode {
        self.config.mode
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id as usize)
    }

    pub fn human(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_human)
    }

    pub fn human_id(&self) -> Option<PlayerId> {
        self.human().map(|p| p.id)
    }

    pub fn alive_count(&self, team: Team) -> usize {
        self.players
            .iter()
            .filter(|p| p.alive && p.team == team)
            .count()
    }

    /// Ball currently held by a player
    pub fn ball_of(&self, id: PlayerId) -> Option<usize> {
        self.balls.iter().position(|b| b.owner == Some(id))
    }

    pub fn spawn_point_of(&self, id: PlayerId) -> Option<Vec2> {
        self.player(id)
            .map(|p| spawn_point(p.team, p.index, self.config.team_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_layout() {
        let state = MatchState::new(&MatchConfig::new(3, MatchMode::Rounds)).unwrap();
        assert_eq!(state.players.len(), 6);
        assert_eq!(state.balls.len(), 6);
        assert_eq!(state.players.iter().filter(|p| p.is_human).count(), 1);

        for (i, p) in state.players.iter().enumerate() {
            assert_eq!(p.id as usize, i);
            assert!(p.has_ball);
            let (min_x, max_x) = p.team.x_bounds(p.radius);
            assert!(p.pos.x >= min_x && p.pos.x <= max_x);
        }
        for ball in &state.balls {
            let owner = ball.owner.unwrap();
            assert_eq!(ball.pos, state.players[owner as usize].pos);
            assert_eq!(ball.vel, Vec2::ZERO);
        }
        assert_eq!(state.human().unwrap().team, Team::Left);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(MatchState::new(&MatchConfig::new(0, MatchMode::Rounds)).is_err());
    }

    #[test]
    fn test_reset_is_deterministic() {
        let cfg = MatchConfig::new(2, MatchMode::Infinite).with_seed(42);
        let a = MatchState::new(&cfg).unwrap();
        let mut b = MatchState::new(&MatchConfig::new(4, MatchMode::Rounds)).unwrap();
        b.reset(&cfg).unwrap();

        assert_eq!(a.players.len(), b.players.len());
        for (pa, pb) in a.players.iter().zip(&b.players) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.throw_delay, pb.throw_delay);
            assert_eq!(pa.ai_timer, pb.ai_timer);
        }
        assert_eq!(b.mode(), MatchMode::Infinite);
    }

    #[test]
    fn test_start_grace() {
        let state = MatchState::new(&MatchConfig::default()).unwrap();
        assert!(state.players.iter().all(|p| p.is_invulnerable(0.0)));
        assert!(
            state
                .players
                .iter()
                .all(|p| !p.is_invulnerable(SPAWN_GRACE_SECS))
        );
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut ball = Ball::new(0);
        for i in 0..(TRAIL_LENGTH + 5) {
            ball.pos = Vec2::new(i as f32, 0.0);
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        assert_eq!(ball.trail[0].pos.x, (TRAIL_LENGTH + 4) as f32);
    }
}
