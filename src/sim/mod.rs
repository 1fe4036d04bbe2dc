//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity id)
//! - No rendering or platform dependencies

pub mod ai;
pub mod ball;
pub mod collision;
pub mod combat;
pub mod motion;
pub mod particles;
pub mod snapshot;
pub mod state;
pub mod stepper;
pub mod tick;

pub use ai::{Decision, Intent, Perception, Rolls, decide, throw_ball};
pub use collision::{CollisionResult, circle_collision, elastic_impulse};
pub use combat::{KillEvent, ScoreSnapshot};
pub use motion::Steering;
pub use particles::{Particle, ParticleSystem};
pub use snapshot::{BallView, MatchSnapshot, ParticleView, PlayerView};
pub use state::{
    AiState, Ball, GamePhase, MatchOutcome, MatchState, Player, PlayerId, Team, TRAIL_LENGTH,
};
pub use stepper::FixedStepper;
pub use tick::{TickInput, TickReport, tick};
