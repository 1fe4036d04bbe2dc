//! Match configuration
//!
//! Accepted once at match start. Validated before any state is built, so the
//! simulation itself never sees a malformed roster.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_NICKNAME_LEN, MAX_TEAM_SIZE};
use crate::error::ConfigError;

/// How a match ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchMode {
    /// No respawns; ends when a team is wiped out or the human dies
    #[default]
    Rounds,
    /// Dead players respawn; ends only when the human dies
    Infinite,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Rounds => "Rounds",
            MatchMode::Infinite => "Infinite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rounds" | "round" | "fixed" => Some(MatchMode::Rounds),
            "infinite" | "endless" => Some(MatchMode::Infinite),
            _ => None,
        }
    }

    pub fn respawns(&self) -> bool {
        *self == MatchMode::Infinite
    }
}

/// Configuration surface for starting a match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Players per team, including the human on the left team
    pub team_size: u32,
    pub mode: MatchMode,
    /// Human nickname (cosmetic only)
    pub nickname: String,
    /// Avatar resource reference (cosmetic only, never loaded here)
    pub avatar: Option<String>,
    /// RNG seed for roster jitter and bot decisions
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            team_size: 3,
            mode: MatchMode::Rounds,
            nickname: "Player".to_string(),
            avatar: None,
            seed: 0x00D0_D6E0,
        }
    }
}

impl MatchConfig {
    /// Config with the given team size and mode, defaults elsewhere
    pub fn new(team_size: u32, mode: MatchMode) -> Self {
        Self {
            team_size,
            mode,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_size == 0 || self.team_size > MAX_TEAM_SIZE as u32 {
            return Err(ConfigError::TeamSize {
                got: self.team_size,
            });
        }
        let len = self.nickname.trim().chars().count();
        if len == 0 {
            return Err(ConfigError::EmptyNickname);
        }
        if len > MAX_NICKNAME_LEN {
            return Err(ConfigError::NicknameTooLong { len });
        }
        Ok(())
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded match config: {} per team, {} mode",
            config.team_size,
            config.mode.as_str()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}
