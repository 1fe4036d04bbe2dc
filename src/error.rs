use thiserror::Error;

use crate::consts::{MAX_NICKNAME_LEN, MAX_TEAM_SIZE};

/// Rejected match configuration. Raised before a match starts, never mid-simulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Team size must be between 1 and {max}, got {got}", max = MAX_TEAM_SIZE)]
    TeamSize { got: u32 },

    #[error("Nickname must not be empty")]
    EmptyNickname,

    #[error("Nickname is {len} characters, limit is {max}", max = MAX_NICKNAME_LEN)]
    NicknameTooLong { len: usize },

    #[error("Invalid config JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
