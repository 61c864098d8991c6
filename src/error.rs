//! Crate error type
//!
//! The simulation itself has no recoverable failures: pools grow instead of
//! running dry and bad collision targets are ignored. What remains are
//! collaborator failures and bad configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The factory behind a pool could not produce a new object
    #[error("failed to instantiate {kind} for pool slot {slot}: {reason}")]
    Instantiate {
        kind: String,
        slot: usize,
        reason: String,
    },

    #[error("spawner has no spawn points")]
    NoSpawnPoints,

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("tuning parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tuning read error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn instantiate(kind: impl std::fmt::Debug, slot: usize, reason: impl Into<String>) -> Self {
        Self::Instantiate {
            kind: format!("{kind:?}"),
            slot,
            reason: reason.into(),
        }
    }
}
