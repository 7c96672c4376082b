// src/errors.rs

//! Crate-wide error type.
//!
//! The workflow-level kinds (`Validation`, `StoreUnavailable`,
//! `CascadePartialFailure`, `NotFound`) are what callers branch on; the rest
//! are ambient failures from config loading and snapshot IO.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::engine::cascade::PendingCascade;

/// Kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Frame,
    Queen,
    Cycle,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Frame => "frame",
            EntityKind::Queen => "queen",
            EntityKind::Cycle => "cycle",
            EntityKind::Task => "task",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum RearingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The primary write went through but at least one dependent write did
    /// not. The primary write is **not** rolled back; `pending` holds the
    /// dependent writes still to apply.
    #[error("Write for {} applied but cascade failed: {reason}", .pending.origin)]
    CascadePartialFailure {
        pending: PendingCascade,
        reason: String,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RearingError {
    /// Whether the caller may retry after re-fetching.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RearingError::StoreUnavailable(_) | RearingError::CascadePartialFailure { .. }
        )
    }

    /// Message suitable for an end user.
    pub fn user_message(&self) -> String {
        match self {
            RearingError::Validation(msg) => format!("Action rejected: {msg}"),
            RearingError::NotFound { kind, .. } => {
                format!("Action rejected: the {kind} no longer exists")
            }
            RearingError::StoreUnavailable(_) | RearingError::CascadePartialFailure { .. } => {
                "Action partially applied, please retry".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RearingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_actions_are_not_retryable() {
        let err = RearingError::Validation("task is locked".into());
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "Action rejected: task is locked");

        let err = RearingError::NotFound {
            kind: EntityKind::Cycle,
            id: Uuid::nil(),
        };
        assert!(!err.is_retryable());
        assert!(err.user_message().contains("cycle"));
    }

    #[test]
    fn store_failures_ask_for_retry() {
        let err = RearingError::StoreUnavailable("connection reset".into());
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "Action partially applied, please retry");
    }
}
