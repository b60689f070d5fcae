// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Errors surfaced by the statistics updater.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed event payload, rejected before any mutation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A concurrent writer committed first and the caller's snapshot is
    /// stale. Retried internally with a fresh read.
    #[error("Write contention on stats for user {user_id}")]
    Contention { user_id: u64 },

    /// Commit retries were exhausted. The caller should retry the whole
    /// event.
    #[error("Conflict updating stats for user {user_id} after {attempts} attempts")]
    Conflict { user_id: u64, attempts: u32 },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the failed operation can be repeated against a fresh
    /// snapshot of the stats document.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Contention { .. })
    }
}

/// Result type alias for the updater
pub type Result<T> = std::result::Result<T, AppError>;
