// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout session models for event intake and storage.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Payload for a newly logged workout session.
///
/// Produced by the session-logging subsystem after the session has been
/// durably recorded, and consumed by
/// [`crate::services::SessionProcessor::apply_session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Session ID assigned by the session logger
    pub session_id: u64,
    /// Calendar date of the session (required)
    pub session_date: Option<NaiveDate>,
    /// Time of day the session started, if recorded
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Total weight moved across all sets, in kilograms.
    /// Zero for bodyweight-only sessions.
    pub total_weight_kg: f64,
}

impl SessionEvent {
    /// Validate the payload, returning the session date.
    ///
    /// Rejection happens before any mutation: an event that fails here
    /// leaves no trace in the store.
    pub fn validate(&self) -> Result<NaiveDate> {
        let date = self
            .session_date
            .ok_or_else(|| AppError::InvalidInput("session_date is required".to_string()))?;

        if !self.total_weight_kg.is_finite() {
            return Err(AppError::InvalidInput(
                "total_weight_kg must be a finite number".to_string(),
            ));
        }
        if self.total_weight_kg < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "total_weight_kg must be non-negative, got {}",
                self.total_weight_kg
            )));
        }

        Ok(date)
    }
}

/// Stored session record, one document per logged session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Session ID (also used as document ID)
    pub session_id: u64,
    /// Owning user ID
    pub user_id: u64,
    /// Calendar date of the session
    pub session_date: NaiveDate,
    /// Time of day the session started, if recorded
    pub start_time: Option<NaiveTime>,
    /// Total weight moved, in kilograms
    pub total_weight_kg: f64,
    /// When this session was folded into the aggregates (ISO 8601)
    pub processed_at: String,
}
