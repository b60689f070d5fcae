// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session processing service.
//!
//! Handles the core workflow:
//! 1. Validate the incoming session event
//! 2. Read the user's current stats aggregate with its version
//! 3. Resolve the weekend-pair check against the session store
//! 4. Fold the session into the aggregates
//! 5. Commit session and stats atomically, retrying on contention

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::config::Config;
use crate::db::StatsDb;
use crate::error::{AppError, Result};
use crate::models::{SessionEvent, UserStatistics, WeekendPair, WorkoutSession};
use crate::time_utils;

/// Apply workout-session events to per-user statistics aggregates.
pub struct SessionProcessor {
    db: StatsDb,
    max_commit_attempts: u32,
}

impl SessionProcessor {
    pub fn new(db: StatsDb, config: &Config) -> Self {
        Self {
            db,
            max_commit_attempts: config.max_commit_attempts,
        }
    }

    /// Process a newly logged session for a user.
    ///
    /// Called once per durably recorded session. The call is additive:
    /// replaying the same event counts the session again, so the
    /// session-logging collaborator must invoke it exactly once.
    ///
    /// The stats document is created on demand for first-time users.
    /// Returns the aggregates as committed.
    pub async fn apply_session(
        &self,
        user_id: u64,
        event: &SessionEvent,
    ) -> Result<UserStatistics> {
        let date = event.validate()?;

        for attempt in 1..=self.max_commit_attempts {
            let (mut stats, version) = self.db.read_stats_versioned(user_id).await?;
            let weekend = self.weekend_pair(user_id, date).await?;

            let now = time_utils::format_utc_rfc3339(chrono::Utc::now());
            let session = WorkoutSession {
                session_id: event.session_id,
                user_id,
                session_date: date,
                start_time: event.start_time,
                total_weight_kg: event.total_weight_kg,
                processed_at: now.clone(),
            };

            stats.update_from_session(&session, weekend, &now);

            match self
                .db
                .commit_session_atomic(user_id, version, &session, &stats)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        user_id,
                        session_id = event.session_id,
                        total_workouts = stats.total_workouts,
                        current_streak = stats.current_streak,
                        "Session processed"
                    );
                    return Ok(stats);
                }
                Err(err) if err.is_retryable() => {
                    tracing::debug!(user_id, attempt, "Stats commit contention, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::Conflict {
            user_id,
            attempts: self.max_commit_attempts,
        })
    }

    /// Remove a logged session and rebuild the user's aggregates.
    ///
    /// Returns `true` if a session record was removed.
    ///
    /// Deletes are rare, so a full recomputation from the remaining
    /// history is preferred over trying to decrement streak fields.
    pub async fn remove_session(&self, user_id: u64, session_id: u64) -> Result<bool> {
        let removed = self.db.delete_session(user_id, session_id).await?;
        if removed {
            self.recompute_stats(user_id).await?;
            tracing::info!(user_id, session_id, "Session removed, stats rebuilt");
        }
        Ok(removed)
    }

    /// Rebuild the stats aggregate from the full session history.
    ///
    /// Sessions are replayed oldest-first, so the result matches what
    /// in-order live application would have produced.
    pub async fn recompute_stats(&self, user_id: u64) -> Result<UserStatistics> {
        let mut sessions = self.db.get_sessions_for_user(user_id).await?;
        sessions.sort_by_key(|s| (s.session_date, s.start_time));

        let now = time_utils::format_utc_rfc3339(chrono::Utc::now());
        let mut stats = UserStatistics::default();
        let mut seen_dates = HashSet::new();

        for session in &sessions {
            seen_dates.insert(session.session_date);
            let weekend = replay_weekend_pair(&seen_dates, session.session_date);
            stats.update_from_session(session, weekend, &now);
        }

        self.db.set_user_stats(user_id, &stats).await?;
        tracing::info!(user_id, sessions = sessions.len(), "Stats recomputed");

        Ok(stats)
    }

    /// Resolve the weekend-pair status for a session date.
    ///
    /// The session being applied covers its own day, so only the paired
    /// day needs to be checked against the store.
    async fn weekend_pair(&self, user_id: u64, date: NaiveDate) -> Result<WeekendPair> {
        let (Some(saturday), Some(paired)) = (
            time_utils::weekend_saturday(date),
            time_utils::paired_weekend_day(date),
        ) else {
            return Ok(WeekendPair::NotWeekend);
        };

        if self.db.has_session_on(user_id, paired).await? {
            Ok(WeekendPair::Complete { saturday })
        } else {
            Ok(WeekendPair::Incomplete)
        }
    }
}

/// Weekend-pair check used during replay, resolved against the dates
/// replayed so far instead of the live store.
fn replay_weekend_pair(seen_dates: &HashSet<NaiveDate>, date: NaiveDate) -> WeekendPair {
    let Some(saturday) = time_utils::weekend_saturday(date) else {
        return WeekendPair::NotWeekend;
    };

    match time_utils::paired_weekend_day(date) {
        Some(paired) if seen_dates.contains(&paired) => WeekendPair::Complete { saturday },
        _ => WeekendPair::Incomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn test_replay_weekend_pair_needs_both_days() {
        let mut seen = HashSet::from([date("2024-01-06")]);

        assert_eq!(
            replay_weekend_pair(&seen, date("2024-01-06")),
            WeekendPair::Incomplete
        );

        seen.insert(date("2024-01-07"));
        assert_eq!(
            replay_weekend_pair(&seen, date("2024-01-07")),
            WeekendPair::Complete {
                saturday: date("2024-01-06")
            }
        );
    }

    #[test]
    fn test_replay_weekend_pair_ignores_weekdays() {
        let seen = HashSet::from([date("2024-01-08"), date("2024-01-09")]);

        assert_eq!(
            replay_weekend_pair(&seen, date("2024-01-09")),
            WeekendPair::NotWeekend
        );
    }
}
