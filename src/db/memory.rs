// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store with typed operations.
//!
//! Provides high-level operations for:
//! - Sessions (raw per-session records)
//! - User stats (one aggregate document per user)
//!
//! Stats commits carry the version the writer read; a commit against a
//! stale version writes nothing and fails with [`AppError::Contention`],
//! so the caller can re-read and retry. This gives the same lost-update
//! protection a document database provides through transactions.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::error::{AppError, Result};
use crate::models::{UserStatistics, WorkoutSession};

/// Per-user document holding the session records and the stats aggregate.
///
/// Everything for one user lives in a single map entry, so a commit is
/// atomic with respect to all other readers and writers of that user.
#[derive(Debug, Default)]
struct UserDoc {
    version: u64,
    stats: Option<UserStatistics>,
    sessions: Vec<WorkoutSession>,
}

/// In-memory stats database.
#[derive(Clone, Default)]
pub struct StatsDb {
    users: Arc<DashMap<u64, UserDoc>>,
}

impl StatsDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Stats Operations ────────────────────────────────────────

    /// Get the stats aggregate for a user, if one exists.
    pub async fn get_user_stats(&self, user_id: u64) -> Result<Option<UserStatistics>> {
        Ok(self.users.get(&user_id).and_then(|doc| doc.stats.clone()))
    }

    /// Read the stats aggregate together with its commit version.
    ///
    /// An absent row reads as a fresh default at version 0, so first-time
    /// users take the same commit path as existing ones.
    pub async fn read_stats_versioned(&self, user_id: u64) -> Result<(UserStatistics, u64)> {
        Ok(self
            .users
            .get(&user_id)
            .map(|doc| (doc.stats.clone().unwrap_or_default(), doc.version))
            .unwrap_or_default())
    }

    /// Replace the stats aggregate unconditionally.
    ///
    /// Used by the recompute path, which derives the aggregate from the
    /// full session history rather than from a prior snapshot.
    pub async fn set_user_stats(&self, user_id: u64, stats: &UserStatistics) -> Result<()> {
        let mut doc = self.users.entry(user_id).or_default();
        doc.version += 1;
        doc.stats = Some(stats.clone());
        Ok(())
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Whether the user has at least one session on the given date.
    pub async fn has_session_on(&self, user_id: u64, date: NaiveDate) -> Result<bool> {
        Ok(self
            .users
            .get(&user_id)
            .is_some_and(|doc| doc.sessions.iter().any(|s| s.session_date == date)))
    }

    /// All session records for a user (unordered).
    pub async fn get_sessions_for_user(&self, user_id: u64) -> Result<Vec<WorkoutSession>> {
        Ok(self
            .users
            .get(&user_id)
            .map(|doc| doc.sessions.clone())
            .unwrap_or_default())
    }

    /// Remove a session record. Returns `true` if a record was removed.
    pub async fn delete_session(&self, user_id: u64, session_id: u64) -> Result<bool> {
        let Some(mut doc) = self.users.get_mut(&user_id) else {
            return Ok(false);
        };

        let before = doc.sessions.len();
        doc.sessions.retain(|s| s.session_id != session_id);
        Ok(doc.sessions.len() < before)
    }

    // ─── Atomic Session Commit ───────────────────────────────────

    /// Atomically store a session record and the updated stats aggregate.
    ///
    /// `expected_version` must be the version returned by
    /// [`StatsDb::read_stats_versioned`]. If another writer committed in
    /// between, nothing is written and [`AppError::Contention`] is
    /// returned so the caller can retry against fresh state.
    pub async fn commit_session_atomic(
        &self,
        user_id: u64,
        expected_version: u64,
        session: &WorkoutSession,
        stats: &UserStatistics,
    ) -> Result<()> {
        let mut doc = self.users.entry(user_id).or_default();

        if doc.version != expected_version {
            return Err(AppError::Contention { user_id });
        }

        doc.version += 1;
        doc.sessions.push(session.clone());
        doc.stats = Some(stats.clone());

        tracing::debug!(
            user_id,
            session_id = session.session_id,
            version = doc.version,
            "Session committed"
        );

        Ok(())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL data for a user.
    ///
    /// Returns the number of documents deleted (session records plus the
    /// stats aggregate, when present).
    pub async fn delete_user_data(&self, user_id: u64) -> Result<usize> {
        let Some((_, doc)) = self.users.remove(&user_id) else {
            return Ok(0);
        };

        let deleted_count = doc.sessions.len() + usize::from(doc.stats.is_some());
        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(id: u64, user_id: u64, date: &str) -> WorkoutSession {
        WorkoutSession {
            session_id: id,
            user_id,
            session_date: date.parse().expect("valid date"),
            start_time: None,
            total_weight_kg: 50.0,
            processed_at: "2024-01-15T12:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_absent_row_reads_as_default_version_zero() {
        let db = StatsDb::new();

        let (stats, version) = db.read_stats_versioned(42).await.unwrap();

        assert_eq!(version, 0);
        assert_eq!(stats.total_workouts, 0);
        assert!(db.get_user_stats(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_version() {
        let db = StatsDb::new();
        let session = make_session(1, 42, "2024-01-15");
        let stats = UserStatistics::default();

        db.commit_session_atomic(42, 0, &session, &stats)
            .await
            .unwrap();

        let err = db
            .commit_session_atomic(42, 0, &make_session(2, 42, "2024-01-16"), &stats)
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(db.get_sessions_for_user(42).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_has_session_on() {
        let db = StatsDb::new();
        let session = make_session(1, 42, "2024-01-15");

        db.commit_session_atomic(42, 0, &session, &UserStatistics::default())
            .await
            .unwrap();

        assert!(db.has_session_on(42, "2024-01-15".parse().unwrap()).await.unwrap());
        assert!(!db.has_session_on(42, "2024-01-16".parse().unwrap()).await.unwrap());
        assert!(!db.has_session_on(7, "2024-01-15".parse().unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_session_removes_record() {
        let db = StatsDb::new();

        db.commit_session_atomic(42, 0, &make_session(1, 42, "2024-01-15"), &UserStatistics::default())
            .await
            .unwrap();

        assert!(db.delete_session(42, 1).await.unwrap());
        assert!(!db.delete_session(42, 1).await.unwrap());
        assert!(db.get_sessions_for_user(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_data_counts_documents() {
        let db = StatsDb::new();

        db.commit_session_atomic(42, 0, &make_session(1, 42, "2024-01-15"), &UserStatistics::default())
            .await
            .unwrap();
        db.commit_session_atomic(42, 1, &make_session(2, 42, "2024-01-16"), &UserStatistics::default())
            .await
            .unwrap();

        // Two session records plus the stats aggregate
        assert_eq!(db.delete_user_data(42).await.unwrap(), 3);
        assert_eq!(db.delete_user_data(42).await.unwrap(), 0);
    }
}
