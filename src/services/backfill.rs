// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk import of historical sessions.
//!
//! Used by operational scripts to seed aggregates from an exported
//! session history. Events are grouped per user and replayed oldest-first
//! so streaks come out the same as if the sessions had been logged live;
//! independent users are imported concurrently.

use std::collections::HashMap;

use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::SessionEvent;
use crate::services::SessionProcessor;

/// One record in an exported session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillRecord {
    /// Owning user ID
    pub user_id: u64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Outcome of a bulk import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Sessions folded into aggregates
    pub imported: usize,
    /// Events rejected or failed; each one is logged
    pub failed: usize,
}

/// Imports batches of historical session events.
pub struct BackfillService<'a> {
    processor: &'a SessionProcessor,
    max_concurrent_users: usize,
}

impl<'a> BackfillService<'a> {
    pub fn new(processor: &'a SessionProcessor, config: &Config) -> Self {
        Self {
            processor,
            max_concurrent_users: config.max_concurrent_imports,
        }
    }

    /// Parse an exported JSON array of session records and import it.
    pub async fn import_json(&self, payload: &str) -> Result<ImportSummary> {
        let records: Vec<BackfillRecord> = serde_json::from_str(payload)
            .map_err(|e| AppError::InvalidInput(format!("Malformed session export: {}", e)))?;

        Ok(self.import_records(records).await)
    }

    /// Import session records, grouped per user.
    ///
    /// Events for one user are applied oldest-first; different users are
    /// imported concurrently with a bounded number in flight. A failed
    /// event is logged and counted, never silently dropped.
    pub async fn import_records(&self, records: Vec<BackfillRecord>) -> ImportSummary {
        let mut by_user: HashMap<u64, Vec<SessionEvent>> = HashMap::new();
        for record in records {
            by_user.entry(record.user_id).or_default().push(record.event);
        }

        let user_count = by_user.len();
        let processor = self.processor;

        let summaries = stream::iter(by_user)
            .map(|(user_id, mut events)| async move {
                events.sort_by_key(|e| (e.session_date, e.start_time));

                let mut summary = ImportSummary::default();
                for event in &events {
                    match processor.apply_session(user_id, event).await {
                        Ok(_) => summary.imported += 1,
                        Err(err) => {
                            tracing::warn!(
                                user_id,
                                session_id = event.session_id,
                                error = %err,
                                "Skipping session during import"
                            );
                            summary.failed += 1;
                        }
                    }
                }
                summary
            })
            .buffer_unordered(self.max_concurrent_users)
            .collect::<Vec<_>>()
            .await;

        let mut total = ImportSummary::default();
        for summary in summaries {
            total.imported += summary.imported;
            total.failed += summary.failed;
        }

        tracing::info!(
            users = user_count,
            imported = total.imported,
            failed = total.failed,
            "Backfill import complete"
        );

        total
    }
}
