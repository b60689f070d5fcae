// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use workout_stats::config::Config;
use workout_stats::db::StatsDb;
use workout_stats::models::SessionEvent;
use workout_stats::services::SessionProcessor;

/// Create a processor backed by a fresh in-memory database.
#[allow(dead_code)]
pub fn test_processor() -> SessionProcessor {
    SessionProcessor::new(StatsDb::new(), &Config::default())
}

/// Create a processor sharing the given database.
#[allow(dead_code)]
pub fn test_processor_with_db(db: StatsDb) -> SessionProcessor {
    SessionProcessor::new(db, &Config::default())
}

/// Build a session event for the given ISO date.
#[allow(dead_code)]
pub fn event(session_id: u64, date: &str, weight: f64) -> SessionEvent {
    SessionEvent {
        session_id,
        session_date: Some(date.parse().expect("valid date")),
        start_time: None,
        total_weight_kg: weight,
    }
}

/// Build a session event with a start time.
#[allow(dead_code)]
pub fn timed_event(session_id: u64, date: &str, time: &str, weight: f64) -> SessionEvent {
    SessionEvent {
        session_id,
        session_date: Some(date.parse().expect("valid date")),
        start_time: Some(time.parse().expect("valid time")),
        total_weight_kg: weight,
    }
}
