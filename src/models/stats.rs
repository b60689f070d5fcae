//! User statistics aggregates for trophy evaluation.
//!
//! These aggregates are updated incrementally as sessions are logged,
//! reducing trophy condition checks from O(sessions) to O(1).

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::WorkoutSession;

/// Outcome of the weekend-pair check for a session date.
///
/// Completing a weekend requires knowing whether the paired day already
/// has a session, which only the session store can answer. The caller
/// resolves that and passes the result in, keeping the fold pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekendPair {
    /// Session falls on a weekday.
    NotWeekend,
    /// Session falls on a weekend day, but the paired day has no session.
    Incomplete,
    /// Both Saturday and Sunday of this weekend now have a session.
    Complete {
        /// The Saturday of the completed weekend
        saturday: NaiveDate,
    },
}

/// Pre-computed statistics for a user.
///
/// Stored as one document per user, keyed by user ID.
///
/// Updated atomically with session writes; commits carry the version the
/// writer read, so concurrent writers cannot lose updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStatistics {
    // ─── Totals ──────────────────────────────────────────────────
    /// Total weight moved across all sessions (kilograms)
    #[serde(default)]
    pub total_weight_lifted: f64,
    /// Total sessions processed
    #[serde(default)]
    pub total_workouts: u32,

    // ─── Day Streaks ─────────────────────────────────────────────
    /// Consecutive calendar days with at least one session
    #[serde(default)]
    pub current_streak: u32,
    /// Longest day streak ever observed
    #[serde(default)]
    pub longest_streak: u32,
    /// Date of the most recent processed session
    #[serde(default)]
    pub last_workout_date: Option<NaiveDate>,
    /// Last workout date before the current active streak began
    #[serde(default)]
    pub last_inactive_date: Option<NaiveDate>,

    // ─── Time Of Day ─────────────────────────────────────────────
    /// Earliest start time across all sessions ever logged
    #[serde(default)]
    pub earliest_workout_time: Option<NaiveTime>,
    /// Latest start time across all sessions ever logged
    #[serde(default)]
    pub latest_workout_time: Option<NaiveTime>,

    // ─── Weekend Streaks ─────────────────────────────────────────
    /// Consecutive weekends with a session on both Saturday and Sunday
    #[serde(default)]
    pub weekend_workout_streak: u32,
    /// Saturday of the most recent complete weekend
    #[serde(default)]
    pub last_complete_weekend_date: Option<NaiveDate>,

    // ─── Flags ───────────────────────────────────────────────────
    /// Set permanently once any session falls on January 1
    #[serde(default)]
    pub worked_out_jan_1: bool,

    // ─── Metadata ────────────────────────────────────────────────
    /// Last update timestamp (ISO 8601)
    #[serde(default)]
    pub last_updated: String,
}

impl UserStatistics {
    /// Fold a newly logged session into the aggregates.
    ///
    /// Additive by contract: the caller invokes this exactly once per
    /// recorded session, and replaying a session counts it again.
    pub fn update_from_session(
        &mut self,
        session: &WorkoutSession,
        weekend: WeekendPair,
        now: &str,
    ) {
        self.total_weight_lifted += session.total_weight_kg;
        self.total_workouts += 1;

        self.update_streak(session.session_date);

        if let Some(time) = session.start_time {
            self.update_time_extrema(time);
        }

        self.update_weekend_streak(weekend);

        if session.session_date.month() == 1 && session.session_date.day() == 1 {
            self.worked_out_jan_1 = true;
        }

        self.last_updated = now.to_string();
    }

    /// Update the consecutive-day streak for a session on `date`.
    fn update_streak(&mut self, date: NaiveDate) {
        match self.last_workout_date {
            None => self.current_streak = 1,
            // Another session on the same day: streak unchanged
            Some(last) if date == last => {}
            Some(last) if Some(date) == last.succ_opt() => self.current_streak += 1,
            Some(last) if date > last => {
                // Gap of more than one day: streak broken
                self.last_inactive_date = Some(last);
                self.current_streak = 1;
            }
            // Backdated session: streak fields untouched
            Some(_) => {}
        }

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_workout_date = self.last_workout_date.max(Some(date));
    }

    /// Fold a session start time into the time-of-day extrema.
    fn update_time_extrema(&mut self, time: NaiveTime) {
        self.earliest_workout_time = Some(match self.earliest_workout_time {
            Some(earliest) => earliest.min(time),
            None => time,
        });
        self.latest_workout_time = Some(match self.latest_workout_time {
            Some(latest) => latest.max(time),
            None => time,
        });
    }

    /// Update the consecutive-weekend streak after a pair check.
    fn update_weekend_streak(&mut self, weekend: WeekendPair) {
        let WeekendPair::Complete { saturday } = weekend else {
            return;
        };

        match self.last_complete_weekend_date {
            // This weekend was already counted
            Some(prev) if prev == saturday => return,
            // Backdated weekend: streak fields untouched
            Some(prev) if saturday < prev => return,
            Some(prev) if saturday - prev == Duration::days(7) => {
                self.weekend_workout_streak += 1;
            }
            // First complete weekend, or a gap since the previous one
            _ => self.weekend_workout_streak = 1,
        }

        self.last_complete_weekend_date = Some(saturday);
    }
}
