// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout-Stats: incremental per-user workout statistics
//!
//! This crate maintains the denormalized statistics aggregates used to
//! evaluate achievement conditions without re-scanning a user's full
//! workout history. The session-logging subsystem calls
//! [`services::SessionProcessor::apply_session`] once per durably
//! recorded session; the trophy engine reads the resulting aggregates.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
