// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod backfill;
pub mod session;

pub use backfill::{BackfillRecord, BackfillService, ImportSummary};
pub use session::SessionProcessor;
