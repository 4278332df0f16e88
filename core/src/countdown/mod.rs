//! Countdown timer
//!
//! This module provides:
//! - **State machine**: [`Countdown`] with Idle/Running/Editing phases
//! - **Clock helpers**: `HH:MM:SS` parsing for edits and formatting for display
//!
//! Scheduling lives with the caller; see the client's controller service.

mod clock;
mod state;

#[cfg(test)]
mod countdown_tests;

pub use clock::{TimeParseError, format_hms, parse_hms};
pub use state::{Countdown, CountdownPhase, Tick};
