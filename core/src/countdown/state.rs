//! Countdown state machine
//!
//! ```text
//!            start (remaining > 0)
//!   Idle ───────────────────────────▶ Running ──┐ tick: remaining -= 1,
//!    ▲ │ ◀─────────────────────────── │    ▲    │ or expire + restart
//!    │ │           pause              │    └────┘
//!    │ │ edit                         │
//!    │ ▼                              │
//!  Editing ── commit ──▶ Idle         │
//!                                     │
//!   reset (any state) ──▶ Idle, remaining = initial
//! ```
//!
//! Timing is not owned here: the caller drives [`Countdown::tick`] once per
//! second while running.

use super::clock::{format_hms, parse_hms};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    Editing,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing changed
    Ignored,
    /// Counted down one second
    Counted { remaining: u32 },
    /// Reached zero: the caller plays a sound. Remaining is already reset.
    Expired,
}

/// Owned countdown state.
///
/// Invariant: `0 <= remaining_secs <= initial_secs` and `initial_secs > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    initial_secs: u32,
    remaining_secs: u32,
    phase: CountdownPhase,
}

impl Countdown {
    /// A zero duration is bumped to one second
    pub fn new(initial_secs: u32) -> Self {
        let initial_secs = initial_secs.max(1);
        Self {
            initial_secs,
            remaining_secs: initial_secs,
            phase: CountdownPhase::Idle,
        }
    }

    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == CountdownPhase::Running
    }

    /// Fraction of the countdown still remaining, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.initial_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f32 / self.initial_secs as f32
    }

    /// Remaining time as `HH:MM:SS`
    pub fn display(&self) -> String {
        format_hms(self.remaining_secs)
    }

    /// Idle → Running. Returns whether the countdown is now running.
    pub fn start(&mut self) -> bool {
        if self.phase == CountdownPhase::Idle && self.remaining_secs > 0 {
            self.phase = CountdownPhase::Running;
        }
        self.is_running()
    }

    /// Running → Idle. Returns true if it was running.
    pub fn pause(&mut self) -> bool {
        if self.is_running() {
            self.phase = CountdownPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Play/pause button. Returns whether the countdown is now running.
    pub fn toggle(&mut self) -> bool {
        if self.remaining_secs == 0 {
            return self.is_running();
        }
        match self.phase {
            CountdownPhase::Running => {
                self.pause();
                false
            }
            CountdownPhase::Idle => self.start(),
            CountdownPhase::Editing => false,
        }
    }

    /// Back to Idle with a full countdown, discarding any pending edit
    pub fn reset(&mut self) {
        self.phase = CountdownPhase::Idle;
        self.remaining_secs = self.initial_secs;
    }

    /// Idle → Editing. Refused while running.
    pub fn begin_edit(&mut self) -> bool {
        match self.phase {
            CountdownPhase::Running => false,
            CountdownPhase::Idle | CountdownPhase::Editing => {
                self.phase = CountdownPhase::Editing;
                true
            }
        }
    }

    /// Editing → Idle, applying `input` when it is a valid non-zero
    /// `HH:MM:SS`. Invalid input is dropped and the previous durations kept.
    ///
    /// Returns the new duration if one was applied.
    pub fn commit_edit(&mut self, input: &str) -> Option<u32> {
        if self.phase != CountdownPhase::Editing {
            return None;
        }
        self.phase = CountdownPhase::Idle;

        match parse_hms(input) {
            Ok(secs) => {
                self.initial_secs = secs;
                self.remaining_secs = secs;
                Some(secs)
            }
            Err(e) => {
                tracing::debug!(input, error = %e, "discarding countdown edit");
                None
            }
        }
    }

    /// Advance one second
    pub fn tick(&mut self) -> Tick {
        if !self.is_running() {
            return Tick::Ignored;
        }
        if self.remaining_secs <= 1 {
            self.remaining_secs = self.initial_secs;
            Tick::Expired
        } else {
            self.remaining_secs -= 1;
            Tick::Counted {
                remaining: self.remaining_secs,
            }
        }
    }
}
