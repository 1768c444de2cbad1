//! Countdown timer entity and state machine.
//!
//! A timer is a wall-clock-based state machine: it carries no thread and no
//! ticker of its own. Transitions and `update()` take the current time as an
//! explicit epoch-seconds argument, so the caller (UI tick loop or test)
//! drives the clock.
//!
//! ## State transitions
//!
//! ```text
//! Stopped -> Running -> Paused -> Running -> ... -> Stopped (reset)
//! ```
//!
//! A timer is Running iff `start_time` is set; Paused iff stopped with
//! accumulated elapsed time. `update()` folds the delta since the last
//! (re)start into `elapsed_seconds` and re-anchors `start_time`, so repeated
//! calls without clock movement never double-count.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Each duration component wraps independently into `[0, 60)` on write.
/// Hours wrap at 60 like minutes and seconds; overflow does not carry into
/// the next unit.
pub const FIELD_WRAP: i32 = 60;

/// One of the three editable duration components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerField {
    Hours,
    Minutes,
    Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// A single countdown timer.
///
/// The id is process-unique while the timer exists; allocate it from
/// [`AppData::next_timer_id`](crate::app::AppData::next_timer_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    id: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
    /// Accumulated running time in seconds.
    #[serde(default)]
    elapsed_seconds: u32,
    /// Epoch seconds of the last (re)start; `None` when not running.
    #[serde(default)]
    start_time: Option<i64>,
}

impl Timer {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            hours: 0,
            minutes: 0,
            seconds: 0,
            elapsed_seconds: 0,
            start_time: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn field(&self, field: TimerField) -> u32 {
        match field {
            TimerField::Hours => self.hours,
            TimerField::Minutes => self.minutes,
            TimerField::Seconds => self.seconds,
        }
    }

    /// Configured duration in seconds.
    pub fn length_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Seconds left on the countdown.
    ///
    /// Reflects elapsed time as of the last `update()`; the tick loop calls
    /// `update()` first to fold in the latest wall-clock delta.
    pub fn remaining_seconds(&self) -> u32 {
        match self.state() {
            TimerState::Running | TimerState::Paused => {
                self.length_seconds().saturating_sub(self.elapsed_seconds)
            }
            TimerState::Stopped => self.length_seconds(),
        }
    }

    /// H/M/S decomposition of the remaining time, for display.
    pub fn field_remaining(&self, field: TimerField) -> u32 {
        let remaining = self.remaining_seconds();
        match field {
            TimerField::Hours => remaining / 3600,
            TimerField::Minutes => (remaining % 3600) / 60,
            TimerField::Seconds => remaining % 60,
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn state(&self) -> TimerState {
        if self.start_time.is_some() {
            TimerState::Running
        } else if self.elapsed_seconds > 0 {
            TimerState::Paused
        } else {
            TimerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TimerState::Paused
    }

    /// Whether the countdown has run to completion.
    ///
    /// Call `update()` first for the most accurate result.
    pub fn is_elapsed(&self) -> bool {
        self.elapsed_seconds >= self.length_seconds()
    }

    /// Zero-length timers are deleted on exit from the edit screen.
    pub fn is_zero_length(&self) -> bool {
        self.length_seconds() == 0
    }

    /// Remaining time as `HH:MM:SS`, or `MM:SS` when under an hour.
    pub fn remaining_text(&self) -> String {
        let h = self.field_remaining(TimerField::Hours);
        let m = self.field_remaining(TimerField::Minutes);
        let s = self.field_remaining(TimerField::Seconds);
        if h > 0 {
            format!("{h:02}:{m:02}:{s:02}")
        } else {
            format!("{m:02}:{s:02}")
        }
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Set one duration component, wrapping into `[0, 60)`.
    pub fn set_field(&mut self, field: TimerField, value: i32) {
        let wrapped = value.rem_euclid(FIELD_WRAP) as u32;
        match field {
            TimerField::Hours => self.hours = wrapped,
            TimerField::Minutes => self.minutes = wrapped,
            TimerField::Seconds => self.seconds = wrapped,
        }
    }

    /// Add `amount` (may be negative) to one component, wrapping.
    pub fn increment_field(&mut self, field: TimerField, amount: i32) {
        self.set_field(field, self.field(field) as i32 + amount);
    }

    pub fn set_all(&mut self, hours: i32, minutes: i32, seconds: i32) {
        self.set_field(TimerField::Hours, hours);
        self.set_field(TimerField::Minutes, minutes);
        self.set_field(TimerField::Seconds, seconds);
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Start or resume the countdown.
    pub fn start(&mut self, now: i64) {
        if self.start_time.is_some() {
            warn!(timer_id = self.id, "start: timer already running");
            return;
        }
        self.start_time = Some(now);
    }

    /// Pause a running countdown, folding the current delta into elapsed.
    pub fn pause(&mut self, now: i64) {
        match self.start_time.take() {
            Some(started) => {
                self.elapsed_seconds = self
                    .elapsed_seconds
                    .saturating_add((now - started).max(0) as u32);
            }
            None => warn!(timer_id = self.id, "pause: timer not running"),
        }
    }

    /// Reset back to the configured duration, from any state.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
        self.start_time = None;
    }

    /// Fold elapsed wall-clock time into `elapsed_seconds` and re-anchor the
    /// start time. Safe to call on every UI refresh; a no-op unless Running.
    pub fn update(&mut self, now: i64) {
        if let Some(started) = self.start_time {
            self.elapsed_seconds = self
                .elapsed_seconds
                .saturating_add((now - started).max(0) as u32);
            self.start_time = Some(now);
        }
    }
}
