//! State-change events.
//!
//! Every interesting state change produces an [`Event`]. The CLI prints
//! them as JSON; a GUI shell would render them instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::VibrateStyle;
use crate::timer::TimerState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        timer_id: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        timer_id: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        timer_id: u32,
        at: DateTime<Utc>,
    },
    /// A countdown ran out while the app was foregrounded.
    TimerElapsed {
        timer_id: u32,
        vibrate: VibrateStyle,
        at: DateTime<Utc>,
    },
    /// The countdown advanced to another timer in the group.
    TimerAdvanced {
        from_timer_id: u32,
        to_timer_id: u32,
        at: DateTime<Utc>,
    },
    WakeupScheduled {
        timer_id: u32,
        fire_at: i64,
        at: DateTime<Utc>,
    },
    WakeupCanceled {
        timer_id: u32,
        at: DateTime<Utc>,
    },
    /// An OS wakeup fired (possibly while the app was suspended).
    WakeupFired {
        timer_id: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        timer_id: u32,
        state: TimerState,
        remaining_seconds: u32,
        remaining_text: String,
        at: DateTime<Utc>,
    },
}
