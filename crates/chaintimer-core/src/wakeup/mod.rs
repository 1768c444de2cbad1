//! Wakeup scheduling: mapping timer state to OS deferred wake events.
//!
//! The manager bridges in-process countdown state to the platform
//! wake-from-sleep facility, so a timer that elapses while the app is
//! suspended still fires and brings the countdown screen back up on
//! relaunch. It is the only component that talks to the facility, and it
//! owns the single backend handle -- constructing the manager is the
//! subscribe-exactly-once point for the process.
//!
//! Hard invariant: at most one outstanding wakeup per timer id. Scheduling
//! failures are logged and swallowed; the countdown still runs while the
//! app is foregrounded, only the background-fire guarantee is lost.

mod backend;

pub use backend::{
    MemoryWakeupBackend, StoredWakeupBackend, WakeupBackend, WakeupId, MAX_PENDING_WAKEUPS,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::ScheduleError;
use crate::shell::Shell;
use crate::timer::Timer;

/// Default nudge re-arm interval: pulse once a minute.
pub const NUDGE_INTERVAL_SECS: u32 = 60;

/// One pending OS wakeup request, tagged with the timer it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupEntry {
    pub wakeup_id: WakeupId,
    pub timer_id: u32,
}

pub struct WakeupManager {
    entries: Vec<WakeupEntry>,
    backend: Box<dyn WakeupBackend>,
    nudge_interval_secs: u32,
}

impl WakeupManager {
    pub fn new(backend: Box<dyn WakeupBackend>) -> Self {
        Self {
            entries: Vec::new(),
            backend,
            nudge_interval_secs: NUDGE_INTERVAL_SECS,
        }
    }

    /// Rebuild from persisted entries on app relaunch.
    pub fn with_entries(entries: Vec<WakeupEntry>, backend: Box<dyn WakeupBackend>) -> Self {
        Self {
            entries,
            backend,
            nudge_interval_secs: NUDGE_INTERVAL_SECS,
        }
    }

    pub fn set_nudge_interval(&mut self, secs: u32) {
        self.nudge_interval_secs = secs;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_scheduled(&self, timer_id: u32) -> bool {
        self.entries.iter().any(|e| e.timer_id == timer_id)
    }

    pub fn entries(&self) -> &[WakeupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Scheduling ───────────────────────────────────────────────────

    /// Request an OS wake when the timer's countdown runs out.
    ///
    /// No-op (warns) if a wakeup is already outstanding for this timer.
    pub fn schedule(&mut self, timer: &Timer, now: i64) {
        self.schedule_at(timer, now + i64::from(timer.remaining_seconds()));
    }

    /// Re-arm a short periodic reminder after a notification pulse, so the
    /// device keeps nudging while suspended.
    pub fn schedule_nudge(&mut self, timer: &Timer, now: i64) {
        self.schedule_at(timer, now + i64::from(self.nudge_interval_secs));
    }

    fn schedule_at(&mut self, timer: &Timer, fire_at: i64) {
        if self.is_scheduled(timer.id()) {
            warn!(timer_id = timer.id(), "wakeup already scheduled for timer");
            return;
        }
        match self.backend.schedule(fire_at, timer.id()) {
            Ok(wakeup_id) => {
                self.entries.push(WakeupEntry {
                    wakeup_id,
                    timer_id: timer.id(),
                });
                debug!(timer_id = timer.id(), wakeup_id, fire_at, "wakeup scheduled");
            }
            // Fire-and-forget: the countdown keeps working foregrounded,
            // only the background fire is lost.
            Err(e) => log_schedule_error(timer.id(), e),
        }
    }

    // ── Cancellation ─────────────────────────────────────────────────

    /// Cancel the pending wakeup for a timer. Idempotent: warns and no-ops
    /// when none is outstanding.
    pub fn cancel(&mut self, timer_id: u32) {
        let Some(pos) = self.entries.iter().position(|e| e.timer_id == timer_id) else {
            warn!(timer_id, "cancel: no wakeup scheduled for timer");
            return;
        };
        let entry = self.entries.remove(pos);
        self.backend.cancel(entry.wakeup_id);
        debug!(timer_id, wakeup_id = entry.wakeup_id, "wakeup canceled");
    }

    /// Cancel by the id the OS handed back -- the fired-wakeup handler only
    /// knows this id.
    pub fn cancel_by_wakeup_id(&mut self, wakeup_id: WakeupId) {
        let Some(pos) = self.entries.iter().position(|e| e.wakeup_id == wakeup_id) else {
            warn!(wakeup_id, "cancel: unknown wakeup id");
            return;
        };
        let entry = self.entries.remove(pos);
        self.backend.cancel(entry.wakeup_id);
        debug!(timer_id = entry.timer_id, wakeup_id, "wakeup canceled");
    }

    // ── Fired wakeups ────────────────────────────────────────────────

    /// Drain wakeups that have fired by `now`: remove each matching entry
    /// and push the countdown screen for its timer.
    ///
    /// Called once at startup (covers the launch-by-wakeup case) and from
    /// the subscribed callback while the app is running.
    pub fn handle_fired(&mut self, now: i64, shell: &mut dyn Shell) {
        while let Some((wakeup_id, timer_id)) = self.backend.take_fired(now) {
            debug!(timer_id, wakeup_id, "wakeup fired");
            self.cancel_by_wakeup_id(wakeup_id);
            shell.show_countdown(timer_id);
        }
    }
}

fn log_schedule_error(timer_id: u32, e: ScheduleError) {
    match e {
        ScheduleError::OutOfRange => error!(timer_id, "failed to schedule wakeup: time out of range"),
        ScheduleError::InvalidArgument => error!(timer_id, "failed to schedule wakeup: invalid argument"),
        ScheduleError::OutOfResources => error!(timer_id, "failed to schedule wakeup: no slots available"),
        ScheduleError::Internal => error!(timer_id, "failed to schedule wakeup: internal error"),
    }
}
