//! Ordered collection of timers sharing one settings value.
//!
//! Order is display order and repeat order. The event loop is
//! single-threaded, so structural mutation is caller-synchronized with
//! screen navigation; no locking exists anywhere in the core.

use serde::{Deserialize, Serialize};

use crate::settings::{RepeatStyle, Settings};
use crate::timer::Timer;
use crate::wakeup::WakeupManager;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerGroup {
    timers: Vec<Timer>,
    settings: Settings,
}

impl TimerGroup {
    pub fn new(settings: Settings) -> Self {
        Self {
            timers: Vec::new(),
            settings,
        }
    }

    // ── Timers ───────────────────────────────────────────────────────

    pub fn add_timer(&mut self, timer: Timer) {
        self.timers.push(timer);
    }

    /// Insert at `index`, shifting subsequent timers.
    pub fn insert_timer(&mut self, index: usize, timer: Timer) {
        debug_assert!(index <= self.timers.len());
        let index = index.min(self.timers.len());
        self.timers.insert(index, timer);
    }

    /// Remove and return the timer at `index`.
    ///
    /// The caller cancels any outstanding wakeup for it; the UI pops the
    /// edit screen before the group mutates further.
    pub fn remove_timer(&mut self, index: usize) -> Option<Timer> {
        if index >= self.timers.len() {
            debug_assert!(false, "remove_timer: index out of bounds");
            return None;
        }
        Some(self.timers.remove(index))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn timer(&self, index: usize) -> Option<&Timer> {
        self.timers.get(index)
    }

    pub fn timer_mut(&mut self, index: usize) -> Option<&mut Timer> {
        self.timers.get_mut(index)
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn timer_by_id(&self, timer_id: u32) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id() == timer_id)
    }

    pub fn timer_by_id_mut(&mut self, timer_id: u32) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id() == timer_id)
    }

    pub fn timer_index_by_id(&self, timer_id: u32) -> Option<usize> {
        self.timers.iter().position(|t| t.id() == timer_id)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    // ── Progression ──────────────────────────────────────────────────

    /// Which timer the countdown moves to after the timer at `current`
    /// elapses, per the group's repeat style. `None` means the sequence is
    /// finished.
    pub fn next_timer_index(&self, current: usize) -> Option<usize> {
        if self.timers.is_empty() {
            return None;
        }
        match self.settings.repeat_style {
            RepeatStyle::Single => Some(current.min(self.timers.len() - 1)),
            RepeatStyle::Group => Some((current + 1) % self.timers.len()),
            RepeatStyle::None => {
                let next = current + 1;
                (next < self.timers.len()).then_some(next)
            }
        }
    }

    // ── Wakeups ──────────────────────────────────────────────────────

    /// Cancel any outstanding wakeup for every timer in the group. Must run
    /// before the group is deleted.
    pub fn cancel_wakeups(&self, wakeups: &mut WakeupManager) {
        for timer in &self.timers {
            if wakeups.is_scheduled(timer.id()) {
                wakeups.cancel(timer.id());
            }
        }
    }
}
