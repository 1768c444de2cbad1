//! Contract the core expects from the presentation layer.
//!
//! The wakeup-fired path is the only place the core calls *into* the UI:
//! it pushes the countdown screen for the timer that fired. Structural
//! mutations additionally request a list refresh. None of these calls
//! return anything; the core never depends on what the UI does with them.

use crate::settings::VibrateStyle;

pub trait Shell {
    /// Bring the countdown screen for this timer to the foreground.
    fn show_countdown(&mut self, timer_id: u32);

    /// A group or timer was added/removed; re-render lists.
    fn request_refresh(&mut self);

    /// Fire the vibration motor.
    fn vibrate(&mut self, style: VibrateStyle);
}

/// Shell that records calls, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingShell {
    pub shown: Vec<u32>,
    pub refreshes: usize,
    pub vibrations: Vec<VibrateStyle>,
}

#[cfg(test)]
impl Shell for RecordingShell {
    fn show_countdown(&mut self, timer_id: u32) {
        self.shown.push(timer_id);
    }

    fn request_refresh(&mut self) {
        self.refreshes += 1;
    }

    fn vibrate(&mut self, style: VibrateStyle) {
        self.vibrations.push(style);
    }
}
