//! # Chaintimer Core Library
//!
//! Core logic for Chaintimer, a grouped countdown-timer app for wearables:
//! users organize timers into groups, configure per-group behavior (repeat,
//! auto-progress, vibration), and run countdowns that persist across app
//! restarts and can wake the device from sleep to fire at the right moment
//! while the app is not running.
//!
//! ## Architecture
//!
//! - **Timer**: wall-clock-based countdown state machine; the caller drives
//!   the clock with explicit `now` arguments
//! - **TimerGroup / AppData**: ordered collections plus the process root
//! - **WakeupManager**: maps timer state to OS deferred wake events through
//!   a pluggable [`WakeupBackend`], and reconciles them on relaunch
//! - **Storage**: sequential-record store over SQLite plus TOML config
//! - **Shell**: the contract the presentation layer implements
//!
//! The whole core is single-threaded: one cooperative event loop, no locks.

pub mod app;
pub mod error;
pub mod events;
pub mod group;
pub mod settings;
pub mod shell;
pub mod storage;
pub mod timer;
pub mod wakeup;

pub use app::AppData;
pub use error::{ScheduleError, StoreError};
pub use events::Event;
pub use group::TimerGroup;
pub use settings::{ProgressStyle, RepeatStyle, Settings, SettingsField, VibrateStyle};
pub use shell::Shell;
pub use storage::{Config, Store};
pub use timer::{Timer, TimerField, TimerState};
pub use wakeup::{
    MemoryWakeupBackend, StoredWakeupBackend, WakeupBackend, WakeupEntry, WakeupId, WakeupManager,
};
