//! Shared CLI plumbing: opening the app context and the console shell.
//!
//! Every CLI invocation is one turn of the app's cooperative event loop:
//! open the store, load the app data, deliver any wakeups that fired while
//! nothing was running (the relaunch path on a device), run the action,
//! save.

use chaintimer_core::settings::VibrateStyle;
use chaintimer_core::storage::{data_dir, Config, Store};
use chaintimer_core::wakeup::StoredWakeupBackend;
use chaintimer_core::{AppData, Event, Shell};
use chrono::Utc;
use tracing::warn;

pub type CliError = Box<dyn std::error::Error>;

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Shell that renders to the terminal.
#[derive(Default)]
pub struct ConsoleShell;

impl Shell for ConsoleShell {
    fn show_countdown(&mut self, timer_id: u32) {
        print_event(&Event::WakeupFired {
            timer_id,
            at: Utc::now(),
        });
    }

    fn request_refresh(&mut self) {
        // A terminal has no list to re-render.
    }

    fn vibrate(&mut self, style: VibrateStyle) {
        match style {
            VibrateStyle::None => {}
            VibrateStyle::Nudge => println!("* bzz *"),
            VibrateStyle::Continuous => println!("* bzzzzzz *"),
        }
    }
}

pub fn print_event(event: &Event) {
    match serde_json::to_string_pretty(event) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!(error = %e, "failed to encode event"),
    }
}

/// Open the store and load the app, delivering fired wakeups first.
pub fn open_app(shell: &mut ConsoleShell) -> Result<(Store, AppData, Config), CliError> {
    let dir = data_dir()?;
    let db_path = dir.join("chaintimer.db");
    let store = Store::open(&db_path)?;
    let backend = StoredWakeupBackend::open(&db_path)?;
    let config = Config::load();

    let mut app = AppData::load(&store, Box::new(backend));
    app.wakeups_mut().set_nudge_interval(config.nudge_interval_secs);
    app.wakeups_mut().handle_fired(now(), shell);
    Ok((store, app, config))
}
