use clap::Subcommand;

use chaintimer_core::settings::{ProgressStyle, VibrateStyle};
use chaintimer_core::timer::{Timer, TimerField};
use chaintimer_core::{Event, Shell};
use chrono::Utc;

use crate::common::{now, open_app, print_event, CliError, ConsoleShell};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Create a timer in a group
    Add {
        /// Group index
        group: usize,
        #[arg(long, default_value = "0")]
        hours: i32,
        #[arg(long, default_value = "0")]
        minutes: i32,
        #[arg(long, default_value = "0")]
        seconds: i32,
    },
    /// Edit a timer's duration; editing down to zero length deletes it
    Edit {
        /// Timer id
        id: u32,
        #[arg(long)]
        hours: Option<i32>,
        #[arg(long)]
        minutes: Option<i32>,
        #[arg(long)]
        seconds: Option<i32>,
    },
    /// Start or resume a countdown and schedule its background wakeup
    Start { id: u32 },
    /// Pause a running countdown, canceling its wakeup
    Pause { id: u32 },
    /// Reset a countdown back to its configured duration
    Reset { id: u32 },
    /// Print current timer state as JSON
    Status { id: u32 },
    /// One turn of the event loop: fold wall-clock time into running
    /// timers and handle any that elapsed
    Tick,
}

pub fn run(action: TimerAction) -> Result<(), CliError> {
    let mut shell = ConsoleShell;
    let (store, mut app, _config) = open_app(&mut shell)?;
    let now = now();

    match action {
        TimerAction::Add {
            group,
            hours,
            minutes,
            seconds,
        } => {
            let id = app.next_timer_id();
            let Some(g) = app.group_mut(group) else {
                return Err(format!("no group at index {group}").into());
            };
            let mut timer = Timer::new(id);
            timer.set_all(hours, minutes, seconds);
            g.add_timer(timer);
            shell.request_refresh();
            println!("timer {id} added to group {group}");
        }

        TimerAction::Edit {
            id,
            hours,
            minutes,
            seconds,
        } => {
            let Some(timer) = app.timer_by_id_mut(id) else {
                return Err(format!("no timer with id {id}").into());
            };
            if let Some(h) = hours {
                timer.set_field(TimerField::Hours, h);
            }
            if let Some(m) = minutes {
                timer.set_field(TimerField::Minutes, m);
            }
            if let Some(s) = seconds {
                timer.set_field(TimerField::Seconds, s);
            }
            if timer.is_zero_length() {
                // Leaving the edit screen with a zero-length duration
                // deletes the timer.
                if app.wakeups().is_scheduled(id) {
                    app.wakeups_mut().cancel(id);
                }
                let gi = app
                    .group_index_by_timer_id(id)
                    .expect("edited timer belongs to a group");
                let group = app.group_mut(gi).expect("group index from lookup");
                let ti = group.timer_index_by_id(id).expect("timer index from lookup");
                group.remove_timer(ti);
                shell.request_refresh();
                println!("timer {id} deleted (zero length)");
            } else {
                print_status(&app, id);
            }
        }

        TimerAction::Start { id } => {
            let Some(timer) = app.timer_by_id_mut(id) else {
                return Err(format!("no timer with id {id}").into());
            };
            timer.start(now);
            let snapshot = timer.clone();
            let entries_before = app.wakeups().len();
            app.wakeups_mut().schedule(&snapshot, now);
            print_event(&Event::TimerStarted {
                timer_id: id,
                remaining_seconds: snapshot.remaining_seconds(),
                at: Utc::now(),
            });
            // Starting an already-running timer changes nothing; only report
            // a wakeup this invocation actually created.
            if app.wakeups().len() > entries_before {
                print_event(&Event::WakeupScheduled {
                    timer_id: id,
                    fire_at: now + i64::from(snapshot.remaining_seconds()),
                    at: Utc::now(),
                });
            }
        }

        TimerAction::Pause { id } => {
            let Some(timer) = app.timer_by_id_mut(id) else {
                return Err(format!("no timer with id {id}").into());
            };
            timer.update(now);
            timer.pause(now);
            let remaining = timer.remaining_seconds();
            // Domain state changed; cancel the wakeup in the same operation
            // so a stale fire can't arrive for a paused timer.
            if app.wakeups().is_scheduled(id) {
                app.wakeups_mut().cancel(id);
                print_event(&Event::WakeupCanceled {
                    timer_id: id,
                    at: Utc::now(),
                });
            }
            print_event(&Event::TimerPaused {
                timer_id: id,
                remaining_seconds: remaining,
                at: Utc::now(),
            });
        }

        TimerAction::Reset { id } => {
            let Some(timer) = app.timer_by_id_mut(id) else {
                return Err(format!("no timer with id {id}").into());
            };
            timer.reset();
            if app.wakeups().is_scheduled(id) {
                app.wakeups_mut().cancel(id);
                print_event(&Event::WakeupCanceled {
                    timer_id: id,
                    at: Utc::now(),
                });
            }
            print_event(&Event::TimerReset {
                timer_id: id,
                at: Utc::now(),
            });
        }

        TimerAction::Status { id } => {
            let Some(timer) = app.timer_by_id_mut(id) else {
                return Err(format!("no timer with id {id}").into());
            };
            timer.update(now);
            print_status(&app, id);
        }

        TimerAction::Tick => tick(&mut app, now, &mut shell),
    }

    app.save(&store)?;
    Ok(())
}

fn print_status(app: &chaintimer_core::AppData, id: u32) {
    if let Some(timer) = app.timer_by_id(id) {
        print_event(&Event::StateSnapshot {
            timer_id: id,
            state: timer.state(),
            remaining_seconds: timer.remaining_seconds(),
            remaining_text: timer.remaining_text(),
            at: Utc::now(),
        });
    }
}

/// Update every running timer, then handle the ones that ran out:
/// vibrate, and either auto-advance to the group's next timer, re-arm a
/// nudge, or just stop, per the group's settings.
fn tick(app: &mut chaintimer_core::AppData, now: i64, shell: &mut dyn Shell) {
    let mut elapsed = Vec::new();
    for gi in 0..app.group_count() {
        let timer_count = app.group(gi).map_or(0, |g| g.len());
        for ti in 0..timer_count {
            let timer = app.timer_mut(gi, ti).expect("index within bounds");
            if timer.is_running() {
                timer.update(now);
                if timer.is_elapsed() {
                    elapsed.push((gi, ti, timer.id()));
                }
            }
        }
    }

    for (gi, ti, id) in elapsed {
        let settings = *app.group(gi).expect("group still present").settings();
        shell.vibrate(settings.vibrate_style);
        print_event(&Event::TimerElapsed {
            timer_id: id,
            vibrate: settings.vibrate_style,
            at: Utc::now(),
        });
        // Any wakeup for the elapsed timer is stale now.
        if app.wakeups().is_scheduled(id) {
            app.wakeups_mut().cancel(id);
        }

        match settings.progress_style {
            ProgressStyle::Auto => {
                let next = app.group(gi).expect("group still present").next_timer_index(ti);
                app.timer_mut(gi, ti).expect("elapsed timer present").reset();
                if let Some(ni) = next {
                    let next_timer = app.timer_mut(gi, ni).expect("next index within bounds");
                    next_timer.start(now);
                    let snapshot = next_timer.clone();
                    app.wakeups_mut().schedule(&snapshot, now);
                    print_event(&Event::TimerAdvanced {
                        from_timer_id: id,
                        to_timer_id: snapshot.id(),
                        at: Utc::now(),
                    });
                }
            }
            // Neither style advances on its own; keep nudging while
            // suspended until the user acts.
            ProgressStyle::WaitForUser | ProgressStyle::None => {
                if settings.vibrate_style == VibrateStyle::Nudge {
                    let snapshot = app.timer(gi, ti).expect("elapsed timer present").clone();
                    app.wakeups_mut().schedule_nudge(&snapshot, now);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaintimer_core::settings::Settings;
    use chaintimer_core::wakeup::MemoryWakeupBackend;
    use chaintimer_core::{AppData, TimerGroup};

    struct NullShell {
        vibrations: usize,
    }

    impl Shell for NullShell {
        fn show_countdown(&mut self, _timer_id: u32) {}

        fn request_refresh(&mut self) {}

        fn vibrate(&mut self, _style: VibrateStyle) {
            self.vibrations += 1;
        }
    }

    fn app_with_running_timer(settings: Settings) -> AppData {
        let mut app = AppData::new(Box::new(MemoryWakeupBackend::new()));
        let mut group = TimerGroup::new(settings);
        let mut timer = Timer::new(0);
        timer.set_all(0, 0, 5);
        timer.start(0);
        group.add_timer(timer);
        app.add_group(group);
        app
    }

    #[test]
    fn elapsed_nudge_timer_rearms_without_auto_advance() {
        for progress in [ProgressStyle::None, ProgressStyle::WaitForUser] {
            let mut app = app_with_running_timer(Settings {
                progress_style: progress,
                vibrate_style: VibrateStyle::Nudge,
                ..Settings::default()
            });
            let mut shell = NullShell { vibrations: 0 };
            tick(&mut app, 5, &mut shell);
            assert!(
                app.wakeups().is_scheduled(0),
                "{progress:?} left no nudge wakeup"
            );
            assert_eq!(shell.vibrations, 1);
        }
    }

    #[test]
    fn elapsed_timer_without_nudge_schedules_nothing() {
        let mut app = app_with_running_timer(Settings::default());
        let mut shell = NullShell { vibrations: 0 };
        tick(&mut app, 5, &mut shell);
        assert!(app.wakeups().is_empty());
    }
}
