use clap::Subcommand;

use chaintimer_core::{Shell, TimerGroup};

use crate::common::{open_app, CliError, ConsoleShell};

#[derive(Subcommand)]
pub enum GroupAction {
    /// Create a new group with the configured default settings
    Add,
    /// Delete a group (cancels its timers' pending wakeups)
    Remove {
        /// Group index
        index: usize,
    },
    /// List groups and their timers
    List,
}

pub fn run(action: GroupAction) -> Result<(), CliError> {
    let mut shell = ConsoleShell;
    let (store, mut app, config) = open_app(&mut shell)?;

    match action {
        GroupAction::Add => {
            app.add_group(TimerGroup::new(config.defaults));
            shell.request_refresh();
            println!("group {} added", app.group_count() - 1);
        }
        GroupAction::Remove { index } => {
            if index >= app.group_count() {
                return Err(format!("no group at index {index}").into());
            }
            app.remove_group(index);
            shell.request_refresh();
            println!("group {index} removed");
        }
        GroupAction::List => {
            if app.groups().is_empty() {
                println!("no groups");
            }
            for (gi, group) in app.groups().iter().enumerate() {
                println!(
                    "group {gi}  [{} / {} / {}]",
                    group.settings().repeat_style.label(),
                    group.settings().progress_style.label(),
                    group.settings().vibrate_style.label(),
                );
                for (ti, timer) in group.timers().iter().enumerate() {
                    println!(
                        "  {ti}: timer {}  {}  {:?}",
                        timer.id(),
                        timer.remaining_text(),
                        timer.state(),
                    );
                }
            }
        }
    }

    app.save(&store)?;
    Ok(())
}
