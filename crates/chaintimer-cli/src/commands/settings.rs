use clap::{Subcommand, ValueEnum};

use chaintimer_core::settings::{ProgressStyle, RepeatStyle, Settings, SettingsField, VibrateStyle};

use crate::common::{open_app, CliError, ConsoleShell};

#[derive(Clone, Copy, ValueEnum)]
pub enum RepeatArg {
    None,
    Single,
    Group,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProgressArg {
    None,
    Auto,
    Wait,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VibrateArg {
    None,
    Nudge,
    Continuous,
}

impl From<RepeatArg> for RepeatStyle {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => RepeatStyle::None,
            RepeatArg::Single => RepeatStyle::Single,
            RepeatArg::Group => RepeatStyle::Group,
        }
    }
}

impl From<ProgressArg> for ProgressStyle {
    fn from(arg: ProgressArg) -> Self {
        match arg {
            ProgressArg::None => ProgressStyle::None,
            ProgressArg::Auto => ProgressStyle::Auto,
            ProgressArg::Wait => ProgressStyle::WaitForUser,
        }
    }
}

impl From<VibrateArg> for VibrateStyle {
    fn from(arg: VibrateArg) -> Self {
        match arg {
            VibrateArg::None => VibrateStyle::None,
            VibrateArg::Nudge => VibrateStyle::Nudge,
            VibrateArg::Continuous => VibrateStyle::Continuous,
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show a group's settings, or the global defaults without --group
    Show {
        #[arg(long)]
        group: Option<usize>,
    },
    /// Update a group's settings, or the global defaults without --group
    Set {
        #[arg(long)]
        group: Option<usize>,
        #[arg(long)]
        repeat: Option<RepeatArg>,
        #[arg(long)]
        progress: Option<ProgressArg>,
        #[arg(long)]
        vibrate: Option<VibrateArg>,
        /// Seconds between nudge reminder pulses (saved to config)
        #[arg(long)]
        nudge_interval: Option<u32>,
    },
}

fn print_settings(settings: &Settings) {
    for field in SettingsField::ALL {
        let value = match field {
            SettingsField::RepeatStyle => settings.repeat_style.label(),
            SettingsField::ProgressStyle => settings.progress_style.label(),
            SettingsField::VibrateStyle => settings.vibrate_style.label(),
        };
        println!("{}: {}", field.label(), value);
    }
}

pub fn run(action: SettingsAction) -> Result<(), CliError> {
    let mut shell = ConsoleShell;
    let (store, mut app, mut config) = open_app(&mut shell)?;

    match action {
        SettingsAction::Show { group } => {
            let settings = match group {
                Some(index) => app
                    .group(index)
                    .map(|g| g.settings())
                    .ok_or_else(|| format!("no group at index {index}"))?,
                None => app.settings(),
            };
            print_settings(settings);
        }
        SettingsAction::Set {
            group,
            repeat,
            progress,
            vibrate,
            nudge_interval,
        } => {
            if let Some(secs) = nudge_interval {
                config.nudge_interval_secs = secs;
                config.save()?;
                app.wakeups_mut().set_nudge_interval(secs);
                println!("nudge interval set to {secs}s");
            }
            let settings = match group {
                Some(index) => app
                    .group_mut(index)
                    .map(|g| g.settings_mut())
                    .ok_or_else(|| format!("no group at index {index}"))?,
                None => app.settings_mut(),
            };
            if let Some(style) = repeat {
                settings.repeat_style = style.into();
            }
            if let Some(style) = progress {
                settings.progress_style = style.into();
            }
            if let Some(style) = vibrate {
                settings.vibrate_style = style.into();
            }
            print_settings(settings);
        }
    }

    app.save(&store)?;
    Ok(())
}
