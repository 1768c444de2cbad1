//! Per-group behavior settings and their display text.

use serde::{Deserialize, Serialize};

/// What happens after a timer in the group elapses and the user advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatStyle {
    /// Progress to the next timer, but don't repeat the group.
    #[default]
    None,
    /// Repeat the current timer.
    Single,
    /// Progress to the next timer, wrapping at the end of the group.
    Group,
}

/// Whether the next timer starts automatically when the current one elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStyle {
    #[default]
    None,
    Auto,
    WaitForUser,
}

/// Vibration behavior when a timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VibrateStyle {
    #[default]
    None,
    /// Pulse once a minute until the user acts.
    Nudge,
    Continuous,
}

/// One settings screen row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    RepeatStyle,
    ProgressStyle,
    VibrateStyle,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [
        SettingsField::RepeatStyle,
        SettingsField::ProgressStyle,
        SettingsField::VibrateStyle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::RepeatStyle => "Repeat Style",
            SettingsField::ProgressStyle => "Progress Style",
            SettingsField::VibrateStyle => "Vibrate Style",
        }
    }
}

impl RepeatStyle {
    pub fn label(self) -> &'static str {
        match self {
            RepeatStyle::None => "Repeat none",
            RepeatStyle::Single => "Repeat single",
            RepeatStyle::Group => "Repeat group",
        }
    }
}

impl ProgressStyle {
    pub fn label(self) -> &'static str {
        match self {
            ProgressStyle::None => "Don't start next",
            ProgressStyle::Auto => "Auto start next",
            ProgressStyle::WaitForUser => "Wait for user",
        }
    }
}

impl VibrateStyle {
    pub fn label(self) -> &'static str {
        match self {
            VibrateStyle::None => "Don't vibrate",
            VibrateStyle::Nudge => "Nudge",
            VibrateStyle::Continuous => "Continuous",
        }
    }
}

/// Settings value scoped to one timer group (and, as a default, to the app).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub repeat_style: RepeatStyle,
    #[serde(default)]
    pub progress_style: ProgressStyle,
    #[serde(default)]
    pub vibrate_style: VibrateStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_all_none() {
        let s = Settings::default();
        assert_eq!(s.repeat_style, RepeatStyle::None);
        assert_eq!(s.progress_style, ProgressStyle::None);
        assert_eq!(s.vibrate_style, VibrateStyle::None);
    }

    #[test]
    fn labels_are_nonempty() {
        for f in SettingsField::ALL {
            assert!(!f.label().is_empty());
        }
        assert_eq!(RepeatStyle::Group.label(), "Repeat group");
        assert_eq!(ProgressStyle::WaitForUser.label(), "Wait for user");
        assert_eq!(VibrateStyle::Nudge.label(), "Nudge");
    }
}
