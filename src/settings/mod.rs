//! Runtime-editable settings.
//!
//! The settings surface is a fixed table of [`SettingDescriptor`]s. Each entry
//! names the option as it appears in the quick settings panel, says what
//! kind of value it holds and when it is shown. [`SettingsEditor`] applies
//! text edits against that table and persists every change immediately.

mod editor;
mod panel;

pub use editor::{EditOutcome, SettingsEditor};
pub use panel::{
    QUICK_SETTINGS_HINT, QUICK_SETTINGS_HINT_SECS, QuickSettingsPanel, QuickSettingsView,
};

use std::fmt;
use thiserror::Error;

use crate::config::{CaptureMode, Config, GreyscaleMode, KeyBinding};

pub const SHOW_QUICK_SETTINGS: &str = "Show Quick Settings";
pub const SCREENSHOT_KEY: &str = "Screenshot Key";
pub const SCREENSHOT_MODE: &str = "Screenshot Mode";
pub const CUSTOM_WIDTH: &str = "Custom Width";
pub const CUSTOM_HEIGHT: &str = "Custom Height";
pub const CHANGE_FIELD_OF_VIEW: &str = "Change Field of View";
pub const FIELD_OF_VIEW: &str = "Field of View";
pub const GREYSCALE_MODE: &str = "Greyscale Mode";

const CAPTURE_MODE_CHOICES: &[&str] = &["Full", "ShipLog", "SlideReel", "Custom"];
const GREYSCALE_MODE_CHOICES: &[&str] = &["None", "Luminance", "Average", "Maximum"];

/// Identifies a setting independently of its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingId {
    ShowQuickSettings,
    ScreenshotKey,
    ScreenshotMode,
    CustomWidth,
    CustomHeight,
    ChangeFieldOfView,
    FieldOfView,
    GreyscaleMode,
}

/// Value type of a setting, with the accepted range where one applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingKind {
    Bool,
    Key,
    Choice(&'static [&'static str]),
    Int { min: i32, max: i32 },
    Float { min: f32, max: f32 },
}

/// When a setting is offered in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    /// Only while `Screenshot Mode` is `Custom`.
    CustomModeOnly,
    /// Only while `Change Field of View` is on.
    FieldOfViewEnabled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingDescriptor {
    pub id: SettingId,
    pub name: &'static str,
    pub kind: SettingKind,
    pub visibility: Visibility,
}

impl SettingDescriptor {
    pub fn is_visible(&self, config: &Config) -> bool {
        match self.visibility {
            Visibility::Always => true,
            Visibility::CustomModeOnly => config.capture.mode == CaptureMode::Custom,
            Visibility::FieldOfViewEnabled => config.capture.change_field_of_view,
        }
    }
}

/// Every setting, in panel order.
pub const SETTINGS: &[SettingDescriptor] = &[
    SettingDescriptor {
        id: SettingId::ShowQuickSettings,
        name: SHOW_QUICK_SETTINGS,
        kind: SettingKind::Bool,
        visibility: Visibility::Always,
    },
    SettingDescriptor {
        id: SettingId::ScreenshotKey,
        name: SCREENSHOT_KEY,
        kind: SettingKind::Key,
        visibility: Visibility::Always,
    },
    SettingDescriptor {
        id: SettingId::ScreenshotMode,
        name: SCREENSHOT_MODE,
        kind: SettingKind::Choice(CAPTURE_MODE_CHOICES),
        visibility: Visibility::Always,
    },
    SettingDescriptor {
        id: SettingId::CustomWidth,
        name: CUSTOM_WIDTH,
        kind: SettingKind::Int { min: 1, max: 16_384 },
        visibility: Visibility::CustomModeOnly,
    },
    SettingDescriptor {
        id: SettingId::CustomHeight,
        name: CUSTOM_HEIGHT,
        kind: SettingKind::Int { min: 1, max: 16_384 },
        visibility: Visibility::CustomModeOnly,
    },
    SettingDescriptor {
        id: SettingId::ChangeFieldOfView,
        name: CHANGE_FIELD_OF_VIEW,
        kind: SettingKind::Bool,
        visibility: Visibility::Always,
    },
    SettingDescriptor {
        id: SettingId::FieldOfView,
        name: FIELD_OF_VIEW,
        kind: SettingKind::Float {
            min: 1.0,
            max: 179.0,
        },
        visibility: Visibility::FieldOfViewEnabled,
    },
    SettingDescriptor {
        id: SettingId::GreyscaleMode,
        name: GREYSCALE_MODE,
        kind: SettingKind::Choice(GREYSCALE_MODE_CHOICES),
        visibility: Visibility::Always,
    },
];

/// Looks up a descriptor by display name (case-insensitive).
pub fn find_setting(name: &str) -> Option<&'static SettingDescriptor> {
    let name = name.trim();
    SETTINGS
        .iter()
        .find(|descriptor| descriptor.name.eq_ignore_ascii_case(name))
}

/// Typed value of a setting.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Key(KeyBinding),
    Mode(CaptureMode),
    Greyscale(GreyscaleMode),
    Int(i32),
    Float(f32),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Key(binding) => write!(f, "{binding}"),
            Self::Mode(mode) => write!(f, "{mode}"),
            Self::Greyscale(mode) => write!(f, "{mode}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Unknown setting \"{0}\"")]
    UnknownSetting(String),

    #[error("Invalid value \"{value}\" for \"{name}\": {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to persist settings: {0}")]
    Persist(String),
}

/// Reads the current value of `id` from `config`.
pub fn current_value(config: &Config, id: SettingId) -> SettingValue {
    let capture = &config.capture;
    match id {
        SettingId::ShowQuickSettings => SettingValue::Bool(config.ui.show_quick_settings),
        SettingId::ScreenshotKey => SettingValue::Key(config.screenshot_binding()),
        SettingId::ScreenshotMode => SettingValue::Mode(capture.mode),
        SettingId::CustomWidth => SettingValue::Int(capture.custom_width),
        SettingId::CustomHeight => SettingValue::Int(capture.custom_height),
        SettingId::ChangeFieldOfView => SettingValue::Bool(capture.change_field_of_view),
        SettingId::FieldOfView => SettingValue::Float(capture.field_of_view),
        SettingId::GreyscaleMode => SettingValue::Greyscale(capture.greyscale_mode),
    }
}

/// Parses `raw` according to the descriptor's kind and range.
pub fn parse_value(
    descriptor: &SettingDescriptor,
    raw: &str,
) -> Result<SettingValue, SettingError> {
    let invalid = |reason: String| SettingError::InvalidValue {
        name: descriptor.name,
        value: raw.to_string(),
        reason,
    };
    let text = raw.trim();

    match (descriptor.id, descriptor.kind) {
        (_, SettingKind::Bool) => parse_bool(text)
            .map(SettingValue::Bool)
            .ok_or_else(|| invalid("expected true or false".to_string())),
        (_, SettingKind::Key) => {
            let mut binding = KeyBinding::parse(text).map_err(invalid)?;
            // Letter keys are stored upper-case so "k" and "K" compare equal.
            if binding.key.chars().count() == 1 {
                binding.key = binding.key.to_uppercase();
            }
            Ok(SettingValue::Key(binding))
        }
        (SettingId::ScreenshotMode, SettingKind::Choice(choices)) => CaptureMode::from_name(text)
            .map(SettingValue::Mode)
            .ok_or_else(|| invalid(format!("expected one of {}", choices.join(", ")))),
        (SettingId::GreyscaleMode, SettingKind::Choice(choices)) => GreyscaleMode::from_name(text)
            .map(SettingValue::Greyscale)
            .ok_or_else(|| invalid(format!("expected one of {}", choices.join(", ")))),
        (_, SettingKind::Choice(_)) => Err(invalid("no choices registered".to_string())),
        (_, SettingKind::Int { min, max }) => {
            let value: i32 = text.parse().map_err(|e| invalid(format!("{e}")))?;
            if !(min..=max).contains(&value) {
                return Err(invalid(format!("must be between {min} and {max}")));
            }
            Ok(SettingValue::Int(value))
        }
        (_, SettingKind::Float { min, max }) => {
            let value: f32 = text.parse().map_err(|e| invalid(format!("{e}")))?;
            if !(min..=max).contains(&value) {
                return Err(invalid(format!("must be between {min} and {max}")));
            }
            Ok(SettingValue::Float(value))
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Writes `value` into `config`. The value must match the setting's kind.
pub(crate) fn assign(config: &mut Config, id: SettingId, value: &SettingValue) -> bool {
    let capture = &mut config.capture;
    match (id, value) {
        (SettingId::ShowQuickSettings, SettingValue::Bool(v)) => config.ui.show_quick_settings = *v,
        (SettingId::ScreenshotKey, SettingValue::Key(binding)) => {
            capture.screenshot_key = binding.to_string()
        }
        (SettingId::ScreenshotMode, SettingValue::Mode(mode)) => capture.mode = *mode,
        (SettingId::CustomWidth, SettingValue::Int(v)) => capture.custom_width = *v,
        (SettingId::CustomHeight, SettingValue::Int(v)) => capture.custom_height = *v,
        (SettingId::ChangeFieldOfView, SettingValue::Bool(v)) => capture.change_field_of_view = *v,
        (SettingId::FieldOfView, SettingValue::Float(v)) => capture.field_of_view = *v,
        (SettingId::GreyscaleMode, SettingValue::Greyscale(mode)) => capture.greyscale_mode = *mode,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_lists_match_enum_labels() {
        let modes: Vec<_> = CaptureMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(modes, CAPTURE_MODE_CHOICES);
        let greys: Vec<_> = GreyscaleMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(greys, GREYSCALE_MODE_CHOICES);
    }

    #[test]
    fn every_setting_reads_and_writes_its_own_value() {
        let config = Config::default();
        for descriptor in SETTINGS {
            let value = current_value(&config, descriptor.id);
            let mut copy = config.clone();
            assert!(
                assign(&mut copy, descriptor.id, &value),
                "{} rejected its own value",
                descriptor.name
            );
            assert_eq!(copy, config);
        }
    }

    #[test]
    fn find_setting_is_case_insensitive() {
        assert_eq!(find_setting("field of view").unwrap().id, SettingId::FieldOfView);
        assert!(find_setting("Brightness").is_none());
    }

    #[test]
    fn custom_size_only_visible_in_custom_mode() {
        let mut config = Config::default();
        let width = find_setting(CUSTOM_WIDTH).unwrap();
        assert!(!width.is_visible(&config));
        config.capture.mode = CaptureMode::Custom;
        assert!(width.is_visible(&config));
    }

    #[test]
    fn field_of_view_hidden_when_override_disabled() {
        let mut config = Config::default();
        let fov = find_setting(FIELD_OF_VIEW).unwrap();
        assert!(fov.is_visible(&config));
        config.capture.change_field_of_view = false;
        assert!(!fov.is_visible(&config));
    }

    #[test]
    fn parse_value_checks_kind_and_range() {
        let width = find_setting(CUSTOM_WIDTH).unwrap();
        assert_eq!(parse_value(width, " 640 ").unwrap(), SettingValue::Int(640));
        assert!(parse_value(width, "0").is_err());
        assert!(parse_value(width, "wide").is_err());

        let fov = find_setting(FIELD_OF_VIEW).unwrap();
        assert_eq!(parse_value(fov, "75.5").unwrap(), SettingValue::Float(75.5));
        assert!(parse_value(fov, "NaN").is_err());
        assert!(parse_value(fov, "200").is_err());

        let mode = find_setting(SCREENSHOT_MODE).unwrap();
        assert_eq!(
            parse_value(mode, "slidereel").unwrap(),
            SettingValue::Mode(CaptureMode::SlideReel)
        );
        let err = parse_value(mode, "Panorama").unwrap_err().to_string();
        assert!(err.contains("Full, ShipLog, SlideReel, Custom"));

        let key = find_setting(SCREENSHOT_KEY).unwrap();
        assert_eq!(
            parse_value(key, "k").unwrap(),
            current_value(&Config::default(), SettingId::ScreenshotKey)
        );
        assert!(parse_value(key, "Ctrl+Shift").is_err());

        let toggle = find_setting(SHOW_QUICK_SETTINGS).unwrap();
        assert_eq!(parse_value(toggle, "off").unwrap(), SettingValue::Bool(false));
        assert!(parse_value(toggle, "maybe").is_err());
    }
}
