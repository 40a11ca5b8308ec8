use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{
    SETTINGS, SettingDescriptor, SettingError, SettingValue, assign, current_value, find_setting,
    parse_value,
};
use crate::config::Config;

/// Result of a successful edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The new value equals the stored one; nothing was written.
    Unchanged,
    Changed {
        descriptor: &'static SettingDescriptor,
        value: SettingValue,
    },
}

/// Owns the live [`Config`] and writes it back after every change.
pub struct SettingsEditor {
    config: Config,
    store: Option<PathBuf>,
}

impl SettingsEditor {
    /// Editor persisting to `store`. `None` keeps edits in memory only.
    pub fn new(config: Config, store: Option<PathBuf>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    /// Settings currently offered, with their values.
    pub fn visible(&self) -> Vec<(&'static SettingDescriptor, SettingValue)> {
        SETTINGS
            .iter()
            .filter(|descriptor| descriptor.is_visible(&self.config))
            .map(|descriptor| (descriptor, current_value(&self.config, descriptor.id)))
            .collect()
    }

    /// Parses `raw` for the setting called `name` and stores it.
    ///
    /// A changed value is persisted before this returns. If the write fails
    /// the in-memory config keeps the previous value.
    pub fn apply(&mut self, name: &str, raw: &str) -> Result<EditOutcome, SettingError> {
        let descriptor =
            find_setting(name).ok_or_else(|| SettingError::UnknownSetting(name.to_string()))?;
        let value = parse_value(descriptor, raw)?;

        if current_value(&self.config, descriptor.id) == value {
            debug!("\"{}\" already set to \"{}\"", descriptor.name, value);
            return Ok(EditOutcome::Unchanged);
        }

        let mut updated = self.config.clone();
        assign(&mut updated, descriptor.id, &value);

        if let Some(path) = &self.store {
            updated
                .save_to(path)
                .map_err(|err| SettingError::Persist(format!("{err:#}")))?;
        }
        self.config = updated;

        info!("Updated config value \"{}\" to \"{}\"", descriptor.name, value);
        Ok(EditOutcome::Changed { descriptor, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CaptureMode, GreyscaleMode};
    use crate::settings::{CUSTOM_WIDTH, FIELD_OF_VIEW, GREYSCALE_MODE, SCREENSHOT_MODE};
    use tempfile::TempDir;

    fn editor_in(dir: &TempDir) -> (SettingsEditor, PathBuf) {
        let path = dir.path().join("framesnap").join("config.toml");
        (SettingsEditor::new(Config::default(), Some(path.clone())), path)
    }

    #[test]
    fn change_is_persisted_immediately() {
        let dir = TempDir::new().unwrap();
        let (mut editor, path) = editor_in(&dir);

        let outcome = editor.apply(GREYSCALE_MODE, "luminance").unwrap();
        assert!(matches!(
            outcome,
            EditOutcome::Changed {
                value: SettingValue::Greyscale(GreyscaleMode::Luminance),
                ..
            }
        ));

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.capture.greyscale_mode, GreyscaleMode::Luminance);
        assert_eq!(reloaded, *editor.config());
    }

    #[test]
    fn unchanged_value_does_not_write() {
        let dir = TempDir::new().unwrap();
        let (mut editor, path) = editor_in(&dir);

        assert_eq!(editor.apply(FIELD_OF_VIEW, "120").unwrap(), EditOutcome::Unchanged);
        assert!(!path.exists());
    }

    #[test]
    fn invalid_value_leaves_config_alone() {
        let dir = TempDir::new().unwrap();
        let (mut editor, path) = editor_in(&dir);

        assert!(editor.apply(CUSTOM_WIDTH, "-4").is_err());
        assert!(editor.apply("Exposure", "1").is_err());
        assert_eq!(*editor.config(), Config::default());
        assert!(!path.exists());
    }

    #[test]
    fn persist_failure_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        // A regular file where the config directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let mut editor =
            SettingsEditor::new(Config::default(), Some(blocker.join("config.toml")));

        let err = editor.apply(SCREENSHOT_MODE, "Full").unwrap_err();
        assert!(matches!(err, SettingError::Persist(_)));
        assert_eq!(editor.config().capture.mode, CaptureMode::ShipLog);
    }

    #[test]
    fn visible_follows_mode_and_fov_toggle() {
        let mut editor = SettingsEditor::new(Config::default(), None);
        let names = |editor: &SettingsEditor| {
            editor.visible().iter().map(|(d, _)| d.name).collect::<Vec<_>>()
        };

        assert!(!names(&editor).contains(&CUSTOM_WIDTH));
        assert!(names(&editor).contains(&FIELD_OF_VIEW));

        editor.apply(SCREENSHOT_MODE, "Custom").unwrap();
        editor.apply("Change Field of View", "false").unwrap();
        assert!(names(&editor).contains(&CUSTOM_WIDTH));
        assert!(!names(&editor).contains(&FIELD_OF_VIEW));
    }
}
