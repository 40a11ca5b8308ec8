use std::time::Duration;

use super::{EditOutcome, SettingDescriptor, SettingId, SettingValue, SettingsEditor};

pub const QUICK_SETTINGS_HINT: &str = "Settings can be re-enabled or changed from the mod menu.";
pub const QUICK_SETTINGS_HINT_SECS: f32 = 5.0;

/// What the quick settings overlay shows on a given frame.
#[derive(Debug, Clone, PartialEq)]
pub enum QuickSettingsView {
    Hidden,
    Hint(&'static str),
    Rows(Vec<(&'static SettingDescriptor, SettingValue)>),
}

/// In-game quick settings overlay state.
///
/// Turning the panel off shows a short hint for [`QUICK_SETTINGS_HINT_SECS`]
/// telling the player where to find the settings again.
#[derive(Debug, Default)]
pub struct QuickSettingsPanel {
    hint_until: Option<Duration>,
}

impl QuickSettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reacts to an applied edit at host time `now`.
    pub fn on_edit(&mut self, outcome: &EditOutcome, now: Duration) {
        let EditOutcome::Changed { descriptor, value } = outcome else {
            return;
        };
        if descriptor.id != SettingId::ShowQuickSettings {
            return;
        }

        self.hint_until = match value {
            SettingValue::Bool(false) => {
                Some(now + Duration::from_secs_f32(QUICK_SETTINGS_HINT_SECS))
            }
            _ => None,
        };
    }

    pub fn view(&self, editor: &SettingsEditor, now: Duration) -> QuickSettingsView {
        if editor.config().ui.show_quick_settings {
            return QuickSettingsView::Rows(editor.visible());
        }
        match self.hint_until {
            Some(until) if now < until => QuickSettingsView::Hint(QUICK_SETTINGS_HINT),
            _ => QuickSettingsView::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::settings::SHOW_QUICK_SETTINGS;

    #[test]
    fn hiding_panel_shows_hint_for_five_seconds() {
        let mut editor = SettingsEditor::new(Config::default(), None);
        let mut panel = QuickSettingsPanel::new();
        let t0 = Duration::from_secs(10);

        assert!(matches!(panel.view(&editor, t0), QuickSettingsView::Rows(_)));

        let outcome = editor.apply(SHOW_QUICK_SETTINGS, "false").unwrap();
        panel.on_edit(&outcome, t0);

        assert_eq!(
            panel.view(&editor, t0 + Duration::from_millis(4_900)),
            QuickSettingsView::Hint(QUICK_SETTINGS_HINT)
        );
        assert_eq!(panel.view(&editor, t0 + Duration::from_secs(5)), QuickSettingsView::Hidden);
    }

    #[test]
    fn other_edits_do_not_show_hint() {
        let mut editor = SettingsEditor::new(Config::default(), None);
        let mut panel = QuickSettingsPanel::new();
        let now = Duration::ZERO;

        let outcome = editor.apply("Greyscale Mode", "None").unwrap();
        panel.on_edit(&outcome, now);
        panel.on_edit(&EditOutcome::Unchanged, now);
        assert!(matches!(panel.view(&editor, now), QuickSettingsView::Rows(_)));
    }

    #[test]
    fn re_enabling_panel_clears_hint() {
        let mut editor = SettingsEditor::new(Config::default(), None);
        let mut panel = QuickSettingsPanel::new();
        let now = Duration::ZERO;

        let off = editor.apply(SHOW_QUICK_SETTINGS, "false").unwrap();
        panel.on_edit(&off, now);
        let on = editor.apply(SHOW_QUICK_SETTINGS, "true").unwrap();
        panel.on_edit(&on, now);

        let rows = match panel.view(&editor, now) {
            QuickSettingsView::Rows(rows) => rows,
            other => panic!("expected rows, got {other:?}"),
        };
        assert_eq!(rows[0].0.name, SHOW_QUICK_SETTINGS);
    }
}
