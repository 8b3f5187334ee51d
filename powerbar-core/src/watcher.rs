use crate::active::ActiveToggleSet;
use crate::haptic::is_haptic_key;
use crate::settings::{KeySet, Settings, SettingsChange, SettingsSubscription, keys};
use crate::toggle::ToggleContext;
use crossbeam::channel::Receiver;

/// Keys the widget always observes for itself.
pub const RESERVED_KEYS: [&str; 8] = [
    keys::EXPANDED_VIEW_WIDGET,
    keys::EXPANDED_HIDE_SCROLLBAR,
    keys::HAPTIC_FEEDBACK_ENABLED,
    keys::EXPANDED_HAPTIC_FEEDBACK,
    keys::HAPTIC_DOWN_ARRAY,
    keys::HAPTIC_LONG_ARRAY,
    keys::WIDGET_BUTTONS,
    keys::EXPANDED_VIEW_WIDGET_COLOR,
];

/// Widget-level reactions owed to a changed key.
///
/// `reconfigure`, `visibility` and `scrollbar` are exclusive, in that order of
/// precedence. `haptic` is checked on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsReaction {
    pub reconfigure: bool,
    pub visibility: bool,
    pub scrollbar: bool,
    pub haptic: bool,
}

/// Merges the settings interest of the active toggles with [`RESERVED_KEYS`]
/// into one observer and forwards changes back to the toggles.
#[derive(Default)]
pub struct SettingsWatcher {
    keys: KeySet,
    subscription: Option<(SettingsSubscription, Receiver<SettingsChange>)>,
}

impl SettingsWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merged_keys(active: &ActiveToggleSet) -> KeySet {
        let mut keys = KeySet::from_keys(RESERVED_KEYS);
        for toggle in active.iter() {
            keys.extend(&toggle.observed_keys());
        }
        keys
    }

    /// Replace any previous observer with one built from `active`.
    pub fn subscribe(&mut self, settings: &Settings, active: &ActiveToggleSet) {
        self.unsubscribe();
        self.keys = Self::merged_keys(active);
        tracing::debug!(keys = ?self.keys, "observing settings");
        self.subscription = Some(settings.observe(self.keys.clone()));
    }

    /// Drop the observer. Changes queued but not yet taken are discarded.
    pub fn unsubscribe(&mut self) {
        self.subscription = None;
        self.keys = KeySet::new();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    pub fn try_next(&self) -> Option<SettingsChange> {
        self.subscription
            .as_ref()
            .and_then(|(_, rx)| rx.try_recv().ok())
    }

    pub fn classify(key: &str) -> SettingsReaction {
        let mut reaction = SettingsReaction::default();

        if key == keys::WIDGET_BUTTONS {
            reaction.reconfigure = true;
        } else if key == keys::EXPANDED_VIEW_WIDGET {
            reaction.visibility = true;
        } else if key == keys::EXPANDED_HIDE_SCROLLBAR {
            reaction.scrollbar = true;
        }

        reaction.haptic = is_haptic_key(key);
        reaction
    }

    /// Tell every toggle observing `key` that it changed. Returns how many
    /// toggles were told; failures are logged and skipped.
    pub fn forward(key: &str, active: &mut ActiveToggleSet, ctx: &ToggleContext<'_>) -> usize {
        let mut matched = 0;
        for toggle in active.iter_mut() {
            if !toggle.observed_keys().contains(key) {
                continue;
            }
            matched += 1;
            if let Err(e) = toggle.on_setting_changed(key, ctx) {
                tracing::warn!(toggle = toggle.id(), key, %e, "toggle failed to handle setting change");
            }
        }
        matched
    }
}
