use crate::settings::{Settings, keys};

/// Haptic feedback configuration pushed to every active toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HapticConfig {
    pub enabled: bool,
    pub click_pattern: Option<Vec<u64>>,
    pub long_click_pattern: Option<Vec<u64>>,
}

/// Widget-level mode stored under [`keys::EXPANDED_HAPTIC_FEEDBACK`].
const HAPTIC_OFF: i64 = 0;
const HAPTIC_ON: i64 = 1;
const HAPTIC_FOLLOW_SYSTEM: i64 = 2;

/// Every setting that contributes to a [`HapticConfig`].
pub const HAPTIC_KEYS: [&str; 4] = [
    keys::EXPANDED_HAPTIC_FEEDBACK,
    keys::HAPTIC_FEEDBACK_ENABLED,
    keys::HAPTIC_DOWN_ARRAY,
    keys::HAPTIC_LONG_ARRAY,
];

pub fn is_haptic_key(key: &str) -> bool {
    HAPTIC_KEYS.contains(&key)
}

impl HapticConfig {
    /// Derive the configuration from current settings. Patterns are only read
    /// when feedback ends up enabled.
    pub fn from_settings(settings: &Settings) -> Self {
        let enabled = match settings.get_int(keys::EXPANDED_HAPTIC_FEEDBACK, HAPTIC_FOLLOW_SYSTEM) {
            HAPTIC_FOLLOW_SYSTEM => settings.get_flag(keys::HAPTIC_FEEDBACK_ENABLED, true),
            HAPTIC_OFF => false,
            mode => mode == HAPTIC_ON,
        };

        if !enabled {
            return Self::default();
        }

        Self {
            enabled,
            click_pattern: settings.get_long_array(keys::HAPTIC_DOWN_ARRAY),
            long_click_pattern: settings.get_long_array(keys::HAPTIC_LONG_ARRAY),
        }
    }

    /// Pattern to play for a press, if feedback is on and one is configured.
    pub fn pattern_for(&self, long: bool) -> Option<&[u64]> {
        if !self.enabled {
            return None;
        }
        if long {
            self.long_click_pattern.as_deref()
        } else {
            self.click_pattern.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_system_by_default() {
        let settings = Settings::new();
        settings.put_string(keys::HAPTIC_DOWN_ARRAY, "0,20");

        let config = HapticConfig::from_settings(&settings);
        assert!(config.enabled);
        assert_eq!(config.click_pattern, Some(vec![0, 20]));
        assert_eq!(config.long_click_pattern, None);

        settings.put_int(keys::HAPTIC_FEEDBACK_ENABLED, 0);
        assert_eq!(HapticConfig::from_settings(&settings), HapticConfig::default());
    }

    #[test]
    fn test_widget_mode_overrides_system() {
        let settings = Settings::new();
        settings.put_int(keys::HAPTIC_FEEDBACK_ENABLED, 0);
        settings.put_int(keys::EXPANDED_HAPTIC_FEEDBACK, HAPTIC_ON);
        assert!(HapticConfig::from_settings(&settings).enabled);

        settings.put_int(keys::HAPTIC_FEEDBACK_ENABLED, 1);
        settings.put_int(keys::EXPANDED_HAPTIC_FEEDBACK, HAPTIC_OFF);
        settings.put_string(keys::HAPTIC_LONG_ARRAY, "0,50");
        let config = HapticConfig::from_settings(&settings);
        assert!(!config.enabled);
        assert_eq!(config.long_click_pattern, None);
    }

    #[test]
    fn test_pattern_for() {
        let config = HapticConfig {
            enabled: true,
            click_pattern: Some(vec![0, 10]),
            long_click_pattern: Some(vec![0, 40]),
        };
        assert_eq!(config.pattern_for(false), Some(&[0, 10][..]));
        assert_eq!(config.pattern_for(true), Some(&[0, 40][..]));

        let off = HapticConfig {
            enabled: false,
            ..config
        };
        assert_eq!(off.pattern_for(false), None);
    }
}
