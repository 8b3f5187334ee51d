use crate::error::SettingsError;
use crate::settings::Settings;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// TOML file holding persisted settings as a flat table.
///
/// Strings and integers are stored as-is, booleans as `1`/`0` and integer
/// arrays as comma-separated lists, so the in-memory [`Settings`] store only
/// ever sees strings.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/powerbar/settings.toml`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        Ok(dirs::config_dir()
            .ok_or(SettingsError::NoConfigDir)?
            .join("powerbar/settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. A missing file is an empty table.
    pub fn load(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let table: toml::Table = toml::from_str(&content)?;

        let mut values = BTreeMap::new();
        for (key, value) in table {
            match value_to_string(&value) {
                Some(v) => {
                    values.insert(key, v);
                }
                None => tracing::warn!(key, "skipping unsupported setting value"),
            }
        }
        Ok(values)
    }

    pub fn save(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let table: toml::Table = values
            .iter()
            .map(|(k, v)| (k.clone(), string_to_value(v)))
            .collect();
        std::fs::write(&self.path, toml::to_string(&table)?)?;
        Ok(())
    }
}

fn value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Boolean(b) => Some(if *b { "1" } else { "0" }.to_string()),
        toml::Value::Array(items) => {
            let parts: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_integer().map(|i| i.to_string()))
                .collect();
            parts.map(|p| p.join(","))
        }
        _ => None,
    }
}

fn string_to_value(value: &str) -> toml::Value {
    // Only canonical integers, so "007" and "+5" load back unchanged
    match value.parse::<i64>() {
        Ok(i) if i.to_string() == value => toml::Value::Integer(i),
        _ => toml::Value::String(value.to_string()),
    }
}

/// Watches a [`SettingsFile`] and applies edits made on disk to a [`Settings`] store.
pub struct SettingsFileWatcher {
    file: SettingsFile,
    watch_dir: PathBuf,
    watcher: RecommendedWatcher,
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
}

impl SettingsFileWatcher {
    /// Start watching the directory containing `file`. Editors usually replace
    /// files instead of writing in place, so the directory is watched and
    /// events are filtered by file name.
    pub fn new(file: SettingsFile) -> Result<Self, SettingsError> {
        let watch_dir = file
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&watch_dir)?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )?;
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            file,
            watch_dir,
            watcher,
            rx,
        })
    }

    /// Drain pending file events and, if the settings file was touched,
    /// reload it into `settings`. A deleted file clears every key. Returns
    /// the keys whose value changed.
    pub fn check_for_changes(&mut self, settings: &Settings) -> Result<Vec<String>, SettingsError> {
        let mut touched = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(event)
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() =>
                {
                    touched |= event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == self.file.path().file_name());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(%e, "settings watcher error"),
            }
        }

        if !touched {
            return Ok(Vec::new());
        }

        let changed = settings.replace_all(self.file.load()?);
        if !changed.is_empty() {
            tracing::info!(?changed, "settings reloaded from disk");
        }
        Ok(changed)
    }
}

impl Drop for SettingsFileWatcher {
    fn drop(&mut self) {
        let _ = self.watcher.unwatch(&self.watch_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn temp_file(name: &str) -> SettingsFile {
        let dir = std::env::temp_dir().join(format!("powerbar_test_{}", rand::random::<u32>()));
        SettingsFile::new(dir.join(name))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let file = temp_file("settings.toml");
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_value_kinds() {
        let file = temp_file("settings.toml");
        std::fs::create_dir_all(file.path().parent().unwrap()).unwrap();
        std::fs::write(
            file.path(),
            r#"
widget_buttons = "wifi|gps"
expanded_view_widget = 1
expanded_hide_scrollbar = true
haptic_down_array = [0, 10, 20]
nested = { a = 1 }
"#,
        )
        .unwrap();

        let values = file.load().unwrap();
        assert_eq!(values["widget_buttons"], "wifi|gps");
        assert_eq!(values["expanded_view_widget"], "1");
        assert_eq!(values["expanded_hide_scrollbar"], "1");
        assert_eq!(values["haptic_down_array"], "0,10,20");
        assert!(!values.contains_key("nested"));

        let _ = std::fs::remove_dir_all(file.path().parent().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let file = temp_file("settings.toml");
        let values = BTreeMap::from([
            ("widget_buttons".to_string(), "wifi|sound".to_string()),
            ("expanded_view_widget".to_string(), "0".to_string()),
        ]);

        file.save(&values).unwrap();
        assert_eq!(file.load().unwrap(), values);

        let _ = std::fs::remove_dir_all(file.path().parent().unwrap());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let file = temp_file("settings.toml");
        std::fs::create_dir_all(file.path().parent().unwrap()).unwrap();
        std::fs::write(file.path(), "widget_buttons = ").unwrap();

        assert!(matches!(file.load(), Err(SettingsError::Parse(_))));

        let _ = std::fs::remove_dir_all(file.path().parent().unwrap());
    }

    #[test]
    fn test_save_keeps_non_canonical_numbers() {
        let file = temp_file("settings.toml");
        let values = BTreeMap::from([
            ("k".to_string(), "+5".to_string()),
            ("widget_buttons".to_string(), "007".to_string()),
            ("n".to_string(), "42".to_string()),
            ("neg".to_string(), "-3".to_string()),
        ]);

        file.save(&values).unwrap();
        assert_eq!(file.load().unwrap(), values);

        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("n = 42"));
        assert!(raw.contains("widget_buttons = \"007\""));

        let _ = std::fs::remove_dir_all(file.path().parent().unwrap());
    }

    /// Poll the watcher until `done` holds, collecting every changed key.
    fn reload_until(
        watcher: &mut SettingsFileWatcher,
        settings: &Settings,
        done: impl Fn(&Settings) -> bool,
    ) -> BTreeSet<String> {
        let mut changed = BTreeSet::new();
        for _ in 0..50 {
            // A read racing the write can fail to parse; the next event retries it
            if let Ok(keys) = watcher.check_for_changes(settings) {
                changed.extend(keys);
            }
            if done(settings) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        changed
    }

    #[test]
    fn test_watcher_applies_edits() {
        use crate::settings::{KeySet, keys};

        let file = temp_file("settings.toml");
        let initial = BTreeMap::from([
            (keys::WIDGET_BUTTONS.to_string(), "wifi".to_string()),
            ("extra".to_string(), "1".to_string()),
        ]);
        file.save(&initial).unwrap();

        let settings = Settings::with_values(initial);
        let (_sub, rx) = settings.observe(KeySet::from_keys([keys::WIDGET_BUTTONS]));
        let mut watcher = SettingsFileWatcher::new(file.clone()).unwrap();

        file.save(&BTreeMap::from([(
            keys::WIDGET_BUTTONS.to_string(),
            "gps|wifi".to_string(),
        )]))
        .unwrap();

        let changed = reload_until(&mut watcher, &settings, |s| {
            s.get_string(keys::WIDGET_BUTTONS).as_deref() == Some("gps|wifi")
        });
        assert_eq!(
            changed,
            BTreeSet::from(["extra".to_string(), keys::WIDGET_BUTTONS.to_string()])
        );
        assert_eq!(settings.get_string(keys::WIDGET_BUTTONS).as_deref(), Some("gps|wifi"));
        assert_eq!(settings.get_string("extra"), None);

        let changes: Vec<_> = rx.try_iter().collect();
        assert!(!changes.is_empty());
        assert!(changes.iter().all(|c| c.key == keys::WIDGET_BUTTONS && !c.self_change));

        drop(watcher);
        let _ = std::fs::remove_dir_all(file.path().parent().unwrap());
    }

    #[test]
    fn test_watcher_clears_deleted_file() {
        let file = temp_file("settings.toml");
        let initial = BTreeMap::from([("extra".to_string(), "1".to_string())]);
        file.save(&initial).unwrap();

        let settings = Settings::with_values(initial);
        let mut watcher = SettingsFileWatcher::new(file.clone()).unwrap();

        std::fs::remove_file(file.path()).unwrap();

        let changed = reload_until(&mut watcher, &settings, |s| s.snapshot().is_empty());
        assert_eq!(changed, BTreeSet::from(["extra".to_string()]));
        assert!(settings.snapshot().is_empty());

        drop(watcher);
        let _ = std::fs::remove_dir_all(file.path().parent().unwrap());
    }
}
