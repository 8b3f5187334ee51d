//! In-process key/value settings store with per-key change notification.
//!
//! Values are stored as strings; typed getters parse on read and fall back to
//! the caller's default when a value is missing or malformed. Observers
//! register a [`KeySet`] and receive a [`SettingsChange`] on a channel for
//! every write to one of those keys.

use crossbeam::channel::{Receiver, Sender, unbounded};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Setting keys owned by the widget itself.
pub mod keys {
    /// `|`-delimited list of toggle identifiers.
    pub const WIDGET_BUTTONS: &str = "widget_buttons";
    /// 1 (default) shows the widget, 0 hides it.
    pub const EXPANDED_VIEW_WIDGET: &str = "expanded_view_widget";
    /// 1 hides the scrollbar of a scrollable row. Default 0.
    pub const EXPANDED_HIDE_SCROLLBAR: &str = "expanded_hide_scrollbar";
    /// 0 = off, 1 = on, 2 (default) = follow [`HAPTIC_FEEDBACK_ENABLED`].
    pub const EXPANDED_HAPTIC_FEEDBACK: &str = "expanded_haptic_feedback";
    /// System-wide haptic switch. Default 1.
    pub const HAPTIC_FEEDBACK_ENABLED: &str = "haptic_feedback_enabled";
    pub const HAPTIC_DOWN_ARRAY: &str = "haptic_down_array";
    pub const HAPTIC_LONG_ARRAY: &str = "haptic_long_array";
    pub const EXPANDED_VIEW_WIDGET_COLOR: &str = "expanded_view_widget_color";
}

/// A single settings change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub key: String,
    /// The write came from inside the widget (a toggle reacting to a press).
    pub self_change: bool,
}

/// Deduplicated set of settings keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: BTreeSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn extend(&mut self, other: &KeySet) {
        self.keys.extend(other.keys.iter().cloned());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// Observer handle - dropping this stops notifications
pub struct SettingsSubscription {
    id: usize,
    store: Arc<SettingsInner>,
}

impl Drop for SettingsSubscription {
    fn drop(&mut self) {
        self.store
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

#[derive(Default)]
struct SettingsInner {
    values: RwLock<BTreeMap<String, String>>,
    observers: RwLock<HashMap<usize, (KeySet, Sender<SettingsChange>)>>,
    next_id: AtomicUsize,
}

/// Shared settings store. Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct Settings {
    inner: Arc<SettingsInner>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `values`, without notifying anyone.
    pub fn with_values(values: BTreeMap<String, String>) -> Self {
        let settings = Self::new();
        *settings
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner) = values;
        settings
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_string(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Integer flag: true only when the stored value is exactly 1.
    pub fn get_flag(&self, key: &str, default: bool) -> bool {
        self.get_int(key, i64::from(default)) == 1
    }

    /// Comma-separated list of durations, e.g. a vibration waveform.
    pub fn get_long_array(&self, key: &str) -> Option<Vec<u64>> {
        let raw = self.get_string(key)?;
        let parsed: Result<Vec<u64>, _> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect();

        match parsed {
            Ok(values) if !values.is_empty() => Some(values),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(key, %e, "ignoring malformed long array setting");
                None
            }
        }
    }

    pub fn put_string(&self, key: &str, value: impl Into<String>) {
        self.write(key, Some(value.into()), false);
    }

    pub fn put_int(&self, key: &str, value: i64) {
        self.write(key, Some(value.to_string()), false);
    }

    /// Write performed by the widget itself; observers see `self_change = true`.
    pub fn put_string_local(&self, key: &str, value: impl Into<String>) {
        self.write(key, Some(value.into()), true);
    }

    pub fn remove(&self, key: &str) {
        self.write(key, None, false);
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the whole store with `values`, notifying only keys whose value
    /// was added, changed or removed. Returns those keys.
    pub fn replace_all(&self, values: BTreeMap<String, String>) -> Vec<String> {
        let changed: Vec<String> = {
            let mut current = self
                .inner
                .values
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            let keys: BTreeSet<&String> = current.keys().chain(values.keys()).collect();
            let changed = keys
                .into_iter()
                .filter(|k| current.get(*k) != values.get(*k))
                .cloned()
                .collect();
            *current = values;
            changed
        };

        for key in &changed {
            self.notify(key, false);
        }
        changed
    }

    /// Register interest in `keys`.
    /// Returns (SettingsSubscription, Receiver) - drop the subscription to stop observing
    pub fn observe(&self, keys: KeySet) -> (SettingsSubscription, Receiver<SettingsChange>) {
        let (tx, rx) = unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);

        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (keys, tx));

        let sub = SettingsSubscription {
            id,
            store: self.inner.clone(),
        };
        (sub, rx)
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn write(&self, key: &str, value: Option<String>, self_change: bool) {
        {
            let mut values = self
                .inner
                .values
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match value {
                Some(v) => {
                    values.insert(key.to_string(), v);
                }
                None => {
                    if values.remove(key).is_none() {
                        return;
                    }
                }
            }
        }
        self.notify(key, self_change);
    }

    fn notify(&self, key: &str, self_change: bool) {
        let observers = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        for (keys, tx) in observers.values() {
            if keys.contains(key) {
                let _ = tx.send(SettingsChange {
                    key: key.to_string(),
                    self_change,
                });
            }
        }
    }
}
