// powerbar-core/src/event.rs
use crossbeam::channel::{Receiver, Sender, unbounded};
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Well-known event tags.
pub mod tags {
    /// Display geometry changed (rotation, terminal resize). Reserved for the widget.
    pub const CONFIGURATION_CHANGED: &str = "configuration_changed";
    /// Some setting changed somewhere; only triggers a refresh.
    pub const SETTINGS_CHANGED: &str = "settings_changed";
    /// Emitted by toggles when a press should vibrate. Payload: `Vec<u64>` pattern.
    pub const HAPTIC_FEEDBACK: &str = "haptic_feedback";

    pub const WIFI_STATE_CHANGED: &str = "wifi_state_changed";
    pub const WIFI_AP_STATE_CHANGED: &str = "wifi_ap_state_changed";
    pub const BLUETOOTH_STATE_CHANGED: &str = "bluetooth_state_changed";
    pub const LOCATION_PROVIDERS_CHANGED: &str = "location_providers_changed";
    pub const RINGER_MODE_CHANGED: &str = "ringer_mode_changed";
    pub const AIRPLANE_MODE_CHANGED: &str = "airplane_mode_changed";
    pub const SYNC_STATE_CHANGED: &str = "sync_state_changed";
    pub const NETWORK_MODE_CHANGED: &str = "network_mode_changed";
    pub const WIMAX_STATE_CHANGED: &str = "wimax_state_changed";
    pub const MEDIA_STATE_CHANGED: &str = "media_state_changed";
    pub const MEDIA_KEY: &str = "media_key";
    pub const GO_TO_SLEEP: &str = "go_to_sleep";
}

/// Event payload - can be any type
#[derive(Clone)]
pub struct EventPayload(Arc<dyn Any + Send + Sync>);

impl EventPayload {
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self(Arc::new(data))
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::downcast(self.0.clone()).ok()
    }
}

/// A system event: a tag naming what happened plus an opaque payload.
#[derive(Clone)]
pub struct Event {
    pub tag: String,
    pub payload: EventPayload,
}

impl Event {
    pub fn new<T: Any + Send + Sync>(tag: impl Into<String>, data: T) -> Self {
        Self {
            tag: tag.into(),
            payload: EventPayload::new(data),
        }
    }

    /// Event that carries no data.
    pub fn signal(tag: impl Into<String>) -> Self {
        Self::new(tag, ())
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event").field("tag", &self.tag).finish()
    }
}

/// Deduplicated set of event tags a subscriber is interested in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    tags: BTreeSet<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Merge every tag of `other` into this filter.
    pub fn extend(&mut self, other: &EventFilter) {
        self.tags.extend(other.tags.iter().cloned());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

/// Subscription handle - dropping this unsubscribes
pub struct Subscription {
    id: usize,
    bus: Arc<EventBusInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut subs = self
            .bus
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subs.remove(&self.id);
    }
}

struct EventBusInner {
    subscriptions: RwLock<HashMap<usize, (EventFilter, Sender<Event>)>>,
    next_id: AtomicUsize,
}

/// Event bus delivering each event to every subscriber whose filter holds its tag.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventBusInner {
                subscriptions: RwLock::new(HashMap::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Publish an event to all matching subscribers
    pub fn publish(&self, event: Event) {
        let subs = self
            .inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        for (filter, tx) in subs.values() {
            if filter.contains(&event.tag) {
                // Ignore send errors (subscriber dropped)
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Subscribe to every tag in `filter`.
    /// Returns (Subscription, Receiver) - drop Subscription to unsubscribe
    pub fn subscribe(&self, filter: EventFilter) -> (Subscription, Receiver<Event>) {
        let (tx, rx) = unbounded();

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);

        {
            let mut subs = self
                .inner
                .subscriptions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            subs.insert(id, (filter, tx));
        }

        let sub = Subscription {
            id,
            bus: self.inner.clone(),
        };

        (sub, rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
