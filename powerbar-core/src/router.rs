use crate::active::ActiveToggleSet;
use crate::event::{Event, EventBus, EventFilter, Subscription, tags};
use crate::toggle::ToggleContext;
use crossbeam::channel::Receiver;

/// Tags the widget always subscribes to, whatever the active toggles want.
pub const RESERVED_TAGS: [&str; 2] = [tags::CONFIGURATION_CHANGED, tags::SETTINGS_CHANGED];

/// What [`EventRouter::route`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Display geometry changed; the widget handles it, toggles never see it.
    ConfigurationChanged,
    /// Forwarded to `matched` toggles (possibly none).
    Delivered { matched: usize },
}

/// Merges the event interest of the active toggles into one subscription and
/// routes incoming events back to the toggles that asked for them.
#[derive(Default)]
pub struct EventRouter {
    filter: EventFilter,
    subscription: Option<(Subscription, Receiver<Event>)>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of every active toggle's interest plus [`RESERVED_TAGS`].
    pub fn merged_filter(active: &ActiveToggleSet) -> EventFilter {
        let mut filter = EventFilter::from_tags(RESERVED_TAGS);
        for toggle in active.iter() {
            filter.extend(&toggle.event_interest());
        }
        filter
    }

    /// Replace any previous subscription with one built from `active`.
    pub fn subscribe(&mut self, bus: &EventBus, active: &ActiveToggleSet) {
        self.unsubscribe();
        self.filter = Self::merged_filter(active);
        tracing::debug!(tags = ?self.filter, "subscribing to events");
        self.subscription = Some(bus.subscribe(self.filter.clone()));
    }

    /// Drop the subscription. Events queued but not yet taken are discarded.
    pub fn unsubscribe(&mut self) {
        self.subscription = None;
        self.filter = EventFilter::new();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Filter of the current subscription (empty when unsubscribed)
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Next queued event, if any
    pub fn try_next(&self) -> Option<Event> {
        self.subscription
            .as_ref()
            .and_then(|(_, rx)| rx.try_recv().ok())
    }

    /// Forward `event` to every toggle whose interest holds its tag. A toggle
    /// that fails to react is logged and skipped.
    pub fn route(event: &Event, active: &mut ActiveToggleSet, ctx: &ToggleContext<'_>) -> Routed {
        if event.tag == tags::CONFIGURATION_CHANGED {
            return Routed::ConfigurationChanged;
        }

        let mut matched = 0;
        for toggle in active.iter_mut() {
            if !toggle.event_interest().contains(&event.tag) {
                continue;
            }
            matched += 1;
            if let Err(e) = toggle.on_event(event, ctx) {
                tracing::warn!(toggle = toggle.id(), tag = %event.tag, %e, "toggle failed to handle event");
            }
        }

        Routed::Delivered { matched }
    }
}
