// powerbar-toggles/src/action.rs
//! Buttons that fire a one-shot action instead of switching a setting.

use powerbar_core::{
    ClickHandler, Event, EventFilter, HapticConfig, Surface, Toggle, ToggleContext, ToggleError,
    tags,
};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::common::{ButtonBase, ToggleState};
use crate::system::{MediaKey, ids};

/// Puts the device to sleep.
pub struct SleepToggle {
    base: ButtonBase,
}

impl SleepToggle {
    pub fn new(id: &str) -> Self {
        Self {
            base: ButtonBase::new(id, "Sleep"),
        }
    }
}

impl Toggle for SleepToggle {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn attach(&mut self, surface: Option<Surface>) {
        self.base.attach(surface);
    }

    fn refresh(&mut self, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        Ok(())
    }

    fn set_haptic(&mut self, config: &HapticConfig) {
        self.base.set_haptic(config);
    }

    fn set_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.base.set_click_handler(handler);
    }

    fn set_long_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.base.set_long_click_handler(handler);
    }

    fn on_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        tracing::info!("going to sleep");
        ctx.events.publish(Event::signal(tags::GO_TO_SLEEP));
        self.base.pressed(false, ctx);
        Ok(())
    }

    fn on_long_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.base.pressed(true, ctx);
        Ok(())
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.base.render(area, buf, "", ToggleState::Off);
    }
}

/// Sends a media key. The play/pause button also tracks playback state.
pub struct MediaToggle {
    base: ButtonBase,
    key: MediaKey,
    playing: bool,
}

impl MediaToggle {
    pub fn new(id: &str) -> Self {
        let (key, label) = match id {
            ids::MEDIA_PREVIOUS => (MediaKey::Previous, "Prev"),
            ids::MEDIA_NEXT => (MediaKey::Next, "Next"),
            _ => (MediaKey::PlayPause, "Play"),
        };
        Self {
            base: ButtonBase::new(id, label),
            key,
            playing: false,
        }
    }

    pub fn key(&self) -> MediaKey {
        self.key
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Toggle for MediaToggle {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn attach(&mut self, surface: Option<Surface>) {
        self.base.attach(surface);
    }

    fn event_interest(&self) -> EventFilter {
        match self.key {
            MediaKey::PlayPause => EventFilter::from_tags([tags::MEDIA_STATE_CHANGED]),
            MediaKey::Previous | MediaKey::Next => EventFilter::new(),
        }
    }

    fn on_event(&mut self, event: &Event, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        let playing = event
            .payload
            .downcast::<bool>()
            .ok_or_else(|| ToggleError::reaction(self.base.id(), "media state without a bool payload"))?;
        self.playing = *playing;
        Ok(())
    }

    fn refresh(&mut self, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        Ok(())
    }

    fn set_haptic(&mut self, config: &HapticConfig) {
        self.base.set_haptic(config);
    }

    fn set_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.base.set_click_handler(handler);
    }

    fn set_long_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.base.set_long_click_handler(handler);
    }

    fn on_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        tracing::debug!(key = ?self.key, "sending media key");
        ctx.events.publish(Event::new(tags::MEDIA_KEY, self.key));
        self.base.pressed(false, ctx);
        Ok(())
    }

    fn on_long_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.base.pressed(true, ctx);
        Ok(())
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let (status, state) = match (self.key, self.playing) {
            (MediaKey::PlayPause, true) => ("playing", ToggleState::On),
            (MediaKey::PlayPause, false) => ("paused", ToggleState::Off),
            _ => ("", ToggleState::Off),
        };
        self.base.render(area, buf, status, state);
    }
}
