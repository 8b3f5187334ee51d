// powerbar-core/src/toggle.rs
use crate::error::ToggleError;
use crate::event::{Event, EventBus, EventFilter, tags};
use crate::haptic::HapticConfig;
use crate::settings::{KeySet, Settings};
use ratatui::{buffer::Buffer, layout::Rect};
use std::sync::Arc;

/// Handler invoked with the toggle id after a press has been handled by the toggle.
pub type ClickHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// The slot a toggle occupies in the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    /// Position in display order, starting at 0
    pub slot: usize,
    /// Width reserved for the button, in cells
    pub width: u16,
}

/// System state handed to toggles when they react or refresh.
#[derive(Clone, Copy)]
pub struct ToggleContext<'a> {
    pub settings: &'a Settings,
    pub events: &'a EventBus,
}

impl<'a> ToggleContext<'a> {
    pub fn new(settings: &'a Settings, events: &'a EventBus) -> Self {
        Self { settings, events }
    }
}

/// A single stateful button in the row.
///
/// Implementations own their display state. The widget decides when they are
/// attached, which notifications reach them and when they refresh.
pub trait Toggle: Send {
    /// Identifier this toggle was registered under
    fn id(&self) -> &str;

    /// Bind to a slot in the row, or detach with `None`
    fn attach(&mut self, surface: Option<Surface>);

    /// Event tags this toggle wants to receive
    fn event_interest(&self) -> EventFilter {
        EventFilter::new()
    }

    /// Settings keys this toggle wants to be told about
    fn observed_keys(&self) -> KeySet {
        KeySet::new()
    }

    /// Called for events whose tag is in [`Toggle::event_interest`]
    fn on_event(&mut self, _event: &Event, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        Ok(())
    }

    /// Called when a key from [`Toggle::observed_keys`] changes
    fn on_setting_changed(
        &mut self,
        _key: &str,
        _ctx: &ToggleContext<'_>,
    ) -> Result<(), ToggleError> {
        Ok(())
    }

    /// Re-read the current system state into the displayed state
    fn refresh(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError>;

    fn set_haptic(&mut self, config: &HapticConfig);

    fn set_click_handler(&mut self, handler: Option<ClickHandler>);

    fn set_long_click_handler(&mut self, handler: Option<ClickHandler>);

    /// User pressed the button
    fn on_click(&mut self, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        Ok(())
    }

    /// User long-pressed the button
    fn on_long_click(&mut self, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        Ok(())
    }

    /// Draw the button into `area`. Detached toggles draw nothing.
    fn render(&mut self, area: Rect, buf: &mut Buffer);
}

/// Press plumbing most toggles share: the external handlers and haptic config.
#[derive(Clone, Default)]
pub struct PressHandlers {
    click: Option<ClickHandler>,
    long_click: Option<ClickHandler>,
    haptic: HapticConfig,
}

impl PressHandlers {
    pub fn set_click(&mut self, handler: Option<ClickHandler>) {
        self.click = handler;
    }

    pub fn set_long_click(&mut self, handler: Option<ClickHandler>) {
        self.long_click = handler;
    }

    pub fn set_haptic(&mut self, config: &HapticConfig) {
        self.haptic = config.clone();
    }

    /// Finish a press: emit haptic feedback if configured, then run the
    /// external handler.
    pub fn pressed(&self, id: &str, long: bool, ctx: &ToggleContext<'_>) {
        if let Some(pattern) = self.haptic.pattern_for(long) {
            ctx.events
                .publish(Event::new(tags::HAPTIC_FEEDBACK, pattern.to_vec()));
        }

        let handler = if long { &self.long_click } else { &self.click };
        if let Some(handler) = handler {
            handler(id);
        }
    }
}

impl std::fmt::Debug for PressHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressHandlers")
            .field("click", &self.click.is_some())
            .field("long_click", &self.long_click.is_some())
            .field("haptic", &self.haptic)
            .finish()
    }
}
