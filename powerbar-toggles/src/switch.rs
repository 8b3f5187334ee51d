// powerbar-toggles/src/switch.rs
use powerbar_core::{
    ClickHandler, Event, EventFilter, HapticConfig, KeySet, Surface, Toggle, ToggleContext,
    ToggleError,
};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::common::{ButtonBase, ToggleState};

/// How a switch learns that its state changed behind its back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The system broadcasts this event tag
    Event(&'static str),
    /// The settings key itself is observed
    Setting,
}

/// On/off button backed by a settings flag.
///
/// A press flips the flag. Event-triggered switches then publish their tag
/// carrying the new state, as the system would.
pub struct SwitchToggle {
    base: ButtonBase,
    key: &'static str,
    default_on: bool,
    trigger: Trigger,
    on: bool,
}

impl SwitchToggle {
    pub fn new(id: &str, label: &'static str, key: &'static str, trigger: Trigger) -> Self {
        Self {
            base: ButtonBase::new(id, label),
            key,
            default_on: false,
            trigger,
            on: false,
        }
    }

    /// State assumed while the flag has never been written
    pub fn default_on(mut self, on: bool) -> Self {
        self.default_on = on;
        self.on = on;
        self
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    fn read(&mut self, ctx: &ToggleContext<'_>) {
        self.on = ctx.settings.get_flag(self.key, self.default_on);
    }
}

impl Toggle for SwitchToggle {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn attach(&mut self, surface: Option<Surface>) {
        self.base.attach(surface);
    }

    fn event_interest(&self) -> EventFilter {
        match self.trigger {
            Trigger::Event(tag) => EventFilter::from_tags([tag]),
            Trigger::Setting => EventFilter::new(),
        }
    }

    fn observed_keys(&self) -> KeySet {
        match self.trigger {
            Trigger::Event(_) => KeySet::new(),
            Trigger::Setting => KeySet::from_keys([self.key]),
        }
    }

    fn on_event(&mut self, _event: &Event, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.read(ctx);
        Ok(())
    }

    fn on_setting_changed(&mut self, _key: &str, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.read(ctx);
        Ok(())
    }

    fn refresh(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.read(ctx);
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
        self.on = !self.on;
        tracing::debug!(toggle = self.base.id(), on = self.on, "switching");
        ctx.settings.put_int(self.key, i64::from(self.on));
        if let Trigger::Event(tag) = self.trigger {
            ctx.events.publish(Event::new(tag, self.on));
        }
        self.base.pressed(false, ctx);
        Ok(())
    }

    fn on_long_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.base.pressed(true, ctx);
        Ok(())
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let (status, state) = if self.on {
            ("on", ToggleState::On)
        } else {
            ("off", ToggleState::Off)
        };
        self.base.render(area, buf, status, state);
    }
}
