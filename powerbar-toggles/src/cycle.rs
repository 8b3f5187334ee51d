// powerbar-toggles/src/cycle.rs
use powerbar_core::{
    ClickHandler, Event, EventFilter, HapticConfig, KeySet, Surface, Toggle, ToggleContext,
    ToggleError,
};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::common::{ButtonBase, ToggleState};
use crate::switch::Trigger;

/// One position of a [`CycleToggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub value: i64,
    pub label: &'static str,
    pub state: ToggleState,
}

impl Step {
    pub const fn new(value: i64, label: &'static str, state: ToggleState) -> Self {
        Self { value, label, state }
    }
}

pub const RINGER_STEPS: [Step; 3] = [
    Step::new(0, "silent", ToggleState::Off),
    Step::new(1, "vibrate", ToggleState::Intermediate),
    Step::new(2, "normal", ToggleState::On),
];

pub const BRIGHTNESS_STEPS: [Step; 3] = [
    Step::new(30, "dim", ToggleState::Off),
    Step::new(102, "mid", ToggleState::Intermediate),
    Step::new(255, "max", ToggleState::On),
];

pub const SCREEN_TIMEOUT_STEPS: [Step; 4] = [
    Step::new(15_000, "15s", ToggleState::Off),
    Step::new(30_000, "30s", ToggleState::Intermediate),
    Step::new(60_000, "1m", ToggleState::On),
    Step::new(600_000, "10m", ToggleState::On),
];

pub const NETWORK_MODE_STEPS: [Step; 3] = [
    Step::new(0, "3G/2G", ToggleState::On),
    Step::new(1, "2G", ToggleState::Off),
    Step::new(2, "3G", ToggleState::Intermediate),
];

/// Button stepping an integer setting through a fixed list of values.
///
/// A stored value that matches no step shows as intermediate; the next press
/// moves to the first step.
pub struct CycleToggle {
    base: ButtonBase,
    key: &'static str,
    steps: &'static [Step],
    default: i64,
    trigger: Trigger,
    current: Option<usize>,
}

impl CycleToggle {
    pub fn new(
        id: &str,
        label: &'static str,
        key: &'static str,
        steps: &'static [Step],
        trigger: Trigger,
    ) -> Self {
        let default = steps.first().map(|s| s.value).unwrap_or_default();
        Self {
            base: ButtonBase::new(id, label),
            key,
            steps,
            default,
            trigger,
            current: None,
        }
    }

    /// Value assumed while the setting has never been written
    pub fn with_default(mut self, value: i64) -> Self {
        self.default = value;
        self
    }

    pub fn current(&self) -> Option<&Step> {
        self.current.and_then(|i| self.steps.get(i))
    }

    fn read(&mut self, ctx: &ToggleContext<'_>) {
        let value = ctx.settings.get_int(self.key, self.default);
        self.current = self.steps.iter().position(|s| s.value == value);
        if self.current.is_none() {
            tracing::debug!(toggle = self.base.id(), value, "value matches no step");
        }
    }

    fn next_step(&self) -> Option<&Step> {
        let next = match self.current {
            Some(i) => (i + 1) % self.steps.len().max(1),
            None => 0,
        };
        self.steps.get(next)
    }
}

impl Toggle for CycleToggle {
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
        let step = *self
            .next_step()
            .ok_or_else(|| ToggleError::reaction(self.base.id(), "no steps to cycle through"))?;

        ctx.settings.put_int(self.key, step.value);
        self.current = self.steps.iter().position(|s| s.value == step.value);
        if let Trigger::Event(tag) = self.trigger {
            ctx.events.publish(Event::new(tag, step.value));
        }
        self.base.pressed(false, ctx);
        Ok(())
    }

    fn on_long_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.base.pressed(true, ctx);
        Ok(())
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let (status, state) = match self.current() {
            Some(step) => (step.label, step.state),
            None => ("?", ToggleState::Intermediate),
        };
        self.base.render(area, buf, status, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerbar_core::{EventBus, Settings, tags};

    fn sound() -> CycleToggle {
        CycleToggle::new(
            "sound",
            "Sound",
            "ringer_mode",
            &RINGER_STEPS,
            Trigger::Event(tags::RINGER_MODE_CHANGED),
        )
        .with_default(2)
    }

    #[test]
    fn test_refresh_uses_default() {
        let settings = Settings::new();
        let bus = EventBus::new();
        let mut toggle = sound();

        toggle.refresh(&ToggleContext::new(&settings, &bus)).unwrap();
        assert_eq!(toggle.current().map(|s| s.label), Some("normal"));
    }

    #[test]
    fn test_click_wraps_around() {
        let settings = Settings::new();
        let bus = EventBus::new();
        let (_sub, rx) = bus.subscribe(EventFilter::from_tags([tags::RINGER_MODE_CHANGED]));
        let ctx = ToggleContext::new(&settings, &bus);
        let mut toggle = sound();
        toggle.refresh(&ctx).unwrap();

        toggle.on_click(&ctx).unwrap();
        assert_eq!(toggle.current().map(|s| s.label), Some("silent"));
        assert_eq!(settings.get_int("ringer_mode", -1), 0);
        assert_eq!(*rx.try_recv().unwrap().payload.downcast::<i64>().unwrap(), 0);

        toggle.on_click(&ctx).unwrap();
        assert_eq!(toggle.current().map(|s| s.label), Some("vibrate"));
    }

    #[test]
    fn test_unknown_value_restarts_cycle() {
        let settings = Settings::new();
        let bus = EventBus::new();
        let ctx = ToggleContext::new(&settings, &bus);
        let mut toggle = CycleToggle::new(
            "brightness",
            "Light",
            "screen_brightness",
            &BRIGHTNESS_STEPS,
            Trigger::Setting,
        );
        assert!(toggle.observed_keys().contains("screen_brightness"));

        settings.put_int("screen_brightness", 77);
        toggle.on_setting_changed("screen_brightness", &ctx).unwrap();
        assert!(toggle.current().is_none());

        toggle.on_click(&ctx).unwrap();
        assert_eq!(settings.get_int("screen_brightness", 0), 30);
    }

    #[test]
    fn test_no_steps_is_an_error() {
        let settings = Settings::new();
        let bus = EventBus::new();
        let ctx = ToggleContext::new(&settings, &bus);
        let mut toggle = CycleToggle::new("empty", "Empty", "nothing", &[], Trigger::Setting);

        assert!(matches!(toggle.on_click(&ctx), Err(ToggleError::Reaction { .. })));
    }
}
