//! Recording toggles shared by the unit tests.

use crate::error::ToggleError;
use crate::event::{Event, EventFilter};
use crate::haptic::HapticConfig;
use crate::registry::ToggleRegistry;
use crate::settings::KeySet;
use crate::toggle::{ClickHandler, PressHandlers, Surface, Toggle, ToggleContext};
use ratatui::{buffer::Buffer, layout::Rect};
use std::sync::{Arc, Mutex};

/// Every trait call a [`RecordingToggle`] received, tagged with its id.
#[derive(Debug, Default)]
pub struct Calls {
    pub created: Vec<String>,
    pub attached: Vec<(String, Option<Surface>)>,
    pub events: Vec<(String, String)>,
    pub settings: Vec<(String, String)>,
    pub refreshed: Vec<String>,
    pub haptic: Vec<(String, HapticConfig)>,
    pub clicks: Vec<(String, bool)>,
    pub rendered: Vec<(String, Rect)>,
}

pub type CallLog = Arc<Mutex<Calls>>;

pub fn count(ids: &[String], id: &str) -> usize {
    ids.iter().filter(|i| *i == id).count()
}

pub struct ToggleSpec {
    pub id: &'static str,
    pub events: &'static [&'static str],
    pub keys: &'static [&'static str],
    /// Reactions return an error instead of succeeding
    pub faulty: bool,
}

impl ToggleSpec {
    pub const fn plain(id: &'static str) -> Self {
        Self {
            id,
            events: &[],
            keys: &[],
            faulty: false,
        }
    }
}

pub struct RecordingToggle {
    id: String,
    events: EventFilter,
    keys: KeySet,
    faulty: bool,
    surface: Option<Surface>,
    handlers: PressHandlers,
    log: CallLog,
}

impl RecordingToggle {
    fn fail_or_ok(&self, what: &str) -> Result<(), ToggleError> {
        if self.faulty {
            Err(ToggleError::reaction(&self.id, what))
        } else {
            Ok(())
        }
    }
}

impl Toggle for RecordingToggle {
    fn id(&self) -> &str {
        &self.id
    }

    fn attach(&mut self, surface: Option<Surface>) {
        self.surface = surface;
        self.log
            .lock()
            .unwrap()
            .attached
            .push((self.id.clone(), surface));
    }

    fn event_interest(&self) -> EventFilter {
        self.events.clone()
    }

    fn observed_keys(&self) -> KeySet {
        self.keys.clone()
    }

    fn on_event(&mut self, event: &Event, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.log
            .lock()
            .unwrap()
            .events
            .push((self.id.clone(), event.tag.clone()));
        self.fail_or_ok("event")
    }

    fn on_setting_changed(&mut self, key: &str, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.log
            .lock()
            .unwrap()
            .settings
            .push((self.id.clone(), key.to_string()));
        self.fail_or_ok("setting")
    }

    fn refresh(&mut self, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.log.lock().unwrap().refreshed.push(self.id.clone());
        self.fail_or_ok("refresh")
    }

    fn set_haptic(&mut self, config: &HapticConfig) {
        self.handlers.set_haptic(config);
        self.log
            .lock()
            .unwrap()
            .haptic
            .push((self.id.clone(), config.clone()));
    }

    fn set_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.handlers.set_click(handler);
    }

    fn set_long_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.handlers.set_long_click(handler);
    }

    fn on_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.log
            .lock()
            .unwrap()
            .clicks
            .push((self.id.clone(), false));
        self.handlers.pressed(&self.id, false, ctx);
        Ok(())
    }

    fn on_long_click(&mut self, ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
        self.log
            .lock()
            .unwrap()
            .clicks
            .push((self.id.clone(), true));
        self.handlers.pressed(&self.id, true, ctx);
        Ok(())
    }

    fn render(&mut self, area: Rect, _buf: &mut Buffer) {
        if self.surface.is_some() {
            self.log
                .lock()
                .unwrap()
                .rendered
                .push((self.id.clone(), area));
        }
    }
}

/// Registry of recording toggles, plus a `broken` id whose factory always fails.
pub fn registry(specs: Vec<ToggleSpec>, log: &CallLog) -> Arc<ToggleRegistry> {
    let mut builder = ToggleRegistry::builder().register("broken", |_| {
        Err(ToggleError::construction("broken", "always fails"))
    });

    for spec in specs {
        let log = log.clone();
        builder = builder.register(spec.id, move |_| {
            log.lock().unwrap().created.push(spec.id.to_string());
            Ok(Box::new(RecordingToggle {
                id: spec.id.to_string(),
                events: EventFilter::from_tags(spec.events.iter().copied()),
                keys: KeySet::from_keys(spec.keys.iter().copied()),
                faulty: spec.faulty,
                surface: None,
                handlers: PressHandlers::default(),
                log: log.clone(),
            }) as Box<dyn Toggle>)
        });
    }

    Arc::new(builder.build())
}

/// The default-policy identifiers plus a few extras, none with interests.
pub fn plain_registry(log: &CallLog) -> Arc<ToggleRegistry> {
    registry(
        [
            "wifi",
            "bluetooth",
            "gps",
            "sound",
            "fastcharge",
            "wimax",
            "sync",
            "brightness",
        ]
        .into_iter()
        .map(ToggleSpec::plain)
        .collect(),
        log,
    )
}
