// powerbar-core/src/widget.rs
//! The widget: owns the active toggles and keeps them in step with events
//! and settings.
//!
//! Lifecycle: `Uninitialized → Configuring → Active → Reconfiguring → Active
//! → … → Destroyed`. A change to the button list (or [`PowerWidget::setup_widget`])
//! tears everything down and builds it again from scratch; a display
//! configuration change only rebuilds the layout.
//!
//! All dispatch happens on the thread that owns the widget. Notifications
//! queue up on channels and are handled by [`PowerWidget::pump`].

use crate::active::{ActiveToggleSet, default_config, parse_config};
use crate::capability::Capabilities;
use crate::event::{Event, EventBus, EventFilter};
use crate::haptic::HapticConfig;
use crate::layout::{LAYOUT_SCROLL_BUTTON_THRESHOLD, LayoutMode, RowLayout, button_width};
use crate::registry::ToggleRegistry;
use crate::router::{EventRouter, Routed};
use crate::settings::{KeySet, Settings, SettingsChange, keys};
use crate::toggle::{ClickHandler, Surface, ToggleContext};
use crate::watcher::SettingsWatcher;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget},
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Uninitialized,
    Configuring,
    Active,
    Reconfiguring,
    Destroyed,
}

/// Payload of a configuration-changed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    /// Display width in cells
    pub width: u16,
}

pub struct PowerWidget {
    state: WidgetState,
    settings: Settings,
    events: EventBus,
    capabilities: Box<dyn Capabilities>,

    active: ActiveToggleSet,
    router: EventRouter,
    watcher: SettingsWatcher,

    click_handler: Option<ClickHandler>,
    long_click_handler: Option<ClickHandler>,
    haptic: HapticConfig,

    // Display
    layout: Option<RowLayout>,
    display_width: u16,
    /// Width of the last rendered area; scrolling clamps against it
    viewport_width: u16,
    button_width: u16,
    visible: bool,

    generation: u64,
}

impl PowerWidget {
    /// Build the widget and bring it to `Active`.
    pub fn new(
        registry: Arc<ToggleRegistry>,
        settings: Settings,
        events: EventBus,
        capabilities: Box<dyn Capabilities>,
        display: DisplayMetrics,
    ) -> Self {
        let mut widget = Self {
            state: WidgetState::Uninitialized,
            settings,
            events,
            capabilities,
            active: ActiveToggleSet::new(registry),
            router: EventRouter::new(),
            watcher: SettingsWatcher::new(),
            click_handler: None,
            long_click_handler: None,
            haptic: HapticConfig::default(),
            layout: None,
            display_width: display.width,
            viewport_width: display.width,
            button_width: 1,
            visible: true,
            generation: 0,
        };

        widget.update_button_width();
        widget.setup_widget();
        widget
    }

    /// Tear down every toggle and subscription, then configure again from
    /// the stored button list.
    pub fn setup_widget(&mut self) {
        if self.guard_destroyed("setup_widget") {
            return;
        }
        if self.state == WidgetState::Active {
            self.state = WidgetState::Reconfiguring;
        }

        self.release();
        self.state = WidgetState::Configuring;
        tracing::info!("setting up widget");

        let config = self.button_config();
        tracing::info!(%config, "button list");

        let loaded = {
            let ctx = ToggleContext::new(&self.settings, &self.events);
            self.active.configure(
                &config,
                self.click_handler.as_ref(),
                self.long_click_handler.as_ref(),
                &ctx,
            )
        };
        self.generation += 1;
        tracing::debug!(?loaded, generation = self.generation, "toggles loaded");

        self.recreate_layout();
        self.update_haptic_feedback();

        self.router.subscribe(&self.events, &self.active);
        self.watcher.subscribe(&self.settings, &self.active);

        self.update_visibility();
        self.state = WidgetState::Active;
    }

    /// Final teardown. The widget must not be used afterwards.
    pub fn destroy(&mut self) {
        if self.guard_destroyed("destroy") {
            return;
        }
        tracing::info!("destroying widget");
        self.release();
        self.state = WidgetState::Destroyed;
    }

    fn release(&mut self) {
        self.layout = None;
        self.router.unsubscribe();
        self.watcher.unsubscribe();
        self.active.teardown_all();
    }

    fn guard_destroyed(&self, operation: &str) -> bool {
        if self.state == WidgetState::Destroyed {
            tracing::warn!(operation, "widget already destroyed");
            return true;
        }
        false
    }

    /// Stored button list, or the default list when none (or a blank one) is stored.
    fn button_config(&self) -> String {
        match self.settings.get_string(keys::WIDGET_BUTTONS) {
            Some(config) if !parse_config(&config).is_empty() => config,
            _ => {
                tracing::info!("default buttons being loaded");
                default_config(self.capabilities.as_ref())
            }
        }
    }

    /// Handle every queued event and settings change. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while self.state != WidgetState::Destroyed {
            if let Some(event) = self.router.try_next() {
                self.handle_event(&event);
            } else if let Some(change) = self.watcher.try_next() {
                self.handle_settings_change(&change);
            } else {
                break;
            }
            handled += 1;
        }
        handled
    }

    pub fn handle_event(&mut self, event: &Event) {
        if self.guard_destroyed("handle_event") {
            return;
        }

        let routed = {
            let ctx = ToggleContext::new(&self.settings, &self.events);
            EventRouter::route(event, &mut self.active, &ctx)
        };

        match routed {
            Routed::ConfigurationChanged => {
                if let Some(metrics) = event.payload.downcast::<DisplayMetrics>() {
                    self.display_width = metrics.width;
                }
                self.update_button_width();
                self.recreate_layout();
            }
            Routed::Delivered { matched } => {
                tracing::trace!(tag = %event.tag, matched, "event routed");
            }
        }

        self.update_all();
    }

    pub fn handle_settings_change(&mut self, change: &SettingsChange) {
        if self.guard_destroyed("handle_settings_change") {
            return;
        }
        let key = change.key.as_str();
        let reaction = SettingsWatcher::classify(key);

        if reaction.reconfigure {
            self.setup_widget();
        } else if reaction.visibility {
            self.update_visibility();
        } else if reaction.scrollbar {
            self.update_scrollbar();
        }

        if reaction.haptic {
            self.update_haptic_feedback();
        }

        {
            let ctx = ToggleContext::new(&self.settings, &self.events);
            SettingsWatcher::forward(key, &mut self.active, &ctx);
        }

        self.update_all();
    }

    /// Refresh every active toggle from current system state.
    pub fn update_all(&mut self) {
        let ctx = ToggleContext::new(&self.settings, &self.events);
        for toggle in self.active.iter_mut() {
            if let Err(e) = toggle.refresh(&ctx) {
                tracing::warn!(toggle = toggle.id(), %e, "toggle failed to refresh");
            }
        }
    }

    pub fn set_global_click_handler(&mut self, handler: Option<ClickHandler>) {
        for toggle in self.active.iter_mut() {
            toggle.set_click_handler(handler.clone());
        }
        self.click_handler = handler;
    }

    pub fn set_global_long_click_handler(&mut self, handler: Option<ClickHandler>) {
        for toggle in self.active.iter_mut() {
            toggle.set_long_click_handler(handler.clone());
        }
        self.long_click_handler = handler;
    }

    /// Press the button in display slot `slot`. Returns false when the slot is empty.
    pub fn click(&mut self, slot: usize) -> bool {
        self.press(slot, false)
    }

    pub fn long_click(&mut self, slot: usize) -> bool {
        self.press(slot, true)
    }

    fn press(&mut self, slot: usize, long: bool) -> bool {
        if self.guard_destroyed("press") {
            return false;
        }
        let ctx = ToggleContext::new(&self.settings, &self.events);
        let Some(toggle) = self.active.at_slot_mut(slot) else {
            return false;
        };

        let result = if long {
            toggle.on_long_click(&ctx)
        } else {
            toggle.on_click(&ctx)
        };
        if let Err(e) = result {
            tracing::warn!(toggle = toggle.id(), long, %e, "toggle failed to handle press");
        }
        true
    }

    /// Scroll a scrollable row by `delta` cells; ignored otherwise.
    pub fn scroll_by(&mut self, delta: i32) {
        let viewport = self.viewport_width;
        if let Some(layout) = self.layout.as_mut() {
            layout.scroll_by(delta, viewport);
        }
    }

    fn update_button_width(&mut self) {
        self.button_width = button_width(self.display_width, LAYOUT_SCROLL_BUTTON_THRESHOLD);
    }

    fn recreate_layout(&mut self) {
        let mut layout = RowLayout::new(self.active.len(), self.button_width);

        let width = self.button_width;
        for (slot, toggle) in self.active.ordered_mut() {
            toggle.attach(Some(Surface { slot, width }));
        }

        if layout.mode() == LayoutMode::Scrollable {
            layout.set_scrollbar_enabled(!self.scrollbar_hidden());
        }
        tracing::debug!(mode = ?layout.mode(), slots = layout.slots(), width, "layout rebuilt");
        self.layout = Some(layout);
    }

    fn scrollbar_hidden(&self) -> bool {
        self.settings.get_flag(keys::EXPANDED_HIDE_SCROLLBAR, false)
    }

    fn update_visibility(&mut self) {
        self.visible = self.settings.get_flag(keys::EXPANDED_VIEW_WIDGET, true);
    }

    fn update_scrollbar(&mut self) {
        let hidden = self.scrollbar_hidden();
        if let Some(layout) = self.layout.as_mut() {
            layout.set_scrollbar_enabled(!hidden);
        }
    }

    fn update_haptic_feedback(&mut self) {
        self.haptic = HapticConfig::from_settings(&self.settings);
        for toggle in self.active.iter_mut() {
            toggle.set_haptic(&self.haptic);
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if !self.visible || self.state == WidgetState::Destroyed {
            return;
        }
        self.viewport_width = area.width;
        let Some(layout) = self.layout.as_ref() else {
            return;
        };

        let areas = layout.areas(area);
        let scrollbar_area = layout.scrollbar_area(area);
        let fading_edge = layout.fading_edge();
        let offset = layout.scroll_offset();
        let content_width = layout.content_width();

        for (slot, toggle) in self.active.ordered_mut() {
            if let Some(Some(rect)) = areas.get(slot) {
                toggle.render(*rect, buf);
            }
        }

        if let Some(edge) = fading_edge {
            let dim = Style::default().add_modifier(Modifier::DIM);
            let edge = edge.min(area.width);
            if offset > 0 {
                buf.set_style(Rect { width: edge, ..area }, dim);
            }
            if u32::from(offset) + u32::from(area.width) < content_width {
                buf.set_style(
                    Rect {
                        x: area.x + area.width - edge,
                        width: edge,
                        ..area
                    },
                    dim,
                );
            }
        }

        if let Some(bar_area) = scrollbar_area {
            let max_offset = content_width.saturating_sub(u32::from(area.width));
            let mut state = ScrollbarState::new(max_offset as usize + 1).position(offset as usize);
            Scrollbar::new(ScrollbarOrientation::HorizontalBottom).render(bar_area, buf, &mut state);
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Active toggle ids in display order
    pub fn active_ids(&self) -> &[String] {
        self.active.ids()
    }

    pub fn layout(&self) -> Option<&RowLayout> {
        self.layout.as_ref()
    }

    pub fn layout_mode(&self) -> Option<LayoutMode> {
        self.layout.as_ref().map(RowLayout::mode)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn haptic(&self) -> &HapticConfig {
        &self.haptic
    }

    pub fn button_width(&self) -> u16 {
        self.button_width
    }

    /// Incremented every time the toggles are rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn event_filter(&self) -> &EventFilter {
        self.router.filter()
    }

    pub fn observed_keys(&self) -> &KeySet {
        self.watcher.keys()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
