// powerbar-toggles/src/common/button.rs
use powerbar_core::{ClickHandler, HapticConfig, PressHandlers, Surface, ToggleContext};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    prelude::Widget as RatatuiWidget,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use super::colors::{DEFAULT_PALETTE, ToggleState, state_color};

/// State every button carries regardless of what it switches: its id and
/// label, where it is attached, and the press handlers.
#[derive(Debug)]
pub struct ButtonBase {
    id: String,
    label: &'static str,
    surface: Option<Surface>,
    handlers: PressHandlers,
}

impl ButtonBase {
    pub fn new(id: &str, label: &'static str) -> Self {
        Self {
            id: id.to_string(),
            label,
            surface: None,
            handlers: PressHandlers::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attach(&mut self, surface: Option<Surface>) {
        self.surface = surface;
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn set_haptic(&mut self, config: &HapticConfig) {
        self.handlers.set_haptic(config);
    }

    pub fn set_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.handlers.set_click(handler);
    }

    pub fn set_long_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.handlers.set_long_click(handler);
    }

    /// Finish a press once the button has run its own action.
    pub fn pressed(&self, long: bool, ctx: &ToggleContext<'_>) {
        self.handlers.pressed(&self.id, long, ctx);
    }

    /// Draw the button: a bordered box colored by `state`, the label on top
    /// and `status` underneath. Detached buttons draw nothing.
    pub fn render(&self, area: Rect, buf: &mut Buffer, status: &str, state: ToggleState) {
        if !self.is_attached() || area.width == 0 || area.height == 0 {
            return;
        }

        let color = state_color(state);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let inner = block.inner(area);
        if inner.height == 0 {
            block.render(area, buf);
            return;
        }

        let label_style = match state {
            ToggleState::On => Style::default().fg(color).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(DEFAULT_PALETTE.text),
        };

        let mut lines = vec![Line::styled(self.label, label_style)];
        if inner.height > 1 && !status.is_empty() {
            lines.push(Line::styled(status.to_string(), Style::default().fg(color)));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
