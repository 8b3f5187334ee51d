// powerbar-toggles/src/common/colors.rs
use ratatui::style::Color;

/// Displayed state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Off,
    On,
    /// Between on and off, or a middle step of a cycle
    Intermediate,
}

/// Common color palette for consistent theming across buttons
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub on: Color,
    pub off: Color,
    pub intermediate: Color,
    /// Label text
    pub text: Color,
}

pub const DEFAULT_PALETTE: ColorPalette = ColorPalette {
    on: Color::Cyan,
    off: Color::DarkGray,
    intermediate: Color::Yellow,
    text: Color::White,
};

/// Get color for a button state
///
/// # Example
/// ```rust
/// use powerbar_toggles::common::{ToggleState, state_color};
/// use ratatui::style::Color;
/// assert_eq!(state_color(ToggleState::On), Color::Cyan);
/// ```
pub fn state_color(state: ToggleState) -> Color {
    state_color_palette(state, DEFAULT_PALETTE)
}

pub fn state_color_palette(state: ToggleState, palette: ColorPalette) -> Color {
    match state {
        ToggleState::On => palette.on,
        ToggleState::Off => palette.off,
        ToggleState::Intermediate => palette.intermediate,
    }
}
