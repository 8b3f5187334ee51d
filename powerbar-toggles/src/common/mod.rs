// powerbar-toggles/src/common/mod.rs
pub mod button;
pub mod colors;

pub use button::ButtonBase;
pub use colors::{ColorPalette, DEFAULT_PALETTE, ToggleState, state_color, state_color_palette};
