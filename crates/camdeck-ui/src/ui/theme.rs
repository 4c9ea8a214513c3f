//! Colours, fonts and layout constants for the 128x160 panel.
//!
//! ## Semantic Font API
//!
//! UI code picks from three tiers:
//! - `ui_font_title()`: banners and large result text
//! - `ui_font_body()`: menu rows and headers
//! - `ui_font_small()`: hints, captions, wrapped text

use embedded_graphics::mono_font::{ascii, MonoFont};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};

pub fn ui_font_title() -> &'static MonoFont<'static> {
    &ascii::FONT_10X20
}

pub fn ui_font_body() -> &'static MonoFont<'static> {
    &ascii::FONT_6X13_BOLD
}

pub fn ui_font_small() -> &'static MonoFont<'static> {
    &ascii::FONT_6X10
}

pub fn ui_font_small_char_width() -> i32 {
    ui_font_small().character_size.width as i32
}

/// Named colours used across screens.
pub mod palette {
    use super::*;

    pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
    pub const TEXT: Rgb565 = Rgb565::WHITE;
    pub const ACCENT: Rgb565 = Rgb565::CYAN;
    pub const HIGHLIGHT: Rgb565 = Rgb565::BLUE;
    pub const WARNING: Rgb565 = Rgb565::YELLOW;
    pub const ERROR: Rgb565 = Rgb565::RED;
    pub const SUCCESS: Rgb565 = Rgb565::GREEN;
    pub const MAGENTA: Rgb565 = Rgb565::MAGENTA;
    pub const MUTED: Rgb565 = Rgb565::CSS_DIM_GRAY;
}

// ── Layout constants ────────────────────────────────────────────────

/// Layout constants for the 128x160 portrait panel.
pub mod layout {
    /// Side margin (left/right padding from screen edge).
    pub const MARGIN: i32 = 5;

    /// Header bar height (title + separator line area).
    pub const HEADER_H: i32 = 20;

    /// Y baseline for header text.
    pub const HEADER_TEXT_Y: i32 = 13;

    /// Y of the separator under the header.
    pub const HEADER_SEP_Y: i32 = 18;

    /// First list row top.
    pub const LIST_TOP: i32 = 28;

    /// Height of one menu row.
    pub const ROW_H: i32 = 24;

    /// Vertical text offset inside a row.
    pub const ROW_TEXT_Y: i32 = 16;

    /// Scroll indicator column width.
    pub const SCROLL_BAR_W: u32 = 3;

    /// Camera viewport height; the button bar sits below it.
    pub const VIEWPORT_H: u32 = 140;

    /// Top of the camera button bar.
    pub const BUTTON_BAR_Y: i32 = 140;

    /// Height of the camera button bar.
    pub const BUTTON_BAR_H: u32 = 20;

    /// Game playfield top (score strip above).
    pub const PLAYFIELD_TOP: i32 = 16;

    /// Footer hint baseline.
    pub const FOOTER_TEXT_Y: i32 = 154;
}
