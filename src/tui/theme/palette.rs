//! Color palette - dark theme with a warm accent

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color,
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub border: Color,
    pub playing: Color,
    pub liked: Color,
    pub error: Color,
}

impl Palette {
    /// Default dark palette
    pub const DARK: Self = Self {
        bg_primary: Color::Rgb(16, 16, 20),       // #101014 near black
        fg_primary: Color::Rgb(235, 235, 235),    // #ebebeb off white
        fg_secondary: Color::Rgb(140, 140, 150),  // #8c8c96 medium gray
        accent: Color::Rgb(255, 176, 97),         // #ffb061 warm amber
        accent_alt: Color::Rgb(214, 160, 255),    // #d6a0ff soft violet
        border: Color::Rgb(64, 64, 72),           // #404048 dark gray
        playing: Color::Rgb(128, 220, 152),       // #80dc98 green
        liked: Color::Rgb(240, 110, 130),         // #f06e82 rose
        error: Color::Rgb(240, 110, 110),         // #f06e6e red
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::DARK
    }
}
