use colored::Color;
use once_cell::sync::Lazy;

/// CLI color theme configuration
pub struct ColorTheme {
    pub error: Color,
    pub warning: Color,
    pub primary: Color,
    pub muted: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warning: Color::Yellow,
            primary: Color::BrightBlue,
            muted: Color::BrightBlack,
        }
    }
}

/// Global theme instance
pub static THEME: Lazy<ColorTheme> = Lazy::new(ColorTheme::default);

/// Icons for different message types
pub struct Icons {
    pub error: &'static str,
    pub warning: &'static str,
    pub bullet: &'static str,
}

pub const ICONS: Icons = Icons {
    error: "✗",
    warning: "⚠",
    bullet: "•",
};
