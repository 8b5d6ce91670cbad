//! Theme system for TUI colors and styles
//!
//! Colors match the CLI output in `commands/` (cyan ids, green success,
//! yellow warnings, red errors).

use iocraft::prelude::Color;

const GREY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Notification colors
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // Field colors
    pub label: Color,
    pub value: Color,
    pub value_unset: Color,
    pub field_focused: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub id_color: Color,
    pub button_disabled: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            info: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,

            label: GREY,
            value: Color::White,
            value_unset: GREY,
            field_focused: Color::Yellow,

            border: GREY,
            border_focused: Color::Blue,
            text: Color::White,
            text_dimmed: GREY,
            highlight: Color::Blue,
            id_color: Color::Cyan,
            button_disabled: Color::DarkGrey,
        }
    }
}

impl Theme {
    /// Border color for a panel, depending on focus
    pub fn panel_border(&self, focused: bool) -> Color {
        if focused {
            self.border_focused
        } else {
            self.border
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
