//! Colors used by the action menu.

use serde::{Deserialize, Serialize};
use ultima_core::Color;

/// Palette for the trigger, panel and backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuPalette {
    /// Panel background
    pub surface: Color,
    /// Panel outline and divider lines
    pub border: Color,
    /// Hovered or keyboard-highlighted item
    pub highlight: Color,
    /// Default item text
    pub text: Color,
    /// Headers and disabled items
    pub muted: Color,
    /// `primary` items
    pub primary: Color,
    /// `warning` items
    pub warning: Color,
    /// `danger` items
    pub danger: Color,
    /// Full-viewport backdrop under the panel
    pub backdrop: Color,
}

impl Default for MenuPalette {
    fn default() -> Self {
        Self {
            surface: Color::rgb(0.118, 0.161, 0.231),
            border: Color::rgb(0.200, 0.255, 0.333),
            highlight: Color::rgb(0.200, 0.255, 0.333),
            text: Color::rgb(0.886, 0.910, 0.941),
            muted: Color::rgb(0.580, 0.639, 0.722),
            primary: Color::rgb(0.376, 0.647, 0.980),
            warning: Color::rgb(0.984, 0.749, 0.141),
            danger: Color::rgb(0.973, 0.443, 0.443),
            backdrop: Color::rgba(0.0, 0.0, 0.0, 0.2),
        }
    }
}

impl MenuPalette {
    /// Every color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn faded(&self, opacity: f32) -> Self {
        Self {
            surface: self.surface.fade(opacity),
            border: self.border.fade(opacity),
            highlight: self.highlight.fade(opacity),
            text: self.text.fade(opacity),
            muted: self.muted.fade(opacity),
            primary: self.primary.fade(opacity),
            warning: self.warning.fade(opacity),
            danger: self.danger.fade(opacity),
            backdrop: self.backdrop.fade(opacity),
        }
    }
}
