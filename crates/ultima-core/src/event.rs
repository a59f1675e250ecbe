//! Input delivered to widgets.
//!
//! Mouse and touch presses both count as presses; see [`Event::press_position`].

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Something the user did, or something that happened to the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Cursor moved
    MouseMove {
        /// Where the cursor is now
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Where the button went down
        position: Point,
        /// Which button
        button: MouseButton,
    },
    /// Mouse button let go
    MouseUp {
        /// Where the button came up
        position: Point,
        /// Which button
        button: MouseButton,
    },
    /// Finger or pointer contact began
    PointerDown {
        /// Contact identity
        pointer_id: PointerId,
        /// Device kind
        pointer_type: PointerType,
        /// Contact point
        position: Point,
        /// First contact of a multi-touch gesture
        is_primary: bool,
    },
    /// Wheel or touchpad scroll
    Scroll {
        /// Horizontal distance
        delta_x: f32,
        /// Vertical distance
        delta_y: f32,
    },
    /// Key went down
    KeyDown {
        /// Which key
        key: Key,
    },
    /// Key came up
    KeyUp {
        /// Which key
        key: Key,
    },
    /// Keyboard focus arrived
    FocusIn,
    /// Keyboard focus left
    FocusOut,
    /// Press that landed on overlay content owned by another widget.
    ///
    /// Containers send this in place of the press itself to siblings that
    /// are covered at that point. Only outside-press listeners react to it.
    OccludedPress {
        /// Position of the press
        position: Point,
    },
    /// Viewport changed size
    Resize {
        /// Viewport width
        width: f32,
        /// Viewport height
        height: f32,
    },
}

impl Event {
    /// Position of a press that starts an interaction, for any pointer device.
    ///
    /// This is what document-level "pointer down" listeners react to.
    #[must_use]
    pub const fn press_position(&self) -> Option<Point> {
        match self {
            Self::MouseDown { position, .. } | Self::PointerDown { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. }
            | Self::PointerDown { position, .. }
            | Self::OccludedPress { position } => Some(*position),
            _ => None,
        }
    }

    /// `KeyDown` or `KeyUp`.
    #[must_use]
    pub const fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::KeyUp { .. })
    }
}

/// Distinguishes simultaneous contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

impl PointerId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    /// Mouse
    #[default]
    Mouse,
    /// Touchscreen
    Touch,
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary
    Left,
    /// Secondary
    Right,
}

/// Keyboard keys the backoffice widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Return
    Enter,
    Escape,
    Space,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    Home,
    End,
}
