//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle, driven by an event loop that
//! also delivers frame ticks:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Position self and children within allocated bounds
//! 3. **Paint**: Generate draw commands for the inline tree
//! 4. **Paint overlay**: Generate draw commands for content attached to the
//!    top-level layer (see [`crate::layer`])
//!
//! Between frames the loop calls [`Widget::on_frame`] with the elapsed time.
//! Widgets never read a clock themselves.
//!
//! # Examples
//!
//! ```
//! use ultima_core::{Point, Transform2D, TypeId};
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//!
//! // shrink a panel towards its top-right corner and lift it 8px
//! let t = Transform2D::scale_about(Point::new(200.0, 100.0), 0.95, 0.0, -8.0);
//! let corner = t.apply(Point::new(200.0, 100.0));
//! assert!((corner.x - 200.0).abs() < 1e-3);
//! assert!((corner.y - 92.0).abs() < 1e-3);
//! ```

use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::Duration;

/// Identifies the concrete type behind a `dyn Widget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Identifier of `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Size the widget settled on
    pub size: Size,
}

/// A node in the UI tree.
///
/// Messages produced by a widget are returned as type-erased boxes; callers
/// downcast them to the concrete message types they care about.
pub trait Widget: Send + Sync {
    /// Concrete type of this widget.
    fn type_id(&self) -> TypeId;

    /// Preferred size within `constraints`.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Accept `bounds` and position children inside them.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Paint in tree order, subject to ancestors' clips and transforms.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Generate draw commands for content attached to the top-level layer.
    ///
    /// Overlay content is painted after the whole inline tree, in viewport
    /// coordinates, so ancestors cannot clip or cover it.
    fn paint_overlay(&self, _canvas: &mut dyn Canvas) {}

    /// React to input. Returns a message for the caller, if any.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Advance time-based state (transitions, timers) by `elapsed`.
    fn on_frame(&mut self, _elapsed: Duration) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Direct children.
    fn children(&self) -> &[Box<dyn Widget>];

    /// Direct children, mutably.
    fn children_mut(&mut self) -> &mut [Box<dyn Widget>];

    /// Whether pointer input does something here.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Whether the widget takes keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Name announced by assistive technology.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Role announced by assistive technology.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// `data-testid` used by selectors.
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Bounds from the last layout.
    fn bounds(&self) -> Rect {
        Rect::default()
    }

    /// Whether overlay content of this widget or its descendants covers
    /// `point`, hiding whatever is painted below.
    fn captures_pointer(&self, point: Point) -> bool {
        self.children().iter().any(|c| c.captures_pointer(point))
    }
}

/// Drawing surface. Coordinates are viewport pixels.
pub trait Canvas {
    /// Fill `rect`.
    fn fill_rect(&mut self, rect: Rect, color: crate::Color);

    /// Fill `rect` with every corner rounded by `radius`.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: crate::Color);

    /// Outline `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: crate::Color, width: f32);

    /// Draw a single line of text with its top-left at `position`.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Straight line segment.
    fn draw_line(&mut self, from: Point, to: Point, color: crate::Color, width: f32);

    /// Restrict painting to `rect` until the matching `pop_clip`.
    fn push_clip(&mut self, rect: Rect);

    /// Undo the last `push_clip`.
    fn pop_clip(&mut self);

    /// Apply `transform` until the matching `pop_transform`.
    fn push_transform(&mut self, transform: Transform2D);

    /// Undo the last `push_transform`.
    fn pop_transform(&mut self);
}

/// How a run of text is drawn.
///
/// # Examples
///
/// ```
/// use ultima_core::{Color, FontWeight, TextStyle};
///
/// let style = TextStyle::default();
/// assert_eq!(style.size, 14.0);
///
/// let header = TextStyle {
///     size: 12.0,
///     weight: FontWeight::Semibold,
///     color: Color::rgb(0.612, 0.639, 0.686),
/// };
/// assert_eq!(header.weight, FontWeight::Semibold);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Pixel size
    pub size: f32,
    /// Fill color
    pub color: crate::Color,
    /// Weight
    pub weight: FontWeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: crate::Color::BLACK,
            weight: FontWeight::Normal,
        }
    }
}

/// Font weight, CSS scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Normal (400)
    Normal,
    /// Medium (500)
    Medium,
    /// Semibold (600)
    Semibold,
    /// Bold (700)
    Bold,
}

/// Affine transform applied to everything painted while it is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Matrix elements [a, b, c, d, e, f] for:
    /// | a c e |
    /// | b d f |
    /// | 0 0 1 |
    pub matrix: [f32; 6],
}

impl Transform2D {
    /// No change.
    pub const IDENTITY: Self = Self {
        matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Scale about the origin.
    #[must_use]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            matrix: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Scale around `pivot`, then translate by (`dx`, `dy`).
    #[must_use]
    pub fn scale_about(pivot: Point, scale: f32, dx: f32, dy: f32) -> Self {
        Self {
            matrix: [
                scale,
                0.0,
                0.0,
                scale,
                pivot.x.mul_add(-scale, pivot.x) + dx,
                pivot.y.mul_add(-scale, pivot.y) + dy,
            ],
        }
    }

    /// Map a point through the transform.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        let [a, b, c, d, e, f] = self.matrix;
        Point::new(
            a.mul_add(point.x, c.mul_add(point.y, e)),
            b.mul_add(point.x, d.mul_add(point.y, f)),
        )
    }

    /// Whether this is exactly the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Accessibility role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Button
    Button,
    /// Heading
    Heading,
    /// Menu
    Menu,
    /// Menu item
    MenuItem,
    /// Separator between groups
    Separator,
    /// Table
    Table,
    /// Table row
    TableRow,
}
