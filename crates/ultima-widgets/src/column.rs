//! Vertical stack of widgets.
//!
//! Unlike a hit-tested container, a column hands every event to every
//! child: menus listen for presses anywhere in the document, not only on
//! themselves. A press that lands on one child's overlay reaches the other
//! children as [`Event::OccludedPress`].

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::Duration;
use ultima_core::{
    widget::LayoutResult, Canvas, Constraints, Event, Point, Rect, Size, TypeId, Widget,
};

/// Horizontal placement of children inside the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossAxisAlignment {
    /// Left edge
    #[default]
    Start,
    /// Centered
    Center,
    /// Right edge
    End,
    /// Full width
    Stretch,
}

/// Children stacked top to bottom, each at its measured height.
#[derive(Default)]
pub struct Column {
    cross_axis_alignment: CrossAxisAlignment,
    gap: f32,
    children: Vec<Box<dyn Widget>>,
    test_id_value: Option<String>,
    bounds: Rect,
}

impl Column {
    /// Empty column, children aligned to the left edge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where narrower children sit horizontally.
    #[must_use]
    pub const fn cross_axis_alignment(mut self, alignment: CrossAxisAlignment) -> Self {
        self.cross_axis_alignment = alignment;
        self
    }

    /// Vertical space between consecutive children.
    #[must_use]
    pub const fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Append `widget` below the existing children.
    #[must_use]
    pub fn child(mut self, widget: impl Widget + 'static) -> Self {
        self.children.push(Box::new(widget));
        self
    }

    /// Append an already boxed child.
    pub fn push(&mut self, widget: Box<dyn Widget>) {
        self.children.push(widget);
    }

    /// `data-testid` for the whole column.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    fn topmost_capture(&self, point: Point) -> Option<usize> {
        self.children.iter().rposition(|c| c.captures_pointer(point))
    }
}

impl Widget for Column {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        if self.children.is_empty() {
            return constraints.constrain(Size::ZERO);
        }

        let mut widest = 0.0f32;
        let mut used = 0.0f32;
        for child in &self.children {
            let left = (constraints.max_height - used).max(0.0);
            let size = child.measure(Constraints::new(0.0, constraints.max_width, 0.0, left));
            widest = widest.max(size.width);
            used += size.height;
        }
        used += self.gap * (self.children.len() - 1) as f32;

        constraints.constrain(Size::new(widest, used))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;

        let mut y = bounds.y;
        for child in &mut self.children {
            let size = child.measure(Constraints::loose(bounds.size()));
            let x = match self.cross_axis_alignment {
                CrossAxisAlignment::Start | CrossAxisAlignment::Stretch => bounds.x,
                CrossAxisAlignment::Center => bounds.x + (bounds.width - size.width) / 2.0,
                CrossAxisAlignment::End => bounds.right() - size.width,
            };
            let width = if self.cross_axis_alignment == CrossAxisAlignment::Stretch {
                bounds.width
            } else {
                size.width
            };
            child.layout(Rect::new(x, y, width, size.height));
            y += size.height + self.gap;
        }

        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        for child in &self.children {
            child.paint(canvas);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let covered = event
            .press_position()
            .and_then(|p| self.topmost_capture(p).map(|owner| (owner, p)));

        let mut first = None;
        for (index, child) in self.children.iter_mut().enumerate() {
            let message = match covered {
                Some((owner, position)) if owner != index => {
                    child.event(&Event::OccludedPress { position })
                }
                _ => child.event(event),
            };
            if first.is_none() {
                first = message;
            }
        }
        first
    }

    fn on_frame(&mut self, elapsed: Duration) -> Option<Box<dyn Any + Send>> {
        let mut first = None;
        for child in &mut self.children {
            let message = child.on_frame(elapsed);
            if first.is_none() {
                first = message;
            }
        }
        first
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut self.children
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
