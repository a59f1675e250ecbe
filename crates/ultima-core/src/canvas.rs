//! Paint output as data.
//!
//! [`RecordingCanvas`] turns every [`Canvas`] call into a [`DrawCommand`].
//! The headless harness and the unit tests read frames this way.

use crate::widget::{Canvas, TextStyle, Transform2D};
use crate::{Color, CornerRadius, Point, Rect};
use serde::{Deserialize, Serialize};

/// One recorded [`Canvas`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Filled or outlined box.
    Rect {
        /// Box in local coordinates
        bounds: Rect,
        /// Rounding
        radius: CornerRadius,
        /// Set for fills
        fill: Option<Color>,
        /// Set for outlines: color and thickness
        stroke: Option<(Color, f32)>,
    },
    /// Single line of text.
    Text {
        /// What was written
        content: String,
        /// Top-left of the run
        position: Point,
        /// Size, color and weight
        style: TextStyle,
    },
    /// Segment, e.g. a menu divider.
    Line {
        /// One end
        from: Point,
        /// Other end
        to: Point,
        /// Stroke color
        color: Color,
        /// Thickness
        width: f32,
    },
    /// `push_clip`
    PushClip(Rect),
    /// `pop_clip`
    PopClip,
    /// `push_transform`
    PushTransform(Transform2D),
    /// `pop_transform`
    PopTransform,
}

impl DrawCommand {
    /// The string drawn by a `Text` command.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        if let Self::Text { content, .. } = self {
            Some(content.as_str())
        } else {
            None
        }
    }

    /// The fill of a `Rect` command. Outlines have none.
    #[must_use]
    pub const fn fill_color(&self) -> Option<Color> {
        if let Self::Rect { fill, .. } = self {
            *fill
        } else {
            None
        }
    }
}

/// [`Canvas`] that keeps what it is asked to draw.
///
/// Unbalanced pops are ignored so the clip and transform stacks never go
/// negative.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    clips: Vec<Rect>,
    transforms: Vec<Transform2D>,
}

impl RecordingCanvas {
    /// Empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything drawn so far, in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Strings drawn so far, in call order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands.iter().filter_map(DrawCommand::text).collect()
    }

    /// Command index at which `content` was first drawn.
    ///
    /// Comparing two indices tells which of two labels was painted on top.
    #[must_use]
    pub fn position_of_text(&self, content: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.text() == Some(content))
    }

    /// Innermost clip still pushed.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clips.last().copied()
    }

    /// Clips pushed and not yet popped.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    /// Transforms pushed and not yet popped.
    #[must_use]
    pub fn transform_depth(&self) -> usize {
        self.transforms.len()
    }

    fn rect(
        &mut self,
        bounds: Rect,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
    ) {
        self.commands.push(DrawCommand::Rect {
            bounds,
            radius: CornerRadius::uniform(radius),
            fill,
            stroke,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.rect(rect, 0.0, Some(color), None);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.rect(rect, radius, Some(color), None);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.rect(rect, 0.0, None, Some((color, width)));
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let content = text.to_owned();
        let style = style.clone();
        self.commands.push(DrawCommand::Text {
            content,
            position,
            style,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clips.push(rect);
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        if self.clips.pop().is_some() {
            self.commands.push(DrawCommand::PopClip);
        }
    }

    fn push_transform(&mut self, transform: Transform2D) {
        self.transforms.push(transform);
        self.commands.push(DrawCommand::PushTransform(transform));
    }

    fn pop_transform(&mut self) {
        if self.transforms.pop().is_some() {
            self.commands.push(DrawCommand::PopTransform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let canvas = RecordingCanvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.clip_depth(), 0);
        assert_eq!(canvas.current_clip(), None);
    }

    #[test]
    fn test_fill_is_square_and_filled() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 1280.0, 800.0), Color::WHITE);
        assert_eq!(canvas.command_count(), 1);
        assert_eq!(canvas.commands()[0].fill_color(), Some(Color::WHITE));
        match &canvas.commands()[0] {
            DrawCommand::Rect { radius, stroke, .. } => {
                assert!(radius.is_zero());
                assert!(stroke.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_text_lookup() {
        let mut canvas = RecordingCanvas::new();
        let style = TextStyle::default();
        canvas.draw_text("Ver", Point::ORIGIN, &style);
        canvas.draw_line(Point::ORIGIN, Point::new(192.0, 0.0), Color::BLACK, 1.0);
        canvas.draw_text("Editar", Point::ORIGIN, &style);
        assert_eq!(canvas.texts(), vec!["Ver", "Editar"]);
        assert_eq!(canvas.position_of_text("Editar"), Some(2));
        assert_eq!(canvas.position_of_text("Eliminar"), None);
        assert_eq!(canvas.commands()[1].text(), None);
    }

    #[test]
    fn test_extra_pops_are_dropped() {
        let mut canvas = RecordingCanvas::new();
        let row = Rect::new(0.0, 0.0, 5.0, 5.0);
        canvas.push_clip(row);
        assert_eq!(canvas.current_clip(), Some(row));
        canvas.pop_clip();
        canvas.pop_clip();
        canvas.pop_transform();
        assert_eq!(canvas.clip_depth(), 0);
        assert_eq!(
            canvas.commands(),
            &[DrawCommand::PushClip(row), DrawCommand::PopClip]
        );
    }

    #[test]
    fn test_transform_depth() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_transform(Transform2D::scale(0.95, 0.95));
        assert_eq!(canvas.transform_depth(), 1);
        canvas.pop_transform();
        assert_eq!(canvas.transform_depth(), 0);
    }

    #[test]
    fn test_panel_outline_has_no_fill() {
        let mut canvas = RecordingCanvas::new();
        let panel = Rect::new(0.0, 0.0, 192.0, 145.0);
        canvas.fill_rounded_rect(panel, 12.0, Color::WHITE);
        canvas.stroke_rect(panel, Color::BLACK, 1.0);
        match &canvas.commands()[0] {
            DrawCommand::Rect { radius, .. } => assert_eq!(*radius, CornerRadius::uniform(12.0)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(canvas.commands()[1].fill_color(), None);
    }
}
