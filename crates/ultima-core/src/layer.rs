//! Top-level overlay layer.
//!
//! Floating content (menus, popovers, backdrops) belongs to the widget that
//! owns it but must not be positioned, clipped or covered by that widget's
//! ancestors. Widgets attach such content to the overlay layer by
//! implementing [`Widget::paint_overlay`]; [`paint_frame`] paints it after
//! the entire inline tree, clipped only to the viewport.

use crate::widget::{Canvas, Widget};
use crate::Rect;

/// Paint one frame: the inline tree first, then every overlay in tree order.
pub fn paint_frame(root: &dyn Widget, viewport: Rect, canvas: &mut dyn Canvas) {
    root.paint(canvas);

    canvas.push_clip(viewport);
    paint_overlays(root, canvas);
    canvas.pop_clip();
}

fn paint_overlays(widget: &dyn Widget, canvas: &mut dyn Canvas) {
    widget.paint_overlay(canvas);
    for child in widget.children() {
        paint_overlays(child.as_ref(), canvas);
    }
}
