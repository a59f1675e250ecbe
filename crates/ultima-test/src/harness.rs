//! Test harness for Última Milla widgets.
//!
//! The harness owns a root widget, lays it out in a viewport, feeds it
//! events and frame ticks, and keeps every message the tree returns. Time
//! only moves when [`Harness::tick`] is called.

use std::any::Any;
use std::time::Duration;
use ultima_core::{
    paint_frame, Event, Key, MouseButton, Point, PointerId, PointerType, Rect, RecordingCanvas,
    ScrollLock, Widget,
};

use crate::selector::Selector;

/// Drives a widget tree the way a browser would, without a window.
pub struct Harness {
    root: Box<dyn Widget>,
    viewport: Rect,
    messages: Vec<Box<dyn Any + Send>>,
    scroll_lock: ScrollLock,
    blocked_scrolls: usize,
    elapsed: Duration,
}

impl Harness {
    /// Create a harness around `root` with a 1280x720 viewport.
    pub fn new(root: impl Widget + 'static) -> Self {
        let mut harness = Self {
            root: Box::new(root),
            viewport: Rect::default(),
            messages: Vec::new(),
            scroll_lock: ScrollLock::global().clone(),
            blocked_scrolls: 0,
            elapsed: Duration::ZERO,
        };
        harness.resize(1280.0, 720.0);
        harness
    }

    /// Start with a `width` x `height` viewport.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.resize(width, height);
        self
    }

    /// Consult `lock` instead of the process-wide lock for scroll events.
    #[must_use]
    pub fn scroll_lock(mut self, lock: ScrollLock) -> Self {
        self.scroll_lock = lock;
        self
    }

    // === Input ===

    /// Deliver one event to the root and keep its message.
    pub fn dispatch(&mut self, event: &Event) -> &mut Self {
        if let Some(message) = self.root.event(event) {
            self.messages.push(message);
        }
        self
    }

    /// Move, press and release the mouse at `point`.
    pub fn click_at(&mut self, point: Point) -> &mut Self {
        self.dispatch(&Event::MouseMove { position: point });
        self.dispatch(&Event::MouseDown {
            position: point,
            button: MouseButton::Left,
        });
        self.dispatch(&Event::MouseUp {
            position: point,
            button: MouseButton::Left,
        })
    }

    /// Click the center of the first widget matching `selector`.
    pub fn click(&mut self, selector: &str) -> &mut Self {
        if let Some(bounds) = self.bounds_of(selector) {
            self.click_at(bounds.center());
        } else {
            tracing::warn!(selector, "click target not found");
        }
        self
    }

    /// Touch the screen at `point`.
    pub fn touch_at(&mut self, point: Point) -> &mut Self {
        self.dispatch(&Event::PointerDown {
            pointer_id: PointerId::new(1),
            pointer_type: PointerType::Touch,
            position: point,
            is_primary: true,
        })
    }

    /// Move the mouse to `point`.
    pub fn hover(&mut self, point: Point) -> &mut Self {
        self.dispatch(&Event::MouseMove { position: point })
    }

    /// Press and release `key`.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.dispatch(&Event::KeyDown { key });
        self.dispatch(&Event::KeyUp { key })
    }

    /// Scroll the document, unless it is scroll-locked.
    pub fn scroll(&mut self, delta: f32) -> &mut Self {
        if self.scroll_lock.is_locked() {
            self.blocked_scrolls += 1;
            return self;
        }
        self.dispatch(&Event::Scroll {
            delta_x: 0.0,
            delta_y: delta,
        })
    }

    /// Resize the viewport and lay the tree out again.
    pub fn resize(&mut self, width: f32, height: f32) -> &mut Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.root.layout(self.viewport);
        self.dispatch(&Event::Resize { width, height })
    }

    /// Advance simulated time by one frame of `ms` milliseconds.
    pub fn tick(&mut self, ms: u64) -> &mut Self {
        let dt = Duration::from_millis(ms);
        self.elapsed += dt;
        if let Some(message) = self.root.on_frame(dt) {
            self.messages.push(message);
        }
        self
    }

    /// Advance simulated time by `frames` frames of `ms` milliseconds each.
    pub fn run_frames(&mut self, frames: usize, ms: u64) -> &mut Self {
        for _ in 0..frames {
            self.tick(ms);
        }
        self
    }

    // === Painting ===

    /// Paint a full frame, overlays included.
    #[must_use]
    pub fn paint(&self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        paint_frame(self.root.as_ref(), self.viewport, &mut canvas);
        canvas
    }

    // === Queries ===

    /// The root widget.
    #[must_use]
    pub fn root(&self) -> &dyn Widget {
        self.root.as_ref()
    }

    /// First widget in tree order matching `selector`.
    ///
    /// Malformed selectors match nothing.
    #[must_use]
    pub fn query(&self, selector: &str) -> Option<&dyn Widget> {
        self.query_all(selector).into_iter().next()
    }

    /// Every widget matching `selector`, in tree order.
    #[must_use]
    pub fn query_all(&self, selector: &str) -> Vec<&dyn Widget> {
        let mut found = Vec::new();
        match Selector::parse(selector) {
            Ok(parsed) => collect_matches(self.root.as_ref(), &parsed, &mut found),
            Err(err) => tracing::warn!(selector, %err, "ignoring malformed selector"),
        }
        found
    }

    /// Laid-out bounds of the widget matching the selector.
    #[must_use]
    pub fn bounds_of(&self, selector: &str) -> Option<Rect> {
        self.query(selector).map(|w| w.bounds())
    }

    /// Whether anything matches `selector`.
    #[must_use]
    pub fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    /// Messages collected so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Box<dyn Any + Send>] {
        &self.messages
    }

    /// Remove and return all collected messages.
    pub fn take_messages(&mut self) -> Vec<Box<dyn Any + Send>> {
        std::mem::take(&mut self.messages)
    }

    /// Collected messages of type `T`, oldest first.
    #[must_use]
    pub fn messages_of<T: 'static>(&self) -> Vec<&T> {
        self.messages
            .iter()
            .filter_map(|m| m.downcast_ref::<T>())
            .collect()
    }

    /// Most recent message of type `T`.
    #[must_use]
    pub fn last_message<T: 'static>(&self) -> Option<&T> {
        self.messages.iter().rev().find_map(|m| m.downcast_ref::<T>())
    }

    /// Scroll events swallowed by the scroll lock.
    #[must_use]
    pub const fn blocked_scrolls(&self) -> usize {
        self.blocked_scrolls
    }

    /// Simulated time advanced so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    // === Assertions ===

    /// # Panics
    ///
    /// When nothing matches `selector`.
    pub fn assert_exists(&self, selector: &str) -> &Self {
        assert!(self.exists(selector), "nothing matches '{selector}'");
        self
    }

    /// # Panics
    ///
    /// When the number of widgets matching `selector` is not `expected`.
    pub fn assert_count(&self, selector: &str, expected: usize) -> &Self {
        let found = self.query_all(selector).len();
        assert_eq!(found, expected, "'{selector}' matched {found} widget(s)");
        self
    }

    /// Assert that the document is scroll-locked or not.
    ///
    /// # Panics
    ///
    /// Panics if the lock state differs.
    pub fn assert_scroll_locked(&self, locked: bool) -> &Self {
        assert_eq!(
            self.scroll_lock.is_locked(),
            locked,
            "Expected document scroll lock to be {}",
            if locked { "held" } else { "released" }
        );
        self
    }
}

// Pre-order, so results follow paint order.
fn collect_matches<'a>(node: &'a dyn Widget, selector: &Selector, found: &mut Vec<&'a dyn Widget>) {
    if selector.matches(node) {
        found.push(node);
    }
    node.children()
        .iter()
        .for_each(|child| collect_matches(child.as_ref(), selector, found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultima_core::{widget::LayoutResult, Canvas, Color, Constraints, DrawCommand, Size, TypeId};

    /// Fixed 100x50 box offset by 10px from its slot.
    #[derive(Default)]
    struct Probe {
        id: Option<&'static str>,
        label: Option<&'static str>,
        bounds: Rect,
        children: Vec<Box<dyn Widget>>,
    }

    struct Clicked(Point);

    fn probe(id: &'static str) -> Probe {
        Probe {
            id: Some(id),
            ..Probe::default()
        }
    }

    impl Probe {
        fn labelled(label: &'static str) -> Self {
            Self {
                label: Some(label),
                ..Self::default()
            }
        }

        fn holding(mut self, child: Self) -> Self {
            self.children.push(Box::new(child));
            self
        }
    }

    impl Widget for Probe {
        fn type_id(&self) -> TypeId {
            TypeId::of::<Self>()
        }
        fn measure(&self, c: Constraints) -> Size {
            c.constrain(Size::new(100.0, 50.0))
        }
        fn layout(&mut self, slot: Rect) -> LayoutResult {
            self.bounds = Rect::new(slot.x + 10.0, slot.y + 10.0, 100.0, 50.0);
            LayoutResult { size: slot.size() }
        }
        fn paint(&self, canvas: &mut dyn Canvas) {
            canvas.fill_rect(self.bounds, Color::WHITE);
        }
        fn paint_overlay(&self, canvas: &mut dyn Canvas) {
            canvas.fill_rect(self.bounds, Color::BLACK);
        }
        fn event(&mut self, e: &Event) -> Option<Box<dyn Any + Send>> {
            let at = e.press_position()?;
            Some(Box::new(Clicked(at)))
        }
        fn children(&self) -> &[Box<dyn Widget>] {
            &self.children
        }
        fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
            &mut self.children
        }
        fn test_id(&self) -> Option<&str> {
            self.id
        }
        fn accessible_name(&self) -> Option<&str> {
            self.label
        }
        fn bounds(&self) -> Rect {
            self.bounds
        }
    }

    #[test]
    fn test_exists_by_test_id() {
        let harness = Harness::new(probe("root"));
        assert!(harness.exists("[data-testid='root']"));
        assert!(harness.exists("#root"));
        assert!(!harness.exists("#actions-1"));
        assert!(!harness.exists("root"));
    }

    #[test]
    fn test_query_by_accessible_name() {
        let widget = Probe::default().holding(Probe::labelled("Acciones"));
        let harness = Harness::new(widget);
        assert!(harness.exists("[aria-label='Acciones']"));
    }

    #[test]
    #[should_panic(expected = "nothing matches")]
    fn test_assert_exists_panics_when_missing() {
        Harness::new(Probe::default()).assert_exists("#actions-1");
    }

    #[test]
    fn test_query_all_in_tree_order() {
        let widget = probe("row")
            .holding(probe("row").holding(probe("row")))
            .holding(probe("cell"));
        let harness = Harness::new(widget);
        harness.assert_count("#row", 3).assert_count("#cell", 1);
        assert_eq!(harness.query_all("[role='row']").len(), 0);
    }

    #[test]
    fn test_root_is_laid_out() {
        let harness = Harness::new(probe("root"));
        assert_eq!(
            harness.bounds_of("#root"),
            Some(Rect::new(10.0, 10.0, 100.0, 50.0))
        );
    }

    #[test]
    fn test_click_uses_real_bounds() {
        let mut harness = Harness::new(probe("root"));
        harness.click("#root");
        let clicked = harness.last_message::<Clicked>().unwrap();
        assert_eq!(clicked.0, Point::new(60.0, 35.0));
    }

    #[test]
    fn test_click_missing_target_is_noop() {
        let mut harness = Harness::new(Probe::default());
        harness.click("#missing");
        assert!(harness.messages().is_empty());
    }

    #[test]
    fn test_touch_counts_as_press() {
        let mut harness = Harness::new(Probe::default());
        harness.touch_at(Point::new(3.0, 4.0));
        assert_eq!(harness.messages_of::<Clicked>().len(), 1);
    }

    #[test]
    fn test_take_messages() {
        let mut harness = Harness::new(Probe::default());
        harness.click_at(Point::ORIGIN);
        assert_eq!(harness.take_messages().len(), 1);
        assert!(harness.messages().is_empty());
    }

    #[test]
    fn test_tick_advances_time() {
        let mut harness = Harness::new(Probe::default());
        harness.tick(16).run_frames(3, 10);
        assert_eq!(harness.elapsed(), Duration::from_millis(46));
    }

    #[test]
    fn test_paint_includes_overlay() {
        let harness = Harness::new(Probe::default());
        let canvas = harness.paint();
        let fills: Vec<_> = canvas
            .commands()
            .iter()
            .filter_map(DrawCommand::fill_color)
            .collect();
        assert_eq!(fills, vec![Color::WHITE, Color::BLACK]);
    }

    #[test]
    fn test_scroll_blocked_while_locked() {
        let lock = ScrollLock::new();
        let mut harness = Harness::new(Probe::default()).scroll_lock(lock.clone());
        harness.scroll(10.0);
        assert_eq!(harness.blocked_scrolls(), 0);

        let guard = lock.acquire();
        harness.scroll(10.0).assert_scroll_locked(true);
        assert_eq!(harness.blocked_scrolls(), 1);
        drop(guard);
        harness.assert_scroll_locked(false);
    }

    #[test]
    fn test_resize_relayouts() {
        let mut harness = Harness::new(probe("root"));
        harness.resize(400.0, 300.0);
        assert_eq!(harness.root().bounds().x, 10.0);
    }
}
