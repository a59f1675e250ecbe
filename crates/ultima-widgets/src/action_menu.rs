//! Floating action menu anchored to a trigger button.
//!
//! The trigger is painted inline; the panel and its backdrop are painted in
//! the overlay layer (see [`ultima_core::paint_frame`]) so that table rows,
//! scroll containers and clips around the trigger never cut the panel off.

use crate::config::ActionMenuConfig;
use crate::menu_controller::{CloseReason, MenuController, MenuState};
use crate::menu_item::{ActionMenuDivider, ActionMenuHeader, ActionMenuItem, MenuElement};
use crate::placement::Placement;
use crate::theme::MenuPalette;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::Duration;
use ultima_core::{
    widget::{AccessibleRole, FontWeight, LayoutResult, TextStyle, Transform2D},
    Canvas, Constraints, Event, Key, Point, Rect, ScrollLock, Size, TypeId, Widget,
};

const TRIGGER_SIZE: f32 = 36.0;
const TRIGGER_RADIUS: f32 = 8.0;
const TRIGGER_GLYPH: &str = "⋮";
const TRIGGER_GLYPH_SIZE: f32 = 18.0;
const PANEL_RADIUS: f32 = 12.0;
/// Vertical padding above the first and below the last element.
pub const PANEL_PADDING: f32 = 8.0;

/// Message emitted when the menu starts opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMenuOpened;

/// Message emitted when the menu starts closing.
///
/// An element that reports an action id is announced with
/// [`ActionMenuItemActivated`] instead. Its close reason is still recorded in
/// [`MenuController::last_close_reason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMenuClosed {
    /// Why the menu is closing
    pub reason: CloseReason,
}

/// Message emitted when an enabled item is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMenuItemActivated {
    /// Action id of the item
    pub action: String,
}

/// Contextual menu: a trigger button plus a floating panel of elements.
pub struct ActionMenu {
    controller: MenuController,
    elements: Vec<Box<dyn MenuElement>>,
    palette: MenuPalette,
    label: String,
    highlighted: Option<usize>,
    focused: bool,
    test_id_value: Option<String>,
    bounds: Rect,
}

impl Default for ActionMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionMenu {
    /// Create an empty menu with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ActionMenuConfig::default())
    }

    /// Create an empty menu.
    #[must_use]
    pub fn with_config(config: ActionMenuConfig) -> Self {
        Self {
            controller: MenuController::new(config),
            elements: Vec::new(),
            palette: MenuPalette::default(),
            label: "Acciones".to_string(),
            highlighted: None,
            focused: false,
            test_id_value: None,
            bounds: Rect::default(),
        }
    }

    /// Use another scroll lock than the process-wide one.
    #[must_use]
    pub fn scroll_lock(mut self, lock: ScrollLock) -> Self {
        self.controller = self.controller.with_scroll_lock(lock);
        self
    }

    /// Append any element.
    #[must_use]
    pub fn element(mut self, element: impl MenuElement + 'static) -> Self {
        self.elements.push(Box::new(element));
        self
    }

    /// Append an item.
    #[must_use]
    pub fn item(self, item: ActionMenuItem) -> Self {
        self.element(item)
    }

    /// Append a divider.
    #[must_use]
    pub fn divider(self) -> Self {
        self.element(ActionMenuDivider)
    }

    /// Append a section header.
    #[must_use]
    pub fn header(self, label: impl Into<String>) -> Self {
        self.element(ActionMenuHeader::new(label))
    }

    /// Set the palette.
    #[must_use]
    pub const fn palette(mut self, palette: MenuPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the trigger's accessible label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the initial viewport size.
    #[must_use]
    pub fn viewport(mut self, viewport: Size) -> Self {
        self.controller.set_viewport(viewport);
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace all elements, e.g. when the row they act on changes.
    pub fn set_elements(&mut self, elements: Vec<Box<dyn MenuElement>>) {
        self.elements = elements;
        self.highlighted = None;
    }

    /// Elements in display order.
    #[must_use]
    pub fn elements(&self) -> &[Box<dyn MenuElement>] {
        &self.elements
    }

    /// Start opening. Returns `false` when not possible right now.
    pub fn open(&mut self) -> bool {
        self.highlighted = None;
        self.controller.open()
    }

    /// Start closing with [`CloseReason::Explicit`].
    pub fn close(&mut self) -> bool {
        self.controller.close(CloseReason::Explicit)
    }

    /// Open or close as the trigger would.
    pub fn toggle(&mut self) -> bool {
        if self.controller.state() == MenuState::Closed {
            self.open()
        } else {
            self.controller.toggle()
        }
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.controller.state()
    }

    /// Opening or open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// The underlying state machine.
    #[must_use]
    pub const fn controller(&self) -> &MenuController {
        &self.controller
    }

    /// Highlighted element index.
    #[must_use]
    pub const fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    /// Panel height for the current elements.
    #[must_use]
    pub fn content_height(&self) -> f32 {
        let rows: f32 = self.elements.iter().map(|e| e.height()).sum();
        PANEL_PADDING.mul_add(2.0, rows)
    }

    /// Panel rectangle at its current position.
    #[must_use]
    pub fn panel_bounds(&self) -> Rect {
        self.controller.panel_bounds(self.content_height())
    }

    /// Element under `point`, if the panel is mounted there.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<usize> {
        let panel = self.panel_bounds();
        if !self.controller.is_panel_mounted() || !panel.contains_point(&point) {
            return None;
        }
        let mut top = panel.y + PANEL_PADDING;
        for (index, element) in self.elements.iter().enumerate() {
            let bottom = top + element.height();
            if point.y >= top && point.y < bottom {
                return Some(index);
            }
            top = bottom;
        }
        None
    }

    fn next_selectable(&self, from: Option<usize>, forward: bool) -> Option<usize> {
        let len = self.elements.len();
        if len == 0 {
            return None;
        }
        let step = |i: usize| {
            if forward {
                (i + 1) % len
            } else {
                (i + len - 1) % len
            }
        };

        let mut idx = from.map_or(if forward { 0 } else { len - 1 }, step);
        for _ in 0..len {
            if self.elements[idx].is_selectable() {
                return Some(idx);
            }
            idx = step(idx);
        }
        None
    }

    fn activate(&mut self, index: usize) -> Option<Box<dyn Any + Send>> {
        let ctx = self.controller.context().clone();
        let action = self.elements.get_mut(index)?.activate(&ctx);
        let closing = self.controller.take_close_request()
            && self.controller.close(CloseReason::ItemActivated);
        match action {
            Some(action) => {
                tracing::debug!(%action, "action menu item activated");
                Some(Box::new(ActionMenuItemActivated { action }))
            }
            None if closing => Some(Box::new(ActionMenuClosed {
                reason: CloseReason::ItemActivated,
            })),
            None => None,
        }
    }

    fn close_with(&mut self, reason: CloseReason) -> Option<Box<dyn Any + Send>> {
        if self.controller.close(reason) {
            Some(Box::new(ActionMenuClosed { reason }))
        } else {
            None
        }
    }

    fn on_press(&mut self, position: Point) -> Option<Box<dyn Any + Send>> {
        let on_trigger = self.bounds.contains_point(&position);
        match self.controller.state() {
            MenuState::Closed if on_trigger => {
                if self.open() {
                    Some(Box::new(ActionMenuOpened))
                } else {
                    None
                }
            }
            MenuState::Opening | MenuState::Open => {
                if on_trigger {
                    self.close_with(CloseReason::Trigger)
                } else if self.panel_bounds().contains_point(&position) {
                    self.element_at(position).and_then(|i| self.activate(i))
                } else {
                    self.close_with(CloseReason::OutsideClick)
                }
            }
            _ => None,
        }
    }

    fn on_key(&mut self, key: Key) -> Option<Box<dyn Any + Send>> {
        if !self.controller.is_open() {
            if self.focused && matches!(key, Key::Enter | Key::Space) && self.open() {
                return Some(Box::new(ActionMenuOpened));
            }
            return None;
        }
        match key {
            Key::Escape => self.close_with(CloseReason::Escape),
            Key::Up => {
                self.highlighted = self.next_selectable(self.highlighted, false);
                None
            }
            Key::Down => {
                self.highlighted = self.next_selectable(self.highlighted, true);
                None
            }
            Key::Home => {
                self.highlighted = self.next_selectable(None, true);
                None
            }
            Key::End => {
                self.highlighted = self.next_selectable(None, false);
                None
            }
            Key::Enter | Key::Space => self.highlighted.and_then(|i| self.activate(i)),
        }
    }

    fn paint_panel(&self, canvas: &mut dyn Canvas, palette: &MenuPalette) {
        let panel = self.panel_bounds();
        let pivot = match self.controller.placement() {
            Placement::Below => Point::new(panel.right(), panel.y),
            Placement::Above => Point::new(panel.right(), panel.bottom()),
        };
        canvas.push_transform(Transform2D::scale_about(
            pivot,
            self.controller.scale(),
            0.0,
            self.controller.offset_y(),
        ));

        canvas.fill_rounded_rect(panel, PANEL_RADIUS, palette.surface);
        canvas.stroke_rect(panel, palette.border, 1.0);

        let mut top = panel.y + PANEL_PADDING;
        for (index, element) in self.elements.iter().enumerate() {
            let height = element.height();
            let row = Rect::new(panel.x, top, panel.width, height);
            element.paint(canvas, row, self.highlighted == Some(index), palette);
            top += height;
        }

        canvas.pop_transform();
    }
}

impl std::fmt::Debug for ActionMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMenu")
            .field("state", &self.controller.state())
            .field("elements", &self.elements.len())
            .field("highlighted", &self.highlighted)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Widget for ActionMenu {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(Size::new(TRIGGER_SIZE, TRIGGER_SIZE))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.controller.set_anchor(bounds);
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let color = if self.controller.is_panel_mounted() {
            canvas.fill_rounded_rect(self.bounds, TRIGGER_RADIUS, self.palette.highlight);
            self.palette.text
        } else {
            self.palette.muted
        };
        let style = TextStyle {
            size: TRIGGER_GLYPH_SIZE,
            color,
            weight: FontWeight::Bold,
        };
        let center = self.bounds.center();
        canvas.draw_text(
            TRIGGER_GLYPH,
            Point::new(center.x - 3.0, center.y - TRIGGER_GLYPH_SIZE / 2.0),
            &style,
        );
    }

    fn paint_overlay(&self, canvas: &mut dyn Canvas) {
        if !self.controller.is_panel_mounted() {
            return;
        }
        let palette = self.palette.faded(self.controller.opacity());
        if self.controller.config().backdrop {
            canvas.fill_rect(Rect::from_size(self.controller.viewport()), palette.backdrop);
        }
        self.paint_panel(canvas, &palette);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if let Some(position) = event.press_position() {
            return self.on_press(position);
        }
        match event {
            Event::OccludedPress { .. } if self.controller.is_open() => {
                self.close_with(CloseReason::OutsideClick)
            }
            Event::MouseMove { position } if self.controller.is_open() => {
                self.highlighted = self
                    .element_at(*position)
                    .filter(|&i| self.elements[i].is_selectable());
                None
            }
            Event::KeyDown { key } => self.on_key(*key),
            Event::Resize { width, height } => {
                self.controller.set_viewport(Size::new(*width, *height));
                None
            }
            Event::FocusIn => {
                self.focused = true;
                None
            }
            Event::FocusOut => {
                self.focused = false;
                None
            }
            _ => None,
        }
    }

    fn on_frame(&mut self, elapsed: Duration) -> Option<Box<dyn Any + Send>> {
        if self.controller.needs_measurement() {
            let height = self.content_height();
            self.controller.panel_measured(height);
            return None;
        }
        if self.controller.advance(elapsed) {
            self.highlighted = None;
        }
        None
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn accessible_role(&self) -> AccessibleRole {
        if self.controller.is_panel_mounted() {
            AccessibleRole::Menu
        } else {
            AccessibleRole::Button
        }
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn captures_pointer(&self, point: Point) -> bool {
        if !self.controller.is_panel_mounted() {
            return false;
        }
        self.controller.config().backdrop
            || self.panel_bounds().contains_point(&point)
            || self.bounds.contains_point(&point)
    }
}
