//! End-to-end behavior of action menus inside a widget tree.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use ultima_core::{
    widget::LayoutResult, Canvas, Constraints, DrawCommand, Event, Key, Point, Rect, ScrollLock,
    Size, TypeId, Widget,
};
use ultima_test::Harness;
use ultima_widgets::{
    ActionMenu, ActionMenuClosed, ActionMenuConfig, ActionMenuItem, ActionMenuItemActivated,
    ActionMenuOpened, CloseReason, Column, CrossAxisAlignment, ItemVariant, MenuState, Placement,
};

/// Empty vertical space.
struct Spacer(f32);

impl Widget for Spacer {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
    fn measure(&self, c: Constraints) -> Size {
        c.constrain(Size::new(0.0, self.0))
    }
    fn layout(&mut self, b: Rect) -> LayoutResult {
        LayoutResult { size: b.size() }
    }
    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text("row", Point::ORIGIN, &ultima_core::TextStyle::default());
    }
    fn event(&mut self, _: &Event) -> Option<Box<dyn Any + Send>> {
        None
    }
    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }
    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&count);
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

fn row_menu(lock: &ScrollLock, id: &str, config: ActionMenuConfig) -> ActionMenu {
    ActionMenu::with_config(config)
        .scroll_lock(lock.clone())
        .with_test_id(id)
        .item(
            ActionMenuItem::new("Ver detalle")
                .action("view")
                .variant(ItemVariant::Primary),
        )
        .item(
            ActionMenuItem::new("Editar usuario")
                .action("edit")
                .variant(ItemVariant::Warning),
        )
        .divider()
        .item(
            ActionMenuItem::new("Eliminar")
                .action("delete")
                .variant(ItemVariant::Danger)
                .disabled(true),
        )
}

/// One menu whose trigger sits at `top`, right-aligned in a 1280x800 viewport.
fn single(lock: &ScrollLock, top: f32, menu: ActionMenu) -> Harness {
    let root = Column::new()
        .cross_axis_alignment(CrossAxisAlignment::End)
        .child(Spacer(top))
        .child(menu);
    Harness::new(root)
        .scroll_lock(lock.clone())
        .viewport(1280.0, 800.0)
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn test_open_measure_close_cycle() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    assert_eq!(h.bounds_of("#menu"), Some(Rect::new(1244.0, 100.0, 36.0, 36.0)));

    h.click("#menu");
    assert!(h.last_message::<ActionMenuOpened>().is_some());
    h.assert_scroll_locked(true);

    h.tick(16);
    h.scroll(40.0);
    assert_eq!(h.blocked_scrolls(), 1);

    h.click_at(Point::new(100.0, 700.0));
    assert_eq!(
        h.last_message::<ActionMenuClosed>().map(|m| m.reason),
        Some(CloseReason::OutsideClick)
    );
    h.tick(100);
    h.assert_scroll_locked(true);
    h.tick(100);
    h.assert_scroll_locked(false);
    assert_eq!(lock.stats().locks, 1);
    assert_eq!(lock.stats().releases, 1);
}

#[test]
fn test_estimate_then_measured_position() {
    let lock = ScrollLock::new();
    // trigger spans 664..700, 100px left below it
    let mut h = single(&lock, 664.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu");

    let before = h.paint();
    let estimated = panel_rect(&before).unwrap();
    assert_eq!(estimated.y, 664.0 - 300.0 - 8.0);

    h.tick(16);
    let after = h.paint();
    let measured = panel_rect(&after).unwrap();
    // 8 + 40 + 40 + 9 + 40 + 8
    assert_eq!(measured.height, 145.0);
    assert_eq!(measured.y, 664.0 - 145.0 - 8.0);
    assert_eq!(measured.right(), 1280.0);
    assert_eq!(measured.width, 192.0);
}

#[test]
fn test_opens_below_with_room() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 64.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    let panel = panel_rect(&h.paint()).unwrap();
    assert_eq!(panel.y, 108.0);
}

#[test]
fn test_resize_flips_open_panel() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 300.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    assert_eq!(panel_rect(&h.paint()).unwrap().y, 344.0);

    h.resize(1280.0, 400.0);
    // 400 - 336 = 64 < 161
    assert_eq!(panel_rect(&h.paint()).unwrap().y, 300.0 - 145.0 - 8.0);
}

#[test]
fn test_trigger_twice_closes() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16).click("#menu");
    assert_eq!(
        h.last_message::<ActionMenuClosed>().map(|m| m.reason),
        Some(CloseReason::Trigger)
    );
    h.tick(200).assert_scroll_locked(false);
}

#[test]
fn test_escape_closes() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16).press_key(Key::Escape);
    assert_eq!(
        h.last_message::<ActionMenuClosed>().map(|m| m.reason),
        Some(CloseReason::Escape)
    );
}

#[test]
fn test_unmount_releases_lock() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    h.assert_scroll_locked(true);
    drop(h);
    assert!(!lock.is_locked());
    assert_eq!(lock.stats().releases, 1);
}

// =========================================================================
// Items
// =========================================================================

#[test]
fn test_enabled_item_runs_once_then_closes() {
    let lock = ScrollLock::new();
    let (count, on_view) = counter();
    let menu = ActionMenu::new()
        .scroll_lock(lock.clone())
        .with_test_id("menu")
        .item(ActionMenuItem::new("Ver detalle").action("view").on_activate(on_view));
    let mut h = single(&lock, 100.0, menu);
    h.click("#menu").tick(16);

    // panel at 144, first row 152..192
    h.click_at(Point::new(1200.0, 170.0));
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.last_message::<ActionMenuItemActivated>()
            .map(|m| m.action.as_str()),
        Some("view")
    );
    h.tick(200).assert_scroll_locked(false);

    // the panel is gone, so the same point is an ordinary press
    h.click_at(Point::new(1200.0, 170.0));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disabled_item_never_runs_or_closes() {
    let lock = ScrollLock::new();
    let (count, on_delete) = counter();
    let menu = ActionMenu::new()
        .scroll_lock(lock.clone())
        .with_test_id("menu")
        .item(
            ActionMenuItem::new("Eliminar")
                .disabled(true)
                .on_activate(on_delete),
        );
    let mut h = single(&lock, 100.0, menu);
    h.click("#menu").tick(16);
    h.take_messages();

    h.click_at(Point::new(1200.0, 170.0));
    h.press_key(Key::Down).press_key(Key::Enter);
    h.tick(300);

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(h.messages().is_empty());
    h.assert_scroll_locked(true);
}

#[test]
fn test_keyboard_activation() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    h.press_key(Key::Up).press_key(Key::Enter);
    assert_eq!(
        h.last_message::<ActionMenuItemActivated>()
            .map(|m| m.action.as_str()),
        Some("edit")
    );
}

#[test]
fn test_press_inside_panel_does_not_close() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    h.take_messages();
    // top padding of the panel
    h.click_at(Point::new(1200.0, 146.0));
    assert!(h.messages().is_empty());
    h.assert_scroll_locked(true);
}

#[test]
fn test_touch_outside_closes() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    h.touch_at(Point::new(20.0, 20.0));
    assert!(h.last_message::<ActionMenuClosed>().is_some());
}

// =========================================================================
// Several menus
// =========================================================================

fn two_rows(lock: &ScrollLock, config: &ActionMenuConfig) -> Harness {
    let root = Column::new()
        .cross_axis_alignment(CrossAxisAlignment::End)
        .child(Spacer(100.0))
        .child(row_menu(lock, "first", config.clone()))
        .child(Spacer(300.0))
        .child(row_menu(lock, "second", config.clone()));
    Harness::new(root)
        .scroll_lock(lock.clone())
        .viewport(1280.0, 800.0)
}

#[test]
fn test_backdrop_shields_other_triggers() {
    let lock = ScrollLock::new();
    let mut h = two_rows(&lock, &ActionMenuConfig::default());
    h.click("#first").tick(16);
    h.take_messages();

    h.click("#second");
    let closed = h.messages_of::<ActionMenuClosed>();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].reason, CloseReason::OutsideClick);
    assert!(h.messages_of::<ActionMenuOpened>().is_empty());
    assert_eq!(lock.holders(), 1);
}

#[test]
fn test_panel_shields_trigger_underneath() {
    let lock = ScrollLock::new();
    let config = ActionMenuConfig {
        backdrop: false,
        ..ActionMenuConfig::default()
    };
    let root = Column::new()
        .cross_axis_alignment(CrossAxisAlignment::End)
        .child(Spacer(100.0))
        .child(row_menu(&lock, "first", config.clone()))
        .child(row_menu(&lock, "second", config));
    let mut h = Harness::new(root)
        .scroll_lock(lock.clone())
        .viewport(1280.0, 800.0);
    h.click("#first").tick(16);
    h.take_messages();

    // second trigger spans 136..172 and sits under the first panel (144..289)
    h.click_at(Point::new(1262.0, 160.0));
    assert!(h.messages_of::<ActionMenuOpened>().is_empty());
    assert_eq!(
        h.last_message::<ActionMenuItemActivated>()
            .map(|m| m.action.as_str()),
        Some("view")
    );
    assert_eq!(lock.holders(), 1);
}

#[test]
fn test_lock_held_until_every_menu_closed() {
    let lock = ScrollLock::new();
    let config = ActionMenuConfig {
        backdrop: false,
        ..ActionMenuConfig::default()
    };
    let mut h = two_rows(&lock, &config);
    h.click("#first").tick(16);
    // first starts closing, second opens
    h.click("#second");
    assert_eq!(lock.holders(), 2);

    h.tick(200);
    assert_eq!(lock.holders(), 1);
    h.assert_scroll_locked(true);

    h.press_key(Key::Escape).tick(200);
    h.assert_scroll_locked(false);
    assert_eq!(lock.stats().locks, 1);
    assert_eq!(lock.stats().releases, 1);
}

#[test]
fn test_two_menus_opened_directly() {
    let lock = ScrollLock::new();
    let mut a = row_menu(&lock, "a", ActionMenuConfig::default());
    let mut b = row_menu(&lock, "b", ActionMenuConfig::default());
    a.layout(Rect::new(0.0, 0.0, 36.0, 36.0));
    b.layout(Rect::new(0.0, 100.0, 36.0, 36.0));
    assert!(a.open());
    assert!(b.open());

    a.close();
    a.on_frame(Duration::from_millis(200));
    assert_eq!(a.state(), MenuState::Closed);
    assert!(lock.is_locked());

    b.close();
    b.on_frame(Duration::from_millis(200));
    assert!(!lock.is_locked());
}

// =========================================================================
// Overlay painting
// =========================================================================

fn panel_rect(canvas: &ultima_core::RecordingCanvas) -> Option<Rect> {
    canvas.commands().iter().find_map(|c| match c {
        DrawCommand::Rect {
            bounds, radius, fill: Some(_), ..
        } if !radius.is_zero() && bounds.width == 192.0 => Some(*bounds),
        _ => None,
    })
}

#[test]
fn test_panel_painted_after_inline_tree() {
    let lock = ScrollLock::new();
    let mut h = two_rows(&lock, &ActionMenuConfig::default());
    h.click("#first").tick(16).tick(250);
    let canvas = h.paint();

    let commands = canvas.commands();
    let last_trigger = commands.iter().rposition(|c| c.text() == Some("⋮"));
    let last_row = commands.iter().rposition(|c| c.text() == Some("row"));
    let first_item = canvas.position_of_text("Ver detalle");

    assert_eq!(canvas.texts().iter().filter(|t| **t == "⋮").count(), 2);
    assert!(first_item > last_trigger);
    assert!(first_item > last_row);
    assert_eq!(canvas.transform_depth(), 0);
}

#[test]
fn test_closed_menus_paint_no_overlay() {
    let lock = ScrollLock::new();
    let h = two_rows(&lock, &ActionMenuConfig::default());
    let canvas = h.paint();
    assert!(canvas.position_of_text("Ver detalle").is_none());
    assert!(panel_rect(&canvas).is_none());
}

#[test]
fn test_fade_follows_transition() {
    let lock = ScrollLock::new();
    let mut h = single(&lock, 100.0, row_menu(&lock, "menu", ActionMenuConfig::default()));
    h.click("#menu").tick(16);
    assert_eq!(panel_alpha(&h.paint()), 0.0);
    h.tick(125);
    assert!((panel_alpha(&h.paint()) - 0.5).abs() < 1e-3);
    h.tick(125);
    assert!((panel_alpha(&h.paint()) - 1.0).abs() < 1e-6);
}

fn panel_alpha(canvas: &ultima_core::RecordingCanvas) -> f32 {
    canvas
        .commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::Rect {
                bounds,
                radius,
                fill: Some(fill),
                ..
            } if !radius.is_zero() && bounds.width == 192.0 => Some(fill.a),
            _ => None,
        })
        .unwrap_or(0.0)
}

#[test]
fn test_opened_state_reported_by_placement() {
    let mut menu = row_menu(&ScrollLock::new(), "m", ActionMenuConfig::default())
        .viewport(Size::new(1280.0, 800.0));
    menu.layout(Rect::new(1244.0, 700.0, 36.0, 36.0));
    menu.open();
    assert_eq!(menu.controller().placement(), Placement::Above);
}
