//! Elements that make up an action menu panel.
//!
//! A panel is an ordered list of [`MenuElement`]s. The menu only needs each
//! element's height, whether it can be selected, how it paints, and what it
//! does when activated. Elements that want the menu to close call
//! [`MenuContext::close_menu`] on the context they are handed.

use crate::theme::MenuPalette;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use ultima_core::{AccessibleRole, Canvas, FontWeight, Point, Rect, TextStyle};

/// Height of an [`ActionMenuItem`] row.
pub const ITEM_HEIGHT: f32 = 40.0;
/// Height of an [`ActionMenuDivider`], including its vertical margin.
pub const DIVIDER_HEIGHT: f32 = 9.0;
/// Height of an [`ActionMenuHeader`].
pub const HEADER_HEIGHT: f32 = 32.0;

const TEXT_SIZE: f32 = 14.0;
const HEADER_TEXT_SIZE: f32 = 12.0;
const PADDING_X: f32 = 16.0;
const ICON_SLOT: f32 = 24.0;

/// Close capability handed to elements while they are activated.
///
/// Clones share the same request flag.
#[derive(Debug, Clone, Default)]
pub struct MenuContext {
    close_requested: Arc<AtomicBool>,
}

impl MenuContext {
    /// Create a context with no pending request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the owning menu to start closing.
    pub fn close_menu(&self) {
        self.close_requested.store(true, Ordering::SeqCst);
    }

    /// Whether a close has been requested and not yet handled.
    #[must_use]
    pub fn is_close_requested(&self) -> bool {
        self.close_requested.load(Ordering::SeqCst)
    }

    /// Consume a pending close request.
    pub fn take_close_request(&self) -> bool {
        self.close_requested.swap(false, Ordering::SeqCst)
    }
}

/// Something that can be placed in an action menu panel.
pub trait MenuElement: Send + Sync {
    /// Row height in pixels.
    fn height(&self) -> f32;

    /// Whether hover, keyboard navigation and activation apply.
    fn is_selectable(&self) -> bool {
        false
    }

    /// Paint into `bounds` (already positioned inside the panel).
    fn paint(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        highlighted: bool,
        palette: &MenuPalette,
    );

    /// Activate the element. Returns the action id when something happened.
    fn activate(&mut self, _ctx: &MenuContext) -> Option<String> {
        None
    }

    /// Visible label, if any.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }
}

/// Visual emphasis of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemVariant {
    /// Regular text
    #[default]
    Default,
    /// Navigation or view actions
    Primary,
    /// Actions that change data
    Warning,
    /// Destructive actions
    Danger,
}

type Callback = Box<dyn Fn() + Send + Sync>;

/// A selectable row: label, optional icon, variant and callback.
pub struct ActionMenuItem {
    label: String,
    icon: Option<String>,
    variant: ItemVariant,
    disabled: bool,
    action: String,
    on_activate: Option<Callback>,
}

impl ActionMenuItem {
    /// Create an item. The action id defaults to the label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            action: label.clone(),
            label,
            icon: None,
            variant: ItemVariant::Default,
            disabled: false,
            on_activate: None,
        }
    }

    /// Set the leading icon glyph.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the variant.
    #[must_use]
    pub const fn variant(mut self, variant: ItemVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the action id reported on activation.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the callback run on activation.
    #[must_use]
    pub fn on_activate(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_activate = Some(Box::new(f));
        self
    }

    /// Enable or disable in place.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the item is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Item variant.
    #[must_use]
    pub const fn item_variant(&self) -> ItemVariant {
        self.variant
    }

    /// Action id.
    #[must_use]
    pub fn action_id(&self) -> &str {
        &self.action
    }

    /// Icon glyph.
    #[must_use]
    pub fn icon_glyph(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    fn text_color(&self, palette: &MenuPalette) -> ultima_core::Color {
        if self.disabled {
            return palette.muted.fade(0.5);
        }
        match self.variant {
            ItemVariant::Default => palette.text,
            ItemVariant::Primary => palette.primary,
            ItemVariant::Warning => palette.warning,
            ItemVariant::Danger => palette.danger,
        }
    }
}

impl fmt::Debug for ActionMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionMenuItem")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("variant", &self.variant)
            .field("disabled", &self.disabled)
            .field("action", &self.action)
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}

impl MenuElement for ActionMenuItem {
    fn height(&self) -> f32 {
        ITEM_HEIGHT
    }

    fn is_selectable(&self) -> bool {
        !self.disabled
    }

    fn paint(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        highlighted: bool,
        palette: &MenuPalette,
    ) {
        if highlighted && !self.disabled {
            canvas.fill_rect(bounds, palette.highlight);
        }

        let style = TextStyle {
            size: TEXT_SIZE,
            color: self.text_color(palette),
            weight: FontWeight::Medium,
        };
        let text_y = bounds.y + (bounds.height - TEXT_SIZE) / 2.0;
        let mut text_x = bounds.x + PADDING_X;
        if let Some(icon) = &self.icon {
            canvas.draw_text(icon, Point::new(text_x, text_y), &style);
            text_x += ICON_SLOT;
        }
        canvas.draw_text(&self.label, Point::new(text_x, text_y), &style);
    }

    fn activate(&mut self, ctx: &MenuContext) -> Option<String> {
        if self.disabled {
            return None;
        }
        if let Some(callback) = &self.on_activate {
            callback();
        }
        ctx.close_menu();
        Some(self.action.clone())
    }

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::MenuItem
    }
}

/// Horizontal rule between groups of items.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionMenuDivider;

impl MenuElement for ActionMenuDivider {
    fn height(&self) -> f32 {
        DIVIDER_HEIGHT
    }

    fn paint(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        _highlighted: bool,
        palette: &MenuPalette,
    ) {
        let y = bounds.y + bounds.height / 2.0;
        canvas.draw_line(
            Point::new(bounds.x, y),
            Point::new(bounds.right(), y),
            palette.border,
            1.0,
        );
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Separator
    }
}

/// Non-interactive section title.
#[derive(Debug, Clone)]
pub struct ActionMenuHeader {
    label: String,
}

impl ActionMenuHeader {
    /// Create a header.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl MenuElement for ActionMenuHeader {
    fn height(&self) -> f32 {
        HEADER_HEIGHT
    }

    fn paint(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        _highlighted: bool,
        palette: &MenuPalette,
    ) {
        let style = TextStyle {
            size: HEADER_TEXT_SIZE,
            color: palette.muted,
            weight: FontWeight::Semibold,
        };
        let y = bounds.y + (bounds.height - HEADER_TEXT_SIZE) / 2.0;
        canvas.draw_text(&self.label, Point::new(bounds.x + PADDING_X, y), &style);
    }

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use ultima_core::{DrawCommand, RecordingCanvas};

    fn counting_item(count: &Arc<AtomicUsize>) -> ActionMenuItem {
        let count = Arc::clone(count);
        ActionMenuItem::new("Editar usuario").on_activate(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    // =========================================================================
    // MenuContext Tests
    // =========================================================================

    #[test]
    fn test_context_take_clears_request() {
        let ctx = MenuContext::new();
        assert!(!ctx.take_close_request());
        ctx.close_menu();
        assert!(ctx.is_close_requested());
        assert!(ctx.take_close_request());
        assert!(!ctx.is_close_requested());
    }

    #[test]
    fn test_context_clones_share_flag() {
        let ctx = MenuContext::new();
        ctx.clone().close_menu();
        assert!(ctx.is_close_requested());
    }

    // =========================================================================
    // ActionMenuItem Tests
    // =========================================================================

    #[test]
    fn test_item_builder() {
        let item = ActionMenuItem::new("Eliminar")
            .icon("🗑")
            .variant(ItemVariant::Danger)
            .action("delete");
        assert_eq!(item.label(), Some("Eliminar"));
        assert_eq!(item.icon_glyph(), Some("🗑"));
        assert_eq!(item.item_variant(), ItemVariant::Danger);
        assert_eq!(item.action_id(), "delete");
        assert!(!item.is_disabled());
        assert_eq!(item.height(), ITEM_HEIGHT);
        assert_eq!(item.accessible_role(), AccessibleRole::MenuItem);
    }

    #[test]
    fn test_item_action_defaults_to_label() {
        assert_eq!(ActionMenuItem::new("Ver detalle").action_id(), "Ver detalle");
    }

    #[test]
    fn test_enabled_item_runs_callback_once_and_requests_close() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut item = counting_item(&count);
        let ctx = MenuContext::new();

        assert_eq!(item.activate(&ctx), Some("Editar usuario".to_string()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(ctx.is_close_requested());
    }

    #[test]
    fn test_disabled_item_is_inert() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut item = counting_item(&count).disabled(true);
        let ctx = MenuContext::new();

        assert_eq!(item.activate(&ctx), None);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!ctx.is_close_requested());
        assert!(!item.is_selectable());
    }

    #[test]
    fn test_item_without_callback_still_closes() {
        let mut item = ActionMenuItem::new("Ver detalle");
        let ctx = MenuContext::new();
        assert!(item.activate(&ctx).is_some());
        assert!(ctx.is_close_requested());
    }

    #[test]
    fn test_set_disabled() {
        let mut item = ActionMenuItem::new("Eliminar");
        item.set_disabled(true);
        assert!(item.is_disabled());
        item.set_disabled(false);
        assert!(item.is_selectable());
    }

    #[test]
    fn test_item_paint_uses_variant_color() {
        let palette = MenuPalette::default();
        let item = ActionMenuItem::new("Eliminar").variant(ItemVariant::Danger);
        let mut canvas = RecordingCanvas::new();
        item.paint(&mut canvas, Rect::new(0.0, 8.0, 192.0, 40.0), false, &palette);

        match &canvas.commands()[0] {
            DrawCommand::Text { content, style, .. } => {
                assert_eq!(content, "Eliminar");
                assert_eq!(style.color, palette.danger);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_item_paint_highlight_and_icon() {
        let item = ActionMenuItem::new("Ver detalle").icon("👁");
        let mut canvas = RecordingCanvas::new();
        item.paint(
            &mut canvas,
            Rect::new(0.0, 0.0, 192.0, 40.0),
            true,
            &MenuPalette::default(),
        );
        assert!(matches!(canvas.commands()[0], DrawCommand::Rect { .. }));
        assert_eq!(canvas.texts(), vec!["👁", "Ver detalle"]);
    }

    #[test]
    fn test_disabled_item_not_highlighted() {
        let item = ActionMenuItem::new("Eliminar").disabled(true);
        let mut canvas = RecordingCanvas::new();
        item.paint(
            &mut canvas,
            Rect::new(0.0, 0.0, 192.0, 40.0),
            true,
            &MenuPalette::default(),
        );
        assert_eq!(canvas.command_count(), 1);
    }

    #[test]
    fn test_item_debug_hides_callback() {
        let item = ActionMenuItem::new("Ver detalle").on_activate(|| {});
        let debug = format!("{item:?}");
        assert!(debug.contains("on_activate: true"));
    }

    #[test]
    fn test_variant_serde_lowercase() {
        let json = serde_json::to_string(&ItemVariant::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let parsed: ItemVariant = serde_json::from_str("\"danger\"").unwrap();
        assert_eq!(parsed, ItemVariant::Danger);
    }

    // =========================================================================
    // Divider / Header Tests
    // =========================================================================

    #[test]
    fn test_divider_is_inert_line() {
        let mut divider = ActionMenuDivider;
        assert_eq!(divider.height(), DIVIDER_HEIGHT);
        assert!(!divider.is_selectable());
        assert_eq!(divider.activate(&MenuContext::new()), None);

        let mut canvas = RecordingCanvas::new();
        divider.paint(
            &mut canvas,
            Rect::new(0.0, 0.0, 192.0, DIVIDER_HEIGHT),
            false,
            &MenuPalette::default(),
        );
        assert!(matches!(canvas.commands()[0], DrawCommand::Line { .. }));
    }

    #[test]
    fn test_header() {
        let mut header = ActionMenuHeader::new("Acciones");
        assert_eq!(header.height(), HEADER_HEIGHT);
        assert_eq!(header.label(), Some("Acciones"));
        assert!(!header.is_selectable());
        let ctx = MenuContext::new();
        assert_eq!(header.activate(&ctx), None);
        assert!(!ctx.is_close_requested());
        assert_eq!(header.accessible_role(), AccessibleRole::Heading);
    }
}
