//! Backoffice user table: one row per user, each with its own action menu.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use ultima_core::{
    AccessibleRole, Canvas, Color, Constraints, Event, FontWeight, LayoutResult, Point, Rect,
    ScrollLock, Size, TextStyle, TypeId, Widget,
};
use ultima_widgets::{
    ActionMenu, ActionMenuConfig, ActionMenuItem, Column, CrossAxisAlignment, ItemVariant,
    MenuContext, MenuElement, MenuPalette, ITEM_HEIGHT,
};

const ROW_HEIGHT: f32 = 56.0;
const ROW_PADDING: f32 = 16.0;
const ROW_MIN_WIDTH: f32 = 640.0;
const TRIGGER_SIZE: f32 = 36.0;
const TEXT_SIZE: f32 = 14.0;
const BADGE_HEIGHT: f32 = 24.0;

/// Columns: id, name, email, role. Offsets from the row's left edge.
const COLUMN_X: [f32; 4] = [16.0, 140.0, 380.0, 720.0];

/// Account role, as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Backoffice administrator
    #[value(name = "ADMIN")]
    Admin,
    /// Customer
    #[value(name = "USER")]
    User,
    /// Courier
    #[value(name = "DELIVERY")]
    Delivery,
}

impl Role {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Delivery => "DELIVERY",
        }
    }

    /// Name shown to people.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "ADMINISTRADOR",
            Self::User => "USUARIO",
            Self::Delivery => "REPARTIDOR",
        }
    }

    /// Whether this role may edit or delete other accounts.
    #[must_use]
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }

    fn badge_color(self) -> Color {
        match self {
            Self::Admin => Color::rgb(0.659, 0.333, 0.969),
            Self::User => Color::rgb(0.133, 0.773, 0.369),
            Self::Delivery => Color::rgb(0.231, 0.510, 0.965),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque id
    pub id: String,
    /// Full name, if the user gave one
    pub name: Option<String>,
    /// Login email
    pub email: String,
    /// Account role
    pub role: Role,
}

impl User {
    /// First eight characters of the id, as shown in the table.
    #[must_use]
    pub fn short_id(&self) -> String {
        let prefix: String = self.id.chars().take(8).collect();
        format!("{prefix}...")
    }

    /// Name, or a placeholder when missing.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Sin nombre")
    }
}

/// Deterministic fixture accounts for the demo.
#[must_use]
pub fn sample_users(count: usize) -> Vec<User> {
    const PEOPLE: [(Option<&str>, &str, Role); 5] = [
        (Some("Ana Torres"), "ana.torres", Role::Admin),
        (Some("Bruno Díaz"), "bruno.diaz", Role::Delivery),
        (Some("Carla Muñoz"), "carla.munoz", Role::User),
        (Some("Diego Rojas"), "diego.rojas", Role::Delivery),
        (None, "cliente", Role::User),
    ];

    (0..count)
        .map(|i| {
            let (name, handle, role) = PEOPLE[i % PEOPLE.len()];
            let round = i / PEOPLE.len();
            let email = if round == 0 {
                format!("{handle}@ultimamilla.cl")
            } else {
                format!("{handle}+{round}@ultimamilla.cl")
            };
            User {
                id: format!("{:08x}-4d2c-4b1e-9a7f-{:012x}", 0x3f9a_1c00 + i, i),
                name: name.map(str::to_owned),
                email,
                role,
            }
        })
        .collect()
}

/// What a row's menu asked the backoffice to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    /// Open the user's detail page
    View,
    /// Open the edit form
    Edit,
    /// Delete the account
    Delete,
}

impl RowAction {
    /// Action id carried by the menu item.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Route or request this action leads to.
    #[must_use]
    pub fn target(self, user_id: &str) -> String {
        match self {
            Self::View => format!("/users/{user_id}"),
            Self::Edit => format!("/formdemo/{user_id}"),
            Self::Delete => format!("DELETE /api/user/{user_id}"),
        }
    }
}

/// One recorded row action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAction {
    /// Affected user
    pub user_id: String,
    /// What was requested
    pub action: RowAction,
    /// Route or request issued
    pub target: String,
}

/// Shared record of every action the table's menus triggered.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Arc<Mutex<Vec<UserAction>>>,
}

impl ActivityLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    pub fn record(&self, user_id: &str, action: RowAction) {
        let entry = UserAction {
            user_id: user_id.to_owned(),
            action,
            target: action.target(user_id),
        };
        tracing::info!(user = user_id, action = action.id(), target = %entry.target, "row action");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<UserAction> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// The delete entry. While the row's deletion is in flight it shows
/// "Eliminando..." and cannot be activated again.
struct DeleteItem {
    idle: ActionMenuItem,
    busy: ActionMenuItem,
    deleting: Arc<AtomicBool>,
}

impl DeleteItem {
    fn current(&self) -> &ActionMenuItem {
        if self.deleting.load(Ordering::SeqCst) {
            &self.busy
        } else {
            &self.idle
        }
    }
}

impl MenuElement for DeleteItem {
    fn height(&self) -> f32 {
        ITEM_HEIGHT
    }

    fn is_selectable(&self) -> bool {
        self.current().is_selectable()
    }

    fn paint(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        highlighted: bool,
        palette: &MenuPalette,
    ) {
        self.current().paint(canvas, bounds, highlighted, palette);
    }

    fn activate(&mut self, ctx: &MenuContext) -> Option<String> {
        if self.deleting.load(Ordering::SeqCst) {
            return None;
        }
        self.idle.activate(ctx)
    }

    fn label(&self) -> Option<&str> {
        self.current().label()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::MenuItem
    }
}

/// Builds user rows that share a viewer role, activity log and scroll lock.
#[derive(Debug, Clone)]
pub struct UserTable {
    viewer: Role,
    activity: ActivityLog,
    scroll_lock: ScrollLock,
    config: ActionMenuConfig,
}

impl UserTable {
    /// Table seen by `viewer`, locking the process-wide document.
    #[must_use]
    pub fn new(viewer: Role) -> Self {
        Self {
            viewer,
            activity: ActivityLog::new(),
            scroll_lock: ScrollLock::global().clone(),
            config: ActionMenuConfig::default(),
        }
    }

    /// Use a specific scroll lock for every row menu.
    #[must_use]
    pub fn scroll_lock(mut self, lock: ScrollLock) -> Self {
        self.scroll_lock = lock;
        self
    }

    /// Menu configuration for every row.
    #[must_use]
    pub fn config(mut self, config: ActionMenuConfig) -> Self {
        self.config = config;
        self
    }

    /// Role of the person looking at the table.
    #[must_use]
    pub const fn viewer(&self) -> Role {
        self.viewer
    }

    /// Actions recorded by this table's rows.
    #[must_use]
    pub const fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Test id of the action menu in `user`'s row.
    #[must_use]
    pub fn menu_test_id(user: &User) -> String {
        format!("actions-{}", user.id)
    }

    /// One table row with its action menu.
    #[must_use]
    pub fn row(&self, user: User) -> UserRow {
        let manage = self.viewer.can_manage_users();
        let deleting = Arc::new(AtomicBool::new(false));

        let view = {
            let (log, id) = (self.activity.clone(), user.id.clone());
            ActionMenuItem::new("Ver detalle")
                .icon("👁")
                .action(RowAction::View.id())
                .variant(ItemVariant::Primary)
                .on_activate(move || log.record(&id, RowAction::View))
        };
        let edit = {
            let (log, id) = (self.activity.clone(), user.id.clone());
            ActionMenuItem::new("Editar usuario")
                .icon("✎")
                .action(RowAction::Edit.id())
                .variant(ItemVariant::Warning)
                .disabled(!manage)
                .on_activate(move || log.record(&id, RowAction::Edit))
        };
        let delete = {
            let (log, id, flag) = (self.activity.clone(), user.id.clone(), Arc::clone(&deleting));
            DeleteItem {
                idle: ActionMenuItem::new("Eliminar")
                    .icon("🗑")
                    .action(RowAction::Delete.id())
                    .variant(ItemVariant::Danger)
                    .disabled(!manage)
                    .on_activate(move || {
                        flag.store(true, Ordering::SeqCst);
                        log.record(&id, RowAction::Delete);
                    }),
                busy: ActionMenuItem::new("Eliminando...")
                    .icon("🗑")
                    .action(RowAction::Delete.id())
                    .variant(ItemVariant::Danger)
                    .disabled(true),
                deleting: Arc::clone(&deleting),
            }
        };

        let menu = ActionMenu::with_config(self.config.clone())
            .scroll_lock(self.scroll_lock.clone())
            .with_test_id(Self::menu_test_id(&user))
            .item(view)
            .item(edit)
            .divider()
            .element(delete);

        UserRow {
            test_id_value: format!("row-{}", user.id),
            user,
            deleting,
            children: vec![Box::new(menu)],
            bounds: Rect::default(),
        }
    }

    /// Full backoffice page: title, user count and one row per user.
    #[must_use]
    pub fn build(&self, users: Vec<User>) -> Column {
        let count = users.len();
        let plural = if count == 1 { "" } else { "s" };
        let mut page = Column::new()
            .cross_axis_alignment(CrossAxisAlignment::Stretch)
            .with_test_id("backoffice")
            .child(Caption::new("Backoffice", 32.0))
            .child(Caption::new(
                format!("{count} usuario{plural} registrado{plural}"),
                TEXT_SIZE,
            ));

        if users.is_empty() {
            page.push(Box::new(Caption::new("No hay usuarios registrados", TEXT_SIZE)));
        }
        for user in users {
            page.push(Box::new(self.row(user)));
        }
        page
    }
}

/// A single line of text.
#[derive(Debug, Clone)]
pub struct Caption {
    text: String,
    size: f32,
    bounds: Rect,
}

impl Caption {
    /// Text at the given font size.
    #[must_use]
    pub fn new(text: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            size,
            bounds: Rect::default(),
        }
    }
}

impl Widget for Caption {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = self.text.chars().count() as f32 * self.size * 0.6;
        constraints.constrain(Size::new(width, self.size * 1.5))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let style = TextStyle {
            size: self.size,
            ..TextStyle::default()
        };
        canvas.draw_text(
            &self.text,
            Point::new(self.bounds.x + ROW_PADDING, self.bounds.y),
            &style,
        );
    }

    fn event(&mut self, _event: &Event) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Heading
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A user row. The action menu trigger sits at the right edge.
pub struct UserRow {
    user: User,
    deleting: Arc<AtomicBool>,
    children: Vec<Box<dyn Widget>>,
    test_id_value: String,
    bounds: Rect,
}

impl UserRow {
    /// The user shown in this row.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Whether a delete request for this user is in flight.
    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::SeqCst)
    }

    /// Mark the delete request as finished, re-enabling "Eliminar".
    pub fn finish_deletion(&self) {
        self.deleting.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRow")
            .field("user", &self.user.id)
            .field("deleting", &self.is_deleting())
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Widget for UserRow {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = if constraints.max_width.is_finite() {
            constraints.max_width
        } else {
            ROW_MIN_WIDTH
        };
        constraints.constrain(Size::new(width, ROW_HEIGHT))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        let trigger = Rect::new(
            bounds.right() - ROW_PADDING - TRIGGER_SIZE,
            bounds.y + (bounds.height - TRIGGER_SIZE) / 2.0,
            TRIGGER_SIZE,
            TRIGGER_SIZE,
        );
        for child in &mut self.children {
            child.layout(trigger);
        }
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let text_y = self.bounds.y + (self.bounds.height - TEXT_SIZE) / 2.0;
        let at = |column: usize| Point::new(self.bounds.x + COLUMN_X[column], text_y);
        let style = |color: Color, weight: FontWeight| TextStyle {
            size: TEXT_SIZE,
            color,
            weight,
        };

        canvas.draw_text(
            &self.user.short_id(),
            at(0),
            &style(Color::rgb(0.612, 0.639, 0.686), FontWeight::Normal),
        );
        canvas.draw_text(
            self.user.display_name(),
            at(1),
            &style(Color::WHITE, FontWeight::Medium),
        );
        canvas.draw_text(
            &self.user.email,
            at(2),
            &style(Color::rgb(0.376, 0.647, 0.980), FontWeight::Normal),
        );

        let role = self.user.role;
        let badge = Rect::new(
            self.bounds.x + COLUMN_X[3] - 12.0,
            self.bounds.y + (self.bounds.height - BADGE_HEIGHT) / 2.0,
            role.as_str().len() as f32 * 8.0 + 24.0,
            BADGE_HEIGHT,
        );
        canvas.fill_rounded_rect(badge, BADGE_HEIGHT / 2.0, role.badge_color().with_alpha(0.2));
        canvas.draw_text(role.as_str(), at(3), &style(role.badge_color(), FontWeight::Semibold));

        canvas.draw_line(
            Point::new(self.bounds.x, self.bounds.bottom()),
            Point::new(self.bounds.right(), self.bounds.bottom()),
            Color::WHITE.with_alpha(0.08),
            1.0,
        );

        for child in &self.children {
            child.paint(canvas);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let mut first = None;
        for child in &mut self.children {
            let message = child.event(event);
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

    fn accessible_name(&self) -> Option<&str> {
        Some(self.user.display_name())
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::TableRow
    }

    fn test_id(&self) -> Option<&str> {
        Some(&self.test_id_value)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
