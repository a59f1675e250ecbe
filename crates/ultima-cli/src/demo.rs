//! `ultima demo`: a scripted backoffice session driven headlessly.

use crate::backoffice::{sample_users, Role, User, UserAction, UserTable};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::any::Any;
use tracing::info;
use ultima_core::{DrawCommand, Key, Point, ScrollLock};
use ultima_test::Harness;
use ultima_widgets::{ActionMenuClosed, ActionMenuConfig, ActionMenuItemActivated, ActionMenuOpened};

const VIEWPORT_WIDTH: f32 = 1280.0;
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub viewer: Role,
    pub viewport_height: f32,
    pub rows: usize,
    pub config: ActionMenuConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoStep {
    pub name: &'static str,
    pub events: Vec<String>,
    /// Labels in the open panel at the end of the step
    pub panel: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub viewer: Role,
    pub viewer_name: &'static str,
    pub steps: Vec<DemoStep>,
    pub activity: Vec<UserAction>,
    pub blocked_scrolls: usize,
    pub scroll_locked: bool,
    pub lock_acquisitions: u64,
    pub lock_releases: u64,
}

/// Human-readable form of a widget message.
pub fn describe(message: &(dyn Any + Send)) -> String {
    if message.downcast_ref::<ActionMenuOpened>().is_some() {
        "menu opened".to_owned()
    } else if let Some(closed) = message.downcast_ref::<ActionMenuClosed>() {
        format!("menu closing ({:?})", closed.reason)
    } else if let Some(item) = message.downcast_ref::<ActionMenuItemActivated>() {
        format!("activated '{}'", item.action)
    } else {
        "unrecognized message".to_owned()
    }
}

/// Text painted in the overlay layer, in paint order.
fn overlay_labels(harness: &Harness) -> Vec<String> {
    let canvas = harness.paint();
    canvas
        .commands()
        .iter()
        .skip_while(|c| !matches!(c, DrawCommand::PushClip(_)))
        .filter_map(DrawCommand::text)
        .map(str::to_owned)
        .collect()
}

struct Session {
    harness: Harness,
    steps: Vec<DemoStep>,
}

impl Session {
    fn menu(user: &User) -> String {
        format!("#{}", UserTable::menu_test_id(user))
    }

    fn open(&mut self, user: &User) -> Result<()> {
        let selector = Self::menu(user);
        if !self.harness.exists(&selector) {
            bail!("no action menu for user {}", user.id);
        }
        self.harness.click(&selector).run_frames(20, FRAME_MS);
        Ok(())
    }

    fn settle(&mut self) {
        self.harness.run_frames(15, FRAME_MS);
    }

    fn record(&mut self, name: &'static str) {
        let panel = overlay_labels(&self.harness);
        let events: Vec<String> = self
            .harness
            .take_messages()
            .iter()
            .map(|m| describe(m.as_ref()))
            .collect();
        info!(step = name, ?events, ?panel, "demo step");
        self.steps.push(DemoStep {
            name,
            events,
            panel,
        });
    }
}

/// Run the scripted session against `lock`.
pub fn run(options: &DemoOptions, lock: &ScrollLock) -> Result<DemoReport> {
    if options.rows == 0 {
        bail!("the demo needs at least one user row");
    }
    options
        .config
        .validate()
        .context("invalid action menu configuration")?;

    let users = sample_users(options.rows);
    let table = UserTable::new(options.viewer)
        .scroll_lock(lock.clone())
        .config(options.config.clone());
    let harness = Harness::new(table.build(users.clone()))
        .scroll_lock(lock.clone())
        .viewport(VIEWPORT_WIDTH, options.viewport_height);
    info!(
        viewer = options.viewer.display_name(),
        rows = users.len(),
        "starting backoffice demo"
    );

    let mut session = Session {
        harness,
        steps: Vec::new(),
    };
    let first = &users[0];
    let last = &users[users.len() - 1];

    session.open(first)?;
    session.record("open first row");

    session.harness.press_key(Key::Down).press_key(Key::Enter);
    session.settle();
    session.record("view details");

    session.open(last)?;
    session.harness.scroll(120.0);
    session.record("open last row and try to scroll");

    session.harness.press_key(Key::Escape);
    session.settle();
    session.record("escape");

    session.open(first)?;
    session.harness.press_key(Key::Up).press_key(Key::Enter);
    session.settle();
    session.record("delete first row");

    session.open(first)?;
    session.record("reopen first row");

    session.harness.click_at(Point::new(8.0, 8.0));
    session.settle();
    session.record("click outside");

    let stats = lock.stats();
    Ok(DemoReport {
        viewer: options.viewer,
        viewer_name: options.viewer.display_name(),
        steps: session.steps,
        activity: table.activity().snapshot(),
        blocked_scrolls: session.harness.blocked_scrolls(),
        scroll_locked: lock.is_locked(),
        lock_acquisitions: stats.locks,
        lock_releases: stats.releases,
    })
}
