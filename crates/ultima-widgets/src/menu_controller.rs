//! Open/close lifecycle of a floating action menu.
//!
//! ```text
//! Closed --open--> Opening --measured--> Open
//!    ^                |                    |
//!    |                +------close---------+
//!    |                          v
//!    +------close timer----- Closing
//! ```
//!
//! Opening places the panel with an estimated height (the last measured
//! height, or the configured fallback) and takes the scroll lock. The next
//! frame reports the real height, the panel is placed again and the enter
//! transition starts. Closing runs a fixed timer, after which the panel is
//! unmounted and the lock is given back.

use crate::config::ActionMenuConfig;
use crate::menu_item::MenuContext;
use crate::placement::{AnchorRect, ComputedPosition, Placement, PlacementPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ultima_core::{Easing, Rect, ScrollLock, ScrollLockGuard, Size, Transition};

const ENTER_SCALE: f32 = 0.95;
const ENTER_OFFSET_Y: f32 = -8.0;

/// Lifecycle state of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    /// Nothing mounted
    #[default]
    Closed,
    /// Mounted at the estimated position, waiting for measurement
    Opening,
    /// Measured, placed and fading in or fully shown
    Open,
    /// Fading out until the close timer expires
    Closing,
}

/// Why a menu started closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// Pointer pressed outside trigger and panel
    OutsideClick,
    /// An item was activated
    ItemActivated,
    /// The trigger was activated again
    Trigger,
    /// Escape key
    Escape,
    /// Closed programmatically
    Explicit,
}

/// State machine behind [`crate::ActionMenu`].
#[derive(Debug)]
pub struct MenuController {
    config: ActionMenuConfig,
    policy: PlacementPolicy,
    state: MenuState,
    anchor: Option<AnchorRect>,
    viewport: Size,
    placement: Placement,
    position: ComputedPosition,
    measured_height: Option<f32>,
    opacity: Transition,
    close_remaining: Duration,
    last_close_reason: Option<CloseReason>,
    context: MenuContext,
    scroll_lock: ScrollLock,
    scroll_guard: Option<ScrollLockGuard>,
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new(ActionMenuConfig::default())
    }
}

impl MenuController {
    /// Create a closed controller using the process-wide scroll lock.
    #[must_use]
    pub fn new(config: ActionMenuConfig) -> Self {
        Self {
            policy: PlacementPolicy::from(&config),
            config,
            state: MenuState::Closed,
            anchor: None,
            viewport: Size::ZERO,
            placement: Placement::Below,
            position: ComputedPosition::default(),
            measured_height: None,
            opacity: Transition::settled(0.0),
            close_remaining: Duration::ZERO,
            last_close_reason: None,
            context: MenuContext::new(),
            scroll_lock: ScrollLock::global().clone(),
            scroll_guard: None,
        }
    }

    /// Use another scroll lock.
    #[must_use]
    pub fn with_scroll_lock(mut self, lock: ScrollLock) -> Self {
        self.scroll_lock = lock;
        self
    }

    /// Replace the configuration. Takes effect from the next open.
    pub fn set_config(&mut self, config: ActionMenuConfig) {
        self.policy = PlacementPolicy::from(&config);
        self.config = config;
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ActionMenuConfig {
        &self.config
    }

    /// Record the trigger bounds. Non-finite bounds clear the anchor.
    pub fn set_anchor(&mut self, bounds: Rect) {
        self.anchor = AnchorRect::from_bounds(bounds);
    }

    /// Current anchor.
    #[must_use]
    pub const fn anchor(&self) -> Option<AnchorRect> {
        self.anchor
    }

    /// Update the viewport size, re-placing a mounted panel.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if self.is_panel_mounted() {
            self.reposition();
        }
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Start opening. Returns `false` when already mounted or unanchored.
    pub fn open(&mut self) -> bool {
        if self.state != MenuState::Closed {
            return false;
        }
        if self.anchor.is_none() {
            tracing::debug!("action menu has no anchor yet, ignoring open");
            return false;
        }

        self.context.take_close_request();
        self.opacity = Transition::settled(0.0);
        self.state = MenuState::Opening;
        self.reposition();
        if self.config.lock_scroll && self.scroll_guard.is_none() {
            self.scroll_guard = Some(self.scroll_lock.acquire());
        }
        tracing::debug!(
            placement = ?self.placement,
            top = self.position.top,
            estimated_height = self.panel_height(),
            "action menu opening"
        );
        true
    }

    /// Start closing. Returns `false` when not opening or open.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = MenuState::Closing;
        self.close_remaining = self.config.close_duration();
        self.opacity.retarget(0.0, self.config.close_duration());
        self.last_close_reason = Some(reason);
        tracing::debug!(?reason, "action menu closing");
        true
    }

    /// Open when closed, close (as [`CloseReason::Trigger`]) when open.
    ///
    /// Does nothing while closing.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            MenuState::Closed => self.open(),
            MenuState::Opening | MenuState::Open => self.close(CloseReason::Trigger),
            MenuState::Closing => false,
        }
    }

    /// Whether the panel still waits for its real height.
    #[must_use]
    pub fn needs_measurement(&self) -> bool {
        self.state == MenuState::Opening
    }

    /// Report the rendered panel height, finishing the open.
    ///
    /// Ignored unless opening. Unusable heights fall back to the estimate.
    pub fn panel_measured(&mut self, height: f32) -> bool {
        if self.state != MenuState::Opening {
            return false;
        }
        if height.is_finite() && height > 0.0 {
            self.measured_height = Some(height);
        }
        self.reposition();
        self.state = MenuState::Open;
        self.opacity = Transition::new(0.0, 1.0, self.config.enter_duration())
            .with_easing(Easing::CubicInOut);
        tracing::debug!(
            placement = ?self.placement,
            top = self.position.top,
            height = self.panel_height(),
            "action menu open"
        );
        true
    }

    /// Advance transitions and the close timer. Returns `true` when the
    /// panel was unmounted during this step.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.opacity.advance(dt);
        if self.state != MenuState::Closing {
            return false;
        }
        self.close_remaining = self.close_remaining.saturating_sub(dt);
        if !self.close_remaining.is_zero() {
            return false;
        }
        self.finish_close();
        true
    }

    /// Drop the panel and the scroll lock immediately.
    pub fn unmount(&mut self) {
        if self.state != MenuState::Closed {
            self.finish_close();
        }
    }

    fn finish_close(&mut self) {
        self.state = MenuState::Closed;
        self.opacity = Transition::settled(0.0);
        self.close_remaining = Duration::ZERO;
        self.scroll_guard = None;
        tracing::debug!("action menu closed");
    }

    fn reposition(&mut self) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let height = self.panel_height();
        let (placement, position) = self.policy.place(&anchor, height, self.viewport.height);
        self.placement = placement;
        self.position = position;
    }

    /// Consume a close request made through the element context.
    pub fn take_close_request(&self) -> bool {
        self.context.take_close_request()
    }

    /// Context to hand to elements.
    #[must_use]
    pub const fn context(&self) -> &MenuContext {
        &self.context
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Opening or open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Opening | MenuState::Open)
    }

    /// Whether the panel is rendered at all.
    #[must_use]
    pub fn is_panel_mounted(&self) -> bool {
        self.state != MenuState::Closed
    }

    /// Whether this controller currently holds the scroll lock.
    #[must_use]
    pub const fn holds_scroll_lock(&self) -> bool {
        self.scroll_guard.is_some()
    }

    /// Height used for placement: measured if known, else the estimate.
    #[must_use]
    pub fn panel_height(&self) -> f32 {
        self.measured_height.unwrap_or(self.config.estimated_height)
    }

    /// Last measured height.
    #[must_use]
    pub const fn measured_height(&self) -> Option<f32> {
        self.measured_height
    }

    /// Side of the trigger.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Panel top-left corner.
    #[must_use]
    pub const fn position(&self) -> ComputedPosition {
        self.position
    }

    /// Panel rectangle for content of `height`.
    #[must_use]
    pub fn panel_bounds(&self, height: f32) -> Rect {
        Rect::new(
            self.position.left,
            self.position.top,
            self.config.panel_width,
            height,
        )
    }

    /// Reason of the most recent close.
    #[must_use]
    pub const fn last_close_reason(&self) -> Option<CloseReason> {
        self.last_close_reason
    }

    /// Panel opacity, 0.0 until measured.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    /// Panel scale, tied to opacity.
    #[must_use]
    pub fn scale(&self) -> f32 {
        (1.0 - ENTER_SCALE).mul_add(self.opacity(), ENTER_SCALE)
    }

    /// Vertical offset of the panel, tied to opacity.
    #[must_use]
    pub fn offset_y(&self) -> f32 {
        ENTER_OFFSET_Y * (1.0 - self.opacity())
    }
}
