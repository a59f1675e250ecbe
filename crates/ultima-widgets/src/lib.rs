//! Action menu widgets for the Última Milla backoffice.
//!
//! The centerpiece is [`ActionMenu`]: a trigger button whose floating panel
//! of [`ActionMenuItem`]s is painted in the overlay layer, placed below or
//! above the trigger depending on the room left in the viewport, and holds
//! the document [`ultima_core::ScrollLock`] while it is shown.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::suboptimal_flops)]

pub mod action_menu;
pub mod column;
pub mod config;
pub mod error;
pub mod menu_controller;
pub mod menu_item;
pub mod placement;
pub mod theme;

pub use action_menu::{
    ActionMenu, ActionMenuClosed, ActionMenuItemActivated, ActionMenuOpened, PANEL_PADDING,
};
pub use column::{Column, CrossAxisAlignment};
pub use config::ActionMenuConfig;
pub use error::{MenuError, MenuResult};
pub use menu_controller::{CloseReason, MenuController, MenuState};
pub use menu_item::{
    ActionMenuDivider, ActionMenuHeader, ActionMenuItem, ItemVariant, MenuContext, MenuElement,
    DIVIDER_HEIGHT, HEADER_HEIGHT, ITEM_HEIGHT,
};
pub use placement::{AnchorRect, ComputedPosition, Placement, PlacementPolicy};
pub use theme::MenuPalette;
