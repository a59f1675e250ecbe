//! Viewport-aware placement of a floating panel next to its trigger.

use crate::config::ActionMenuConfig;
use serde::{Deserialize, Serialize};
use ultima_core::Rect;

/// Trigger bounds in viewport coordinates, captured when a menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    /// Top edge
    pub top: f32,
    /// Left edge
    pub left: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Height
    pub height: f32,
}

impl AnchorRect {
    /// Capture the bounds of a laid-out trigger.
    ///
    /// Zero-sized triggers still anchor a menu. Bounds with a NaN or
    /// infinite edge do not.
    #[must_use]
    pub fn from_bounds(bounds: Rect) -> Option<Self> {
        let edges = [bounds.x, bounds.y, bounds.width, bounds.height];
        if !edges.iter().all(|v| v.is_finite()) {
            return None;
        }
        Some(Self {
            top: bounds.y,
            left: bounds.x,
            right: bounds.right(),
            bottom: bounds.bottom(),
            height: bounds.height,
        })
    }

    /// The trigger rectangle this anchor was captured from.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::from_edges(self.left, self.top, self.right, self.bottom)
    }
}

/// Which side of the trigger the panel opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Below the trigger
    #[default]
    Below,
    /// Above the trigger
    Above,
}

/// Top-left corner of the panel in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputedPosition {
    /// Top edge
    pub top: f32,
    /// Left edge
    pub left: f32,
}

/// Geometry rules that decide where a panel goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPolicy {
    /// Panel width
    pub panel_width: f32,
    /// Distance from the trigger
    pub gap: f32,
    /// Room required below the panel before flipping
    pub viewport_margin: f32,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::from(&ActionMenuConfig::default())
    }
}

impl From<&ActionMenuConfig> for PlacementPolicy {
    fn from(config: &ActionMenuConfig) -> Self {
        Self {
            panel_width: config.panel_width,
            gap: config.gap,
            viewport_margin: config.viewport_margin,
        }
    }
}

impl PlacementPolicy {
    /// Side the panel opens on for a panel of `height`.
    #[must_use]
    pub fn side(&self, anchor: &AnchorRect, height: f32, viewport_height: f32) -> Placement {
        let space_below = viewport_height - anchor.bottom;
        if space_below < height + self.viewport_margin {
            Placement::Above
        } else {
            Placement::Below
        }
    }

    /// Place a panel of `height` next to `anchor`.
    ///
    /// The right edges of panel and trigger line up. Nothing clamps the
    /// result to the viewport; a panel taller than the space above its
    /// trigger gets a negative `top`.
    #[must_use]
    pub fn place(
        &self,
        anchor: &AnchorRect,
        height: f32,
        viewport_height: f32,
    ) -> (Placement, ComputedPosition) {
        let placement = self.side(anchor, height, viewport_height);
        let top = match placement {
            Placement::Below => anchor.bottom + self.gap,
            Placement::Above => anchor.top - height - self.gap,
        };
        let position = ComputedPosition {
            top,
            left: anchor.right - self.panel_width,
        };
        tracing::trace!(?placement, top, left = position.left, height, "placed panel");
        (placement, position)
    }
}
