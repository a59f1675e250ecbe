//! `ultima place`: where a menu panel opens for a given trigger.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use ultima_widgets::{ActionMenuConfig, AnchorRect, Placement, PlacementPolicy};

#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    /// Top edge of the trigger
    #[arg(long, allow_negative_numbers = true)]
    pub top: f32,

    /// Bottom edge of the trigger
    #[arg(long, allow_negative_numbers = true)]
    pub bottom: f32,

    /// Right edge of the trigger
    #[arg(long, allow_negative_numbers = true)]
    pub right: f32,

    /// Left edge of the trigger (default: right edge)
    #[arg(long, allow_negative_numbers = true)]
    pub left: Option<f32>,

    /// Viewport height
    #[arg(long)]
    pub viewport_height: f32,

    /// Panel height (default: the configured estimate)
    #[arg(long)]
    pub panel_height: Option<f32>,

    /// Menu configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementReport {
    pub placement: Placement,
    pub top: f32,
    pub left: f32,
    pub panel_height: f32,
}

pub fn run(args: &PlaceArgs) -> Result<PlacementReport> {
    let config = match &args.config {
        Some(path) => ActionMenuConfig::load(path)
            .with_context(|| format!("cannot use menu config {}", path.display()))?,
        None => ActionMenuConfig::default(),
    };

    if !(args.top.is_finite() && args.bottom.is_finite() && args.right.is_finite()) {
        bail!("trigger edges must be finite numbers");
    }
    if args.bottom < args.top {
        bail!(
            "trigger bottom ({}) is above its top ({})",
            args.bottom,
            args.top
        );
    }
    if !(args.viewport_height.is_finite() && args.viewport_height > 0.0) {
        bail!("viewport height must be positive, got {}", args.viewport_height);
    }
    let panel_height = args.panel_height.unwrap_or(config.estimated_height);
    if !(panel_height.is_finite() && panel_height > 0.0) {
        bail!("panel height must be positive, got {panel_height}");
    }

    let anchor = AnchorRect {
        top: args.top,
        left: args.left.unwrap_or(args.right),
        right: args.right,
        bottom: args.bottom,
        height: args.bottom - args.top,
    };
    let (placement, position) =
        PlacementPolicy::from(&config).place(&anchor, panel_height, args.viewport_height);

    Ok(PlacementReport {
        placement,
        top: position.top,
        left: position.left,
        panel_height,
    })
}
