//! Action menu configuration.
//!
//! Defaults reproduce the backoffice look: a 192px wide panel opening 8px
//! away from its trigger, flipping above it when less than the panel height
//! plus a 16px margin is left below.
//!
//! ```toml
//! panel_width = 192.0
//! gap = 8.0
//! viewport_margin = 16.0
//! estimated_height = 300.0
//! enter_duration_ms = 250
//! close_duration_ms = 200
//! backdrop = true
//! lock_scroll = true
//! ```

use crate::error::{MenuError, MenuResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for [`crate::ActionMenu`] and [`crate::MenuController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionMenuConfig {
    /// Fixed panel width
    pub panel_width: f32,
    /// Distance between trigger edge and panel
    pub gap: f32,
    /// Extra room required below the trigger before flipping upwards
    pub viewport_margin: f32,
    /// Panel height assumed before it has been measured
    pub estimated_height: f32,
    /// Fade/scale-in duration once the panel is measured
    pub enter_duration_ms: u64,
    /// Delay between a close request and unmounting the panel
    pub close_duration_ms: u64,
    /// Paint a translucent backdrop under the panel
    pub backdrop: bool,
    /// Hold the document scroll lock while the panel is mounted
    pub lock_scroll: bool,
}

impl Default for ActionMenuConfig {
    fn default() -> Self {
        Self {
            panel_width: 192.0,
            gap: 8.0,
            viewport_margin: 16.0,
            estimated_height: 300.0,
            enter_duration_ms: 250,
            close_duration_ms: 200,
            backdrop: true,
            lock_scroll: true,
        }
    }
}

impl ActionMenuConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> MenuResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> MenuResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| MenuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded action menu config");
        Ok(config)
    }

    /// Reject geometry that would make placement meaningless.
    pub fn validate(&self) -> MenuResult<()> {
        positive("panel_width", self.panel_width)?;
        positive("estimated_height", self.estimated_height)?;
        non_negative("gap", self.gap)?;
        non_negative("viewport_margin", self.viewport_margin)?;
        Ok(())
    }

    /// Fade-in duration.
    #[must_use]
    pub const fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_duration_ms)
    }

    /// Close delay.
    #[must_use]
    pub const fn close_duration(&self) -> Duration {
        Duration::from_millis(self.close_duration_ms)
    }
}

fn positive(field: &'static str, value: f32) -> MenuResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MenuError::InvalidValue {
            field,
            message: format!("must be finite and positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> MenuResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MenuError::InvalidValue {
            field,
            message: format!("must be finite and non-negative, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_backoffice() {
        let config = ActionMenuConfig::default();
        assert_eq!(config.panel_width, 192.0);
        assert_eq!(config.gap, 8.0);
        assert_eq!(config.viewport_margin, 16.0);
        assert_eq!(config.estimated_height, 300.0);
        assert_eq!(config.close_duration(), Duration::from_millis(200));
        assert_eq!(config.enter_duration(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ActionMenuConfig::from_toml_str("gap = 4.0\nbackdrop = false\n").unwrap();
        assert_eq!(config.gap, 4.0);
        assert!(!config.backdrop);
        assert_eq!(config.panel_width, 192.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ActionMenuConfig::from_toml_str("").unwrap();
        assert_eq!(config, ActionMenuConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ActionMenuConfig::from_toml_str("gapp = 4.0").unwrap_err();
        assert!(matches!(err, MenuError::Toml(_)));
    }

    #[test]
    fn test_negative_gap_rejected() {
        let err = ActionMenuConfig::from_toml_str("gap = -1.0").unwrap_err();
        assert!(matches!(err, MenuError::InvalidValue { field: "gap", .. }));
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = ActionMenuConfig {
            panel_width: 0.0,
            ..ActionMenuConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MenuError::InvalidValue {
                field: "panel_width",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_estimate_rejected() {
        let config = ActionMenuConfig {
            estimated_height: f32::NAN,
            ..ActionMenuConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ActionMenuConfig::load("/nonexistent/ultima/menu.toml").unwrap_err();
        assert!(matches!(err, MenuError::Io { .. }));
    }
}
