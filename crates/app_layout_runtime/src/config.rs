//! Layout constants and JSON overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal padding around the content area (24px each side).
pub const CONTENT_PADDING: f64 = 48.0;
/// Default minimum width reserved for main content.
pub const MIN_CONTENT_WIDTH: f64 = 280.0;
/// Default navigation width.
pub const NAVIGATION_WIDTH: f64 = 280.0;
/// Minimum width of any side drawer.
pub const MIN_DRAWER_SIZE: f64 = 290.0;
/// Default split panel size when docked on the side.
pub const SPLIT_PANEL_DEFAULT_SIDE_SIZE: f64 = 320.0;
/// Default split panel size when docked at the bottom.
pub const SPLIT_PANEL_DEFAULT_BOTTOM_SIZE: f64 = 240.0;
/// Width used for each scrollbar when computing the split panel hysteresis margin.
pub const SCROLLBAR_THICKNESS: f64 = 20.0;
/// Arrow-key resize step.
pub const KEYBOARD_SINGLE_STEP_SIZE: f64 = 10.0;

#[derive(Debug, Error, Clone, PartialEq)]
/// Configuration parsing and validation failures.
pub enum ConfigError {
    /// Input was not valid JSON for [`LayoutConfig`].
    #[error("invalid layout config: {0}")]
    Parse(String),
    /// A numeric field was negative or not finite.
    #[error("layout config field `{field}` must be a finite non-negative number, got {value}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Numeric layout constants. Missing JSON keys fall back to [`LayoutConfig::default`].
pub struct LayoutConfig {
    /// Width reserved for main content.
    pub min_content_width: f64,
    /// Horizontal content padding.
    pub content_padding: f64,
    /// Navigation width.
    pub navigation_width: f64,
    /// Minimum drawer size when a descriptor does not set one.
    pub min_drawer_size: f64,
    /// Drawer size when a descriptor does not set a default.
    pub default_drawer_size: f64,
    /// Minimum available width for a side split panel.
    pub split_panel_min_side_width: f64,
    /// Minimum height of a bottom drawer.
    pub min_bottom_drawer_size: f64,
    /// Initial height of a bottom drawer.
    pub default_bottom_drawer_size: f64,
    /// Minimum split panel width on the side.
    pub split_panel_min_side_size: f64,
    /// Minimum split panel height at the bottom.
    pub split_panel_min_bottom_size: f64,
    /// Initial split panel width on the side.
    pub split_panel_default_side_size: f64,
    /// Initial split panel height at the bottom.
    pub split_panel_default_bottom_size: f64,
    /// Scrollbar width; the forced-position margin is twice this value.
    pub scrollbar_thickness: f64,
    /// Arrow-key resize step.
    pub keyboard_step: f64,
    /// Content height that bottom panels always leave visible.
    pub min_visible_content_height: f64,
    /// Viewport widths below this are mobile.
    pub mobile_breakpoint: f64,
    /// Return focus to the element focused before a panel opened.
    pub restore_focus: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_content_width: MIN_CONTENT_WIDTH,
            content_padding: CONTENT_PADDING,
            navigation_width: NAVIGATION_WIDTH,
            min_drawer_size: MIN_DRAWER_SIZE,
            default_drawer_size: MIN_DRAWER_SIZE,
            min_bottom_drawer_size: 160.0,
            default_bottom_drawer_size: 240.0,
            split_panel_min_side_width: 280.0,
            split_panel_min_side_size: 280.0,
            split_panel_min_bottom_size: 160.0,
            split_panel_default_side_size: SPLIT_PANEL_DEFAULT_SIDE_SIZE,
            split_panel_default_bottom_size: SPLIT_PANEL_DEFAULT_BOTTOM_SIZE,
            scrollbar_thickness: SCROLLBAR_THICKNESS,
            keyboard_step: KEYBOARD_SINGLE_STEP_SIZE,
            min_visible_content_height: 40.0,
            mobile_breakpoint: 688.0,
            restore_focus: false,
        }
    }
}

impl LayoutConfig {
    /// Parses JSON overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the JSON is malformed or a value is out of range.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every numeric field is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("min_content_width", self.min_content_width),
            ("content_padding", self.content_padding),
            ("navigation_width", self.navigation_width),
            ("min_drawer_size", self.min_drawer_size),
            ("default_drawer_size", self.default_drawer_size),
            ("min_bottom_drawer_size", self.min_bottom_drawer_size),
            ("default_bottom_drawer_size", self.default_bottom_drawer_size),
            ("split_panel_min_side_width", self.split_panel_min_side_width),
            ("split_panel_min_side_size", self.split_panel_min_side_size),
            ("split_panel_min_bottom_size", self.split_panel_min_bottom_size),
            ("split_panel_default_side_size", self.split_panel_default_side_size),
            (
                "split_panel_default_bottom_size",
                self.split_panel_default_bottom_size,
            ),
            ("scrollbar_thickness", self.scrollbar_thickness),
            ("keyboard_step", self.keyboard_step),
            ("min_visible_content_height", self.min_visible_content_height),
            ("mobile_breakpoint", self.mobile_breakpoint),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    /// Hysteresis margin applied before a forced split panel returns to the side.
    pub fn split_panel_margin(&self) -> f64 {
        self.scrollbar_thickness * 2.0
    }
}
