//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Config File
//!
//! Located at (in order of precedence):
//! 1. `$SHIPSORT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/shipsort/config.toml`
//! 3. `~/.shipsort/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing: spacings must be finite and
//! positive, the grid needs at least one column, and waits need at least
//! one frame.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// [sorter]
/// origin = [-2.8, 0.5, -4.8]
/// items_per_row = 7
/// skipped_items = "body, clipboard, sticky_note, boombox"
/// skip_match = "substring"
///
/// [stores]
/// positions = "/home/me/.shipsort/positions.json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Layout and behavior of the sorter
    pub sorter: Option<SorterConfig>,

    /// Locations of the JSON stores
    pub stores: Option<StoresConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sorter) = &self.sorter {
            sorter.validate()?;
        }
        Ok(())
    }
}

/// How configured skip tokens are compared against type keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipMatch {
    /// Token anywhere inside the key (`"key"` also skips `"monkey"`).
    #[default]
    Substring,
    /// Token must equal the key.
    Exact,
}

/// Sorter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SorterConfig {
    /// Ship-local origin of the grid
    pub origin: Option<[f32; 3]>,

    /// Horizontal distance between piles
    pub item_spacing: Option<f32>,

    /// Vertical distance between grid layers
    pub row_spacing: Option<f32>,

    /// Grid width (also the side of the spread sub-grid)
    pub items_per_row: Option<u32>,

    /// Comma-separated skip tokens
    pub skipped_items: Option<String>,

    /// Skip token comparison
    pub skip_match: Option<SkipMatch>,

    /// Stack same-type items at one X/Z instead of spreading them
    pub stack_same_type_together: Option<bool>,

    /// Vertical step between stacked items
    pub same_type_stack_step_y: Option<f32>,

    /// Distance under which an item counts as already placed
    pub placement_tolerance: Option<f32>,

    /// Retry ceiling for manipulability waits, in frames
    pub wait_frames: Option<u32>,
}

impl SorterConfig {
    /// Validate the sorter values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(origin) = self.origin {
            if origin.iter().any(|v| !v.is_finite()) {
                return Err(ConfigError::InvalidValue(
                    "origin must contain finite numbers".to_string(),
                ));
            }
        }

        for (name, value) in [
            ("item_spacing", self.item_spacing),
            ("row_spacing", self.row_spacing),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} must be a positive number, got {}",
                        name, v
                    )));
                }
            }
        }

        if self.items_per_row == Some(0) {
            return Err(ConfigError::InvalidValue(
                "items_per_row must be at least 1".to_string(),
            ));
        }

        if let Some(step) = self.same_type_stack_step_y {
            if !step.is_finite() {
                return Err(ConfigError::InvalidValue(
                    "same_type_stack_step_y must be finite".to_string(),
                ));
            }
        }

        if let Some(tolerance) = self.placement_tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "placement_tolerance must be >= 0, got {}",
                    tolerance
                )));
            }
        }

        if self.wait_frames == Some(0) {
            return Err(ConfigError::InvalidValue(
                "wait_frames must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Store file locations. Relative paths resolve against the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoresConfig {
    /// Saved per-type positions
    pub positions: Option<String>,

    /// Numeric shortcuts and text aliases
    pub bindings: Option<String>,
}
