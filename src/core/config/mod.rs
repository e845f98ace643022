//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Command flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$SHIPSORT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/shipsort/config.toml`
//! 3. `~/.shipsort/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use shipsort::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("grid width: {}", config.items_per_row());
//! println!("skip tokens: {:?}", config.skip_tokens());
//! ```

pub mod schema;

pub use schema::{ConfigFile, SkipMatch, SorterConfig, StoresConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use glam::Vec3;
use thiserror::Error;

use crate::core::naming;

/// Default skip list, matching what players expect out of the box.
pub const DEFAULT_SKIPPED_ITEMS: &str = "body, clipboard, sticky_note, boombox";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents
    pub file: ConfigFile,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Build a config from already-parsed file contents.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self { file, path: None })
    }

    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    /// A missing config file is not an error (defaults are used).
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// A missing file yields defaults but remembers the path, so a later
    /// [`Config::save`] creates it there.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self {
                file: ConfigFile::default(),
                path: Some(path.to_path_buf()),
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in the search order.
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $SHIPSORT_CONFIG
        if let Ok(path) = std::env::var("SHIPSORT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/shipsort/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("shipsort/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.shipsort/config.toml
        let path = dirs::home_dir()?.join(".shipsort/config.toml");
        path.exists().then_some(path)
    }

    /// Get the canonical config path, `~/.shipsort/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".shipsort/config.toml"))
    }

    /// Path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the config back atomically.
    ///
    /// Writes to the path it was loaded from, or the canonical path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => Self::canonical_path()?,
        };
        write_config_atomic(&path, &self.file)?;
        Ok(path)
    }

    fn sorter(&self) -> Option<&SorterConfig> {
        self.file.sorter.as_ref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Ship-local grid origin.
    ///
    /// Defaults to `(-2.8, 0.5, -4.8)`.
    pub fn origin(&self) -> Vec3 {
        self.sorter()
            .and_then(|s| s.origin)
            .map(Vec3::from_array)
            .unwrap_or(Vec3::new(-2.8, 0.5, -4.8))
    }

    /// Horizontal spacing between piles. Defaults to `1.0`.
    pub fn item_spacing(&self) -> f32 {
        self.sorter().and_then(|s| s.item_spacing).unwrap_or(1.0)
    }

    /// Vertical spacing between grid layers. Defaults to `0.8`.
    pub fn row_spacing(&self) -> f32 {
        self.sorter().and_then(|s| s.row_spacing).unwrap_or(0.8)
    }

    /// Grid width. Defaults to `7`, never less than 1.
    pub fn items_per_row(&self) -> usize {
        self.sorter()
            .and_then(|s| s.items_per_row)
            .unwrap_or(7)
            .max(1) as usize
    }

    /// Raw skip list as written in the file.
    pub fn skipped_items(&self) -> &str {
        self.sorter()
            .and_then(|s| s.skipped_items.as_deref())
            .unwrap_or(DEFAULT_SKIPPED_ITEMS)
    }

    /// Normalized, de-duplicated skip tokens in file order.
    ///
    /// Blank tokens are dropped; an empty token would otherwise match
    /// every key under substring matching.
    pub fn skip_tokens(&self) -> Vec<String> {
        parse_skip_tokens(self.skipped_items())
    }

    /// Replace the skip list.
    pub fn set_skip_tokens(&mut self, tokens: &[String]) {
        let sorter = self.file.sorter.get_or_insert_with(SorterConfig::default);
        sorter.skipped_items = Some(tokens.join(", "));
    }

    /// Skip token comparison. Defaults to substring matching.
    pub fn skip_match(&self) -> SkipMatch {
        self.sorter().and_then(|s| s.skip_match).unwrap_or_default()
    }

    /// Whether same-type items share one X/Z. Defaults to `true`.
    pub fn stack_same_type_together(&self) -> bool {
        self.sorter()
            .and_then(|s| s.stack_same_type_together)
            .unwrap_or(true)
    }

    /// Vertical step between stacked items, clamped to `>= 0`.
    pub fn same_type_stack_step_y(&self) -> f32 {
        self.sorter()
            .and_then(|s| s.same_type_stack_step_y)
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Distance under which an item counts as placed. Defaults to `0.25`.
    pub fn placement_tolerance(&self) -> f32 {
        self.sorter()
            .and_then(|s| s.placement_tolerance)
            .unwrap_or(0.25)
    }

    /// Retry ceiling for manipulability waits. Defaults to `15` frames.
    pub fn wait_frames(&self) -> u32 {
        self.sorter().and_then(|s| s.wait_frames).unwrap_or(15).max(1)
    }

    /// Location of the saved positions file.
    pub fn positions_path(&self) -> Result<PathBuf, ConfigError> {
        let configured = self.file.stores.as_ref().and_then(|s| s.positions.as_deref());
        self.store_path(configured, "positions.json")
    }

    /// Location of the bindings file.
    pub fn bindings_path(&self) -> Result<PathBuf, ConfigError> {
        let configured = self.file.stores.as_ref().and_then(|s| s.bindings.as_deref());
        self.store_path(configured, "bindings.json")
    }

    fn store_path(&self, configured: Option<&str>, default_name: &str) -> Result<PathBuf, ConfigError> {
        let base = match self.path.as_deref().and_then(Path::parent) {
            Some(dir) => dir.to_path_buf(),
            None => Self::canonical_path()?
                .parent()
                .map(Path::to_path_buf)
                .ok_or(ConfigError::NoHomeDir)?,
        };
        Ok(match configured {
            Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
            Some(p) => base.join(p),
            None => base.join(default_name),
        })
    }
}

/// Split a comma-separated skip list into normalized tokens.
pub fn parse_skip_tokens(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in raw.split(',').map(naming::normalize) {
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Write a config file atomically.
fn write_config_atomic<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    // Write to temp file in same directory (for atomic rename)
    let temp_path = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(contents.as_bytes())
        .map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

    file.sync_all().map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_shipped_layout() {
        let config = Config::default();
        assert_eq!(config.origin(), Vec3::new(-2.8, 0.5, -4.8));
        assert_eq!(config.item_spacing(), 1.0);
        assert_eq!(config.row_spacing(), 0.8);
        assert_eq!(config.items_per_row(), 7);
        assert_eq!(
            config.skip_tokens(),
            vec!["body", "clipboard", "sticky_note", "boombox"]
        );
        assert_eq!(config.skip_match(), SkipMatch::Substring);
        assert!(config.stack_same_type_together());
        assert_eq!(config.same_type_stack_step_y(), 0.0);
        assert_eq!(config.placement_tolerance(), 0.25);
        assert_eq!(config.wait_frames(), 15);
    }

    #[test]
    fn skip_tokens_are_normalized_and_deduplicated() {
        assert_eq!(
            parse_skip_tokens(" Sticky Note, ,KEY, key,열쇠,"),
            vec!["sticky_note", "key"]
        );
        assert!(parse_skip_tokens("").is_empty());
    }

    #[test]
    fn negative_step_is_clamped() {
        let config = Config::from_file(ConfigFile {
            sorter: Some(SorterConfig {
                same_type_stack_step_y: Some(-1.0),
                ..Default::default()
            }),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.same_type_stack_step_y(), 0.0);
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [sorter]
            items_per_row = 3
            skipped_items = "key"
            stack_same_type_together = false
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.items_per_row(), 3);
        assert_eq!(config.skip_tokens(), vec!["key"]);
        assert!(!config.stack_same_type_together());
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn missing_file_yields_defaults_and_remembers_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.items_per_row(), 7);
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[sorter]\nitems_per_row = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[sorter\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn save_roundtrips_skip_tokens() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sub/config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.set_skip_tokens(&["body".to_string(), "shovel".to_string()]);
        let written = config.save().unwrap();
        assert_eq!(written, path);
        assert!(!path.with_extension("toml.tmp").exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.skip_tokens(), vec!["body", "shovel"]);
    }

    #[test]
    fn store_paths_resolve_next_to_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[stores]\npositions = \"custom/pos.json\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.positions_path().unwrap(),
            temp.path().join("custom/pos.json")
        );
        assert_eq!(
            config.bindings_path().unwrap(),
            temp.path().join("bindings.json")
        );
    }
}
