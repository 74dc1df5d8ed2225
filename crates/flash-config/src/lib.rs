//! Paintflash configuration system
//!
//! This crate provides centralized configuration for the paint-flashing overlay,
//! loading settings from `paintflash.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "paintflash.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`FlashConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the overlay
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FlashConfig {
    /// Overlay appearance and startup behavior
    pub overlay: OverlayConfig,
    /// Key combination that toggles highlighting on and off
    pub toggle: ToggleConfig,
    /// Animation and scheduling timings
    pub timing: TimingConfig,
    /// Headless demo settings
    pub demo: DemoConfig,
}

/// Overlay appearance and startup behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Begin highlighting as soon as the overlay is installed
    pub start_immediately: bool,
    /// CSS color used for both the fill and the border of highlights
    pub color: String,
    /// Stacking order of the overlay surface
    pub z_index: i32,
    /// Marker attribute placed on the overlay surface so it can be found again
    pub canvas_identifier: String,
    /// Key under which the minted instance id is stashed on each component instance
    pub instance_identifier: String,
}

/// Toggle key combination. Modifiers left unset are not compared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToggleConfig {
    pub key: String,
    pub shift: Option<bool>,
    pub alt: Option<bool>,
    pub ctrl: Option<bool>,
    pub meta: Option<bool>,
}

/// Animation and scheduling timings, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Window over which a highlight ramps up before it is removed
    pub fade_duration_ms: f64,
    /// Opacity cap reached at the end of the fade window
    pub max_alpha: f32,
    /// Delay between two frames of the worker's render loop
    pub frame_interval_ms: u64,
    /// Quiet period after the last resize before the overlay is rebuilt
    pub resize_debounce_ms: u64,
    /// Border width of each highlight rectangle
    pub line_width: f32,
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated viewport width
    pub width: u32,
    /// Simulated viewport height
    pub height: u32,
    /// Number of host frames to simulate
    pub frames: u32,
    /// Save every Nth presented overlay frame as PNG (0 disables capture)
    pub capture_every: u32,
    /// Directory for captured frames
    pub output_dir: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            start_immediately: true,
            color: "green".to_string(),
            z_index: 9999,
            canvas_identifier: "vue3_rendering_canvas_identifier".to_string(),
            instance_identifier: "vue3_rendering_uuid_identifier".to_string(),
        }
    }
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            key: "T".to_string(),
            shift: Some(true),
            alt: None,
            ctrl: None,
            meta: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: 500.0,
            max_alpha: 0.25,
            frame_interval_ms: 16,
            resize_debounce_ms: 200,
            line_width: 1.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frames: 120,
            capture_every: 0,
            output_dir: None,
        }
    }
}

fn parse_bool(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl FlashConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `paintflash.toml` in the current directory
    /// or return default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE_NAME).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        // Overlay settings
        if let Ok(val) = std::env::var("FLASH_START_IMMEDIATELY") {
            self.overlay.start_immediately = parse_bool(&val);
        }
        if let Ok(color) = std::env::var("FLASH_COLOR") {
            self.overlay.color = color;
        }
        if let Ok(val) = std::env::var("FLASH_Z_INDEX") {
            if let Ok(z) = val.parse::<i32>() {
                self.overlay.z_index = z;
            }
        }

        // Toggle settings
        if let Ok(key) = std::env::var("FLASH_TOGGLE_KEY") {
            self.toggle.key = key;
        }

        // Timing settings
        if let Ok(val) = std::env::var("FLASH_FADE_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.timing.fade_duration_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FLASH_FRAME_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.timing.frame_interval_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FLASH_RESIZE_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.timing.resize_debounce_ms = ms;
            }
        }

        // Demo settings
        if let Ok(val) = std::env::var("FLASH_DEMO_FRAMES") {
            if let Ok(frames) = val.parse::<u32>() {
                self.demo.frames = frames;
            }
        }
        if let Ok(dir) = std::env::var("FLASH_DEMO_OUTPUT") {
            self.demo.output_dir = Some(PathBuf::from(dir));
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from paintflash.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FlashConfig::default();
        assert!(config.overlay.start_immediately);
        assert_eq!(config.overlay.color, "green");
        assert_eq!(config.overlay.z_index, 9999);
        assert_eq!(config.toggle.key, "T");
        assert_eq!(config.toggle.shift, Some(true));
        assert_eq!(config.toggle.ctrl, None);
        assert_eq!(config.timing.fade_duration_ms, 500.0);
        assert_eq!(config.timing.resize_debounce_ms, 200);
    }

    #[test]
    fn test_toml_serialization() {
        let config = FlashConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: FlashConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[overlay]\ncolor = \"blue\"\n\n[timing]\nframe_interval_ms = 8").unwrap();

        let config = FlashConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.overlay.color, "blue");
        assert!(config.overlay.start_immediately);
        assert_eq!(config.timing.frame_interval_ms, 8);
        assert_eq!(config.timing.fade_duration_ms, 500.0);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlashConfig::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[overlay]\nz_index = \"high\"").unwrap();

        let err = FlashConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("FLASH_COLOR", "#ff00ff");
            std::env::set_var("FLASH_START_IMMEDIATELY", "false");
            std::env::set_var("FLASH_FRAME_MS", "not-a-number");
        }

        let mut config = FlashConfig::default();
        config.merge_with_env();

        assert_eq!(config.overlay.color, "#ff00ff");
        assert!(!config.overlay.start_immediately);
        assert_eq!(config.timing.frame_interval_ms, 16);

        unsafe {
            std::env::remove_var("FLASH_COLOR");
            std::env::remove_var("FLASH_START_IMMEDIATELY");
            std::env::remove_var("FLASH_FRAME_MS");
        }
    }
}
