use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::autoscroll::DEFAULT_BOTTOM_TOLERANCE;

const CONFIG_DIR_NAME: &str = "logview";
const CONFIG_FILE_NAME: &str = "config.toml";
const CURRENT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
pub const DEFAULT_WINDOW_TITLE: &str = "Log Viewer";
const MAX_BOTTOM_TOLERANCE: f32 = 64.0;
const MAX_DEMO_PRODUCERS: usize = 64;
const MIN_DEMO_INTERVAL_MS: u64 = 1;

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No persisted configuration was found or usable; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Errors that can occur when persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML serialization error: {0}")]
    Ser(#[from] toml::ser::Error),
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "FileConfig::schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub viewer: ViewerPreferences,
    #[serde(default)]
    pub window: WindowPreferences,
    #[serde(default)]
    pub demo: DemoPreferences,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            viewer: ViewerPreferences::default(),
            window: WindowPreferences::default(),
            demo: DemoPreferences::default(),
        }
    }
}

impl FileConfig {
    const fn schema_version() -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPreferences {
    /// chrono format string for the timestamp column.
    pub timestamp_format: String,
    /// How close to the bottom (logical px) still counts as "at the bottom".
    pub bottom_tolerance: f32,
    pub monospace: bool,
    pub show_severity: bool,
    /// Mirror this process's own `tracing` events into the viewer.
    pub mirror_tracing: bool,
}

impl Default for ViewerPreferences {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            bottom_tolerance: DEFAULT_BOTTOM_TOLERANCE,
            monospace: true,
            show_severity: true,
            mirror_tracing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPreferences {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowPreferences {
    fn default() -> Self {
        Self {
            title: DEFAULT_WINDOW_TITLE.to_string(),
            width: 1024.0,
            height: 640.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoPreferences {
    /// Number of concurrent simulated producers.
    pub producers: usize,
    /// Delay between lines of one producer.
    pub interval_ms: u64,
}

impl Default for DemoPreferences {
    fn default() -> Self {
        Self {
            producers: 2,
            interval_ms: 250,
        }
    }
}

/// Root directory for logview configuration and logs.
pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path to `config.toml`.
pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Load the configuration from the default location, falling back to defaults.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

/// Load the configuration from `path`. Never fails: unreadable or invalid files produce a
/// warning and the defaults.
pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(cfg) => {
                    let (cfg, mut sanitize_warnings) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source: ConfigSource::File,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        path.display(),
                        err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    path.display(),
                    err
                ));
            }
        }
    }

    ConfigLoadResult {
        config: FileConfig::default(),
        warnings,
        source: ConfigSource::Default,
    }
}

/// Persist the configuration to `path`, creating parent directories.
pub fn save_config_to(config: &FileConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

/// Clamp out-of-range values, returning the fixed config and a warning per fix.
pub fn sanitize_config(mut config: FileConfig) -> (FileConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if config.schema_version != CURRENT_SCHEMA_VERSION {
        warnings.push(format!(
            "Unknown schema_version {}; treating as {}.",
            config.schema_version, CURRENT_SCHEMA_VERSION
        ));
        config.schema_version = CURRENT_SCHEMA_VERSION;
    }

    let viewer = &mut config.viewer;
    if viewer.timestamp_format.trim().is_empty() {
        warnings.push("viewer.timestamp_format is empty; using the default.".to_string());
        viewer.timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
    }
    if !viewer.bottom_tolerance.is_finite()
        || !(0.0..=MAX_BOTTOM_TOLERANCE).contains(&viewer.bottom_tolerance)
    {
        warnings.push(format!(
            "viewer.bottom_tolerance {} is out of range; using {}.",
            viewer.bottom_tolerance, DEFAULT_BOTTOM_TOLERANCE
        ));
        viewer.bottom_tolerance = DEFAULT_BOTTOM_TOLERANCE;
    }

    let window = &mut config.window;
    let defaults = WindowPreferences::default();
    if window.title.trim().is_empty() {
        window.title = defaults.title;
    }
    if !(window.width.is_finite() && window.width >= 320.0) {
        warnings.push(format!("window.width {} is too small.", window.width));
        window.width = defaults.width;
    }
    if !(window.height.is_finite() && window.height >= 200.0) {
        warnings.push(format!("window.height {} is too small.", window.height));
        window.height = defaults.height;
    }

    let demo = &mut config.demo;
    if demo.producers > MAX_DEMO_PRODUCERS {
        warnings.push(format!(
            "demo.producers {} exceeds {}; clamping.",
            demo.producers, MAX_DEMO_PRODUCERS
        ));
        demo.producers = MAX_DEMO_PRODUCERS;
    }
    if demo.interval_ms < MIN_DEMO_INTERVAL_MS {
        warnings.push("demo.interval_ms must be at least 1; clamping.".to_string());
        demo.interval_ms = MIN_DEMO_INTERVAL_MS;
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let result = load_config_from(&temp.path().join("absent.toml"));
        assert_eq!(result.source, ConfigSource::Default);
        assert!(result.warnings.is_empty());
        assert_eq!(result.config, FileConfig::default());
    }

    #[test]
    fn default_bottom_tolerance_requires_exact_bottom() {
        assert_eq!(ViewerPreferences::default().bottom_tolerance, 0.0);
        let (sanitized, warnings) = sanitize_config(FileConfig::default());
        assert_eq!(sanitized.viewer.bottom_tolerance, 0.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn invalid_toml_falls_back_with_warning() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "viewer = [not toml").expect("write");

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::Default);
        assert!(result.warnings.iter().any(|w| w.contains("Failed to parse")));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[viewer]\nmonospace = false\n").expect("write");

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::File);
        assert!(!result.config.viewer.monospace);
        assert_eq!(result.config.viewer.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(result.config.demo, DemoPreferences::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let mut config = FileConfig::default();
        config.window.title = "Nightly build".to_string();
        config.demo.producers = 4;

        save_config_to(&config, &path).expect("save");
        let loaded = load_config_from(&path);
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut config = FileConfig::default();
        config.viewer.bottom_tolerance = -1.0;
        config.viewer.timestamp_format = "  ".to_string();
        config.demo.producers = 1000;
        config.demo.interval_ms = 0;

        let (sanitized, warnings) = sanitize_config(config);
        assert_eq!(sanitized.viewer.bottom_tolerance, DEFAULT_BOTTOM_TOLERANCE);
        assert_eq!(sanitized.viewer.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(sanitized.demo.producers, MAX_DEMO_PRODUCERS);
        assert_eq!(sanitized.demo.interval_ms, MIN_DEMO_INTERVAL_MS);
        assert_eq!(warnings.len(), 4);
    }
}
