//! TOML-based configuration for the injection library.
//!
//! Reads and writes [`InjectionConfig`] at the platform-appropriate path:
//! - Windows:  `%APPDATA%\synput\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/synput/config.toml` (or `~/.config/synput/config.toml`)
//! - macOS:    `~/Library/Application Support/synput/config.toml`
//!
//! The file is strictly optional.  A missing file yields
//! [`InjectionConfig::default()`], which reproduces the library's stock
//! behavior: a 10 ms gap between composed press and release events and
//! `info`-level logging.  Hosts that want a different click cadence (or a
//! zero gap in test rigs) drop a file in place; nothing else changes.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so a partial
//! file such as
//!
//! ```toml
//! [timing]
//! press_release_delay_ms = 0
//! ```
//!
//! keeps the defaults for everything it does not mention.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level library configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InjectionConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Timing of composed press/release sequences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Milliseconds slept between the press and release halves of a composed
    /// click or key tap.  `0` disables the gap entirely.
    #[serde(default = "default_press_release_delay_ms")]
    pub press_release_delay_ms: u64,
}

/// Logging behavior when the library installs its own subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// `tracing` filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`,
    /// or `"trace"`.  Ignored when the embedding host already installed a
    /// global subscriber.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl TimingConfig {
    /// The press/release gap as a [`Duration`].
    pub fn press_release_delay(&self) -> Duration {
        Duration::from_millis(self.press_release_delay_ms)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_press_release_delay_ms() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            press_release_delay_ms: default_press_release_delay_ms(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads [`InjectionConfig`] from disk, returning the defaults if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<InjectionConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: InjectionConfig = toml::from_str(&content)?;
            debug!(path = %path.display(), "loaded injection config");
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(InjectionConfig::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to disk.
///
/// Creates the config directory and file if they do not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &InjectionConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    // Ensure directory exists before writing.
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the `synput`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("synput"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("synput"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/synput
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("synput")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_press_release_delay_is_ten_milliseconds() {
        // Arrange / Act
        let cfg = InjectionConfig::default();

        // Assert
        assert_eq!(cfg.timing.press_release_delay_ms, 10);
        assert_eq!(cfg.timing.press_release_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_default_log_level_is_info() {
        let cfg = InjectionConfig::default();
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn test_zero_delay_produces_zero_duration() {
        let timing = TimingConfig {
            press_release_delay_ms: 0,
        };
        assert!(timing.press_release_delay().is_zero());
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        // Arrange: an empty file is the common case for fresh installs
        let toml_str = "";

        // Act
        let cfg: InjectionConfig = toml::from_str(toml_str).expect("deserialize empty");

        // Assert
        assert_eq!(cfg, InjectionConfig::default());
    }

    #[test]
    fn test_deserialize_partial_timing_keeps_log_defaults() {
        // Arrange
        let toml_str = r#"
[timing]
press_release_delay_ms = 0
"#;

        // Act
        let cfg: InjectionConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.timing.press_release_delay_ms, 0);
        // Unspecified sections keep their defaults
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        // Arrange
        let bad_toml = "[[[ not valid toml";

        // Act
        let result: Result<InjectionConfig, toml::de::Error> = toml::from_str(bad_toml);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serializes_and_deserializes_round_trip() {
        // Arrange
        let cfg = InjectionConfig {
            timing: TimingConfig {
                press_release_delay_ms: 25,
            },
            log: LogConfig {
                level: "debug".to_string(),
            },
        };

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: InjectionConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    // ── File round-trip via temp directory ────────────────────────────────────

    #[test]
    fn test_write_and_read_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!(
            "synput_test_{}_{}",
            std::process::id(),
            line!()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let cfg = InjectionConfig {
            timing: TimingConfig {
                press_release_delay_ms: 3,
            },
            log: LogConfig {
                level: "trace".to_string(),
            },
        };

        // Act – serialize and write manually (mirrors save_config logic)
        let content = toml::to_string_pretty(&cfg).unwrap();
        std::fs::write(&path, &content).unwrap();
        let loaded: InjectionConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        // Assert
        assert_eq!(loaded.timing.press_release_delay_ms, 3);
        assert_eq!(loaded.log.level, "trace");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── config_dir path formation ─────────────────────────────────────────────

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        let path_result = config_file_path();
        if let Ok(path) = path_result {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir (e.g. in a stripped CI env) is also acceptable.
    }

    #[test]
    fn test_platform_config_dir_returns_some_on_this_platform() {
        let result = platform_config_dir();
        #[cfg(target_os = "windows")]
        if std::env::var_os("APPDATA").is_some() {
            assert!(result.is_some());
        }
        #[cfg(target_os = "linux")]
        {
            let has_xdg = std::env::var_os("XDG_CONFIG_HOME").is_some();
            let has_home = std::env::var_os("HOME").is_some();
            if has_xdg || has_home {
                assert!(result.is_some());
            }
        }
        #[cfg(target_os = "macos")]
        if std::env::var_os("HOME").is_some() {
            assert!(result.is_some());
        }
    }
}
