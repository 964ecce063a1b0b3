use crate::client::{parse_base_url, DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{GordaError, Result};
use crate::format::{is_valid_clock_format, TimeFormat, DEFAULT_CLOCK_FORMAT};
use crate::reconcile::ReconcileMode;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "gorda";

/// The filename for the configuration file.
const CONFIG_FILENAME: &str = "config.toml";

/// Smallest window dimension accepted from the config file, in pixels.
const MIN_WINDOW_DIMENSION: f32 = 200.0;

// ============================================================================
// Configuration
// ============================================================================

/// User configuration for the tracker client.
///
/// Every field has a default, so a partial (or empty) config file is valid.
///
/// # Example
///
/// ```toml
/// backend_url = "http://localhost:8090"
/// refresh_interval_secs = 5
/// clock_format = "%H:%M"
/// reconcile = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the tracking backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Seconds between automatic refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Seconds before a backend request is abandoned.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// strftime layout for start/end times.
    #[serde(default = "default_clock_format")]
    pub clock_format: String,

    /// How the history list follows the backend.
    #[serde(default)]
    pub reconcile: ReconcileMode,

    /// Main window title.
    #[serde(default = "default_window_title")]
    pub window_title: String,

    /// Initial window width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Initial window height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: f32,

    /// Smallest width the window can be resized to.
    #[serde(default = "default_min_window_width")]
    pub min_window_width: f32,

    /// Smallest height the window can be resized to.
    #[serde(default = "default_min_window_height")]
    pub min_window_height: f32,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

fn default_clock_format() -> String {
    DEFAULT_CLOCK_FORMAT.to_string()
}

fn default_window_title() -> String {
    "gorda".to_string()
}

fn default_window_width() -> f32 {
    560.0
}

fn default_window_height() -> f32 {
    440.0
}

fn default_min_window_width() -> f32 {
    360.0
}

fn default_min_window_height() -> f32 {
    240.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            clock_format: default_clock_format(),
            reconcile: ReconcileMode::default(),
            window_title: default_window_title(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            min_window_width: default_min_window_width(),
            min_window_height: default_min_window_height(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Clock rendering in the local time zone.
    pub fn time_format(&self) -> TimeFormat {
        TimeFormat::local(self.clock_format.clone())
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(url) = &overrides.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(secs) = overrides.refresh_interval_secs {
            self.refresh_interval_secs = secs;
        }
        self
    }
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub refresh_interval_secs: Option<u64>,
}

// ============================================================================
// Config Validation
// ============================================================================

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidBackendUrl(String),
    ZeroRefreshInterval,
    ZeroRequestTimeout,
    InvalidClockFormat(String),
    WindowTooSmall { width: f32, height: f32 },
    MinimumExceedsWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBackendUrl(url) => {
                write!(f, "`backend_url` is not an http(s) URL: {}", url)
            }
            ConfigError::ZeroRefreshInterval => {
                write!(f, "`refresh_interval_secs` must be at least 1")
            }
            ConfigError::ZeroRequestTimeout => {
                write!(f, "`request_timeout_secs` must be at least 1")
            }
            ConfigError::InvalidClockFormat(layout) => {
                write!(f, "`clock_format` is not a valid strftime layout: {:?}", layout)
            }
            ConfigError::WindowTooSmall { width, height } => write!(
                f,
                "window size {}x{} is below the {}px minimum",
                width, height, MIN_WINDOW_DIMENSION
            ),
            ConfigError::MinimumExceedsWindow => write!(
                f,
                "`min_window_width`/`min_window_height` must not exceed the window size"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for GordaError {
    fn from(err: ConfigError) -> Self {
        GordaError::Config(err.to_string())
    }
}

/// Check a configuration before it is used.
///
/// # Example
///
/// ```
/// use gorda::config::{validate_config, Config};
///
/// assert!(validate_config(&Config::default()).is_ok());
///
/// let never = Config {
///     refresh_interval_secs: 0,
///     ..Default::default()
/// };
/// assert!(validate_config(&never).is_err());
/// ```
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    if parse_base_url(&config.backend_url).is_err() {
        return Err(ConfigError::InvalidBackendUrl(config.backend_url.clone()));
    }
    if config.refresh_interval_secs == 0 {
        return Err(ConfigError::ZeroRefreshInterval);
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::ZeroRequestTimeout);
    }
    if !is_valid_clock_format(&config.clock_format) {
        return Err(ConfigError::InvalidClockFormat(config.clock_format.clone()));
    }
    if config.window_width < MIN_WINDOW_DIMENSION || config.window_height < MIN_WINDOW_DIMENSION {
        return Err(ConfigError::WindowTooSmall {
            width: config.window_width,
            height: config.window_height,
        });
    }
    if config.min_window_width < MIN_WINDOW_DIMENSION
        || config.min_window_height < MIN_WINDOW_DIMENSION
    {
        return Err(ConfigError::WindowTooSmall {
            width: config.min_window_width,
            height: config.min_window_height,
        });
    }
    if config.min_window_width > config.window_width
        || config.min_window_height > config.window_height
    {
        return Err(ConfigError::MinimumExceedsWindow);
    }
    Ok(())
}

// ============================================================================
// Config File Management
// ============================================================================

/// Keys accepted by `gorda config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "backend_url",
    "refresh_interval_secs",
    "request_timeout_secs",
    "clock_format",
    "reconcile",
    "window_title",
    "window_width",
    "window_height",
    "min_window_width",
    "min_window_height",
];

/// Get the gorda config directory path (~/.config/gorda/).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GordaError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (~/.config/gorda/config.toml).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load `~/.config/gorda/config.toml`, creating it with defaults if missing.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Load a config file, creating it with commented defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or is not valid TOML.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config = Config::default();
        fs::write(path, generate_config_with_comments(&config))?;
        tracing::info!(event = "config.created", path = %path.display());
        return Ok(config);
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        GordaError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            path, e
        ))
    })
}

/// Save to `~/.config/gorda/config.toml`.
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(&config_path()?, config)
}

/// Write a config file with explanatory comments, replacing any existing file.
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, generate_config_with_comments(config))?;
    Ok(())
}

/// Set one key from its string form, validating the result.
///
/// # Errors
///
/// Returns `GordaError::Config` for unknown keys, unparsable values, or a
/// value that makes the configuration invalid.
pub fn set_config_value(config: &Config, key: &str, value: &str) -> Result<Config> {
    let mut updated = config.clone();
    let invalid = |expected: &str| {
        GordaError::Config(format!(
            "Invalid value for `{}`: {:?} (expected {})",
            key, value, expected
        ))
    };

    match key {
        "backend_url" => updated.backend_url = value.trim().to_string(),
        "refresh_interval_secs" => {
            updated.refresh_interval_secs = value.trim().parse().map_err(|_| invalid("seconds"))?
        }
        "request_timeout_secs" => {
            updated.request_timeout_secs = value.trim().parse().map_err(|_| invalid("seconds"))?
        }
        "clock_format" => updated.clock_format = value.to_string(),
        "reconcile" => {
            updated.reconcile = value.parse().map_err(|_| invalid("auto or rebuild"))?
        }
        "window_title" => updated.window_title = value.to_string(),
        "window_width" => {
            updated.window_width = value.trim().parse().map_err(|_| invalid("pixels"))?
        }
        "window_height" => {
            updated.window_height = value.trim().parse().map_err(|_| invalid("pixels"))?
        }
        "min_window_width" => {
            updated.min_window_width = value.trim().parse().map_err(|_| invalid("pixels"))?
        }
        "min_window_height" => {
            updated.min_window_height = value.trim().parse().map_err(|_| invalid("pixels"))?
        }
        _ => {
            return Err(GordaError::Config(format!(
                "Unknown config key `{}`. Valid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            )))
        }
    }

    validate_config(&updated)?;
    Ok(updated)
}

/// Generate config file content with explanatory comments.
fn generate_config_with_comments(config: &Config) -> String {
    format!(
        r#"# Gorda Configuration

# Base URL of the tracking backend.
backend_url = {}

# Seconds between automatic refreshes of the active session and history.
refresh_interval_secs = {}

# Seconds before a backend request is abandoned.
request_timeout_secs = {}

# strftime layout for start and end times (e.g. "%H:%M", "%I:%M %p").
clock_format = {}

# History list updates:
# - "auto": match rows by session id, rebuild when ids are missing
# - "rebuild": always rebuild the whole list
reconcile = "{}"

# Main window
window_title = {}
window_width = {:.1}
window_height = {:.1}
min_window_width = {:.1}
min_window_height = {:.1}
"#,
        toml_string(&config.backend_url),
        config.refresh_interval_secs,
        config.request_timeout_secs,
        toml_string(&config.clock_format),
        config.reconcile.as_str(),
        toml_string(&config.window_title),
        config.window_width,
        config.window_height,
        config.min_window_width,
        config.min_window_height,
    )
}

/// Quote a string as a TOML basic string.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ========================================================================
    // Defaults and validation
    // ========================================================================

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8090");
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.reconcile, ReconcileMode::Auto);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("refresh_interval_secs = 30").unwrap();
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.clock_format, "%H:%M");
        assert_eq!(config.window_title, "gorda");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            Config {
                backend_url: "localhost".to_string(),
                ..Default::default()
            },
            Config {
                refresh_interval_secs: 0,
                ..Default::default()
            },
            Config {
                request_timeout_secs: 0,
                ..Default::default()
            },
            Config {
                clock_format: "%Q".to_string(),
                ..Default::default()
            },
            Config {
                window_width: 10.0,
                ..Default::default()
            },
            Config {
                min_window_width: 50.0,
                ..Default::default()
            },
            Config {
                min_window_height: 500.0,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(validate_config(&config).is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default().with_overrides(&ConfigOverrides {
            backend_url: Some("http://127.0.0.1:9000".to_string()),
            refresh_interval_secs: None,
        });
        assert_eq!(config.backend_url, "http://127.0.0.1:9000");
        assert_eq!(config.refresh_interval_secs, 5);
    }

    // ========================================================================
    // File handling
    // ========================================================================

    #[test]
    fn test_load_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = load_config_from(&path).unwrap();

        assert_eq!(config, Config::default());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Gorda Configuration"));
        assert!(content.contains("backend_url = \"http://localhost:8090\""));
    }

    #[test]
    fn test_generated_file_parses_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let config = Config {
            clock_format: "%I:%M %p".to_string(),
            reconcile: ReconcileMode::Rebuild,
            window_title: "Work \"log\"".to_string(),
            ..Default::default()
        };

        save_config_to(&path, &config).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "refresh_interval_secs = \"soon\"").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, GordaError::Config(_)));
    }

    // ========================================================================
    // config set
    // ========================================================================

    #[test]
    fn test_set_config_value() {
        let config = Config::default();
        let updated = set_config_value(&config, "refresh_interval_secs", "15").unwrap();
        assert_eq!(updated.refresh_interval_secs, 15);

        let updated = set_config_value(&updated, "reconcile", "rebuild").unwrap();
        assert_eq!(updated.reconcile, ReconcileMode::Rebuild);
    }

    #[test]
    fn test_set_config_value_rejects_unknown_key() {
        let err = set_config_value(&Config::default(), "colour", "blue").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_set_config_value_validates() {
        assert!(set_config_value(&Config::default(), "refresh_interval_secs", "0").is_err());
        assert!(set_config_value(&Config::default(), "refresh_interval_secs", "x").is_err());
        assert!(set_config_value(&Config::default(), "backend_url", "ftp://x").is_err());
    }
}
