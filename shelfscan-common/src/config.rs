//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `SHELFSCAN_CONFIG`
//! 3. User config file (`~/.config/shelfscan/config.toml`)
//! 4. System config file (`/etc/shelfscan/config.toml`, Linux only)
//! 5. Built-in defaults (fallback, a missing file never stops startup)
//!
//! Every TOML section is optional. Missing keys take the built-in defaults
//! defined in this module.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SHELFSCAN_CONFIG";

/// Google Books volumes search endpoint
pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Root configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Book metadata catalog (search API)
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// External append-log endpoint (spreadsheet)
    #[serde(default)]
    pub append: AppendConfig,

    /// Frame acquisition
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Barcode / OCR recognition
    #[serde(default)]
    pub recognition: RecognitionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Metadata catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CatalogConfig {
    /// Search endpoint URL
    #[serde(default = "default_catalog_endpoint")]
    pub endpoint: String,

    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// Language preference sent as the `lang` query parameter
    #[serde(default = "default_catalog_language")]
    pub language: String,

    /// Request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_catalog_endpoint(),
            api_key: None,
            language: default_catalog_language(),
            timeout_secs: None,
        }
    }
}

/// Append-log configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppendConfig {
    /// Endpoint receiving each resolved book as a JSON POST.
    /// Appending is disabled when unset.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Where frames come from
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// Re-read an image file kept current by an external camera tool
    #[default]
    Still,
    /// Run a capture command that writes one frame per invocation
    Command,
}

/// Frame acquisition configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CaptureConfig {
    /// Frame source kind
    #[serde(default)]
    pub source: CaptureSource,

    /// Image file read by the `still` source
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Capture program run by the `command` source
    #[serde(default = "default_capture_program")]
    pub program: String,

    /// Capture program arguments; `{output}` is replaced by the frame path
    #[serde(default = "default_capture_args")]
    pub args: Vec<String>,

    /// Convert frames to grayscale before OCR
    #[serde(default = "default_true")]
    pub grayscale: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: CaptureSource::default(),
            path: None,
            program: default_capture_program(),
            args: default_capture_args(),
            grayscale: true,
        }
    }
}

/// ISBN validation applied to OCR'd digit strings
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IsbnValidation {
    /// Search for an ISBN-13 (978/979) or ISBN-10 (trailing X allowed) run
    #[default]
    Strict,
    /// Accept any run of at least 10 digits
    Lenient,
}

/// Recognition configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RecognitionConfig {
    /// ISBN OCR validation mode
    #[serde(default)]
    pub isbn_validation: IsbnValidation,

    /// Barcode decoder program (zbar command-line tool)
    #[serde(default = "default_barcode_program")]
    pub barcode_program: String,

    /// OCR program (tesseract command-line tool)
    #[serde(default = "default_ocr_program")]
    pub ocr_program: String,

    /// OCR language for ISBN digits
    #[serde(default = "default_isbn_language")]
    pub isbn_language: String,

    /// Character whitelist for ISBN OCR
    #[serde(default = "default_isbn_whitelist")]
    pub isbn_whitelist: String,

    /// OCR language for titles
    #[serde(default = "default_title_language")]
    pub title_language: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            isbn_validation: IsbnValidation::default(),
            barcode_program: default_barcode_program(),
            ocr_program: default_ocr_program(),
            isbn_language: default_isbn_language(),
            isbn_whitelist: default_isbn_whitelist(),
            title_language: default_title_language(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_catalog_endpoint() -> String {
    DEFAULT_CATALOG_ENDPOINT.to_string()
}

fn default_catalog_language() -> String {
    "ja".to_string()
}

fn default_capture_program() -> String {
    "ffmpeg".to_string()
}

fn default_capture_args() -> Vec<String> {
    [
        "-loglevel", "error", "-y", "-f", "v4l2", "-i", "/dev/video0", "-frames:v", "1",
        "{output}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_barcode_program() -> String {
    "zbarimg".to_string()
}

fn default_ocr_program() -> String {
    "tesseract".to_string()
}

fn default_isbn_language() -> String {
    "eng".to_string()
}

fn default_isbn_whitelist() -> String {
    "0123456789-X".to_string()
}

fn default_title_language() -> String {
    "jpn".to_string()
}

/// Configuration together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// `None` when built-in defaults are in use
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Report where the configuration came from
    ///
    /// Loading happens before the tracing subscriber is installed (the
    /// subscriber itself is configured from the file), so the outcome is
    /// logged by the caller once logging is up.
    pub fn log_origin(&self) {
        match &self.source {
            Some(path) => info!("Configuration loaded from {}", path.display()),
            None => warn!("No config file found, using built-in defaults"),
        }
    }
}

/// Resolve the config file path following the documented priority order
///
/// Explicit paths (argument or environment) are returned even when the file
/// does not exist so the caller can report them. Well-known locations are
/// only returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3/4: Well-known locations
    default_config_locations().into_iter().find(|p| p.exists())
}

/// Platform config file locations, user before system
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("shelfscan").join("config.toml"));
    }

    if cfg!(target_os = "linux") {
        locations.push(PathBuf::from("/etc/shelfscan/config.toml"));
    }

    locations
}

/// Path where `init-config` writes a fresh config file
pub fn user_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("shelfscan").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load configuration, falling back to built-in defaults
///
/// An explicitly named file that is missing or malformed is an error.
/// When no file is found at all, defaults are used; see
/// [`LoadedConfig::log_origin`] for the warning.
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) => {
            let config = load_toml_config(&path)?;
            Ok(LoadedConfig {
                config,
                source: Some(path),
            })
        }
        None => {
            Ok(LoadedConfig {
                config: TomlConfig::default(),
                source: None,
            })
        }
    }
}

/// Write configuration to a TOML file
///
/// Writes to a temporary sibling first and renames it into place so a
/// partially written file is never observed.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}
