//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hadith-reader/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Per-user state that changes while reading (favorites, last position,
//! language choice) is not config; it lives in the state file, see
//! [`crate::core::settings`].

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::catalog::DEFAULT_BOOK_ID;
use crate::core::cursor::NavigationPolicy;
use crate::core::types::Language;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReaderConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Per-book numbering offsets, keyed by book id.
    #[serde(default)]
    pub offsets: HashMap<String, u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
    pub default_book: Option<String>,
    pub language: Option<Language>,
    pub navigation: Option<NavigationPolicy>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";
const APP_DIR: &str = ".hadith-reader";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub state_path: PathBuf,
    pub log_path: PathBuf,
    /// Used only when the user has never picked a book.
    pub default_book: String,
    /// `Some` only when set explicitly; otherwise the saved choice wins.
    pub language: Option<Language>,
    pub navigation: NavigationPolicy,
    pub log_level: log::LevelFilter,
    pub offsets: HashMap<String, u32>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.hadith-reader`.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DIR))
}

/// Log file location. Fixed so the logger can be installed before any
/// config is read.
pub fn log_path() -> PathBuf {
    app_dir()
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
        .join("hadith.log")
}

/// Returns the path to `~/.hadith-reader/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.hadith-reader/config.toml`.
pub fn load_config() -> Result<ReaderConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(ReaderConfig::default())
        }
    }
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ReaderConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<ReaderConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ReaderConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ReaderConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Hadith Reader Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "/usr/share/hadith-reader/data"   # Or set HADITH_DATA_DIR
# default_book = "bukhari"                     # Or set HADITH_BOOK
# language = "english"                         # "english", "arabic", "urdu"
# navigation = "wrap"                          # "wrap" or "bounded"
# log_level = "info"                           # "error" .. "trace"

# Numbering offsets against the sunnah.com reference numbering.
# [offsets]
# bukhari = 0
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// CLI flags that take part in resolution (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub book: Option<String>,
    pub language: Option<Language>,
    pub navigation: Option<NavigationPolicy>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ReaderConfig, cli: &CliOverrides) -> ResolvedConfig {
    let base = app_dir().unwrap_or_else(|| PathBuf::from(APP_DIR));

    // Data dir: CLI → env → config → default
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| std::env::var("HADITH_DATA_DIR").ok().map(PathBuf::from))
        .or_else(|| config.general.data_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| base.join("data"));

    // Book: CLI → env → config → default
    let default_book = cli
        .book
        .clone()
        .or_else(|| std::env::var("HADITH_BOOK").ok())
        .or_else(|| config.general.default_book.clone())
        .unwrap_or_else(|| DEFAULT_BOOK_ID.to_string());

    // Language: CLI → env → config (no default; saved choice applies)
    let language = cli
        .language
        .or_else(|| {
            std::env::var("HADITH_LANGUAGE")
                .ok()
                .and_then(|code| Language::from_code(&code))
        })
        .or(config.general.language);

    let log_level = config
        .general
        .log_level
        .as_deref()
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .parse()
        .unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using info", config.general.log_level);
            log::LevelFilter::Info
        });

    ResolvedConfig {
        data_dir,
        state_path: base.join("state.json"),
        log_path: log_path(),
        default_book,
        language,
        navigation: cli
            .navigation
            .or(config.general.navigation)
            .unwrap_or_default(),
        log_level,
        offsets: config.offsets.clone(),
    }
}
