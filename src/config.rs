// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace, warn};

pub const ENV_DB_URL: &str = "PAGEMARK_DB_URL";
pub const ENV_INDEX_LINKS: &str = "PAGEMARK_INDEX_LINKS";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the SQLite database file, or `:memory:`
    pub db_url: String,

    /// Load full content for pages opened by following a link (default: false)
    pub index_links: bool,

    /// Maximum number of list name suggestions (default: 10)
    pub suggestion_limit: usize,

    /// Timeout for remote page content loads in seconds (default: 10)
    pub fetch_timeout_secs: u64,

    /// JSON file describing the open browser windows and their tabs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs_file: Option<String>,
}

fn default_db_path() -> String {
    let db_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/pagemark");

    db_dir
        .join("pagemark.db")
        .to_str()
        .unwrap_or("pagemark.db")
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            index_links: false,
            suggestion_limit: 10,
            fetch_timeout_secs: 10,
            tabs_file: None,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config/pagemark/config.toml"))
}

fn expand(path: &str) -> String {
    shellexpand::full(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str::<Settings>(&text)
        .map_err(|e| DomainError::Other(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Load settings: defaults, then the config file, then environment overrides.
///
/// An explicit `config_file` must exist and parse; the default location is optional.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => read_config_file(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => read_config_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring config file: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        },
    };

    if let Ok(db_url) = std::env::var(ENV_DB_URL) {
        trace!("Using {} from environment: {}", ENV_DB_URL, db_url);
        settings.db_url = db_url;
    }

    if let Ok(value) = std::env::var(ENV_INDEX_LINKS) {
        match parse_bool(&value) {
            Some(index_links) => settings.index_links = index_links,
            None => warn!("Ignoring {}={}: not a boolean", ENV_INDEX_LINKS, value),
        }
    }

    settings.db_url = expand(&settings.db_url);
    settings.tabs_file = settings.tabs_file.as_deref().map(expand);

    debug!("Settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
