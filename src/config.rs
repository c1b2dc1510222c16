//! Application-level configuration loading, including storage location, autosave delay
//! and extra game models.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    debounce::DEFAULT_AUTOSAVE_DELAY,
    model::{GameModel, ScoreCategory, ScoringType},
    navigation::DEFAULT_ROUTE,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREKEEP_CONFIG_PATH";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_STORAGE_PREFIX: &str = "scorekeep_";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Directory holding the collection files.
    pub data_dir: PathBuf,
    /// Prefix prepended to every collection file name.
    pub storage_prefix: String,
    /// Quiet period before buffered score edits are written.
    pub autosave_delay: Duration,
    /// Route mounted when an unknown route is requested.
    pub default_route: String,
    /// HTTP listening port.
    pub port: u16,
    /// Keep collections in memory only (nothing survives a restart).
    pub in_memory: bool,
    /// Game models appended to the built-in registry.
    pub models: Vec<GameModel>,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        models = app_config.models.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(port) = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
        {
            self.port = port;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_prefix: DEFAULT_STORAGE_PREFIX.into(),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            default_route: DEFAULT_ROUTE.into(),
            port: DEFAULT_PORT,
            in_memory: false,
            models: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    data_dir: Option<PathBuf>,
    storage_prefix: Option<String>,
    autosave_delay_ms: Option<u64>,
    default_route: Option<String>,
    port: Option<u16>,
    in_memory: bool,
    models: Vec<RawModel>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: value.data_dir.unwrap_or(defaults.data_dir),
            storage_prefix: value.storage_prefix.unwrap_or(defaults.storage_prefix),
            autosave_delay: value
                .autosave_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.autosave_delay),
            default_route: value.default_route.unwrap_or(defaults.default_route),
            port: value.port.unwrap_or(defaults.port),
            in_memory: value.in_memory,
            models: value.models.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a game model inside the configuration file.
struct RawModel {
    id: String,
    label: String,
    #[serde(default)]
    description: String,
    min_players: usize,
    max_players: usize,
    #[serde(rename = "type")]
    scoring: ScoringType,
    #[serde(default)]
    fields: Vec<RawCategory>,
}

impl From<RawModel> for GameModel {
    fn from(value: RawModel) -> Self {
        Self {
            id: value.id,
            label: value.label,
            description: value.description,
            min_players: value.min_players,
            max_players: value.max_players.max(value.min_players),
            scoring: value.scoring,
            categories: value.fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a scoring category inside the configuration file.
struct RawCategory {
    id: String,
    label: String,
    #[serde(default)]
    icon: Option<String>,
}

impl From<RawCategory> for ScoreCategory {
    fn from(value: RawCategory) -> Self {
        Self {
            id: value.id,
            label: value.label,
            icon: value.icon,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
