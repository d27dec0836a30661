use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use timer_core::DEFAULT_TICK_INTERVAL_MS;

use crate::storage::Theme;

const ENV_TICK_MS: &str = "STOPWATCH_TICK_MS";
const ENV_PREFS: &str = "STOPWATCH_PREFS";
const ENV_THEME_DEFAULT: &str = "STOPWATCH_THEME_DEFAULT";
const ENV_LOG: &str = "STOPWATCH_LOG";

const PREFS_DIR: &str = "stopwatch";
const PREFS_FILE: &str = "prefs.json";
const FALLBACK_PREFS_FILE: &str = "stopwatch-prefs.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid STOPWATCH_TICK_MS {0:?}: expected a positive number of milliseconds")]
    InvalidTickInterval(String),

    #[error("invalid STOPWATCH_LOG {0:?}: expected off, error, warn, info, debug or trace")]
    InvalidLogLevel(String),

    #[error("invalid STOPWATCH_THEME_DEFAULT {0:?}: expected dark or light")]
    InvalidTheme(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub tick_interval_ms: u64,
    pub prefs_path: PathBuf,
    /// Stand-in for the system colour-scheme preference when no theme is saved.
    pub prefers_dark: bool,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tick_interval_ms = match lookup(ENV_TICK_MS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(ConfigError::InvalidTickInterval(raw)),
            },
            None => DEFAULT_TICK_INTERVAL_MS,
        };

        let prefs_path = lookup(ENV_PREFS)
            .map(PathBuf::from)
            .unwrap_or_else(default_prefs_path);

        let prefers_dark = match lookup(ENV_THEME_DEFAULT) {
            Some(raw) => match raw.trim().parse::<Theme>() {
                Ok(theme) => theme == Theme::Dark,
                Err(_) => return Err(ConfigError::InvalidTheme(raw)),
            },
            None => false,
        };

        let log_level = match lookup(ENV_LOG) {
            Some(raw) => LevelFilter::from_str(raw.trim())
                .map_err(|_| ConfigError::InvalidLogLevel(raw.clone()))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            tick_interval_ms,
            prefs_path,
            prefers_dark,
            log_level,
        })
    }
}

fn default_prefs_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(PREFS_DIR).join(PREFS_FILE),
        None => PathBuf::from(FALLBACK_PREFS_FILE),
    }
}
