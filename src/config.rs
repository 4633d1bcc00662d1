//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.matchday/config.toml` (user)
//! 3. `/etc/matchday/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.matchday/secrets.toml` (user, must be 0600)
//! 2. `/etc/matchday/secrets.toml` (system, must be 0600)
//! 3. `API_SPORTS_API_KEY` environment variable
//!
//! Each section converts into the value object its component takes, so no
//! component ever sees the whole file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CacheConfig, CacheTtls};
use crate::upstream::{RateLimitConfig, RetryConfig, UpstreamConfig};
use crate::{MatchdayError, Result};

/// Environment variable consulted when no secrets file provides a key.
pub const API_KEY_ENV_VAR: &str = "API_SPORTS_API_KEY";

const CONFIG_DIR: &str = ".matchday";
const SYSTEM_DIR: &str = "/etc/matchday";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[upstream]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Network timeout per attempt (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_host: default_api_host(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    crate::upstream::DEFAULT_BASE_URL.to_string()
}

fn default_api_host() -> String {
    crate::upstream::DEFAULT_API_HOST.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// `[rate_limit]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateLimitSection {
    #[serde(default = "default_per_minute")]
    pub calls_per_minute: u32,
    #[serde(default = "default_per_day")]
    pub calls_per_day: u32,
    /// Total attempts per request, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    #[serde(default = "default_retry_after")]
    pub default_retry_after_secs: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            calls_per_minute: default_per_minute(),
            calls_per_day: default_per_day(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
            default_retry_after_secs: default_retry_after(),
        }
    }
}

fn default_per_minute() -> u32 {
    30
}

fn default_per_day() -> u32 {
    100
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_retry_after() -> u64 {
    60
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
    #[serde(default)]
    pub ttl: TtlSection,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: default_max_size(),
            cleanup_interval_secs: default_cleanup_interval(),
            ttl: TtlSection::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_size() -> usize {
    1_000
}

fn default_cleanup_interval() -> u64 {
    300
}

/// `[cache.ttl]`, in seconds. 0 means never expire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TtlSection {
    pub teams: u64,
    pub fixtures_completed: u64,
    pub fixtures_upcoming: u64,
    pub statistics: u64,
    pub standings: u64,
    pub predictions: u64,
    pub leagues: u64,
}

impl Default for TtlSection {
    fn default() -> Self {
        let ttls = CacheTtls::default();
        Self {
            teams: ttls.teams.as_secs(),
            fixtures_completed: ttls.fixtures_completed.as_secs(),
            fixtures_upcoming: ttls.fixtures_upcoming.as_secs(),
            statistics: ttls.statistics.as_secs(),
            standings: ttls.standings.as_secs(),
            predictions: ttls.predictions.as_secs(),
            leagues: ttls.leagues.as_secs(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter directive when `MATCHDAY_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first existing file
    /// among `~/.matchday/config.toml` and `/etc/matchday/config.toml` is
    /// used, falling back to defaults when neither exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MatchdayError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MatchdayError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MatchdayError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = Path::new(SYSTEM_DIR).join("config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig::new()
            .base_url(self.upstream.base_url.clone())
            .api_host(self.upstream.api_host.clone())
            .timeout(Duration::from_secs(self.upstream.timeout_secs))
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig::new()
            .per_minute(self.rate_limit.calls_per_minute)
            .per_day(self.rate_limit.calls_per_day)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.rate_limit.max_retries)
            .backoff_factor(self.rate_limit.backoff_factor)
            .default_retry_after(Duration::from_secs(self.rate_limit.default_retry_after_secs))
    }

    pub fn cache_config(&self) -> CacheConfig {
        let ttl = &self.cache.ttl;
        CacheConfig {
            enabled: self.cache.enabled,
            max_entries: self.cache.max_size,
            cleanup_interval: Duration::from_secs(self.cache.cleanup_interval_secs),
            ttls: CacheTtls {
                teams: Duration::from_secs(ttl.teams),
                fixtures_completed: Duration::from_secs(ttl.fixtures_completed),
                fixtures_upcoming: Duration::from_secs(ttl.fixtures_upcoming),
                statistics: Duration::from_secs(ttl.statistics),
                standings: Duration::from_secs(ttl.standings),
                predictions: Duration::from_secs(ttl.predictions),
                leagues: Duration::from_secs(ttl.leagues),
            },
        }
    }
}

/// Secrets file (API key).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment instead).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(CONFIG_DIR).join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = Path::new(SYSTEM_DIR).join("secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            MatchdayError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MatchdayError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MatchdayError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(MatchdayError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key from the secrets file, falling back to `API_SPORTS_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
