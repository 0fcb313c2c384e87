use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::matcher::MatchPolicy;
use crate::core::reasons::DEFAULT_REASON_COUNT;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Marketplace backend the engine reads deals and providers from.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_provider_ttl_secs")]
    pub provider_ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            provider_ttl_secs: default_provider_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_provider_ttl_secs() -> u64 {
    300
}
fn default_cache_max_entries() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_results")]
    pub default_max_results: u16,
    #[serde(default = "default_max_results_cap")]
    pub max_results_cap: u16,
    #[serde(default = "default_reason_count")]
    pub reason_count: usize,
    #[serde(default)]
    pub block_on_gate_failure: bool,
}

impl MatchingSettings {
    /// Orchestrator policy derived from the configured knobs.
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            block_on_gate_failure: self.block_on_gate_failure,
            reason_count: self.reason_count,
        }
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_max_results: default_max_results(),
            max_results_cap: default_max_results_cap(),
            reason_count: default_reason_count(),
            block_on_gate_failure: false,
        }
    }
}

fn default_max_results() -> u16 {
    5
}
fn default_max_results_cap() -> u16 {
    50
}
fn default_reason_count() -> usize {
    DEFAULT_REASON_COUNT
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with AUTOMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with AUTOMATCH_)
            // e.g., AUTOMATCH_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("AUTOMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Substitute well-known environment variables in string values
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("AUTOMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply backend credential overrides from the environment.
/// MARKETPLACE_API_KEY is checked first so deployments can share one secret
/// name across services, then the prefixed form.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("MARKETPLACE_API_KEY")
        .or_else(|_| env::var("AUTOMATCH_BACKEND__API_KEY"))
        .ok();
    let base_url = env::var("MARKETPLACE_BASE_URL")
        .or_else(|_| env::var("AUTOMATCH_BACKEND__BASE_URL"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("backend.api_key", api_key)?;
    }
    if let Some(base_url) = base_url {
        builder = builder.set_override("backend.base_url", base_url)?;
    }

    builder.build()
}
