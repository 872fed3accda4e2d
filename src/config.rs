use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::core::logging::LoggingConfig;
use crate::core::search::OrchestratorConfig;
use crate::core::translate::{GeneratorConfig, ServiceConfig};

/// Prefix for environment overrides, e.g. `MTG_QUERY_SEARCH__TRANSLATOR_TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "MTG_QUERY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Invalid translator endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Invalid server address '{0}'")]
    InvalidAddress(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub translator: TranslatorConfig,
    pub search: OrchestratorConfig,
    pub service: ServiceConfig,
    /// Generative backend for the embedded service; unset disables it.
    pub generator: Option<GeneratorConfig>,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Where the orchestrator sends translation calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslatorMode {
    /// An in-process translation service
    #[default]
    Embedded,
    /// A translate server over HTTP
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub mode: TranslatorMode,
    pub endpoint: String,
    /// Transport timeout for remote calls. The orchestrator's own deadline
    /// (`search.translator_timeout_ms`) usually fires first.
    pub request_timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            mode: TranslatorMode::Embedded,
            endpoint: "http://127.0.0.1:8787/api/translate".to_string(),
            request_timeout_ms: 15_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8787".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file and environment.
    ///
    /// Falls back to `Default` if loading fails and hands back the error, so
    /// the caller can report it once logging is up.
    pub fn load() -> (Self, Option<ConfigError>) {
        let config_path = Self::config_path();
        match Self::load_from(Some(&config_path)) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Defaults, then the TOML file (if present), then `MTG_QUERY_` env vars.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(contents))
            .extract()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.translator.endpoint)?)
    }

    pub fn server_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.server.addr.clone()))
    }

    /// `~/.config/mtg-query/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("mtg-query").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
