//! Server configuration.
//!
//! Values are layered: built-in defaults, then a TOML file, then environment
//! variables prefixed with `BEDROCK_RELAY_` (nested keys use `__`, e.g.
//! `BEDROCK_RELAY_MODELS__CHAT_MODEL`).

use bedrock_relay_error::ConfigError;
use bedrock_relay_models::TranslatorConfig;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Configuration file read when no path is given; optional.
pub const DEFAULT_CONFIG_FILE: &str = "bedrock_relay.toml";

const ENV_PREFIX: &str = "BEDROCK_RELAY";

/// Default request body cap; inline base64 photos run to several megabytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Settings for the `/query` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
#[serde(default)]
pub struct SearchConfig {
    /// Index searched when a query names none
    default_index: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_index: "documents".to_string(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Getters)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    bind_addr: String,
    /// AWS region; the SDK provider chain decides when unset
    region: Option<String>,
    /// Directory holding the HTML pages
    static_dir: PathBuf,
    /// Bound on opening the upstream stream, in seconds
    invoke_timeout_secs: u64,
    /// Frames buffered between the relay task and the response body
    channel_capacity: usize,
    /// Send every fragment as its own frame
    flush_each_fragment: bool,
    /// Largest request body accepted on the generation routes
    max_body_bytes: usize,
    /// Log output format
    log_format: LogFormat,
    /// Model selection and generation parameters
    models: TranslatorConfig,
    /// Search endpoint settings
    search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            region: None,
            static_dir: PathBuf::from("./static"),
            invoke_timeout_secs: 30,
            channel_capacity: 32,
            flush_each_fragment: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: LogFormat::Pretty,
            models: TranslatorConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from defaults, a TOML file and the environment.
    ///
    /// With `path` set the file must exist; otherwise [`DEFAULT_CONFIG_FILE`]
    /// is read if present.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))?;
        Self::from_settings(settings)
    }

    /// Parses configuration from TOML text layered over the defaults.
    ///
    /// The environment is not consulted.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        debug!(bind_addr = %config.bind_addr, "Configuration loaded");
        Ok(config)
    }

    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.invoke_timeout_secs == 0 {
            return Err(ConfigError::new("invoke_timeout_secs must be positive"));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::new("channel_capacity must be positive"));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::new("max_body_bytes must be positive"));
        }
        if *self.models.max_tokens() == 0 {
            return Err(ConfigError::new("models.max_tokens must be positive"));
        }
        let temperature = *self.models.chat_temperature();
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::new(format!(
                "models.chat_temperature {} is outside [0, 1]",
                temperature
            )));
        }
        Ok(())
    }

    /// The listen address, parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e| ConfigError::new(format!("Invalid bind_addr `{}`: {}", self.bind_addr, e)))
    }

    /// Upstream setup timeout.
    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.invoke_timeout_secs)
    }

    /// Replaces the listen address, e.g. from a command-line flag.
    pub fn with_bind_addr(mut self, bind_addr: impl Into<String>) -> Result<Self, ConfigError> {
        self.bind_addr = bind_addr.into();
        self.socket_addr()?;
        Ok(self)
    }
}
