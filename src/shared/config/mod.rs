//! Application configuration module
//!
//! Provides the runtime mode and server configuration. Everything is read from
//! the environment once at startup and never changes while the process runs.
//!
//! # Environment Variables
//!
//! - `APP_ENV` - `production` (or `prod`) enables redaction; anything else is development
//! - `SERVER_PORT` - listen port, defaults to 3000
//! - `DATABASE_URL` - PostgreSQL connection string; database features are off when unset

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Variable holding the runtime mode
pub const APP_ENV: &str = "APP_ENV";

/// Port used when `SERVER_PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

/// Process-wide runtime mode
///
/// Gates message redaction and stack inclusion in error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    Production,
    #[default]
    Development,
}

impl RuntimeMode {
    /// Interpret a mode string; unknown values mean development
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Read the mode from `APP_ENV`
    pub fn from_env() -> Self {
        std::env::var(APP_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for RuntimeMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Runtime mode (production vs. development)
    pub mode: RuntimeMode,
    /// Listen port
    pub port: u16,
    /// Database URL
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::default(),
            port: DEFAULT_PORT,
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidPort` - `SERVER_PORT` is set but not a valid port
    /// * `ConfigError::InvalidUrl` - `DATABASE_URL` is not a PostgreSQL URL
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder().mode(RuntimeMode::from_env());

        if let Ok(port) = std::env::var("SERVER_PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            builder = builder.port(port);
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                builder = builder.database_url(url);
            }
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    mode: Option<RuntimeMode>,
    port: Option<u16>,
    database_url: Option<String>,
}

impl AppConfigBuilder {
    /// Set the runtime mode
    pub fn mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            mode: self.mode.unwrap_or_default(),
            port: self.port.unwrap_or(DEFAULT_PORT),
            database_url: self.database_url,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid port: {0}")]
    InvalidPort(String),
}
