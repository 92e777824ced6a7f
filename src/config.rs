//! API credentials and endpoint configuration.
//!
//! The upstream API authenticates every request with a host identifier and a
//! secret key. The key is read once from the hosting environment; a missing
//! or blank key fails fast here so an invalid credential is never sent.

use std::env;
use thiserror::Error;

/// Environment variable holding the upstream API key.
pub const API_KEY_VAR: &str = "FLIGHTS_API_KEY";

/// Default upstream API host.
pub const DEFAULT_API_HOST: &str = "sky-scrapper.p.rapidapi.com";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(&'static str),
}

/// Credentials and host for the upstream flight-data API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub api_key: String,
}

impl ApiConfig {
    /// Build a config with an explicit key and the default host.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_API_HOST.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_VAR).map_err(|_| ConfigError::MissingApiKey(API_KEY_VAR))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(API_KEY_VAR));
        }
        Ok(Self::new(api_key))
    }
}
