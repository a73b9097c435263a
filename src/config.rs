//! Server configuration.

use crate::error::ConfigError;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Allowed CORS origin; any origin when unset.
    pub frontend_url: Option<String>,
    /// Deployment label shown in startup logs.
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: None,
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        let frontend_url = lookup("FRONTEND_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "*");

        let environment = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            port,
            frontend_url,
            environment,
        })
    }
}
