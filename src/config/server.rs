//! Listener, environment and CORS settings for the sync hub

use axum::http::HeaderValue;
use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info,coddee_sync=debug,tower_http=info";

/// Where the hub listens and who may call it from a browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface the listener binds to
    pub host: String,

    pub port: u16,

    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,

    /// Comma-separated browser origins allowed to issue tokens
    pub cors_origins: Option<String>,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Address the sync hub listener binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr, ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Origins for the CORS layer, parsed as header values.
    ///
    /// Origins must be listed explicitly; `*` is refused.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, ValidationError> {
        let Some(raw) = &self.cors_origins else {
            return Ok(Vec::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                if origin == "*" {
                    return Err(ValidationError::WildcardCorsOrigin);
                }
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| ValidationError::InvalidCorsOrigin(origin.to_string()))
            })
            .collect()
    }

    /// Validate listener and CORS settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listen_addr()?;
        self.allowed_origins()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            cors_origins: None,
        }
    }
}
