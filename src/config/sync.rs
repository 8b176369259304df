//! Sync hub configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Largest accepted per-connection outbound buffer.
const MAX_CONNECTION_BUFFER: usize = 4096;

/// Minimum issuer key length.
const MIN_ISSUER_KEY_LEN: usize = 16;

/// Sync hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Only relay to connections that identified with an issued token.
    ///
    /// When false the hub runs without a registry and relays to every
    /// connected peer.
    #[serde(default = "default_require_identification")]
    pub require_identification: bool,

    /// Outbound messages buffered per connection before pushes are dropped
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,

    /// Shared key the login flow presents to issue tokens
    #[serde(default)]
    pub issuer_key: Option<SecretString>,
}

impl SyncConfig {
    /// Validate sync configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.connection_buffer == 0 || self.connection_buffer > MAX_CONNECTION_BUFFER {
            return Err(ValidationError::InvalidConnectionBuffer);
        }

        match &self.issuer_key {
            Some(key) if key.expose_secret().len() < MIN_ISSUER_KEY_LEN => {
                return Err(ValidationError::IssuerKeyTooShort);
            }
            None if self.require_identification && *environment == Environment::Production => {
                return Err(ValidationError::MissingRequired("sync.issuer_key"));
            }
            _ => {}
        }

        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            require_identification: default_require_identification(),
            connection_buffer: default_connection_buffer(),
            issuer_key: None,
        }
    }
}

fn default_require_identification() -> bool {
    true
}

fn default_connection_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string()))
    }

    #[test]
    fn test_sync_config_defaults() {
        let config = SyncConfig::default();
        assert!(config.require_identification);
        assert_eq!(config.connection_buffer, 64);
        assert!(config.issuer_key.is_none());
    }

    #[test]
    fn test_development_allows_missing_issuer_key() {
        let config = SyncConfig::default();
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_production_requires_issuer_key() {
        let config = SyncConfig::default();
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::MissingRequired("sync.issuer_key"))
        );

        let config = SyncConfig {
            issuer_key: key("0123456789abcdef"),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_production_without_identification_needs_no_key() {
        let config = SyncConfig {
            require_identification: false,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_short_issuer_key_rejected() {
        let config = SyncConfig {
            issuer_key: key("short"),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::IssuerKeyTooShort)
        );
    }

    #[test]
    fn test_connection_buffer_bounds() {
        for buffer in [0, MAX_CONNECTION_BUFFER + 1] {
            let config = SyncConfig {
                connection_buffer: buffer,
                ..Default::default()
            };
            assert_eq!(
                config.validate(&Environment::Development),
                Err(ValidationError::InvalidConnectionBuffer)
            );
        }
    }
}
