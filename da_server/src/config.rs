//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use duel_arena::UserId;
use duel_arena::db::DatabaseConfig;
use duel_arena::duel::DuelConfig;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Default bind address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 6969);

/// Where match records are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid {
                var: "STORAGE_BACKEND".to_string(),
                reason: format!("Unknown backend '{other}' (expected postgres or memory)"),
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Match record storage backend
    pub storage: StorageBackend,
    /// Database configuration (used by the postgres backend)
    pub database: DatabaseConfig,
    /// Commission and leaderboard settings
    pub duel: DuelConfig,
    /// Users allowed to act as dealer
    pub dealer_ids: Vec<UserId>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `force_memory` - Use the in-memory backend regardless of `STORAGE_BACKEND`
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        force_memory: bool,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match std::env::var("SERVER_BIND") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "SERVER_BIND".to_string(),
                    reason: format!("'{raw}' is not an IP:PORT address"),
                })?,
                Err(_) => DEFAULT_BIND,
            },
        };

        let storage = if force_memory {
            StorageBackend::Memory
        } else {
            std::env::var("STORAGE_BACKEND")
                .ok()
                .map(|raw| raw.parse::<StorageBackend>())
                .transpose()?
                .unwrap_or(StorageBackend::Postgres)
        };

        let mut database = DatabaseConfig::from_env();
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        let duel = DuelConfig::from_env().map_err(|reason| ConfigError::Invalid {
            var: "DUEL_*".to_string(),
            reason,
        })?;

        let dealer_ids = match std::env::var("DEALER_IDS") {
            Ok(raw) => parse_dealer_ids(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(ServerConfig {
            bind,
            storage,
            database,
            duel,
            dealer_ids,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.duel.validate().map_err(|reason| ConfigError::Invalid {
            var: "DUEL_*".to_string(),
            reason,
        })?;

        if self.storage == StorageBackend::Postgres && self.database.database_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Set a PostgreSQL URL or run with --memory".to_string(),
            });
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: format!(
                    "Must be at least DB_MIN_CONNECTIONS ({})",
                    self.database.min_connections
                ),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a comma-separated list of dealer user ids
pub fn parse_dealer_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse().map_err(|_| ConfigError::Invalid {
                var: "DEALER_IDS".to_string(),
                reason: format!("'{id}' is not a user id"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: DEFAULT_BIND,
            storage: StorageBackend::Memory,
            database: DatabaseConfig::development(),
            duel: DuelConfig::default(),
            dealer_ids: vec![7],
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "DATABASE_URL".to_string(),
            hint: "Use --memory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("Use --memory"));
    }

    #[test]
    fn test_parse_dealer_ids() {
        assert_eq!(parse_dealer_ids("1, 2,3,").unwrap(), vec![1, 2, 3]);
        assert!(parse_dealer_ids("").unwrap().is_empty());
        assert!(matches!(
            parse_dealer_ids("1,abc"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("Postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_commission_too_high() {
        let mut config = config();
        config.duel.commission_bps = 20_000;
        assert!(matches!(config.validate().unwrap_err(), ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_missing_database_url() {
        let mut config = config();
        config.storage = StorageBackend::Postgres;
        config.database.database_url = String::new();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::MissingRequired { .. }
        ));
    }
}
