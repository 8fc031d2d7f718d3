//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// The deployment stage; only `Development` mounts the Swagger UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Test,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(format!("'{}' is not a known environment", other)),
        }
    }
}

/// Where the repositories live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Storage {
    /// Process-local tables, lost on exit.
    Memory,
    Postgres { url: String, max_connections: u32 },
}

/// Credentials of the administrator seeded at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub storage: Storage,
    pub log_level: Level,
    pub environment: Environment,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expires_in: i64,
    pub password_salt: String,
    pub admin_seed: Option<AdminSeed>,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(&std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).filter(|value| !value.is_empty()).cloned();
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));

        // --- Load Server and Database Settings ---
        let bind_address_str = get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = require("DATABASE_URL")?;
        let storage = if database_url == "memory" {
            Storage::Memory
        } else {
            let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 5u32)?;
            Storage::Postgres {
                url: database_url,
                max_connections,
            }
        };

        let log_level_str = get("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let environment = match get("APP_ENV") {
            Some(value) => value
                .parse::<Environment>()
                .map_err(|e| ConfigError::InvalidValue("APP_ENV".to_string(), e))?,
            None => Environment::Development,
        };

        // --- Load Security Settings ---
        let jwt_secret = require("JWT_SECRET")?;
        let jwt_expires_in = parse_or("JWT_EXPIRES_IN", get("JWT_EXPIRES_IN"), 3600i64)?;
        if jwt_expires_in <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_EXPIRES_IN".to_string(),
                "must be a positive number of seconds".to_string(),
            ));
        }
        let password_salt = require("PASSWORD_SALT")?;

        let admin_seed = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingVar("ADMIN_PASSWORD".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingVar("ADMIN_EMAIL".to_string())),
        };

        Ok(Self {
            bind_address,
            storage,
            log_level,
            environment,
            jwt_secret,
            jwt_expires_in,
            password_salt,
            admin_seed,
            cors_origin: get("CORS_ORIGIN"),
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn minimal() -> HashMap<String, String> {
        vars(&[
            ("DATABASE_URL", "postgres://localhost/reading"),
            ("JWT_SECRET", "secret"),
            ("PASSWORD_SALT", "salt"),
        ])
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = Config::from_vars(&minimal()).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.jwt_expires_in, 3600);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(
            config.storage,
            Storage::Postgres {
                url: "postgres://localhost/reading".to_string(),
                max_connections: 5
            }
        );
        assert!(config.admin_seed.is_none());
    }

    #[test]
    fn memory_storage_is_selected_by_name() {
        let mut env = minimal();
        env.insert("DATABASE_URL".to_string(), "memory".to_string());
        assert_eq!(Config::from_vars(&env).unwrap().storage, Storage::Memory);
    }

    #[test]
    fn required_secrets_are_enforced() {
        let mut env = minimal();
        env.remove("JWT_SECRET");
        assert_eq!(
            Config::from_vars(&env).unwrap_err(),
            ConfigError::MissingVar("JWT_SECRET".to_string())
        );
    }

    #[test]
    fn admin_seed_needs_both_halves() {
        let mut env = minimal();
        env.insert("ADMIN_EMAIL".to_string(), "admin@example.com".to_string());
        assert_eq!(
            Config::from_vars(&env).unwrap_err(),
            ConfigError::MissingVar("ADMIN_PASSWORD".to_string())
        );

        env.insert("ADMIN_PASSWORD".to_string(), "Admin@1234".to_string());
        let seed = Config::from_vars(&env).unwrap().admin_seed.unwrap();
        assert_eq!(seed.email, "admin@example.com");
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let mut env = minimal();
        env.insert("JWT_EXPIRES_IN".to_string(), "1h".to_string());
        assert!(matches!(
            Config::from_vars(&env),
            Err(ConfigError::InvalidValue(key, _)) if key == "JWT_EXPIRES_IN"
        ));
    }
}
