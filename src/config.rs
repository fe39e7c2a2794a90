use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which backend the stores use. `Auto` prefers Postgres and falls back to
/// memory when `DATABASE_URL` is unset or unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Auto,
    Postgres,
    Memory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(StorageMode::Auto),
            "postgres" => Ok(StorageMode::Postgres),
            "memory" => Ok(StorageMode::Memory),
            _ => Err(ConfigError::Invalid {
                name: "STORAGE",
                value: s.to_string(),
                expected: "one of auto, postgres, memory",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub storage: StorageMode,
    pub seed_catalog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            storage: StorageMode::Auto,
            seed_catalog: true,
        }
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            expected: "a boolean",
        }),
    }
}

impl AppConfig {
    /// Reads `HOST`, `PORT`, `DATABASE_URL`, `STORAGE` and `SEED_CATALOG`
    /// from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
                expected: "a valid port number",
            })?,
            None => defaults.port,
        };
        let storage = match var("STORAGE") {
            Some(value) => value.parse()?,
            None => defaults.storage,
        };
        let seed_catalog = match var("SEED_CATALOG") {
            Some(value) => parse_bool("SEED_CATALOG", &value)?,
            None => defaults.seed_catalog,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            database_url: var("DATABASE_URL"),
            storage,
            seed_catalog,
        })
    }
}
