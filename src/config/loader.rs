//! Load settings from the process environment. Read once at startup, not reloadable.

use crate::config::types::*;
use crate::error::ConfigError;
use std::str::FromStr;

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset or empty keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let server_defaults = ServerConfig::default();
        let db_defaults = DatabaseConfig::default();

        let server = ServerConfig {
            host: get("HOST").unwrap_or(server_defaults.host),
            port: parsed("PORT", get("PORT"))?.unwrap_or(server_defaults.port),
            body_limit: parsed("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"))?.unwrap_or(server_defaults.body_limit),
        };
        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or(db_defaults.host),
            port: parsed("DB_PORT", get("DB_PORT"))?.unwrap_or(db_defaults.port),
            user: get("DB_USER").unwrap_or(db_defaults.user),
            // An empty password is legitimate.
            password: lookup("DB_PASSWORD").unwrap_or(db_defaults.password),
            name: get("DB_NAME").unwrap_or(db_defaults.name),
            max_connections: parsed("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"))?
                .unwrap_or(db_defaults.max_connections),
            auto_migrate: flag("DB_AUTO_MIGRATE", get("DB_AUTO_MIGRATE"))?.unwrap_or(db_defaults.auto_migrate),
        };
        Ok(Settings { server, database })
    }
}

fn parsed<T: FromStr>(key: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    raw.map(|value| value.parse().map_err(|_| ConfigError::Invalid { key, value }))
        .transpose()
}

fn flag(key: &'static str, raw: Option<String>) -> Result<Option<bool>, ConfigError> {
    raw.map(|value| match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    })
    .transpose()
}
