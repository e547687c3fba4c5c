//! Process settings from environment variables (a `.env` file is honoured by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sandwich_shop";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Which record store backs the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Postgres,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            _ => Err(ConfigError::Env(format!(
                "invalid STORE: {} (expected memory or postgres)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub store: StoreKind,
    pub database_url: String,
    pub max_connections: u32,
    pub catalog_path: Option<PathBuf>,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e| ConfigError::Env(format!("invalid BIND_ADDR: {}", e)))?;
        let store = match lookup("STORE") {
            Some(s) => s.parse()?,
            None => StoreKind::Memory,
        };
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let max_connections = parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        let body_limit_bytes = parse_or("BODY_LIMIT_BYTES", lookup("BODY_LIMIT_BYTES"), DEFAULT_BODY_LIMIT_BYTES)?;
        let catalog_path = lookup("CATALOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        Ok(Settings {
            bind_addr,
            store,
            database_url,
            max_connections,
            catalog_path,
            body_limit_bytes,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env(format!("invalid {}: {}", key, v))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(s.store, StoreKind::Memory);
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(s.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert!(s.catalog_path.is_none());
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("STORE", "Postgres"),
            ("DATABASE_URL", "postgres://db/shop"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("CATALOG_PATH", "catalog.json"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr.port(), 9000);
        assert_eq!(s.store, StoreKind::Postgres);
        assert_eq!(s.database_url, "postgres://db/shop");
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.catalog_path, Some(PathBuf::from("catalog.json")));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(settings(&[("STORE", "redis")]), Err(ConfigError::Env(_))));
        assert!(matches!(settings(&[("BIND_ADDR", "nowhere")]), Err(ConfigError::Env(_))));
        assert!(matches!(settings(&[("DB_MAX_CONNECTIONS", "many")]), Err(ConfigError::Env(_))));
    }
}
