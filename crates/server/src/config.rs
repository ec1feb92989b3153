use std::net::SocketAddr;
use std::str::FromStr;

use pcopp_common::contract::DEFAULT_MAX_AGE_SECS;

/// What the ingestion boundary does with a record that is structurally valid
/// but older than the freshness limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    #[default]
    Reject,
    Archive,
}

impl FromStr for StalePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "archive" => Ok(Self::Archive),
            _ => Err(ConfigError::invalid("STALE_POLICY", s)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub max_telemetry_age_secs: u64,
    pub stale_policy: StalePolicy,
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            database_url: database_url.into(),
            db_max_connections: 10,
            max_telemetry_age_secs: DEFAULT_MAX_AGE_SECS,
            stale_policy: StalePolicy::Reject,
            run_migrations: true,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let mut cfg = Self::new(database_url);

        if let Some(v) = lookup("PCOPP_LISTEN_ADDR") {
            cfg.listen_addr = parse("PCOPP_LISTEN_ADDR", &v)?;
        }
        if let Some(v) = lookup("DB_MAX_CONNECTIONS") {
            cfg.db_max_connections = parse("DB_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("MAX_TELEMETRY_AGE_SECS") {
            cfg.max_telemetry_age_secs = parse("MAX_TELEMETRY_AGE_SECS", &v)?;
        }
        if let Some(v) = lookup("STALE_POLICY") {
            cfg.stale_policy = v.parse()?;
        }
        if let Some(v) = lookup("RUN_MIGRATIONS") {
            cfg.run_migrations = parse_bool("RUN_MIGRATIONS", &v)?;
        }

        Ok(cfg)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::invalid(key, value))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const DB: (&str, &str) = ("DATABASE_URL", "postgres://localhost/pcopp");

    #[test]
    fn defaults_with_only_database_url() {
        let cfg = ServerConfig::from_lookup(lookup(&[DB])).unwrap();
        assert_eq!(cfg.listen_addr.port(), 8001);
        assert_eq!(cfg.database_url, "postgres://localhost/pcopp");
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.max_telemetry_age_secs, 300);
        assert_eq!(cfg.stale_policy, StalePolicy::Reject);
        assert!(cfg.run_migrations);
    }

    #[test]
    fn overrides_from_env() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("PCOPP_LISTEN_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://db.internal/telemetry"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("MAX_TELEMETRY_AGE_SECS", "60"),
            ("STALE_POLICY", "Archive"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(cfg.database_url, "postgres://db.internal/telemetry");
        assert_eq!(cfg.db_max_connections, 4);
        assert_eq!(cfg.max_telemetry_age_secs, 60);
        assert_eq!(cfg.stale_policy, StalePolicy::Archive);
        assert!(!cfg.run_migrations);
    }

    #[test]
    fn database_url_required() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
        let err = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn bad_values_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[DB, ("STALE_POLICY", "drop")])).unwrap_err();
        assert!(err.to_string().contains("STALE_POLICY"));
        let err = ServerConfig::from_lookup(lookup(&[DB, ("DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}
