use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PAGERDUTY_EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub scan_interval: Duration,
    pub api_addr: SocketAddr,
    pub slack_webhook_url: Option<String>,
    pub pagerduty_routing_key: Option<String>,
    pub pagerduty_events_url: String,
    pub notify_timeout: Duration,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections = match non_empty("DB_MAX_CONNECTIONS") {
            Some(v) => parse("DB_MAX_CONNECTIONS", &v)?,
            None => 5,
        };
        let scan_secs = positive_secs(non_empty("SCAN_INTERVAL_SECS"), "SCAN_INTERVAL_SECS", 30)?;
        let notify_secs = positive_secs(non_empty("NOTIFY_TIMEOUT_SECS"), "NOTIFY_TIMEOUT_SECS", 10)?;
        let api_addr = match non_empty("WORKER_API_ADDR") {
            Some(v) => parse("WORKER_API_ADDR", &v)?,
            None => SocketAddr::from(([0, 0, 0, 0], 9090)),
        };

        Ok(Self {
            database_url,
            db_max_connections,
            scan_interval: Duration::from_secs(scan_secs),
            api_addr,
            slack_webhook_url: non_empty("SLACK_WEBHOOK_URL"),
            pagerduty_routing_key: non_empty("PAGERDUTY_ROUTING_KEY"),
            pagerduty_events_url: non_empty("PAGERDUTY_EVENTS_URL")
                .unwrap_or_else(|| DEFAULT_PAGERDUTY_EVENTS_URL.into()),
            notify_timeout: Duration::from_secs(notify_secs),
        })
    }
}

fn positive_secs(raw: Option<String>, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let secs = match raw {
        Some(v) => parse(key, &v)?,
        None => default,
    };
    if secs == 0 {
        return Err(ConfigError::Invalid { key, value: "0".into() });
    }
    Ok(secs)
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
