use std::path::Path;

use super::schema::AgentConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_from_file(path: &Path) -> Result<AgentConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<AgentConfig, LoadError> {
    let cfg: AgentConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &AgentConfig) -> Result<(), LoadError> {
    if cfg.ingest_url.trim().is_empty() {
        return Err(LoadError::Validation("ingest_url must not be empty".into()));
    }
    if cfg.heartbeat_seconds == 0 {
        return Err(LoadError::Validation("heartbeat_seconds must be > 0".into()));
    }
    if cfg.collect_retry_seconds == 0 {
        return Err(LoadError::Validation("collect_retry_seconds must be > 0".into()));
    }
    if cfg.request_timeout_seconds == 0 {
        return Err(LoadError::Validation("request_timeout_seconds must be > 0".into()));
    }
    if cfg.backoff.base_seconds == 0 {
        return Err(LoadError::Validation("backoff.base_seconds must be > 0".into()));
    }
    if cfg.backoff.max_seconds < cfg.backoff.base_seconds {
        return Err(LoadError::Validation(
            "backoff.max_seconds must be >= backoff.base_seconds".into(),
        ));
    }
    if matches!(cfg.node_id.as_deref(), Some(id) if id.trim().is_empty()) {
        return Err(LoadError::Validation("node_id must not be blank".into()));
    }
    Ok(())
}
