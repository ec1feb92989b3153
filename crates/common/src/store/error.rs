#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("data source: sql: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("data source: serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("data source unavailable: {0}")]
    Unavailable(String),
}
