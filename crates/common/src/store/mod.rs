mod error;
pub mod migrator;
mod pool;
mod risk_source;
mod telemetry;

pub use error::StorageError;
pub use pool::create_pool;
pub use risk_source::{PgRiskSource, RiskSource, StaticRiskSource};
pub use telemetry::{MemoryTelemetryStore, PgTelemetryStore, StoredRow, TelemetryStore};
