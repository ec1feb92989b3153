mod alerts;
mod error;
mod health;
mod ingest;
mod metrics;
mod router;

pub use error::ApiError;
pub use router::{router, AppState};
