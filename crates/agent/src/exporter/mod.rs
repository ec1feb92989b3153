mod client;
mod retry;

pub use client::{ExportError, IngestClient};
pub use retry::RetryPolicy;
