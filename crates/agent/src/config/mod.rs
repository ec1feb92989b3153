mod loader;
mod schema;

pub use loader::{load_from_file, load_from_str, validate, LoadError};
pub use schema::{AgentConfig, BackoffConfig};
