pub mod alert;
pub mod contract;
pub mod exposition;
pub mod policy;
pub mod risk;
pub mod shutdown;
pub mod store;
pub mod telemetry;
