pub mod cli;
pub mod collector;
pub mod config;
pub mod exporter;
pub mod run;
