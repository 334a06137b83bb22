pub mod config;
pub mod error;
pub mod quotes;
pub mod telemetry;
