pub mod config;
pub mod error;
pub mod opportunities;
pub mod telemetry;
