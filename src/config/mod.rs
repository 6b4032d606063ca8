//! Configuration models for the monitor service.

pub mod monitor;

pub use monitor::{MonitorConfig, StoreBackendConfig};
