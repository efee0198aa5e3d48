//! Configuration Module
//!
//! Configuration loading for the odds warehouse client.

mod settings;

pub use settings::{ClientConfig, ConfigError, ENDPOINT_VAR};
