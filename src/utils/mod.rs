//! Configuration and logging setup

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError, MusicSettings, PollSettings, VehicleSettings};
