//! Configuration management for the validation service.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use mvs_core::config::{ConfigManager, ConfigSection};
//! use mvs_core::models::Stage;
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Stage: {}", config.settings().stage.stage);
//!
//! config.settings_mut().stage.stage = Stage::Production;
//! config.update_section(ConfigSection::Stage).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LoggingSettings, Settings, StageSettings, StorageSettings};
