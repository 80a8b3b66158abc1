//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::models::{PriorityTable, Stage};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Execution stage.
    #[serde(default)]
    pub stage: StageSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Object store settings.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Source priority lists per track category.
    #[serde(default)]
    pub priorities: PriorityTable,
}

/// Execution stage selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSettings {
    /// `prod` uses production path roots; anything else prefers preprod.
    #[serde(default)]
    pub stage: Stage,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Number of recent lines kept per run.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Timestamp mirrored log lines.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_error_tail() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            error_tail: default_error_tail(),
            show_timestamps: true,
        }
    }
}

impl LoggingSettings {
    /// Per-run logger configuration.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            error_tail: self.error_tail as usize,
            show_timestamps: self.show_timestamps,
        }
    }
}

/// File object store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding one sub-directory per bucket.
    #[serde(default = "default_storage_root")]
    pub root: String,
}

fn default_storage_root() -> String {
    "object_store".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

/// Configuration sections for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Stage,
    Logging,
    Storage,
    Priorities,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Stage => "stage",
            ConfigSection::Logging => "logging",
            ConfigSection::Storage => "storage",
            ConfigSection::Priorities => "priorities",
        }
    }

    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Stage,
            ConfigSection::Logging,
            ConfigSection::Storage,
            ConfigSection::Priorities,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serialize() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("[stage]"));
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[[priorities.video]]"));
    }

    #[test]
    fn partial_settings_use_defaults() {
        let settings: Settings = toml::from_str("[stage]\nstage = \"prod\"\n").unwrap();
        assert_eq!(settings.stage.stage, Stage::Production);
        assert_eq!(settings.logging.error_tail, 20);
        assert_eq!(settings.priorities, PriorityTable::default());
    }

    #[test]
    fn logging_settings_map_to_log_config() {
        let settings = LoggingSettings {
            level: LogLevel::Debug,
            error_tail: 5,
            show_timestamps: false,
        };
        let config = settings.to_log_config();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.error_tail, 5);
    }
}
