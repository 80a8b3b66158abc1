//! Material validation runner (mvs)
//!
//! Reads one validation event, validates the referenced material against
//! its work order and saves the consolidated material to the file object
//! store. Statuses go to a JSON lines file or to the log.
//!
//! A rejected material exits successfully because its failure has been
//! reported as a status. Only an unreadable input material exits non-zero.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mvs_core::config::{ConfigManager, ConfigSection};
use mvs_core::logging::{init_tracing, LogLevel};
use mvs_core::models::{Stage, ValidationEvent};
use mvs_core::orchestrator::{RunOutcome, Validator};
use mvs_core::status::{JsonLinesStatusSender, StatusSender, TracingStatusSender};
use mvs_core::storage::FileObjectStore;

/// Command-line arguments for mvs
#[derive(Parser, Debug)]
#[command(name = "mvs")]
#[command(about = "Validate a material against its work order and save the result")]
#[command(version)]
struct Args {
    /// Validation event JSON file
    #[arg(short, long)]
    event: PathBuf,

    /// Settings file, created with defaults if missing
    #[arg(short, long, default_value = "mvs.toml", env = "MVS_CONFIG")]
    config: PathBuf,

    /// Execution stage (prod or preprod), overrides the settings file
    #[arg(long, env = "MVS_STAGE")]
    stage: Option<String>,

    /// Root directory of the file object store
    #[arg(long, env = "MVS_STORE_ROOT")]
    store_root: Option<PathBuf>,

    /// Append statuses to this JSON lines file instead of logging them
    #[arg(long)]
    status_log: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Write the stage, store root and log level overrides back to the
    /// settings file
    #[arg(long)]
    save_overrides: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigManager::new(&args.config);
    config
        .load_or_create()
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;

    let mut overridden = Vec::new();
    if let Some(level) = &args.log_level {
        config.settings_mut().logging.level =
            level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        overridden.push(ConfigSection::Logging);
    }
    if let Some(stage) = &args.stage {
        config.settings_mut().stage.stage = Stage::from_name(stage);
        overridden.push(ConfigSection::Stage);
    }
    if let Some(root) = &args.store_root {
        config.settings_mut().storage.root = root.to_string_lossy().into_owned();
        overridden.push(ConfigSection::Storage);
    }

    init_tracing(config.settings().logging.level);

    if args.save_overrides {
        for section in overridden {
            config.update_section(section).with_context(|| {
                format!("Failed to save [{}] to {}", section.table_name(), args.config.display())
            })?;
            info!("Saved [{}] to {}", section.table_name(), args.config.display());
        }
    }
    let settings = config.into_settings();

    let content = tokio::fs::read_to_string(&args.event)
        .await
        .with_context(|| format!("Failed to read event {}", args.event.display()))?;
    let event: ValidationEvent = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event {}", args.event.display()))?;

    info!(
        "Validating job {} (stage {}, store {})",
        event.job_id, settings.stage.stage, settings.storage.root
    );

    let store = Arc::new(FileObjectStore::new(&settings.storage.root));
    let status: Arc<dyn StatusSender> = match &args.status_log {
        Some(path) => Arc::new(JsonLinesStatusSender::new(path)),
        None => Arc::new(TracingStatusSender),
    };
    let validator = Validator::from_settings(&settings, store, status);

    let outcome = validator
        .validate_and_save(&event)
        .await
        .with_context(|| format!("Validation of job {} failed", event.job_id))?;

    match outcome {
        RunOutcome::Saved { mat_id, receipt } => {
            info!("Material {} saved to {}", mat_id, receipt.locator());
            println!("{}", serde_json::to_string(&receipt)?);
        }
        RunOutcome::Rejected {
            kind,
            error_code,
            message,
        } => {
            info!(
                "Material rejected ({}, code {}): {}",
                kind.status_message(),
                error_code,
                message
            );
        }
    }

    Ok(())
}
