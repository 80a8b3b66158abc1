//! Per-run logger carrying the work order and job context.
//!
//! Each validation run gets its own logger that:
//! - Emits every message as a `tracing` event with `wo_id`/`job_id` fields
//! - Maintains a tail buffer for error diagnosis

use std::collections::VecDeque;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogConfig, LogLevel, MessagePrefix};

/// Logger scoped to one validation run.
pub struct RunLogger {
    work_order_id: String,
    job_id: String,
    config: LogConfig,
    /// Recent lines (bounded by `config.error_tail`).
    tail_buffer: Mutex<VecDeque<String>>,
}

impl RunLogger {
    pub fn new(
        work_order_id: impl Into<String>,
        job_id: impl Into<String>,
        config: LogConfig,
    ) -> Self {
        let capacity = config.error_tail;
        Self {
            work_order_id: work_order_id.into(),
            job_id: job_id.into(),
            config,
            tail_buffer: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn work_order_id(&self) -> &str {
        &self.work_order_id
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let wo_id = self.work_order_id.as_str();
        let job_id = self.job_id.as_str();
        match level {
            LogLevel::Trace => tracing::trace!(wo_id, job_id, "{}", message),
            LogLevel::Debug => tracing::debug!(wo_id, job_id, "{}", message),
            LogLevel::Info => tracing::info!(wo_id, job_id, "{}", message),
            LogLevel::Warn => tracing::warn!(wo_id, job_id, "{}", message),
            LogLevel::Error => tracing::error!(wo_id, job_id, "{}", message),
        }

        if self.config.error_tail > 0 {
            let formatted = self.format_message(message);
            let mut buffer = self.tail_buffer.lock();
            if buffer.len() >= self.config.error_tail {
                buffer.pop_front();
            }
            buffer.push_back(formatted);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        let msg = MessagePrefix::Phase.format(phase_name);
        self.log(LogLevel::Info, &msg);
    }

    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Get the current tail buffer contents.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] [{}/{}] {}", timestamp, self.work_order_id, self.job_id, message)
        } else {
            format!("[{}/{}] {}", self.work_order_id, self.job_id, message)
        }
    }
}

impl std::fmt::Debug for RunLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLogger")
            .field("work_order_id", &self.work_order_id)
            .field("job_id", &self.job_id)
            .field("config", &self.config)
            .finish()
    }
}
