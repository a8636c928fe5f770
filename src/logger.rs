//! Logging setup
//!
//! The dashboard's log levels are a set, not a threshold: listing `ERROR`
//! and `DEBUG` without `INFO` drops info records. Records go to stderr, an
//! optional log file, and an in-memory [`LogBuffer`].

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::constants::{APP_NAME, LOG_FILE_NAME};

/// Dashboard log level names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `log` crate level records of this kind are emitted at.
    pub fn as_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Trace,
            LogLevel::Log => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }

    /// Everything except `DEBUG`.
    pub fn default_levels() -> Vec<LogLevel> {
        vec![LogLevel::Info, LogLevel::Log, LogLevel::Warn, LogLevel::Error]
    }
}

/// Shared in-memory log that can be used across the application
#[derive(Clone, Default)]
pub struct LogBuffer {
    logs: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Local::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(formatted_message);
        }
    }

    /// Get all logs, newest first
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    pub fn len(&self) -> usize {
        self.logs.lock().map(|logs| logs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

/// Build the dispatch for `levels` without installing it.
///
/// Split from [`init`] so the filtering can be exercised without touching
/// the global logger.
pub fn dispatch(levels: &[LogLevel], buffer: &LogBuffer, log_file: Option<PathBuf>) -> Result<fern::Dispatch> {
    let allowed: HashSet<log::Level> = levels.iter().map(|l| l.as_level()).collect();

    let mut console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        console = console.chain(file);
    }

    let buffer = buffer.clone();
    Ok(fern::Dispatch::new()
        .level(log::LevelFilter::Trace)
        .filter(move |metadata| allowed.contains(&metadata.level()))
        .chain(console)
        .chain(fern::Output::call(move |record| {
            buffer.log(format!("{} {}", record.level(), record.args()));
        })))
}

/// Install the global logger. Returns the in-memory buffer it feeds.
pub fn init(levels: &[LogLevel], log_to_file: bool) -> Result<LogBuffer> {
    let buffer = LogBuffer::new();
    let log_file = if log_to_file { Some(get_log_file_path()?) } else { None };

    dispatch(levels, &buffer, log_file)?
        .apply()
        .context("Logger already initialized")?;
    Ok(buffer)
}

/// Location of the log file in the local data directory
pub fn get_log_file_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))
        .map(|dir| dir.join(APP_NAME).join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogLevel::Debug.as_level(), log::Level::Trace);
        assert_eq!(LogLevel::Log.as_level(), log::Level::Debug);
        assert_eq!(LogLevel::Error.as_level(), log::Level::Error);
    }

    #[test]
    fn test_buffer_is_newest_first() {
        let buffer = LogBuffer::new();
        buffer.log("first".to_string());
        buffer.log("second".to_string());

        let logs = buffer.get_logs();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].ends_with("second"));
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
