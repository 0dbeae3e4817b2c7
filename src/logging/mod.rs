//! Console status lines and the JSONL access log.
//!
//! Console lines are timestamped and filtered by the configured
//! [`LogLevel`]. Every handled HTTP request is appended as one JSON object
//! per line to `~/.metricdash/access-log.jsonl` (configurable). Write
//! failures are swallowed: logging never takes the server down.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::config::LogLevel;
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Access log entry
// ---------------------------------------------------------------------------

/// One handled request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    /// First eight characters of the session id, if the request had one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session: Option<String>,
    pub duration_ms: u64,
    /// Short description of the navigation event applied, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event: Option<String>,
}

impl AccessLogEntry {
    pub fn new(method: &str, path: &str, status: u16, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            method: method.to_string(),
            path: path.to_string(),
            status,
            session: None,
            duration_ms,
            event: None,
        }
    }

    pub fn with_session(mut self, session_id: &str) -> Self {
        self.session = Some(session_id.chars().take(8).collect());
        self
    }

    pub fn with_event(mut self, event: Option<String>) -> Self {
        self.event = event;
        self
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Logger {
    level: LogLevel,
    access_log: Option<PathBuf>,
}

impl Logger {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            level: config.level,
            access_log: if config.enabled {
                config.resolved_path()
            } else {
                None
            },
        }
    }

    /// Logger that only prints errors and writes no file.
    pub fn silent() -> Self {
        Self {
            level: LogLevel::Error,
            access_log: None,
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    pub fn error(&self, msg: &str) {
        self.emit(LogLevel::Error, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(LogLevel::Warn, msg);
    }

    pub fn info(&self, msg: &str) {
        self.emit(LogLevel::Info, msg);
    }

    pub fn debug(&self, msg: &str) {
        self.emit(LogLevel::Debug, msg);
    }

    fn emit(&self, level: LogLevel, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        let line = format_line(level, msg, Local::now());
        match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{line}"),
            LogLevel::Info | LogLevel::Debug => println!("{line}"),
        }
    }

    /// Print a brief access line and append the entry to the access log.
    pub fn record(&self, entry: &AccessLogEntry) {
        if self.enabled(LogLevel::Info) {
            let status = if entry.status >= 400 {
                entry.status.to_string().red()
            } else {
                entry.status.to_string().green()
            };
            println!(
                "{} {} {} {} {}ms",
                Local::now().format("%H:%M:%S").to_string().dimmed(),
                entry.method,
                entry.path,
                status,
                entry.duration_ms,
            );
        }

        if let Some(path) = &self.access_log {
            let _ = append_entry(path, entry);
        }
    }

    pub fn access_log_path(&self) -> Option<&Path> {
        self.access_log.as_deref()
    }
}

/// Format a console line: `2026-10-18 12:00:00 INFO  message`.
pub fn format_line(level: LogLevel, msg: &str, now: DateTime<Local>) -> String {
    let tag = match level {
        LogLevel::Error => "ERROR".red().bold(),
        LogLevel::Warn => "WARN ".yellow().bold(),
        LogLevel::Info => "INFO ".cyan(),
        LogLevel::Debug => "DEBUG".dimmed(),
    };
    format!("{} {tag} {msg}", now.format("%Y-%m-%d %H:%M:%S"))
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_entry(path: &Path, entry: &AccessLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;
    Ok(())
}

/// Read the last `n` entries of an access log, oldest first.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_recent(path: &Path, n: usize) -> Vec<AccessLogEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let entries: Vec<AccessLogEntry> = BufReader::new(file)
        .lines()
        .map_while(|line| line.ok())
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect();

    let skip = entries.len().saturating_sub(n);
    entries.into_iter().skip(skip).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
