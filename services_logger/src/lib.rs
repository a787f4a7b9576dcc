//! # Logger Service
//!
//! This crate implements structured logging.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Entries are kept in a bounded in-memory buffer that tests and the demo
//! console can inspect, and every entry is also forwarded to the [`log`]
//! facade so an embedding host can attach whatever backend it uses.

use std::collections::VecDeque;
use std::fmt;

/// Default number of entries retained
pub const DEFAULT_CAPACITY: usize = 256;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    fn as_log(&self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source component (if known), e.g. `keynav.marks`
    pub source: Option<String>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source component
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field value
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(source) = &self.source {
            write!(f, " {}:", source)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Bounded structured logger
///
/// Oldest entries are evicted once `capacity` is reached. Entries below the
/// minimum level are dropped entirely, both here and for the facade.
#[derive(Debug, Clone)]
pub struct Logger {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    min_level: LogLevel,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            min_level: LogLevel::Debug,
        }
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Records an entry and forwards it to the `log` facade
    pub fn record(&mut self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let target = entry.source.as_deref().unwrap_or("keynav");
        if self.facade_enabled(target, entry.level) {
            if entry.fields.is_empty() {
                log::log!(target: target, entry.level.as_log(), "{}", entry.message);
            } else {
                let fields: Vec<String> = entry
                    .fields
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                log::log!(
                    target: target,
                    entry.level.as_log(),
                    "{} {}",
                    entry.message,
                    fields.join(" ")
                );
            }
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn facade_enabled(&self, target: &str, level: LogLevel) -> bool {
        log::log_enabled!(target: target, level.as_log())
    }

    pub fn debug(&mut self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Debug, message).with_source(source));
    }

    pub fn info(&mut self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Info, message).with_source(source));
    }

    pub fn warn(&mut self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Warn, message).with_source(source));
    }

    pub fn error(&mut self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Error, message).with_source(source));
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any retained entry has `level` and contains `needle`
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// Removes and returns all retained entries
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
