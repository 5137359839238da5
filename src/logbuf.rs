use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub module: String,
    pub message: String,
}

/// Bounded in-memory buffer of recent log entries, owned by `AppState` and
/// inspectable through the admin API. Every entry is also emitted as a
/// `tracing` event, so the buffer never replaces the normal log output.
pub struct LogBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, level: LogLevel, module: &str, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!(module = module, "{message}"),
            LogLevel::Info => tracing::info!(module = module, "{message}"),
            LogLevel::Warn => tracing::warn!(module = module, "{message}"),
            LogLevel::Error => tracing::error!(module = module, "{message}"),
        }

        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            module: module.to_string(),
            message,
        };

        let mut entries = self.entries.lock().unwrap();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn debug(&self, module: &str, message: impl Into<String>) {
        self.record(LogLevel::Debug, module, message);
    }

    pub fn info(&self, module: &str, message: impl Into<String>) {
        self.record(LogLevel::Info, module, message);
    }

    pub fn warn(&self, module: &str, message: impl Into<String>) {
        self.record(LogLevel::Warn, module, message);
    }

    pub fn error(&self, module: &str, message: impl Into<String>) {
        self.record(LogLevel::Error, module, message);
    }

    pub fn all(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn errors_only(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let buffer = LogBuffer::new(10);
        buffer.info("intake", "first");
        buffer.warn("admin", "second");

        let entries = buffer.all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].module, "intake");
        assert_eq!(entries[1].level, LogLevel::Warn);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.info("intake", format!("entry {i}"));
        }

        let entries = buffer.all();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "entry 2");
        assert_eq!(entries[2].message, "entry 4");
    }

    #[test]
    fn test_errors_only_filters() {
        let buffer = LogBuffer::new(10);
        buffer.info("intake", "fine");
        buffer.error("intake", "broken");
        buffer.debug("admin", "noise");
        buffer.error("admin", "also broken");

        let errors = buffer.errors_only();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "broken");
        assert_eq!(errors[1].message, "also broken");
    }

    #[test]
    fn test_clear_empties_buffer() {
        let buffer = LogBuffer::new(10);
        buffer.info("intake", "something");
        buffer.clear();
        assert!(buffer.all().is_empty());
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let json = serde_json::to_string(&LogLevel::Error).unwrap();
        assert_eq!(json, r#""ERROR""#);
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
    }
}
