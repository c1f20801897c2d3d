//! Log entry structure

use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

thread_local! {
    static THREAD_LABEL: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Thread name if it has one, otherwise its id; cached per thread
fn thread_label() -> String {
    THREAD_LABEL.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let current = std::thread::current();
                match current.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", current.id()),
                }
            })
            .clone()
    })
}

/// A single record emitted through a logger node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Name of the emitting logger; empty for the root
    pub logger: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread: String,
}

impl LogEntry {
    /// Escape line breaks so one record always stays on one line
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, logger: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            level,
            logger: logger.into(),
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Utc::now(),
            thread: thread_label(),
        }
    }

    /// Logger name as printed; the root shows up as `root`
    pub fn logger_label(&self) -> &str {
        if self.logger.is_empty() {
            "root"
        } else {
            &self.logger
        }
    }

    /// Render as one line of text, without the trailing newline
    pub fn to_text(&self, timestamp_format: &TimestampFormat) -> String {
        format!(
            "[{}] [{:5}] [{}] {}",
            timestamp_format.format(&self.timestamp),
            self.level.to_str(),
            self.logger_label(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_single_line() {
        let entry = LogEntry::new(LogLevel::Info, "a.b", "first\nERROR fake\r\tend");
        assert_eq!(entry.message, "first\\nERROR fake\\r\\tend");
    }

    #[test]
    fn test_root_label() {
        assert_eq!(LogEntry::new(LogLevel::Info, "", "x").logger_label(), "root");
        assert_eq!(LogEntry::new(LogLevel::Info, "db", "x").logger_label(), "db");
    }

    #[test]
    fn test_text_rendering() {
        let entry = LogEntry::new(LogLevel::Warn, "net.http", "slow response");
        let line = entry.to_text(&TimestampFormat::UnixMillis);
        assert!(line.ends_with("[WARN ] [net.http] slow response"), "{line}");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_named_thread_label() {
        let handle = std::thread::Builder::new()
            .name("worker-7".into())
            .spawn(|| LogEntry::new(LogLevel::Debug, "a", "m").thread)
            .unwrap();
        assert_eq!(handle.join().unwrap(), "worker-7");
    }
}
