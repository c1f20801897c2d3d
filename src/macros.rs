//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use rust_logger_hierarchy::prelude::*;
//! use rust_logger_hierarchy::info;
//!
//! let logger = Hierarchy::new().get_logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_logger_hierarchy::prelude::*;
/// # let logger = Hierarchy::new().get_logger("app");
/// use rust_logger_hierarchy::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// ```
/// # use rust_logger_hierarchy::prelude::*;
/// # let logger = Hierarchy::new().get_logger("app.calc");
/// # logger.set_level(LogLevel::Trace, true).unwrap();
/// use rust_logger_hierarchy::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_logger_hierarchy::prelude::*;
/// # let logger = Hierarchy::new().get_logger("storage");
/// use rust_logger_hierarchy::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::{MemoryAppender, OutputRegistry};
    use crate::core::{Hierarchy, LogLevel, Logger, OutputHandle};
    use std::sync::Arc;

    fn logger_with(sink: &Arc<MemoryAppender>) -> Logger {
        Hierarchy::builder()
            .level(LogLevel::Trace)
            .output(OutputHandle::from_arc(sink.clone()))
            .registry(Arc::new(OutputRegistry::new()))
            .build()
            .get_logger("macros")
    }

    #[test]
    fn test_log_macro() {
        let sink = Arc::new(MemoryAppender::new());
        let logger = logger_with(&sink);

        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);

        assert_eq!(sink.messages(), vec!["Test message", "Formatted: 42"]);
    }

    #[test]
    fn test_level_macros() {
        let sink = Arc::new(MemoryAppender::new());
        let logger = logger_with(&sink);

        trace!(logger, "Value: {}", 10);
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");

        let levels: Vec<LogLevel> = sink.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, LogLevel::ALL.to_vec());
        assert_eq!(sink.messages_at(LogLevel::Warn), vec!["Retry 1 of 3"]);
    }
}
