//! # Rust Logger Hierarchy
//!
//! Hierarchical, dot-named loggers whose effective level and outputs are
//! resolved from their ancestors plus their own overrides.
//!
//! ## Features
//!
//! - **Inheritance**: `a.b.c` uses the closest level set on `a.b.c`, `a.b`,
//!   `a` or the root, and writes to every output declared along that chain
//! - **Local overrides**: a level or output can apply to one logger only
//! - **Whole-tree configuration**: apply a YAML or JSON snapshot; loggers
//!   created later pick it up automatically
//! - **Shared file handles**: every logger naming a file writes through one
//!   open handle, closed once nothing references it
//! - **Lock-free emission**: logging reads committed state only
//!
//! ## Example
//!
//! ```
//! use rust_logger_hierarchy::prelude::*;
//!
//! let hierarchy = Hierarchy::new();
//! hierarchy
//!     .apply_config(&HierarchyConfig::new(vec![
//!         LoggerConfig::root("info"),
//!         LoggerConfig::new("app.db", "debug"),
//!         LoggerConfig::new("app.db.pool", "error").local(true),
//!     ]))
//!     .unwrap();
//!
//! let pool = hierarchy.get_logger("app.db.pool");
//! assert_eq!(pool.effective_level(), LogLevel::Error);
//! assert_eq!(pool.get_child("conn").effective_level(), LogLevel::Debug);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;
pub mod manager;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleAppender, ConsoleStream, FileAppender, MemoryAppender, OutputKind, OutputRegistry,
    };
    pub use crate::core::{
        Appender, Hierarchy, HierarchyBuilder, HierarchyConfig, LogEntry, LogLevel, Logger,
        LoggerConfig, LoggerError, LoggerMetrics, LoggerReport, NamePattern, OutputConfig,
        OutputHandle, ResolutionPhase, Result, TimestampFormat,
    };
    pub use crate::manager::{default_manager, LoggerManager};
}

pub use appenders::{ConsoleAppender, FileAppender, MemoryAppender, OutputKind, OutputRegistry};
pub use core::{
    Appender, Hierarchy, HierarchyBuilder, HierarchyConfig, LogEntry, LogLevel, Logger,
    LoggerConfig, LoggerError, LoggerMetrics, LoggerReport, NamePattern, OutputConfig,
    OutputHandle, ResolutionPhase, Result, TimestampFormat,
};
pub use manager::{default_manager, LoggerManager};

/// Logger `name` from the default manager, created if missing
pub fn get_logger(name: &str) -> Logger {
    default_manager().get_logger(name)
}

pub fn root_logger() -> Logger {
    default_manager().root_logger()
}

/// Realized loggers of the default manager matching `pattern`
pub fn find_loggers(pattern: &str) -> Result<Vec<Logger>> {
    default_manager().find_loggers(pattern)
}

/// Replace the default manager's configuration
pub fn apply_config(config: &HierarchyConfig) -> Result<()> {
    default_manager().apply_config(config)
}
