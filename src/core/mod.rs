//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pattern;
mod resolver;
pub mod timestamp;

pub use appender::{Appender, OutputHandle};
pub use config::{HierarchyConfig, LoggerConfig, OutputConfig, ROOT_PATTERN};
pub use error::{LoggerError, Result};
pub use hierarchy::{Hierarchy, HierarchyBuilder, LoggerReport};
pub use log_entry::LogEntry;
pub use log_level::{LogLevel, ResolutionPhase};
pub use logger::Logger;
pub use metrics::LoggerMetrics;
pub use pattern::NamePattern;
pub use timestamp::TimestampFormat;
