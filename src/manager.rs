//! Flat lookup over a hierarchy
//!
//! [`LoggerManager`] addresses loggers by full name and selects them in bulk
//! with glob patterns (see [`NamePattern`]). It is a view over one
//! [`Hierarchy`]; all state lives in the tree.

use crate::core::{
    Hierarchy, HierarchyConfig, LogLevel, Logger, LoggerReport, NamePattern, Result,
};
use std::sync::OnceLock;

/// Name-based access to the loggers of one hierarchy
///
/// # Example
///
/// ```
/// use rust_logger_hierarchy::prelude::*;
///
/// let manager = LoggerManager::new();
/// manager.get_logger("app.db");
/// manager.get_logger("app.http");
///
/// let changed = manager.set_level_matching("app.*", LogLevel::Debug, true).unwrap();
/// assert_eq!(changed, 2);
/// assert_eq!(manager.get_logger("app.db.pool").effective_level(), LogLevel::Debug);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerManager {
    hierarchy: Hierarchy,
}

impl LoggerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hierarchy(Hierarchy::new())
    }

    pub fn with_hierarchy(hierarchy: Hierarchy) -> Self {
        Self { hierarchy }
    }

    /// The logger called `name`, created if missing; `""` is the root
    pub fn get_logger(&self, name: &str) -> Logger {
        self.hierarchy.get_logger(name)
    }

    pub fn root_logger(&self) -> Logger {
        self.hierarchy.root()
    }

    /// Realized loggers whose names match `pattern`, sorted by name.
    /// Never creates loggers.
    pub fn find_loggers(&self, pattern: &str) -> Result<Vec<Logger>> {
        let pattern = NamePattern::compile(pattern)?;
        Ok(self.hierarchy.loggers_where(|name| pattern.matches(name)))
    }

    /// Set the explicit level of every realized logger matching `pattern`
    /// and resolve once. Returns the number of loggers matched.
    pub fn set_level_matching(
        &self,
        pattern: &str,
        level: impl Into<Option<LogLevel>>,
        inherit: bool,
    ) -> Result<usize> {
        let pattern = NamePattern::compile(pattern)?;
        self.hierarchy
            .set_level_where(|name| pattern.matches(name), level.into(), inherit)
    }

    pub fn apply_config(&self, config: &HierarchyConfig) -> Result<()> {
        self.hierarchy.apply_config(config)
    }

    pub fn report(&self) -> Vec<LoggerReport> {
        self.hierarchy.report()
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }
}

/// The process-wide manager behind the crate-level helpers
pub fn default_manager() -> &'static LoggerManager {
    static MANAGER: OnceLock<LoggerManager> = OnceLock::new();
    MANAGER.get_or_init(LoggerManager::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{MemoryAppender, OutputRegistry};
    use crate::core::{LoggerConfig, LoggerError, OutputHandle};
    use std::sync::Arc;

    fn manager() -> LoggerManager {
        LoggerManager::with_hierarchy(
            Hierarchy::builder()
                .output(OutputHandle::new(MemoryAppender::new()))
                .registry(Arc::new(OutputRegistry::new()))
                .build(),
        )
    }

    fn names(loggers: &[Logger]) -> Vec<&str> {
        loggers.iter().map(Logger::name).collect()
    }

    #[test]
    fn test_logger_creation() {
        let manager = manager();
        let a = manager.get_logger("a");
        let b = manager.get_logger("b");

        assert_ne!(a, b);
        assert_eq!(a, manager.get_logger("a"));
        assert_eq!(b, manager.get_logger("b"));
        assert_eq!(manager.get_logger(""), manager.root_logger());
    }

    #[test]
    fn test_find_loggers() {
        let manager = manager();
        for name in ["a", "b", "a.b", "a.b.c"] {
            manager.get_logger(name);
        }

        assert_eq!(names(&manager.find_loggers("a").unwrap()), vec!["a"]);
        assert_eq!(names(&manager.find_loggers("a.*").unwrap()), vec!["a.b"]);
        assert_eq!(
            names(&manager.find_loggers("a.**").unwrap()),
            vec!["a", "a.b", "a.b.c"]
        );
        assert_eq!(
            names(&manager.find_loggers("*").unwrap()),
            vec!["", "a", "a.b", "a.b.c", "b"]
        );
        assert_eq!(names(&manager.find_loggers("").unwrap()), vec![""]);
        assert!(manager.find_loggers("zzz.*").unwrap().is_empty());
    }

    #[test]
    fn test_find_never_creates() {
        let manager = manager();
        manager.get_logger("a");
        let before = manager.hierarchy().logger_count();

        manager.find_loggers("a.b.c").unwrap();
        assert_eq!(manager.hierarchy().logger_count(), before);
    }

    #[test]
    fn test_invalid_pattern() {
        let manager = manager();
        assert!(matches!(
            manager.find_loggers("a.[").unwrap_err(),
            LoggerError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_set_level_matching() {
        let manager = manager();
        for name in ["svc.a", "svc.b", "svc.a.x", "other"] {
            manager.get_logger(name);
        }

        let matched = manager
            .set_level_matching("svc.*", LogLevel::Warn, false)
            .unwrap();
        assert_eq!(matched, 2);
        assert_eq!(manager.get_logger("svc.a").effective_level(), LogLevel::Warn);
        assert_eq!(manager.get_logger("svc.a.x").effective_level(), LogLevel::Info);
        assert_eq!(manager.get_logger("other").effective_level(), LogLevel::Info);

        assert!(matches!(
            manager.set_level_matching("*", None, true),
            Err(LoggerError::InvalidRootLevel)
        ));
    }

    #[test]
    fn test_apply_config_and_report() {
        let manager = manager();
        manager.get_logger("a.b.c");
        manager
            .apply_config(&HierarchyConfig::new(vec![
                LoggerConfig::new("a.b", "debug").local(true),
            ]))
            .unwrap();

        let report = manager.report();
        let ab = report.iter().find(|r| r.name == "a.b").unwrap();
        assert_eq!(ab.explicit_level, Some(LogLevel::Debug));
        assert_eq!(ab.effective_level, LogLevel::Debug);
        assert!(ab.local);
        assert_eq!(ab.outputs, vec!["memory"]);

        let abc = report.iter().find(|r| r.name == "a.b.c").unwrap();
        assert_eq!(abc.effective_level, LogLevel::Info);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json[0]["name"], "");
    }

    #[test]
    fn test_default_manager_is_shared() {
        let first = default_manager().get_logger("manager.tests.shared");
        let second = default_manager().get_logger("manager.tests.shared");
        assert_eq!(first, second);
    }
}
