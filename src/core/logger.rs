//! Handle onto one node of a logger hierarchy

use super::{
    appender::OutputHandle,
    error::Result,
    hierarchy::{Hierarchy, LiveState, NodeId, ROOT},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A named logger.
///
/// Handles are cheap to clone and compare equal when they refer to the same
/// node. Reading the effective level and outputs, and emitting, never takes
/// the tree lock.
#[derive(Clone)]
pub struct Logger {
    hierarchy: Hierarchy,
    id: NodeId,
    live: Arc<LiveState>,
}

impl Logger {
    pub(crate) fn new(hierarchy: Hierarchy, id: NodeId, live: Arc<LiveState>) -> Self {
        Self {
            hierarchy,
            id,
            live,
        }
    }

    /// Full dotted name; empty for the root
    pub fn name(&self) -> &str {
        &self.live.name
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT
    }

    pub fn parent(&self) -> Option<Logger> {
        self.hierarchy.parent_of(self.id)
    }

    /// Look up a descendant, creating missing loggers.
    ///
    /// `name` is taken as absolute when it equals this logger's name or
    /// starts with it followed by `.`; otherwise it is relative.
    ///
    /// ```
    /// use rust_logger_hierarchy::prelude::*;
    ///
    /// let hierarchy = Hierarchy::new();
    /// let a = hierarchy.get_logger("a");
    ///
    /// assert_eq!(a.get_child("b.c").name(), "a.b.c");
    /// assert_eq!(a.get_child("a.b.c"), a.get_child("b.c"));
    /// assert_eq!(a.get_child("a"), a);
    /// ```
    pub fn get_child(&self, name: &str) -> Logger {
        self.hierarchy.child_of(self.id, &self.live.name, name)
    }

    /// Set or unset (`None`) the explicit level.
    ///
    /// With `inherit == false` the level applies to this logger only:
    /// descendants keep resolving against the loggers above it. Unsetting
    /// also clears that flag. The root level cannot be unset.
    pub fn set_level(&self, level: impl Into<Option<LogLevel>>, inherit: bool) -> Result<()> {
        self.hierarchy.set_level(self.id, level.into(), inherit)
    }

    pub fn explicit_level(&self) -> Option<LogLevel> {
        self.hierarchy.explicit_level_of(self.id)
    }

    /// Whether this logger's own settings stop at itself
    pub fn is_local(&self) -> bool {
        self.hierarchy.is_local(self.id)
    }

    /// Attach an output. Takes effect at the next [`Hierarchy::resolve`]
    /// or configuration apply.
    pub fn add_output(&self, output: OutputHandle, inherit: bool) {
        self.hierarchy.add_output(self.id, output, inherit)
    }

    #[inline]
    pub fn effective_level(&self) -> LogLevel {
        self.live.level()
    }

    pub fn effective_outputs(&self) -> Arc<[OutputHandle]> {
        self.live.outputs()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.live.level()
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        let metrics = self.hierarchy.metrics();
        if !self.is_enabled(level) {
            metrics.record_filtered();
            return;
        }

        // Level and outputs are separate snapshots: a record racing a commit
        // may pass the new level and still go to the previous output set.
        let entry = LogEntry::new(level, self.live.name.as_str(), message);
        Self::process_sync(&self.live.outputs(), &entry, metrics);
    }

    /// Write `entry` to every output, isolating each one's errors and panics
    /// so a failing sink never keeps the record from the others.
    fn process_sync(outputs: &[OutputHandle], entry: &LogEntry, metrics: &LoggerMetrics) -> bool {
        let mut has_error = false;

        for output in outputs {
            match catch_unwind(AssertUnwindSafe(|| output.append(entry))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Output '{}' failed for logger '{}': {}",
                        output.name(),
                        entry.logger_label(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Output '{}' panicked for logger '{}': {}. \
                         Other outputs continue to function.",
                        output.name(),
                        entry.logger_label(),
                        panic_message(&*panic_info)
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }
        has_error
    }

    /// Flush every effective output; returns the first error after trying all
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for output in self.live.outputs().iter() {
            match catch_unwind(AssertUnwindSafe(|| output.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Output '{}' panicked during flush: {}",
                        output.name(),
                        panic_message(&*panic_info)
                    );
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.live, &other.live)
    }
}

impl Eq for Logger {}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.effective_level())
            .field("outputs", &self.effective_outputs().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{MemoryAppender, OutputRegistry};
    use crate::core::{Appender, LoggerError};

    fn hierarchy_with(root_sink: &Arc<MemoryAppender>) -> Hierarchy {
        Hierarchy::builder()
            .output(OutputHandle::from_arc(root_sink.clone()))
            .registry(Arc::new(OutputRegistry::new()))
            .build()
    }

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn append(&self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn flush(&self) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn append(&self, _entry: &LogEntry) -> Result<()> {
            panic!("boom");
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_root_defaults() {
        let sink = Arc::new(MemoryAppender::new());
        let hierarchy = hierarchy_with(&sink);
        let root = hierarchy.root();

        assert!(root.is_root());
        assert_eq!(root.name(), "");
        assert_eq!(root.parent(), None);
        assert_eq!(root.effective_level(), LogLevel::Info);
        assert_eq!(root.explicit_level(), Some(LogLevel::Info));
        assert_eq!(root.effective_outputs().len(), 1);
    }

    #[test]
    fn test_get_child_relative_and_absolute() {
        let hierarchy = Hierarchy::new();
        let a = hierarchy.get_logger("a");
        let abc = a.get_child("b.c");

        assert_eq!(abc.name(), "a.b.c");
        assert_eq!(a.get_child("a.b.c"), abc);
        assert_eq!(a.get_child("a"), a);
        assert_eq!(a.get_child(""), a);
        assert_eq!(a.get_child("x.a.b").name(), "a.x.a.b");
        assert_eq!(abc.parent().unwrap().name(), "a.b");
        assert_eq!(hierarchy.get_logger("a..b."), hierarchy.get_logger("a.b"));
    }

    #[test]
    fn test_set_level_local_and_unset() {
        let hierarchy = Hierarchy::new();
        let a = hierarchy.get_logger("a");
        let ab = a.get_child("b");

        a.set_level(LogLevel::Error, false).unwrap();
        assert!(a.is_local());
        assert_eq!(a.effective_level(), LogLevel::Error);
        assert_eq!(ab.effective_level(), LogLevel::Info);

        a.set_level(None, false).unwrap();
        assert!(!a.is_local());
        assert_eq!(a.explicit_level(), None);
        assert_eq!(a.effective_level(), LogLevel::Info);

        assert!(matches!(
            hierarchy.root().set_level(None, true),
            Err(LoggerError::InvalidRootLevel)
        ));
    }

    #[test]
    fn test_log_filters_and_writes() {
        let sink = Arc::new(MemoryAppender::new());
        let hierarchy = hierarchy_with(&sink);
        let logger = hierarchy.get_logger("svc.http");

        logger.debug("hidden");
        logger.info("request served");
        logger.error(format!("status {}", 500));

        assert_eq!(sink.messages(), vec!["request served", "status 500"]);
        assert_eq!(sink.entries()[0].logger, "svc.http");
        assert_eq!(hierarchy.metrics().filtered_count(), 1);
        assert_eq!(hierarchy.metrics().total_logged(), 2);
    }

    #[test]
    fn test_add_output_needs_resolve() {
        let sink = Arc::new(MemoryAppender::new());
        let extra = Arc::new(MemoryAppender::named("extra"));
        let hierarchy = hierarchy_with(&sink);
        let logger = hierarchy.get_logger("a");

        logger.add_output(OutputHandle::from_arc(extra.clone()), true);
        logger.info("before");
        hierarchy.resolve();
        logger.get_child("b").info("after");

        assert_eq!(extra.messages(), vec!["after"]);
        assert_eq!(sink.messages(), vec!["before", "after"]);
    }

    #[test]
    fn test_failing_output_does_not_block_others() {
        let sink = Arc::new(MemoryAppender::new());
        let hierarchy = hierarchy_with(&sink);
        let root = hierarchy.root();

        root.add_output(OutputHandle::new(FailingAppender), true);
        root.add_output(OutputHandle::new(PanickingAppender), true);
        hierarchy.resolve();

        root.warn("still delivered");
        assert_eq!(sink.messages(), vec!["still delivered"]);
        assert_eq!(hierarchy.metrics().dropped_count(), 1);
        assert_eq!(hierarchy.metrics().total_logged(), 0);

        assert!(matches!(root.flush(), Err(LoggerError::WriterError(_))));
    }

    #[test]
    fn test_handles_share_live_state() {
        let hierarchy = Hierarchy::new();
        let first = hierarchy.get_logger("shared");
        let second = hierarchy.get_logger("shared");

        second.set_level(LogLevel::Trace, true).unwrap();
        assert!(first.is_enabled(LogLevel::Trace));
        assert_eq!(first, second);
        assert!(first.hierarchy().same_tree(second.hierarchy()));
    }
}
