//! Appender trait for log output destinations, and the shared handle nodes hold

use super::{error::Result, log_entry::LogEntry};
use std::fmt;
use std::sync::Arc;

/// A sink that log records are written to.
///
/// One appender may be referenced by many logger nodes at once, so writes
/// go through `&self`; implementations synchronize internally.
pub trait Appender: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Shared reference to an appender.
///
/// Two handles are equal when they point at the same underlying sink, which
/// is what output de-duplication across the hierarchy keys on.
#[derive(Clone)]
pub struct OutputHandle {
    sink: Arc<dyn Appender>,
}

impl OutputHandle {
    pub fn new<A: Appender + 'static>(appender: A) -> Self {
        Self {
            sink: Arc::new(appender),
        }
    }

    pub fn from_arc(sink: Arc<dyn Appender>) -> Self {
        Self { sink }
    }

    /// Whether both handles write to the same sink
    pub fn same_sink(&self, other: &OutputHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.sink), Arc::as_ptr(&other.sink))
    }

    pub fn name(&self) -> &str {
        self.sink.name()
    }

    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        self.sink.append(entry)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }
}

impl PartialEq for OutputHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_sink(other)
    }
}

impl Eq for OutputHandle {}

impl fmt::Debug for OutputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputHandle")
            .field("name", &self.name())
            .finish()
    }
}

/// Append `extra` to `set`, skipping sinks already present
pub(crate) fn extend_unique(set: &mut Vec<OutputHandle>, extra: &[OutputHandle]) {
    for handle in extra {
        if !set.iter().any(|existing| existing.same_sink(handle)) {
            set.push(handle.clone());
        }
    }
}
