//! Logger metrics for observability
//!
//! Counters for emission health (records written, filtered, dropped) and
//! for reconfiguration activity (config applications, committed level and
//! output changes, nodes created).

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by every logger of one hierarchy
///
/// # Example
///
/// ```
/// use rust_logger_hierarchy::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records written to every output without error
    total_logged: AtomicU64,

    /// Records below the logger's effective level
    filtered_count: AtomicU64,

    /// Records where at least one output failed or panicked
    dropped_count: AtomicU64,

    /// Completed or attempted configuration applications
    reconfigurations: AtomicU64,

    /// Committed level changes
    level_changes: AtomicU64,

    /// Committed output-set changes
    output_changes: AtomicU64,

    /// Logger nodes created, root excluded
    nodes_created: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            reconfigurations: AtomicU64::new(0),
            level_changes: AtomicU64::new(0),
            output_changes: AtomicU64::new(0),
            nodes_created: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reconfigurations(&self) -> u64 {
        self.reconfigurations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn level_changes(&self) -> u64 {
        self.level_changes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn output_changes(&self) -> u64 {
        self.output_changes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn nodes_created(&self) -> u64 {
        self.nodes_created.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_reconfiguration(&self) -> u64 {
        self.reconfigurations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_level_change(&self) -> u64 {
        self.level_changes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_output_change(&self) -> u64 {
        self.output_changes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_node_created(&self) -> u64 {
        self.nodes_created.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been emitted yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.reconfigurations.store(0, Ordering::Relaxed);
        self.level_changes.store(0, Ordering::Relaxed);
        self.output_changes.store(0, Ordering::Relaxed);
        self.nodes_created.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            reconfigurations: AtomicU64::new(self.reconfigurations()),
            level_changes: AtomicU64::new(self.level_changes()),
            output_changes: AtomicU64::new(self.output_changes()),
            nodes_created: AtomicU64::new(self.nodes_created()),
        }
    }
}
