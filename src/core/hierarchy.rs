//! The logger tree
//!
//! Nodes live in an arena owned by [`Tree`]; a node refers to its parent and
//! children by [`NodeId`], so there is no shared ownership inside the tree.
//! Each node also owns an `Arc<LiveState>` holding its committed level and
//! outputs: that is the only part emission reads, and it is shared with
//! every [`Logger`] handle for the node so the hot path never takes the
//! tree lock.
//!
//! Structural changes and resolution run under the tree-wide write lock.

use super::appender::OutputHandle;
use super::config::HierarchyConfig;
use super::error::{LoggerError, Result};
use super::log_level::{LogLevel, ResolutionPhase};
use super::logger::Logger;
use super::metrics::LoggerMetrics;
use crate::appenders::registry::{stderr_handle, OutputRegistry};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

/// Committed state of one node, read by emission.
///
/// Level and outputs are stored independently; readers see each one
/// atomically but not the pair.
pub(crate) struct LiveState {
    pub(crate) name: String,
    level: AtomicU8,
    outputs: RwLock<Arc<[OutputHandle]>>,
}

impl LiveState {
    fn new(name: String, level: LogLevel, outputs: &[OutputHandle]) -> Self {
        Self {
            name,
            level: AtomicU8::new(level.as_u8()),
            outputs: RwLock::new(outputs.into()),
        }
    }

    #[inline]
    pub(crate) fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    pub(crate) fn outputs(&self) -> Arc<[OutputHandle]> {
        self.outputs.read().clone()
    }

    /// Returns whether the stored value changed
    pub(crate) fn store_level(&self, level: LogLevel) -> bool {
        self.level.swap(level.as_u8(), Ordering::AcqRel) != level.as_u8()
    }

    /// Returns whether the stored set changed
    pub(crate) fn store_outputs(&self, outputs: &[OutputHandle]) -> bool {
        let mut current = self.outputs.write();
        let unchanged = current.len() == outputs.len()
            && current
                .iter()
                .zip(outputs)
                .all(|(old, new)| old.same_sink(new));
        if unchanged {
            return false;
        }
        *current = outputs.into();
        true
    }
}

/// Working state written by the propagate pass
#[derive(Clone)]
pub(crate) struct Candidate {
    /// Level this node will commit
    pub(crate) level: LogLevel,
    /// Outputs this node will commit, local ones included
    pub(crate) outputs: Vec<OutputHandle>,
    /// Level children fall back to
    pub(crate) handed_level: LogLevel,
    /// Outputs children inherit
    pub(crate) handed_outputs: Vec<OutputHandle>,
}

impl Candidate {
    pub(crate) fn inherited(level: LogLevel, outputs: &[OutputHandle]) -> Self {
        Self {
            level,
            outputs: outputs.to_vec(),
            handed_level: level,
            handed_outputs: outputs.to_vec(),
        }
    }
}

pub(crate) struct NodeState {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: HashMap<String, NodeId>,
    pub(crate) explicit_level: Option<LogLevel>,
    pub(crate) inheritable: bool,
    pub(crate) explicit_outputs: Vec<OutputHandle>,
    pub(crate) explicit_local_outputs: Vec<OutputHandle>,
    pub(crate) candidate: Candidate,
    pub(crate) phase: ResolutionPhase,
    pub(crate) live: Arc<LiveState>,
}

impl NodeState {
    pub(crate) fn new(
        name: String,
        parent: Option<NodeId>,
        level: LogLevel,
        outputs: &[OutputHandle],
    ) -> Self {
        Self {
            live: Arc::new(LiveState::new(name.clone(), level, outputs)),
            name,
            parent,
            children: HashMap::new(),
            explicit_level: None,
            inheritable: true,
            explicit_outputs: Vec::new(),
            explicit_local_outputs: Vec::new(),
            candidate: Candidate::inherited(level, outputs),
            phase: ResolutionPhase::Unresolved,
        }
    }
}

pub(crate) struct Tree {
    pub(crate) nodes: Vec<NodeState>,
    pub(crate) by_name: HashMap<String, NodeId>,
    /// Root outputs restored on every configuration reset
    pub(crate) root_defaults: Vec<OutputHandle>,
    pub(crate) last_config: Option<HierarchyConfig>,
}

/// Per-node view for tooling and reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerReport {
    pub name: String,
    pub explicit_level: Option<LogLevel>,
    pub effective_level: LogLevel,
    pub local: bool,
    pub outputs: Vec<String>,
    pub phase: ResolutionPhase,
}

struct Shared {
    tree: RwLock<Tree>,
    registry: Arc<OutputRegistry>,
    metrics: LoggerMetrics,
}

/// A tree of named loggers sharing one configuration.
///
/// Cloning is cheap; clones refer to the same tree.
///
/// # Example
///
/// ```
/// use rust_logger_hierarchy::prelude::*;
///
/// let hierarchy = Hierarchy::new();
/// let db = hierarchy.get_logger("app.db");
///
/// db.set_level(LogLevel::Debug, true).unwrap();
/// assert_eq!(hierarchy.get_logger("app.db.pool").effective_level(), LogLevel::Debug);
/// assert_eq!(hierarchy.get_logger("app").effective_level(), LogLevel::Info);
/// ```
#[derive(Clone)]
pub struct Hierarchy {
    shared: Arc<Shared>,
}

impl Hierarchy {
    /// Root at `Info`, writing to stderr, using the global output registry
    #[must_use]
    pub fn new() -> Self {
        HierarchyBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    pub fn root(&self) -> Logger {
        let tree = self.shared.tree.read();
        self.logger_at(&tree, ROOT)
    }

    /// Look up `name` from the root, creating missing loggers
    pub fn get_logger(&self, name: &str) -> Logger {
        self.child_of(ROOT, "", name)
    }

    /// Replace the current configuration with `config`.
    ///
    /// Not transactional: if a record fails (bad level, bad output, file
    /// open error), the reset and the records before it stay in place and
    /// the error is returned. Run [`HierarchyConfig::validate`] first to
    /// catch level and option mistakes up front.
    pub fn apply_config(&self, config: &HierarchyConfig) -> Result<()> {
        let mut tree = self.shared.tree.write();
        tree.apply(config, &self.shared.registry, &self.shared.metrics)
    }

    /// Re-run resolution over the whole tree without resetting anything,
    /// e.g. after [`Logger::add_output`].
    pub fn resolve(&self) {
        let mut tree = self.shared.tree.write();
        tree.resolve_from(ROOT, &self.shared.metrics);
    }

    /// The configuration most recently applied, replayed on lazy creation
    pub fn last_config(&self) -> Option<HierarchyConfig> {
        self.shared.tree.read().last_config.clone()
    }

    pub fn registry(&self) -> &Arc<OutputRegistry> {
        &self.shared.registry
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Number of realized loggers, root included
    pub fn logger_count(&self) -> usize {
        self.shared.tree.read().nodes.len()
    }

    /// Names of every realized logger, sorted
    pub fn names(&self) -> Vec<String> {
        let tree = self.shared.tree.read();
        let mut names: Vec<String> = tree.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of every realized logger, sorted by name
    pub fn report(&self) -> Vec<LoggerReport> {
        let tree = self.shared.tree.read();
        let mut report: Vec<LoggerReport> = tree
            .nodes
            .iter()
            .map(|node| LoggerReport {
                name: node.name.clone(),
                explicit_level: node.explicit_level,
                effective_level: node.live.level(),
                local: !node.inheritable,
                outputs: node
                    .live
                    .outputs()
                    .iter()
                    .map(|output| output.name().to_string())
                    .collect(),
                phase: node.phase,
            })
            .collect();
        report.sort_by(|a, b| a.name.cmp(&b.name));
        report
    }

    #[cfg(test)]
    pub(crate) fn same_tree(&self, other: &Hierarchy) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn logger_at(&self, tree: &Tree, id: NodeId) -> Logger {
        Logger::new(self.clone(), id, Arc::clone(&tree.nodes[id].live))
    }

    /// Resolve `name` relative to the node `base` (named `base_name`),
    /// creating what is missing. When anything was created and a
    /// configuration is retained, it is replayed once the whole path exists.
    pub(crate) fn child_of(&self, base: NodeId, base_name: &str, name: &str) -> Logger {
        {
            let tree = self.shared.tree.read();
            if let Some(id) = tree.find(base, base_name, name) {
                return self.logger_at(&tree, id);
            }
        }

        let mut tree = self.shared.tree.write();
        let (id, first_created) = tree.ensure_path(base, base_name, name, &self.shared.metrics);
        if let Some(first) = first_created {
            match tree.last_config.clone() {
                // a failed replay still resolves what it managed to declare
                Some(config) => {
                    if let Err(e) = tree.apply(&config, &self.shared.registry, &self.shared.metrics)
                    {
                        eprintln!(
                            "[LOGGER WARNING] Failed to reapply configuration after creating '{}': {}",
                            tree.nodes[id].name, e
                        );
                    }
                }
                None => tree.resolve_from(first, &self.shared.metrics),
            }
        }
        self.logger_at(&tree, id)
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<Logger> {
        let tree = self.shared.tree.read();
        tree.nodes[id]
            .parent
            .map(|parent| self.logger_at(&tree, parent))
    }

    pub(crate) fn explicit_level_of(&self, id: NodeId) -> Option<LogLevel> {
        self.shared.tree.read().nodes[id].explicit_level
    }

    pub(crate) fn is_local(&self, id: NodeId) -> bool {
        !self.shared.tree.read().nodes[id].inheritable
    }

    pub(crate) fn set_level(&self, id: NodeId, level: Option<LogLevel>, inherit: bool) -> Result<()> {
        let mut tree = self.shared.tree.write();
        if tree.set_explicit(id, level, inherit)? {
            tree.resolve_from(id, &self.shared.metrics);
        }
        Ok(())
    }

    pub(crate) fn add_output(&self, id: NodeId, output: OutputHandle, inherit: bool) {
        self.shared.tree.write().attach(id, output, inherit);
    }

    /// Every realized logger whose name satisfies `matches`, sorted by name
    pub(crate) fn loggers_where(&self, matches: impl Fn(&str) -> bool) -> Vec<Logger> {
        let tree = self.shared.tree.read();
        let mut loggers: Vec<Logger> = tree
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| matches(&node.name))
            .map(|(id, _)| self.logger_at(&tree, id))
            .collect();
        loggers.sort_by(|a, b| a.name().cmp(b.name()));
        loggers
    }

    /// Set the explicit level of every realized logger matching, then
    /// resolve once. Returns how many loggers matched.
    pub(crate) fn set_level_where(
        &self,
        matches: impl Fn(&str) -> bool,
        level: Option<LogLevel>,
        inherit: bool,
    ) -> Result<usize> {
        let mut tree = self.shared.tree.write();
        let ids: Vec<NodeId> = (0..tree.nodes.len())
            .filter(|&id| matches(&tree.nodes[id].name))
            .collect();
        if level.is_none() && ids.contains(&ROOT) {
            return Err(LoggerError::InvalidRootLevel);
        }

        let mut changed = false;
        for &id in &ids {
            changed |= tree.set_explicit(id, level, inherit)?;
        }
        if changed {
            tree.resolve_from(ROOT, &self.shared.metrics);
        }
        Ok(ids.len())
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("loggers", &self.logger_count())
            .finish()
    }
}

/// Builder for a [`Hierarchy`]
///
/// # Example
/// ```
/// use rust_logger_hierarchy::prelude::*;
/// use std::sync::Arc;
///
/// let hierarchy = Hierarchy::builder()
///     .level(LogLevel::Warn)
///     .output(OutputHandle::new(MemoryAppender::new()))
///     .registry(Arc::new(OutputRegistry::new()))
///     .build();
///
/// assert_eq!(hierarchy.root().effective_level(), LogLevel::Warn);
/// ```
pub struct HierarchyBuilder {
    level: LogLevel,
    outputs: Vec<OutputHandle>,
    registry: Option<Arc<OutputRegistry>>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            outputs: Vec::new(),
            registry: None,
        }
    }

    /// Root level until a configuration says otherwise
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Add a default root output; without any, the root writes to stderr
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: OutputHandle) -> Self {
        self.outputs.push(output);
        self
    }

    /// Use a private output registry instead of the global one
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<OutputRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Hierarchy {
        let defaults = if self.outputs.is_empty() {
            vec![stderr_handle()]
        } else {
            self.outputs
        };
        let metrics = LoggerMetrics::new();
        let mut tree = Tree::new(self.level, defaults);
        tree.resolve_from(ROOT, &metrics);

        Hierarchy {
            shared: Arc::new(Shared {
                tree: RwLock::new(tree),
                registry: self.registry.unwrap_or_else(OutputRegistry::global),
                metrics,
            }),
        }
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
