//! Hierarchy resolution
//!
//! Resolution runs in two passes over a subtree. The propagate pass walks
//! down from the start node computing each node's candidate level and
//! outputs from what its parent hands down plus its own explicit settings.
//! The commit pass then copies candidates into the live state that emission
//! reads. Nothing becomes visible until the whole subtree has propagated.
//!
//! What a node hands down:
//! * inheritable node: its resolved level, and the received outputs plus its
//!   own explicit (non-local) outputs;
//! * local node: exactly what it received, so it is a barrier for its own
//!   level and outputs only. Its descendants keep resolving against the
//!   chain above it.
//!
//! Local outputs never leave the node that declares them.

use super::appender::{extend_unique, OutputHandle};
use super::config::{HierarchyConfig, LoggerConfig};
use super::error::{LoggerError, Result};
use super::hierarchy::{Candidate, NodeId, NodeState, Tree, ROOT};
use super::log_level::{LogLevel, ResolutionPhase};
use super::metrics::LoggerMetrics;
use crate::appenders::registry::OutputRegistry;
use std::collections::HashMap;

/// Path segments of `name` as seen from a node called `base_name`.
///
/// A name equal to `base_name`, or starting with `base_name.`, is taken as
/// absolute; anything else is relative to the base. Empty segments are
/// skipped.
pub(crate) fn relative_segments<'a>(
    base_name: &str,
    name: &'a str,
) -> impl Iterator<Item = &'a str> {
    let rest = if base_name.is_empty() {
        name
    } else if name == base_name {
        ""
    } else {
        match name
            .strip_prefix(base_name)
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(rest) => rest,
            None => name,
        }
    };
    rest.split('.').filter(|segment| !segment.is_empty())
}

impl Tree {
    pub(crate) fn new(level: LogLevel, root_defaults: Vec<OutputHandle>) -> Self {
        let mut root = NodeState::new(String::new(), None, level, &[]);
        root.explicit_level = Some(level);
        root.explicit_outputs = root_defaults.clone();

        Self {
            nodes: vec![root],
            by_name: HashMap::from([(String::new(), ROOT)]),
            root_defaults,
            last_config: None,
        }
    }

    pub(crate) fn find(&self, base: NodeId, base_name: &str, name: &str) -> Option<NodeId> {
        relative_segments(base_name, name).try_fold(base, |id, segment| {
            self.nodes[id].children.get(segment).copied()
        })
    }

    /// Walk to `name` from `base`, creating missing nodes. Returns the target
    /// and the first node created, if any. Never replays configuration.
    pub(crate) fn ensure_path(
        &mut self,
        base: NodeId,
        base_name: &str,
        name: &str,
        metrics: &LoggerMetrics,
    ) -> (NodeId, Option<NodeId>) {
        let mut id = base;
        let mut first_created = None;
        for segment in relative_segments(base_name, name) {
            id = match self.nodes[id].children.get(segment) {
                Some(&child) => child,
                None => {
                    let child = self.create_child(id, segment);
                    metrics.record_node_created();
                    first_created.get_or_insert(child);
                    child
                }
            };
        }
        (id, first_created)
    }

    fn create_child(&mut self, parent: NodeId, segment: &str) -> NodeId {
        let name = if parent == ROOT {
            segment.to_string()
        } else {
            format!("{}.{}", self.nodes[parent].name, segment)
        };

        let handed = &self.nodes[parent].candidate;
        let node = NodeState::new(
            name.clone(),
            Some(parent),
            handed.handed_level,
            &handed.handed_outputs,
        );

        let id = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.insert(segment.to_string(), id);
        self.by_name.insert(name, id);
        id
    }

    /// Set a node's explicit level and inherit flag. Unsetting the level
    /// also clears the local flag. Returns whether anything changed.
    pub(crate) fn set_explicit(
        &mut self,
        id: NodeId,
        level: Option<LogLevel>,
        inherit: bool,
    ) -> Result<bool> {
        if id == ROOT && level.is_none() {
            return Err(LoggerError::InvalidRootLevel);
        }

        let inheritable = inherit || level.is_none();
        let node = &mut self.nodes[id];
        if node.explicit_level == level && node.inheritable == inheritable {
            return Ok(false);
        }
        node.explicit_level = level;
        node.inheritable = inheritable;
        Ok(true)
    }

    pub(crate) fn attach(&mut self, id: NodeId, output: OutputHandle, inherit: bool) {
        let node = &mut self.nodes[id];
        if inherit {
            node.explicit_outputs.push(output);
        } else {
            node.explicit_local_outputs.push(output);
        }
    }

    /// Clear explicit state tree-wide. The root keeps its level and gets its
    /// default outputs back. Returns the handles detached from nodes.
    fn reset(&mut self) -> Vec<OutputHandle> {
        let mut detached = Vec::new();
        for (id, node) in self.nodes.iter_mut().enumerate() {
            if id != ROOT {
                node.explicit_level = None;
            }
            node.inheritable = true;
            detached.append(&mut node.explicit_outputs);
            detached.append(&mut node.explicit_local_outputs);
        }

        let defaults = &self.root_defaults;
        detached.retain(|handle| !defaults.contains(handle));
        self.nodes[ROOT].explicit_outputs = self.root_defaults.clone();
        detached
    }

    fn declare(
        &mut self,
        record: &LoggerConfig,
        registry: &OutputRegistry,
        metrics: &LoggerMetrics,
    ) -> Result<()> {
        let level = record.level_setting()?;
        let id = if record.is_root() {
            ROOT
        } else {
            self.ensure_path(ROOT, "", &record.logger, metrics).0
        };
        self.set_explicit(id, level, !record.local)?;

        if id == ROOT && !record.outputs.is_empty() {
            let defaults = &self.root_defaults;
            self.nodes[ROOT]
                .explicit_outputs
                .retain(|handle| !defaults.contains(handle));
        }
        for output in &record.outputs {
            let handle = registry.acquire(output.output_kind()?, &output.options)?;
            self.attach(id, handle, !output.local);
        }
        Ok(())
    }

    /// Reset, record the snapshot, declare every record in order, resolve.
    ///
    /// On error the remaining records are skipped, but the reset and the
    /// records declared before the failure are still resolved and committed,
    /// so live outputs always match what the registry counts. Handles
    /// detached by the reset go back to the registry only after the new
    /// records acquired theirs, so a file declared again keeps its open
    /// handle.
    pub(crate) fn apply(
        &mut self,
        config: &HierarchyConfig,
        registry: &OutputRegistry,
        metrics: &LoggerMetrics,
    ) -> Result<()> {
        metrics.record_reconfiguration();
        let detached = self.reset();
        self.last_config = Some(config.clone());

        let outcome = config
            .iter()
            .try_for_each(|record| self.declare(record, registry, metrics));
        self.resolve_from(ROOT, metrics);

        for handle in &detached {
            registry.release(handle);
        }
        outcome
    }

    pub(crate) fn resolve_from(&mut self, start: NodeId, metrics: &LoggerMetrics) {
        self.propagate(start);
        self.commit(start, metrics);
    }

    /// What `id`'s parent hands down; the root starts from its own level
    fn received_by(&self, id: NodeId) -> (LogLevel, Vec<OutputHandle>) {
        match self.nodes[id].parent {
            Some(parent) => {
                let candidate = &self.nodes[parent].candidate;
                (candidate.handed_level, candidate.handed_outputs.clone())
            }
            None => (
                self.nodes[id].explicit_level.unwrap_or_default(),
                Vec::new(),
            ),
        }
    }

    fn propagate(&mut self, start: NodeId) {
        let (level, outputs) = self.received_by(start);
        let mut stack = vec![(start, level, outputs)];

        while let Some((id, received_level, received_outputs)) = stack.pop() {
            let node = &mut self.nodes[id];
            let level = node.explicit_level.unwrap_or(received_level);

            let mut outputs = received_outputs.clone();
            extend_unique(&mut outputs, &node.explicit_outputs);
            extend_unique(&mut outputs, &node.explicit_local_outputs);

            let (handed_level, handed_outputs) = if node.inheritable {
                let mut handed = received_outputs;
                extend_unique(&mut handed, &node.explicit_outputs);
                (level, handed)
            } else {
                (received_level, received_outputs)
            };

            for &child in node.children.values() {
                stack.push((child, handed_level, handed_outputs.clone()));
            }
            node.candidate = Candidate {
                level,
                outputs,
                handed_level,
                handed_outputs,
            };
            node.phase = ResolutionPhase::Pending;
        }
    }

    fn commit(&mut self, start: NodeId, metrics: &LoggerMetrics) {
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            debug_assert_eq!(node.phase, ResolutionPhase::Pending);

            if node.live.store_level(node.candidate.level) {
                metrics.record_level_change();
            }
            if node.live.store_outputs(&node.candidate.outputs) {
                metrics.record_output_change();
            }
            node.phase = ResolutionPhase::Committed;
            stack.extend(node.children.values().copied());
        }
    }
}
