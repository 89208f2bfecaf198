use crate::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-graph configuration. Sub-graphs share their parent's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub resolve_zones: bool,
    pub resolve_archive: bool,
    pub accumulation_nodes: BTreeSet<NodeKind>,
    pub hide_nodes: BTreeSet<NodeKind>,
    pub show_unmapped_nodes: bool,
    pub match_branch_colors: bool,
    pub layout: LayoutLimits,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            resolve_zones: false,
            resolve_archive: false,
            accumulation_nodes: BTreeSet::from([NodeKind::Ip]),
            hide_nodes: BTreeSet::from([NodeKind::Nameserver]),
            show_unmapped_nodes: true,
            match_branch_colors: true,
            layout: LayoutLimits::default(),
        }
    }
}

impl GraphConfig {
    /// Configuration with no hiding and no grouping; every fetched node is visible.
    pub fn show_all() -> Self {
        Self {
            accumulation_nodes: BTreeSet::new(),
            hide_nodes: BTreeSet::new(),
            ..Self::default()
        }
    }

    pub fn hides(&self, kind: NodeKind) -> bool {
        self.hide_nodes.contains(&kind.base())
    }

    pub fn accumulates(&self, kind: NodeKind) -> bool {
        self.accumulation_nodes.contains(&kind.base())
    }
}

/// Bounds for the layout heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutLimits {
    /// Related nodes allowed on one row before a node is pushed to another row.
    pub max_adjacent: usize,
    pub max_relaxation_steps: usize,
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            max_adjacent: default_max_adjacent(),
            max_relaxation_steps: default_max_relaxation_steps(),
        }
    }
}

fn default_max_adjacent() -> usize {
    2
}
fn default_max_relaxation_steps() -> usize {
    10_000
}
