use crate::graph::{Branch, Graph, NodeIndex};
use crate::overview::Overview;
use dnsgraph_core::NodeKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Serializable view of a laid-out graph, keyed by unique name.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub root: Option<String>,
    pub nodes: Vec<NodeSnapshot>,
    /// Visible edges only.
    pub edges: Vec<EdgeSnapshot>,
    pub levels: Vec<Vec<String>>,
    pub branches: BTreeMap<String, BranchSnapshot>,
    pub overview: Overview,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub depth: Option<usize>,
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asns: Option<Vec<String>>,
    pub archive: bool,
    pub hazard: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_message: Option<String>,
    pub warnings: Vec<String>,
    pub preload: bool,
    pub hidden: bool,
    pub accumulation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
    pub bidirectional: bool,
    pub same_tld: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchSnapshot {
    pub hazard: bool,
    pub hazard_messages: Vec<String>,
    pub warnings: Vec<String>,
    pub preload: bool,
    pub color: Option<String>,
    pub nodes: Vec<String>,
}

impl Graph {
    pub fn snapshot(&self) -> GraphSnapshot {
        let id = |index: NodeIndex| self[index].unique_name().to_string();

        let nodes = self
            .nodes()
            .map(|(index, node)| NodeSnapshot {
                id: node.unique_name().to_string(),
                kind: node.kind,
                name: node.name.clone(),
                depth: node.depth,
                column: node.column,
                domain: node.domain.clone(),
                link: node.link.clone(),
                zone: node.zone.clone(),
                ip_version: node.ip_version,
                asns: node.asns.clone(),
                archive: node.archive,
                hazard: node.hazard,
                hazard_message: node.hazard_message.clone(),
                warnings: node.warnings.clone(),
                preload: node.preload,
                hidden: node.hidden,
                accumulation: node.accumulation,
                color: node
                    .domain
                    .as_deref()
                    .and_then(|d| self.branch(d))
                    .and_then(|b| b.color.clone()),
                tooltip: self.tooltip(index).map(|t| t.to_string()),
            })
            .collect();

        let edges = self
            .edges()
            .map(|(_, edge)| edge)
            .filter(|edge| !edge.hidden && !self[edge.source].hidden && !self[edge.target].hidden)
            .map(|edge| EdgeSnapshot {
                source: id(edge.source),
                target: id(edge.target),
                bidirectional: edge.bidirectional,
                same_tld: edge.same_tld,
            })
            .collect();

        let branch_snapshot = |branch: &Branch| BranchSnapshot {
            hazard: branch.hazard,
            hazard_messages: branch.hazard_messages.clone(),
            warnings: branch.warnings.clone(),
            preload: branch.preload,
            color: branch.color.clone(),
            nodes: branch.nodes.iter().map(|&n| id(n)).collect(),
        };

        GraphSnapshot {
            root: self.root().map(id),
            nodes,
            edges,
            levels: self
                .levels()
                .iter()
                .map(|row| row.iter().map(|&n| id(n)).collect())
                .collect(),
            branches: self
                .branches()
                .iter()
                .map(|(key, branch)| (key.clone(), branch_snapshot(branch)))
                .collect(),
            overview: self.overview(),
        }
    }
}
