use crate::graph::{Graph, NodeIndex};
use serde::Serialize;
use std::fmt;

pub const PRELOAD_NOTE: &str = "Database does not contain this domain";

/// Hover text for a node: what it stands in for and what is wrong with its branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    /// Substituted and hidden nodes, grouped by upper-cased kind in first-seen order.
    pub groups: Vec<TooltipGroup>,
    pub preload: bool,
    pub hazard_messages: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipGroup {
    pub kind: String,
    pub names: Vec<String>,
}

impl Tooltip {
    pub fn ip_count(&self) -> usize {
        self.count("IP")
    }

    pub fn nameserver_count(&self) -> usize {
        self.count("NAMESERVER")
    }

    fn count(&self, kind: &str) -> usize {
        self.groups
            .iter()
            .filter(|g| g.kind == kind)
            .map(|g| g.names.len())
            .sum()
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::new();
        for group in &self.groups {
            lines.push(format!("{}(S)", group.kind));
            lines.extend(group.names.iter().map(|name| format!("- {}", name)));
        }
        if self.preload {
            lines.push(PRELOAD_NOTE.to_string());
        }
        lines.extend(self.hazard_messages.iter().cloned());
        lines.extend(self.warnings.iter().cloned());
        f.write_str(&lines.join("\n"))
    }
}

impl Graph {
    /// Tooltip for a node, or `None` when there is nothing to show.
    ///
    /// Hazard messages and warnings come from the node's branch when it has
    /// one, otherwise from the node itself.
    pub fn tooltip(&self, index: NodeIndex) -> Option<Tooltip> {
        let node = self.node_weight(index)?;
        let interesting = node.accumulation
            || !node.hidden_targets().is_empty()
            || node.hazard
            || !node.warnings.is_empty()
            || node.preload;
        if !interesting {
            return None;
        }

        let mut groups: Vec<TooltipGroup> = Vec::new();
        for &other in node.substitutes().iter().chain(node.hidden_targets()) {
            let other = &self[other];
            let kind = other.kind.as_str().to_ascii_uppercase();
            match groups.iter_mut().find(|g| g.kind == kind) {
                Some(group) => group.names.push(other.name.clone()),
                None => groups.push(TooltipGroup {
                    kind,
                    names: vec![other.name.clone()],
                }),
            }
        }

        let branch = node.domain.as_deref().and_then(|d| self.branch(d));
        let hazard_messages = if !node.hazard {
            Vec::new()
        } else {
            match branch {
                Some(branch) if !branch.hazard_messages.is_empty() => branch.hazard_messages.clone(),
                _ => node.hazard_message.iter().cloned().collect(),
            }
        };
        let warnings = match branch {
            Some(branch) if !branch.warnings.is_empty() => branch.warnings.clone(),
            _ => node.warnings.clone(),
        };

        Some(Tooltip {
            groups,
            preload: node.preload,
            hazard_messages,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use dnsgraph_core::{GraphConfig, NodeKind};

    #[test]
    fn test_plain_node_has_no_tooltip() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let a = graph.insert_node(Node::new(NodeKind::Domain, "example.com"));
        assert_eq!(graph.tooltip(a), None);
    }

    #[test]
    fn test_group_tooltip_lists_members() {
        let mut graph = Graph::default();
        let ns = graph.insert_node(Node::new(NodeKind::Zone, "COM"));
        for (address, asn) in [("203.0.113.1", "64500"), ("203.0.113.2", "64500")] {
            let mut ip = Node::new(NodeKind::Ip, address).with_depth(1);
            ip.asns = Some(vec![asn.to_string()]);
            let ip = graph.insert_node(ip);
            graph.connect(ns, ip).unwrap();
        }
        let group = graph.find(NodeKind::IpAccumulation, "AS:64500").unwrap();
        let tooltip = graph.tooltip(group).unwrap();
        assert_eq!(tooltip.ip_count(), 2);
        assert_eq!(tooltip.nameserver_count(), 0);
        assert_eq!(
            tooltip.to_string(),
            "IP(S)\n- 203.0.113.1\n- 203.0.113.2"
        );
    }

    #[test]
    fn test_branch_messages_and_preload_note() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let a = graph.insert_node(
            Node::new(NodeKind::Domain, "example.com")
                .with_domain("example.com")
                .with_hazard("first"),
        );
        let b = graph.insert_node(
            Node::new(NodeKind::Nameserver, "ns1.example.com")
                .with_domain("example.com")
                .with_hazard("second"),
        );
        graph.mark_preload(b);
        graph.add_warning(b, "NS record has a wildcard domain");

        let tooltip = graph.tooltip(a).unwrap();
        assert!(tooltip.preload);
        assert_eq!(tooltip.hazard_messages, vec!["first", "second"]);
        assert_eq!(
            tooltip.to_string(),
            "Database does not contain this domain\nfirst\nsecond\nNS record has a wildcard domain"
        );
    }
}
