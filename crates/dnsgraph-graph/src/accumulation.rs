//! Hiding and grouping, applied as each new edge is inserted.
//!
//! An edge touching a hidden kind is hidden and the hierarchy is bridged
//! around the hidden node with synthetic `same_tld` edges. An edge touching an
//! accumulated kind is hidden and redirected to group nodes: nameservers are
//! grouped per registrable domain and IPs per announcing AS.

use crate::graph::{EdgeIndex, EdgeOptions, Graph, Node, NodeIndex, push_unique};
use dnsgraph_core::{NodeKind, split_domain};

impl Graph {
    pub(crate) fn apply_visibility(&mut self, edge: EdgeIndex) {
        let (source, target) = (self.edges[edge.0].source, self.edges[edge.0].target);
        let source_kind = self.nodes[source.0].kind;
        let target_kind = self.nodes[target.0].kind;
        let hides_source = self.config().hides(source_kind);
        let hides_target = self.config().hides(target_kind);
        if !(hides_source || hides_target) {
            return;
        }
        self.edges[edge.0].hidden = true;

        // Ungrouped members of an accumulated kind are handled by their group
        if self.config().accumulates(target_kind) && !self.nodes[target.0].accumulation {
            return;
        }
        push_unique(&mut self.nodes[source.0].hidden_targets, target);
        push_unique(&mut self.nodes[target.0].hidden_sources, source);

        if !hides_source {
            let same_tld = self.share_tld(source, target);
            let children = self.nodes[target.0].children.clone();
            for child in children {
                if self.nodes[child.0].kind.base() != NodeKind::Ip || same_tld {
                    self.bridge(source, child);
                }
            }
        } else {
            let upstream = self.nodes[source.0].hidden_sources.clone();
            for above in upstream {
                if hides_target {
                    push_unique(&mut self.nodes[above.0].hidden_targets, target);
                } else if target_kind.base() != NodeKind::Ip || self.share_tld(source, target) {
                    self.bridge(above, target);
                }
            }
        }
    }

    pub(crate) fn apply_accumulation(&mut self, edge: EdgeIndex) {
        let (source, target) = (self.edges[edge.0].source, self.edges[edge.0].target);
        let source_kind = self.nodes[source.0].kind;
        let target_kind = self.nodes[target.0].kind;
        let group_source =
            self.config().accumulates(source_kind) && !self.nodes[source.0].accumulation;
        let group_target =
            self.config().accumulates(target_kind) && !self.nodes[target.0].accumulation;
        if !(group_source || group_target) {
            return;
        }
        self.edges[edge.0].hidden = true;

        if group_target {
            if self.nodes[target.0].accumulated_into.is_empty() && self.accumulate(target).is_empty()
            {
                // Nothing to group under, so the member stays visible
                let hidden_kind = self.config().hides(source_kind)
                    || self.config().hides(target_kind)
                    || self.config().accumulates(source_kind);
                if !hidden_kind {
                    self.edges[edge.0].hidden = false;
                }
            }
            for group in self.nodes[target.0].accumulated_into.clone() {
                let options = EdgeOptions::checked(&self.nodes[source.0], &self.nodes[group.0]);
                self.insert_edge_inner(source, group, options);
            }
        }

        if group_source {
            if self.nodes[source.0].accumulated_into.is_empty() {
                self.accumulate(source);
            }
            for group in self.nodes[source.0].accumulated_into.clone() {
                self.insert_edge_inner(group, target, EdgeOptions::default());
            }
        }
    }

    /// Folds a node into its group nodes, creating them on first use.
    /// Returns the groups; an empty result leaves the node visible.
    fn accumulate(&mut self, member: NodeIndex) -> Vec<NodeIndex> {
        let node = &self.nodes[member.0];
        let depth = node.depth;
        let Some(group_kind) = node.kind.accumulation_kind() else {
            return Vec::new();
        };
        let groups: Vec<Node> = match group_kind {
            NodeKind::NsAccumulation => node
                .domain
                .iter()
                .map(|domain| {
                    Node::new(group_kind, format!("{}'S NAMESERVERS", domain)).with_domain(domain)
                })
                .collect(),
            _ => node
                .asns
                .iter()
                .flatten()
                .map(|asn| Node::new(group_kind, format!("AS:{}", asn)))
                .collect(),
        };

        let mut created = Vec::with_capacity(groups.len());
        for mut group in groups {
            group.depth = depth;
            group.substitutes = vec![member];
            let index = self.insert_node(group);
            push_unique(&mut self.nodes[member.0].accumulated_into, index);
            created.push(index);
        }
        if !created.is_empty() {
            tracing::debug!(
                member = %self.nodes[member.0].unique_name(),
                groups = created.len(),
                "accumulated node"
            );
            self.nodes[member.0].hidden = true;
            self.remove_from_levels(member);
        }
        created
    }

    fn bridge(&mut self, source: NodeIndex, target: NodeIndex) {
        let options = EdgeOptions {
            hidden: self.config().hides(self.nodes[target.0].kind),
            bidirectional: false,
            same_tld: true,
        };
        self.insert_edge_inner(source, target, options);
    }

    /// Compares TLDs by branch key when present, since group names can't be split.
    fn share_tld(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let tld_of = |node: &Node| split_domain(node.domain.as_deref().unwrap_or(&node.name));
        tld_of(&self.nodes[a.0]).same_tld(&tld_of(&self.nodes[b.0]))
    }
}
