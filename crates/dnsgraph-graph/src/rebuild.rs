use crate::graph::{EdgeOptions, Graph, NodeIndex};
use dnsgraph_core::GraphConfig;

impl Graph {
    /// Builds a new graph from this one under different visibility settings.
    ///
    /// Group nodes and bridging edges are dropped and everything else is
    /// re-inserted in original order, so hiding and grouping are applied
    /// afresh. Flags and branch colors carry over; layout runs again.
    pub fn rebuild_with(&self, config: GraphConfig) -> Graph {
        let mut rebuilt = Graph::new(config);
        let mut remap: Vec<Option<NodeIndex>> = vec![None; self.node_count()];
        for (index, node) in self.nodes() {
            if node.accumulation {
                continue;
            }
            let mut copy = node.detached();
            copy.hidden = false;
            copy.column = None;
            remap[index.0] = Some(rebuilt.insert_node(copy));
        }

        for (_, edge) in self.edges() {
            if edge.same_tld {
                continue;
            }
            let (Some(source), Some(target)) = (remap[edge.source.0], remap[edge.target.0]) else {
                continue;
            };
            let options = EdgeOptions {
                bidirectional: edge.bidirectional,
                ..EdgeOptions::default()
            };
            rebuilt.insert_edge_inner(source, target, options);
        }

        tracing::debug!(
            nodes = rebuilt.node_count(),
            edges = rebuilt.edge_count(),
            "rebuilt graph from configuration"
        );
        rebuilt.assign_layout();
        rebuilt
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Graph, Node};
    use dnsgraph_core::{GraphConfig, NodeKind};

    fn sample(config: GraphConfig) -> Graph {
        let mut graph = Graph::new(config);
        let domain = graph.insert_node(
            Node::new(NodeKind::Domain, "example.org").with_domain("example.org"),
        );
        let ns = graph.insert_node(
            Node::new(NodeKind::Nameserver, "ns1.example.com")
                .with_depth(1)
                .with_domain("example.com"),
        );
        graph.connect(domain, ns).unwrap();
        for address in ["203.0.113.1", "203.0.113.2"] {
            let mut ip = Node::new(NodeKind::Ip, address)
                .with_depth(2)
                .with_domain("example.com");
            ip.asns = Some(vec!["64500".into()]);
            let ip = graph.insert_node(ip);
            graph.connect(ns, ip).unwrap();
        }
        graph.assign_layout();
        graph
    }

    #[test]
    fn test_rebuild_shows_what_was_hidden() {
        let graph = sample(GraphConfig::default());
        assert!(graph.find(NodeKind::IpAccumulation, "AS:64500").is_some());
        let ns = graph.find(NodeKind::Nameserver, "ns1.example.com").unwrap();
        assert!(graph[ns].hidden);

        let rebuilt = graph.rebuild_with(GraphConfig::show_all());
        assert_eq!(rebuilt.node_count(), 4);
        assert!(rebuilt.find(NodeKind::IpAccumulation, "AS:64500").is_none());
        assert!(rebuilt.edges().all(|(_, e)| !e.hidden && !e.same_tld));
        assert!(rebuilt.nodes().all(|(_, n)| !n.hidden));
        assert_eq!(rebuilt.levels().len(), 3);
        assert_eq!(
            rebuilt.branch("example.com").unwrap().color,
            graph.branch("example.com").unwrap().color
        );
    }

    #[test]
    fn test_rebuild_round_trip_matches_fresh_build() {
        let graph = sample(GraphConfig::show_all());
        let rebuilt = graph.rebuild_with(GraphConfig::default());
        let fresh = sample(GraphConfig::default());
        let names = |g: &Graph| -> Vec<Vec<String>> {
            g.levels()
                .iter()
                .map(|row| row.iter().map(|&i| g[i].unique_name().to_string()).collect())
                .collect()
        };
        assert_eq!(names(&rebuilt), names(&fresh));
        assert_eq!(rebuilt.edge_count(), fresh.edge_count());
    }
}
