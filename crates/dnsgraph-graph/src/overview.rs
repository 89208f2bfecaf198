use crate::graph::Graph;
use dnsgraph_core::NodeKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Summary counts for a graph, keyed by upper-cased names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub nodes: usize,
    pub visible: usize,
    pub by_kind: BTreeMap<NodeKind, BTreeSet<String>>,
    pub hazard_domains: BTreeSet<String>,
    pub warning_domains: BTreeSet<String>,
    pub preload_domains: BTreeSet<String>,
}

impl Overview {
    pub fn domain_count(&self) -> usize {
        self.by_kind.get(&NodeKind::Domain).map_or(0, BTreeSet::len)
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            plural(self.visible, "node"),
            plural(self.domain_count(), "domain"),
            plural(self.hazard_domains.len(), "hazard")
        )
    }
}

impl Graph {
    pub fn overview(&self) -> Overview {
        let mut overview = Overview {
            nodes: self.node_count(),
            ..Overview::default()
        };
        for (_, node) in self.nodes() {
            let name = node.name.to_ascii_uppercase();
            overview.by_kind.entry(node.kind).or_default().insert(name);
            if !node.hidden {
                overview.visible += 1;
            }
            let Some(domain) = node.domain.as_ref() else {
                continue;
            };
            if node.hazard {
                overview.hazard_domains.insert(domain.clone());
            }
            if !node.warnings.is_empty() {
                overview.warning_domains.insert(domain.clone());
            }
            if node.preload {
                overview.preload_domains.insert(domain.clone());
            }
        }
        overview
    }
}
