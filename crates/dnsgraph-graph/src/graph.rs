use crate::color::branch_color;
use dnsgraph_core::{
    Finding, FindingClass, GraphConfig, GraphError, NodeKind, split_domain, unique_name,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A domain, zone, nameserver, IP or group node.
///
/// Index-valued fields refer to the arena of the graph that owns the node.
/// Nodes built outside a graph carry no relationships; those only come from
/// edge insertion.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    unique_name: String,

    // Placement. `depth` is the discovery depth until layout runs.
    pub depth: Option<usize>,
    pub column: Option<usize>,

    // Upstream attributes
    pub domain: Option<String>,
    pub link: Option<String>,
    pub zone: Option<String>,
    pub ip_version: Option<u8>,
    pub archive: bool,
    pub asns: Option<Vec<String>>,

    // Findings
    pub hazard: bool,
    pub hazard_message: Option<String>,
    pub warnings: Vec<String>,
    pub preload: bool,

    // Visibility
    pub hidden: bool,
    pub accumulation: bool,
    pub(crate) substitutes: Vec<NodeIndex>,
    pub(crate) hidden_targets: Vec<NodeIndex>,
    pub(crate) hidden_sources: Vec<NodeIndex>,
    pub(crate) accumulated_into: Vec<NodeIndex>,

    // Hierarchy
    pub(crate) parents: Vec<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) peers: Vec<NodeIndex>,
}

impl Node {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            unique_name: unique_name(kind, &name),
            kind,
            name,
            depth: None,
            column: None,
            domain: None,
            link: None,
            zone: None,
            ip_version: None,
            archive: false,
            asns: None,
            hazard: false,
            hazard_message: None,
            warnings: Vec::new(),
            preload: false,
            hidden: false,
            accumulation: kind.is_accumulation(),
            substitutes: Vec::new(),
            hidden_targets: Vec::new(),
            hidden_sources: Vec::new(),
            accumulated_into: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            peers: Vec::new(),
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Sets the branch key. Keys are always upper-cased.
    pub fn with_domain(mut self, domain: impl AsRef<str>) -> Self {
        self.domain = Some(domain.as_ref().to_ascii_uppercase());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_hazard(mut self, message: impl Into<String>) -> Self {
        self.hazard = true;
        self.hazard_message = Some(message.into());
        self
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
        self
    }

    /// Attaches a finding as a hazard or a warning, following its class.
    pub fn with_finding(self, finding: Finding, message: impl Into<String>) -> Self {
        match finding.class() {
            FindingClass::Hazard => self.with_hazard(message),
            FindingClass::Warning => self.with_warning(message),
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn parents(&self) -> &[NodeIndex] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn peers(&self) -> &[NodeIndex] {
        &self.peers
    }

    pub fn substitutes(&self) -> &[NodeIndex] {
        &self.substitutes
    }

    pub fn hidden_targets(&self) -> &[NodeIndex] {
        &self.hidden_targets
    }

    pub fn accumulated_into(&self) -> &[NodeIndex] {
        &self.accumulated_into
    }

    pub fn is_peer(&self, other: NodeIndex) -> bool {
        self.peers.contains(&other)
    }

    /// Copy of the node without any arena references.
    pub(crate) fn detached(&self) -> Node {
        Node {
            substitutes: Vec::new(),
            hidden_targets: Vec::new(),
            hidden_sources: Vec::new(),
            accumulated_into: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            peers: Vec::new(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub hidden: bool,
    pub bidirectional: bool,
    /// Synthetic edge bridging over a hidden node.
    pub same_tld: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeOptions {
    pub hidden: bool,
    pub bidirectional: bool,
    pub same_tld: bool,
}

impl EdgeOptions {
    /// Options for an edge whose endpoints share a registrable domain or TLD.
    ///
    /// The source is judged by its name and the target by its branch key;
    /// IP targets are never peers.
    pub fn checked(source: &Node, target: &Node) -> Self {
        Self {
            bidirectional: shares_domain(source, target),
            ..Self::default()
        }
    }
}

fn shares_domain(source: &Node, target: &Node) -> bool {
    let source_parts = split_domain(&source.name);
    if source_parts.tld.is_none() || target.kind.base() == NodeKind::Ip {
        return false;
    }
    let Some(target_domain) = target.domain.as_deref() else {
        return false;
    };
    let target_parts = split_domain(target_domain);
    target_parts.domain.is_some()
        && (source_parts.same_domain(&target_parts) || source_parts.same_tld(&target_parts))
}

/// The partition of the graph belonging to one registrable domain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Branch {
    pub hazard: bool,
    pub hazard_messages: Vec<String>,
    pub warnings: Vec<String>,
    pub preload: bool,
    pub color: Option<String>,
    pub nodes: Vec<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct Graph {
    config: Arc<GraphConfig>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    node_map: HashMap<String, NodeIndex>,
    edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
    pub(crate) levels: Vec<Vec<NodeIndex>>,
    branches: BTreeMap<String, Branch>,
    root: Option<NodeIndex>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl Graph {
    pub fn new(config: GraphConfig) -> Self {
        Self::with_shared_config(Arc::new(config))
    }

    pub fn with_shared_config(config: Arc<GraphConfig>) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_map: HashMap::new(),
            edge_map: HashMap::new(),
            levels: Vec::new(),
            branches: BTreeMap::new(),
            root: None,
        }
    }

    /// Empty graph sharing this graph's configuration.
    ///
    /// Branch colors are derived from the branch key, so a sub-graph colors
    /// its branches the same way its parent does.
    pub fn sublist(&self) -> Graph {
        Graph::with_shared_config(Arc::clone(&self.config))
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<GraphConfig> {
        Arc::clone(&self.config)
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeIndex(i), e))
    }

    pub fn node_weight(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0)
    }

    pub fn levels(&self) -> &[Vec<NodeIndex>] {
        &self.levels
    }

    pub fn branches(&self) -> &BTreeMap<String, Branch> {
        &self.branches
    }

    pub fn branch(&self, domain: &str) -> Option<&Branch> {
        self.branches.get(&domain.to_ascii_uppercase())
    }

    pub fn find(&self, kind: NodeKind, name: &str) -> Option<NodeIndex> {
        self.node_map.get(&unique_name(kind, name)).copied()
    }

    pub fn contains(&self, node: &Node) -> Option<NodeIndex> {
        self.node_map.get(node.unique_name()).copied()
    }

    /// The logical edge between two nodes, in either direction.
    pub fn contains_edge(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.edge_map.get(&pair_key(a, b)).copied()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// Inserts a node, or returns the existing node with the same unique name.
    ///
    /// A duplicate is discarded; accumulation substitutes are unioned and any
    /// hazard, warning or preload flag it carries is applied to the existing
    /// node and its branch.
    pub fn insert_node(&mut self, mut node: Node) -> NodeIndex {
        if let Some(&existing) = self.node_map.get(node.unique_name()) {
            if node.accumulation && self.nodes[existing.0].accumulation {
                for substitute in std::mem::take(&mut node.substitutes) {
                    push_unique(&mut self.nodes[existing.0].substitutes, substitute);
                }
            }
            self.absorb_flags(existing, &node);
            return existing;
        }

        let idx = NodeIndex(self.nodes.len());
        if self.root.is_none() {
            self.root = Some(idx);
        }
        if self.config.hides(node.kind) {
            node.hidden = true;
        }
        let visible = !node.hidden;
        let depth = node.depth.unwrap_or(0);
        self.node_map.insert(node.unique_name.clone(), idx);
        self.nodes.push(node);
        if visible {
            if self.levels.len() <= depth {
                self.levels.resize_with(depth + 1, Vec::new);
            }
            self.levels[depth].push(idx);
        }
        self.join_branch(idx);
        idx
    }

    /// Inserts an edge between two nodes of this graph.
    ///
    /// Self-loops are rejected. If the reverse edge exists it is marked
    /// bidirectional instead of adding a second edge.
    pub fn insert_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        options: EdgeOptions,
    ) -> Result<EdgeIndex, GraphError> {
        self.check_node(source)?;
        self.check_node(target)?;
        if source == target {
            return Err(GraphError::SelfLoop(self.nodes[source.0].unique_name.clone()));
        }
        self.insert_edge_inner(source, target, options)
            .ok_or_else(|| GraphError::SelfLoop(self.nodes[source.0].unique_name.clone()))
    }

    /// Inserts an edge, detecting peers by shared domain or TLD.
    pub fn connect(&mut self, source: NodeIndex, target: NodeIndex) -> Result<EdgeIndex, GraphError> {
        self.check_node(source)?;
        self.check_node(target)?;
        let options = EdgeOptions::checked(&self.nodes[source.0], &self.nodes[target.0]);
        self.insert_edge(source, target, options)
    }

    /// Imports every node and edge of `sub`, then links `parent` to the
    /// sub-graph's root. Returns the linking edge, if `sub` has a root.
    pub fn merge(
        &mut self,
        parent: NodeIndex,
        sub: Graph,
        check_bidirectional: bool,
    ) -> Result<Option<EdgeIndex>, GraphError> {
        self.check_node(parent)?;
        let remap: Vec<NodeIndex> = sub
            .nodes
            .iter()
            .map(|node| self.insert_node(node.detached()))
            .collect();

        for (node, &local) in sub.nodes.iter().zip(&remap) {
            let lists = [
                (&node.substitutes, NodeList::Substitutes),
                (&node.hidden_targets, NodeList::HiddenTargets),
                (&node.hidden_sources, NodeList::HiddenSources),
                (&node.accumulated_into, NodeList::AccumulatedInto),
            ];
            for (indices, list) in lists {
                if list == NodeList::Substitutes && !self.nodes[local.0].accumulation {
                    continue;
                }
                for index in indices {
                    let mapped = remap[index.0];
                    push_unique(list.of(&mut self.nodes[local.0]), mapped);
                }
            }
            if !node.accumulated_into.is_empty() && !self.nodes[local.0].hidden {
                self.nodes[local.0].hidden = true;
                self.remove_from_levels(local);
            }
        }

        for edge in &sub.edges {
            let options = EdgeOptions {
                hidden: edge.hidden,
                bidirectional: edge.bidirectional,
                same_tld: edge.same_tld,
            };
            self.insert_edge_inner(remap[edge.source.0], remap[edge.target.0], options);
        }

        let Some(sub_root) = sub.root else {
            return Ok(None);
        };
        let root = remap[sub_root.0];
        let options = if check_bidirectional {
            EdgeOptions::checked(&self.nodes[parent.0], &self.nodes[root.0])
        } else {
            EdgeOptions::default()
        };
        self.insert_edge(parent, root, options).map(Some)
    }

    /// Flags a node as hazardous and spreads the flag over its branch.
    pub fn mark_hazard(&mut self, index: NodeIndex, message: Option<String>) {
        let node = &mut self.nodes[index.0];
        node.hazard = true;
        if message.is_some() {
            node.hazard_message = message;
        }
        self.join_branch(index);
    }

    pub fn add_warning(&mut self, index: NodeIndex, message: impl Into<String>) {
        let message = message.into();
        let node = &mut self.nodes[index.0];
        if !node.warnings.contains(&message) {
            node.warnings.push(message);
        }
        self.join_branch(index);
    }

    /// Records a finding with its table message on a node and its branch.
    pub fn record_finding(&mut self, index: NodeIndex, finding: Finding) {
        match finding.class() {
            FindingClass::Hazard => self.mark_hazard(index, Some(finding.message().to_string())),
            FindingClass::Warning => self.add_warning(index, finding.message()),
        }
    }

    /// Moves a node into the branch keyed by `domain`, leaving its previous
    /// branch. `None` only detaches it.
    pub fn assign_domain(&mut self, index: NodeIndex, domain: Option<&str>) {
        let domain = domain.map(|d| d.to_ascii_uppercase());
        if self.nodes[index.0].domain == domain {
            return;
        }
        if let Some(previous) = self.nodes[index.0].domain.take()
            && let Some(branch) = self.branches.get_mut(&previous)
        {
            branch.nodes.retain(|&member| member != index);
        }
        self.nodes[index.0].domain = domain;
        self.join_branch(index);
    }

    pub fn mark_preload(&mut self, index: NodeIndex) {
        self.nodes[index.0].preload = true;
        self.join_branch(index);
    }

    pub(crate) fn insert_edge_inner(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        options: EdgeOptions,
    ) -> Option<EdgeIndex> {
        if source == target {
            return None;
        }
        self.add_hierarchy(source, target);
        if options.bidirectional {
            self.add_hierarchy(target, source);
            self.add_peers(source, target);
        }

        let key = pair_key(source, target);
        if let Some(&existing) = self.edge_map.get(&key) {
            let prior = &mut self.edges[existing.0];
            if prior.source == target || options.bidirectional {
                prior.bidirectional = true;
                self.add_peers(source, target);
            }
            return Some(existing);
        }

        let idx = EdgeIndex(self.edges.len());
        self.edges.push(Edge {
            source,
            target,
            hidden: options.hidden,
            bidirectional: options.bidirectional,
            same_tld: options.same_tld,
        });
        self.edge_map.insert(key, idx);
        self.apply_visibility(idx);
        self.apply_accumulation(idx);
        Some(idx)
    }

    pub(crate) fn remove_from_levels(&mut self, index: NodeIndex) {
        for level in &mut self.levels {
            level.retain(|&n| n != index);
        }
    }

    fn check_node(&self, index: NodeIndex) -> Result<(), GraphError> {
        if index.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(format!("#{}", index)))
        }
    }

    fn add_hierarchy(&mut self, parent: NodeIndex, child: NodeIndex) {
        push_unique(&mut self.nodes[child.0].parents, parent);
        push_unique(&mut self.nodes[parent.0].children, child);
    }

    fn add_peers(&mut self, a: NodeIndex, b: NodeIndex) {
        push_unique(&mut self.nodes[a.0].peers, b);
        push_unique(&mut self.nodes[b.0].peers, a);
    }

    fn absorb_flags(&mut self, existing: NodeIndex, incoming: &Node) {
        let node = &mut self.nodes[existing.0];
        let mut changed = false;
        if incoming.hazard && !node.hazard {
            node.hazard = true;
            changed = true;
        }
        if incoming.hazard && node.hazard_message.is_none() && incoming.hazard_message.is_some() {
            node.hazard_message = incoming.hazard_message.clone();
            changed = true;
        }
        for warning in &incoming.warnings {
            if !node.warnings.contains(warning) {
                node.warnings.push(warning.clone());
                changed = true;
            }
        }
        if incoming.preload && !node.preload {
            node.preload = true;
            changed = true;
        }
        if changed {
            self.join_branch(existing);
        }
    }

    /// Adds the node to its branch and makes the branch flags consistent over
    /// every member, this node included.
    fn join_branch(&mut self, index: NodeIndex) {
        let Some(key) = self.nodes[index.0].domain.as_ref().map(|d| d.to_ascii_uppercase()) else {
            return;
        };
        let match_colors = self.config.match_branch_colors;
        let branch = self.branches.entry(key.clone()).or_insert_with(|| Branch {
            color: match_colors.then(|| branch_color(&key)),
            ..Branch::default()
        });

        let node = &self.nodes[index.0];
        if node.hazard {
            branch.hazard = true;
            if let Some(message) = &node.hazard_message
                && !branch.hazard_messages.contains(message)
            {
                branch.hazard_messages.push(message.clone());
            }
        }
        for warning in &node.warnings {
            if !branch.warnings.contains(warning) {
                branch.warnings.push(warning.clone());
            }
        }
        branch.preload |= node.preload;
        push_unique(&mut branch.nodes, index);

        for &member in &branch.nodes {
            let member = &mut self.nodes[member.0];
            member.hazard |= branch.hazard;
            member.preload |= branch.preload;
            if member.warnings.len() != branch.warnings.len() {
                member.warnings = branch.warnings.clone();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeList {
    Substitutes,
    HiddenTargets,
    HiddenSources,
    AccumulatedInto,
}

impl NodeList {
    fn of(self, node: &mut Node) -> &mut Vec<NodeIndex> {
        match self {
            NodeList::Substitutes => &mut node.substitutes,
            NodeList::HiddenTargets => &mut node.hidden_targets,
            NodeList::HiddenSources => &mut node.hidden_sources,
            NodeList::AccumulatedInto => &mut node.accumulated_into,
        }
    }
}

pub(crate) fn push_unique(list: &mut Vec<NodeIndex>, index: NodeIndex) -> bool {
    if list.contains(&index) {
        false
    } else {
        list.push(index);
        true
    }
}

fn pair_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Index<NodeIndex> for Graph {
    type Output = Node;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for Graph {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl Index<EdgeIndex> for Graph {
    type Output = Edge;
    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}
