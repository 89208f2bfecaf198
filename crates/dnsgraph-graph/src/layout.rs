use crate::graph::{Graph, NodeIndex};
use dnsgraph_core::LayoutLimits;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

pub trait Layouter {
    fn execute(&self, graph: &mut Graph);
}

/// Row/column placement for delegation graphs.
///
/// Phase 1 assigns every visible node a row so that it sits below each
/// parent it was discovered from, scheduling nodes from a priority queue
/// seeded with the root. Nodes whose parents are not all placed are retried
/// once the queue drains, forcing their missing parents first, so the pass
/// terminates on cyclic input too. A node that would join a row already
/// holding `max_adjacent` of its neighbours is pushed further down.
///
/// Phase 2 drops empty rows and orders each row: nodes with a neighbour in
/// the same row are placed next to it, alternating sides, and the rest are
/// ordered by the mean column of their neighbours in earlier rows.
///
/// This is a heuristic; it makes no attempt at minimal edge crossings.
pub struct LevelLayouter {
    pub limits: LayoutLimits,
}

impl LevelLayouter {
    /// Priority increments, in tenths of a level.
    const PEER_STEP: u64 = 10;
    const CHILD_STEP: u64 = 11;
    const SINK_STEP: u64 = 12;
    /// Shifts rows without same-row relations left of related ones.
    const UNRELATED_OFFSET: f64 = -10_000.0;

    pub fn new(limits: LayoutLimits) -> Self {
        Self { limits }
    }
}

impl Default for LevelLayouter {
    fn default() -> Self {
        Self::new(LayoutLimits::default())
    }
}

impl Layouter for LevelLayouter {
    fn execute(&self, graph: &mut Graph) {
        let (order, depths) = DepthAssigner::new(graph, self.limits).run();
        let rows = Self::order_rows(graph, &order, &depths);

        for node in &mut graph.nodes {
            node.column = None;
        }
        for (row, members) in rows.iter().enumerate() {
            for (column, &index) in members.iter().enumerate() {
                let node = &mut graph.nodes[index.0];
                node.depth = Some(row);
                node.column = Some(column);
            }
        }
        tracing::debug!(rows = rows.len(), placed = order.len(), "layout assigned");
        graph.levels = rows;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Center,
    Left,
    Right,
    Unrelated,
}

impl LevelLayouter {
    fn order_rows(
        graph: &Graph,
        order: &[NodeIndex],
        depths: &[Option<usize>],
    ) -> Vec<Vec<NodeIndex>> {
        let row_count = depths.iter().flatten().max().map_or(0, |d| d + 1);
        let mut rows: Vec<Vec<NodeIndex>> = vec![Vec::new(); row_count];
        for &index in order {
            if let Some(depth) = depths[index.0] {
                rows[depth].push(index);
            }
        }
        rows.retain(|row| !row.is_empty());
        for row in &mut rows {
            row.sort_by_key(|&index| Reverse(graph[index].children().len()));
        }

        let mut overall: HashMap<NodeIndex, usize> = HashMap::new();
        for row in &mut rows {
            let members = row.clone();
            let mut inner: HashMap<NodeIndex, (f64, Anchor)> = HashMap::new();
            for (j, &index) in members.iter().enumerate() {
                let node = &graph[index];
                let hierarchy: Vec<NodeIndex> =
                    node.children().iter().chain(node.parents()).copied().collect();
                let same_row: Vec<NodeIndex> = members
                    .iter()
                    .copied()
                    .filter(|m| hierarchy.contains(m))
                    .collect();

                if same_row.is_empty() {
                    let positions: Vec<f64> = hierarchy
                        .iter()
                        .filter_map(|h| overall.get(h))
                        .map(|&p| p as f64)
                        .collect();
                    let mean = if positions.is_empty() {
                        0.0
                    } else {
                        positions.iter().sum::<f64>() / positions.len() as f64
                    };
                    inner.insert(index, (mean + Self::UNRELATED_OFFSET, Anchor::Unrelated));
                    continue;
                }

                let (anchor_index, anchor) = *inner
                    .entry(index)
                    .or_insert((3.0 * j as f64 + 1.0, Anchor::Center));
                for (k, neighbour) in same_row.iter().enumerate() {
                    if inner.contains_key(neighbour) {
                        continue;
                    }
                    let placed = match anchor {
                        Anchor::Left => (anchor_index - 1.0, Anchor::Left),
                        Anchor::Right => (anchor_index + 1.0, Anchor::Right),
                        _ if k % 2 == 0 => (anchor_index + 1.0, Anchor::Right),
                        _ => (anchor_index - 1.0, Anchor::Left),
                    };
                    inner.insert(*neighbour, placed);
                }
            }

            let position = |index: &NodeIndex| inner.get(index).map_or(0.0, |p| p.0);
            row.sort_by(|a, b| {
                position(a)
                    .partial_cmp(&position(b))
                    .unwrap_or(Ordering::Equal)
            });
            for (j, &index) in row.iter().enumerate() {
                overall.insert(index, j);
            }
        }
        rows
    }
}

struct DepthAssigner<'a> {
    graph: &'a Graph,
    limits: LayoutLimits,
    root: Option<NodeIndex>,
    visible: Vec<bool>,
    /// Visible parents a node was discovered from (the edge source).
    dep_parents: Vec<Vec<NodeIndex>>,
    /// Visible parents, children and peers.
    related: Vec<Vec<NodeIndex>>,
    depth: Vec<Option<usize>>,
    hint: Vec<usize>,
    priority: Vec<u64>,
    order: Vec<NodeIndex>,
    queue: BinaryHeap<Reverse<(u64, u64, NodeIndex)>>,
    seq: u64,
    retry: Vec<NodeIndex>,
    steps: usize,
    capped: bool,
    scan_radius: usize,
}

impl<'a> DepthAssigner<'a> {
    fn new(graph: &'a Graph, limits: LayoutLimits) -> Self {
        let count = graph.node_count();
        let visible: Vec<bool> = graph.nodes().map(|(_, n)| !n.hidden).collect();
        let mut dep_parents = vec![Vec::new(); count];
        let mut related = vec![Vec::new(); count];
        for (index, node) in graph.nodes() {
            if !visible[index.0] {
                continue;
            }
            dep_parents[index.0] = node
                .parents()
                .iter()
                .copied()
                .filter(|&p| visible[p.0])
                .filter(|&p| {
                    graph
                        .contains_edge(p, index)
                        .is_some_and(|e| graph[e].source == p)
                })
                .collect();
            let mut neighbours: Vec<NodeIndex> = node
                .parents()
                .iter()
                .chain(node.children())
                .chain(node.peers())
                .copied()
                .filter(|&n| visible[n.0] && n != index)
                .collect();
            neighbours.sort();
            neighbours.dedup();
            related[index.0] = neighbours;
        }

        let root = graph
            .root()
            .filter(|r| visible[r.0])
            .or_else(|| graph.node_indices().find(|i| visible[i.0]));

        Self {
            graph,
            limits,
            root,
            visible,
            dep_parents,
            related,
            depth: vec![None; count],
            hint: vec![0; count],
            priority: vec![0; count],
            order: Vec::with_capacity(count),
            queue: BinaryHeap::new(),
            seq: 0,
            retry: Vec::new(),
            steps: 0,
            capped: false,
            scan_radius: graph.levels().len().max(1),
        }
    }

    fn run(mut self) -> (Vec<NodeIndex>, Vec<Option<usize>>) {
        let Some(root) = self.root else {
            return (self.order, self.depth);
        };
        self.enqueue(root, 0);

        loop {
            self.drain();
            let mut pending: Vec<NodeIndex> = std::mem::take(&mut self.retry)
                .into_iter()
                .filter(|&n| !self.placed(n))
                .collect();
            if pending.is_empty() {
                match self.next_unreached() {
                    Some(index) => pending.push(index),
                    None => break,
                }
            } else {
                pending.sort_by(|&a, &b| {
                    self.best_parent_depth(a)
                        .cmp(&self.best_parent_depth(b))
                        .then_with(|| self.name(a).cmp(self.name(b)))
                });
            }

            for index in pending {
                if self.placed(index) {
                    continue;
                }
                let forced = self.place_ancestors(index);
                if forced > 0 {
                    tracing::warn!(
                        node = %self.name(index),
                        forced,
                        "Forcing depth before all parents are placed"
                    );
                }
                self.place(index);
            }
        }
        (self.order, self.depth)
    }

    /// Places every unplaced ancestor of `index`, furthest first, so each one
    /// lands below its own parents. Parents closing a cycle are skipped.
    /// Returns the number of nodes placed.
    fn place_ancestors(&mut self, index: NodeIndex) -> usize {
        let mut on_path = vec![false; self.depth.len()];
        on_path[index.0] = true;
        let mut stack = vec![(index, self.open_parents(index))];
        let mut forced = 0;
        while let Some((node, parents)) = stack.last_mut() {
            match parents.pop() {
                Some(parent) => {
                    if !self.placed(parent) && !on_path[parent.0] {
                        on_path[parent.0] = true;
                        let grandparents = self.open_parents(parent);
                        stack.push((parent, grandparents));
                    }
                }
                None => {
                    let node = *node;
                    stack.pop();
                    if node != index && !self.placed(node) {
                        self.place(node);
                        forced += 1;
                    }
                }
            }
        }
        forced
    }

    /// Unplaced dependency parents, ordered so `pop` yields them by name.
    fn open_parents(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut parents: Vec<NodeIndex> = self.dep_parents[index.0]
            .iter()
            .copied()
            .filter(|&p| !self.placed(p))
            .collect();
        parents.sort_by(|&a, &b| self.name(b).cmp(self.name(a)));
        parents
    }

    fn drain(&mut self) {
        while let Some(Reverse((_, _, index))) = self.queue.pop() {
            if self.steps >= self.limits.max_relaxation_steps {
                tracing::warn!(
                    "Depth assignment did not settle after {} steps, forcing remaining nodes",
                    self.steps
                );
                self.capped = true;
                self.queue.clear();
                return;
            }
            self.steps += 1;
            if self.placed(index) {
                continue;
            }
            self.retry.retain(|&r| r != index);
            if self.ready(index) {
                self.place(index);
            } else {
                self.retry.push(index);
            }
        }
    }

    fn place(&mut self, index: NodeIndex) {
        let base = if Some(index) == self.root {
            0
        } else {
            match self.dep_parents[index.0].iter().filter_map(|p| self.depth[p.0]).max() {
                Some(parent) => parent + 1,
                // No placed parent: sit beside a placed peer, else keep the discovery depth
                None => self.graph[index]
                    .peers()
                    .iter()
                    .filter_map(|p| self.depth[p.0])
                    .max()
                    .unwrap_or_else(|| self.graph[index].depth.unwrap_or(0)),
            }
        };
        let row = self.relieve(index, base.max(self.hint[index.0]));
        self.depth[index.0] = Some(row);
        self.order.push(index);

        // Neighbours already crowded on this row keep their open neighbours off it
        for i in 0..self.related[index.0].len() {
            let neighbour = self.related[index.0][i];
            if self.depth[neighbour.0] != Some(row) || !self.crowded(neighbour, row) {
                continue;
            }
            for j in 0..self.related[neighbour.0].len() {
                let open = self.related[neighbour.0][j];
                if !self.placed(open) {
                    self.hint[open.0] = self.hint[open.0].max(row + 1);
                }
            }
        }

        if !self.capped {
            self.enqueue_children(index);
        }
    }

    /// Moves a node down to the first row free of its neighbours, or the
    /// least crowded row within the scan radius.
    fn relieve(&self, index: NodeIndex, row: usize) -> usize {
        let crowd = self.related_on_row(index, row);
        if crowd < self.limits.max_adjacent {
            return row;
        }
        let mut best = (crowd, row);
        for step in 1..=self.scan_radius {
            let candidate = row + step;
            let count = self.related_on_row(index, candidate);
            if count == 0 {
                return candidate;
            }
            if count < best.0 {
                best = (count, candidate);
            }
        }
        best.1
    }

    fn enqueue_children(&mut self, index: NodeIndex) {
        let base = self.priority[index.0] / 10 * 10;
        let mut children: Vec<NodeIndex> = self.graph[index]
            .children()
            .iter()
            .copied()
            .filter(|&c| self.visible[c.0] && !self.placed(c))
            .collect();
        children.sort_by(|&a, &b| {
            self.dep_parents[a.0]
                .len()
                .cmp(&self.dep_parents[b.0].len())
                .then_with(|| self.name(a).cmp(self.name(b)))
        });
        for child in children {
            let step = if self.graph[index].is_peer(child) {
                LevelLayouter::PEER_STEP
            } else if self.is_sink(child) {
                LevelLayouter::SINK_STEP
            } else {
                LevelLayouter::CHILD_STEP
            };
            self.enqueue(child, base + step);
        }
    }

    fn enqueue(&mut self, index: NodeIndex, priority: u64) {
        self.priority[index.0] = priority;
        self.seq += 1;
        self.queue.push(Reverse((priority, self.seq, index)));
    }

    fn next_unreached(&self) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&i| self.visible[i.0] && !self.placed(i))
            .min_by(|&a, &b| {
                self.unplaced_parents(a)
                    .cmp(&self.unplaced_parents(b))
                    .then_with(|| self.graph[a].depth.cmp(&self.graph[b].depth))
                    .then_with(|| self.name(a).cmp(self.name(b)))
            })
    }

    fn ready(&self, index: NodeIndex) -> bool {
        Some(index) == self.root || self.dep_parents[index.0].iter().all(|&p| self.placed(p))
    }

    fn placed(&self, index: NodeIndex) -> bool {
        self.depth[index.0].is_some()
    }

    fn is_sink(&self, index: NodeIndex) -> bool {
        self.dep_parents[index.0].len() == 1
            && !self.graph[index].children().iter().any(|c| self.visible[c.0])
    }

    fn crowded(&self, index: NodeIndex, row: usize) -> bool {
        self.related_on_row(index, row) >= self.limits.max_adjacent
    }

    fn related_on_row(&self, index: NodeIndex, row: usize) -> usize {
        self.related[index.0]
            .iter()
            .filter(|n| self.depth[n.0] == Some(row))
            .count()
    }

    fn unplaced_parents(&self, index: NodeIndex) -> usize {
        self.dep_parents[index.0]
            .iter()
            .filter(|&&p| !self.placed(p))
            .count()
    }

    fn best_parent_depth(&self, index: NodeIndex) -> usize {
        self.dep_parents[index.0]
            .iter()
            .filter_map(|p| self.depth[p.0])
            .max()
            .unwrap_or(0)
    }

    fn name(&self, index: NodeIndex) -> &'a str {
        self.graph[index].unique_name()
    }
}

impl Graph {
    /// Runs [`LevelLayouter`] with this graph's configured limits.
    pub fn assign_layout(&mut self) {
        LevelLayouter::new(self.config().layout).execute(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeOptions, Node};
    use dnsgraph_core::{GraphConfig, NodeKind};
    use proptest::prelude::*;

    fn add_node(graph: &mut Graph, name: &str) -> NodeIndex {
        graph.insert_node(Node::new(NodeKind::Domain, name).with_depth(0))
    }

    fn add_edge(graph: &mut Graph, source: NodeIndex, target: NodeIndex) {
        graph
            .insert_edge(source, target, EdgeOptions::default())
            .unwrap();
    }

    fn depth(graph: &Graph, index: NodeIndex) -> usize {
        graph[index].depth.unwrap()
    }

    fn assert_levels_consistent(graph: &Graph) {
        for (row, members) in graph.levels().iter().enumerate() {
            assert!(!members.is_empty(), "row {} is empty", row);
            for (column, &index) in members.iter().enumerate() {
                assert_eq!(graph[index].depth, Some(row));
                assert_eq!(graph[index].column, Some(column));
            }
        }
        let placed: usize = graph.levels().iter().map(Vec::len).sum();
        let visible = graph.nodes().filter(|(_, n)| !n.hidden).count();
        assert_eq!(placed, visible);
    }

    #[test]
    fn test_chain_and_diamond_depths() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let root = add_node(&mut graph, "root.test");
        let a = add_node(&mut graph, "a.test");
        let b = add_node(&mut graph, "b.test");
        let c = add_node(&mut graph, "c.test");
        let d = add_node(&mut graph, "d.test");
        add_edge(&mut graph, root, a);
        add_edge(&mut graph, root, b);
        add_edge(&mut graph, a, c);
        add_edge(&mut graph, c, d);
        add_edge(&mut graph, b, d);

        graph.assign_layout();

        assert_eq!(depth(&graph, root), 0);
        assert_eq!(depth(&graph, a), 1);
        assert_eq!(depth(&graph, b), 1);
        assert_eq!(depth(&graph, c), 2);
        assert_eq!(depth(&graph, d), 3);
        assert_levels_consistent(&graph);
    }

    #[test]
    fn test_cycle_terminates_and_places_everything() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let a = add_node(&mut graph, "a.test");
        let b = add_node(&mut graph, "b.test");
        let c = add_node(&mut graph, "c.test");
        let orphan = add_node(&mut graph, "orphan.test");
        add_edge(&mut graph, a, b);
        add_edge(&mut graph, b, c);
        add_edge(&mut graph, c, a);
        let _ = orphan;

        graph.assign_layout();

        assert_eq!(depth(&graph, a), 0);
        assert_eq!(depth(&graph, b), 1);
        assert_eq!(depth(&graph, c), 2);
        assert_levels_consistent(&graph);
    }

    #[test]
    fn test_peer_child_sits_below_its_source() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let domain = graph.insert_node(
            Node::new(NodeKind::Domain, "example.com").with_domain("example.com"),
        );
        let ns = graph.insert_node(
            Node::new(NodeKind::Nameserver, "ns1.example.com")
                .with_depth(1)
                .with_domain("example.com"),
        );
        let edge = graph.connect(domain, ns).unwrap();
        assert!(graph[edge].bidirectional);

        graph.assign_layout();

        assert_eq!(depth(&graph, domain), 0);
        assert_eq!(depth(&graph, ns), 1);
    }

    #[test]
    fn test_hidden_nodes_are_not_placed() {
        let mut graph = Graph::default();
        let domain = graph.insert_node(
            Node::new(NodeKind::Domain, "example.com").with_domain("example.com"),
        );
        let ns = graph.insert_node(
            Node::new(NodeKind::Nameserver, "ns1.example.com")
                .with_depth(1)
                .with_domain("example.com"),
        );
        let zone = graph.insert_node(Node::new(NodeKind::Zone, "COM").with_depth(1));
        graph.connect(domain, ns).unwrap();
        graph.connect(domain, zone).unwrap();

        graph.assign_layout();

        assert_eq!(graph[ns].column, None);
        assert_eq!(graph.levels(), &[vec![domain], vec![zone]]);
        assert_levels_consistent(&graph);
    }

    #[test]
    fn test_empty_rows_are_removed() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let root = add_node(&mut graph, "root.test");
        let far = graph.insert_node(Node::new(NodeKind::Domain, "far.test").with_depth(6));
        let _ = root;

        graph.assign_layout();

        assert_eq!(graph.levels().len(), 2);
        assert_eq!(depth(&graph, far), 1);
        assert_levels_consistent(&graph);
    }

    #[test]
    fn test_rows_follow_parent_columns() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let root = add_node(&mut graph, "root.test");
        let x = add_node(&mut graph, "x.test");
        let y = add_node(&mut graph, "y.test");
        let p = add_node(&mut graph, "p.test");
        let q = add_node(&mut graph, "q.test");
        let r = add_node(&mut graph, "r.test");
        add_edge(&mut graph, root, x);
        add_edge(&mut graph, root, y);
        add_edge(&mut graph, x, p);
        add_edge(&mut graph, y, q);
        add_edge(&mut graph, y, r);

        graph.assign_layout();

        // y has more children so it leads its row; its children lead the next row
        assert_eq!(graph.levels()[1], vec![y, x]);
        assert_eq!(graph[p].column, Some(2));
        assert_levels_consistent(&graph);
    }

    #[test]
    fn test_relaxation_cap_still_places_all_nodes() {
        let mut config = GraphConfig::show_all();
        config.layout.max_relaxation_steps = 1;
        let mut graph = Graph::new(config);
        let root = add_node(&mut graph, "root.test");
        let a = add_node(&mut graph, "a.test");
        let b = add_node(&mut graph, "b.test");
        add_edge(&mut graph, root, a);
        add_edge(&mut graph, a, b);

        graph.assign_layout();

        assert!(depth(&graph, a) > depth(&graph, root));
        assert!(depth(&graph, b) > depth(&graph, a));
        assert_levels_consistent(&graph);
    }

    #[test]
    fn test_parentless_ancestor_is_placed_above_forced_parent() {
        let mut graph = Graph::new(GraphConfig::show_all());
        let root = add_node(&mut graph, "root.test");
        let grandparent = add_node(&mut graph, "g.test");
        let parent = add_node(&mut graph, "p.test");
        let child = add_node(&mut graph, "x.test");
        add_edge(&mut graph, root, child);
        add_edge(&mut graph, grandparent, parent);
        add_edge(&mut graph, parent, child);

        graph.assign_layout();

        assert!(depth(&graph, parent) > depth(&graph, grandparent));
        assert!(depth(&graph, child) > depth(&graph, parent));
        assert!(depth(&graph, child) > depth(&graph, root));
        assert_levels_consistent(&graph);
    }

    /// DAGs over nodes `0..n` with edges from lower to higher index. Node 0 is
    /// the graph root; any other node may have no parent, giving extra roots.
    fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (2usize..18).prop_flat_map(|n| {
            let spine = proptest::collection::vec(
                proptest::option::weighted(0.7, any::<prop::sample::Index>()),
                n - 1,
            );
            let extra = proptest::collection::vec((0..n, 0..n), 0..n * 2);
            (Just(n), spine, extra).prop_map(|(n, spine, extra)| {
                let mut edges: Vec<(usize, usize)> = spine
                    .iter()
                    .enumerate()
                    .filter_map(|(i, pick)| pick.as_ref().map(|pick| (pick.index(i + 1), i + 1)))
                    .collect();
                edges.extend(
                    extra
                        .into_iter()
                        .filter(|(a, b)| a != b)
                        .map(|(a, b)| (a.min(b), a.max(b))),
                );
                (n, edges)
            })
        })
    }

    fn build(n: usize, edges: &[(usize, usize)]) -> (Graph, Vec<NodeIndex>) {
        let mut graph = Graph::new(GraphConfig::show_all());
        let nodes: Vec<NodeIndex> = (0..n)
            .map(|i| add_node(&mut graph, &format!("n{}.test", i)))
            .collect();
        for &(a, b) in edges {
            add_edge(&mut graph, nodes[a], nodes[b]);
        }
        (graph, nodes)
    }

    proptest! {
        /// Every node sits at least one row below each of its parents.
        #[test]
        fn prop_depth_exceeds_parent_depth((n, edges) in dag_strategy()) {
            let (mut graph, nodes) = build(n, &edges);
            graph.assign_layout();
            for &(a, b) in &edges {
                let (da, db) = (graph[nodes[a]].depth.unwrap(), graph[nodes[b]].depth.unwrap());
                prop_assert!(db >= da + 1, "edge {} -> {}: depth {} vs {}", a, b, da, db);
            }
        }

        /// Layout is a pure function of graph structure.
        #[test]
        fn prop_layout_is_deterministic((n, edges) in dag_strategy()) {
            let (mut first, _) = build(n, &edges);
            let (mut second, _) = build(n, &edges);
            first.assign_layout();
            second.assign_layout();
            prop_assert_eq!(first.levels(), second.levels());
        }

        /// Arbitrary edge sets, cycles included, still place every node once.
        #[test]
        fn prop_cyclic_graphs_terminate(
            n in 2usize..12,
            raw in proptest::collection::vec((0usize..12, 0usize..12), 0..40)
        ) {
            let edges: Vec<(usize, usize)> = raw
                .into_iter()
                .map(|(a, b)| (a % n, b % n))
                .filter(|(a, b)| a != b)
                .collect();
            let (mut graph, _) = build(n, &edges);
            graph.assign_layout();
            let placed: usize = graph.levels().iter().map(Vec::len).sum();
            prop_assert_eq!(placed, n);
            for (row, members) in graph.levels().iter().enumerate() {
                prop_assert!(!members.is_empty());
                for (column, &index) in members.iter().enumerate() {
                    prop_assert_eq!(graph[index].depth, Some(row));
                    prop_assert_eq!(graph[index].column, Some(column));
                }
            }
        }
    }
}
