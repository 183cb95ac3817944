//! Undirected sample graphs and the traversals run on them
//!
//! Nodes are indexed `0..n` and labelled `A`, `B`, ... . The sample
//! generator uses fixed edge sets for small graphs and a path with skip
//! edges plus a few random chords for larger ones.

use super::scene::{Checkpoint, GraphScene, Highlight};
use crate::producer::{Flow, Machine, Outbox, ProducerError};
use rand::Rng;
use std::collections::VecDeque;
use std::ops::RangeInclusive;

pub const NODE_RANGE: RangeInclusive<usize> = 3..=12;
pub const WEIGHT_RANGE: RangeInclusive<u32> = 1..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: Option<u32>,
}

impl Edge {
    pub fn other(&self, node: usize) -> usize {
        if self.from == node {
            self.to
        } else {
            self.from
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    nodes: usize,
    edges: Vec<Edge>,
    /// Per node: (neighbour, edge index), in insertion order
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Graph {
    pub fn new(nodes: usize) -> Self {
        Graph {
            nodes,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); nodes],
        }
    }

    /// Adds an undirected edge. Self loops, unknown nodes and duplicates are
    /// ignored; returns whether the edge was added.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: Option<u32>) -> bool {
        if from == to || from >= self.nodes || to >= self.nodes || self.edge_between(from, to).is_some() {
            return false;
        }
        let index = self.edges.len();
        self.edges.push(Edge { from, to, weight });
        self.adjacency[from].push((to, index));
        self.adjacency[to].push((from, index));
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn neighbours(&self, node: usize) -> &[(usize, usize)] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_between(&self, a: usize, b: usize) -> Option<usize> {
        self.neighbours(a)
            .iter()
            .find(|(n, _)| *n == b)
            .map(|&(_, e)| e)
    }

    pub fn is_weighted(&self) -> bool {
        !self.edges.is_empty() && self.edges.iter().all(|e| e.weight.is_some())
    }

    pub fn label(&self, node: usize) -> String {
        label(node)
    }

    /// Case-insensitive label lookup
    pub fn find(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_uppercase();
        (0..self.nodes).find(|&n| label(n) == wanted)
    }

    /// Generate the sample graph for `nodes` nodes
    pub fn sample(nodes: usize, weighted: bool, rng: &mut impl Rng) -> Self {
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        let n = nodes;
        if n == 5 {
            pairs.extend([(0, 1), (0, 2), (1, 3), (2, 4), (3, 4), (1, 2)]);
        } else if n > 1 && n <= 7 {
            let five = if n > 5 { 5 } else { 0 };
            let six = if n > 6 { 6 } else { 1 };
            pairs.extend([
                (0, 1),
                (0, 2),
                (1, 3),
                (2, 3),
                (2, 4),
                (3, five % n),
                (4, five % n),
                (five, six % n),
                (0, 4 % n),
            ]);
        } else if n > 7 {
            for i in 0..n - 1 {
                pairs.push((i, (i + 1) % n));
                if i < n - 2 {
                    pairs.push((i, (i + 2) % n));
                }
            }
            for _ in 0..n / 3 {
                let (u, v) = (rng.gen_range(0..n), rng.gen_range(0..n));
                pairs.push((u, v));
            }
        }

        let mut graph = Graph::new(n);
        for (from, to) in pairs {
            let weight = weighted.then(|| rng.gen_range(WEIGHT_RANGE));
            graph.add_edge(from, to, weight);
        }
        graph
    }
}

pub fn label(node: usize) -> String {
    match u8::try_from(node) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => format!("N{}", node),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphAlgorithm {
    Bfs,
    Dfs,
    Prim,
}

/// Breadth-first traversal from `start`
pub struct Bfs {
    graph: Graph,
    start: usize,
    queue: VecDeque<usize>,
    visited: Vec<bool>,
    order: Vec<usize>,
    /// Node whose neighbours are being scanned, and the scan position
    scanning: Option<(usize, usize)>,
    started: bool,
}

impl Bfs {
    pub fn new(graph: Graph, start: usize) -> Self {
        let visited = vec![false; graph.node_count()];
        Bfs {
            graph,
            start,
            queue: VecDeque::new(),
            visited,
            order: Vec::new(),
            scanning: None,
            started: false,
        }
    }

    fn scene(&self) -> GraphScene {
        let mut scene = GraphScene::new(&self.graph);
        for (n, _) in self.visited.iter().enumerate().filter(|(_, v)| **v) {
            scene.node_marks.insert(n, Highlight::Visited);
        }
        for &n in &self.queue {
            scene.node_marks.insert(n, Highlight::Frontier);
        }
        scene.frontier = self.queue.iter().copied().collect();
        scene.order = self.order.clone();
        scene
    }
}

impl Machine for Bfs {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if !self.started {
            self.started = true;
            self.visited[self.start] = true;
            self.queue.push_back(self.start);
            out.emit(Checkpoint::new(
                format!("Starting BFS from node {}. Enqueued {}.", label(self.start), label(self.start)),
                self.scene(),
            ));
            return Ok(Flow::Continue);
        }

        if let Some((node, pos)) = self.scanning {
            let Some(&(next, edge)) = self.graph.neighbours(node).get(pos) else {
                self.scanning = None;
                return Ok(Flow::Continue);
            };
            self.scanning = Some((node, pos + 1));
            let caption = if self.visited[next] {
                format!("Neighbour {} of {} already visited.", label(next), label(node))
            } else {
                self.visited[next] = true;
                self.queue.push_back(next);
                format!("Enqueued unvisited neighbour {} of {}.", label(next), label(node))
            };
            let mut scene = self.scene();
            scene.node_marks.insert(node, Highlight::Current);
            scene.edge_marks.insert(edge, Highlight::Compare);
            out.emit(Checkpoint::new(caption, scene));
            return Ok(Flow::Continue);
        }

        match self.queue.pop_front() {
            Some(node) => {
                self.order.push(node);
                self.scanning = Some((node, 0));
                let mut scene = self.scene();
                scene.node_marks.insert(node, Highlight::Current);
                out.emit(Checkpoint::new(format!("Dequeued and visiting {}.", label(node)), scene));
                Ok(Flow::Continue)
            }
            None => {
                let scene = self.scene();
                out.emit(Checkpoint::new(
                    format!("BFS complete. Visit order: {}", scene.order_labels()),
                    scene,
                ));
                Ok(Flow::Complete)
            }
        }
    }

    fn name(&self) -> &str {
        "breadth-first search"
    }
}

/// Depth-first traversal from `start` with an explicit call stack
pub struct Dfs {
    graph: Graph,
    start: usize,
    /// (node, next neighbour position)
    stack: Vec<(usize, usize)>,
    visited: Vec<bool>,
    order: Vec<usize>,
    started: bool,
}

impl Dfs {
    pub fn new(graph: Graph, start: usize) -> Self {
        let visited = vec![false; graph.node_count()];
        Dfs {
            graph,
            start,
            stack: Vec::new(),
            visited,
            order: Vec::new(),
            started: false,
        }
    }

    fn scene(&self) -> GraphScene {
        let mut scene = GraphScene::new(&self.graph);
        for (n, _) in self.visited.iter().enumerate().filter(|(_, v)| **v) {
            scene.node_marks.insert(n, Highlight::Visited);
        }
        for &(n, _) in &self.stack {
            scene.node_marks.insert(n, Highlight::Frontier);
        }
        if let Some(&(top, _)) = self.stack.last() {
            scene.node_marks.insert(top, Highlight::Current);
        }
        scene.frontier = self.stack.iter().map(|&(n, _)| n).collect();
        scene.order = self.order.clone();
        scene
    }

    fn enter(&mut self, node: usize) {
        self.visited[node] = true;
        self.order.push(node);
        self.stack.push((node, 0));
    }
}

impl Machine for Dfs {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if !self.started {
            self.started = true;
            self.enter(self.start);
            out.emit(Checkpoint::new(
                format!("Starting DFS from node {}. Visiting {}.", label(self.start), label(self.start)),
                self.scene(),
            ));
            return Ok(Flow::Continue);
        }

        let Some(&(node, pos)) = self.stack.last() else {
            let scene = self.scene();
            out.emit(Checkpoint::new(
                format!("DFS complete. Visit order: {}", scene.order_labels()),
                scene,
            ));
            return Ok(Flow::Complete);
        };

        match self.graph.neighbours(node).get(pos).copied() {
            Some((next, edge)) => {
                if let Some(top) = self.stack.last_mut() {
                    top.1 += 1;
                }
                let caption = if self.visited[next] {
                    format!("Neighbour {} of {} already visited.", label(next), label(node))
                } else {
                    self.enter(next);
                    format!("Going deeper: {} -> {}. Visiting {}.", label(node), label(next), label(next))
                };
                let mut scene = self.scene();
                scene.edge_marks.insert(edge, Highlight::Compare);
                out.emit(Checkpoint::new(caption, scene));
            }
            None => {
                self.stack.pop();
                let caption = match self.stack.last() {
                    Some(&(parent, _)) => format!("All neighbours of {} explored. Backtracking to {}.", label(node), label(parent)),
                    None => format!("All neighbours of {} explored.", label(node)),
                };
                out.emit(Checkpoint::new(caption, self.scene()));
            }
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "depth-first search"
    }
}

/// Prim's minimum spanning tree, growing from node 0
pub struct Prim {
    graph: Graph,
    costs: Vec<Option<u32>>,
    /// Edge that connects each node to the tree at its current cost
    via: Vec<Option<usize>>,
    in_tree: Vec<bool>,
    /// Node whose edges are being relaxed, and the scan position
    relaxing: Option<(usize, usize)>,
    total: u32,
    started: bool,
}

impl Prim {
    pub fn new(graph: Graph) -> Self {
        let n = graph.node_count();
        let mut costs = vec![None; n];
        if n > 0 {
            costs[0] = Some(0);
        }
        Prim {
            graph,
            costs,
            via: vec![None; n],
            in_tree: vec![false; n],
            relaxing: None,
            total: 0,
            started: false,
        }
    }

    fn scene(&self) -> GraphScene {
        let mut scene = GraphScene::new(&self.graph);
        for (n, _) in self.in_tree.iter().enumerate().filter(|(_, t)| **t) {
            scene.node_marks.insert(n, Highlight::Tree);
            if let Some(edge) = self.via[n] {
                scene.edge_marks.insert(edge, Highlight::Tree);
            }
        }
        scene.costs = self.costs.clone();
        scene
    }

    fn cheapest_outside(&self) -> Option<usize> {
        (0..self.graph.node_count())
            .filter(|&n| !self.in_tree[n])
            .filter_map(|n| self.costs[n].map(|c| (c, n)))
            .min()
            .map(|(_, n)| n)
    }
}

impl Machine for Prim {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if !self.started {
            self.started = true;
            out.emit(Checkpoint::new(
                "Building Minimum Spanning Tree from node A (cost 0).",
                self.scene(),
            ));
            return Ok(Flow::Continue);
        }

        if let Some((node, pos)) = self.relaxing {
            let Some(&(next, edge)) = self.graph.neighbours(node).get(pos) else {
                self.relaxing = None;
                return Ok(Flow::Continue);
            };
            self.relaxing = Some((node, pos + 1));
            let weight = self.graph.edges()[edge].weight.ok_or_else(|| {
                ProducerError::new(format!("edge {}-{} has no weight", label(node), label(next)))
            })?;
            let caption = if self.in_tree[next] {
                format!("{} is already in the MST.", label(next))
            } else if self.costs[next].map_or(true, |c| weight < c) {
                self.costs[next] = Some(weight);
                self.via[next] = Some(edge);
                format!("Edge {}-{} (weight {}) lowers cost of {} to {}.", label(node), label(next), weight, label(next), weight)
            } else {
                format!("Edge {}-{} (weight {}) does not improve cost of {}.", label(node), label(next), weight, label(next))
            };
            let mut scene = self.scene();
            scene.node_marks.insert(node, Highlight::Current);
            scene.edge_marks.insert(edge, Highlight::Compare);
            out.emit(Checkpoint::new(caption, scene));
            return Ok(Flow::Continue);
        }

        if self.in_tree.iter().all(|t| *t) {
            out.emit(Checkpoint::new(
                format!("MST complete. Total weight: {}", self.total),
                self.scene(),
            ));
            return Ok(Flow::Complete);
        }

        match self.cheapest_outside() {
            Some(node) => {
                let cost = self.costs[node].unwrap_or(0);
                self.in_tree[node] = true;
                self.total += cost;
                self.relaxing = Some((node, 0));
                let caption = match self.via[node] {
                    Some(edge) => {
                        let parent = self.graph.edges()[edge].other(node);
                        format!("Adding {} to MST via edge {}-{} (weight {}).", label(node), label(parent), label(node), cost)
                    }
                    None => format!("Adding {} to MST.", label(node)),
                };
                let mut scene = self.scene();
                scene.node_marks.insert(node, Highlight::Current);
                out.emit(Checkpoint::new(caption, scene));
                Ok(Flow::Continue)
            }
            None => {
                let unreachable: Vec<String> = (0..self.graph.node_count())
                    .filter(|&n| !self.in_tree[n])
                    .map(label)
                    .collect();
                let mut scene = self.scene();
                for n in (0..self.graph.node_count()).filter(|&n| !self.in_tree[n]) {
                    scene.node_marks.insert(n, Highlight::Rejected);
                }
                out.emit(Checkpoint::new(
                    format!(
                        "Graph is disconnected: {} unreachable. Partial MST weight: {}",
                        unreachable.join(", "),
                        self.total
                    ),
                    scene,
                ));
                Ok(Flow::Complete)
            }
        }
    }

    fn name(&self) -> &str {
        "prim's mst"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{Driven, Step, StepProducer};
    use crate::viz::scene::Scene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drain<M: Machine<Checkpoint = Checkpoint>>(machine: M) -> Vec<Checkpoint> {
        let mut producer = Driven::new(machine);
        let mut seen = Vec::new();
        loop {
            match producer.next_checkpoint() {
                Step::Yielded(c) => seen.push(c),
                Step::Done => return seen,
                Step::Failed(e) => panic!("graph run failed: {}", e),
            }
        }
    }

    fn last_graph(checkpoints: &[Checkpoint]) -> GraphScene {
        match &checkpoints.last().unwrap().scene {
            Scene::Graph(g) => g.clone(),
            other => panic!("Expected graph scene, got {}", other.kind_name()),
        }
    }

    fn path(n: usize) -> Graph {
        let mut g = Graph::new(n);
        for i in 0..n.saturating_sub(1) {
            g.add_edge(i, i + 1, Some(1));
        }
        g
    }

    #[test]
    fn test_sample_graph_sizes() {
        let mut rng = StdRng::seed_from_u64(11);
        let five = Graph::sample(5, false, &mut rng);
        assert_eq!(five.edges().len(), 6);
        let seven = Graph::sample(7, false, &mut rng);
        assert_eq!(seven.edges().len(), 9);
        for n in NODE_RANGE {
            let g = Graph::sample(n, true, &mut rng);
            assert_eq!(g.node_count(), n);
            assert!(g.is_weighted());
            assert!(g.edges().iter().all(|e| e.from != e.to));
            // the sample is always connected
            let order = last_graph(&drain(Bfs::new(g, 0))).order;
            assert_eq!(order.len(), n, "n = {}", n);
        }
    }

    #[test]
    fn test_duplicate_edges_are_ignored() {
        let mut g = Graph::new(3);
        assert!(g.add_edge(0, 1, None));
        assert!(!g.add_edge(1, 0, None));
        assert!(!g.add_edge(2, 2, None));
        assert!(!g.add_edge(0, 7, None));
        assert_eq!(g.edges().len(), 1);
    }

    #[test]
    fn test_labels() {
        let g = Graph::new(4);
        assert_eq!(g.label(0), "A");
        assert_eq!(g.find("c"), Some(2));
        assert_eq!(g.find("Z"), None);
    }

    #[test]
    fn test_bfs_order_is_level_order() {
        // A-B, A-C, B-D, C-E
        let mut g = Graph::new(5);
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 4)] {
            g.add_edge(a, b, None);
        }
        let scene = last_graph(&drain(Bfs::new(g, 0)));
        assert_eq!(scene.order_labels(), "A B C D E");
    }

    #[test]
    fn test_dfs_goes_deep_first() {
        let mut g = Graph::new(5);
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 4)] {
            g.add_edge(a, b, None);
        }
        let checkpoints = drain(Dfs::new(g, 0));
        let scene = last_graph(&checkpoints);
        assert_eq!(scene.order_labels(), "A B D C E");
        assert!(scene.frontier.is_empty());
        assert!(checkpoints.iter().any(|c| c.caption.contains("Backtracking to A")));
    }

    #[test]
    fn test_traversal_from_other_start() {
        let scene = last_graph(&drain(Dfs::new(path(4), 2)));
        assert_eq!(scene.order_labels(), "C B A D");
    }

    #[test]
    fn test_prim_minimum_weight() {
        // triangle A-B 1, B-C 2, A-C 5 plus pendant C-D 3
        let mut g = Graph::new(4);
        g.add_edge(0, 1, Some(1));
        g.add_edge(1, 2, Some(2));
        g.add_edge(0, 2, Some(5));
        g.add_edge(2, 3, Some(3));
        let checkpoints = drain(Prim::new(g));
        assert_eq!(checkpoints.last().unwrap().caption, "MST complete. Total weight: 6");
        let scene = last_graph(&checkpoints);
        let tree_edges = scene.edge_marks.values().filter(|h| **h == Highlight::Tree).count();
        assert_eq!(tree_edges, 3);
        assert_eq!(scene.costs, vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_prim_reports_unreachable() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1, Some(4));
        g.add_edge(2, 3, Some(1));
        let checkpoints = drain(Prim::new(g));
        let last = &checkpoints.last().unwrap().caption;
        assert!(last.contains("C, D unreachable"), "{}", last);
        assert!(last.contains("Partial MST weight: 4"), "{}", last);
    }

    #[test]
    fn test_prim_requires_weights() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, None);
        let mut producer = Driven::new(Prim::new(g));
        let mut failed = false;
        for _ in 0..10 {
            match producer.next_checkpoint() {
                Step::Failed(e) => {
                    assert!(e.message().contains("no weight"));
                    failed = true;
                    break;
                }
                Step::Done => break,
                Step::Yielded(_) => {}
            }
        }
        assert!(failed);
    }
}
