//! Binary search tree stored in an arena
//!
//! Nodes are never removed, so arena slots double as stable node ids for
//! highlighting across checkpoints.

use super::scene::{Checkpoint, Highlight, TreeScene};
use crate::producer::{Flow, Machine, Outbox, ProducerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BstNode {
    pub value: i64,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bst {
    nodes: Vec<BstNode>,
    root: Option<usize>,
}

/// Where a node sits in the drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: usize,
    /// In-order rank, used as the horizontal position
    pub column: usize,
    pub depth: usize,
}

impl Bst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn node(&self, slot: usize) -> Option<&BstNode> {
        self.nodes.get(slot)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Plain insert; returns the new slot, or `None` for a duplicate
    pub fn insert(&mut self, value: i64) -> Option<usize> {
        let Some(mut at) = self.root else {
            self.root = Some(self.alloc(value));
            return self.root;
        };
        loop {
            let node = self.nodes[at];
            let next = if value < node.value {
                node.left
            } else if value > node.value {
                node.right
            } else {
                return None;
            };
            match next {
                Some(child) => at = child,
                None => {
                    let slot = self.alloc(value);
                    self.attach(at, slot, value < node.value);
                    return Some(slot);
                }
            }
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        let mut at = self.root;
        while let Some(slot) = at {
            let node = self.nodes[slot];
            if value == node.value {
                return true;
            }
            at = if value < node.value { node.left } else { node.right };
        }
        false
    }

    pub fn in_order(&self) -> Vec<i64> {
        self.layout()
            .into_iter()
            .map(|p| self.nodes[p.slot].value)
            .collect()
    }

    pub fn height(&self) -> usize {
        self.layout().iter().map(|p| p.depth + 1).max().unwrap_or(0)
    }

    /// In-order placement of every node, computed without recursion
    pub fn layout(&self) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut at = self.root.map(|r| (r, 0));
        loop {
            while let Some((slot, depth)) = at {
                stack.push((slot, depth));
                at = self.nodes[slot].left.map(|l| (l, depth + 1));
            }
            let Some((slot, depth)) = stack.pop() else {
                break;
            };
            placements.push(Placement {
                slot,
                column: placements.len(),
                depth,
            });
            at = self.nodes[slot].right.map(|r| (r, depth + 1));
        }
        placements
    }

    fn alloc(&mut self, value: i64) -> usize {
        self.nodes.push(BstNode {
            value,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: usize, child: usize, left: bool) {
        if left {
            self.nodes[parent].left = Some(child);
        } else {
            self.nodes[parent].right = Some(child);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BstAction {
    Insert,
    Search,
}

/// Root-to-leaf walk for one insert or search
pub struct BstWalk {
    tree: Bst,
    value: i64,
    action: BstAction,
    cursor: Option<usize>,
    path: Vec<usize>,
    started: bool,
    /// Result is shown; the next resume emits the settled tree
    settled: bool,
}

impl BstWalk {
    pub fn new(tree: &Bst, value: i64, action: BstAction) -> Self {
        BstWalk {
            tree: tree.clone(),
            value,
            action,
            cursor: tree.root(),
            path: Vec::new(),
            started: false,
            settled: false,
        }
    }

    fn scene(&self) -> TreeScene {
        let mut scene = TreeScene::new(&self.tree);
        for &slot in &self.path {
            scene = scene.mark(slot, Highlight::Visited);
        }
        scene
    }

    fn settle(&mut self, caption: String, mark: Option<(usize, Highlight)>, out: &mut Outbox<Checkpoint>) {
        let mut scene = self.scene();
        if let Some((slot, h)) = mark {
            scene = scene.mark(slot, h);
        }
        out.emit(Checkpoint::new(caption, scene));
        self.settled = true;
    }
}

impl Machine for BstWalk {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if self.settled {
            out.emit(Checkpoint::new(
                format!("Tree has {} nodes (height {})", self.tree.len(), self.tree.height()),
                TreeScene::new(&self.tree),
            ));
            return Ok(Flow::Complete);
        }
        let verb = match self.action {
            BstAction::Insert => "Inserting",
            BstAction::Search => "Searching for",
        };
        if !self.started {
            self.started = true;
            if self.tree.root().is_none() {
                match self.action {
                    BstAction::Insert => {
                        let slot = self.tree.insert(self.value);
                        self.settle(
                            format!("Tree was empty. {} becomes the root.", self.value),
                            slot.map(|s| (s, Highlight::Found)),
                            out,
                        );
                    }
                    BstAction::Search => {
                        self.settle("Tree is empty.".to_string(), None, out);
                    }
                }
                return Ok(Flow::Continue);
            }
            out.emit(Checkpoint::new(format!("{} {}", verb, self.value), self.scene()));
            return Ok(Flow::Continue);
        }

        let Some(slot) = self.cursor else {
            return Err(ProducerError::new("tree walk lost its position"));
        };
        let node = self.tree.nodes[slot];
        self.path.push(slot);

        if self.value == node.value {
            match self.action {
                BstAction::Insert => self.settle(
                    format!("{} already exists; duplicates are not inserted.", self.value),
                    Some((slot, Highlight::Rejected)),
                    out,
                ),
                BstAction::Search => self.settle(
                    format!("Found {}.", self.value),
                    Some((slot, Highlight::Found)),
                    out,
                ),
            }
            return Ok(Flow::Continue);
        }

        let go_left = self.value < node.value;
        let (side, next) = if go_left {
            ("left", node.left)
        } else {
            ("right", node.right)
        };
        let cmp = if go_left { '<' } else { '>' };
        out.emit(Checkpoint::new(
            format!("{} {} {}: going {}", self.value, cmp, node.value, side),
            self.scene().mark(slot, Highlight::Compare),
        ));

        match next {
            Some(child) => self.cursor = Some(child),
            None => match self.action {
                BstAction::Insert => {
                    let new = self.tree.alloc(self.value);
                    self.tree.attach(slot, new, go_left);
                    self.settle(
                        format!("Inserted {} as {} child of {}.", self.value, side, node.value),
                        Some((new, Highlight::Found)),
                        out,
                    );
                }
                BstAction::Search => {
                    self.settle(format!("{} not found in tree.", self.value), None, out);
                }
            },
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        match self.action {
            BstAction::Insert => "bst insert",
            BstAction::Search => "bst search",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{Driven, Step, StepProducer};
    use crate::viz::scene::Scene;

    fn tree(values: &[i64]) -> Bst {
        let mut t = Bst::new();
        for &v in values {
            t.insert(v);
        }
        t
    }

    fn walk(t: &Bst, value: i64, action: BstAction) -> Vec<Checkpoint> {
        let mut producer = Driven::new(BstWalk::new(t, value, action));
        let mut seen = Vec::new();
        loop {
            match producer.next_checkpoint() {
                Step::Yielded(c) => seen.push(c),
                Step::Done => return seen,
                Step::Failed(e) => panic!("walk failed: {}", e),
            }
        }
    }

    fn final_tree(checkpoints: &[Checkpoint]) -> Bst {
        match &checkpoints.last().unwrap().scene {
            Scene::Tree(t) => t.tree.clone(),
            other => panic!("Expected tree scene, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_in_order_is_sorted() {
        let t = tree(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(t.in_order(), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(t.height(), 3);
        let layout = t.layout();
        assert_eq!(layout[3].depth, 0);
        assert_eq!(layout[0].depth, 2);
    }

    #[test]
    fn test_duplicate_not_inserted() {
        let mut t = tree(&[5, 3]);
        assert_eq!(t.insert(3), None);
        assert_eq!(t.len(), 2);

        let checkpoints = walk(&t, 5, BstAction::Insert);
        assert!(checkpoints.iter().any(|c| c.caption.contains("duplicates are not inserted")));
        assert_eq!(final_tree(&checkpoints).len(), 2);
    }

    #[test]
    fn test_walk_insert_places_leaf() {
        let t = tree(&[50, 30, 70]);
        let checkpoints = walk(&t, 35, BstAction::Insert);
        let after = final_tree(&checkpoints);
        assert_eq!(after.in_order(), vec![30, 35, 50, 70]);
        assert!(after.contains(35));
        assert!(checkpoints.iter().any(|c| c.caption == "Inserted 35 as right child of 30."));
    }

    #[test]
    fn test_walk_into_empty_tree() {
        let checkpoints = walk(&Bst::new(), -4, BstAction::Insert);
        assert_eq!(final_tree(&checkpoints).in_order(), vec![-4]);
        let searched = walk(&Bst::new(), 1, BstAction::Search);
        assert_eq!(searched[0].caption, "Tree is empty.");
    }

    #[test]
    fn test_walk_search() {
        let t = tree(&[8, 4, 12, 2]);
        let found = walk(&t, 2, BstAction::Search);
        assert!(found.iter().any(|c| c.caption == "Found 2."));
        let missing = walk(&t, 9, BstAction::Search);
        assert!(missing.iter().any(|c| c.caption == "9 not found in tree."));
        assert_eq!(final_tree(&missing), t);
    }
}
