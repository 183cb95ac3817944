//! Renderable scenes
//!
//! A [`Checkpoint`] is what every algorithm yields: a caption for the info
//! pane and a [`Scene`] that is already final when it is handed out. Scenes
//! own their data, so the UI can keep the last one on screen after the
//! producer is gone.

use super::bst::Bst;
use super::graph::Graph;
use rustc_hash::FxHashMap;
use std::ops::Range;

/// Highlight roles shared by every scene kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Compare,
    Swap,
    Sorted,
    Pivot,
    /// Region currently being worked on (sub-array, window, ...)
    Range,
    Current,
    Found,
    Visited,
    Frontier,
    /// Edge or node that is part of a spanning tree
    Tree,
    Mismatch,
    Rejected,
}

/// Index → highlight. Later marks replace earlier ones.
pub type Marks = FxHashMap<usize, Highlight>;

#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub caption: String,
    pub scene: Scene,
}

impl Checkpoint {
    pub fn new(caption: impl Into<String>, scene: impl Into<Scene>) -> Self {
        Checkpoint {
            caption: caption.into(),
            scene: scene.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Bars(BarScene),
    Sequence(SequenceScene),
    Heap(HeapScene),
    Tree(TreeScene),
    Graph(GraphScene),
    Hanoi(HanoiScene),
    Text(TextScene),
    Board(BoardScene),
}

impl Scene {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scene::Bars(_) => "bars",
            Scene::Sequence(_) => "sequence",
            Scene::Heap(_) => "heap",
            Scene::Tree(_) => "tree",
            Scene::Graph(_) => "graph",
            Scene::Hanoi(_) => "hanoi",
            Scene::Text(_) => "text",
            Scene::Board(_) => "board",
        }
    }
}

fn mark(marks: &mut Marks, index: usize, highlight: Highlight) {
    marks.insert(index, highlight);
}

fn mark_range(marks: &mut Marks, range: Range<usize>, highlight: Highlight) {
    for i in range {
        marks.insert(i, highlight);
    }
}

/// Bar chart of an array being sorted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarScene {
    pub values: Vec<i64>,
    pub marks: Marks,
}

impl BarScene {
    pub fn new(values: &[i64]) -> Self {
        BarScene {
            values: values.to_vec(),
            marks: Marks::default(),
        }
    }

    pub fn mark(mut self, index: usize, highlight: Highlight) -> Self {
        if index < self.values.len() {
            mark(&mut self.marks, index, highlight);
        }
        self
    }

    pub fn mark_range(mut self, range: Range<usize>, highlight: Highlight) -> Self {
        let end = range.end.min(self.values.len());
        mark_range(&mut self.marks, range.start..end, highlight);
        self
    }

    pub fn mark_where(mut self, flags: &[bool], highlight: Highlight) -> Self {
        for (i, _) in flags.iter().enumerate().filter(|(_, f)| **f) {
            mark(&mut self.marks, i, highlight);
        }
        self
    }

    pub fn highlight(&self, index: usize) -> Option<Highlight> {
        self.marks.get(&index).copied()
    }
}

impl From<BarScene> for Scene {
    fn from(scene: BarScene) -> Self {
        Scene::Bars(scene)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// Index 0 is the bottom of the stack
    Stack,
    /// Index 0 is the front of the queue
    Queue,
    /// Index 0 is the head node
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceScene {
    pub kind: SequenceKind,
    pub items: Vec<String>,
    pub marks: Marks,
}

impl SequenceScene {
    pub fn new(kind: SequenceKind, items: &[String]) -> Self {
        SequenceScene {
            kind,
            items: items.to_vec(),
            marks: Marks::default(),
        }
    }

    pub fn mark(mut self, index: usize, highlight: Highlight) -> Self {
        if index < self.items.len() {
            mark(&mut self.marks, index, highlight);
        }
        self
    }

    pub fn mark_range(mut self, range: Range<usize>, highlight: Highlight) -> Self {
        let end = range.end.min(self.items.len());
        mark_range(&mut self.marks, range.start..end, highlight);
        self
    }
}

impl From<SequenceScene> for Scene {
    fn from(scene: SequenceScene) -> Self {
        Scene::Sequence(scene)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOrder {
    Min,
    Max,
}

impl HeapOrder {
    /// Whether `a` belongs above `b`
    pub fn above(self, a: i64, b: i64) -> bool {
        match self {
            HeapOrder::Min => a < b,
            HeapOrder::Max => a > b,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HeapOrder::Min => "min",
            HeapOrder::Max => "max",
        }
    }
}

/// Array-backed binary heap; children of `i` are `2i + 1` and `2i + 2`
#[derive(Debug, Clone, PartialEq)]
pub struct HeapScene {
    pub order: HeapOrder,
    pub items: Vec<i64>,
    pub marks: Marks,
}

impl HeapScene {
    pub fn new(order: HeapOrder, items: &[i64]) -> Self {
        HeapScene {
            order,
            items: items.to_vec(),
            marks: Marks::default(),
        }
    }

    pub fn mark(mut self, index: usize, highlight: Highlight) -> Self {
        if index < self.items.len() {
            mark(&mut self.marks, index, highlight);
        }
        self
    }
}

impl From<HeapScene> for Scene {
    fn from(scene: HeapScene) -> Self {
        Scene::Heap(scene)
    }
}

/// Binary search tree; marks are keyed by arena slot
#[derive(Debug, Clone, PartialEq)]
pub struct TreeScene {
    pub tree: Bst,
    pub marks: Marks,
}

impl TreeScene {
    pub fn new(tree: &Bst) -> Self {
        TreeScene {
            tree: tree.clone(),
            marks: Marks::default(),
        }
    }

    pub fn mark(mut self, slot: usize, highlight: Highlight) -> Self {
        mark(&mut self.marks, slot, highlight);
        self
    }
}

impl From<TreeScene> for Scene {
    fn from(scene: TreeScene) -> Self {
        Scene::Tree(scene)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphScene {
    pub graph: Graph,
    pub node_marks: Marks,
    /// Keyed by edge index
    pub edge_marks: Marks,
    /// Prim's tentative costs; `None` is infinity. Empty for unweighted runs.
    pub costs: Vec<Option<u32>>,
    /// Queue (BFS) or stack (DFS) contents, front first
    pub frontier: Vec<usize>,
    /// Visit order so far
    pub order: Vec<usize>,
}

impl GraphScene {
    pub fn new(graph: &Graph) -> Self {
        GraphScene {
            graph: graph.clone(),
            node_marks: Marks::default(),
            edge_marks: Marks::default(),
            costs: Vec::new(),
            frontier: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn order_labels(&self) -> String {
        self.order
            .iter()
            .map(|&n| self.graph.label(n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<GraphScene> for Scene {
    fn from(scene: GraphScene) -> Self {
        Scene::Graph(scene)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HanoiScene {
    /// Disk sizes per rod, bottom first
    pub rods: [Vec<u32>; 3],
    /// Disk held above a rod during a move
    pub lifted: Option<(u32, usize)>,
    pub moves: usize,
    pub total_moves: usize,
}

impl From<HanoiScene> for Scene {
    fn from(scene: HanoiScene) -> Self {
        Scene::Hanoi(scene)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextScene {
    pub text: Vec<char>,
    pub pattern: Vec<char>,
    /// Current alignment of the pattern under the text
    pub offset: Option<usize>,
    pub text_marks: Marks,
    pub pattern_marks: Marks,
    pub matches: Vec<usize>,
}

impl TextScene {
    pub fn new(text: &[char], pattern: &[char]) -> Self {
        TextScene {
            text: text.to_vec(),
            pattern: pattern.to_vec(),
            offset: None,
            text_marks: Marks::default(),
            pattern_marks: Marks::default(),
            matches: Vec::new(),
        }
    }
}

impl From<TextScene> for Scene {
    fn from(scene: TextScene) -> Self {
        Scene::Text(scene)
    }
}

pub type Grid = [[u8; 9]; 9];

#[derive(Debug, Clone, PartialEq)]
pub struct BoardScene {
    pub cells: Grid,
    /// Cells given by the puzzle
    pub fixed: [[bool; 9]; 9],
    /// Keyed by `row * 9 + col`
    pub marks: Marks,
}

impl BoardScene {
    pub fn new(cells: &Grid, fixed: &[[bool; 9]; 9]) -> Self {
        BoardScene {
            cells: *cells,
            fixed: *fixed,
            marks: Marks::default(),
        }
    }

    pub fn mark(mut self, row: usize, col: usize, highlight: Highlight) -> Self {
        mark(&mut self.marks, row * 9 + col, highlight);
        self
    }
}

impl From<BoardScene> for Scene {
    fn from(scene: BoardScene) -> Self {
        Scene::Board(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_marks_win() {
        let scene = BarScene::new(&[3, 1, 2])
            .mark_range(0..3, Highlight::Sorted)
            .mark(1, Highlight::Compare);
        assert_eq!(scene.highlight(0), Some(Highlight::Sorted));
        assert_eq!(scene.highlight(1), Some(Highlight::Compare));
    }

    #[test]
    fn test_out_of_range_marks_are_dropped() {
        let scene = BarScene::new(&[1, 2]).mark(5, Highlight::Swap).mark_range(1..9, Highlight::Range);
        assert_eq!(scene.marks.len(), 1);
        assert_eq!(scene.highlight(1), Some(Highlight::Range));
    }

    #[test]
    fn test_heap_order() {
        assert!(HeapOrder::Min.above(1, 2));
        assert!(HeapOrder::Max.above(2, 1));
        assert!(!HeapOrder::Max.above(2, 2));
    }
}
