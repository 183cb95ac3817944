//! # Visualizations
//!
//! The closed catalog of everything that can be played. [`VizKind`] is the
//! flat list shown in the sidebar; [`Visualization`] holds the typed model
//! of the selected kind and turns user requests into producers.
//!
//! ## Modules
//!
//! - [`scene`]: checkpoints and the renderable scene types
//! - [`sorting`], [`hanoi`], [`graph`], [`search`], [`sudoku`]: algorithms
//!   run with `start`
//! - [`linear`], [`heap`], [`bst`]: data structures driven by operations
//! - [`input`]: validation of prompt values

pub mod bst;
pub mod graph;
pub mod hanoi;
pub mod heap;
pub mod input;
pub mod linear;
pub mod model;
pub mod scene;
pub mod search;
pub mod sorting;
pub mod sudoku;

pub use input::InputError;
pub use model::{Outcome, Visualization};
pub use scene::{Checkpoint, Highlight, Scene};

use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sorting,
    DataStructures,
    Recursion,
    Graphs,
    Strings,
    Backtracking,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Sorting => "Sorting",
            Category::DataStructures => "Data Structures",
            Category::Recursion => "Recursion",
            Category::Graphs => "Graphs",
            Category::Strings => "Strings",
            Category::Backtracking => "Backtracking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VizKind {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    HeapSort,
    Stack,
    Queue,
    MinHeap,
    MaxHeap,
    LinkedList,
    Bst,
    Hanoi,
    Bfs,
    Dfs,
    Prim,
    StringSearch,
    Sudoku,
}

impl VizKind {
    pub const ALL: [VizKind; 18] = [
        VizKind::BubbleSort,
        VizKind::SelectionSort,
        VizKind::InsertionSort,
        VizKind::MergeSort,
        VizKind::QuickSort,
        VizKind::HeapSort,
        VizKind::Stack,
        VizKind::Queue,
        VizKind::MinHeap,
        VizKind::MaxHeap,
        VizKind::LinkedList,
        VizKind::Bst,
        VizKind::Hanoi,
        VizKind::Bfs,
        VizKind::Dfs,
        VizKind::Prim,
        VizKind::StringSearch,
        VizKind::Sudoku,
    ];

    /// Name accepted by `--viz`
    pub fn cli_name(self) -> &'static str {
        match self {
            VizKind::BubbleSort => "bubble",
            VizKind::SelectionSort => "selection",
            VizKind::InsertionSort => "insertion",
            VizKind::MergeSort => "merge",
            VizKind::QuickSort => "quick",
            VizKind::HeapSort => "heapsort",
            VizKind::Stack => "stack",
            VizKind::Queue => "queue",
            VizKind::MinHeap => "min-heap",
            VizKind::MaxHeap => "max-heap",
            VizKind::LinkedList => "linked-list",
            VizKind::Bst => "bst",
            VizKind::Hanoi => "hanoi",
            VizKind::Bfs => "bfs",
            VizKind::Dfs => "dfs",
            VizKind::Prim => "prim",
            VizKind::StringSearch => "string-search",
            VizKind::Sudoku => "sudoku",
        }
    }

    pub fn from_name(name: &str) -> Option<VizKind> {
        let wanted = name.trim().to_lowercase();
        VizKind::ALL.into_iter().find(|k| k.cli_name() == wanted)
    }

    pub fn title(self) -> &'static str {
        match self {
            VizKind::BubbleSort => "Bubble Sort",
            VizKind::SelectionSort => "Selection Sort",
            VizKind::InsertionSort => "Insertion Sort",
            VizKind::MergeSort => "Merge Sort",
            VizKind::QuickSort => "Quick Sort (Middle Pivot)",
            VizKind::HeapSort => "Heap Sort",
            VizKind::Stack => "Stack (LIFO)",
            VizKind::Queue => "Queue (FIFO)",
            VizKind::MinHeap => "Min-Heap",
            VizKind::MaxHeap => "Max-Heap",
            VizKind::LinkedList => "Singly Linked List",
            VizKind::Bst => "Binary Search Tree",
            VizKind::Hanoi => "Tower of Hanoi",
            VizKind::Bfs => "Breadth-First Search (BFS)",
            VizKind::Dfs => "Depth-First Search (DFS)",
            VizKind::Prim => "Prim's Algorithm (MST)",
            VizKind::StringSearch => "Naive String Search",
            VizKind::Sudoku => "Sudoku Solver (Backtracking)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VizKind::BubbleSort => "Compares adjacent elements and swaps them if out of order. Largest elements 'bubble' to the end.",
            VizKind::SelectionSort => "Finds the minimum element in the unsorted part and swaps it with the element at the current position.",
            VizKind::InsertionSort => "Takes one element at a time and inserts it into its correct position within the already sorted portion.",
            VizKind::MergeSort => "Divide & conquer: recursively splits the array into halves, sorts them, then merges the sorted halves.",
            VizKind::QuickSort => "Picks the middle element as pivot, swaps it to the end, partitions around it and recursively sorts both sides.",
            VizKind::HeapSort => "Builds a max-heap, then repeatedly swaps the root with the last heap element, shrinks the heap and restores it.",
            VizKind::Stack => "Last-in, first-out: push adds an item on top, pop removes the most recently added item.",
            VizKind::Queue => "First-in, first-out: enqueue adds an item at the rear, dequeue removes the item at the front.",
            VizKind::MinHeap => "Complete binary tree where every parent is less than or equal to its children. The root holds the minimum.",
            VizKind::MaxHeap => "Complete binary tree where every parent is greater than or equal to its children. The root holds the maximum.",
            VizKind::LinkedList => "Nodes holding a value and a pointer to the next node. Operations traverse the pointers from the head.",
            VizKind::Bst => "Each node's left subtree is smaller and its right subtree larger. In-order traversal yields sorted values.",
            VizKind::Hanoi => "Move the whole stack from rod A to rod C, one disk at a time, never placing a larger disk on a smaller one.",
            VizKind::Bfs => "Explores neighbours level by level using a FIFO queue. Finds shortest paths in unweighted graphs.",
            VizKind::Dfs => "Explores one branch as deep as possible using a stack, backtracking when stuck.",
            VizKind::Prim => "Grows a minimum spanning tree by repeatedly adding the cheapest edge that reaches a new vertex.",
            VizKind::StringSearch => "Slides the pattern over every same-length window of the text and compares character by character.",
            VizKind::Sudoku => "Fills empty cells one by one, backtracking whenever no digit fits.",
        }
    }

    pub fn category(self) -> Category {
        use VizKind::*;
        match self {
            BubbleSort | SelectionSort | InsertionSort | MergeSort | QuickSort | HeapSort => {
                Category::Sorting
            }
            Stack | Queue | MinHeap | MaxHeap | LinkedList | Bst => Category::DataStructures,
            Hanoi => Category::Recursion,
            Bfs | Dfs | Prim => Category::Graphs,
            StringSearch => Category::Strings,
            Sudoku => Category::Backtracking,
        }
    }

    /// Accepted sizes, for kinds where size means something
    pub fn size_range(self) -> Option<RangeInclusive<usize>> {
        match self.category() {
            Category::Sorting => Some(5..=60),
            Category::Recursion => Some(hanoi::DISK_RANGE),
            Category::Graphs => Some(graph::NODE_RANGE),
            _ if self.is_heap() => Some(heap::HEAP_SIZE_RANGE),
            _ => None,
        }
    }

    pub fn default_size(self) -> usize {
        match self.category() {
            Category::Sorting => 20,
            Category::Recursion => 3,
            Category::Graphs => 7,
            _ if self.is_heap() => 10,
            _ => 0,
        }
    }

    pub fn size_relevant(self) -> bool {
        self.size_range().is_some()
    }

    /// Whether the kind has an algorithm to run with `start`
    pub fn can_start(self) -> bool {
        self.category() != Category::DataStructures
    }

    pub fn is_heap(self) -> bool {
        matches!(self, VizKind::MinHeap | VizKind::MaxHeap)
    }

    pub fn operations(self) -> &'static [OperationSpec] {
        use Operation::*;
        const SORTING: &[OperationSpec] = &[
            OperationSpec::new(BestCase, '1', "Best case", None),
            OperationSpec::new(WorstCase, '2', "Worst case", None),
            OperationSpec::new(AverageCase, '3', "Average case", None),
        ];
        const STACK: &[OperationSpec] = &[
            OperationSpec::new(Insert, 'i', "Push", Some("Value to push")),
            OperationSpec::new(Extract, 'x', "Pop", None),
        ];
        const QUEUE: &[OperationSpec] = &[
            OperationSpec::new(Insert, 'i', "Enqueue", Some("Value to enqueue")),
            OperationSpec::new(Extract, 'x', "Dequeue", None),
        ];
        const MIN_HEAP: &[OperationSpec] = &[
            OperationSpec::new(Insert, 'i', "Insert", Some("Integer to insert")),
            OperationSpec::new(Extract, 'x', "Extract Min", None),
        ];
        const MAX_HEAP: &[OperationSpec] = &[
            OperationSpec::new(Insert, 'i', "Insert", Some("Integer to insert")),
            OperationSpec::new(Extract, 'x', "Extract Max", None),
        ];
        const LIST: &[OperationSpec] = &[
            OperationSpec::new(InsertHead, 'h', "Insert Head", Some("Value for new head")),
            OperationSpec::new(InsertTail, 't', "Insert Tail", Some("Value for new tail")),
            OperationSpec::new(Delete, 'd', "Delete", Some("Value to delete")),
            OperationSpec::new(Search, 'f', "Search", Some("Value to find")),
        ];
        const BST: &[OperationSpec] = &[
            OperationSpec::new(Insert, 'i', "Insert", Some("Integer to insert")),
            OperationSpec::new(Search, 'f', "Search", Some("Integer to find")),
        ];
        const TRAVERSAL: &[OperationSpec] = &[
            OperationSpec::new(StartNode, 'n', "Start node", Some("Start node label")),
            OperationSpec::new(NewGraph, 'g', "New graph", None),
        ];
        const PRIM: &[OperationSpec] = &[OperationSpec::new(NewGraph, 'g', "New graph", None)];
        const TEXT: &[OperationSpec] = &[
            OperationSpec::new(SetText, 't', "Set text", Some("Text to search in")),
            OperationSpec::new(SetPattern, 'p', "Set pattern", Some("Pattern to find")),
        ];
        const SUDOKU: &[OperationSpec] = &[OperationSpec::new(NextBoard, 'b', "Next board", None)];

        match self {
            VizKind::Stack => STACK,
            VizKind::Queue => QUEUE,
            VizKind::MinHeap => MIN_HEAP,
            VizKind::MaxHeap => MAX_HEAP,
            VizKind::LinkedList => LIST,
            VizKind::Bst => BST,
            VizKind::Bfs | VizKind::Dfs => TRAVERSAL,
            VizKind::Prim => PRIM,
            VizKind::StringSearch => TEXT,
            VizKind::Sudoku => SUDOKU,
            VizKind::Hanoi => &[],
            _ => SORTING,
        }
    }

    pub fn operation_for_key(self, key: char) -> Option<&'static OperationSpec> {
        self.operations().iter().find(|spec| spec.key == key)
    }
}

impl fmt::Display for VizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What an operation key asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Push, enqueue or heap/tree insert
    Insert,
    /// Pop, dequeue or heap extract
    Extract,
    InsertHead,
    InsertTail,
    Delete,
    Search,
    BestCase,
    WorstCase,
    AverageCase,
    StartNode,
    NewGraph,
    SetText,
    SetPattern,
    NextBoard,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::Insert,
        Operation::Extract,
        Operation::InsertHead,
        Operation::InsertTail,
        Operation::Delete,
        Operation::Search,
        Operation::BestCase,
        Operation::WorstCase,
        Operation::AverageCase,
        Operation::StartNode,
        Operation::NewGraph,
        Operation::SetText,
        Operation::SetPattern,
        Operation::NextBoard,
    ];

    pub fn cli_name(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Extract => "extract",
            Operation::InsertHead => "insert-head",
            Operation::InsertTail => "insert-tail",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::BestCase => "best",
            Operation::WorstCase => "worst",
            Operation::AverageCase => "average",
            Operation::StartNode => "start-node",
            Operation::NewGraph => "new-graph",
            Operation::SetText => "text",
            Operation::SetPattern => "pattern",
            Operation::NextBoard => "next-board",
        }
    }

    /// Also accepts the structure-specific aliases `push`, `pop`,
    /// `enqueue` and `dequeue`
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "push" | "enqueue" => Some(Operation::Insert),
            "pop" | "dequeue" => Some(Operation::Extract),
            other => Operation::ALL.into_iter().find(|op| op.cli_name() == other),
        }
    }

    /// Animated operations run through the sequencer; the rest update the
    /// model immediately
    pub fn is_animated(self) -> bool {
        use Operation::*;
        matches!(self, Insert | Extract | InsertHead | InsertTail | Delete | Search)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub op: Operation,
    pub key: char,
    pub label: &'static str,
    /// Prompt title when the operation needs a typed value
    pub prompt: Option<&'static str>,
}

impl OperationSpec {
    const fn new(op: Operation, key: char, label: &'static str, prompt: Option<&'static str>) -> Self {
        OperationSpec {
            op,
            key,
            label,
            prompt,
        }
    }

    pub fn needs_value(&self) -> bool {
        self.prompt.is_some()
    }
}

/// `OP[:VALUE]`, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpRequest {
    pub op: Operation,
    pub value: Option<String>,
}

impl std::str::FromStr for OpRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = match s.split_once(':') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (s, None),
        };
        let op = Operation::from_name(name).ok_or_else(|| {
            let known: Vec<_> = Operation::ALL.iter().map(|op| op.cli_name()).collect();
            format!("unknown operation '{}' (expected one of: {})", name, known.join(", "))
        })?;
        Ok(OpRequest { op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_round_trip() {
        for kind in VizKind::ALL {
            assert_eq!(VizKind::from_name(kind.cli_name()), Some(kind));
        }
        assert_eq!(VizKind::from_name(" Bubble "), Some(VizKind::BubbleSort));
        assert_eq!(VizKind::from_name("bogo"), None);
    }

    #[test]
    fn test_default_sizes_are_in_range() {
        for kind in VizKind::ALL {
            match kind.size_range() {
                Some(range) => assert!(range.contains(&kind.default_size()), "{:?}", kind),
                None => assert!(!kind.size_relevant()),
            }
        }
        assert_eq!(VizKind::MinHeap.size_range(), Some(1..=31));
        assert_eq!(VizKind::Hanoi.default_size(), 3);
    }

    #[test]
    fn test_operation_keys_are_unique_per_kind() {
        for kind in VizKind::ALL {
            let ops = kind.operations();
            for (i, a) in ops.iter().enumerate() {
                assert!(ops[i + 1..].iter().all(|b| b.key != a.key), "{:?}", kind);
                // global keys stay free
                assert!(!"srq+-[] ".contains(a.key), "{:?} uses {}", kind, a.key);
            }
        }
    }

    #[test]
    fn test_structures_cannot_start() {
        assert!(!VizKind::Stack.can_start());
        assert!(!VizKind::Bst.can_start());
        assert!(VizKind::Sudoku.can_start());
        assert!(VizKind::QuickSort.can_start());
    }

    #[test]
    fn test_op_requests() {
        assert_eq!(
            "insert:42".parse::<OpRequest>(),
            Ok(OpRequest {
                op: Operation::Insert,
                value: Some("42".into())
            })
        );
        assert_eq!("pop".parse::<OpRequest>().map(|r| r.op), Ok(Operation::Extract));
        assert_eq!(
            "text:ab:c".parse::<OpRequest>().map(|r| r.value),
            Ok(Some("ab:c".to_string()))
        );
        assert!("shuffle".parse::<OpRequest>().is_err());
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.cli_name()), Some(op));
        }
    }
}
