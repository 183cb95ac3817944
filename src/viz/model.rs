//! Per-kind models and producer factories
//!
//! A [`Visualization`] owns the data the user sees at rest (the array to
//! sort, the current stack, the sample graph, ...). Starting a run clones
//! that model into a fresh producer, so the producer owns its context and
//! the model is only touched again through [`Visualization::adopt`] once a
//! run has finished.

use super::bst::{Bst, BstAction, BstWalk};
use super::graph::{Bfs, Dfs, Graph, GraphAlgorithm, Prim};
use super::hanoi::Hanoi;
use super::heap::{build_heap, HeapAction, HeapOp};
use super::input::{parse_label, parse_text, parse_value, InputError};
use super::linear::{self, ListAction, ListWalk};
use super::scene::{
    BarScene, BoardScene, Checkpoint, GraphScene, HeapOrder, HeapScene, Highlight, Scene,
    SequenceKind, SequenceScene, TextScene, TreeScene,
};
use super::search::{NaiveSearch, DEFAULT_PATTERN, DEFAULT_TEXT};
use super::sorting::{case_data, random_data, SortAlgorithm, SortCase};
use super::sudoku::{fixed_cells, SudokuSolver, BOARDS};
use super::{Operation, VizKind};
use crate::producer::{boxed, BoxedProducer, Driven, MalformedProducer};
use rand::rngs::StdRng;
use tracing::debug;

/// Items a stack, queue or list holds before further inserts are refused
pub const MAX_SEQUENCE_ITEMS: usize = 12;
pub const MAX_HEAP_ITEMS: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Sorting {
        algorithm: SortAlgorithm,
        data: Vec<i64>,
    },
    Stack(Vec<String>),
    Queue(Vec<String>),
    Heap {
        order: HeapOrder,
        items: Vec<i64>,
    },
    List(Vec<String>),
    Bst(Bst),
    Hanoi {
        disks: u32,
    },
    Graph {
        algorithm: GraphAlgorithm,
        graph: Graph,
        start: usize,
    },
    StringSearch {
        text: String,
        pattern: String,
    },
    Sudoku {
        board: usize,
    },
}

pub type Launch = Result<BoxedProducer<Checkpoint>, MalformedProducer>;

/// Result of an operation request
pub enum Outcome {
    /// Hand this to the sequencer
    Animate(Launch),
    /// The model changed in place; show the notice
    Updated(String),
}

pub struct Visualization {
    kind: VizKind,
    size: usize,
    model: Model,
    notice: Option<String>,
    rng: StdRng,
}

impl Visualization {
    pub fn new(kind: VizKind, size: Option<usize>, mut rng: StdRng) -> Self {
        let size = clamp_size(kind, size.unwrap_or_else(|| kind.default_size()));
        let model = initial_model(kind, size, &mut rng);
        debug!(kind = kind.cli_name(), size, "visualization created");
        Visualization {
            kind,
            size,
            model,
            notice: None,
            rng,
        }
    }

    pub fn kind(&self) -> VizKind {
        self.kind
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Change the size and re-initialize. Returns the size actually applied.
    pub fn set_size(&mut self, size: usize) -> usize {
        if !self.kind.size_relevant() {
            return self.size;
        }
        let size = clamp_size(self.kind, size);
        if size != self.size {
            self.size = size;
            self.reset();
        }
        self.size
    }

    /// Fresh model for the current size: new random data, empty structures
    pub fn reset(&mut self) {
        self.model = match &self.model {
            // keep the selected puzzle
            Model::Sudoku { board } => Model::Sudoku { board: *board },
            _ => initial_model(self.kind, self.size, &mut self.rng),
        };
        self.notice = None;
    }

    /// Caption and scene shown while nothing has been presented yet
    pub fn resting(&self) -> Checkpoint {
        let caption = match &self.notice {
            Some(n) => n.clone(),
            None if self.kind.can_start() => format!("{} Press s to start.", self.kind.description()),
            None => format!("{} Use the operation keys below.", self.kind.description()),
        };
        Checkpoint::new(caption, self.scene())
    }

    pub fn scene(&self) -> Scene {
        match &self.model {
            Model::Sorting { data, .. } => BarScene::new(data).into(),
            Model::Stack(items) => SequenceScene::new(SequenceKind::Stack, items).into(),
            Model::Queue(items) => SequenceScene::new(SequenceKind::Queue, items).into(),
            Model::List(items) => SequenceScene::new(SequenceKind::List, items).into(),
            Model::Heap { order, items } => HeapScene::new(*order, items).into(),
            Model::Bst(tree) => TreeScene::new(tree).into(),
            Model::Hanoi { disks } => Hanoi::resting_scene(*disks).into(),
            Model::Graph {
                algorithm,
                graph,
                start,
            } => {
                let mut scene = GraphScene::new(graph);
                match algorithm {
                    GraphAlgorithm::Prim => {
                        scene.costs = (0..graph.node_count())
                            .map(|n| (n == 0).then_some(0))
                            .collect();
                    }
                    GraphAlgorithm::Bfs | GraphAlgorithm::Dfs => {
                        scene.node_marks.insert(*start, Highlight::Frontier);
                    }
                }
                scene.into()
            }
            Model::StringSearch { text, pattern } => {
                let text: Vec<char> = text.chars().collect();
                let pattern: Vec<char> = pattern.chars().collect();
                TextScene::new(&text, &pattern).into()
            }
            Model::Sudoku { board } => {
                let grid = BOARDS[*board % BOARDS.len()];
                BoardScene::new(&grid, &fixed_cells(&grid)).into()
            }
        }
    }

    /// Factory for the kind's `start` algorithm, over a copy of the model.
    /// `None` for operation-driven kinds.
    pub fn launch(&self) -> Option<Launch> {
        let launch = match &self.model {
            Model::Sorting { algorithm, data } => Ok(boxed(Driven::new(algorithm.machine(data.clone())))),
            Model::Hanoi { disks } => {
                if super::hanoi::DISK_RANGE.contains(&(*disks as usize)) {
                    Ok(boxed(Driven::new(Hanoi::new(*disks))))
                } else {
                    Err(MalformedProducer(format!("{} disks is outside the supported range", disks)))
                }
            }
            Model::Graph {
                algorithm,
                graph,
                start,
            } => graph_launch(*algorithm, graph, *start),
            Model::StringSearch { text, pattern } => Ok(boxed(Driven::new(NaiveSearch::new(text, pattern)))),
            Model::Sudoku { board } => match BOARDS.get(*board) {
                Some(grid) => Ok(boxed(Driven::new(SudokuSolver::new(*grid)))),
                None => Err(MalformedProducer(format!("no sample board {}", board))),
            },
            Model::Stack(_)
            | Model::Queue(_)
            | Model::Heap { .. }
            | Model::List(_)
            | Model::Bst(_) => return None,
        };
        Some(launch)
    }

    /// Apply an operation key. Animated operations return a producer over a
    /// copy of the model; the others update the model directly.
    pub fn operate(&mut self, op: Operation, input: Option<&str>) -> Result<Outcome, InputError> {
        let raw = input.unwrap_or("");
        let size = self.size;
        let outcome = match (&mut self.model, op) {
            (Model::Sorting { algorithm, data }, Operation::BestCase | Operation::WorstCase | Operation::AverageCase) => {
                let case = match op {
                    Operation::BestCase => SortCase::Best,
                    Operation::WorstCase => SortCase::Worst,
                    _ => SortCase::Average,
                };
                *data = case_data(case, size, &mut self.rng);
                Outcome::Updated(format!(
                    "Time complexity ({}): {}. {} case array generated. Press s to start.",
                    case.label(),
                    algorithm.complexity(case),
                    capitalised(case.label())
                ))
            }

            (Model::Stack(items), Operation::Insert) => {
                check_room(items.len(), MAX_SEQUENCE_ITEMS)?;
                animate(linear::push(items, parse_label(raw)?))
            }
            (Model::Stack(items), Operation::Extract) => animate(linear::pop(items)),
            (Model::Queue(items), Operation::Insert) => {
                check_room(items.len(), MAX_SEQUENCE_ITEMS)?;
                animate(linear::enqueue(items, parse_label(raw)?))
            }
            (Model::Queue(items), Operation::Extract) => animate(linear::dequeue(items)),

            (Model::Heap { order, items }, Operation::Insert) => {
                check_room(items.len(), MAX_HEAP_ITEMS)?;
                let value = parse_value(raw)?;
                animate(Driven::new(HeapOp::new(items, *order, HeapAction::Insert(value))))
            }
            (Model::Heap { order, items }, Operation::Extract) => {
                animate(Driven::new(HeapOp::new(items, *order, HeapAction::Extract)))
            }

            (Model::List(items), Operation::InsertHead) => {
                check_room(items.len(), MAX_SEQUENCE_ITEMS)?;
                animate(linear::insert_head(items, parse_label(raw)?))
            }
            (Model::List(items), Operation::InsertTail) => {
                check_room(items.len(), MAX_SEQUENCE_ITEMS)?;
                animate(Driven::new(ListWalk::new(items, parse_label(raw)?, ListAction::InsertTail)))
            }
            (Model::List(items), Operation::Delete) => {
                animate(Driven::new(ListWalk::new(items, parse_label(raw)?, ListAction::Delete)))
            }
            (Model::List(items), Operation::Search) => {
                animate(Driven::new(ListWalk::new(items, parse_label(raw)?, ListAction::Search)))
            }

            (Model::Bst(tree), Operation::Insert) => {
                animate(Driven::new(BstWalk::new(tree, parse_value(raw)?, BstAction::Insert)))
            }
            (Model::Bst(tree), Operation::Search) => {
                animate(Driven::new(BstWalk::new(tree, parse_value(raw)?, BstAction::Search)))
            }

            (Model::Graph { graph, start, .. }, Operation::StartNode) => {
                let (node, notice) = resolve_start(graph, raw);
                *start = node;
                Outcome::Updated(notice)
            }
            (Model::Graph { algorithm, graph, start }, Operation::NewGraph) => {
                *graph = Graph::sample(size, *algorithm == GraphAlgorithm::Prim, &mut self.rng);
                if *start >= graph.node_count() {
                    *start = 0;
                }
                Outcome::Updated(format!(
                    "New sample graph: {} nodes, {} edges.",
                    graph.node_count(),
                    graph.edges().len()
                ))
            }

            (Model::StringSearch { text, .. }, Operation::SetText) => {
                *text = parse_text(raw)?;
                Outcome::Updated(format!("Text set to \"{}\". Press s to start.", text))
            }
            (Model::StringSearch { pattern, .. }, Operation::SetPattern) => {
                *pattern = parse_text(raw)?;
                Outcome::Updated(format!("Pattern set to \"{}\". Press s to start.", pattern))
            }

            (Model::Sudoku { board }, Operation::NextBoard) => {
                *board = (*board + 1) % BOARDS.len();
                Outcome::Updated(format!("Sample board {} of {}. Press s to start.", *board + 1, BOARDS.len()))
            }

            (_, op) => {
                let label = self
                    .kind
                    .operations()
                    .iter()
                    .find(|spec| spec.op == op)
                    .map(|spec| spec.label)
                    .unwrap_or("this operation");
                return Err(InputError::Unsupported(label));
            }
        };
        if let Outcome::Updated(notice) = &outcome {
            self.notice = Some(notice.clone());
        }
        Ok(outcome)
    }

    /// Take over the final scene of a finished run as the new model, for
    /// kinds whose runs change their data
    pub fn adopt(&mut self, scene: &Scene) {
        match (&mut self.model, scene) {
            (Model::Sorting { data, .. }, Scene::Bars(bars)) => *data = bars.values.clone(),
            (Model::Stack(items), Scene::Sequence(s)) if s.kind == SequenceKind::Stack => {
                *items = s.items.clone()
            }
            (Model::Queue(items), Scene::Sequence(s)) if s.kind == SequenceKind::Queue => {
                *items = s.items.clone()
            }
            (Model::List(items), Scene::Sequence(s)) if s.kind == SequenceKind::List => {
                *items = s.items.clone()
            }
            (Model::Heap { order, items }, Scene::Heap(h)) if h.order == *order => {
                *items = h.items.clone()
            }
            (Model::Bst(tree), Scene::Tree(t)) => *tree = t.tree.clone(),
            _ => return,
        }
        debug!(kind = self.kind.cli_name(), "final scene adopted");
        self.notice = None;
    }
}

fn animate<P>(producer: P) -> Outcome
where
    P: crate::producer::StepProducer<Checkpoint = Checkpoint> + 'static,
{
    Outcome::Animate(Ok(boxed(producer)))
}

fn check_room(len: usize, capacity: usize) -> Result<(), InputError> {
    if len >= capacity {
        Err(InputError::Full(capacity))
    } else {
        Ok(())
    }
}

fn graph_launch(algorithm: GraphAlgorithm, graph: &Graph, start: usize) -> Launch {
    if graph.node_count() == 0 {
        return Err(MalformedProducer("graph is empty".into()));
    }
    match algorithm {
        GraphAlgorithm::Bfs | GraphAlgorithm::Dfs if start >= graph.node_count() => Err(MalformedProducer(format!(
            "start node {} is not in the graph",
            start
        ))),
        GraphAlgorithm::Bfs => Ok(boxed(Driven::new(Bfs::new(graph.clone(), start)))),
        GraphAlgorithm::Dfs => Ok(boxed(Driven::new(Dfs::new(graph.clone(), start)))),
        GraphAlgorithm::Prim => Ok(boxed(Driven::new(Prim::new(graph.clone())))),
    }
}

/// Look up a start node by label, falling back to the first node
fn resolve_start(graph: &Graph, raw: &str) -> (usize, String) {
    let first = graph.label(0);
    let wanted = raw.trim();
    if wanted.is_empty() {
        return (0, format!("Start node input is empty. Defaulting to node {}.", first));
    }
    match graph.find(wanted) {
        Some(node) => (node, format!("Start node set to {}. Press s to start.", graph.label(node))),
        None => (
            0,
            format!("Node \"{}\" not found. Defaulting to node {}.", wanted.to_uppercase(), first),
        ),
    }
}

fn clamp_size(kind: VizKind, size: usize) -> usize {
    match kind.size_range() {
        Some(range) => size.clamp(*range.start(), *range.end()),
        None => 0,
    }
}

fn initial_model(kind: VizKind, size: usize, rng: &mut StdRng) -> Model {
    let sorting = |algorithm, rng: &mut StdRng| Model::Sorting {
        algorithm,
        data: random_data(size, rng),
    };
    let graph = |algorithm, rng: &mut StdRng| Model::Graph {
        algorithm,
        graph: Graph::sample(size, algorithm == GraphAlgorithm::Prim, rng),
        start: 0,
    };
    let heap = |order, rng: &mut StdRng| Model::Heap {
        order,
        items: build_heap(random_data(size, rng), order),
    };
    match kind {
        VizKind::BubbleSort => sorting(SortAlgorithm::Bubble, rng),
        VizKind::SelectionSort => sorting(SortAlgorithm::Selection, rng),
        VizKind::InsertionSort => sorting(SortAlgorithm::Insertion, rng),
        VizKind::MergeSort => sorting(SortAlgorithm::Merge, rng),
        VizKind::QuickSort => sorting(SortAlgorithm::Quick, rng),
        VizKind::HeapSort => sorting(SortAlgorithm::Heap, rng),
        VizKind::Stack => Model::Stack(Vec::new()),
        VizKind::Queue => Model::Queue(Vec::new()),
        VizKind::MinHeap => heap(HeapOrder::Min, rng),
        VizKind::MaxHeap => heap(HeapOrder::Max, rng),
        VizKind::LinkedList => Model::List(Vec::new()),
        VizKind::Bst => Model::Bst(Bst::new()),
        VizKind::Hanoi => Model::Hanoi { disks: size as u32 },
        VizKind::Bfs => graph(GraphAlgorithm::Bfs, rng),
        VizKind::Dfs => graph(GraphAlgorithm::Dfs, rng),
        VizKind::Prim => graph(GraphAlgorithm::Prim, rng),
        VizKind::StringSearch => Model::StringSearch {
            text: DEFAULT_TEXT.to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
        },
        VizKind::Sudoku => Model::Sudoku { board: 0 },
    }
}

fn capitalised(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::Step;
    use rand::SeedableRng;

    fn viz(kind: VizKind) -> Visualization {
        Visualization::new(kind, None, StdRng::seed_from_u64(42))
    }

    fn run(launch: Launch) -> Vec<Checkpoint> {
        let mut producer = launch.expect("malformed producer");
        let mut seen = Vec::new();
        loop {
            match producer.next_checkpoint() {
                Step::Yielded(c) => seen.push(c),
                Step::Done => return seen,
                Step::Failed(e) => panic!("run failed: {}", e),
            }
        }
    }

    fn animated(outcome: Result<Outcome, InputError>) -> Launch {
        match outcome {
            Ok(Outcome::Animate(launch)) => launch,
            Ok(Outcome::Updated(n)) => panic!("Expected animation, got notice {}", n),
            Err(e) => panic!("Expected animation, got {}", e),
        }
    }

    #[test]
    fn test_sizes_are_clamped() {
        let v = Visualization::new(VizKind::BubbleSort, Some(500), StdRng::seed_from_u64(1));
        assert_eq!(v.size(), 60);
        let mut h = viz(VizKind::MinHeap);
        assert_eq!(h.size(), 10);
        assert_eq!(h.set_size(0), 1);
        let mut s = viz(VizKind::Stack);
        assert_eq!(s.set_size(9), 0);
    }

    #[test]
    fn test_sorting_run_is_adopted_on_finish() {
        let mut v = viz(VizKind::MergeSort);
        let checkpoints = run(v.launch().unwrap());
        v.adopt(&checkpoints.last().unwrap().scene);
        match v.model() {
            Model::Sorting { data, .. } => {
                assert_eq!(data.len(), 20);
                assert!(data.windows(2).all(|w| w[0] <= w[1]));
            }
            other => panic!("unexpected model {:?}", other),
        }
    }

    #[test]
    fn test_launch_does_not_touch_model() {
        let v = viz(VizKind::QuickSort);
        let before = v.model().clone();
        run(v.launch().unwrap());
        assert_eq!(v.model(), &before);
    }

    #[test]
    fn test_structures_have_no_start() {
        assert!(viz(VizKind::Stack).launch().is_none());
        assert!(viz(VizKind::Bst).launch().is_none());
    }

    #[test]
    fn test_stack_push_then_pop() {
        let mut v = viz(VizKind::Stack);
        let pushed = run(animated(v.operate(Operation::Insert, Some("7"))));
        v.adopt(&pushed.last().unwrap().scene);
        assert_eq!(v.model(), &Model::Stack(vec!["7".to_string()]));
        let popped = run(animated(v.operate(Operation::Extract, None)));
        v.adopt(&popped.last().unwrap().scene);
        assert_eq!(v.model(), &Model::Stack(Vec::new()));
    }

    #[test]
    fn test_invalid_values_are_rejected_before_running() {
        let mut v = viz(VizKind::Bst);
        assert!(matches!(v.operate(Operation::Insert, Some("abc")), Err(InputError::NotInteger(_))));
        assert!(matches!(v.operate(Operation::Insert, Some("")), Err(InputError::Empty)));
        assert!(matches!(
            v.operate(Operation::Extract, None),
            Err(InputError::Unsupported(_))
        ));
    }

    #[test]
    fn test_heap_starts_random_and_valid() {
        let v = viz(VizKind::MaxHeap);
        match v.model() {
            Model::Heap { order, items } => {
                assert_eq!(items.len(), 10);
                assert!(super::super::heap::is_heap(items, *order));
            }
            other => panic!("unexpected model {:?}", other),
        }
    }

    #[test]
    fn test_heap_capacity() {
        let mut v = Visualization::new(VizKind::MinHeap, Some(31), StdRng::seed_from_u64(2));
        assert!(matches!(v.operate(Operation::Insert, Some("5")), Err(InputError::Full(31))));
    }

    #[test]
    fn test_start_node_fallback() {
        let mut v = viz(VizKind::Bfs);
        match v.operate(Operation::StartNode, Some("c")) {
            Ok(Outcome::Updated(n)) => assert!(n.contains("set to C")),
            _ => panic!("expected notice"),
        }
        match v.operate(Operation::StartNode, Some("zz")) {
            Ok(Outcome::Updated(n)) => assert_eq!(n, "Node \"ZZ\" not found. Defaulting to node A."),
            _ => panic!("expected notice"),
        }
        assert!(matches!(v.model(), Model::Graph { start: 0, .. }));
        assert!(v.resting().caption.contains("Defaulting"));
    }

    #[test]
    fn test_case_generation() {
        let mut v = viz(VizKind::BubbleSort);
        match v.operate(Operation::WorstCase, None) {
            Ok(Outcome::Updated(n)) => assert!(n.contains("O(n²)")),
            _ => panic!("expected notice"),
        }
        match v.model() {
            Model::Sorting { data, .. } => assert!(data.windows(2).all(|w| w[0] >= w[1])),
            other => panic!("unexpected model {:?}", other),
        }
    }

    #[test]
    fn test_reset_clears_structures() {
        let mut v = viz(VizKind::Queue);
        let out = run(animated(v.operate(Operation::Insert, Some("a"))));
        v.adopt(&out.last().unwrap().scene);
        v.reset();
        assert_eq!(v.model(), &Model::Queue(Vec::new()));
    }

    #[test]
    fn test_sudoku_board_cycles() {
        let mut v = viz(VizKind::Sudoku);
        for _ in 0..3 {
            v.operate(Operation::NextBoard, None).unwrap();
        }
        assert_eq!(v.model(), &Model::Sudoku { board: 0 });
    }

    #[test]
    fn test_adopt_ignores_mismatched_scenes() {
        let mut v = viz(VizKind::Stack);
        let queue_scene: Scene = SequenceScene::new(SequenceKind::Queue, &["q".to_string()]).into();
        v.adopt(&queue_scene);
        assert_eq!(v.model(), &Model::Stack(Vec::new()));
    }
}
