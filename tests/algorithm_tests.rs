// Integration tests for the visualizations, driven through the sequencer

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use stepviz::config::AppConfig;
use stepviz::headless::{self, HeadlessOptions};
use stepviz::playback::{DelayConfig, DelayPolicy, PlaybackState, Recorder, Sequencer};
use stepviz::viz::heap::is_heap;
use stepviz::viz::model::{Launch, Model};
use stepviz::viz::scene::HeapOrder;
use stepviz::viz::{Checkpoint, Operation, Outcome, Visualization, VizKind};

fn viz(kind: VizKind) -> Visualization {
    Visualization::new(kind, None, StdRng::seed_from_u64(11))
}

/// Play a launch to its end with no delays
fn drive(launch: Launch) -> (PlaybackState, Vec<Checkpoint>) {
    let mut seq = Sequencer::new(DelayPolicy::new(DelayConfig::immediate()));
    let mut sink = Recorder::new();
    let now = Instant::now();
    seq.start(move || launch, now, &mut sink).unwrap();
    while seq.tick(now, &mut sink) {}
    let presented = sink.presented().into_iter().cloned().collect();
    (seq.state(), presented)
}

/// Run an animated operation and commit its final scene
fn apply(viz: &mut Visualization, op: Operation, value: &str) -> Vec<Checkpoint> {
    match viz.operate(op, Some(value)).unwrap() {
        Outcome::Animate(launch) => {
            let (state, checkpoints) = drive(launch);
            assert_eq!(state, PlaybackState::Finished, "{:?} {}", op, value);
            if let Some(last) = checkpoints.last() {
                viz.adopt(&last.scene);
            }
            checkpoints
        }
        Outcome::Updated(notice) => panic!("expected an animation, got notice {:?}", notice),
    }
}

#[test]
fn test_every_startable_kind_finishes() {
    for kind in VizKind::ALL.into_iter().filter(|k| k.can_start()) {
        let viz = viz(kind);
        let launch = viz.launch().unwrap_or_else(|| panic!("{:?} has no algorithm", kind));
        let (state, checkpoints) = drive(launch);
        assert_eq!(state, PlaybackState::Finished, "{:?}", kind);
        assert!(!checkpoints.is_empty(), "{:?}", kind);
    }
}

#[test]
fn test_sorting_commits_sorted_data() {
    for kind in [
        VizKind::BubbleSort,
        VizKind::SelectionSort,
        VizKind::InsertionSort,
        VizKind::MergeSort,
        VizKind::QuickSort,
        VizKind::HeapSort,
    ] {
        let mut viz = viz(kind);
        let before = match viz.model() {
            Model::Sorting { data, .. } => data.clone(),
            other => panic!("unexpected model {:?}", other),
        };
        let (_, checkpoints) = drive(viz.launch().unwrap());
        let last = checkpoints.last().unwrap();
        assert_eq!(last.caption, "Final sorted array.", "{:?}", kind);
        viz.adopt(&last.scene);

        let mut expected = before;
        expected.sort_unstable();
        match viz.model() {
            Model::Sorting { data, .. } => assert_eq!(data, &expected, "{:?}", kind),
            other => panic!("unexpected model {:?}", other),
        }
    }
}

#[test]
fn test_worst_case_then_sort() {
    let mut viz = Visualization::new(VizKind::InsertionSort, Some(8), StdRng::seed_from_u64(2));
    match viz.operate(Operation::WorstCase, None).unwrap() {
        Outcome::Updated(notice) => assert!(notice.contains("O(n²)"), "{}", notice),
        Outcome::Animate(_) => panic!("case generation is not animated"),
    }
    match viz.model() {
        Model::Sorting { data, .. } => assert!(data.windows(2).all(|w| w[0] >= w[1])),
        other => panic!("unexpected model {:?}", other),
    }
    let (state, checkpoints) = drive(viz.launch().unwrap());
    assert_eq!(state, PlaybackState::Finished);
    // descending input makes insertion sort shift on every pass
    assert!(checkpoints.len() > 8);
}

#[test]
fn test_heap_keeps_heap_order_across_operations() {
    for (kind, order) in [(VizKind::MinHeap, HeapOrder::Min), (VizKind::MaxHeap, HeapOrder::Max)] {
        let mut viz = viz(kind);
        for value in ["-5", "999", "42", "0"] {
            apply(&mut viz, Operation::Insert, value);
        }
        apply(&mut viz, Operation::Extract, "");
        match viz.model() {
            Model::Heap { items, .. } => {
                assert!(is_heap(items, order), "{:?}: {:?}", kind, items);
                assert!(!items.contains(&if order == HeapOrder::Min { -5 } else { 999 }));
            }
            other => panic!("unexpected model {:?}", other),
        }
    }
}

#[test]
fn test_queue_is_first_in_first_out() {
    let mut viz = viz(VizKind::Queue);
    for value in ["a", "b", "c"] {
        apply(&mut viz, Operation::Insert, value);
    }
    apply(&mut viz, Operation::Extract, "");
    match viz.model() {
        Model::Queue(items) => assert_eq!(items, &["b", "c"]),
        other => panic!("unexpected model {:?}", other),
    }
}

#[test]
fn test_linked_list_operations() {
    let mut viz = viz(VizKind::LinkedList);
    apply(&mut viz, Operation::InsertTail, "2");
    apply(&mut viz, Operation::InsertHead, "1");
    apply(&mut viz, Operation::InsertTail, "3");
    apply(&mut viz, Operation::Delete, "2");
    match viz.model() {
        Model::List(items) => assert_eq!(items, &["1", "3"]),
        other => panic!("unexpected model {:?}", other),
    }
    let checkpoints = apply(&mut viz, Operation::Search, "3");
    assert!(!checkpoints.is_empty());
}

#[test]
fn test_bst_insert_then_search() {
    let mut viz = viz(VizKind::Bst);
    for value in ["50", "30", "70", "20"] {
        apply(&mut viz, Operation::Insert, value);
    }
    match viz.model() {
        Model::Bst(tree) => assert_eq!(tree.in_order(), vec![20, 30, 50, 70]),
        other => panic!("unexpected model {:?}", other),
    }
    let checkpoints = apply(&mut viz, Operation::Search, "20");
    assert!(checkpoints.iter().any(|c| c.caption == "Found 20."));
    assert!(checkpoints.iter().any(|c| c.caption.contains("going left")));
}

#[test]
fn test_graph_start_node_changes_traversal() {
    let mut viz = viz(VizKind::Bfs);
    match viz.operate(Operation::StartNode, Some("C")).unwrap() {
        Outcome::Updated(notice) => assert_eq!(notice, "Start node set to C. Press s to start."),
        Outcome::Animate(_) => panic!("start node is not animated"),
    }
    let (state, checkpoints) = drive(viz.launch().unwrap());
    assert_eq!(state, PlaybackState::Finished);
    assert!(checkpoints[0].caption.starts_with("Starting BFS from node C."));
    assert!(checkpoints.last().unwrap().caption.starts_with("BFS complete. Visit order: C"));
}

#[test]
fn test_prim_reports_total_weight() {
    let (state, checkpoints) = drive(viz(VizKind::Prim).launch().unwrap());
    assert_eq!(state, PlaybackState::Finished);
    assert!(checkpoints.last().unwrap().caption.starts_with("MST complete. Total weight: "));
}

#[test]
fn test_string_search_with_custom_input() {
    let mut viz = viz(VizKind::StringSearch);
    viz.operate(Operation::SetText, Some("ABABAB")).unwrap();
    viz.operate(Operation::SetPattern, Some("ABA")).unwrap();
    let (_, checkpoints) = drive(viz.launch().unwrap());
    assert_eq!(
        checkpoints.last().unwrap().caption,
        "Search complete. Pattern found at index(es): 0, 2"
    );
}

#[test]
fn test_hanoi_move_count() {
    for disks in 2..=5 {
        let viz = Visualization::new(VizKind::Hanoi, Some(disks), StdRng::seed_from_u64(0));
        let (_, checkpoints) = drive(viz.launch().unwrap());
        let expected = format!("Solved in {} moves.", (1usize << disks) - 1);
        assert_eq!(checkpoints.last().unwrap().caption, expected);
    }
}

#[test]
fn test_sample_boards_are_solved() {
    let mut viz = viz(VizKind::Sudoku);
    for _ in 0..2 {
        let (state, checkpoints) = drive(viz.launch().unwrap());
        assert_eq!(state, PlaybackState::Finished);
        assert!(checkpoints.last().unwrap().caption.starts_with("Sudoku solved!"));
        viz.operate(Operation::NextBoard, None).unwrap();
    }
}

#[test]
fn test_headless_uses_config_sizes() {
    let config = AppConfig::from_toml("[sizes]\nhanoi = 2\n").unwrap();
    let options = HeadlessOptions {
        kind: VizKind::Hanoi,
        size: None,
        speed: None,
        ops: Vec::new(),
        fast: true,
    };
    let mut out = Vec::new();
    let summary = headless::run(&config, &options, StdRng::seed_from_u64(1), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(summary.state, PlaybackState::Finished);
    assert!(text.starts_with("Tower of Hanoi (size 2)"), "{}", text);
    assert!(text.contains("Solved in 3 moves."));
}

#[test]
fn test_headless_paces_with_configured_delay() {
    let config = AppConfig::from_toml("[playback]\nmin_delay_ms = 5\nmax_delay_ms = 5\n").unwrap();
    let options = HeadlessOptions {
        kind: VizKind::Stack,
        size: None,
        speed: None,
        ops: vec!["push:7".parse().unwrap()],
        fast: false,
    };
    let started = Instant::now();
    let summary = headless::run(&config, &options, StdRng::seed_from_u64(1), Vec::new()).unwrap();
    assert_eq!(summary.state, PlaybackState::Finished);
    // every checkpoint after the first waits one delay
    let min = std::time::Duration::from_millis(5 * (summary.presented as u64).saturating_sub(1));
    assert!(started.elapsed() >= min);
}
