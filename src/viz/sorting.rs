//! Sorting algorithms as step machines
//!
//! Every machine sorts its own copy of the array and emits a [`BarScene`]
//! per comparison, swap and settled element. Recursive sorts (merge, quick)
//! keep an explicit stack of pending ranges instead of recursing.
//!
//! | Algorithm | Best       | Average    | Worst      |
//! |-----------|------------|------------|------------|
//! | Bubble    | O(n)       | O(n²)      | O(n²)      |
//! | Selection | O(n²)      | O(n²)      | O(n²)      |
//! | Insertion | O(n)       | O(n²)      | O(n²)      |
//! | Merge     | O(n log n) | O(n log n) | O(n log n) |
//! | Quick     | O(n log n) | O(n log n) | O(n²)      |
//! | Heap      | O(n log n) | O(n log n) | O(n log n) |

use super::scene::{BarScene, Checkpoint, Highlight};
use crate::producer::{Flow, Machine, Outbox, ProducerError};
use rand::Rng;
use std::ops::RangeInclusive;

pub const DATA_RANGE: RangeInclusive<i64> = 10..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

impl SortAlgorithm {
    pub fn complexity(self, case: SortCase) -> &'static str {
        use SortAlgorithm::*;
        match (self, case) {
            (Bubble | Insertion, SortCase::Best) => "O(n)",
            (Bubble | Insertion | Selection, _) => "O(n²)",
            (Quick, SortCase::Worst) => "O(n²)",
            (Merge | Quick | Heap, _) => "O(n log n)",
        }
    }

    pub fn machine(self, data: Vec<i64>) -> Box<dyn Machine<Checkpoint = Checkpoint>> {
        match self {
            SortAlgorithm::Bubble => Box::new(BubbleSort::new(data)),
            SortAlgorithm::Selection => Box::new(SelectionSort::new(data)),
            SortAlgorithm::Insertion => Box::new(InsertionSort::new(data)),
            SortAlgorithm::Merge => Box::new(MergeSort::new(data)),
            SortAlgorithm::Quick => Box::new(QuickSort::new(data)),
            SortAlgorithm::Heap => Box::new(HeapSort::new(data)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCase {
    /// Already ascending
    Best,
    /// Descending
    Worst,
    /// Uniformly random
    Average,
}

impl SortCase {
    pub fn label(self) -> &'static str {
        match self {
            SortCase::Best => "best",
            SortCase::Worst => "worst",
            SortCase::Average => "average",
        }
    }
}

/// Random values in [`DATA_RANGE`]
pub fn random_data(size: usize, rng: &mut impl Rng) -> Vec<i64> {
    (0..size).map(|_| rng.gen_range(DATA_RANGE)).collect()
}

/// Evenly spaced ascending or descending values spanning [`DATA_RANGE`]
pub fn case_data(case: SortCase, size: usize, rng: &mut impl Rng) -> Vec<i64> {
    let (lo, hi) = (*DATA_RANGE.start() as f64, *DATA_RANGE.end() as f64);
    let step = if size > 1 {
        (hi - lo) / (size - 1) as f64
    } else {
        0.0
    };
    match case {
        SortCase::Best => (0..size).map(|i| (lo + i as f64 * step).round() as i64).collect(),
        SortCase::Worst => (0..size).map(|i| (hi - i as f64 * step).round() as i64).collect(),
        SortCase::Average => random_data(size, rng),
    }
}

fn finished(arr: &[i64]) -> Checkpoint {
    Checkpoint::new(
        "Final sorted array.",
        BarScene::new(arr).mark_range(0..arr.len(), Highlight::Sorted),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BubblePhase {
    PassStart,
    Compare,
    Swap,
    PassEnd,
}

pub struct BubbleSort {
    arr: Vec<i64>,
    /// Unsorted prefix length
    n: usize,
    i: usize,
    swapped: bool,
    phase: BubblePhase,
}

impl BubbleSort {
    pub fn new(arr: Vec<i64>) -> Self {
        let n = arr.len();
        BubbleSort {
            arr,
            n,
            i: 0,
            swapped: false,
            phase: BubblePhase::PassStart,
        }
    }

    fn scene(&self) -> BarScene {
        BarScene::new(&self.arr).mark_range(self.n..self.arr.len(), Highlight::Sorted)
    }
}

impl Machine for BubbleSort {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        match self.phase {
            BubblePhase::PassStart => {
                if self.n <= 1 {
                    out.emit(finished(&self.arr));
                    return Ok(Flow::Complete);
                }
                let pass = self.arr.len() - self.n + 1;
                out.emit(Checkpoint::new(format!("Starting pass {}...", pass), self.scene()));
                self.i = 0;
                self.swapped = false;
                self.phase = BubblePhase::Compare;
            }
            BubblePhase::Compare => {
                let i = self.i;
                if i + 1 >= self.n {
                    self.phase = BubblePhase::PassEnd;
                    return Ok(Flow::Continue);
                }
                out.emit(Checkpoint::new(
                    format!(
                        "Comparing {} (index {}) and {} (index {})",
                        self.arr[i],
                        i,
                        self.arr[i + 1],
                        i + 1
                    ),
                    self.scene()
                        .mark(i, Highlight::Compare)
                        .mark(i + 1, Highlight::Compare),
                ));
                if self.arr[i] > self.arr[i + 1] {
                    self.phase = BubblePhase::Swap;
                } else {
                    self.i += 1;
                }
            }
            BubblePhase::Swap => {
                let i = self.i;
                out.emit(Checkpoint::new(
                    format!("Swapping {} and {}", self.arr[i], self.arr[i + 1]),
                    self.scene().mark(i, Highlight::Swap).mark(i + 1, Highlight::Swap),
                ));
                self.arr.swap(i, i + 1);
                self.swapped = true;
                out.emit(Checkpoint::new(
                    format!("Swapped: {} now before {}", self.arr[i], self.arr[i + 1]),
                    self.scene().mark(i, Highlight::Swap).mark(i + 1, Highlight::Swap),
                ));
                self.i += 1;
                self.phase = BubblePhase::Compare;
            }
            BubblePhase::PassEnd => {
                self.n -= 1;
                out.emit(Checkpoint::new(
                    format!("Element {} is now sorted.", self.arr[self.n]),
                    self.scene(),
                ));
                if self.swapped && self.n > 1 {
                    self.phase = BubblePhase::PassStart;
                } else {
                    out.emit(finished(&self.arr));
                    return Ok(Flow::Complete);
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "bubble sort"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionPhase {
    Outer,
    Scan,
    Place,
}

pub struct SelectionSort {
    arr: Vec<i64>,
    i: usize,
    j: usize,
    min: usize,
    phase: SelectionPhase,
}

impl SelectionSort {
    pub fn new(arr: Vec<i64>) -> Self {
        SelectionSort {
            arr,
            i: 0,
            j: 0,
            min: 0,
            phase: SelectionPhase::Outer,
        }
    }

    fn scene(&self) -> BarScene {
        BarScene::new(&self.arr)
            .mark_range(0..self.i, Highlight::Sorted)
            .mark(self.min, Highlight::Pivot)
    }
}

impl Machine for SelectionSort {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        match self.phase {
            SelectionPhase::Outer => {
                if self.i + 1 >= self.arr.len() {
                    out.emit(finished(&self.arr));
                    return Ok(Flow::Complete);
                }
                self.min = self.i;
                self.j = self.i + 1;
                out.emit(Checkpoint::new(
                    format!(
                        "Pass {}: assuming {} (index {}) is the minimum",
                        self.i + 1,
                        self.arr[self.i],
                        self.i
                    ),
                    self.scene(),
                ));
                self.phase = SelectionPhase::Scan;
            }
            SelectionPhase::Scan => {
                if self.j >= self.arr.len() {
                    self.phase = SelectionPhase::Place;
                    return Ok(Flow::Continue);
                }
                let j = self.j;
                out.emit(Checkpoint::new(
                    format!(
                        "Comparing {} (index {}) with current minimum {}",
                        self.arr[j], j, self.arr[self.min]
                    ),
                    self.scene().mark(j, Highlight::Compare),
                ));
                if self.arr[j] < self.arr[self.min] {
                    self.min = j;
                    out.emit(Checkpoint::new(
                        format!("New minimum found: {} (index {})", self.arr[j], j),
                        self.scene(),
                    ));
                }
                self.j += 1;
            }
            SelectionPhase::Place => {
                let (i, min) = (self.i, self.min);
                if min != i {
                    out.emit(Checkpoint::new(
                        format!("Swapping minimum {} into position {}", self.arr[min], i),
                        self.scene().mark(i, Highlight::Swap).mark(min, Highlight::Swap),
                    ));
                    self.arr.swap(i, min);
                }
                self.i += 1;
                self.min = i;
                out.emit(Checkpoint::new(
                    format!("{} is in its final position.", self.arr[i]),
                    BarScene::new(&self.arr).mark_range(0..self.i, Highlight::Sorted),
                ));
                self.phase = SelectionPhase::Outer;
            }
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "selection sort"
    }
}

pub struct InsertionSort {
    arr: Vec<i64>,
    i: usize,
    /// Position of the key while it sinks left; `None` between keys
    j: Option<usize>,
}

impl InsertionSort {
    pub fn new(arr: Vec<i64>) -> Self {
        InsertionSort { arr, i: 1, j: None }
    }

    fn scene(&self) -> BarScene {
        BarScene::new(&self.arr).mark_range(0..self.i.min(self.arr.len()), Highlight::Range)
    }
}

impl Machine for InsertionSort {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        let Some(j) = self.j else {
            if self.i >= self.arr.len() {
                out.emit(finished(&self.arr));
                return Ok(Flow::Complete);
            }
            out.emit(Checkpoint::new(
                format!("Inserting key {} (index {}) into the sorted prefix", self.arr[self.i], self.i),
                self.scene().mark(self.i, Highlight::Pivot),
            ));
            self.j = Some(self.i);
            return Ok(Flow::Continue);
        };

        if j == 0 {
            self.settle(out, 0);
            return Ok(Flow::Continue);
        }
        out.emit(Checkpoint::new(
            format!("Comparing key {} with {}", self.arr[j], self.arr[j - 1]),
            self.scene()
                .mark(j - 1, Highlight::Compare)
                .mark(j, Highlight::Pivot),
        ));
        if self.arr[j - 1] > self.arr[j] {
            self.arr.swap(j - 1, j);
            out.emit(Checkpoint::new(
                format!("Shifting {} right", self.arr[j]),
                self.scene().mark(j - 1, Highlight::Swap).mark(j, Highlight::Swap),
            ));
            self.j = Some(j - 1);
        } else {
            self.settle(out, j);
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "insertion sort"
    }
}

impl InsertionSort {
    fn settle(&mut self, out: &mut Outbox<Checkpoint>, at: usize) {
        self.i += 1;
        self.j = None;
        out.emit(Checkpoint::new(
            format!("Key {} placed at index {}", self.arr[at], at),
            self.scene().mark(at, Highlight::Found),
        ));
    }
}

#[derive(Debug, Clone, Copy)]
enum MergeFrame {
    Split { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
}

struct Merging {
    lo: usize,
    hi: usize,
    left: Vec<i64>,
    right: Vec<i64>,
    i: usize,
    j: usize,
    k: usize,
}

pub struct MergeSort {
    arr: Vec<i64>,
    stack: Vec<MergeFrame>,
    merging: Option<Merging>,
}

impl MergeSort {
    pub fn new(arr: Vec<i64>) -> Self {
        let mut stack = Vec::new();
        if arr.len() > 1 {
            stack.push(MergeFrame::Split {
                lo: 0,
                hi: arr.len() - 1,
            });
        }
        MergeSort {
            arr,
            stack,
            merging: None,
        }
    }

    fn step_merge(&mut self, out: &mut Outbox<Checkpoint>) {
        let Some(m) = self.merging.as_mut() else {
            return;
        };
        let k = m.k;
        let (value, caption) = match (m.left.get(m.i).copied(), m.right.get(m.j).copied()) {
            (Some(a), Some(b)) if a <= b => {
                m.i += 1;
                (a, format!("{} <= {}: placing {} at index {}", a, b, a, k))
            }
            (Some(a), Some(b)) => {
                m.j += 1;
                (b, format!("{} > {}: placing {} at index {}", a, b, b, k))
            }
            (Some(a), None) => {
                m.i += 1;
                (a, format!("Copying remaining {} to index {}", a, k))
            }
            (None, Some(b)) => {
                m.j += 1;
                (b, format!("Copying remaining {} to index {}", b, k))
            }
            (None, None) => {
                let (lo, hi) = (m.lo, m.hi);
                self.merging = None;
                out.emit(Checkpoint::new(
                    format!("Merged range [{}..{}]", lo, hi),
                    BarScene::new(&self.arr).mark_range(lo..hi + 1, Highlight::Sorted),
                ));
                return;
            }
        };
        m.k += 1;
        let (lo, hi) = (m.lo, m.hi);
        self.arr[k] = value;
        out.emit(Checkpoint::new(
            caption,
            BarScene::new(&self.arr)
                .mark_range(lo..hi + 1, Highlight::Range)
                .mark(k, Highlight::Swap),
        ));
    }
}

impl Machine for MergeSort {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if self.merging.is_some() {
            self.step_merge(out);
            return Ok(Flow::Continue);
        }
        match self.stack.pop() {
            None => {
                out.emit(finished(&self.arr));
                Ok(Flow::Complete)
            }
            Some(MergeFrame::Split { lo, hi }) => {
                if lo >= hi {
                    return Ok(Flow::Continue);
                }
                let mid = lo + (hi - lo) / 2;
                out.emit(Checkpoint::new(
                    format!("Dividing [{}..{}] into [{}..{}] and [{}..{}]", lo, hi, lo, mid, mid + 1, hi),
                    BarScene::new(&self.arr).mark_range(lo..hi + 1, Highlight::Range),
                ));
                self.stack.push(MergeFrame::Merge { lo, mid, hi });
                self.stack.push(MergeFrame::Split { lo: mid + 1, hi });
                self.stack.push(MergeFrame::Split { lo, hi: mid });
                Ok(Flow::Continue)
            }
            Some(MergeFrame::Merge { lo, mid, hi }) => {
                out.emit(Checkpoint::new(
                    format!("Merging [{}..{}] and [{}..{}]", lo, mid, mid + 1, hi),
                    BarScene::new(&self.arr)
                        .mark_range(lo..mid + 1, Highlight::Range)
                        .mark_range(mid + 1..hi + 1, Highlight::Pivot),
                ));
                self.merging = Some(Merging {
                    lo,
                    hi,
                    left: self.arr[lo..=mid].to_vec(),
                    right: self.arr[mid + 1..=hi].to_vec(),
                    i: 0,
                    j: 0,
                    k: lo,
                });
                Ok(Flow::Continue)
            }
        }
    }

    fn name(&self) -> &str {
        "merge sort"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartitionPhase {
    ChoosePivot,
    Scan,
    PlacePivot,
}

struct Partition {
    lo: usize,
    hi: usize,
    /// Next slot for an element smaller than the pivot
    store: usize,
    j: usize,
    phase: PartitionPhase,
}

pub struct QuickSort {
    arr: Vec<i64>,
    sorted: Vec<bool>,
    ranges: Vec<(usize, usize)>,
    partition: Option<Partition>,
}

impl QuickSort {
    pub fn new(arr: Vec<i64>) -> Self {
        let sorted = vec![false; arr.len()];
        let mut ranges = Vec::new();
        if !arr.is_empty() {
            ranges.push((0, arr.len() - 1));
        }
        QuickSort {
            arr,
            sorted,
            ranges,
            partition: None,
        }
    }

    fn scene(&self, lo: usize, hi: usize) -> BarScene {
        BarScene::new(&self.arr)
            .mark_range(lo..hi + 1, Highlight::Range)
            .mark_where(&self.sorted, Highlight::Sorted)
    }

    fn step_partition(&mut self, out: &mut Outbox<Checkpoint>) {
        let Some(p) = self.partition.as_mut() else {
            return;
        };
        let (lo, hi) = (p.lo, p.hi);
        match p.phase {
            PartitionPhase::ChoosePivot => {
                let mid = lo + (hi - lo) / 2;
                p.phase = PartitionPhase::Scan;
                out.emit(Checkpoint::new(
                    format!(
                        "Chosen middle pivot: {} (idx {}) from range [{}..{}]. Swapping to end (idx {}).",
                        self.arr[mid], mid, lo, hi, hi
                    ),
                    self.scene(lo, hi).mark(mid, Highlight::Swap).mark(hi, Highlight::Swap),
                ));
                self.arr.swap(mid, hi);
                out.emit(Checkpoint::new(
                    format!("Partitioning [{}..{}] around pivot {}", lo, hi - 1, self.arr[hi]),
                    self.scene(lo, hi).mark(hi, Highlight::Pivot),
                ));
            }
            PartitionPhase::Scan => {
                if p.j >= hi {
                    p.phase = PartitionPhase::PlacePivot;
                    return;
                }
                let (j, store) = (p.j, p.store);
                let pivot = self.arr[hi];
                let smaller = self.arr[j] < pivot;
                p.j += 1;
                if smaller {
                    p.store += 1;
                }
                out.emit(Checkpoint::new(
                    format!("Comparing element {} (idx {}) with pivot {}.", self.arr[j], j, pivot),
                    self.scene(lo, hi).mark(hi, Highlight::Pivot).mark(j, Highlight::Compare),
                ));
                if smaller && store != j {
                    let caption = format!(
                        "{} < pivot. Swapping {} (idx {}) and {} (idx {}).",
                        self.arr[j], self.arr[store], store, self.arr[j], j
                    );
                    self.arr.swap(store, j);
                    out.emit(Checkpoint::new(
                        caption,
                        self.scene(lo, hi)
                            .mark(hi, Highlight::Pivot)
                            .mark(store, Highlight::Swap)
                            .mark(j, Highlight::Swap),
                    ));
                }
            }
            PartitionPhase::PlacePivot => {
                let at = p.store;
                self.partition = None;
                out.emit(Checkpoint::new(
                    format!(
                        "Swapping pivot {} (from idx {}) into correct position {}.",
                        self.arr[hi], hi, at
                    ),
                    self.scene(lo, hi).mark(hi, Highlight::Swap).mark(at, Highlight::Swap),
                ));
                self.arr.swap(at, hi);
                self.sorted[at] = true;
                out.emit(Checkpoint::new(
                    format!("Pivot {} is now sorted at index {}.", self.arr[at], at),
                    self.scene(lo, hi).mark(at, Highlight::Sorted),
                ));
                // right half pushed first so the left half is sorted first
                if at < hi {
                    self.ranges.push((at + 1, hi));
                }
                if at > lo {
                    self.ranges.push((lo, at - 1));
                }
            }
        }
    }
}

impl Machine for QuickSort {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if self.partition.is_some() {
            self.step_partition(out);
            return Ok(Flow::Continue);
        }
        match self.ranges.pop() {
            None => {
                out.emit(finished(&self.arr));
                Ok(Flow::Complete)
            }
            Some((lo, hi)) if lo == hi => {
                self.sorted[lo] = true;
                out.emit(Checkpoint::new(
                    format!("Single element {} at index {} is sorted.", self.arr[lo], lo),
                    self.scene(lo, hi),
                ));
                Ok(Flow::Continue)
            }
            Some((lo, hi)) => {
                self.partition = Some(Partition {
                    lo,
                    hi,
                    store: lo,
                    j: lo,
                    phase: PartitionPhase::ChoosePivot,
                });
                Ok(Flow::Continue)
            }
        }
    }

    fn name(&self) -> &str {
        "quick sort"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeapSortPhase {
    /// Heapify subtrees rooted at `next_root` and below
    Build { next_root: usize },
    Extract,
}

pub struct HeapSort {
    arr: Vec<i64>,
    /// Length of the heap prefix
    end: usize,
    phase: HeapSortPhase,
    /// Node currently sinking, if a sift is in progress
    sift: Option<usize>,
}

impl HeapSort {
    pub fn new(arr: Vec<i64>) -> Self {
        let end = arr.len();
        HeapSort {
            arr,
            end,
            phase: HeapSortPhase::Build {
                next_root: end / 2,
            },
            sift: None,
        }
    }

    fn scene(&self) -> BarScene {
        BarScene::new(&self.arr)
            .mark_range(0..self.end, Highlight::Range)
            .mark_range(self.end..self.arr.len(), Highlight::Sorted)
    }

    fn step_sift(&mut self, root: usize, out: &mut Outbox<Checkpoint>) {
        let (left, right) = (2 * root + 1, 2 * root + 2);
        let mut largest = root;
        if left < self.end && self.arr[left] > self.arr[largest] {
            largest = left;
        }
        if right < self.end && self.arr[right] > self.arr[largest] {
            largest = right;
        }
        let mut scene = self.scene().mark(root, Highlight::Pivot);
        for child in [left, right].into_iter().filter(|&c| c < self.end) {
            scene = scene.mark(child, Highlight::Compare);
        }
        out.emit(Checkpoint::new(
            format!("Heapifying at index {} (value {})", root, self.arr[root]),
            scene,
        ));
        if largest == root {
            self.sift = None;
            return;
        }
        self.arr.swap(root, largest);
        out.emit(Checkpoint::new(
            format!("Swapping {} down with larger child {}", self.arr[largest], self.arr[root]),
            self.scene().mark(root, Highlight::Swap).mark(largest, Highlight::Swap),
        ));
        self.sift = Some(largest);
    }
}

impl Machine for HeapSort {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if let Some(root) = self.sift {
            self.step_sift(root, out);
            return Ok(Flow::Continue);
        }
        match self.phase {
            HeapSortPhase::Build { next_root } => {
                if next_root == 0 {
                    out.emit(Checkpoint::new("Max-heap built.", self.scene().mark(0, Highlight::Pivot)));
                    self.phase = HeapSortPhase::Extract;
                } else {
                    self.phase = HeapSortPhase::Build {
                        next_root: next_root - 1,
                    };
                    self.sift = Some(next_root - 1);
                }
            }
            HeapSortPhase::Extract => {
                if self.end <= 1 {
                    out.emit(finished(&self.arr));
                    return Ok(Flow::Complete);
                }
                let last = self.end - 1;
                out.emit(Checkpoint::new(
                    format!("Moving max {} to index {}", self.arr[0], last),
                    self.scene().mark(0, Highlight::Swap).mark(last, Highlight::Swap),
                ));
                self.arr.swap(0, last);
                self.end = last;
                out.emit(Checkpoint::new(
                    format!("{} is sorted.", self.arr[last]),
                    self.scene(),
                ));
                self.sift = Some(0);
            }
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "heap sort"
    }
}
