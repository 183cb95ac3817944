//! Binary min/max heap insert and extract

use super::scene::{Checkpoint, HeapOrder, HeapScene, Highlight};
use crate::producer::{Flow, Machine, Outbox, ProducerError};
use std::ops::RangeInclusive;

pub const HEAP_SIZE_RANGE: RangeInclusive<usize> = 1..=31;

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

/// Heapify `values` in place without producing checkpoints
pub fn build_heap(mut values: Vec<i64>, order: HeapOrder) -> Vec<i64> {
    for root in (0..values.len() / 2).rev() {
        let mut i = root;
        while let Some(child) = preferred_child(&values, values.len(), i, order) {
            if !order.above(values[child], values[i]) {
                break;
            }
            values.swap(i, child);
            i = child;
        }
    }
    values
}

/// Whether every parent is above-or-equal its children
pub fn is_heap(values: &[i64], order: HeapOrder) -> bool {
    (1..values.len()).all(|i| !order.above(values[i], values[parent(i)]))
}

fn preferred_child(values: &[i64], len: usize, i: usize, order: HeapOrder) -> Option<usize> {
    let (l, r) = (2 * i + 1, 2 * i + 2);
    match (l < len, r < len) {
        (false, _) => None,
        (true, false) => Some(l),
        (true, true) => Some(if order.above(values[r], values[l]) { r } else { l }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeapPhase {
    Start,
    SiftUp(usize),
    SiftDown(usize),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapAction {
    Insert(i64),
    Extract,
}

pub struct HeapOp {
    items: Vec<i64>,
    order: HeapOrder,
    action: HeapAction,
    phase: HeapPhase,
}

impl HeapOp {
    pub fn new(items: &[i64], order: HeapOrder, action: HeapAction) -> Self {
        HeapOp {
            items: items.to_vec(),
            order,
            action,
            phase: HeapPhase::Start,
        }
    }

    fn scene(&self) -> HeapScene {
        HeapScene::new(self.order, &self.items)
    }

    fn root_name(&self) -> &'static str {
        match self.order {
            HeapOrder::Min => "minimum",
            HeapOrder::Max => "maximum",
        }
    }
}

impl Machine for HeapOp {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        match self.phase {
            HeapPhase::Start => match self.action {
                HeapAction::Insert(value) => {
                    self.items.push(value);
                    let at = self.items.len() - 1;
                    out.emit(Checkpoint::new(
                        format!("Inserted {} at index {}", value, at),
                        self.scene().mark(at, Highlight::Current),
                    ));
                    self.phase = HeapPhase::SiftUp(at);
                }
                HeapAction::Extract => {
                    let Some(&root) = self.items.first() else {
                        out.emit(Checkpoint::new("Heap is empty. Nothing to extract.", self.scene()));
                        return Ok(Flow::Complete);
                    };
                    out.emit(Checkpoint::new(
                        format!("Extracting {} {}", self.root_name(), root),
                        self.scene().mark(0, Highlight::Rejected),
                    ));
                    let last = self.items.len() - 1;
                    self.items.swap(0, last);
                    self.items.pop();
                    if self.items.is_empty() {
                        self.phase = HeapPhase::Done;
                    } else {
                        out.emit(Checkpoint::new(
                            format!("Moved last element {} to the root", self.items[0]),
                            self.scene().mark(0, Highlight::Current),
                        ));
                        self.phase = HeapPhase::SiftDown(0);
                    }
                }
            },
            HeapPhase::SiftUp(0) => self.phase = HeapPhase::Done,
            HeapPhase::SiftUp(i) => {
                let p = parent(i);
                let (child, par) = (self.items[i], self.items[p]);
                out.emit(Checkpoint::new(
                    format!("Comparing {} with parent {}", child, par),
                    self.scene().mark(i, Highlight::Current).mark(p, Highlight::Compare),
                ));
                if self.order.above(child, par) {
                    self.items.swap(i, p);
                    out.emit(Checkpoint::new(
                        format!("Swapping {} up past {}", child, par),
                        self.scene().mark(i, Highlight::Swap).mark(p, Highlight::Swap),
                    ));
                    self.phase = HeapPhase::SiftUp(p);
                } else {
                    self.phase = HeapPhase::Done;
                }
            }
            HeapPhase::SiftDown(i) => {
                let len = self.items.len();
                let Some(child) = preferred_child(&self.items, len, i, self.order) else {
                    self.phase = HeapPhase::Done;
                    return Ok(Flow::Continue);
                };
                let (value, cv) = (self.items[i], self.items[child]);
                out.emit(Checkpoint::new(
                    format!("Comparing {} with child {}", value, cv),
                    self.scene().mark(i, Highlight::Current).mark(child, Highlight::Compare),
                ));
                if self.order.above(cv, value) {
                    self.items.swap(i, child);
                    out.emit(Checkpoint::new(
                        format!("Swapping {} down past {}", value, cv),
                        self.scene().mark(i, Highlight::Swap).mark(child, Highlight::Swap),
                    ));
                    self.phase = HeapPhase::SiftDown(child);
                } else {
                    self.phase = HeapPhase::Done;
                }
            }
            HeapPhase::Done => {
                out.emit(Checkpoint::new(
                    format!("{}-heap property restored ({} elements)", capitalised(self.order.label()), self.items.len()),
                    self.scene(),
                ));
                return Ok(Flow::Complete);
            }
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        match self.action {
            HeapAction::Insert(_) => "heap insert",
            HeapAction::Extract => "heap extract",
        }
    }
}

fn capitalised(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
