//! Stack, queue and singly linked list operations
//!
//! Stack and queue operations touch a single end, so their few checkpoints
//! are scripted up front. Linked list operations walk the list node by
//! node through [`ListWalk`].

use super::scene::{Checkpoint, Highlight, SequenceKind, SequenceScene};
use crate::producer::{Flow, Machine, Outbox, ProducerError, Scripted};

fn seq(kind: SequenceKind, items: &[String]) -> SequenceScene {
    SequenceScene::new(kind, items)
}

pub fn push(items: &[String], value: String) -> Scripted<Checkpoint> {
    let mut after = items.to_vec();
    after.push(value.clone());
    let top = after.len() - 1;
    Scripted::new([
        Checkpoint::new(
            format!("Pushing {} onto the stack", value),
            seq(SequenceKind::Stack, &after).mark(top, Highlight::Current),
        ),
        Checkpoint::new(
            format!("{} is now on top (size {})", value, after.len()),
            seq(SequenceKind::Stack, &after).mark(top, Highlight::Found),
        ),
        Checkpoint::new(format!("Pushed {}", value), seq(SequenceKind::Stack, &after)),
    ])
    .with_label("stack push")
}

pub fn pop(items: &[String]) -> Scripted<Checkpoint> {
    let Some(value) = items.last() else {
        return Scripted::new([Checkpoint::new(
            "Stack is empty. Nothing to pop.",
            seq(SequenceKind::Stack, items),
        )])
        .with_label("stack pop");
    };
    let after = &items[..items.len() - 1];
    Scripted::new([
        Checkpoint::new(
            format!("Popping top element {}", value),
            seq(SequenceKind::Stack, items).mark(items.len() - 1, Highlight::Rejected),
        ),
        Checkpoint::new(
            format!("Popped {} (size {})", value, after.len()),
            seq(SequenceKind::Stack, after),
        ),
    ])
    .with_label("stack pop")
}

pub fn enqueue(items: &[String], value: String) -> Scripted<Checkpoint> {
    let mut after = items.to_vec();
    after.push(value.clone());
    let rear = after.len() - 1;
    Scripted::new([
        Checkpoint::new(
            format!("Enqueuing {} at the rear", value),
            seq(SequenceKind::Queue, &after).mark(rear, Highlight::Current),
        ),
        Checkpoint::new(
            format!("Enqueued {} (size {})", value, after.len()),
            seq(SequenceKind::Queue, &after),
        ),
    ])
    .with_label("queue enqueue")
}

pub fn dequeue(items: &[String]) -> Scripted<Checkpoint> {
    let Some(value) = items.first() else {
        return Scripted::new([Checkpoint::new(
            "Queue is empty. Nothing to dequeue.",
            seq(SequenceKind::Queue, items),
        )])
        .with_label("queue dequeue");
    };
    let after = &items[1..];
    Scripted::new([
        Checkpoint::new(
            format!("Dequeuing front element {}", value),
            seq(SequenceKind::Queue, items).mark(0, Highlight::Rejected),
        ),
        Checkpoint::new(
            format!("Dequeued {} (size {})", value, after.len()),
            seq(SequenceKind::Queue, after),
        ),
    ])
    .with_label("queue dequeue")
}

pub fn insert_head(items: &[String], value: String) -> Scripted<Checkpoint> {
    let mut after = Vec::with_capacity(items.len() + 1);
    after.push(value.clone());
    after.extend_from_slice(items);
    let caption = match items.first() {
        Some(old) => format!("New node {} points to old head {}", value, old),
        None => format!("List was empty. {} is the only node", value),
    };
    Scripted::new([
        Checkpoint::new(caption, seq(SequenceKind::List, &after).mark(0, Highlight::Current)),
        Checkpoint::new(
            format!("{} is the new head", value),
            seq(SequenceKind::List, &after).mark(0, Highlight::Found),
        ),
        Checkpoint::new(format!("Inserted {} at head", value), seq(SequenceKind::List, &after)),
    ])
    .with_label("list insert head")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    InsertTail,
    Delete,
    Search,
}

impl ListAction {
    fn label(self) -> &'static str {
        match self {
            ListAction::InsertTail => "list insert tail",
            ListAction::Delete => "list delete",
            ListAction::Search => "list search",
        }
    }
}

/// Node-by-node walk from the head
pub struct ListWalk {
    items: Vec<String>,
    value: String,
    action: ListAction,
    cursor: usize,
    /// Target node found; the next resume finishes the operation
    hit: Option<usize>,
}

impl ListWalk {
    pub fn new(items: &[String], value: String, action: ListAction) -> Self {
        ListWalk {
            items: items.to_vec(),
            value,
            action,
            cursor: 0,
            hit: None,
        }
    }

    fn scene(&self) -> SequenceScene {
        seq(SequenceKind::List, &self.items)
    }

    fn finish_hit(&mut self, at: usize, out: &mut Outbox<Checkpoint>) {
        match self.action {
            ListAction::Delete => {
                let removed = self.items.remove(at);
                out.emit(Checkpoint::new(
                    format!("Deleted {} from position {}", removed, at),
                    self.scene(),
                ));
            }
            ListAction::Search => {
                out.emit(Checkpoint::new(
                    format!("Search complete: {} is at position {}", self.value, at),
                    self.scene(),
                ));
            }
            ListAction::InsertTail => {
                out.emit(Checkpoint::new(format!("Inserted {} at tail", self.value), self.scene()));
            }
        }
    }
}

impl Machine for ListWalk {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if let Some(at) = self.hit.take() {
            self.finish_hit(at, out);
            return Ok(Flow::Complete);
        }

        if self.items.is_empty() {
            match self.action {
                ListAction::InsertTail => {
                    self.items.push(self.value.clone());
                    out.emit(Checkpoint::new(
                        format!("List was empty. {} becomes the head", self.value),
                        self.scene().mark(0, Highlight::Found),
                    ));
                    self.hit = Some(0);
                    return Ok(Flow::Continue);
                }
                ListAction::Delete | ListAction::Search => {
                    out.emit(Checkpoint::new("List is empty.", self.scene()));
                    return Ok(Flow::Complete);
                }
            }
        }

        let i = self.cursor;
        let Some(node) = self.items.get(i).cloned() else {
            out.emit(Checkpoint::new(
                format!("{} not found in the list", self.value),
                self.scene(),
            ));
            return Ok(Flow::Complete);
        };
        let visited = 0..i;

        match self.action {
            ListAction::InsertTail => {
                let is_tail = i + 1 == self.items.len();
                if is_tail {
                    self.items.push(self.value.clone());
                    out.emit(Checkpoint::new(
                        format!("Reached tail {}. Linking new node {}", node, self.value),
                        self.scene()
                            .mark_range(visited, Highlight::Visited)
                            .mark(i, Highlight::Current)
                            .mark(i + 1, Highlight::Found),
                    ));
                    self.hit = Some(i + 1);
                } else {
                    out.emit(Checkpoint::new(
                        format!("Traversing: at node {} (position {})", node, i),
                        self.scene().mark_range(visited, Highlight::Visited).mark(i, Highlight::Current),
                    ));
                }
            }
            ListAction::Delete | ListAction::Search => {
                if node == self.value {
                    let role = if self.action == ListAction::Delete {
                        Highlight::Rejected
                    } else {
                        Highlight::Found
                    };
                    out.emit(Checkpoint::new(
                        format!("Found {} at position {}", node, i),
                        self.scene().mark_range(visited, Highlight::Visited).mark(i, role),
                    ));
                    self.hit = Some(i);
                } else {
                    out.emit(Checkpoint::new(
                        format!("Comparing {} with {}: no match", node, self.value),
                        self.scene()
                            .mark_range(visited, Highlight::Visited)
                            .mark(i, Highlight::Compare),
                    ));
                }
            }
        }
        self.cursor += 1;
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        self.action.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{Driven, Step, StepProducer};
    use crate::viz::scene::Scene;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn drain(mut producer: impl StepProducer<Checkpoint = Checkpoint>) -> Vec<Checkpoint> {
        let mut seen = Vec::new();
        while let Step::Yielded(c) = producer.next_checkpoint() {
            seen.push(c);
        }
        seen
    }

    fn final_items(checkpoints: &[Checkpoint]) -> Vec<String> {
        match &checkpoints.last().unwrap().scene {
            Scene::Sequence(s) => s.items.clone(),
            other => panic!("Expected sequence scene, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_stack_is_lifo() {
        let pushed = final_items(&drain(push(&items(&["1", "2"]), "3".into())));
        assert_eq!(pushed, items(&["1", "2", "3"]));
        let popped = drain(pop(&pushed));
        assert_eq!(popped[0].caption, "Popping top element 3");
        assert_eq!(final_items(&popped), items(&["1", "2"]));
    }

    #[test]
    fn test_queue_is_fifo() {
        let queued = final_items(&drain(enqueue(&items(&["a"]), "b".into())));
        assert_eq!(queued, items(&["a", "b"]));
        let out = drain(dequeue(&queued));
        assert_eq!(out[0].caption, "Dequeuing front element a");
        assert_eq!(final_items(&out), items(&["b"]));
    }

    #[test]
    fn test_empty_removals_leave_structure() {
        let stack = drain(pop(&[]));
        assert_eq!(stack.len(), 1);
        assert!(final_items(&stack).is_empty());
        assert!(drain(dequeue(&[]))[0].caption.contains("empty"));
    }

    #[test]
    fn test_list_insert_both_ends() {
        let head = final_items(&drain(insert_head(&items(&["b"]), "a".into())));
        assert_eq!(head, items(&["a", "b"]));
        let walk = drain(Driven::new(ListWalk::new(&head, "c".into(), ListAction::InsertTail)));
        assert_eq!(final_items(&walk), items(&["a", "b", "c"]));
        assert_eq!(walk.last().unwrap().caption, "Inserted c at tail");
        let empty = drain(Driven::new(ListWalk::new(&[], "x".into(), ListAction::InsertTail)));
        assert_eq!(final_items(&empty), items(&["x"]));
    }

    #[test]
    fn test_list_delete_and_search() {
        let list = items(&["5", "7", "9"]);
        let deleted = drain(Driven::new(ListWalk::new(&list, "7".into(), ListAction::Delete)));
        assert_eq!(final_items(&deleted), items(&["5", "9"]));

        let found = drain(Driven::new(ListWalk::new(&list, "9".into(), ListAction::Search)));
        assert_eq!(found.last().unwrap().caption, "Search complete: 9 is at position 2");
        assert_eq!(final_items(&found), list);

        let missing = drain(Driven::new(ListWalk::new(&list, "4".into(), ListAction::Delete)));
        assert_eq!(missing.last().unwrap().caption, "4 not found in the list");
        assert_eq!(final_items(&missing), list);
        // one comparison per node plus the verdict
        assert_eq!(missing.len(), 4);
    }

    #[test]
    fn test_list_ops_on_empty() {
        let out = drain(Driven::new(ListWalk::new(&[], "1".into(), ListAction::Search)));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].caption, "List is empty.");
    }
}
