//! Step producers: algorithms expressed as lazily produced checkpoint sequences
//!
//! A [`StepProducer`] is asked for one checkpoint at a time and answers with a
//! tagged [`Step`]. Producers are finite and can only be restarted by creating a
//! fresh instance through a factory closure (see
//! [`Sequencer::start`](crate::playback::Sequencer::start)).
//!
//! - [`machine`]: the explicit state-machine driver every algorithm in
//!   [`viz`](crate::viz) is written against
//! - [`Scripted`]: a producer that replays a fixed list of checkpoints

pub mod machine;

pub use machine::{Driven, Flow, Machine, Outbox};

use std::collections::VecDeque;
use thiserror::Error;

/// Result of asking a producer for its next checkpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Step<C> {
    /// A checkpoint is ready to be presented
    Yielded(C),
    /// The producer is exhausted; it must not be asked again
    Done,
    /// The producer failed; the run cannot continue
    Failed(ProducerError),
}

/// Error raised by an algorithm while computing a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProducerError {
    message: String,
}

impl ProducerError {
    pub fn new(message: impl Into<String>) -> Self {
        ProducerError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A factory could not produce a usable producer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MalformedProducer(pub String);

/// Anything that yields checkpoints one at a time
pub trait StepProducer {
    type Checkpoint;

    /// Compute the next checkpoint. Any view state the checkpoint describes
    /// must already be final when this returns.
    fn next_checkpoint(&mut self) -> Step<Self::Checkpoint>;

    /// Short name used in log lines
    fn label(&self) -> &str {
        "producer"
    }
}

pub type BoxedProducer<C> = Box<dyn StepProducer<Checkpoint = C>>;

/// Box a concrete producer behind the trait object the sequencer owns
pub fn boxed<P>(producer: P) -> BoxedProducer<P::Checkpoint>
where
    P: StepProducer + 'static,
{
    Box::new(producer)
}

/// Fixed checkpoint list, optionally failing at a given position
#[derive(Debug, Clone)]
pub struct Scripted<C> {
    label: String,
    remaining: VecDeque<C>,
    /// Fail instead of yielding checkpoint number `n` (1-based)
    fail_at: Option<(usize, String)>,
    delivered: usize,
}

impl<C> Scripted<C> {
    pub fn new(checkpoints: impl IntoIterator<Item = C>) -> Self {
        Scripted {
            label: String::from("scripted"),
            remaining: checkpoints.into_iter().collect(),
            fail_at: None,
            delivered: 0,
        }
    }

    /// Fail with `message` when checkpoint `k` (1-based) is requested
    pub fn failing_at(mut self, k: usize, message: impl Into<String>) -> Self {
        self.fail_at = Some((k, message.into()));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl<C> StepProducer for Scripted<C> {
    type Checkpoint = C;

    fn next_checkpoint(&mut self) -> Step<C> {
        if let Some((k, message)) = &self.fail_at {
            if self.delivered + 1 == *k {
                return Step::Failed(ProducerError::new(message.clone()));
            }
        }
        match self.remaining.pop_front() {
            Some(checkpoint) => {
                self.delivered += 1;
                Step::Yielded(checkpoint)
            }
            None => Step::Done,
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}
