//! Explicit state-machine producers
//!
//! Algorithms are written as a [`Machine`]: a struct holding its own phase
//! enum and, for recursive algorithms, an explicit stack of frames. Each call
//! to [`Machine::resume`] runs the algorithm forward until it has pushed at
//! least one checkpoint into the [`Outbox`] (or finished). [`Driven`] adapts a
//! machine to the [`StepProducer`] contract, handing out queued checkpoints
//! one at a time.

use super::{ProducerError, Step, StepProducer};
use std::collections::VecDeque;

/// What a machine reports after one resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Complete,
}

/// Checkpoints queued by a machine but not yet handed out
#[derive(Debug)]
pub struct Outbox<C> {
    queue: VecDeque<C>,
}

impl<C> Outbox<C> {
    fn new() -> Self {
        Outbox {
            queue: VecDeque::new(),
        }
    }

    pub fn emit(&mut self, checkpoint: C) {
        self.queue.push_back(checkpoint);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn pop(&mut self) -> Option<C> {
        self.queue.pop_front()
    }
}

pub trait Machine {
    type Checkpoint;

    /// Advance the algorithm. Returning `Flow::Continue` without emitting is
    /// allowed (e.g. skipping an empty range) as long as progress is made.
    fn resume(&mut self, out: &mut Outbox<Self::Checkpoint>) -> Result<Flow, ProducerError>;

    fn name(&self) -> &str;
}

impl<M: Machine + ?Sized> Machine for Box<M> {
    type Checkpoint = M::Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Self::Checkpoint>) -> Result<Flow, ProducerError> {
        (**self).resume(out)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// [`StepProducer`] over a [`Machine`]
pub struct Driven<M: Machine> {
    machine: M,
    outbox: Outbox<M::Checkpoint>,
    complete: bool,
    failure: Option<ProducerError>,
}

impl<M: Machine> Driven<M> {
    pub fn new(machine: M) -> Self {
        Driven {
            machine,
            outbox: Outbox::new(),
            complete: false,
            failure: None,
        }
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }
}

impl<M: Machine> StepProducer for Driven<M> {
    type Checkpoint = M::Checkpoint;

    fn next_checkpoint(&mut self) -> Step<M::Checkpoint> {
        loop {
            // Checkpoints emitted before a failure are still delivered first
            if let Some(checkpoint) = self.outbox.pop() {
                return Step::Yielded(checkpoint);
            }
            if let Some(failure) = self.failure.take() {
                self.complete = true;
                return Step::Failed(failure);
            }
            if self.complete {
                return Step::Done;
            }
            match self.machine.resume(&mut self.outbox) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Complete) => self.complete = true,
                Err(e) => {
                    self.complete = true;
                    self.failure = Some(e);
                }
            }
        }
    }

    fn label(&self) -> &str {
        self.machine.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts down, emitting every other number
    struct Countdown {
        n: u32,
        fail_at: Option<u32>,
    }

    impl Machine for Countdown {
        type Checkpoint = u32;

        fn resume(&mut self, out: &mut Outbox<u32>) -> Result<Flow, ProducerError> {
            if self.n == 0 {
                return Ok(Flow::Complete);
            }
            if Some(self.n) == self.fail_at {
                return Err(ProducerError::new("countdown failed"));
            }
            if self.n % 2 == 0 {
                out.emit(self.n);
                out.emit(self.n * 10);
            }
            self.n -= 1;
            Ok(Flow::Continue)
        }

        fn name(&self) -> &str {
            "countdown"
        }
    }

    #[test]
    fn test_driven_skips_silent_resumes() {
        let mut producer = Driven::new(Countdown { n: 4, fail_at: None });
        let mut seen = Vec::new();
        while let Step::Yielded(v) = producer.next_checkpoint() {
            seen.push(v);
        }
        assert_eq!(seen, vec![4, 40, 2, 20]);
        assert_eq!(producer.next_checkpoint(), Step::Done);
    }

    #[test]
    fn test_driven_delivers_queued_before_failure() {
        let mut producer = Driven::new(Countdown {
            n: 4,
            fail_at: Some(3),
        });
        assert_eq!(producer.next_checkpoint(), Step::Yielded(4));
        assert_eq!(producer.next_checkpoint(), Step::Yielded(40));
        assert!(matches!(producer.next_checkpoint(), Step::Failed(_)));
        assert_eq!(producer.next_checkpoint(), Step::Done);
    }
}
