//! Tower of Hanoi
//!
//! The recursive solution is unrolled onto an explicit stack of
//! [`HanoiFrame`]s. Each move is shown in three checkpoints: lift, carry and
//! place. Rod contents are checked on every move, so a corrupted rod surfaces
//! as a producer error instead of a wrong picture.

use super::scene::{Checkpoint, HanoiScene};
use crate::producer::{Flow, Machine, Outbox, ProducerError};
use std::ops::RangeInclusive;

pub const DISK_RANGE: RangeInclusive<usize> = 2..=8;
pub const ROD_NAMES: [char; 3] = ['A', 'B', 'C'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HanoiFrame {
    Solve {
        disks: u32,
        from: usize,
        to: usize,
        via: usize,
    },
    Move {
        disk: u32,
        from: usize,
        to: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveStage {
    Carry,
    Place,
}

pub struct Hanoi {
    rods: [Vec<u32>; 3],
    stack: Vec<HanoiFrame>,
    /// Disk in the air, with its destination
    moving: Option<(MoveStage, u32, usize, usize)>,
    moves: usize,
    total_moves: usize,
    started: bool,
}

impl Hanoi {
    /// `disks` stacked on rod A, to be moved to rod C
    pub fn new(disks: u32) -> Self {
        let rods = [(1..=disks).rev().collect(), Vec::new(), Vec::new()];
        Hanoi::with_rods(rods, disks)
    }

    /// Start from arbitrary rods while still planning the standard solution
    /// for `disks` disks on rod A
    pub fn with_rods(rods: [Vec<u32>; 3], disks: u32) -> Self {
        Hanoi {
            rods,
            stack: vec![HanoiFrame::Solve {
                disks,
                from: 0,
                to: 2,
                via: 1,
            }],
            moving: None,
            moves: 0,
            total_moves: (1usize << disks) - 1,
            started: false,
        }
    }

    pub fn resting_scene(disks: u32) -> HanoiScene {
        HanoiScene {
            rods: [(1..=disks).rev().collect(), Vec::new(), Vec::new()],
            lifted: None,
            moves: 0,
            total_moves: (1usize << disks) - 1,
        }
    }

    fn scene(&self) -> HanoiScene {
        HanoiScene {
            rods: self.rods.clone(),
            lifted: self.moving.map(|(stage, disk, from, to)| match stage {
                MoveStage::Carry => (disk, from),
                MoveStage::Place => (disk, to),
            }),
            moves: self.moves,
            total_moves: self.total_moves,
        }
    }

    fn lift(&mut self, disk: u32, from: usize, to: usize) -> Result<(), ProducerError> {
        match self.rods[from].pop() {
            Some(top) if top == disk => {}
            Some(top) => {
                return Err(ProducerError::new(format!(
                    "expected disk {} on top of rod {}, found disk {}",
                    disk, ROD_NAMES[from], top
                )))
            }
            None => {
                return Err(ProducerError::new(format!(
                    "expected disk {} on rod {}, but it is empty",
                    disk, ROD_NAMES[from]
                )))
            }
        }
        self.moving = Some((MoveStage::Carry, disk, from, to));
        Ok(())
    }

    fn place(&mut self, disk: u32, to: usize) -> Result<(), ProducerError> {
        if let Some(&top) = self.rods[to].last() {
            if top < disk {
                return Err(ProducerError::new(format!(
                    "cannot place disk {} on smaller disk {} (rod {})",
                    disk, top, ROD_NAMES[to]
                )));
            }
        }
        self.rods[to].push(disk);
        self.moving = None;
        self.moves += 1;
        Ok(())
    }
}

impl Machine for Hanoi {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if !self.started {
            self.started = true;
            out.emit(Checkpoint::new(
                format!(
                    "Moving {} disks from rod A to rod C ({} moves).",
                    self.rods[0].len(),
                    self.total_moves
                ),
                self.scene(),
            ));
            return Ok(Flow::Continue);
        }

        match self.moving {
            Some((MoveStage::Carry, disk, from, to)) => {
                self.moving = Some((MoveStage::Place, disk, from, to));
                out.emit(Checkpoint::new(
                    format!(
                        "Carrying disk {} from rod {} to rod {}",
                        disk, ROD_NAMES[from], ROD_NAMES[to]
                    ),
                    self.scene(),
                ));
                return Ok(Flow::Continue);
            }
            Some((MoveStage::Place, disk, _, to)) => {
                self.place(disk, to)?;
                out.emit(Checkpoint::new(
                    format!(
                        "Placed disk {} on rod {} (move {}/{})",
                        disk, ROD_NAMES[to], self.moves, self.total_moves
                    ),
                    self.scene(),
                ));
                return Ok(Flow::Continue);
            }
            None => {}
        }

        match self.stack.pop() {
            None => {
                out.emit(Checkpoint::new(
                    format!("Solved in {} moves.", self.moves),
                    self.scene(),
                ));
                Ok(Flow::Complete)
            }
            Some(HanoiFrame::Solve { disks: 0, .. }) => Ok(Flow::Continue),
            Some(HanoiFrame::Solve {
                disks,
                from,
                to,
                via,
            }) => {
                self.stack.push(HanoiFrame::Solve {
                    disks: disks - 1,
                    from: via,
                    to,
                    via: from,
                });
                self.stack.push(HanoiFrame::Move {
                    disk: disks,
                    from,
                    to,
                });
                self.stack.push(HanoiFrame::Solve {
                    disks: disks - 1,
                    from,
                    to: via,
                    via: to,
                });
                Ok(Flow::Continue)
            }
            Some(HanoiFrame::Move { disk, from, to }) => {
                self.lift(disk, from, to)?;
                out.emit(Checkpoint::new(
                    format!("Lifting disk {} from rod {}", disk, ROD_NAMES[from]),
                    self.scene(),
                ));
                Ok(Flow::Continue)
            }
        }
    }

    fn name(&self) -> &str {
        "tower of hanoi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{Driven, Step, StepProducer};
    use crate::viz::scene::Scene;

    fn drain(machine: Hanoi) -> (Vec<Checkpoint>, Option<ProducerError>) {
        let mut producer = Driven::new(machine);
        let mut seen = Vec::new();
        loop {
            match producer.next_checkpoint() {
                Step::Yielded(c) => seen.push(c),
                Step::Done => return (seen, None),
                Step::Failed(e) => return (seen, Some(e)),
            }
        }
    }

    #[test]
    fn test_three_disks_take_seven_moves() {
        let (checkpoints, failure) = drain(Hanoi::new(3));
        assert!(failure.is_none());
        // intro + 3 per move + solved
        assert_eq!(checkpoints.len(), 1 + 7 * 3 + 1);
        match &checkpoints.last().unwrap().scene {
            Scene::Hanoi(h) => {
                assert_eq!(h.rods[2], vec![3, 2, 1]);
                assert!(h.rods[0].is_empty() && h.rods[1].is_empty());
                assert_eq!(h.moves, 7);
            }
            other => panic!("Expected hanoi scene, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_rods_stay_ordered() {
        let (checkpoints, _) = drain(Hanoi::new(5));
        for c in &checkpoints {
            if let Scene::Hanoi(h) = &c.scene {
                for rod in &h.rods {
                    assert!(rod.windows(2).all(|w| w[0] > w[1]), "{}", c.caption);
                }
            }
        }
    }

    #[test]
    fn test_disk_mismatch_fails_the_run() {
        let rods = [vec![3, 1, 2], Vec::new(), Vec::new()];
        let (checkpoints, failure) = drain(Hanoi::with_rods(rods, 3));
        let failure = failure.expect("mismatch should fail");
        assert!(failure.message().contains("expected disk 1"), "{}", failure);
        assert_eq!(checkpoints.len(), 1);
    }
}
