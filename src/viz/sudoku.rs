//! Backtracking Sudoku solver
//!
//! The recursion over empty cells is flattened into an index `k` into the
//! list of empty cells plus the last digit tried for each of them. Moving
//! forward is `k += 1`, backtracking is `k -= 1`.

use super::scene::{BoardScene, Checkpoint, Grid, Highlight};
use crate::producer::{Flow, Machine, Outbox, ProducerError};

pub const BOARDS: [Grid; 3] = [
    [
        [0, 0, 0, 2, 6, 0, 7, 0, 1],
        [6, 8, 0, 0, 7, 0, 0, 9, 0],
        [1, 9, 0, 0, 0, 4, 5, 0, 0],
        [8, 2, 0, 1, 0, 0, 0, 4, 0],
        [0, 0, 4, 6, 0, 2, 9, 0, 0],
        [0, 5, 0, 0, 0, 3, 0, 2, 8],
        [0, 0, 9, 3, 0, 0, 0, 7, 4],
        [0, 4, 0, 0, 5, 0, 0, 3, 6],
        [7, 0, 3, 0, 1, 8, 0, 0, 0],
    ],
    [
        [5, 3, 0, 0, 7, 0, 0, 0, 0],
        [6, 0, 0, 1, 9, 5, 0, 0, 0],
        [0, 9, 8, 0, 0, 0, 0, 6, 0],
        [8, 0, 0, 0, 6, 0, 0, 0, 3],
        [4, 0, 0, 8, 0, 3, 0, 0, 1],
        [7, 0, 0, 0, 2, 0, 0, 0, 6],
        [0, 6, 0, 0, 0, 0, 2, 8, 0],
        [0, 0, 0, 4, 1, 9, 0, 0, 5],
        [0, 0, 0, 0, 8, 0, 0, 7, 9],
    ],
    [
        [8, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 3, 6, 0, 0, 0, 0, 0],
        [0, 7, 0, 0, 9, 0, 2, 0, 0],
        [0, 5, 0, 0, 0, 7, 0, 0, 0],
        [0, 0, 0, 0, 4, 5, 7, 0, 0],
        [0, 0, 0, 1, 0, 0, 0, 3, 0],
        [0, 0, 1, 0, 0, 0, 0, 6, 8],
        [0, 0, 8, 5, 0, 0, 0, 1, 0],
        [0, 9, 0, 0, 0, 0, 4, 0, 0],
    ],
];

pub fn fixed_cells(board: &Grid) -> [[bool; 9]; 9] {
    let mut fixed = [[false; 9]; 9];
    for (r, row) in board.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            fixed[r][c] = v != 0;
        }
    }
    fixed
}

/// Whether `digit` can go at (`row`, `col`) given the rest of the grid
pub fn allowed(grid: &Grid, row: usize, col: usize, digit: u8) -> bool {
    let (br, bc) = (row / 3 * 3, col / 3 * 3);
    for i in 0..9 {
        if i != col && grid[row][i] == digit {
            return false;
        }
        if i != row && grid[i][col] == digit {
            return false;
        }
        let (r, c) = (br + i / 3, bc + i % 3);
        if (r, c) != (row, col) && grid[r][c] == digit {
            return false;
        }
    }
    true
}

pub struct SudokuSolver {
    grid: Grid,
    fixed: [[bool; 9]; 9],
    empties: Vec<(usize, usize)>,
    /// Last digit tried per empty cell; 0 means untried
    tried: Vec<u8>,
    k: usize,
    tries: usize,
    backtracks: usize,
    started: bool,
}

impl SudokuSolver {
    pub fn new(board: Grid) -> Self {
        let empties: Vec<(usize, usize)> = (0..81)
            .map(|i| (i / 9, i % 9))
            .filter(|&(r, c)| board[r][c] == 0)
            .collect();
        let tried = vec![0; empties.len()];
        SudokuSolver {
            fixed: fixed_cells(&board),
            grid: board,
            empties,
            tried,
            k: 0,
            tries: 0,
            backtracks: 0,
            started: false,
        }
    }

    fn scene(&self) -> BoardScene {
        BoardScene::new(&self.grid, &self.fixed)
    }

    /// The puzzle's givens must not already conflict
    fn check_givens(&self) -> Result<(), ProducerError> {
        for r in 0..9 {
            for c in 0..9 {
                let v = self.grid[r][c];
                if v > 9 {
                    return Err(ProducerError::new(format!("invalid digit {} at row {}, col {}", v, r + 1, c + 1)));
                }
                if v != 0 && !allowed(&self.grid, r, c, v) {
                    return Err(ProducerError::new(format!(
                        "given {} at row {}, col {} conflicts with another given",
                        v,
                        r + 1,
                        c + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Machine for SudokuSolver {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if !self.started {
            self.started = true;
            self.check_givens()?;
            out.emit(Checkpoint::new(
                format!("Solving: {} empty cells.", self.empties.len()),
                self.scene(),
            ));
            return Ok(Flow::Continue);
        }

        let Some(&(r, c)) = self.empties.get(self.k) else {
            out.emit(Checkpoint::new(
                format!(
                    "Sudoku solved! {} placements tried, {} backtracks.",
                    self.tries, self.backtracks
                ),
                self.scene(),
            ));
            return Ok(Flow::Complete);
        };

        let digit = self.tried[self.k] + 1;
        self.grid[r][c] = 0;
        if digit > 9 {
            self.tried[self.k] = 0;
            self.backtracks += 1;
            if self.k == 0 {
                out.emit(Checkpoint::new("No solution exists for this board.", self.scene()));
                return Ok(Flow::Complete);
            }
            self.k -= 1;
            let (pr, pc) = self.empties[self.k];
            out.emit(Checkpoint::new(
                format!(
                    "No digit fits at ({}, {}). Backtracking to ({}, {}).",
                    r + 1,
                    c + 1,
                    pr + 1,
                    pc + 1
                ),
                self.scene().mark(r, c, Highlight::Rejected).mark(pr, pc, Highlight::Current),
            ));
            return Ok(Flow::Continue);
        }

        self.tried[self.k] = digit;
        self.tries += 1;
        if allowed(&self.grid, r, c, digit) {
            self.grid[r][c] = digit;
            self.k += 1;
            out.emit(Checkpoint::new(
                format!("Placing {} at ({}, {}).", digit, r + 1, c + 1),
                self.scene().mark(r, c, Highlight::Found),
            ));
        } else {
            self.grid[r][c] = digit;
            let scene = self.scene().mark(r, c, Highlight::Mismatch);
            self.grid[r][c] = 0;
            out.emit(Checkpoint::new(
                format!("{} conflicts at ({}, {}).", digit, r + 1, c + 1),
                scene,
            ));
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "sudoku solver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{Driven, Step, StepProducer};
    use crate::viz::scene::Scene;

    fn solve(board: Grid) -> (Checkpoint, Option<ProducerError>) {
        let mut producer = Driven::new(SudokuSolver::new(board));
        let mut last = None;
        loop {
            match producer.next_checkpoint() {
                Step::Yielded(c) => last = Some(c),
                Step::Done => return (last.unwrap(), None),
                Step::Failed(e) => return (last.unwrap_or_else(|| Checkpoint::new("", BoardScene::new(&board, &[[false; 9]; 9]))), Some(e)),
            }
        }
    }

    fn is_solution(grid: &Grid) -> bool {
        (0..9).all(|r| (0..9).all(|c| grid[r][c] != 0 && allowed(grid, r, c, grid[r][c])))
    }

    #[test]
    fn test_solves_sample_boards() {
        for board in &BOARDS[..2] {
            let (last, failure) = solve(*board);
            assert!(failure.is_none());
            assert!(last.caption.starts_with("Sudoku solved!"), "{}", last.caption);
            match last.scene {
                Scene::Board(b) => {
                    assert!(is_solution(&b.cells));
                    // givens are untouched
                    for r in 0..9 {
                        for c in 0..9 {
                            if board[r][c] != 0 {
                                assert_eq!(b.cells[r][c], board[r][c]);
                            }
                        }
                    }
                }
                other => panic!("Expected board scene, got {}", other.kind_name()),
            }
        }
    }

    #[test]
    fn test_conflicting_givens_fail() {
        let mut board = BOARDS[1];
        board[0][2] = 5;
        let (_, failure) = solve(board);
        assert!(failure.unwrap().message().contains("conflicts"));
    }

    #[test]
    fn test_unsolvable_board_is_reported() {
        // row 0 needs a 9 at (0, 8) but column 8 already has one
        let mut board = [[0u8; 9]; 9];
        board[0] = [1, 2, 3, 4, 5, 6, 7, 8, 0];
        board[1][8] = 9;
        let (last, failure) = solve(board);
        assert!(failure.is_none());
        assert_eq!(last.caption, "No solution exists for this board.");
    }

    #[test]
    fn test_allowed() {
        let board = BOARDS[1];
        assert!(!allowed(&board, 0, 2, 5));
        assert!(!allowed(&board, 0, 2, 6));
        assert!(!allowed(&board, 0, 2, 9));
        assert!(allowed(&board, 0, 2, 4));
    }
}
