use std::time::Duration;

use thiserror::Error;

use crate::puzzle::{Move, Point};

/// Errors raised by board access, construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("x coordinate must be in range 0 <= x < {size}, got {x}")]
    OutOfRangeX { x: isize, size: usize },
    #[error("y coordinate must be in range 0 <= y < {size}, got {y}")]
    OutOfRangeY { y: isize, size: usize },
    #[error("tile {0} not present")]
    NotFound(u32),
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("board side must be at least 2, got {0}")]
    InvalidSize(usize),
    #[error("{0} tiles do not form a square board")]
    NotSquare(usize),
    #[error("tiles are not a permutation of 0..{expected}")]
    NotPermutation { expected: usize },
    #[error("cannot parse tile {0:?}")]
    Parse(String),
}

impl PuzzleError {
    /// Returns `true` for either axis of a coordinate range failure.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRangeX { .. } | Self::OutOfRangeY { .. })
    }

    pub(crate) fn out_of_range(p: Point, size: usize) -> Self {
        if p.x < 0 || p.x as usize >= size {
            Self::OutOfRangeX { x: p.x, size }
        } else {
            Self::OutOfRangeY { y: p.y, size }
        }
    }
}

/// Terminal failures of a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The frontier ran dry, or the start has the wrong permutation parity.
    #[error("puzzle is not solvable")]
    Unsolvable,
    #[error("search budget exceeded after {operations} operations in {elapsed:?}")]
    BudgetExceeded { operations: u64, elapsed: Duration },
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}
