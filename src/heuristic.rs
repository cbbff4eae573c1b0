//! Admissible estimates of the number of moves left to reach the goal.
//!
//! The solver takes its estimate through a plain function pointer,
//! [`Heuristic`], so any of the functions here (or a caller's own) can be
//! plugged in without touching the search loop.
//!
//! All three never overestimate. Each move relocates exactly one tile by one
//! cell, so:
//! - a misplaced tile needs at least one move;
//! - a tile needs at least its Manhattan distance in moves;
//! - two tiles that share their goal row, sit in that row, and are reversed
//!   relative to each other force one of them out of the row and back, two
//!   vertical moves that Manhattan distance does not count. The same holds
//!   for columns with horizontal moves, and the two kinds never overlap.

use std::fmt;
use std::str::FromStr;

use crate::puzzle::Puzzle;

/// Move counts and priorities.
pub type Score = u32;

/// Value read for a state with no recorded score.
pub const INFINITY: Score = Score::MAX;

/// Estimated moves from a board to the goal.
pub type Heuristic = fn(&Puzzle) -> Score;

/// Goal index of a non-blank tile.
fn goal_index(tile: u32) -> usize {
    tile as usize - 1
}

/// Tiles (blank excluded) that are not in their goal cell.
pub fn misplaced_tiles(puzzle: &Puzzle) -> Score {
    puzzle
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(i, &t)| t != 0 && goal_index(t) != i)
        .count() as Score
}

/// Sum over tiles of the grid distance to their goal cell.
pub fn manhattan_distance(puzzle: &Puzzle) -> Score {
    let size = puzzle.size();
    puzzle
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t != 0)
        .map(|(i, &t)| {
            let goal = goal_index(t);
            let (x, y) = (i % size, i / size);
            let (gx, gy) = (goal % size, goal / size);
            (x.abs_diff(gx) + y.abs_diff(gy)) as Score
        })
        .sum()
}

/// Manhattan distance plus two moves per tile that has to step out of its
/// goal row or column to let another tile past.
pub fn linear_conflict(puzzle: &Puzzle) -> Score {
    let size = puzzle.size();
    let tiles = puzzle.tiles();
    let mut extra = 0;
    let mut line = Vec::with_capacity(size);

    for row in 0..size {
        line.clear();
        for col in 0..size {
            let t = tiles[row * size + col];
            if t != 0 && goal_index(t) / size == row {
                line.push(goal_index(t) % size);
            }
        }
        extra += line.len() - longest_increasing(&line);
    }

    for col in 0..size {
        line.clear();
        for row in 0..size {
            let t = tiles[row * size + col];
            if t != 0 && goal_index(t) % size == col {
                line.push(goal_index(t) / size);
            }
        }
        extra += line.len() - longest_increasing(&line);
    }

    manhattan_distance(puzzle) + 2 * extra as Score
}

/// Length of the longest strictly increasing subsequence.
fn longest_increasing(values: &[usize]) -> usize {
    let mut tails: Vec<usize> = Vec::with_capacity(values.len());
    for &v in values {
        let at = tails.partition_point(|&t| t < v);
        if at == tails.len() {
            tails.push(v);
        } else {
            tails[at] = v;
        }
    }
    tails.len()
}

/// Named choice of the built-in heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeuristicKind {
    Misplaced,
    #[default]
    Manhattan,
    LinearConflict,
}

impl HeuristicKind {
    pub fn function(self) -> Heuristic {
        match self {
            HeuristicKind::Misplaced => misplaced_tiles,
            HeuristicKind::Manhattan => manhattan_distance,
            HeuristicKind::LinearConflict => linear_conflict,
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HeuristicKind::Misplaced => "misplaced",
            HeuristicKind::Manhattan => "manhattan",
            HeuristicKind::LinearConflict => "linear-conflict",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "misplaced" => Ok(HeuristicKind::Misplaced),
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "linear-conflict" | "linear" => Ok(HeuristicKind::LinearConflict),
            other => Err(format!(
                "unknown heuristic {other:?}, expected misplaced, manhattan or linear-conflict"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move;

    fn board(tiles: &[u32]) -> Puzzle {
        Puzzle::from_tiles(tiles.to_vec()).unwrap()
    }

    #[test]
    fn zero_on_goal() {
        for size in 2..=5 {
            let p = Puzzle::new(size);
            assert_eq!(misplaced_tiles(&p), 0);
            assert_eq!(manhattan_distance(&p), 0);
            assert_eq!(linear_conflict(&p), 0);
        }
    }

    #[test]
    fn single_slide() {
        let p = Puzzle::new(3).with_move(Move::Up).unwrap();
        assert_eq!(misplaced_tiles(&p), 1);
        assert_eq!(manhattan_distance(&p), 1);
        assert_eq!(linear_conflict(&p), 1);
    }

    #[test]
    fn row_reversal_counts_conflicts() {
        // 2 and 1 swapped in the top row: each is one cell off, and one of
        // them has to leave the row
        let p = board(&[2, 1, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(manhattan_distance(&p), 2);
        assert_eq!(linear_conflict(&p), 4);

        // 3 2 1: two of the three must leave the row
        let p = board(&[3, 2, 1, 4, 5, 6, 7, 8, 0]);
        assert_eq!(manhattan_distance(&p), 4);
        assert_eq!(linear_conflict(&p), 4 + 2 * 2);
    }

    #[test]
    fn column_conflicts() {
        let p = board(&[4, 2, 3, 1, 5, 6, 7, 8, 0]);
        assert_eq!(manhattan_distance(&p), 2);
        assert_eq!(linear_conflict(&p), 4);
    }

    #[test]
    fn lis_lengths() {
        assert_eq!(longest_increasing(&[]), 0);
        assert_eq!(longest_increasing(&[2, 1, 0]), 1);
        assert_eq!(longest_increasing(&[0, 2, 1, 3]), 3);
    }

    #[test]
    fn parses_names() {
        assert_eq!("Manhattan".parse::<HeuristicKind>(), Ok(HeuristicKind::Manhattan));
        assert_eq!(
            "linear-conflict".parse::<HeuristicKind>(),
            Ok(HeuristicKind::LinearConflict)
        );
        assert!("euclid".parse::<HeuristicKind>().is_err());
        assert_eq!(HeuristicKind::default().to_string(), "manhattan");
    }
}
