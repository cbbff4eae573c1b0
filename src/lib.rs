//! slider-astar: optimal solver for N×N sliding-tile puzzles.
//!
//! This crate provides:
//! - [`Puzzle`], a board value with move, goal and scramble operations
//! - admissible [`heuristic`]s behind a single function-pointer type
//! - keyed [`containers`] for the open and closed sets of the search
//! - an A* [`Solver`] with an operation/time [`Budget`]
//!
//! Quick start:
//! ```
//! use slider_astar::{solve, Puzzle};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut puzzle = Puzzle::new(3);
//! puzzle.shuffle(20, &mut rng);
//!
//! let moves = solve(&puzzle).unwrap();
//! puzzle.apply_moves(&moves).unwrap();
//! assert!(puzzle.is_solved());
//! ```
//!
//! Tuning the search:
//! ```
//! use std::time::Duration;
//! use slider_astar::{Budget, HeuristicKind, Puzzle, Solver, SolverConfig, TieBreak};
//!
//! let config = SolverConfig::default()
//!     .with_heuristic_kind(HeuristicKind::LinearConflict)
//!     .with_tie_break(TieBreak::Lifo)
//!     .with_budget(Budget::unlimited().with_max_duration(Duration::from_secs(5)));
//! let start: Puzzle = "1 2 3 4 0 5 7 8 6".parse().unwrap();
//! let solution = Solver::new(config).solve(&start).unwrap();
//! assert_eq!(solution.len(), 2);
//! ```
pub mod containers;
pub mod error;
pub mod heuristic;
pub mod puzzle;
pub mod solver;

pub use containers::TieBreak;
pub use error::{PuzzleError, SolveError};
pub use heuristic::{Heuristic, HeuristicKind, Score};
pub use puzzle::{Move, Point, Puzzle, PuzzleKey};
pub use solver::{solve, Budget, SearchStats, Solution, Solver, SolverConfig};
