//! Keyed collections of puzzle states.
//!
//! States are looked up by value through [`PuzzleKey`](crate::puzzle::PuzzleKey),
//! never by identity, so two independently built copies of the same board hit
//! the same entry.

mod frontier;
mod map;
mod set;

pub use frontier::{SortedPuzzleSet, TieBreak};
pub use map::{DefaultPuzzleMap, PuzzleMap};
pub use set::PuzzleSet;
