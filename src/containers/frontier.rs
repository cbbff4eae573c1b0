use rustc_hash::FxHashSet;
use std::fmt;
use std::str::FromStr;

use crate::heuristic::Score;
use crate::puzzle::{Puzzle, PuzzleKey};

/// Order in which states with equal scores leave the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Earliest inserted first.
    #[default]
    Fifo,
    /// Most recently inserted first.
    Lifo,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::Fifo => write!(f, "fifo"),
            TieBreak::Lifo => write!(f, "lifo"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(TieBreak::Fifo),
            "lifo" => Ok(TieBreak::Lifo),
            other => Err(format!("unknown tie break {other:?}, expected fifo or lifo")),
        }
    }
}

/// The open set of the search: states ordered by an external score.
///
/// Scores are not stored. Every call that needs the order takes the scoring
/// function, so a state whose score is about to change must be
/// [`remove`](Self::remove)d under its old score and re-[`add`](Self::add)ed
/// after the update.
///
/// The backing vector is sorted by descending score so that the minimum sits
/// at the tail and can be taken in constant time. A hash index of canonical
/// keys answers [`contains`](Self::contains).
#[derive(Debug, Clone, Default)]
pub struct SortedPuzzleSet {
    puzzles: Vec<Puzzle>,
    index: FxHashSet<PuzzleKey>,
    tie_break: TieBreak,
}

impl SortedPuzzleSet {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            ..Self::default()
        }
    }

    pub fn contains(&self, p: &Puzzle) -> bool {
        self.index.contains(&p.key())
    }

    /// Inserts `p` at the position its current score dictates. Returns
    /// `false`, leaving the set untouched, if an equal state is present.
    pub fn add<F>(&mut self, p: Puzzle, score: F) -> bool
    where
        F: Fn(&Puzzle) -> Score,
    {
        if !self.index.insert(p.key()) {
            return false;
        }
        let s = score(&p);
        let at = match self.tie_break {
            // in front of its equals, so it leaves after them
            TieBreak::Fifo => self.puzzles.partition_point(|q| score(q) > s),
            TieBreak::Lifo => self.puzzles.partition_point(|q| score(q) >= s),
        };
        self.puzzles.insert(at, p);
        true
    }

    /// The lowest-scored state.
    pub fn first(&self) -> Option<&Puzzle> {
        self.puzzles.last()
    }

    pub fn pop_first(&mut self) -> Option<Puzzle> {
        let p = self.puzzles.pop()?;
        self.index.remove(&p.key());
        Some(p)
    }

    /// Removes the state equal to `p`. Returns `false` if it was absent.
    pub fn remove<F>(&mut self, p: &Puzzle, score: F) -> bool
    where
        F: Fn(&Puzzle) -> Score,
    {
        let key = p.key();
        if !self.index.contains(&key) {
            return false;
        }
        match self.position(p, &score) {
            Some(i) => {
                self.puzzles.remove(i);
                self.index.remove(&key);
                true
            }
            None => false,
        }
    }

    fn position<F>(&self, p: &Puzzle, score: &F) -> Option<usize>
    where
        F: Fn(&Puzzle) -> Score,
    {
        let s = score(p);
        let lo = self.puzzles.partition_point(|q| score(q) > s);
        let hi = lo + self.puzzles[lo..].partition_point(|q| score(q) >= s);
        if let Some(i) = (lo..hi).find(|&i| &self.puzzles[i] == p) {
            return Some(i);
        }

        // The score no longer matches where the state was filed. Walk outward
        // from the nominal slot in both directions until it turns up.
        let n = self.puzzles.len();
        let (mut left, mut right) = (lo, hi);
        while left > 0 || right < n {
            if right < n {
                if &self.puzzles[right] == p {
                    return Some(right);
                }
                right += 1;
            }
            if left > 0 {
                left -= 1;
                if &self.puzzles[left] == p {
                    return Some(left);
                }
            }
        }
        None
    }

    /// States from lowest to highest score.
    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}
