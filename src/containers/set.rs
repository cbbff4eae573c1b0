use rustc_hash::FxHashSet;

use crate::puzzle::{Puzzle, PuzzleKey};

/// Unordered set of states with O(1) average membership checks.
#[derive(Debug, Clone, Default)]
pub struct PuzzleSet {
    keys: FxHashSet<PuzzleKey>,
}

impl PuzzleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, p: &Puzzle) -> bool {
        self.keys.contains(&p.key())
    }

    /// Returns `false` if the state was already present.
    pub fn add(&mut self, p: &Puzzle) -> bool {
        self.keys.insert(p.key())
    }

    /// Returns `false` if the state was absent.
    pub fn remove(&mut self, p: &Puzzle) -> bool {
        self.keys.remove(&p.key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move;

    #[test]
    fn membership_is_by_value() {
        let mut set = PuzzleSet::new();
        let a = Puzzle::new(3).with_move(Move::Up).unwrap();
        let b = Puzzle::from_tiles(vec![1, 2, 3, 4, 5, 0, 7, 8, 6]).unwrap();

        assert!(set.is_empty());
        assert!(set.add(&a));
        assert!(set.contains(&b));
        assert!(!set.add(&b));
        assert_eq!(set.len(), 1);

        assert!(!set.contains(&Puzzle::new(3)));
        assert!(set.remove(&b));
        assert!(!set.remove(&a));
        assert!(set.is_empty());
    }
}
