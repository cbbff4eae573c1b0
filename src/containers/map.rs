use rustc_hash::FxHashMap;

use crate::puzzle::{Puzzle, PuzzleKey};

/// Map from states to values.
#[derive(Debug, Clone)]
pub struct PuzzleMap<T> {
    map: FxHashMap<PuzzleKey, T>,
}

impl<T> Default for PuzzleMap<T> {
    fn default() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }
}

impl<T> PuzzleMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, p: &Puzzle) -> bool {
        self.map.contains_key(&p.key())
    }

    /// Inserts or overwrites the value for `p`.
    pub fn put(&mut self, p: &Puzzle, value: T) {
        self.map.insert(p.key(), value);
    }

    pub fn get(&self, p: &Puzzle) -> Option<&T> {
        self.map.get(&p.key())
    }

    pub fn remove(&mut self, p: &Puzzle) -> Option<T> {
        self.map.remove(&p.key())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A [`PuzzleMap`] whose lookups fall back to a fixed default.
///
/// The default is never stored: [`contains_key`](Self::contains_key) only
/// reports entries written with [`put`](Self::put).
#[derive(Debug, Clone)]
pub struct DefaultPuzzleMap<T> {
    inner: PuzzleMap<T>,
    default: T,
}

impl<T: Copy> DefaultPuzzleMap<T> {
    pub fn new(default: T) -> Self {
        Self {
            inner: PuzzleMap::new(),
            default,
        }
    }

    pub fn default_value(&self) -> T {
        self.default
    }

    pub fn contains_key(&self, p: &Puzzle) -> bool {
        self.inner.contains_key(p)
    }

    pub fn put(&mut self, p: &Puzzle, value: T) {
        self.inner.put(p, value);
    }

    pub fn get(&self, p: &Puzzle) -> T {
        self.inner.get(p).copied().unwrap_or(self.default)
    }

    pub fn remove(&mut self, p: &Puzzle) -> Option<T> {
        self.inner.remove(p)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{Score, INFINITY};
    use crate::puzzle::Move;

    #[test]
    fn put_overwrites() {
        let mut map = PuzzleMap::new();
        let p = Puzzle::new(2);
        assert_eq!(map.get(&p), None);
        map.put(&p, Move::Up);
        map.put(&p.clone(), Move::Left);
        assert_eq!(map.get(&p), Some(&Move::Left));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(&p), Some(Move::Left));
        assert!(map.is_empty());
    }

    #[test]
    fn absent_keys_read_default() {
        let mut scores: DefaultPuzzleMap<Score> = DefaultPuzzleMap::new(INFINITY);
        let start = Puzzle::new(3);
        let next = start.with_move(Move::Left).unwrap();

        assert_eq!(scores.get(&start), INFINITY);
        assert!(!scores.contains_key(&start));

        scores.put(&start, 0);
        assert_eq!(scores.get(&start), 0);
        assert!(scores.contains_key(&start));
        assert_eq!(scores.get(&next), INFINITY);
        assert_eq!(scores.len(), 1);

        assert_eq!(scores.remove(&start), Some(0));
        assert_eq!(scores.get(&start), scores.default_value());
    }
}
