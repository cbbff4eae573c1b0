use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;
use crate::heuristic::{self, Score};

/// Direction the empty slot travels. The tile on the far side slides the
/// opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Fixed expansion order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Offset of the empty slot as `(dx, dy)`.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (0, -1),
            Move::Left => (-1, 0),
            Move::Down => (0, 1),
            Move::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A cell coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    fn offset(self, m: Move) -> Self {
        let (dx, dy) = m.as_offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Lossless byte encoding of a tile sequence, used as a container key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleKey(Box<[u8]>);

impl PuzzleKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A square sliding-tile board stored as a flattened row-major grid.
///
/// `0` is the empty slot. The solved layout is `tiles[i] == (i + 1) % size²`,
/// i.e. `1, 2, ..., size² - 1` followed by the blank.
#[derive(Debug, Clone)]
pub struct Puzzle {
    size: usize,
    tiles: Vec<u32>,
    // index of tile 0 in `tiles`
    blank: usize,
}

impl PartialEq for Puzzle {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for Puzzle {}

impl std::hash::Hash for Puzzle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.tiles.hash(state);
    }
}

impl Puzzle {
    /// The solved board of the given side length.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`; use [`Puzzle::try_new`] for untrusted input.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "board side must be at least 2");
        Self::goal(size)
    }

    pub fn try_new(size: usize) -> Result<Self, PuzzleError> {
        if size < 2 {
            return Err(PuzzleError::InvalidSize(size));
        }
        Ok(Self::goal(size))
    }

    fn goal(size: usize) -> Self {
        let size_sq = size * size;
        let tiles = (0..size_sq).map(|i| ((i + 1) % size_sq) as u32).collect();
        Self {
            size,
            tiles,
            blank: size_sq - 1,
        }
    }

    /// Builds a board from a flattened tile sequence, checking that it is a
    /// square of side at least 2 holding each of `0..len` exactly once.
    pub fn from_tiles(tiles: Vec<u32>) -> Result<Self, PuzzleError> {
        let len = tiles.len();
        let size = (len as f64).sqrt().round() as usize;
        if size * size != len {
            return Err(PuzzleError::NotSquare(len));
        }
        if size < 2 {
            return Err(PuzzleError::InvalidSize(size));
        }

        let mut seen = vec![false; len];
        for &t in &tiles {
            match seen.get_mut(t as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(PuzzleError::NotPermutation { expected: len }),
            }
        }

        let blank = tiles
            .iter()
            .position(|&t| t == 0)
            .ok_or(PuzzleError::NotFound(0))?;

        Ok(Self { size, tiles, blank })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn size_sq(&self) -> usize {
        self.size * self.size
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn idx_to_coords(&self, i: usize) -> Point {
        Point::new((i % self.size) as isize, (i / self.size) as isize)
    }

    fn index_of(&self, p: Point) -> usize {
        p.y as usize * self.size + p.x as usize
    }

    pub fn check_bounds(&self, p: Point) -> Result<(), PuzzleError> {
        let n = self.size as isize;
        if p.x < 0 || p.x >= n || p.y < 0 || p.y >= n {
            return Err(PuzzleError::out_of_range(p, self.size));
        }
        Ok(())
    }

    pub fn tile_at(&self, p: Point) -> Result<u32, PuzzleError> {
        self.check_bounds(p)?;
        Ok(self.tiles[self.index_of(p)])
    }

    /// Position of the first occurrence of `tile`, found by a linear scan.
    pub fn find_tile(&self, tile: u32) -> Result<Point, PuzzleError> {
        self.tiles
            .iter()
            .position(|&t| t == tile)
            .map(|i| self.idx_to_coords(i))
            .ok_or(PuzzleError::NotFound(tile))
    }

    pub fn blank(&self) -> Point {
        self.idx_to_coords(self.blank)
    }

    pub fn can_move(&self, m: Move) -> bool {
        let p = self.blank();
        let last = self.size as isize - 1;
        match m {
            Move::Up => p.y > 0,
            Move::Left => p.x > 0,
            Move::Down => p.y < last,
            Move::Right => p.x < last,
        }
    }

    /// Legal moves in [`Move::ALL`] order.
    pub fn valid_moves(&self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&m| self.can_move(m))
            .collect()
    }

    pub fn swap_tiles(&mut self, p1: Point, p2: Point) -> Result<(), PuzzleError> {
        self.check_bounds(p1)?;
        self.check_bounds(p2)?;
        let (i, j) = (self.index_of(p1), self.index_of(p2));
        self.tiles.swap(i, j);
        if self.blank == i {
            self.blank = j;
        } else if self.blank == j {
            self.blank = i;
        }
        Ok(())
    }

    /// Slides the empty slot one cell in direction `m`.
    pub fn apply_move(&mut self, m: Move) -> Result<(), PuzzleError> {
        if !self.can_move(m) {
            return Err(PuzzleError::IllegalMove(m));
        }
        let p = self.blank();
        self.swap_tiles(p, p.offset(m))
    }

    /// Applies `moves` in order.
    ///
    /// On the first illegal move this returns the error with every earlier
    /// move already applied; the board is left partially mutated. Work on a
    /// clone when that matters.
    pub fn apply_moves(&mut self, moves: &[Move]) -> Result<(), PuzzleError> {
        for &m in moves {
            self.apply_move(m)?;
        }
        Ok(())
    }

    pub fn with_move(&self, m: Move) -> Result<Self, PuzzleError> {
        let mut next = self.clone();
        next.apply_move(m)?;
        Ok(next)
    }

    pub fn is_solved(&self) -> bool {
        let size_sq = self.size_sq();
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &t)| t as usize == (i + 1) % size_sq)
    }

    /// Number of tiles that sit outside their goal cell.
    ///
    /// The blank is not counted, unlike the variant that scores every cell
    /// differing from the goal layout: with it, a board one slide from the
    /// goal scores 2 and the estimate stops being admissible. So
    /// `[0, 1, 2, 3]` scores 3 here, not 4.
    pub fn solve_heuristic(&self) -> Score {
        heuristic::misplaced_tiles(self)
    }

    pub fn manhattan_distance(&self) -> Score {
        heuristic::manhattan_distance(self)
    }

    pub fn key(&self) -> PuzzleKey {
        let bytes = if self.size_sq() <= 256 {
            self.tiles.iter().map(|&t| t as u8).collect()
        } else {
            self.tiles.iter().flat_map(|t| t.to_le_bytes()).collect()
        };
        PuzzleKey(bytes)
    }

    /// Picks a random legal move that does not undo `last`, applies it and
    /// returns it.
    pub fn scramble_step<R: Rng + ?Sized>(&mut self, last: Option<Move>, rng: &mut R) -> Move {
        let candidates: Vec<Move> = self
            .valid_moves()
            .into_iter()
            .filter(|&m| last.map_or(true, |l| m != l.opposite()))
            .collect();
        // Every cell of a board with side >= 2 has at least two neighbours,
        // so excluding one reversal always leaves a candidate.
        let m = *candidates.choose(rng).unwrap_or(&Move::ALL[0]);
        self.swap_blank(m);
        m
    }

    /// Applies `moves` random legal moves, never immediately reversing the
    /// previous one. Returns the moves made.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, moves: usize, rng: &mut R) -> Vec<Move> {
        let mut made = Vec::with_capacity(moves);
        let mut last = None;
        for _ in 0..moves {
            let m = self.scramble_step(last, rng);
            made.push(m);
            last = Some(m);
        }
        made
    }

    /// Uniformly random board of the given side that can reach the goal.
    pub fn random_solvable<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::try_new(size)?;
        loop {
            puzzle.tiles.shuffle(rng);
            puzzle.blank = puzzle
                .tiles
                .iter()
                .position(|&t| t == 0)
                .ok_or(PuzzleError::NotFound(0))?;
            if puzzle.is_solvable() {
                return Ok(puzzle);
            }
        }
    }

    /// Whether the permutation parity matches the goal's.
    pub fn is_solvable(&self) -> bool {
        let inversions = count_inversions(&self.tiles);
        let empty_row = self.blank / self.size;

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            // the goal has zero inversions and the blank on row size - 1,
            // which is odd for every even side
            (inversions + empty_row) % 2 == 1
        }
    }

    // Only called with moves already known to be legal.
    fn swap_blank(&mut self, m: Move) {
        let target = self.index_of(self.blank().offset(m));
        self.tiles.swap(self.blank, target);
        self.blank = target;
    }
}

fn count_inversions(tiles: &[u32]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.size_sq() - 1).to_string().len().max(1) + 2;
        for (i, &val) in self.tiles.iter().enumerate() {
            if val == 0 {
                write!(f, "{:width$}", "")?;
            } else {
                write!(f, "{:^width$}", val)?;
            }

            if i % self.size == self.size - 1 {
                writeln!(f)?;
            } else {
                write!(f, "|")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Puzzle {
    type Err = PuzzleError;

    /// Parses tiles separated by commas and/or whitespace, row-major.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiles = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<u32>().map_err(|_| PuzzleError::Parse(t.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tiles(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn goal_layout() {
        let p = Puzzle::new(3);
        assert_eq!(p.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(p.is_solved());
        assert_eq!(p.blank(), Point::new(2, 2));
        assert_eq!(p.solve_heuristic(), 0);
    }

    #[test]
    fn two_by_two_fixture() {
        let p = Puzzle::from_tiles(vec![0, 1, 2, 3]).unwrap();
        assert!(!p.is_solved());
        assert_eq!(p.solve_heuristic(), 3);
        // the displaced blank adds nothing
        let one_slide = Puzzle::new(2).with_move(Move::Left).unwrap();
        assert_eq!(one_slide.solve_heuristic(), 1);
        // tile 2 sits diagonally from its goal cell
        assert_eq!(p.manhattan_distance(), 1 + 2 + 1);
        assert!(!p.is_solvable());
        assert!(Puzzle::new(2).is_solvable());
    }

    #[test]
    fn rejects_bad_tiles() {
        assert_eq!(
            Puzzle::from_tiles(vec![1, 2, 0]),
            Err(PuzzleError::NotSquare(3))
        );
        assert_eq!(Puzzle::from_tiles(vec![0]), Err(PuzzleError::InvalidSize(1)));
        assert_eq!(
            Puzzle::from_tiles(vec![1, 1, 2, 0]),
            Err(PuzzleError::NotPermutation { expected: 4 })
        );
        assert_eq!(
            Puzzle::from_tiles(vec![1, 2, 4, 0]),
            Err(PuzzleError::NotPermutation { expected: 4 })
        );
        assert_eq!(Puzzle::try_new(1), Err(PuzzleError::InvalidSize(1)));
    }

    #[test]
    fn tile_access_and_bounds() {
        let p = Puzzle::new(3);
        assert_eq!(p.tile_at(Point::new(1, 0)), Ok(2));
        assert_eq!(p.tile_at(Point::new(0, 1)), Ok(4));
        assert!(p.tile_at(Point::new(3, 0)).unwrap_err().is_out_of_range());
        assert_eq!(
            p.tile_at(Point::new(0, -1)),
            Err(PuzzleError::OutOfRangeY { y: -1, size: 3 })
        );
        assert_eq!(p.find_tile(6), Ok(Point::new(2, 1)));
        assert_eq!(p.find_tile(9), Err(PuzzleError::NotFound(9)));
    }

    #[test]
    fn moves_from_corner() {
        let mut p = Puzzle::new(3);
        assert_eq!(p.valid_moves(), vec![Move::Up, Move::Left]);
        assert_eq!(p.apply_move(Move::Down), Err(PuzzleError::IllegalMove(Move::Down)));

        p.apply_move(Move::Up).unwrap();
        assert_eq!(p.tiles(), &[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        assert_eq!(p.valid_moves(), vec![Move::Up, Move::Left, Move::Down]);
        p.apply_move(Move::Left).unwrap();
        assert_eq!(p.tiles(), &[1, 2, 3, 4, 0, 5, 7, 8, 6]);
        assert_eq!(p.valid_moves(), Move::ALL.to_vec());
    }

    #[test]
    fn apply_moves_stops_at_first_illegal() {
        let mut p = Puzzle::new(3);
        let err = p.apply_moves(&[Move::Up, Move::Right, Move::Left]);
        assert_eq!(err, Err(PuzzleError::IllegalMove(Move::Right)));
        // the first move stays applied
        assert_eq!(p.blank(), Point::new(2, 1));
    }

    #[test]
    fn swap_tracks_blank() {
        let mut p = Puzzle::new(2);
        p.swap_tiles(Point::new(1, 1), Point::new(0, 0)).unwrap();
        assert_eq!(p.tiles(), &[0, 2, 3, 1]);
        assert_eq!(p.blank(), Point::new(0, 0));
        assert_eq!(p.find_tile(0), Ok(p.blank()));
        assert!(p.swap_tiles(Point::new(2, 0), Point::new(0, 0)).is_err());
    }

    #[test]
    fn equality_and_key_follow_tiles() {
        let a = Puzzle::from_tiles(vec![1, 2, 0, 3]).unwrap();
        let b = Puzzle::new(2).with_move(Move::Left).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Puzzle::new(2).key());
        assert_eq!(a.key().as_bytes(), &[1, 2, 0, 3]);
    }

    #[test]
    fn wide_boards_use_wide_keys() {
        let p = Puzzle::new(17);
        assert_eq!(p.key().as_bytes().len(), 17 * 17 * 4);
    }

    #[test]
    fn display_and_parse() {
        let p: Puzzle = "1,2,3 4,5,6 7,0,8".parse().unwrap();
        assert_eq!(p.to_string(), " 1 | 2 | 3 \n 4 | 5 | 6 \n 7 |   | 8 \n");
        assert_eq!(
            "1,2,x,0".parse::<Puzzle>(),
            Err(PuzzleError::Parse("x".to_string()))
        );
    }

    #[test]
    fn shuffle_never_reverses_and_stays_solvable() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in 2..=5 {
            let mut p = Puzzle::new(size);
            let moves = p.shuffle(200, &mut rng);
            assert_eq!(moves.len(), 200);
            assert!(moves.windows(2).all(|w| w[1] != w[0].opposite()));
            assert!(p.is_solvable());

            let mut replay = Puzzle::new(size);
            replay.apply_moves(&moves).unwrap();
            assert_eq!(replay, p);
        }
    }

    #[test]
    fn random_boards_are_solvable() {
        let mut rng = StdRng::seed_from_u64(11);
        for size in [2, 3, 4] {
            let p = Puzzle::random_solvable(size, &mut rng).unwrap();
            assert!(p.is_solvable());
            assert_eq!(p.find_tile(0), Ok(p.blank()));
        }
    }
}
