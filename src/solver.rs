//! A* search from a scrambled board to the goal.
//!
//! Every edge costs one move, so `g` is the exact move count from the start
//! and, with an admissible heuristic, the first goal state taken from the
//! frontier lies at the end of a shortest path.

use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::containers::{DefaultPuzzleMap, PuzzleMap, PuzzleSet, SortedPuzzleSet, TieBreak};
use crate::error::{PuzzleError, SolveError};
use crate::heuristic::{Heuristic, HeuristicKind, Score, INFINITY};
use crate::puzzle::{Move, Puzzle};

/// The wall clock is only consulted once per this many operations.
const CLOCK_STRIDE: u64 = 256;

/// Limits on a single search. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    pub max_operations: Option<u64>,
    pub max_duration: Option<Duration>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_operations(mut self, operations: u64) -> Self {
        self.max_operations = Some(operations);
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }
}

/// Cooperative cancellation: polled once per loop iteration.
struct BudgetGuard {
    budget: Budget,
    started: Instant,
}

impl BudgetGuard {
    fn new(budget: Budget, started: Instant) -> Self {
        Self { budget, started }
    }

    /// Whether one more expansion would go past the budget, given
    /// `operations` already performed.
    fn exceeded(&self, operations: u64) -> bool {
        if let Some(max) = self.budget.max_operations {
            if operations >= max {
                return true;
            }
        }
        match self.budget.max_duration {
            Some(limit) if operations > 0 && operations % CLOCK_STRIDE == 0 => {
                self.started.elapsed() >= limit
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy)]
pub struct SolverConfig {
    /// Estimate of the remaining moves. Must never overestimate for the
    /// returned path to be optimal.
    pub heuristic: Heuristic,
    pub tie_break: TieBreak,
    pub budget: Budget,
    /// Reject odd-parity boards up front instead of exhausting their half of
    /// the state space.
    pub parity_check: bool,
    /// Emit a progress event every this many operations; 0 disables it.
    pub log_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::default().function(),
            tie_break: TieBreak::default(),
            budget: Budget::unlimited(),
            parity_check: true,
            log_interval: 100_000,
        }
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig")
            .field("tie_break", &self.tie_break)
            .field("budget", &self.budget)
            .field("parity_check", &self.parity_check)
            .field("log_interval", &self.log_interval)
            .finish_non_exhaustive()
    }
}

impl SolverConfig {
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_heuristic_kind(self, kind: HeuristicKind) -> Self {
        self.with_heuristic(kind.function())
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_parity_check(mut self, parity_check: bool) -> Self {
        self.parity_check = parity_check;
        self
    }

    pub fn with_log_interval(mut self, log_interval: u64) -> Self {
        self.log_interval = log_interval;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub operations: u64,
    pub evaluated: usize,
    pub max_frontier: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a shortest move sequence taking `start` to the goal.
    ///
    /// `start` itself is not modified; the search works on a copy.
    #[instrument(skip_all, fields(size = start.size()))]
    pub fn solve(&self, start: &Puzzle) -> Result<Solution, SolveError> {
        let started = Instant::now();
        let start = start.clone();

        if self.config.parity_check && !start.is_solvable() {
            warn!("start board has odd permutation parity");
            return Err(SolveError::Unsolvable);
        }

        let h = self.config.heuristic;
        let guard = BudgetGuard::new(self.config.budget, started);

        let mut closed = PuzzleSet::new();
        let mut open = SortedPuzzleSet::new(self.config.tie_break);
        let mut came_from: PuzzleMap<Move> = PuzzleMap::new();
        let mut g_score: DefaultPuzzleMap<Score> = DefaultPuzzleMap::new(INFINITY);
        let mut f_score: DefaultPuzzleMap<Score> = DefaultPuzzleMap::new(INFINITY);

        g_score.put(&start, 0);
        f_score.put(&start, h(&start));
        debug!(estimate = f_score.get(&start), "search started");
        open.add(start, |p| f_score.get(p));

        let mut stats = SearchStats::default();

        while let Some(current) = open.pop_first() {
            stats.max_frontier = stats.max_frontier.max(open.len() + 1);

            if current.is_solved() {
                let moves = reconstruct_path(&came_from, current)?;
                stats.evaluated = closed.len();
                stats.elapsed = started.elapsed();
                info!(
                    moves = moves.len(),
                    operations = stats.operations,
                    elapsed_ms = stats.elapsed.as_millis() as u64,
                    "solved"
                );
                return Ok(Solution { moves, stats });
            }

            if guard.exceeded(stats.operations) {
                let elapsed = started.elapsed();
                warn!(operations = stats.operations, ?elapsed, "search budget exceeded");
                return Err(SolveError::BudgetExceeded {
                    operations: stats.operations,
                    elapsed,
                });
            }

            closed.add(&current);
            let tentative = g_score.get(&current).saturating_add(1);

            for m in current.valid_moves() {
                let neighbor = current.with_move(m)?;
                if closed.contains(&neighbor) {
                    continue;
                }
                if tentative >= g_score.get(&neighbor) {
                    continue;
                }

                // take it out under its old score before the score moves
                open.remove(&neighbor, |p| f_score.get(p));
                came_from.put(&neighbor, m);
                g_score.put(&neighbor, tentative);
                f_score.put(&neighbor, tentative.saturating_add(h(&neighbor)));
                open.add(neighbor, |p| f_score.get(p));
            }

            stats.operations += 1;
            if self.config.log_interval > 0 && stats.operations % self.config.log_interval == 0 {
                debug!(
                    operations = stats.operations,
                    open = open.len(),
                    closed = closed.len(),
                    depth = tentative - 1,
                    "search progress"
                );
            }
        }

        warn!(evaluated = closed.len(), "frontier exhausted");
        Err(SolveError::Unsolvable)
    }

    /// Runs [`solve`](Self::solve) on a worker thread so the caller is not
    /// blocked. The handle resolves to the same result.
    pub fn spawn(&self, start: Puzzle) -> JoinHandle<Result<Solution, SolveError>> {
        let solver = *self;
        thread::spawn(move || solver.solve(&start))
    }
}

/// Walks predecessor links back from `current` to the start.
///
/// Only the move into each state is recorded: the predecessor is recovered
/// by applying its opposite, the unique inverse of a legal move.
fn reconstruct_path(came_from: &PuzzleMap<Move>, mut current: Puzzle) -> Result<Vec<Move>, PuzzleError> {
    let mut path = Vec::new();
    while let Some(&m) = came_from.get(&current) {
        path.push(m);
        current.apply_move(m.opposite())?;
    }
    path.reverse();
    Ok(path)
}

/// Solves `puzzle` with the default configuration.
pub fn solve(puzzle: &Puzzle) -> Result<Vec<Move>, SolveError> {
    Solver::default().solve(puzzle).map(|s| s.moves)
}
