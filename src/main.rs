use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use slider_astar::{Budget, HeuristicKind, Puzzle, Solver, SolverConfig, TieBreak};

/// Scramble (or read) a sliding puzzle and solve it optimally with A*.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Board side length
    #[arg(long, default_value_t = 3)]
    size: usize,

    /// Explicit start board, row-major, e.g. "1,2,3,4,0,5,7,8,6"
    #[arg(long, conflicts_with_all = ["size", "random"])]
    tiles: Option<Puzzle>,

    /// Random legal moves applied to the goal board
    #[arg(long, default_value_t = 30)]
    shuffle_moves: usize,

    /// Draw a uniformly random solvable board instead of scrambling
    #[arg(long)]
    random: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// misplaced, manhattan or linear-conflict
    #[arg(long, default_value_t = HeuristicKind::Manhattan)]
    heuristic: HeuristicKind,

    /// fifo or lifo among equal priorities
    #[arg(long, default_value_t = TieBreak::Fifo)]
    tie_break: TieBreak,

    #[arg(long)]
    max_operations: Option<u64>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Search odd-parity boards to exhaustion instead of rejecting them
    #[arg(long)]
    no_parity_check: bool,

    /// Print only the move list
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> SolverConfig {
        let mut budget = Budget::unlimited();
        if let Some(ops) = self.max_operations {
            budget = budget.with_max_operations(ops);
        }
        if let Some(ms) = self.timeout_ms {
            budget = budget.with_max_duration(Duration::from_millis(ms));
        }
        SolverConfig::default()
            .with_heuristic_kind(self.heuristic)
            .with_tie_break(self.tie_break)
            .with_budget(budget)
            .with_parity_check(!self.no_parity_check)
    }

    fn start(&self) -> Result<Puzzle> {
        if let Some(tiles) = &self.tiles {
            return Ok(tiles.clone());
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        if self.random {
            return Puzzle::random_solvable(self.size, &mut rng).context("invalid board size");
        }
        let mut puzzle = Puzzle::try_new(self.size).context("invalid board size")?;
        let scramble = puzzle.shuffle(self.shuffle_moves, &mut rng);
        info!(moves = scramble.len(), "scrambled");
        Ok(puzzle)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let start = args.start()?;
    let solver = Solver::new(args.config());

    if !args.quiet {
        println!("{}\n{}", "Start:".bold(), start);
    }

    let solution = solver
        .solve(&start)
        .with_context(|| format!("failed to solve\n{start}"))?;

    if args.quiet {
        let moves: Vec<String> = solution.moves.iter().map(|m| m.to_string()).collect();
        println!("{}", moves.join(" "));
        return Ok(());
    }

    println!(
        "{} {} moves ({} expanded, {} max frontier, {:?})\n",
        "Found optimal solution with".green().bold(),
        solution.len(),
        solution.stats.operations,
        solution.stats.max_frontier,
        solution.stats.elapsed,
    );

    let mut board = start;
    for (i, &m) in solution.moves.iter().enumerate() {
        board.apply_move(m)?;
        println!("{} {}\n{}", format!("{:>3}.", i + 1).dark_grey(), m, board);
    }

    Ok(())
}
