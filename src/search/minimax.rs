//! Exhaustive minimax search.
//!
//! X maximizes and O minimizes the utility of the final board. The search
//! visits every reachable position below the root with no pruning and no
//! depth limit; the 3x3 game tree is at most nine plies deep, so every call
//! terminates.
//!
//! Equal-valued children are broken randomly. Under [`TieBreak::CoinFlip`]
//! each tie replaces the current best on an independent fair coin, so the
//! outcome depends on enumeration order: of k tied children the last wins
//! with probability 1/2 and the first with 1/2^(k-1). Under
//! [`TieBreak::Uniform`] the k-th tied child replaces the best with
//! probability 1/k, which leaves every tied child equally likely.

use std::io::Write;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::board::{Board, Mark};
use crate::eval::evaluate;
use crate::movegen::children;

/// Starting best-so-far for the maximizing ply. Below every real utility.
pub const MIN_UTILITY: i32 = -100;
/// Starting best-so-far for the minimizing ply. Above every real utility.
pub const MAX_UTILITY: i32 = 100;

/// Which extreme a ply selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// X's ply: keep the highest utility.
    Maximize,
    /// O's ply: keep the lowest utility.
    Minimize,
}

impl Polarity {
    /// Returns the polarity of the ply where `mover` is to move.
    pub const fn for_mover(mover: Mark) -> Polarity {
        match mover {
            Mark::X => Polarity::Maximize,
            Mark::O => Polarity::Minimize,
        }
    }

    /// Returns the mark placed on this ply.
    pub const fn mover(self) -> Mark {
        match self {
            Polarity::Maximize => Mark::X,
            Polarity::Minimize => Mark::O,
        }
    }

    pub const fn opposite(self) -> Polarity {
        match self {
            Polarity::Maximize => Polarity::Minimize,
            Polarity::Minimize => Polarity::Maximize,
        }
    }

    const fn seed(self) -> i32 {
        match self {
            Polarity::Maximize => MIN_UTILITY,
            Polarity::Minimize => MAX_UTILITY,
        }
    }

    /// Strict improvement test; ties go through the tie-break.
    const fn improves(self, candidate: i32, best: i32) -> bool {
        match self {
            Polarity::Maximize => candidate > best,
            Polarity::Minimize => candidate < best,
        }
    }
}

/// How to choose among children with equal utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TieBreak {
    /// Replace the current best with probability 1/2 on every tie.
    #[default]
    CoinFlip,
    /// Replace the current best with probability 1/k on the k-th tie.
    Uniform,
}

impl TieBreak {
    /// Returns the option value used by `setoption` and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            TieBreak::CoinFlip => "coinflip",
            TieBreak::Uniform => "uniform",
        }
    }

    /// Parses an option value, ignoring case.
    pub fn from_name(s: &str) -> Option<TieBreak> {
        match s.to_ascii_lowercase().as_str() {
            "coinflip" => Some(TieBreak::CoinFlip),
            "uniform" => Some(TieBreak::Uniform),
            _ => None,
        }
    }
}

/// Outcome of searching one node.
///
/// `child` and `cell` are `None` exactly when the node was terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub child: Option<Board>,
    pub cell: Option<usize>,
    pub utility: i32,
}

impl SearchResult {
    const fn terminal(utility: i32) -> SearchResult {
        SearchResult {
            child: None,
            cell: None,
            utility,
        }
    }
}

/// Search statistics returned alongside the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub result: SearchResult,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// Errors from the move-picking entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The board is already won or full, so there is no move to pick.
    #[error("no legal move on decided board '{0}'")]
    InvalidState(Board),
}

struct Minimax<'a, R: Rng> {
    rng: &'a mut R,
    tie_break: TieBreak,
    nodes: u64,
}

impl<R: Rng> Minimax<'_, R> {
    fn visit(&mut self, board: &Board, polarity: Polarity) -> SearchResult {
        self.nodes += 1;

        let outcome = evaluate(board);
        if outcome.terminal {
            return SearchResult::terminal(outcome.value);
        }

        let mut best = SearchResult::terminal(polarity.seed());
        let mut ties = 0u32;

        for (child, cell) in children(board, polarity.mover()) {
            let utility = self.visit(&child, polarity.opposite()).utility;
            let take = if polarity.improves(utility, best.utility) {
                ties = 1;
                true
            } else if utility == best.utility {
                ties += 1;
                self.replace_on_tie(ties)
            } else {
                false
            };
            if take {
                best = SearchResult {
                    child: Some(child),
                    cell: Some(cell),
                    utility,
                };
            }
        }

        best
    }

    /// `ties` counts the current best plus every equal child seen so far.
    fn replace_on_tie(&mut self, ties: u32) -> bool {
        match self.tie_break {
            TieBreak::CoinFlip => self.rng.gen_bool(0.5),
            TieBreak::Uniform => self.rng.gen_range(0..ties) == 0,
        }
    }
}

/// Runs a full minimax search from `board` with the given ply polarity.
pub fn minimax(
    board: &Board,
    polarity: Polarity,
    rng: &mut impl Rng,
    tie_break: TieBreak,
) -> SearchResult {
    let mut searcher = Minimax {
        rng,
        tie_break,
        nodes: 0,
    };
    searcher.visit(board, polarity)
}

/// Searches for `mover` and emits a single `info` line to `out`.
pub fn search<W: Write>(
    board: &Board,
    mover: Mark,
    rng: &mut impl Rng,
    tie_break: TieBreak,
    out: &mut W,
) -> SearchReport {
    let start = Instant::now();
    let mut searcher = Minimax {
        rng,
        tie_break,
        nodes: 0,
    };
    let result = searcher.visit(board, Polarity::for_mover(mover));
    let elapsed_ms = start.elapsed().as_millis() as u64;

    writeln!(
        out,
        "info nodes {} score {} time {}",
        searcher.nodes, result.utility, elapsed_ms
    )
    .unwrap();
    debug!(
        board = %board,
        mover = %mover,
        cell = ?result.cell,
        utility = result.utility,
        nodes = searcher.nodes,
        "search complete"
    );

    SearchReport {
        result,
        nodes: searcher.nodes,
        elapsed_ms,
    }
}

/// Picks the optimal cell for `mover` with a caller-supplied rng and tie-break.
pub fn pick_move_with(
    board: &Board,
    mover: Mark,
    rng: &mut impl Rng,
    tie_break: TieBreak,
) -> Result<usize, SearchError> {
    minimax(board, Polarity::for_mover(mover), rng, tie_break)
        .cell
        .ok_or(SearchError::InvalidState(*board))
}

/// Picks the optimal cell for `mover`, breaking ties with fresh entropy.
///
/// Fails with [`SearchError::InvalidState`] on a board that is already won
/// or full; check [`evaluate`] first.
pub fn pick_move(board: &Board, mover: Mark) -> Result<usize, SearchError> {
    let mut rng = SmallRng::from_entropy();
    pick_move_with(board, mover, &mut rng, TieBreak::CoinFlip)
}
