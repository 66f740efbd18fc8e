//! Search and planning.
//!
//! Finds the game-theoretically optimal move by exhaustive minimax over
//! the remaining game tree.

pub mod minimax;

pub use minimax::{
    minimax, pick_move, pick_move_with, search, Polarity, SearchError, SearchReport,
    SearchResult, TieBreak, MAX_UTILITY, MIN_UTILITY,
};
