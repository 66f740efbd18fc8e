//! Position evaluation.
//!
//! Decides whether a board is terminal and scores it from X's perspective:
//! +10 for an X win, -10 for an O win, 0 for a tie or an open position.

pub(crate) mod outcome;

pub use outcome::{evaluate, winner, winning_line, Outcome, LOSS_VALUE, TIE_VALUE, WIN_VALUE};
