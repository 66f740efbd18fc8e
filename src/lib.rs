//! Catsgame engine library.
//!
//! Exposes the board representation, outcome evaluation, move generation,
//! minimax search, game session, TTI protocol, and self-play modules for use
//! by integration tests and the binary entry points.

pub mod board;
pub mod engine;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod search;
pub mod selfplay;

pub use board::{Board, Mark};
pub use eval::{evaluate, Outcome};
pub use search::{pick_move, SearchError};
