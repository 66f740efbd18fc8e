//! TTI protocol handling.
//!
//! Implements the board notation and the command parser for the engine's
//! line-oriented TTI (tic-tac-toe interface) protocol.

pub mod notation;
pub mod parser;

pub use notation::{encode_board, parse_board, NotationError};
pub use parser::{parse_command, Command, EngineOption};
