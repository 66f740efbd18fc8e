//! Board representation and game-state types.
//!
//! Contains the player marks, the immutable 3x3 board, and the fixed set
//! of winning lines.

pub mod mark;
pub mod state;

pub use mark::Mark;
pub use state::{Board, CELL_COUNT, WIN_LINES};
