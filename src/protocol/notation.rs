//! Board notation.
//!
//! A board is written as nine characters in row-major order: `X` and `O`
//! for marks (either case) and `.`, `-` or `_` for an empty cell. Encoding
//! always produces uppercase marks and `.`.
//!
//! ```text
//! XX.OO....   X X .
//!             O O .
//!             . . .
//! ```

use crate::board::{Board, Mark, CELL_COUNT};

/// Errors that can occur while parsing board notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected 9 cells, got {0}")]
    WrongLength(usize),

    #[error("invalid cell character '{0}' at index {1}")]
    InvalidChar(char, usize),
}

/// Parses a nine-character board string.
pub fn parse_board(s: &str) -> Result<Board, NotationError> {
    let len = s.chars().count();
    if len != CELL_COUNT {
        return Err(NotationError::WrongLength(len));
    }

    let mut cells: [Option<Mark>; CELL_COUNT] = [None; CELL_COUNT];
    for (i, c) in s.chars().enumerate() {
        cells[i] = match c {
            '.' | '-' | '_' => None,
            other => Some(Mark::from_char(other).ok_or(NotationError::InvalidChar(other, i))?),
        };
    }

    Ok(Board::from_cells(cells))
}

/// Encodes a board in canonical notation.
pub fn encode_board(board: &Board) -> String {
    board.to_string()
}
