//! Terminal detection and scoring.

use crate::board::{Board, Mark, WIN_LINES};

/// Utility of a board won by X.
pub const WIN_VALUE: i32 = 10;
/// Utility of a board won by O.
pub const LOSS_VALUE: i32 = -10;
/// Utility of a tie, and the conventional value of an open position.
pub const TIE_VALUE: i32 = 0;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the game has concluded.
    pub terminal: bool,
    /// Utility from X's perspective. Always 0 when not terminal.
    pub value: i32,
}

impl Outcome {
    const OPEN: Outcome = Outcome {
        terminal: false,
        value: TIE_VALUE,
    };
}

/// Returns the first complete line, checking rows, then columns, then diagonals.
pub fn winning_line(board: &Board) -> Option<[usize; 3]> {
    WIN_LINES.iter().copied().find(|&[a, b, c]| {
        board.get(a).is_some() && board.get(a) == board.get(b) && board.get(a) == board.get(c)
    })
}

/// Returns the mark owning a complete line, if any.
pub fn winner(board: &Board) -> Option<Mark> {
    winning_line(board).and_then(|[a, _, _]| board.get(a))
}

/// Evaluates a board: a win for either side or a full board is terminal.
pub fn evaluate(board: &Board) -> Outcome {
    match winner(board) {
        Some(Mark::X) => Outcome {
            terminal: true,
            value: WIN_VALUE,
        },
        Some(Mark::O) => Outcome {
            terminal: true,
            value: LOSS_VALUE,
        },
        None if board.is_full() => Outcome {
            terminal: true,
            value: TIE_VALUE,
        },
        None => Outcome::OPEN,
    }
}
