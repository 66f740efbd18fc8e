//! Game session tracking.
//!
//! Holds the sequence of boards produced during one game, enforces
//! alternating turns and legal placement, and reports the game status.
//! Moves are validated here so the search itself never sees an illegal
//! position.

use rand::Rng;
use tracing::debug;

use crate::board::{Board, Mark};
use crate::eval::{evaluate, winning_line};
use crate::search::{pick_move_with, SearchError, TieBreak};

/// Errors raised when applying a move to a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cell {0} is out of range (0-8)")]
    CellOutOfRange(usize),

    #[error("cell {0} is already filled")]
    CellOccupied(usize),

    #[error("the game is already over")]
    GameOver,

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress { to_move: Mark },
    Won { winner: Mark, line: [usize; 3] },
    Tied,
}

/// A single game: its starting board, every board since, and whose turn it is.
#[derive(Debug, Clone)]
pub struct Game {
    history: Vec<Board>,
    moves: Vec<usize>,
    first: Mark,
    to_move: Mark,
}

impl Game {
    /// Starts a game on the empty board with `first` to move.
    pub fn new(first: Mark) -> Self {
        Game::from_position(Board::empty(), first)
    }

    /// Starts a game on the empty board with a coin flip deciding who opens.
    pub fn with_random_first(rng: &mut impl Rng) -> Self {
        let first = if rng.gen_bool(0.5) { Mark::X } else { Mark::O };
        Game::new(first)
    }

    /// Starts a game from an arbitrary position.
    pub fn from_position(board: Board, to_move: Mark) -> Self {
        Game {
            history: vec![board],
            moves: Vec::new(),
            first: to_move,
            to_move,
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        // `history` always holds at least the starting board.
        &self.history[self.history.len() - 1]
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// The mark that moved first from the starting board.
    pub fn first(&self) -> Mark {
        self.first
    }

    /// Every board in order, starting with the initial position.
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// Cells played so far, in order.
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    pub fn status(&self) -> GameStatus {
        let board = self.board();
        if let Some(line) = winning_line(board) {
            if let Some(winner) = board.get(line[0]) {
                return GameStatus::Won { winner, line };
            }
        }
        if board.is_full() {
            GameStatus::Tied
        } else {
            GameStatus::InProgress {
                to_move: self.to_move,
            }
        }
    }

    pub fn is_over(&self) -> bool {
        evaluate(self.board()).terminal
    }

    /// Places the current mover's mark at `cell` and passes the turn.
    pub fn play(&mut self, cell: usize) -> Result<Board, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if cell >= crate::board::CELL_COUNT {
            return Err(GameError::CellOutOfRange(cell));
        }
        let next = self
            .board()
            .place(cell, self.to_move)
            .ok_or(GameError::CellOccupied(cell))?;

        debug!(cell, mark = %self.to_move, board = %next, "move played");
        self.history.push(next);
        self.moves.push(cell);
        self.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Lets the search choose and play the current mover's move.
    pub fn engine_move(
        &mut self,
        rng: &mut impl Rng,
        tie_break: TieBreak,
    ) -> Result<usize, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let cell = pick_move_with(self.board(), self.to_move, rng, tie_break)?;
        self.play(cell)?;
        Ok(cell)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Mark::X)
    }
}
