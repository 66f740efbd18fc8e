//! Engine state management.
//!
//! Holds the current game, engine options and the tie-break rng, and
//! answers the TTI commands that need engine state (`go`, `eval`,
//! `position`, `setoption`).

use std::io::Write;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::board::Mark;
use crate::eval::evaluate;
use crate::game::{Game, GameError};
use crate::protocol::notation::{parse_board, NotationError};
use crate::protocol::parser::EngineOption;
use crate::search::{search, TieBreak};

/// Errors from `position` commands.
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("invalid board: {0}")]
    Notation(#[from] NotationError),

    #[error("illegal move in move list: {0}")]
    Move(#[from] GameError),
}

/// Engine options settable through `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    pub tie_break: TieBreak,
    /// Rng seed for tie-breaking; 0 means fresh entropy.
    pub seed: u64,
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub game: Option<Game>,
    pub options: EngineOptions,
    rng: SmallRng,
}

impl Engine {
    /// Creates a new engine with no position and default options.
    pub fn new() -> Self {
        Engine {
            game: None,
            options: EngineOptions::default(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Resets the position for a new game. Options are kept.
    pub fn new_game(&mut self) {
        self.game = None;
    }

    /// Sets the current position from board notation, an optional mover,
    /// and a list of cells played from there.
    ///
    /// On error the previous position is kept.
    pub fn set_position(
        &mut self,
        board: &str,
        mover: Option<Mark>,
        moves: &[usize],
    ) -> Result<(), PositionError> {
        let board = parse_board(board)?;
        let mover = mover.unwrap_or_else(|| board.inferred_mover());
        let mut game = Game::from_position(board, mover);
        for &cell in moves {
            game.play(cell)?;
        }
        self.game = Some(game);
        Ok(())
    }

    /// Applies a parsed engine option.
    pub fn set_option(&mut self, option: EngineOption) {
        match option {
            EngineOption::TieBreak(tie_break) => self.options.tie_break = tie_break,
            EngineOption::Seed(seed) => {
                self.options.seed = seed;
                self.rng = if seed != 0 {
                    SmallRng::seed_from_u64(seed)
                } else {
                    SmallRng::from_entropy()
                };
            }
        }
        debug!(?option, "option set");
    }

    /// Handles the TTI handshake: writes id, options, protocol_version, and ttiok.
    pub fn handle_tti<W: Write>(&self, out: &mut W) {
        writeln!(out, "id name catsgame").unwrap();
        writeln!(out, "id author catsgame").unwrap();
        writeln!(
            out,
            "option name TieBreak type combo default {} var coinflip var uniform",
            TieBreak::default().name()
        )
        .unwrap();
        writeln!(out, "option name Seed type spin default 0 min 0").unwrap();
        writeln!(out, "protocol_version 1").unwrap();
        writeln!(out, "ttiok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) {
        writeln!(out, "readyok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `go` command: searches the current position for the side
    /// to move and writes `bestmove <cell>`, or `bestmove none` if the game
    /// is already decided.
    pub fn handle_go<W: Write>(&mut self, out: &mut W) {
        let game = match &self.game {
            Some(g) => g,
            None => {
                warn!("go: no position set");
                return;
            }
        };

        if game.is_over() {
            info!(board = %game.board(), "go: position is terminal");
            writeln!(out, "bestmove none").unwrap();
            out.flush().unwrap();
            return;
        }

        let report = search(
            game.board(),
            game.to_move(),
            &mut self.rng,
            self.options.tie_break,
            out,
        );
        match report.result.cell {
            Some(cell) => writeln!(out, "bestmove {}", cell).unwrap(),
            None => writeln!(out, "bestmove none").unwrap(),
        }
        out.flush().unwrap();
    }

    /// Handles the `eval` command.
    pub fn handle_eval<W: Write>(&self, out: &mut W) {
        let game = match &self.game {
            Some(g) => g,
            None => {
                warn!("eval: no position set");
                return;
            }
        };

        let outcome = evaluate(game.board());
        if outcome.terminal {
            writeln!(out, "outcome terminal {}", outcome.value).unwrap();
        } else {
            writeln!(out, "outcome open {}", outcome.value).unwrap();
        }
        out.flush().unwrap();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of<F: FnOnce(&mut Vec<u8>)>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn new_engine_has_no_state() {
        let engine = Engine::new();
        assert!(engine.game.is_none());
        assert_eq!(engine.options, EngineOptions::default());
    }

    #[test]
    fn new_game_resets_position_but_keeps_options() {
        let mut engine = Engine::new();
        engine.set_option(EngineOption::TieBreak(TieBreak::Uniform));
        engine.set_position(".........", None, &[]).unwrap();
        engine.new_game();
        assert!(engine.game.is_none());
        assert_eq!(engine.options.tie_break, TieBreak::Uniform);
    }

    #[test]
    fn set_position_infers_mover_and_applies_moves() {
        let mut engine = Engine::new();
        engine.set_position("X........", None, &[4, 8]).unwrap();
        let game = engine.game.as_ref().unwrap();
        assert_eq!(game.board().to_string(), "X...O...X");
        assert_eq!(game.to_move(), Mark::O);
    }

    #[test]
    fn set_position_invalid_board_keeps_previous() {
        let mut engine = Engine::new();
        engine.set_position("X........", None, &[]).unwrap();
        let err = engine.set_position("garbage", None, &[]).unwrap_err();
        assert!(matches!(err, PositionError::Notation(_)));
        assert_eq!(engine.game.as_ref().unwrap().board().to_string(), "X........");
    }

    #[test]
    fn set_position_illegal_move_is_rejected() {
        let mut engine = Engine::new();
        let err = engine.set_position("X........", None, &[0]).unwrap_err();
        assert!(matches!(
            err,
            PositionError::Move(GameError::CellOccupied(0))
        ));
        assert!(engine.game.is_none());
    }

    #[test]
    fn set_option_updates_options() {
        let mut engine = Engine::new();
        engine.set_option(EngineOption::TieBreak(TieBreak::Uniform));
        engine.set_option(EngineOption::Seed(42));
        assert_eq!(engine.options.tie_break, TieBreak::Uniform);
        assert_eq!(engine.options.seed, 42);

        engine.set_option(EngineOption::Seed(0));
        assert_eq!(engine.options.seed, 0);
        assert_eq!(engine.options.tie_break, TieBreak::Uniform);
    }

    #[test]
    fn handle_go_outputs_winning_bestmove() {
        let mut engine = Engine::new();
        engine.set_position("XX.OO....", Some(Mark::X), &[]).unwrap();
        let text = output_of(|out| engine.handle_go(out));
        assert!(text.contains("info nodes "), "got: {}", text);
        assert_eq!(text.lines().last(), Some("bestmove 2"));
    }

    #[test]
    fn handle_go_blocks_for_o() {
        let mut engine = Engine::new();
        engine.set_position("XX..O....", None, &[]).unwrap();
        let text = output_of(|out| engine.handle_go(out));
        assert_eq!(text.lines().last(), Some("bestmove 2"));
    }

    #[test]
    fn handle_go_on_terminal_position() {
        let mut engine = Engine::new();
        engine.set_position("XXXOO....", None, &[]).unwrap();
        let text = output_of(|out| engine.handle_go(out));
        assert_eq!(text.trim(), "bestmove none");
    }

    #[test]
    fn handle_go_without_position_is_silent() {
        let mut engine = Engine::new();
        let text = output_of(|out| engine.handle_go(out));
        assert!(text.is_empty());
    }

    #[test]
    fn handle_eval_reports_outcome() {
        let mut engine = Engine::new();
        engine.set_position("OOOXX.X..", None, &[]).unwrap();
        let text = output_of(|out| engine.handle_eval(out));
        assert_eq!(text.trim(), "outcome terminal -10");

        engine.set_position(".........", None, &[]).unwrap();
        let text = output_of(|out| engine.handle_eval(out));
        assert_eq!(text.trim(), "outcome open 0");
    }

    #[test]
    fn seeded_engines_agree() {
        let mut a = Engine::new();
        let mut b = Engine::new();
        for engine in [&mut a, &mut b] {
            engine.set_option(EngineOption::Seed(7));
            engine.set_position(".........", None, &[]).unwrap();
        }
        let last = |text: String| text.lines().last().map(str::to_string);
        let first = last(output_of(|out| a.handle_go(out)));
        let second = last(output_of(|out| b.handle_go(out)));
        assert_eq!(first, second);
    }

    #[test]
    fn handle_tti_outputs_handshake() {
        let engine = Engine::new();
        let text = output_of(|out| engine.handle_tti(out));
        assert!(text.contains("id name catsgame"));
        assert!(text.contains("option name TieBreak"));
        assert!(text.contains("protocol_version 1"));
        assert_eq!(text.lines().last(), Some("ttiok"));
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::new();
        let text = output_of(|out| engine.handle_isready(out));
        assert_eq!(text.trim(), "readyok");
    }
}
