//! TTI command parser.
//!
//! Parses incoming TTI protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::board::Mark;
use crate::search::TieBreak;

/// An engine option together with its parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOption {
    /// `setoption name TieBreak value coinflip|uniform`
    TieBreak(TieBreak),
    /// `setoption name Seed value <u64>`; 0 reseeds from entropy.
    Seed(u64),
}

/// A parsed front-end-to-engine TTI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the TTI protocol handshake.
    Tti,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> value <x>`.
    SetOption(EngineOption),

    /// Reset engine state for a new game.
    NewGame,

    /// Set the position: `position <board> [x|o] [moves <cell> ...]`.
    Position {
        board: String,
        mover: Option<Mark>,
        moves: Vec<usize>,
    },

    /// Search the current position and reply with `bestmove`.
    Go,

    /// Evaluate the current position and reply with `outcome`.
    Eval,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, _) = tokens.split_first()?;

    match head {
        "tti" => Some(Command::Tti),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "go" => Some(Command::Go),
        "eval" => Some(Command::Eval),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> value <x>` for `TieBreak` and `Seed`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    let [_, "name", name, "value", value] = tokens else {
        warn!("malformed setoption: expected 'setoption name <id> value <x>'");
        return None;
    };

    let option = match *name {
        "TieBreak" => TieBreak::from_name(value).map(EngineOption::TieBreak),
        "Seed" => value.parse().ok().map(EngineOption::Seed),
        other => {
            warn!(option = other, "unknown option");
            return None;
        }
    };
    if option.is_none() {
        warn!(option = *name, value = *value, "invalid option value");
    }
    option.map(Command::SetOption)
}

/// Parses `position <board> [x|o] [moves <cell> ...]`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed position: expected 'position <board> [x|o] [moves <cell> ...]'");
        return None;
    }
    let board = tokens[1].to_string();
    let mut rest = &tokens[2..];

    let mut mover = None;
    if let Some((&side, tail)) = rest.split_first() {
        if side != "moves" {
            match side.chars().next().and_then(Mark::from_char) {
                Some(mark) if side.len() == 1 => mover = Some(mark),
                _ => {
                    warn!(side, "malformed position: side must be 'x' or 'o'");
                    return None;
                }
            }
            rest = tail;
        }
    }

    let mut moves = Vec::new();
    if let Some((&kw, tail)) = rest.split_first() {
        if kw != "moves" {
            warn!(token = kw, "malformed position: expected 'moves'");
            return None;
        }
        for token in tail {
            match token.parse::<usize>() {
                Ok(cell) => moves.push(cell),
                Err(_) => {
                    warn!(token, "invalid move cell");
                    return None;
                }
            }
        }
    }

    Some(Command::Position {
        board,
        mover,
        moves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("tti"), Some(Command::Tti));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("go"), Some(Command::Go));
        assert_eq!(parse_command("eval"), Some(Command::Eval));
        assert_eq!(parse_command("  quit  "), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_setoption_known_options() {
        assert_eq!(
            parse_command("setoption name TieBreak value uniform"),
            Some(Command::SetOption(EngineOption::TieBreak(TieBreak::Uniform)))
        );
        assert_eq!(
            parse_command("setoption name TieBreak value CoinFlip"),
            Some(Command::SetOption(EngineOption::TieBreak(TieBreak::CoinFlip)))
        );
        assert_eq!(
            parse_command("setoption name Seed value 42"),
            Some(Command::SetOption(EngineOption::Seed(42)))
        );
    }

    #[test]
    fn parse_setoption_rejects_unknown_names_and_bad_values() {
        assert_eq!(parse_command("setoption name Threads value 4"), None);
        assert_eq!(parse_command("setoption name TieBreak value random"), None);
        assert_eq!(parse_command("setoption name Seed value -1"), None);
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption TieBreak uniform"), None);
        assert_eq!(parse_command("setoption name Seed"), None);
        assert_eq!(parse_command("setoption name value x"), None);
        assert_eq!(parse_command("setoption name Seed value 1 2"), None);
    }

    #[test]
    fn parse_position_board_only() {
        assert_eq!(
            parse_command("position XX.OO...."),
            Some(Command::Position {
                board: "XX.OO....".to_string(),
                mover: None,
                moves: Vec::new(),
            })
        );
    }

    #[test]
    fn parse_position_with_side_and_moves() {
        assert_eq!(
            parse_command("position ......... o moves 4 0 8"),
            Some(Command::Position {
                board: ".........".to_string(),
                mover: Some(Mark::O),
                moves: vec![4, 0, 8],
            })
        );
    }

    #[test]
    fn parse_position_moves_without_side() {
        assert_eq!(
            parse_command("position ......... moves 4"),
            Some(Command::Position {
                board: ".........".to_string(),
                mover: None,
                moves: vec![4],
            })
        );
    }

    #[test]
    fn parse_position_malformed_returns_none() {
        assert_eq!(parse_command("position"), None);
        assert_eq!(parse_command("position ......... z"), None);
        assert_eq!(parse_command("position ......... x 4"), None);
        assert_eq!(parse_command("position ......... moves four"), None);
    }
}
