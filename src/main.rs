//! Catsgame -- a perfect-play tic-tac-toe engine implementing the TTI protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust.

use std::io::{self, BufRead};

use tracing::warn;
use tracing_subscriber::EnvFilter;

use catsgame::engine::Engine;
use catsgame::protocol::parser::{parse_command, Command};

/// Runs the main TTI protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Tti => {
                engine.handle_tti(&mut out);
            }
            Command::IsReady => {
                engine.handle_isready(&mut out);
            }
            Command::SetOption(option) => {
                engine.set_option(option);
            }
            Command::NewGame => {
                engine.new_game();
            }
            Command::Position {
                board,
                mover,
                moves,
            } => {
                if let Err(e) = engine.set_position(&board, mover, &moves) {
                    warn!(error = %e, "position rejected");
                }
            }
            Command::Go => {
                engine.handle_go(&mut out);
            }
            Command::Eval => {
                engine.handle_eval(&mut out);
            }
            Command::Quit => {
                break;
            }
        }
    }
}
