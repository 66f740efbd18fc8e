//! Self-play game generation.
//!
//! Plays complete games with the search choosing moves for both sides and
//! records every move and board. With perfect play on both sides every game
//! is a tie; optional random opening moves make the records more varied.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::mpsc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::board::Mark;
use crate::eval::{evaluate, winner};
use crate::game::{Game, GameError};
use crate::movegen::random_move;
use crate::protocol::notation::encode_board;
use crate::search::TieBreak;

/// Who opens each self-play game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstPlayer {
    X,
    O,
    /// Coin flip per game.
    #[default]
    Random,
}

impl FirstPlayer {
    pub const fn name(self) -> &'static str {
        match self {
            FirstPlayer::X => "x",
            FirstPlayer::O => "o",
            FirstPlayer::Random => "random",
        }
    }
}

impl FromStr for FirstPlayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(FirstPlayer::X),
            "o" => Ok(FirstPlayer::O),
            "random" => Ok(FirstPlayer::Random),
            other => Err(format!("expected 'x', 'o' or 'random', got '{}'", other)),
        }
    }
}

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Who moves first.
    pub first_player: FirstPlayer,
    /// Tie-break used by both sides.
    pub tie_break: TieBreak,
    /// Number of opening moves played at random before the search takes over.
    pub random_opening_moves: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            first_player: FirstPlayer::Random,
            tie_break: TieBreak::CoinFlip,
            random_opening_moves: 0,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// A complete self-play game record, written as one JSONL line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// The mark that opened the game.
    pub first: Mark,
    /// Cells played, in order.
    pub moves: Vec<usize>,
    /// Board notation after each move.
    pub boards: Vec<String>,
    /// The winner, or `None` for a tie.
    pub winner: Option<Mark>,
    /// Final utility from X's perspective.
    pub value: i32,
}

/// Aggregate results over a batch of games.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelfPlaySummary {
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub ties: usize,
    pub avg_moves: f64,
}

/// Returns the rng for game `game_id`: derived from `seed`, or fresh entropy when `seed` is 0.
fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game to completion.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut impl Rng,
) -> Result<GameRecord, GameError> {
    let mut game = match config.first_player {
        FirstPlayer::X => Game::new(Mark::X),
        FirstPlayer::O => Game::new(Mark::O),
        FirstPlayer::Random => Game::with_random_first(rng),
    };

    while !game.is_over() {
        if game.moves().len() < config.random_opening_moves {
            // A non-terminal board always has an empty cell.
            if let Some(cell) = random_move(game.board(), rng) {
                game.play(cell)?;
            }
        } else {
            game.engine_move(rng, config.tie_break)?;
        }
    }

    let board = game.board();
    Ok(GameRecord {
        game_id,
        first: game.first(),
        moves: game.moves().to_vec(),
        boards: game.history()[1..].iter().map(encode_board).collect(),
        winner: winner(board),
        value: evaluate(board).value,
    })
}

/// Runs self-play generation, producing records ordered by game ID.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    });
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs self-play generation, calling `on_game` with each completed game record.
///
/// Parallel runs deliver records in completion order, not game-ID order.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord),
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

fn report_game(config: &SelfPlayConfig, game: &GameRecord, elapsed_ms: u128) {
    if config.quiet {
        return;
    }
    let outcome = match game.winner {
        Some(w) => format!("{} wins", w),
        None => "tie".to_string(),
    };
    info!(
        game = game.game_id + 1,
        of = config.num_games,
        first = %game.first,
        moves = game.moves.len(),
        elapsed_ms = elapsed_ms as u64,
        "{}",
        outcome
    );
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let start = Instant::now();
        let mut rng = game_rng(config.seed, i);
        match play_game(config, i, &mut rng) {
            Ok(game) => {
                report_game(config, &game, start.elapsed().as_millis());
                on_game(game);
            }
            Err(e) => warn!(game = i, error = %e, "self-play game aborted"),
        }
    }
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker threads.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    use rayon::prelude::*;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "failed to build thread pool, playing sequentially");
            run_self_play_sequential(config, on_game);
            return;
        }
    };

    let (tx, rx) = mpsc::channel::<GameRecord>();
    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let start = Instant::now();
                    let mut rng = game_rng(config_clone.seed, i);
                    match play_game(&config_clone, i, &mut rng) {
                        Ok(game) => {
                            report_game(&config_clone, &game, start.elapsed().as_millis());
                            // The receiver outlives every worker.
                            let _ = tx.send(game);
                        }
                        Err(e) => warn!(game = i, error = %e, "self-play game aborted"),
                    }
                });
        });
    });

    for game in rx {
        on_game(game);
    }

    if handle.join().is_err() {
        warn!("self-play worker thread panicked");
    }
}

/// Writes one JSON object per game, newline-separated.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Tallies wins, ties and average game length.
pub fn summarize(games: &[GameRecord]) -> SelfPlaySummary {
    let mut summary = SelfPlaySummary {
        games: games.len(),
        ..Default::default()
    };
    let mut total_moves = 0usize;

    for game in games {
        total_moves += game.moves.len();
        match game.winner {
            Some(Mark::X) => summary.x_wins += 1,
            Some(Mark::O) => summary.o_wins += 1,
            None => summary.ties += 1,
        }
    }

    summary.avg_moves = total_moves as f64 / games.len().max(1) as f64;
    summary
}

/// Logs a summary of self-play results.
pub fn print_summary(games: &[GameRecord]) {
    let s = summarize(games);
    let pct = |n: usize| 100.0 * n as f64 / s.games.max(1) as f64;
    info!("=== Self-Play Summary ===");
    info!("Games: {}", s.games);
    info!("Avg moves/game: {:.1}", s.avg_moves);
    info!("X wins: {} ({:.1}%)", s.x_wins, pct(s.x_wins));
    info!("O wins: {} ({:.1}%)", s.o_wins, pct(s.o_wins));
    info!("Ties: {} ({:.1}%)", s.ties, pct(s.ties));
}
