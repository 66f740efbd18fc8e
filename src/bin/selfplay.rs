//! Self-play game generation CLI.
//!
//! Plays tic-tac-toe games with the engine on both sides and outputs the
//! records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catsgame::search::TieBreak;
use catsgame::selfplay::{self, FirstPlayer, SelfPlayConfig};

#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Play engine-vs-engine games and write JSONL records")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Who opens each game: x, o or random
    #[arg(long, default_value = "random")]
    first: FirstPlayer,

    /// Tie-break among equally good moves: coinflip or uniform
    #[arg(long, default_value = "coinflip", value_parser = parse_tie_break)]
    tie_break: TieBreak,

    /// Opening moves played at random before the search takes over
    #[arg(long, default_value_t = 0)]
    random_openings: usize,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(long)]
    quiet: bool,
}

fn parse_tie_break(s: &str) -> Result<TieBreak, String> {
    TieBreak::from_name(s).ok_or_else(|| format!("expected 'coinflip' or 'uniform', got '{}'", s))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = SelfPlayConfig {
        num_games: args.games,
        first_player: args.first,
        tie_break: args.tie_break,
        random_opening_moves: args.random_openings,
        threads: args.threads,
        seed: args.seed,
        quiet: args.quiet,
    };

    info!(
        games = config.num_games,
        first = config.first_player.name(),
        tie_break = config.tie_break.name(),
        random_openings = config.random_opening_moves,
        threads = config.threads,
        "starting self-play"
    );

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !args.quiet {
        info!(
            "Completed {} games in {:.2}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&games);
    }

    let result = match &args.output {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer)
        }
    };

    match result {
        Ok(()) => {
            if let Some(path) = &args.output {
                info!("Wrote {} games to {}", games.len(), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
