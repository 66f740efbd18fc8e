//! Integration tests for the catsgame engine binary.
//!
//! Tests the full TTI protocol session flow by spawning the engine process,
//! sending commands via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_catsgame");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start catsgame");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

fn bestmove(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter_map(|l| l.strip_prefix("bestmove "))
        .collect()
}

#[test]
fn tti_handshake_with_protocol_version() {
    let lines = run_engine(&["tti", "quit"]);

    assert!(lines.iter().any(|l| l == "id name catsgame"));
    assert!(lines.iter().any(|l| l == "protocol_version 1"));
    assert_eq!(lines.last().map(String::as_str), Some("ttiok"));

    let option_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with("option ")).collect();
    assert!(!option_lines.is_empty(), "handshake should declare options");
    for opt in &option_lines {
        assert!(opt.contains("type "), "option line missing type: {}", opt);
    }
}

#[test]
fn isready_response() {
    let lines = run_engine(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn unknown_and_malformed_commands_are_ignored() {
    let lines = run_engine(&[
        "hello",
        "position",
        "position XXXXXXXXXX",
        "setoption name Bogus value 1",
        "isready",
        "quit",
    ]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn go_completes_winning_row() {
    let lines = run_engine(&["position XX.OO.... x", "go", "quit"]);
    assert!(lines.iter().any(|l| l.starts_with("info nodes ")));
    assert_eq!(bestmove(&lines), vec!["2"]);
}

#[test]
fn go_for_o_completes_its_row() {
    let lines = run_engine(&["position OO.XX.... o", "go", "quit"]);
    assert_eq!(bestmove(&lines), vec!["2"]);
}

#[test]
fn go_blocks_after_move_list() {
    let lines = run_engine(&[
        "setoption name TieBreak value uniform",
        "setoption name Seed value 5",
        "position ......... x moves 0 4 1",
        "go",
        "quit",
    ]);
    assert_eq!(bestmove(&lines), vec!["2"]);
}

#[test]
fn go_on_finished_game_reports_none() {
    let lines = run_engine(&["position XXXOO....", "go", "eval", "quit"]);
    assert_eq!(bestmove(&lines), vec!["none"]);
    assert!(lines.contains(&"outcome terminal 10".to_string()));
}

#[test]
fn go_without_position_is_silent() {
    let lines = run_engine(&["go", "newgame", "go", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn full_game_through_protocol_ends_in_tie() {
    // Replay the engine's own choices back into the position, move by move.
    let mut moves: Vec<String> = Vec::new();
    for _ in 0..9 {
        let position = if moves.is_empty() {
            "position ......... x".to_string()
        } else {
            format!("position ......... x moves {}", moves.join(" "))
        };
        let lines = run_engine(&[
            "setoption name Seed value 99",
            &position,
            "go",
            "quit",
        ]);
        let best = bestmove(&lines);
        assert_eq!(best.len(), 1);
        if best[0] == "none" {
            break;
        }
        moves.push(best[0].to_string());
    }
    assert_eq!(moves.len(), 9);

    let final_position = format!("position ......... x moves {}", moves.join(" "));
    let lines = run_engine(&[&final_position, "eval", "quit"]);
    assert_eq!(lines, vec!["outcome terminal 0".to_string()]);
}
