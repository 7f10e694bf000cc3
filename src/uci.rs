//! Minimal UCI front end: a thin line-oriented shim around
//! [`crate::search::Searcher`]. Parses `position`/`go`/`setoption`/`stop`,
//! runs the search on a background thread so `stop` keeps working while a
//! search is in flight, and prints `info`/`bestmove` lines.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::warn;

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::eval::Evaluator;
use crate::search::{SearchInfo, Searcher, TimeAllotment, TimeControl};
use crate::types::STARTING_FEN;

const ENGINE_NAME: &str = "illumine";
const ENGINE_AUTHOR: &str = "the illumine contributors";

/// A UCI option's declared type and bounds, used both to print the `uci`
/// handshake's `option` lines and to validate `setoption` values.
#[derive(Clone, Debug)]
pub enum UciOptionKind {
    Spin { default: i64, min: i64, max: i64 },
    Check { default: bool },
    String { default: String },
    Combo { default: String, choices: Vec<String> },
    Button,
}

impl UciOptionKind {
    fn describe(&self, name: &str) -> String {
        match self {
            UciOptionKind::Spin { default, min, max } => {
                format!("option name {name} type spin default {default} min {min} max {max}")
            }
            UciOptionKind::Check { default } => format!("option name {name} type check default {default}"),
            UciOptionKind::String { default } => format!("option name {name} type string default {default}"),
            UciOptionKind::Combo { default, choices } => {
                let vars: String = choices.iter().map(|c| format!(" var {c}")).collect();
                format!("option name {name} type combo default {default}{vars}")
            }
            UciOptionKind::Button => format!("option name {name} type button"),
        }
    }
}

/// The typed configuration the engine actually runs with, built by
/// validating `setoption` values against [`option_registry`].
#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub threads: usize,
    pub hash_mb: usize,
    pub move_overhead_ms: u64,
    pub eval_file: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings { threads: 1, hash_mb: crate::search::DEFAULT_TT_MB, move_overhead_ms: 50, eval_file: None }
    }
}

/// Every option this engine exposes over UCI, in the order `uci` prints
/// them.
#[must_use]
pub fn option_registry() -> Vec<(&'static str, UciOptionKind)> {
    vec![
        ("Threads", UciOptionKind::Spin { default: 1, min: 1, max: 256 }),
        ("Hash", UciOptionKind::Spin { default: crate::search::DEFAULT_TT_MB as i64, min: 1, max: 1 << 20 }),
        ("Move Overhead", UciOptionKind::Spin { default: 50, min: 0, max: 5000 }),
        ("EvalFile", UciOptionKind::String { default: String::new() }),
        ("Clear Hash", UciOptionKind::Button),
    ]
}

impl EngineSettings {
    /// Validates and applies one `setoption name <name> value <value>` pair.
    pub fn apply(&mut self, name: &str, value: &str) -> EngineResult<()> {
        let registry = option_registry();
        let (_, kind) = registry
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownOption(name.to_string()))?;

        match kind {
            UciOptionKind::Spin { min, max, .. } => {
                let parsed: i64 = value
                    .parse()
                    .map_err(|_| EngineError::OptionRange { name: name.to_string(), value: value.to_string() })?;
                if parsed < *min || parsed > *max {
                    return Err(EngineError::OptionRange { name: name.to_string(), value: value.to_string() });
                }
                match name.to_ascii_lowercase().as_str() {
                    "threads" => self.threads = parsed as usize,
                    "hash" => self.hash_mb = parsed as usize,
                    "move overhead" => self.move_overhead_ms = parsed as u64,
                    _ => {}
                }
            }
            UciOptionKind::String { .. } => {
                if name.eq_ignore_ascii_case("evalfile") {
                    self.eval_file = if value.is_empty() || value == "<empty>" { None } else { Some(PathBuf::from(value)) };
                }
            }
            UciOptionKind::Button | UciOptionKind::Check { .. } | UciOptionKind::Combo { .. } => {}
        }
        Ok(())
    }
}

fn build_searcher(settings: &EngineSettings) -> Arc<Searcher> {
    let evaluator = match Evaluator::load(settings.eval_file.as_deref()) {
        Ok(e) => e,
        Err(e) => {
            warn!("{e}; search will be unavailable until a valid EvalFile is set");
            Evaluator::placeholder()
        }
    };
    Arc::new(Searcher::new(evaluator, settings.hash_mb, settings.threads))
}

pub fn run_uci_loop() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut board = Board::from_fen(STARTING_FEN);
    let mut settings = EngineSettings::default();
    let mut searcher = build_searcher(&settings);
    let mut search_thread: Option<JoinHandle<()>> = None;

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                for (name, kind) in option_registry() {
                    println!("{}", kind.describe(name));
                }
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                searcher.new_game();
                board = Board::from_fen(STARTING_FEN);
            }
            "setoption" => handle_setoption(&parts, &mut settings, &mut searcher),
            "position" => handle_position(&mut board, &parts),
            "go" if parts.get(1) == Some(&"perft") => {
                let depth = parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(5);
                let (breakdown, total) = crate::perft::perft_divide(&mut board, depth);
                for (mv, nodes) in breakdown {
                    println!("{mv}: {nodes}");
                }
                println!("\nNodes searched: {total}");
            }
            "go" => {
                join_search(&mut search_thread, &searcher);
                let allotment = parse_go(&parts, board.white_to_move(), settings.move_overhead_ms);
                let max_depth = parse_go_depth(&parts).unwrap_or(crate::types::MAX_PLY as u32 - 1);
                let board_for_search = board.clone();
                let searcher_ref = Arc::clone(&searcher);
                search_thread = Some(std::thread::spawn(move || {
                    let result = searcher_ref.search(&board_for_search, max_depth, allotment, print_info);
                    print_bestmove(result.best_move);
                }));
            }
            "bench" => {
                let depth = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(6);
                let result = crate::bench::bench(depth);
                println!(
                    "bench: {} positions, {} nodes, {} ms, {} nps",
                    result.positions, result.total_nodes, result.elapsed_ms, result.nps
                );
            }
            "stop" => join_search(&mut search_thread, &searcher),
            "quit" => {
                join_search(&mut search_thread, &searcher);
                break;
            }
            _ => {}
        }

        let _ = stdout.flush();
    }
}

fn join_search(search_thread: &mut Option<JoinHandle<()>>, searcher: &Searcher) {
    if let Some(handle) = search_thread.take() {
        searcher.stop();
        let _ = handle.join();
    }
}

fn handle_setoption(parts: &[&str], settings: &mut EngineSettings, searcher: &mut Arc<Searcher>) {
    let Some(name_pos) = parts.iter().position(|&s| s == "name") else { return };
    let value_pos = parts.iter().position(|&s| s == "value");
    let name_end = value_pos.unwrap_or(parts.len());
    let name = parts[name_pos + 1..name_end].join(" ");
    let value = value_pos.map(|p| parts[p + 1..].join(" ")).unwrap_or_default();

    if name.eq_ignore_ascii_case("Clear Hash") {
        searcher.clear_tt();
        return;
    }

    if let Err(e) = settings.apply(&name, &value) {
        warn!("{e}");
        return;
    }

    match name.to_ascii_lowercase().as_str() {
        "threads" => searcher.set_threads(settings.threads),
        "hash" => searcher.resize_tt(settings.hash_mb),
        "evalfile" => *searcher = build_searcher(settings),
        _ => {}
    }
}

fn handle_position(board: &mut Board, parts: &[&str]) {
    let mut i = 1;
    if parts.get(i) == Some(&"startpos") {
        *board = Board::from_fen(STARTING_FEN);
        i += 1;
    } else if parts.get(i) == Some(&"fen") {
        let end = parts[i + 1..].iter().position(|&s| s == "moves").map(|p| i + 1 + p).unwrap_or(parts.len());
        let fen = parts[i + 1..end].join(" ");
        *board = Board::from_fen(&fen);
        i = end;
    }

    if parts.get(i) == Some(&"moves") {
        i += 1;
        while i < parts.len() {
            match board.parse_uci_move(parts[i]) {
                Ok(mv) => {
                    board.make_move(mv);
                }
                Err(e) => warn!("{e}"),
            }
            i += 1;
        }
    }
}

fn parse_go_depth(parts: &[&str]) -> Option<u32> {
    parts.iter().position(|&s| s == "depth").and_then(|p| parts.get(p + 1)).and_then(|s| s.parse().ok())
}

fn parse_go(parts: &[&str], white_to_move: bool, move_overhead_ms: u64) -> TimeAllotment {
    let find_u64 = |key: &str| parts.iter().position(|&s| s == key).and_then(|p| parts.get(p + 1)).and_then(|s| s.parse::<u64>().ok());

    if let Some(ms) = find_u64("movetime") {
        return TimeAllotment::Fixed(Duration::from_millis(ms));
    }
    if parts.contains(&"infinite") {
        return TimeAllotment::Infinite;
    }

    let (time_key, inc_key) = if white_to_move { ("wtime", "winc") } else { ("btime", "binc") };
    if let Some(time_ms) = find_u64(time_key) {
        let inc_ms = find_u64(inc_key).unwrap_or(0);
        let moves_to_go = find_u64("movestogo").map(|n| n as u32);
        let _ = move_overhead_ms;
        return TimeAllotment::Clock(TimeControl {
            our_time: Duration::from_millis(time_ms),
            increment: Duration::from_millis(inc_ms),
            moves_to_go,
        });
    }

    TimeAllotment::Infinite
}

fn print_info(info: &SearchInfo) {
    let nps = if info.time.as_secs_f64() > 0.0 { (info.nodes as f64 / info.time.as_secs_f64()) as u64 } else { 0 };
    let pv: String = info.pv.iter().map(|m| m.to_uci(false)).collect::<Vec<_>>().join(" ");
    println!(
        "info depth {} seldepth {} score cp {} nodes {} nps {} time {} pv {}",
        info.depth,
        info.seldepth,
        info.score,
        info.nodes,
        nps,
        info.time.as_millis(),
        pv
    );
}

fn print_bestmove(best_move: crate::types::Move) {
    if best_move.is_null() {
        println!("bestmove 0000");
    } else {
        println!("bestmove {}", best_move.to_uci(false));
    }
}
