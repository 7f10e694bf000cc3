//! Line-oriented UCI front-end. Thin: parses commands, drives a
//! [`illumine::search::Searcher`], and prints `info`/`bestmove` lines. All
//! real engineering lives in the library crate.

fn main() {
    env_logger::init();
    illumine::uci::run_uci_loop();
}
