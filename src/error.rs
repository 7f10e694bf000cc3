//! Crate-wide error types.
//!
//! Search itself never raises: [`crate::search::Searcher::search`] always
//! returns a result. Errors surface only at input boundaries (FEN parsing,
//! UCI option parsing, TT resize).

use thiserror::Error;

/// Errors reported back to the host front-end.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid FEN: {0}")]
    Fen(String),

    #[error("invalid UCI move: {0}")]
    UciMove(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {name} out of range: {value}")]
    OptionRange { name: String, value: String },

    #[error("failed to resize transposition table to {0} bytes")]
    Resize(usize),

    #[error("failed to load NNUE network: {0}")]
    Nnue(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
