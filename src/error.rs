//! Error types for the CFG parser.

use thiserror::Error;

/// Distinguishes the two kinds of SLR(1) table conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::ShiftReduce => write!(f, "shift/reduce"),
            ConflictKind::ReduceReduce => write!(f, "reduce/reduce"),
        }
    }
}

/// Errors that can occur while parsing, analyzing, or driving a grammar.
///
/// Covers the four error kinds construction/parsing can raise, plus the
/// `Io` variant needed by the CLI's file/stdin reading.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("malformed rule: {0}")]
    MalformedRule(String),

    #[error("empty grammar input")]
    EmptyInput,

    #[error("grammar is not LL(1): conflict at M[{nonterminal}, {terminal}]:\n  {prod1}\n  {prod2}")]
    GrammarNotLl1 {
        nonterminal: String,
        terminal: String,
        prod1: String,
        prod2: String,
    },

    #[error("grammar is not SLR(1): {kind} conflict at state {state}, symbol {symbol}:\n  {existing}\n  {new}")]
    GrammarNotSlr {
        kind: ConflictKind,
        state: usize,
        symbol: String,
        existing: String,
        new: String,
    },

    #[error("not in language: in state {state}, got {token}")]
    NotInLanguage { state: String, token: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
