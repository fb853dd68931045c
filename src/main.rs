//! Context-Free Grammar Parser
//!
//! A Rust implementation of FIRST/FOLLOW computation, LL(1) predictive
//! parsing, and SLR(1) shift-reduce parsing for context-free grammars.
//!
//! This implementation provides:
//! - Algorithms to compute FIRST and FOLLOW sets
//! - A concrete parse tree shared by both parsing strategies
//! - LL(1) predictive parser (top-down)
//! - SLR(1) parser (bottom-up)
//! - A CLI for grammar analysis and sentence parsing
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

use std::process;

fn main() {
    if let Err(e) = cfg_parser::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
