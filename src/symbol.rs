//! Symbol types and utilities for context-free grammars.
//!
//! This module defines the core Symbol type and utility functions for working with
//! grammar symbols (terminals, nonterminals, epsilon, and end marker).

use std::cmp::Ordering;
use std::fmt;

/// Represents a symbol in a context-free grammar.
///
/// Symbols are arbitrary whitespace-free text tokens (`id`, `+`, `while`,
/// ...), not single characters. `Eps` and `End` are reserved markers: they
/// never arise from tokenizing grammar text, so no textual symbol can
/// collide with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal symbol.
    Terminal(String),
    /// A nonterminal symbol.
    Nonterminal(String),
    /// The empty string (ε). Only ever appears inside First sets.
    Eps,
    /// The end-of-input marker ($).
    End,
}

impl Symbol {
    /// Checks if this symbol is a terminal.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks if this symbol is a nonterminal.
    #[inline]
    pub const fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// Checks if this symbol is epsilon (ε).
    #[inline]
    pub const fn is_eps(&self) -> bool {
        matches!(self, Symbol::Eps)
    }

    /// Checks if this symbol is the end marker ($).
    #[inline]
    pub const fn is_end(&self) -> bool {
        matches!(self, Symbol::End)
    }

    /// Returns the text representation of this symbol, if applicable.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Symbol::Terminal(s) | Symbol::Nonterminal(s) => Some(s.as_str()),
            Symbol::Eps | Symbol::End => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(s) | Symbol::Nonterminal(s) => write!(f, "{}", s),
            Symbol::Eps => write!(f, "ε"),
            Symbol::End => write!(f, "$"),
        }
    }
}

/// Custom ordering for symbols, used to give item sets a stable,
/// content-addressed sort key.
///
/// Order: Eps < Terminals < Nonterminals < End
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Symbol::Eps, Symbol::Eps) => Ordering::Equal,
            (Symbol::Eps, _) => Ordering::Less,
            (_, Symbol::Eps) => Ordering::Greater,

            (Symbol::End, Symbol::End) => Ordering::Equal,
            (Symbol::End, _) => Ordering::Greater,
            (_, Symbol::End) => Ordering::Less,

            (Symbol::Terminal(a), Symbol::Terminal(b)) => a.cmp(b),
            (Symbol::Terminal(_), Symbol::Nonterminal(_)) => Ordering::Less,
            (Symbol::Nonterminal(_), Symbol::Terminal(_)) => Ordering::Greater,
            (Symbol::Nonterminal(a), Symbol::Nonterminal(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Splits whitespace-separated text into a token sequence.
///
/// Used to convert a caller-supplied sentence into symbols for a parser
/// driver. Every token produced here is a `Terminal`; whether it is
/// actually a terminal of a given grammar is for the driver to check.
pub fn string_to_symbols(s: &str) -> Vec<Symbol> {
    s.split_whitespace()
        .map(|tok| Symbol::Terminal(tok.to_string()))
        .collect()
}

/// Joins symbols back into a whitespace-separated string.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_symbols() {
        let symbols = string_to_symbols("id + id");
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0], Symbol::Terminal("id".to_string()));
        assert_eq!(symbols[1], Symbol::Terminal("+".to_string()));
    }

    #[test]
    fn test_symbols_to_string() {
        let symbols = vec![
            Symbol::Nonterminal("S".to_string()),
            Symbol::Terminal("a".to_string()),
            Symbol::End,
        ];
        assert_eq!(symbols_to_string(&symbols), "S a $");
    }

    #[test]
    fn test_symbol_ordering() {
        assert!(Symbol::Eps < Symbol::Terminal("a".to_string()));
        assert!(Symbol::Terminal("a".to_string()) < Symbol::Nonterminal("A".to_string()));
        assert!(Symbol::Nonterminal("A".to_string()) < Symbol::End);
    }

    #[test]
    fn test_symbol_equality() {
        assert_eq!(
            Symbol::Terminal("a".to_string()),
            Symbol::Terminal("a".to_string())
        );
        assert_ne!(
            Symbol::Terminal("a".to_string()),
            Symbol::Terminal("b".to_string())
        );
        assert_ne!(
            Symbol::Terminal("a".to_string()),
            Symbol::Nonterminal("a".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::Terminal("id".to_string()).to_string(), "id");
        assert_eq!(Symbol::Eps.to_string(), "ε");
        assert_eq!(Symbol::End.to_string(), "$");
    }
}
