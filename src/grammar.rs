//! Grammar module for context-free grammars.
//!
//! This module provides data structures and parsing logic for working with
//! context-free grammars, including productions and grammar representation.

use crate::error::{GrammarError, Result};
use crate::first_follow::{compute_first_sets, compute_follow_sets, FirstSets, FollowSets};
use crate::symbol::{symbols_to_string, Symbol};
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

/// A production rule in a context-free grammar.
///
/// Represents a rule of the form: LHS → RHS, where LHS is a single
/// nonterminal and RHS is a (possibly empty) sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    /// Left-hand side (always a nonterminal)
    pub lhs: Symbol,
    /// Right-hand side (sequence of symbols, empty means ε)
    pub rhs: Vec<Symbol>,
}

impl Production {
    /// Creates a new production.
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs_str = if self.rhs.is_empty() {
            "ε".to_string()
        } else {
            symbols_to_string(&self.rhs)
        };
        write!(f, "{} -> {}", self.lhs, rhs_str)
    }
}

/// A context-free grammar.
///
/// Holds all productions and the terminal/nonterminal vocabulary inferred
/// from them, plus the First and Follow sets computed eagerly at
/// construction time. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// All productions, in source order; index is the production number.
    productions: Vec<Production>,
    /// All nonterminal symbols.
    nonterminals: HashSet<Symbol>,
    /// All terminal symbols.
    terminals: HashSet<Symbol>,
    /// The start symbol: the lhs of production 0.
    start_symbol: Symbol,
    /// Map from nonterminal to its productions, in source order.
    production_map: HashMap<Symbol, Vec<usize>>,
    /// First(X) for every symbol X, computed eagerly.
    first: FirstSets,
    /// Follow(N) for every nonterminal N, computed eagerly.
    follow: FollowSets,
}

impl Grammar {
    /// Parses a grammar from a sequence of rule lines.
    ///
    /// Each line has the shape `LHS -> ALT1 | ALT2 | ... | ALTk`; each
    /// alternative is a whitespace-separated list of symbols (possibly
    /// empty, meaning ε). `->` and `|` are the only reserved separators.
    /// The start symbol is the lhs of the first production in source order.
    pub fn parse<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut raw_productions: Vec<(String, Vec<String>)> = Vec::new();

        for line in lines {
            let line = line.as_ref();
            trace!("parsing rule line: {line:?}");

            if line.matches("->").count() > 1 {
                warn!("rejecting line with multiple '->': {line:?}");
                return Err(GrammarError::MalformedRule(format!(
                    "more than one '->' in line: {:?}",
                    line
                )));
            }

            let mut parts = line.splitn(2, "->");
            let lhs_part = parts.next().unwrap_or("");
            let rhs_part = match parts.next() {
                Some(rhs) => rhs,
                None => {
                    warn!("rejecting line with no '->': {line:?}");
                    return Err(GrammarError::MalformedRule(format!(
                        "missing '->' in line: {:?}",
                        line
                    )));
                }
            };

            let lhs_str = lhs_part.trim();
            if lhs_str.is_empty() || lhs_str.split_whitespace().count() != 1 {
                warn!("rejecting line with malformed left-hand side: {line:?}");
                return Err(GrammarError::MalformedRule(format!(
                    "left-hand side must be a single token: {:?}",
                    line
                )));
            }

            for alt in rhs_part.split('|') {
                let rhs_tokens: Vec<String> =
                    alt.split_whitespace().map(|t| t.to_string()).collect();
                raw_productions.push((lhs_str.to_string(), rhs_tokens));
            }
        }

        if raw_productions.is_empty() {
            return Err(GrammarError::EmptyInput);
        }

        let nonterminal_names: HashSet<String> =
            raw_productions.iter().map(|(lhs, _)| lhs.clone()).collect();

        let classify = |tok: &str| -> Symbol {
            if nonterminal_names.contains(tok) {
                Symbol::Nonterminal(tok.to_string())
            } else {
                Symbol::Terminal(tok.to_string())
            }
        };

        let start_symbol = Symbol::Nonterminal(raw_productions[0].0.clone());

        let mut productions = Vec::with_capacity(raw_productions.len());
        let mut terminals = HashSet::new();
        for (lhs, rhs_tokens) in &raw_productions {
            let lhs_symbol = Symbol::Nonterminal(lhs.clone());
            let rhs: Vec<Symbol> = rhs_tokens
                .iter()
                .map(|t| {
                    let sym = classify(t);
                    if sym.is_terminal() {
                        terminals.insert(sym.clone());
                    }
                    sym
                })
                .collect();
            productions.push(Production::new(lhs_symbol, rhs));
        }

        let nonterminals: HashSet<Symbol> = nonterminal_names
            .into_iter()
            .map(Symbol::Nonterminal)
            .collect();

        let mut production_map: HashMap<Symbol, Vec<usize>> = HashMap::new();
        for (idx, prod) in productions.iter().enumerate() {
            production_map.entry(prod.lhs.clone()).or_default().push(idx);
        }

        let first = compute_first_sets(&productions, &nonterminals, &terminals);
        let follow = compute_follow_sets(&productions, &nonterminals, &start_symbol, &first);

        debug!(
            "grammar built: {} productions, {} nonterminals, {} terminals, start={start_symbol}",
            productions.len(),
            nonterminals.len(),
            terminals.len()
        );

        Ok(Self {
            productions,
            nonterminals,
            terminals,
            start_symbol,
            production_map,
            first,
            follow,
        })
    }

    /// Returns the productions for a given nonterminal, in source order.
    pub fn productions_for(&self, nt: &Symbol) -> impl Iterator<Item = (usize, &Production)> {
        self.production_map
            .get(nt)
            .into_iter()
            .flatten()
            .map(|&idx| (idx, &self.productions[idx]))
    }

    /// Returns all productions in the grammar, indexed by production number.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Returns the production at the given index.
    pub fn production(&self, idx: usize) -> &Production {
        &self.productions[idx]
    }

    /// Returns all nonterminals in the grammar.
    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    /// Returns all terminals in the grammar.
    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// Returns the start symbol.
    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    /// Returns First(symbol).
    pub fn first(&self, symbol: &Symbol) -> &HashSet<Symbol> {
        static EMPTY: std::sync::OnceLock<HashSet<Symbol>> = std::sync::OnceLock::new();
        self.first
            .get(symbol)
            .unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    /// Returns Follow(nonterminal).
    pub fn follow(&self, nonterminal: &Symbol) -> &HashSet<Symbol> {
        static EMPTY: std::sync::OnceLock<HashSet<Symbol>> = std::sync::OnceLock::new();
        self.follow
            .get(nonterminal)
            .unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    /// Computes First(α) for an arbitrary sequence of symbols.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> HashSet<Symbol> {
        crate::first_follow::first_of_sequence(&self.first, symbols)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}
