//! LL(1) predictive parser implementation.
//!
//! This module implements a top-down LL(1) predictive parser using a parse
//! table, following Aho et al. ("Compilers: Principles, Techniques, and
//! Tools", 2nd ed.), Algorithm 4.4 for construction and Algorithm 4.3 for
//! the driver.

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::parse_tree::ParseTree;
use crate::symbol::Symbol;
use crate::Parser;
use log::{debug, trace, warn};
use std::collections::HashMap;

/// LL(1) predictive parser: a grammar plus its parse table.
#[derive(Debug)]
pub struct LL1 {
    grammar: Grammar,
    /// M[nonterminal, terminal/End] = production index.
    table: HashMap<(Symbol, Symbol), usize>,
}

impl LL1 {
    /// Builds the LL(1) parse table for `grammar`.
    ///
    /// For each production `A -> alpha` (index i): let F = First(alpha).
    /// For every terminal t in F, set M[A, t] = i. If ε ∈ F, also set
    /// M[A, t] = i for every t in Follow(A). Any cell written twice with a
    /// different production index raises `GrammarNotLl1`.
    pub fn build(grammar: Grammar) -> Result<Self> {
        let mut table: HashMap<(Symbol, Symbol), usize> = HashMap::new();

        for (idx, production) in grammar.productions().iter().enumerate() {
            let lhs = &production.lhs;
            let first_alpha = grammar.first_of_sequence(&production.rhs);

            for symbol in first_alpha.iter().filter(|s| !s.is_eps()) {
                Self::table_add(&mut table, &grammar, lhs, symbol, idx)?;
            }

            if first_alpha.contains(&Symbol::Eps) {
                for symbol in grammar.follow(lhs) {
                    Self::table_add(&mut table, &grammar, lhs, symbol, idx)?;
                }
            }
        }

        debug!("LL(1) table built: {} cells", table.len());
        Ok(Self { grammar, table })
    }

    fn table_add(
        table: &mut HashMap<(Symbol, Symbol), usize>,
        grammar: &Grammar,
        lhs: &Symbol,
        terminal: &Symbol,
        idx: usize,
    ) -> Result<()> {
        let key = (lhs.clone(), terminal.clone());
        if let Some(&existing_idx) = table.get(&key) {
            if existing_idx != idx {
                warn!(
                    "LL(1) conflict at M[{lhs}, {terminal}]: production {existing_idx} vs {idx}"
                );
                return Err(GrammarError::GrammarNotLl1 {
                    nonterminal: lhs.to_string(),
                    terminal: terminal.to_string(),
                    prod1: grammar.production(existing_idx).to_string(),
                    prod2: grammar.production(idx).to_string(),
                });
            }
            return Ok(());
        }
        trace!("M[{lhs}, {terminal}] = production {idx}");
        table.insert(key, idx);
        Ok(())
    }

    /// The underlying grammar.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Returns a reference to the parse table.
    pub fn table(&self) -> &HashMap<(Symbol, Symbol), usize> {
        &self.table
    }
}

enum Frame {
    Symbol(Symbol),
    CloseNode,
}

impl Parser for LL1 {
    /// Parses `tokens` (terminals only, no trailing End) against the table,
    /// producing a concrete parse tree.
    ///
    /// Stack starts as [End, start]. Tree assembly interleaves parent
    /// markers on the stack: whenever a nonterminal is expanded, a fresh
    /// node begins gathering children; a `CloseNode` marker pushed right
    /// below its rhs symbols re-attaches the finished node to its own
    /// parent once all of its children have been popped.
    fn parse(&self, tokens: &[Symbol]) -> Result<ParseTree> {
        let mut input = tokens.to_vec();
        input.push(Symbol::End);
        let mut pos = 0;

        let mut stack = vec![
            Frame::Symbol(Symbol::End),
            Frame::Symbol(self.grammar.start_symbol().clone()),
        ];
        // Nodes under construction; top of this stack is the node
        // currently gathering children.
        let mut open_nodes: Vec<(Symbol, Vec<ParseTree>)> = Vec::new();
        let mut finished_root: Option<ParseTree> = None;

        while let Some(frame) = stack.pop() {
            let lookahead = &input[pos];

            match frame {
                Frame::CloseNode => {
                    let (symbol, children) = open_nodes.pop().expect("matching open node");
                    let node = ParseTree::node(symbol, children);
                    match open_nodes.last_mut() {
                        Some((_, parent_children)) => parent_children.push(node),
                        None => finished_root = Some(node),
                    }
                }
                Frame::Symbol(top) if top.is_end() => {
                    if !lookahead.is_end() {
                        return Err(GrammarError::NotInLanguage {
                            state: "$".to_string(),
                            token: lookahead.to_string(),
                        });
                    }
                }
                Frame::Symbol(top) if top.is_nonterminal() => {
                    let key = (top.clone(), lookahead.clone());
                    let &prod_idx =
                        self.table
                            .get(&key)
                            .ok_or_else(|| GrammarError::NotInLanguage {
                                state: top.to_string(),
                                token: lookahead.to_string(),
                            })?;

                    let production = self.grammar.production(prod_idx);
                    open_nodes.push((top, Vec::new()));

                    if production.rhs.is_empty() {
                        open_nodes
                            .last_mut()
                            .unwrap()
                            .1
                            .push(ParseTree::leaf(Symbol::Eps));
                        stack.push(Frame::CloseNode);
                    } else {
                        stack.push(Frame::CloseNode);
                        for symbol in production.rhs.iter().rev() {
                            stack.push(Frame::Symbol(symbol.clone()));
                        }
                    }
                }
                Frame::Symbol(top) => {
                    if &top != lookahead {
                        return Err(GrammarError::NotInLanguage {
                            state: top.to_string(),
                            token: lookahead.to_string(),
                        });
                    }
                    open_nodes
                        .last_mut()
                        .expect("terminal must have a parent")
                        .1
                        .push(ParseTree::leaf(top));
                    pos += 1;
                }
            }
        }

        Ok(finished_root.expect("accepted parse always produces a root"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::string_to_symbols;

    fn build(lines: &[&str]) -> Result<LL1> {
        LL1::build(Grammar::parse(lines.iter().copied())?)
    }

    #[test]
    fn test_ll1_simple() {
        let parser = build(&["S -> A B", "A -> a A | d", "B -> b B c | e"]).unwrap();

        assert!(parser.parse(&string_to_symbols("d e")).is_ok());
        assert!(parser.parse(&string_to_symbols("a d b e c")).is_ok());
        assert!(parser.parse(&string_to_symbols("a")).is_err());
    }

    #[test]
    fn test_ll1_rejects_left_recursion() {
        let err = build(&["S -> S a | a"]).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarNotLl1 { .. }));
    }

    #[test]
    fn test_ll1_rejects_non_left_factored() {
        let err = build(&["S -> a S | a"]).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarNotLl1 { .. }));
    }

    #[test]
    fn test_ll1_rejects_ambiguous_choice() {
        let err = build(&["S -> A | B", "A -> x", "B -> x"]).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarNotLl1 { .. }));
    }

    #[test]
    fn test_expression_grammar_parse_and_leftmost() {
        let parser = build(&["E -> id T | ( E ) T", "T -> + id | * id"]).unwrap();

        let tree = parser
            .parse(&string_to_symbols("( id + id ) * id"))
            .unwrap();
        let steps = tree.leftmost();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps.first().unwrap(), "E");
        assert_eq!(tree.unparse(), "( id + id ) * id");
    }

    #[test]
    fn test_not_in_language() {
        let parser = build(&[
            "E -> T E'",
            "E' -> + T E' |",
            "T -> F T'",
            "T' -> * F T' |",
            "F -> ( E ) | id",
        ])
        .unwrap();

        assert!(parser.parse(&string_to_symbols("+ id")).is_err());
        assert!(parser.parse(&string_to_symbols("id +")).is_err());
        assert!(parser.parse(&string_to_symbols("id + + id")).is_err());
    }
}
