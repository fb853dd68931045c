//! FIRST and FOLLOW set computation for context-free grammars.
//!
//! This module implements algorithms from Aho et al., "Compilers: Principles,
//! Techniques, and Tools" (2nd Edition), sections 4.4, adapted to multi-token
//! symbols. `Grammar::parse` calls these functions once, eagerly, so the
//! resulting `Grammar` never recomputes First/Follow after construction.

use crate::grammar::Production;
use crate::symbol::Symbol;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Type alias for FIRST sets mapping.
pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;

/// Type alias for FOLLOW sets mapping.
pub type FollowSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes the FIRST sets for all symbols in the grammar.
///
/// For a terminal `a`, First(a) = {a}. For a nonterminal `A` with
/// production `A -> X1 X2 ... Xn`, First(X1...Xn) is unioned into First(A).
/// Iterates to a fixed point since First(A) may depend on First(B) for
/// some other nonterminal B defined later in source order.
pub fn compute_first_sets(
    productions: &[Production],
    nonterminals: &HashSet<Symbol>,
    terminals: &HashSet<Symbol>,
) -> FirstSets {
    let mut first_sets: FirstSets = HashMap::new();

    for terminal in terminals {
        first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));
    }

    for nonterminal in nonterminals {
        first_sets.entry(nonterminal.clone()).or_default();
    }

    let mut pass = 0;
    let mut changed = true;
    while changed {
        changed = false;
        pass += 1;

        for production in productions {
            let lhs = &production.lhs;
            let current_first = first_sets.get(lhs).cloned().unwrap_or_default();

            let rhs_first = first_of_sequence(&first_sets, &production.rhs);

            let new_first: HashSet<Symbol> = current_first.union(&rhs_first).cloned().collect();

            if new_first.len() != current_first.len() {
                trace!("first({lhs}) grew to {} symbols", new_first.len());
                first_sets.insert(lhs.clone(), new_first);
                changed = true;
            }
        }
    }
    debug!("first sets converged after {pass} pass(es)");

    first_sets
}

/// Computes First(α) for an arbitrary sequence of symbols.
///
/// Walks the sequence left to right, adding First(Xi) \ {ε} until some Xi
/// cannot derive ε; if every symbol in the sequence can derive ε (including
/// the empty sequence itself), ε is added to the result.
pub fn first_of_sequence(first_sets: &FirstSets, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();

    for symbol in symbols {
        let first_sym = first_sets.get(symbol).cloned().unwrap_or_default();

        for sym in &first_sym {
            if !sym.is_eps() {
                result.insert(sym.clone());
            }
        }

        if !first_sym.contains(&Symbol::Eps) {
            return result;
        }
    }

    result.insert(Symbol::Eps);
    result
}

/// Computes the FOLLOW sets for all nonterminals in the grammar.
///
/// Follow(start) always contains End. For a production `A -> α B β`, First(β)
/// \ {ε} is added to Follow(B); if β is empty or ε ∈ First(β), Follow(A) is
/// added to Follow(B) too. Iterates to a fixed point.
pub fn compute_follow_sets(
    productions: &[Production],
    nonterminals: &HashSet<Symbol>,
    start_symbol: &Symbol,
    first_sets: &FirstSets,
) -> FollowSets {
    let mut follow_sets: FollowSets = HashMap::new();

    for nonterminal in nonterminals {
        follow_sets.insert(nonterminal.clone(), HashSet::new());
    }

    follow_sets
        .entry(start_symbol.clone())
        .or_default()
        .insert(Symbol::End);

    let mut pass = 0;
    let mut changed = true;
    while changed {
        changed = false;
        pass += 1;

        for production in productions {
            let lhs = &production.lhs;
            let rhs = &production.rhs;

            for (i, symbol) in rhs.iter().enumerate() {
                if !symbol.is_nonterminal() {
                    continue;
                }

                let current_follow = follow_sets.get(symbol).cloned().unwrap_or_default();
                let mut new_follow = current_follow.clone();

                let beta = &rhs[i + 1..];
                let first_beta = first_of_sequence(first_sets, beta);

                for sym in &first_beta {
                    if !sym.is_eps() {
                        new_follow.insert(sym.clone());
                    }
                }

                if beta.is_empty() || first_beta.contains(&Symbol::Eps) {
                    let follow_lhs = follow_sets.get(lhs).cloned().unwrap_or_default();
                    new_follow = new_follow.union(&follow_lhs).cloned().collect();
                }

                if new_follow.len() != current_follow.len() {
                    trace!("follow({symbol}) grew to {} symbols", new_follow.len());
                    follow_sets.insert(symbol.clone(), new_follow);
                    changed = true;
                }
            }
        }
    }
    debug!("follow sets converged after {pass} pass(es)");

    follow_sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn nt(name: &str) -> Symbol {
        Symbol::Nonterminal(name.to_string())
    }

    fn t(name: &str) -> Symbol {
        Symbol::Terminal(name.to_string())
    }

    #[test]
    fn test_expression_grammar_first_follow() {
        let lines = [
            "E -> T E'",
            "E' -> + T E' |",
            "T -> F T'",
            "T' -> * F T' |",
            "F -> ( E ) | id",
        ];
        let g = Grammar::parse(lines).unwrap();

        assert_eq!(
            g.first(&nt("E")).clone(),
            HashSet::from([t("("), t("id")])
        );
        assert_eq!(
            g.first(&nt("T")).clone(),
            HashSet::from([t("("), t("id")])
        );
        assert_eq!(
            g.first(&nt("F")).clone(),
            HashSet::from([t("("), t("id")])
        );
        assert_eq!(
            g.first(&nt("E'")).clone(),
            HashSet::from([t("+"), Symbol::Eps])
        );
        assert_eq!(
            g.first(&nt("T'")).clone(),
            HashSet::from([t("*"), Symbol::Eps])
        );

        assert_eq!(
            g.follow(&nt("E")).clone(),
            HashSet::from([t(")"), Symbol::End])
        );
        assert_eq!(
            g.follow(&nt("E'")).clone(),
            HashSet::from([t(")"), Symbol::End])
        );
        assert_eq!(
            g.follow(&nt("T")).clone(),
            HashSet::from([t("+"), t(")"), Symbol::End])
        );
        assert_eq!(
            g.follow(&nt("T'")).clone(),
            HashSet::from([t("+"), t(")"), Symbol::End])
        );
        assert_eq!(
            g.follow(&nt("F")).clone(),
            HashSet::from([t("*"), t("+"), t(")"), Symbol::End])
        );
    }

    #[test]
    fn test_nullable_nonterminal_follow_everywhere() {
        let lines = ["S -> A a", "A ->"];
        let g = Grammar::parse(lines).unwrap();
        assert!(g.first(&nt("A")).contains(&Symbol::Eps));
        assert!(g.follow(&nt("A")).contains(&t("a")));
    }
}
