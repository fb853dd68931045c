//! SLR(1) bottom-up parser implementation.
//!
//! This module implements a shift-reduce SLR(1) parser using an LR(0)
//! automaton with lookahead from FOLLOW sets, following Aho et al.
//! ("Compilers: Principles, Techniques, and Tools", 2nd ed.), Algorithm 4.8
//! for construction and the canonical shift-reduce driver for parsing.

use crate::error::{ConflictKind, GrammarError, Result};
use crate::grammar::Grammar;
use crate::parse_tree::ParseTree;
use crate::symbol::Symbol;
use crate::Parser;
use log::{debug, trace, warn};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// A production index: either the synthetic augmenting production `S' -> S`,
/// or a real production by its index into the grammar.
///
/// Declaration order makes `Aug` sort before every `Real`, mirroring the
/// Python reference's `-1` sentinel for the augmenting production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum ProdIdx {
    Aug,
    Real(usize),
}

/// An LR(0) item: a production together with a dot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
    prod: ProdIdx,
    cursor: usize,
}

impl Item {
    fn new(prod: ProdIdx, cursor: usize) -> Self {
        Self { prod, cursor }
    }
}

// Items within a state are ordered by descending cursor, then ascending
// production index, exactly as the reference implementation orders items
// inside a state before printing or indexing it.
impl Ord for Item {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.cursor.cmp(&self.cursor).then_with(|| self.prod.cmp(&other.prod))
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A state is a canonical (deduplicated, ordered) set of items.
type State = BTreeSet<Item>;

/// SLR(1) table action.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Shift(usize),
    Reduce(ProdIdx),
    Accept,
}

/// SLR(1) shift-reduce parser: an LR(0) automaton plus ACTION/GOTO tables
/// built with FOLLOW-set lookahead.
#[derive(Debug)]
pub struct SLR {
    grammar: Grammar,
    aug_rhs: Vec<Symbol>,
    states: Vec<State>,
    action: HashMap<(usize, Symbol), Action>,
    goto: HashMap<(usize, Symbol), usize>,
}

impl SLR {
    /// Builds the SLR(1) tables for `grammar`.
    ///
    /// Constructs the canonical collection of LR(0) item sets for the
    /// augmented grammar `S' -> S`, then fills ACTION/GOTO by Algorithm 4.8:
    /// a shift item `[A -> a.xb]` with terminal `x` shifts; a complete item
    /// `[A -> a.]` reduces on every symbol in Follow(A); the complete
    /// augmenting item accepts on End. Conflicting entries raise
    /// `GrammarNotSlr`.
    pub fn build(grammar: Grammar) -> Result<Self> {
        let aug_rhs = vec![grammar.start_symbol().clone()];
        let (states, transitions) = Self::build_ccol(&grammar, &aug_rhs);
        debug!("canonical collection built: {} states", states.len());
        let (action, goto) = Self::build_tables(&grammar, &aug_rhs, &states, &transitions)?;
        debug!(
            "SLR(1) tables built: {} action cells, {} goto cells",
            action.len(),
            goto.len()
        );

        Ok(Self {
            grammar,
            aug_rhs,
            states,
            action,
            goto,
        })
    }

    /// The underlying grammar.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The canonical collection of LR(0) item sets, in final (sorted) order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Renders the ACTION table as `((state, symbol-text), action-text)`
    /// pairs, for CLI display, in the `<kind><payload>` textual form: shift
    /// is `S{state}`, reduce is `R{prod}`, accept is `A0`.
    pub fn action_entries(&self) -> Vec<((usize, String), String)> {
        self.action
            .iter()
            .map(|((state, symbol), action)| {
                ((*state, symbol.to_string()), Self::describe_compact(action))
            })
            .collect()
    }

    /// Renders the GOTO table as `((state, nonterminal-text), next-state)`
    /// pairs, for CLI display.
    pub fn goto_entries(&self) -> Vec<((usize, String), usize)> {
        self.goto
            .iter()
            .map(|((state, symbol), next)| ((*state, symbol.to_string()), *next))
            .collect()
    }

    fn describe_compact(action: &Action) -> String {
        match action {
            Action::Shift(s) => format!("S{}", s),
            Action::Reduce(ProdIdx::Aug) => "A0".to_string(),
            Action::Reduce(ProdIdx::Real(i)) => format!("R{}", i),
            Action::Accept => "A0".to_string(),
        }
    }

    /// Renders an item as `A -> a.b` for display purposes.
    fn item_to_string(&self, item: &Item) -> String {
        let rhs = Self::rhs_of(&self.grammar, &self.aug_rhs, &item.prod);
        let lhs = match item.prod {
            ProdIdx::Aug => "S'".to_string(),
            ProdIdx::Real(i) => self.grammar.production(i).lhs.to_string(),
        };
        let mut parts: Vec<String> = rhs.iter().map(|s| s.to_string()).collect();
        if rhs.is_empty() {
            parts.push("ε".to_string());
        }
        parts.insert(item.cursor.min(parts.len()), ".".to_string());
        format!("{} -> {}", lhs, parts.join(" "))
    }

    /// The right-hand side of `prod`: the synthetic `aug_rhs` for the
    /// augmenting production, or the grammar's own production otherwise.
    fn rhs_of<'g>(grammar: &'g Grammar, aug_rhs: &'g [Symbol], prod: &ProdIdx) -> &'g [Symbol] {
        match prod {
            ProdIdx::Aug => aug_rhs,
            ProdIdx::Real(i) => &grammar.production(*i).rhs,
        }
    }

    fn symbol_after_dot(grammar: &Grammar, aug_rhs: &[Symbol], item: &Item) -> Option<Symbol> {
        Self::rhs_of(grammar, aug_rhs, &item.prod)
            .get(item.cursor)
            .cloned()
    }

    fn is_reduce_item(grammar: &Grammar, aug_rhs: &[Symbol], item: &Item) -> bool {
        item.cursor >= Self::rhs_of(grammar, aug_rhs, &item.prod).len()
    }

    /// Closure of a set of items: for `[A -> a.Bb]` with B nonterminal, add
    /// `[B -> .g]` for every production `B -> g`, iterating to a fixed point.
    fn closure(grammar: &Grammar, aug_rhs: &[Symbol], items: State) -> State {
        let mut result = items;
        let mut changed = true;

        while changed {
            changed = false;
            let current = result.clone();

            for item in &current {
                if let Some(symbol) = Self::symbol_after_dot(grammar, aug_rhs, item) {
                    if symbol.is_nonterminal() {
                        for (idx, _) in grammar.productions_for(&symbol) {
                            let new_item = Item::new(ProdIdx::Real(idx), 0);
                            if result.insert(new_item) {
                                trace!("closure added production {idx} at cursor 0");
                                changed = true;
                            }
                        }
                    }
                }
            }
        }

        result
    }

    /// goto(I, X): advance the dot over X in every item of I that can, then
    /// close the result.
    fn goto(grammar: &Grammar, aug_rhs: &[Symbol], items: &State, symbol: &Symbol) -> State {
        let mut moved = State::new();

        for item in items {
            if Self::symbol_after_dot(grammar, aug_rhs, item).as_ref() == Some(symbol) {
                moved.insert(Item::new(item.prod, item.cursor + 1));
            }
        }

        Self::closure(grammar, aug_rhs, moved)
    }

    /// Builds the canonical collection of LR(0) item sets.
    ///
    /// States are first discovered by worklist in arbitrary order, then
    /// re-sorted into their final canonical order: ascending by
    /// `(cursor, prod_sort_key)` of each state's minimal item (which, given
    /// `Item`'s descending-cursor ordering, is the item with the highest
    /// cursor in that state). All recorded transitions are remapped from
    /// discovery-order indices to this final order.
    fn build_ccol(
        grammar: &Grammar,
        aug_rhs: &[Symbol],
    ) -> (Vec<State>, HashMap<(usize, Symbol), usize>) {
        let initial = Self::closure(
            grammar,
            aug_rhs,
            State::from([Item::new(ProdIdx::Aug, 0)]),
        );

        let mut states = vec![initial];
        let mut index_of: HashMap<State, usize> = HashMap::new();
        index_of.insert(states[0].clone(), 0);
        let mut raw_transitions: HashMap<(usize, Symbol), usize> = HashMap::new();
        let mut worklist: VecDeque<usize> = VecDeque::from([0]);

        while let Some(state_id) = worklist.pop_front() {
            let state = states[state_id].clone();

            let mut symbols: HashSet<Symbol> = HashSet::new();
            for item in &state {
                if let Some(symbol) = Self::symbol_after_dot(grammar, aug_rhs, item) {
                    symbols.insert(symbol);
                }
            }

            for symbol in symbols {
                let next = Self::goto(grammar, aug_rhs, &state, &symbol);
                if next.is_empty() {
                    continue;
                }

                let next_id = if let Some(&existing) = index_of.get(&next) {
                    existing
                } else {
                    let new_id = states.len();
                    index_of.insert(next.clone(), new_id);
                    states.push(next);
                    worklist.push_back(new_id);
                    new_id
                };

                raw_transitions.insert((state_id, symbol), next_id);
            }
        }

        // Re-sort into canonical order by each state's highest-cursor item.
        // `ProdIdx`'s own derived Ord already places `Aug` before every
        // `Real`, matching the reference's `-1` sentinel.
        let mut order: Vec<usize> = (0..states.len()).collect();
        order.sort_by(|&a, &b| {
            let ia = states[a].iter().next().expect("state is never empty");
            let ib = states[b].iter().next().expect("state is never empty");
            ia.cursor.cmp(&ib.cursor).then_with(|| ia.prod.cmp(&ib.prod))
        });

        let mut old_to_new: HashMap<usize, usize> = HashMap::new();
        for (new_id, &old_id) in order.iter().enumerate() {
            old_to_new.insert(old_id, new_id);
        }

        let sorted_states: Vec<State> = order.iter().map(|&old| states[old].clone()).collect();
        let transitions: HashMap<(usize, Symbol), usize> = raw_transitions
            .into_iter()
            .map(|((old_src, symbol), old_dst)| {
                ((old_to_new[&old_src], symbol), old_to_new[&old_dst])
            })
            .collect();

        (sorted_states, transitions)
    }

    /// Builds the ACTION and GOTO tables from the canonical collection.
    fn build_tables(
        grammar: &Grammar,
        aug_rhs: &[Symbol],
        states: &[State],
        transitions: &HashMap<(usize, Symbol), usize>,
    ) -> Result<(HashMap<(usize, Symbol), Action>, HashMap<(usize, Symbol), usize>)> {
        let mut action: HashMap<(usize, Symbol), Action> = HashMap::new();
        let mut goto: HashMap<(usize, Symbol), usize> = HashMap::new();

        let describe = |a: &Action| -> String {
            match a {
                Action::Shift(s) => format!("shift {}", s),
                Action::Reduce(ProdIdx::Aug) => "reduce S' -> S".to_string(),
                Action::Reduce(ProdIdx::Real(i)) => format!("reduce {}", grammar.production(*i)),
                Action::Accept => "accept".to_string(),
            }
        };

        let set_action = |action: &mut HashMap<(usize, Symbol), Action>,
                               state_id: usize,
                               symbol: Symbol,
                               new: Action|
         -> Result<()> {
            let key = (state_id, symbol.clone());
            if let Some(existing) = action.get(&key) {
                if *existing == new {
                    return Ok(());
                }
                let kind = match (existing, &new) {
                    (Action::Shift(_), Action::Reduce(_)) | (Action::Reduce(_), Action::Shift(_)) => {
                        ConflictKind::ShiftReduce
                    }
                    _ => ConflictKind::ReduceReduce,
                };
                warn!(
                    "SLR(1) {kind} conflict at state {state_id}, symbol {symbol}: {} vs {}",
                    describe(existing),
                    describe(&new)
                );
                return Err(GrammarError::GrammarNotSlr {
                    kind,
                    state: state_id,
                    symbol: symbol.to_string(),
                    existing: describe(existing),
                    new: describe(&new),
                });
            }
            trace!("action[{state_id}, {symbol}] = {}", describe(&new));
            action.insert(key, new);
            Ok(())
        };

        for (state_id, state) in states.iter().enumerate() {
            for item in state {
                if !Self::is_reduce_item(grammar, aug_rhs, item) {
                    if let Some(symbol) = Self::symbol_after_dot(grammar, aug_rhs, item) {
                        if symbol.is_terminal() || symbol.is_end() {
                            if let Some(&next) = transitions.get(&(state_id, symbol.clone())) {
                                set_action(&mut action, state_id, symbol, Action::Shift(next))?;
                            }
                        }
                    }
                } else if item.prod == ProdIdx::Aug {
                    set_action(&mut action, state_id, Symbol::End, Action::Accept)?;
                } else if let ProdIdx::Real(idx) = item.prod {
                    let lhs = grammar.production(idx).lhs.clone();
                    for symbol in grammar.follow(&lhs) {
                        set_action(
                            &mut action,
                            state_id,
                            symbol.clone(),
                            Action::Reduce(item.prod),
                        )?;
                    }
                }
            }

            for (key, &dst) in transitions {
                let (src, symbol) = key;
                if *src == state_id && symbol.is_nonterminal() {
                    goto.insert((state_id, symbol.clone()), dst);
                }
            }
        }

        Ok((action, goto))
    }
}

impl Parser for SLR {
    /// Drives the shift-reduce automaton over `tokens`, producing a concrete
    /// parse tree on acceptance.
    ///
    /// The stack holds `(state, node)` pairs; a reduce by `A -> b` pops
    /// `|b|` frames (or none, attaching a single Eps child, if `b` is
    /// empty), looks up `goto[top, A]`, and pushes the reassembled node.
    fn parse(&self, tokens: &[Symbol]) -> Result<ParseTree> {
        let mut input = tokens.to_vec();
        input.push(Symbol::End);
        let mut pos = 0;

        let mut stack: Vec<(usize, Option<ParseTree>)> = vec![(0, None)];

        loop {
            let state = stack.last().expect("stack never empties before accept").0;
            let lookahead = &input[pos];
            let key = (state, lookahead.clone());

            match self.action.get(&key) {
                Some(Action::Shift(next)) => {
                    stack.push((*next, Some(ParseTree::leaf(lookahead.clone()))));
                    pos += 1;
                }
                Some(Action::Reduce(prod)) => {
                    let (lhs, rhs_len) = match prod {
                        ProdIdx::Aug => unreachable!("augmenting production never reduces"),
                        ProdIdx::Real(idx) => {
                            let production = self.grammar.production(*idx);
                            (production.lhs.clone(), production.rhs.len())
                        }
                    };

                    let children = if rhs_len == 0 {
                        vec![ParseTree::leaf(Symbol::Eps)]
                    } else {
                        let mut popped = Vec::with_capacity(rhs_len);
                        for _ in 0..rhs_len {
                            let (_, node) = stack.pop().expect("reduce has enough frames");
                            popped.push(node.expect("shifted/reduced frames always carry a node"));
                        }
                        popped.reverse();
                        popped
                    };

                    let top_state = stack.last().expect("augmenting frame always remains").0;
                    let next = *self
                        .goto
                        .get(&(top_state, lhs.clone()))
                        .expect("goto is defined for every post-reduce state/nonterminal");
                    stack.push((next, Some(ParseTree::node(lhs, children))));
                }
                Some(Action::Accept) => {
                    let (_, node) = stack.pop().expect("accept always has a root frame");
                    return Ok(node.expect("accepted parse always produces a root"));
                }
                None => {
                    return Err(GrammarError::NotInLanguage {
                        state: state.to_string(),
                        token: lookahead.to_string(),
                    })
                }
            }
        }
    }
}

impl std::fmt::Display for SLR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            writeln!(f, "I{}:", id)?;
            for item in state {
                writeln!(f, "  {}", self.item_to_string(item))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::string_to_symbols;

    fn build(lines: &[&str]) -> Result<SLR> {
        SLR::build(Grammar::parse(lines.iter().copied())?)
    }

    #[test]
    fn test_slr_simple_accept_and_reject() {
        let parser = build(&["S -> A B", "A -> a A | d", "B -> b B c | e"]).unwrap();

        assert!(parser.parse(&string_to_symbols("d e")).is_ok());
        assert!(parser.parse(&string_to_symbols("a d b e c")).is_ok());
        assert!(parser.parse(&string_to_symbols("a")).is_err());
    }

    #[test]
    fn test_slr_rejects_ambiguous_dangling_else_style_grammar() {
        // Classic shift/reduce conflict: S -> A A, A -> a A | a
        let err = build(&["S -> A A", "A -> a A | a"]).unwrap_err();
        assert!(matches!(err, GrammarError::GrammarNotSlr { .. }));
    }

    #[test]
    fn test_expression_grammar_parse_and_rightmost() {
        let parser = build(&[
            "E -> E + T | T",
            "T -> T * F | F",
            "F -> ( E ) | id",
        ])
        .unwrap();

        let tree = parser.parse(&string_to_symbols("id + id * id")).unwrap();
        assert_eq!(tree.unparse(), "id + id * id");
        let steps = tree.rightmost();
        assert_eq!(steps.first().unwrap(), "E");
        assert!(steps.len() > 1);
    }

    #[test]
    fn test_not_in_language() {
        let parser = build(&["E -> E + T | T", "T -> id"]).unwrap();
        assert!(parser.parse(&string_to_symbols("id +")).is_err());
        assert!(parser.parse(&string_to_symbols("+ id")).is_err());
    }

    #[test]
    fn test_states_are_deduplicated() {
        let parser = build(&["S -> a S | a"]).unwrap();
        let mut seen = HashSet::new();
        for state in parser.states() {
            assert!(seen.insert(state.clone()), "duplicate state in canonical collection");
        }
    }
}
