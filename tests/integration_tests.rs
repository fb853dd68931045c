//! End-to-end integration tests covering the worked scenarios: grammars that
//! are SLR(1)-only, both LL(1) and SLR(1), and neither.

use cfg_parser::error::GrammarError;
use cfg_parser::symbol::string_to_symbols;
use cfg_parser::{Grammar, Parser, LL1, SLR};

/// Left-recursive expression grammar: SLR(1), not LL(1).
#[test]
fn test_left_recursive_grammar_is_slr_only() {
    let grammar = Grammar::parse(["E -> E + T | T", "T -> id"]).unwrap();

    let ll1_result = LL1::build(grammar.clone());
    assert!(matches!(ll1_result, Err(GrammarError::GrammarNotLl1 { .. })));

    let slr = SLR::build(grammar).unwrap();
    assert!(slr.parse(&string_to_symbols("id + id")).is_ok());
    assert!(slr.parse(&string_to_symbols("id")).is_ok());
    assert!(slr.parse(&string_to_symbols("id + +")).is_err());
}

/// Grammar with no left recursion and left-factored alternatives: both
/// LL(1) and SLR(1).
#[test]
fn test_grammar_is_both_ll1_and_slr1() {
    let lines = ["S -> A B", "A -> a A | d", "B -> b B c | e"];

    let ll1 = LL1::build(Grammar::parse(lines).unwrap()).unwrap();
    let slr = SLR::build(Grammar::parse(lines).unwrap()).unwrap();

    assert!(ll1.parse(&string_to_symbols("d e")).is_ok());
    assert!(ll1.parse(&string_to_symbols("a d b e c")).is_ok());
    assert!(ll1.parse(&string_to_symbols("a")).is_err());

    assert!(slr.parse(&string_to_symbols("d e")).is_ok());
    assert!(slr.parse(&string_to_symbols("a d b e c")).is_ok());
    assert!(slr.parse(&string_to_symbols("a")).is_err());
}

/// Ambiguous grammar (`S -> A | B` with `A -> a`, `B -> a`): neither LL(1)
/// (duplicate table cell) nor SLR(1) (reduce/reduce conflict, since
/// Follow(A) and Follow(B) coincide with Follow(S)).
#[test]
fn test_ambiguous_grammar_is_neither_ll1_nor_slr1() {
    let lines = ["S -> A | B", "A -> a", "B -> a"];

    let ll1_result = LL1::build(Grammar::parse(lines).unwrap());
    assert!(matches!(ll1_result, Err(GrammarError::GrammarNotLl1 { .. })));

    let slr_result = SLR::build(Grammar::parse(lines).unwrap());
    assert!(matches!(slr_result, Err(GrammarError::GrammarNotSlr { .. })));
}

/// End-to-end: the canonical expression grammar, parsed by both strategies.
#[test]
fn test_complex_expression_parsing_end_to_end() {
    let lines = ["E -> E + T | T", "T -> T * F | F", "F -> ( E ) | id"];
    let slr = SLR::build(Grammar::parse(lines).unwrap()).unwrap();

    assert!(slr.parse(&string_to_symbols("id")).is_ok());
    assert!(slr.parse(&string_to_symbols("id + id + id")).is_ok());
    assert!(slr.parse(&string_to_symbols("id * id * id")).is_ok());
    assert!(slr.parse(&string_to_symbols("id + id * id + id")).is_ok());
    assert!(slr.parse(&string_to_symbols("( id + id ) * ( id + id )")).is_ok());
    assert!(slr.parse(&string_to_symbols("( ( id ) )")).is_ok());

    assert!(slr.parse(&[]).is_err());
    assert!(slr.parse(&string_to_symbols("(")).is_err());
    assert!(slr.parse(&string_to_symbols(")")).is_err());
    assert!(slr.parse(&string_to_symbols("id +")).is_err());
    assert!(slr.parse(&string_to_symbols("+ id")).is_err());
    assert!(slr.parse(&string_to_symbols("id + + id")).is_err());
}

/// Epsilon productions (a truly empty alternative) thread through both
/// drivers and the resulting tree's `unparse()` elides the Eps leaf.
#[test]
fn test_epsilon_productions_end_to_end() {
    let lines = ["S -> A B", "A -> a A | d", "B -> b B c |"];

    let ll1 = LL1::build(Grammar::parse(lines).unwrap()).unwrap();
    let slr = SLR::build(Grammar::parse(lines).unwrap()).unwrap();

    let ll1_tree = ll1.parse(&string_to_symbols("d")).unwrap();
    assert_eq!(ll1_tree.unparse(), "d");

    let slr_tree = slr.parse(&string_to_symbols("a d")).unwrap();
    assert_eq!(slr_tree.unparse(), "a d");
}
