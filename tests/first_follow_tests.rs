//! Integration tests for FIRST and FOLLOW set computation.

use cfg_parser::first_follow::compute_first_sets;
use cfg_parser::{Grammar, Symbol};

fn nt(name: &str) -> Symbol {
    Symbol::Nonterminal(name.to_string())
}

fn t(name: &str) -> Symbol {
    Symbol::Terminal(name.to_string())
}

#[test]
fn test_first_sets_simple() {
    let grammar = Grammar::parse(["S -> A B", "A -> a"]).unwrap();
    assert!(grammar.first(&nt("A")).contains(&t("a")));
}

#[test]
fn test_follow_sets_simple() {
    let grammar = Grammar::parse(["S -> A B", "A -> a"]).unwrap();
    assert!(grammar.follow(&nt("S")).contains(&Symbol::End));
}

#[test]
fn test_first_with_epsilon() {
    let grammar = Grammar::parse(["S -> A B", "A -> a |"]).unwrap();
    assert!(grammar.first(&nt("A")).contains(&t("a")));
    assert!(grammar.first(&nt("A")).contains(&Symbol::Eps));
}

#[test]
fn test_first_of_sequence() {
    let grammar = Grammar::parse(["S -> A B", "A -> a", "B -> b"]).unwrap();
    let first = grammar.first_of_sequence(&[nt("A"), nt("B")]);
    assert!(first.contains(&t("a")));
    assert!(!first.contains(&t("b")));
}

#[test]
fn test_follow_propagation() {
    let grammar = Grammar::parse(["S -> A B", "A -> a", "B -> b"]).unwrap();
    assert!(grammar.follow(&nt("A")).contains(&t("b")));
}

#[test]
fn test_complex_first_follow() {
    let grammar = Grammar::parse(["S -> A B", "A -> a A | d", "B -> b B c | e"]).unwrap();

    assert!(grammar.first(&nt("S")).contains(&t("a")));
    assert!(grammar.first(&nt("S")).contains(&t("d")));

    assert!(grammar.follow(&nt("A")).contains(&t("b")));
    assert!(grammar.follow(&nt("A")).contains(&Symbol::End));
}

#[test]
fn test_compute_first_sets_is_grounded_on_raw_productions() {
    // Same grammar as above, built directly from the free function rather
    // than through Grammar::parse, to exercise the function in isolation.
    let grammar = Grammar::parse(["S -> A B", "A -> a"]).unwrap();
    let first = compute_first_sets(grammar.productions(), grammar.nonterminals(), grammar.terminals());
    assert!(first.get(&nt("A")).unwrap().contains(&t("a")));
}
