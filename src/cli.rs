//! CLI front-end for the grammar toolkit.
//!
//! Three subcommands share one grammar-loading path: `grammar` dumps
//! productions and FIRST/FOLLOW sets, `ll1` builds the LL(1) table, `slr`
//! builds the SLR(1) canonical collection and ACTION/GOTO tables. Both
//! parser subcommands optionally parse a `--sentence` and print its tree and
//! derivation.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};

use clap::{Args, Parser as ClapParser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use log::debug;

use crate::error::Result;
use crate::grammar::Grammar;
use crate::ll1::LL1;
use crate::slr1::SLR;
use crate::symbol::{string_to_symbols, Symbol};
use crate::Parser;

#[derive(ClapParser, Debug)]
#[command(
    author,
    version,
    about = "Analyze context-free grammars and parse sentences against them",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Dump productions, vocabulary, and FIRST/FOLLOW sets")]
    Grammar(GrammarArgs),
    #[command(about = "Build the LL(1) parse table and optionally parse a sentence")]
    Ll1(ParserArgs),
    #[command(about = "Build the SLR(1) canonical collection and ACTION/GOTO tables")]
    Slr(ParserArgs),
}

#[derive(Args, Debug)]
struct GrammarArgs {
    #[arg(help = "Grammar rule file, or '-' to read from stdin")]
    file: String,
}

#[derive(Args, Debug)]
struct ParserArgs {
    #[arg(help = "Grammar rule file, or '-' to read from stdin")]
    file: String,
    #[arg(long, help = "Whitespace-separated sentence to parse")]
    sentence: Option<String>,
}

/// Parses CLI arguments and dispatches to the selected subcommand.
pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Grammar(args) => run_grammar(&args),
        Command::Ll1(args) => run_ll1(&args),
        Command::Slr(args) => run_slr(&args),
    }
}

fn read_grammar_lines(file: &str) -> Result<Vec<String>> {
    let text = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(file)?
    };

    Ok(text
        .lines()
        .map(|l| l.to_string())
        .filter(|l| !l.trim().is_empty())
        .collect())
}

fn load_grammar(file: &str) -> Result<Grammar> {
    let lines = read_grammar_lines(file)?;
    let grammar = Grammar::parse(&lines)?;
    debug!(
        "loaded grammar: {} productions, {} terminals, {} nonterminals",
        grammar.productions().len(),
        grammar.terminals().len(),
        grammar.nonterminals().len()
    );
    Ok(grammar)
}

fn sorted(symbols: impl IntoIterator<Item = Symbol>) -> Vec<Symbol> {
    let set: BTreeSet<Symbol> = symbols.into_iter().collect();
    set.into_iter().collect()
}

fn render_symbol_set(symbols: impl IntoIterator<Item = Symbol>) -> String {
    sorted(symbols)
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_grammar(args: &GrammarArgs) -> Result<()> {
    let grammar = load_grammar(&args.file)?;

    println!("Productions:");
    for (idx, prod) in grammar.productions().iter().enumerate() {
        println!("  {:>3}: {}", idx, prod);
    }

    println!("\nStart symbol: {}", grammar.start_symbol());
    println!(
        "Terminals: {}",
        render_symbol_set(grammar.terminals().iter().cloned())
    );
    println!(
        "Nonterminals: {}",
        render_symbol_set(grammar.nonterminals().iter().cloned())
    );

    println!("\n{}", first_follow_table(&grammar));
    Ok(())
}

fn first_follow_table(grammar: &Grammar) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Nonterminal").add_attribute(Attribute::Bold),
            Cell::new("First").add_attribute(Attribute::Bold),
            Cell::new("Follow").add_attribute(Attribute::Bold),
        ]);

    for nt in sorted(grammar.nonterminals().iter().cloned()) {
        table.add_row(vec![
            Cell::new(nt.to_string()),
            Cell::new(render_symbol_set(grammar.first(&nt).iter().cloned())),
            Cell::new(render_symbol_set(grammar.follow(&nt).iter().cloned())),
        ]);
    }

    table
}

fn run_ll1(args: &ParserArgs) -> Result<()> {
    let grammar = load_grammar(&args.file)?;
    let parser = LL1::build(grammar)?;
    println!("Grammar is LL(1).\n");
    println!("{}", ll1_table(&parser));

    if let Some(sentence) = &args.sentence {
        parse_and_report(&parser, sentence, true)?;
    }

    Ok(())
}

fn ll1_table(parser: &LL1) -> Table {
    let grammar = parser.grammar();
    let terminals = {
        let mut t = sorted(grammar.terminals().iter().cloned());
        t.push(Symbol::End);
        t
    };
    let nonterminals = sorted(grammar.nonterminals().iter().cloned());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("M").add_attribute(Attribute::Bold)];
    header.extend(terminals.iter().map(|t| Cell::new(t.to_string()).add_attribute(Attribute::Bold)));
    table.add_row(header);

    for nt in &nonterminals {
        let mut row = vec![Cell::new(nt.to_string())];
        for t in &terminals {
            let content = parser
                .table()
                .get(&(nt.clone(), t.clone()))
                .map(|&idx| grammar.production(idx).to_string())
                .unwrap_or_else(|| "-".to_string());
            row.push(Cell::new(content));
        }
        table.add_row(row);
    }

    table
}

fn run_slr(args: &ParserArgs) -> Result<()> {
    let grammar = load_grammar(&args.file)?;
    let parser = SLR::build(grammar)?;
    println!("Grammar is SLR(1).\n");
    println!("Canonical collection:\n{}", parser);
    println!("{}", action_goto_table(&parser));

    if let Some(sentence) = &args.sentence {
        parse_and_report(&parser, sentence, false)?;
    }

    Ok(())
}

fn action_goto_table(parser: &SLR) -> Table {
    let grammar = parser.grammar();
    let terminals = {
        let mut t = sorted(grammar.terminals().iter().cloned());
        t.push(Symbol::End);
        t
    };
    let nonterminals = sorted(grammar.nonterminals().iter().cloned());

    let actions: std::collections::HashMap<(usize, String), String> =
        parser.action_entries().into_iter().collect();
    let gotos: std::collections::HashMap<(usize, String), usize> =
        parser.goto_entries().into_iter().collect();

    let n_states = parser.states().len();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("State").add_attribute(Attribute::Bold)];
    header.extend(terminals.iter().map(|t| Cell::new(format!("action[{t}]")).add_attribute(Attribute::Bold)));
    header.extend(nonterminals.iter().map(|nt| Cell::new(format!("goto[{nt}]")).add_attribute(Attribute::Bold)));
    table.add_row(header);

    for state in 0..n_states {
        let mut row = vec![Cell::new(state.to_string())];
        for t in &terminals {
            let content = actions
                .get(&(state, t.to_string()))
                .cloned()
                .unwrap_or_else(|| "-".to_string());
            row.push(Cell::new(content));
        }
        for nt in &nonterminals {
            let content = gotos
                .get(&(state, nt.to_string()))
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            row.push(Cell::new(content));
        }
        table.add_row(row);
    }

    table
}

fn parse_and_report(parser: &dyn Parser, sentence: &str, leftmost: bool) -> Result<()> {
    let tokens = string_to_symbols(sentence);
    let tree = parser.parse(&tokens)?;

    println!("\nParse tree:");
    println!("{}", tree);

    println!("\n{} derivation:", if leftmost { "Leftmost" } else { "Rightmost" });
    let steps = if leftmost { tree.leftmost() } else { tree.rightmost() };
    for (i, step) in steps.iter().enumerate() {
        println!("  {:>2}: {}", i, step);
    }

    println!("\nAccepted: {}", tree.unparse());
    Ok(())
}
