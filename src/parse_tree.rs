//! Concrete parse tree produced by the LL1 and SLR drivers.

use crate::symbol::Symbol;
use std::fmt;

/// A node in a concrete parse tree.
///
/// Owns its child list. A leaf carries either a terminal symbol or `Eps`
/// (an ε-derivation). The tree is built and owned exclusively by whichever
/// parser driver produced it; nothing mutates it afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    symbol: Symbol,
    children: Vec<ParseTree>,
}

impl ParseTree {
    /// Creates a leaf node.
    pub fn leaf(symbol: Symbol) -> Self {
        Self {
            symbol,
            children: Vec::new(),
        }
    }

    /// Creates an internal node with the given children.
    pub fn node(symbol: Symbol, children: Vec<ParseTree>) -> Self {
        Self { symbol, children }
    }

    /// The symbol held by this node.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// This node's children, in left-to-right order.
    pub fn children(&self) -> &[ParseTree] {
        &self.children
    }

    /// Iterator of indented textual lines, one per node, in a DFS preorder
    /// walk. An ε leaf renders as `ε` (its symbol's own Display already
    /// does this).
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.push_lines("", &mut out);
        out
    }

    fn push_lines(&self, prefix: &str, out: &mut Vec<String>) {
        out.push(format!("{}{}", prefix, self.symbol));
        let child_prefix = format!("{}| ", prefix);
        for child in &self.children {
            child.push_lines(&child_prefix, out);
        }
    }

    /// Iterator of sentential forms in a leftmost derivation, starting with
    /// the root symbol and ending with the terminal frontier.
    pub fn leftmost(&self) -> Vec<String> {
        self.derive(true)
    }

    /// Iterator of sentential forms in a rightmost derivation, starting with
    /// the root symbol and ending with the terminal frontier.
    pub fn rightmost(&self) -> Vec<String> {
        self.derive(false)
    }

    /// Iterative DFS with an explicit stack, emitting the sentential form at
    /// each internal-node expansion. `leftmost` pushes a node's children
    /// reversed so the leftmost child is popped (expanded) first;
    /// `rightmost` pushes them in order so the rightmost child is popped
    /// first. Either way, `done` collects terminal leaves in visitation
    /// order and `todo` holds the pending stack; the two are combined so
    /// the printed form always reads left to right.
    fn derive(&self, leftmost: bool) -> Vec<String> {
        let mut steps = vec![self.symbol.to_string()];

        let mut todo: Vec<&ParseTree> = vec![self];
        let mut done: Vec<&ParseTree> = Vec::new();

        while let Some(cur) = todo.pop() {
            if !cur.children.is_empty() {
                if leftmost {
                    todo.extend(cur.children.iter().rev());
                } else {
                    todo.extend(cur.children.iter());
                }

                let form: Vec<String> = if leftmost {
                    done.iter()
                        .chain(todo.iter().rev())
                        .filter(|n| !n.symbol.is_eps())
                        .map(|n| n.symbol.to_string())
                        .collect()
                } else {
                    todo.iter()
                        .chain(done.iter().rev())
                        .filter(|n| !n.symbol.is_eps())
                        .map(|n| n.symbol.to_string())
                        .collect()
                };
                steps.push(form.join(" "));
            } else {
                done.push(cur);
            }
        }

        steps
    }

    /// In-order concatenation of leaf symbols, with ε leaves elided.
    pub fn unparse(&self) -> String {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn collect_leaves(&self, out: &mut Vec<String>) {
        if self.children.is_empty() {
            if !self.symbol.is_eps() {
                out.push(self.symbol.to_string());
            }
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
