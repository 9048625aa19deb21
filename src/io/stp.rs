//!
//! Section-delimited instance format
//!
//! ```text
//! SECTION Graph
//! Nodes 3
//! E 1 2 1
//! E 2 3 2
//! END
//!
//! SECTION Terminals
//! T 1
//! T 3
//! END
//! ```
//!
//! `E` lines are read only inside the graph section and `T`/`Root` lines only
//! inside the terminal section. Every other line is skipped.
//!
use super::LoadError;
use crate::instance::{Instance, Weight};
use std::collections::HashSet;
use std::io::{self, Write};
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

/// Malformed line (1-based line number)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line})")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: String) -> Self {
        ParseError { line, message }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Section {
    Graph,
    Terminals,
}

impl FromStr for Instance {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instance(s)
    }
}

/// Parse the next token of a line as `T`.
fn token<T: FromStr>(tokens: &mut SplitWhitespace, line: usize, what: &str) -> Result<T, ParseError>
where
    T::Err: std::fmt::Display,
{
    let text = tokens
        .next()
        .ok_or_else(|| ParseError::new(line, format!("missing {}", what)))?;
    text.parse()
        .map_err(|err| ParseError::new(line, format!("invalid {} '{}': {}", what, text, err)))
}

/// Error if anything follows the expected tokens.
fn expect_the_end(tokens: &mut SplitWhitespace, line: usize) -> Result<(), ParseError> {
    match tokens.next() {
        Some(extra) => Err(ParseError::new(
            line,
            format!("unexpected trailing token '{}'", extra),
        )),
        None => Ok(()),
    }
}

/// Node labels in order of declaration
#[derive(Debug, Default)]
struct Declared {
    labels: Vec<String>,
    seen: HashSet<String>,
}

impl Declared {
    fn declare(&mut self, label: &str) {
        if self.seen.insert(label.to_string()) {
            self.labels.push(label.to_string());
        }
    }
}

/// Node ids are integers, kept as their canonical decimal text.
fn node(tokens: &mut SplitWhitespace, line: usize, what: &str) -> Result<String, ParseError> {
    token::<u64>(tokens, line, what).map(|id| id.to_string())
}

///
/// Parse an instance, tracking the current section line by line.
///
/// Nodes are those declared by `Nodes <n>` (ids `1..=n`) followed by edge
/// endpoints in order of first appearance. The root is the first terminal
/// unless a `Root <id>` line is given.
///
pub fn parse_instance(text: &str) -> Result<Instance, LoadError> {
    let mut section: Option<Section> = None;
    let mut nodes = Declared::default();
    let mut edges: Vec<(String, String, Weight)> = Vec::new();
    let mut terminals: Vec<String> = Vec::new();
    let mut root: Option<String> = None;

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let mut tokens = raw.split_whitespace();
        match (tokens.next(), section) {
            (Some("SECTION"), _) => {
                section = match tokens.next() {
                    Some("Graph") => Some(Section::Graph),
                    Some("Terminals") => Some(Section::Terminals),
                    _ => None,
                };
            }
            (Some("Nodes"), Some(Section::Graph)) => {
                let n: u64 = token(&mut tokens, line, "node count")?;
                expect_the_end(&mut tokens, line)?;
                for id in 1..=n {
                    nodes.declare(&id.to_string());
                }
            }
            (Some("E"), Some(Section::Graph)) => {
                let u = node(&mut tokens, line, "edge source")?;
                let v = node(&mut tokens, line, "edge target")?;
                let w: Weight = token(&mut tokens, line, "edge weight")?;
                expect_the_end(&mut tokens, line)?;
                if !w.is_finite() {
                    let message = format!("edge weight {} is not finite", w);
                    return Err(ParseError::new(line, message).into());
                }
                nodes.declare(&u);
                nodes.declare(&v);
                edges.push((u, v, w));
            }
            (Some("T"), Some(Section::Terminals)) => {
                let t = node(&mut tokens, line, "terminal")?;
                expect_the_end(&mut tokens, line)?;
                terminals.push(t);
            }
            (Some("Root"), Some(Section::Terminals)) => {
                let r = node(&mut tokens, line, "root")?;
                expect_the_end(&mut tokens, line)?;
                root = Some(r);
            }
            _ => {}
        }
    }

    let instance = Instance::new(&nodes.labels, &edges, &terminals, root.as_deref())?;
    Ok(instance)
}

///
/// Write the instance in the same format.
///
/// Nodes are renumbered `1..=n` in index order, so instances with arbitrary
/// labels can be written too. A `Root` line is emitted when the root is not
/// the first terminal.
///
pub fn write_instance<W: Write>(writer: &mut W, instance: &Instance) -> io::Result<()> {
    let id = |v: petgraph::graph::NodeIndex| v.index() + 1;
    writeln!(writer, "SECTION Graph")?;
    writeln!(writer, "Nodes {}", instance.num_nodes())?;
    writeln!(writer, "Edges {}", instance.num_edges())?;
    for (_, s, t, w) in instance.edges() {
        writeln!(writer, "E {} {} {}", id(s), id(t), w)?;
    }
    writeln!(writer, "END")?;
    writeln!(writer)?;
    writeln!(writer, "SECTION Terminals")?;
    writeln!(writer, "Terminals {}", instance.num_terminals())?;
    for &t in instance.terminals() {
        writeln!(writer, "T {}", id(t))?;
    }
    if instance.terminals().first() != Some(&instance.root()) {
        writeln!(writer, "Root {}", id(instance.root()))?;
    }
    writeln!(writer, "END")?;
    writeln!(writer)?;
    writeln!(writer, "EOF")
}

//
// tests
//
