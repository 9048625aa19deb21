//!
//! # `Instance`
//!
//! A Steiner tree instance: a directed graph with non-negative edge weights,
//! a set of terminals and the root that every terminal is connected to.
//!
//! Nodes are identified by string labels. Node and edge indices follow the
//! insertion order, which fixes the enumeration order of every derived
//! network and model.
//!
use crate::error::SteinerError;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// weight (cost) of an edge
pub type Weight = f64;

#[derive(Debug, Clone)]
pub struct Instance {
    /// node weight is the label, edge weight is the cost
    graph: DiGraph<String, Weight>,
    index: HashMap<String, NodeIndex>,
    terminals: Vec<NodeIndex>,
    root: NodeIndex,
}

impl Instance {
    ///
    /// Create an instance from node labels, weighted edges `(u, v, w)` and terminals.
    ///
    /// The root defaults to the first terminal. An explicit root must be a known node,
    /// and it is added to the terminals if it is not one of them yet.
    ///
    pub fn new<S: AsRef<str>>(
        nodes: &[S],
        edges: &[(S, S, Weight)],
        terminals: &[S],
        root: Option<&str>,
    ) -> Result<Instance, SteinerError> {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let label = node.as_ref();
            if index.contains_key(label) {
                return Err(SteinerError::invalid(format!(
                    "node `{}` is declared twice",
                    label
                )));
            }
            let v = graph.add_node(label.to_string());
            index.insert(label.to_string(), v);
        }

        let lookup = |label: &str, role: &str| {
            index.get(label).copied().ok_or_else(|| {
                SteinerError::invalid(format!("{} `{}` is not a node of the graph", role, label))
            })
        };

        for (u, v, w) in edges {
            let (u, v) = (u.as_ref(), v.as_ref());
            let s = lookup(u, "edge endpoint")?;
            let t = lookup(v, "edge endpoint")?;
            if s == t {
                return Err(SteinerError::invalid(format!(
                    "edge ({}, {}) is a self-loop",
                    u, v
                )));
            }
            if !w.is_finite() || *w < 0.0 {
                return Err(SteinerError::invalid(format!(
                    "edge ({}, {}) has invalid weight {}",
                    u, v, w
                )));
            }
            graph.add_edge(s, t, *w);
        }

        let mut terminal_indices: Vec<NodeIndex> = Vec::with_capacity(terminals.len());
        for terminal in terminals {
            let t = lookup(terminal.as_ref(), "terminal")?;
            if !terminal_indices.contains(&t) {
                terminal_indices.push(t);
            }
        }
        if terminal_indices.is_empty() {
            return Err(SteinerError::invalid("terminal set is empty"));
        }

        let root = match root {
            Some(label) => {
                let r = lookup(label, "root")?;
                if !terminal_indices.contains(&r) {
                    terminal_indices.push(r);
                }
                r
            }
            None => terminal_indices[0],
        };

        Ok(Instance {
            graph,
            index,
            terminals: terminal_indices,
            root,
        })
    }

    ///
    /// Create an instance whose nodes are the edge endpoints and the terminals,
    /// in order of first appearance.
    ///
    pub fn from_edges<S: AsRef<str>>(
        edges: &[(S, S, Weight)],
        terminals: &[S],
        root: Option<&str>,
    ) -> Result<Instance, SteinerError> {
        let mut nodes: Vec<&str> = Vec::new();
        let endpoints = edges.iter().flat_map(|(u, v, _)| [u.as_ref(), v.as_ref()]);
        for label in endpoints.chain(terminals.iter().map(|t| t.as_ref())) {
            if !nodes.contains(&label) {
                nodes.push(label);
            }
        }
        let edges: Vec<(&str, &str, Weight)> = edges
            .iter()
            .map(|(u, v, w)| (u.as_ref(), v.as_ref(), *w))
            .collect();
        let terminals: Vec<&str> = terminals.iter().map(|t| t.as_ref()).collect();
        Instance::new(&nodes, &edges, &terminals, root)
    }

    /// underlying graph (node weight = label, edge weight = cost)
    pub fn graph(&self) -> &DiGraph<String, Weight> {
        &self.graph
    }
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }
    /// Iterator over the node indices.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }
    /// Iterator over `(edge, source, target, weight)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex, Weight)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.id(), e.source(), e.target(), *e.weight()))
    }
    pub fn terminals(&self) -> &[NodeIndex] {
        &self.terminals
    }
    pub fn root(&self) -> NodeIndex {
        self.root
    }
    pub fn label(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }
    pub fn weight(&self, edge: EdgeIndex) -> Weight {
        self.graph[edge]
    }
    /// `(source, target)` of the edge
    pub fn endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        let e = &self.graph.raw_edges()[edge.index()];
        (e.source(), e.target())
    }
    /// Find the first edge `(u, v)` by labels, in the given direction only.
    pub fn find_edge(&self, u: &str, v: &str) -> Option<EdgeIndex> {
        let s = self.node_index(u)?;
        let t = self.node_index(v)?;
        self.graph.find_edge(s, t)
    }
}

//
// tests
//
