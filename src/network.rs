//!
//! # `FlowNetwork`
//!
//! Multi-commodity flow network derived from an `Instance`.
//!
//! - arcs: the edges as given (fractional mode) or the edges and their reverses
//!   (integral and undirected relaxation modes)
//! - commodities: one per terminal other than the root
//! - requirement: net outflow of a commodity at a node
//!
//! Node indices of the network are the node indices of the instance.
//!
use crate::error::SteinerError;
use crate::instance::Instance;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// index of an arc in the flow network
pub type ArcIndex = EdgeIndex;
/// position of a commodity in `FlowNetwork::commodities()`
pub type CommodityIndex = usize;

///
/// Formulation variant.
///
/// Only two properties distinguish the variants: the domain of the selection
/// variables and whether each edge carries flow in both directions.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// continuous selection, flow along the edge direction only
    Fractional,
    /// binary selection, flow in both directions of an edge
    Integral,
    /// continuous selection, flow in both directions of an edge
    UndirectedRelaxation,
}

impl Mode {
    /// selection variables are restricted to {0, 1}
    pub fn is_integral(self) -> bool {
        matches!(self, Mode::Integral)
    }
    /// every edge admits flow in both directions
    pub fn is_bidirected(self) -> bool {
        !matches!(self, Mode::Fractional)
    }
    pub fn name(self) -> &'static str {
        match self {
            Mode::Fractional => "fractional",
            Mode::Integral => "integral",
            Mode::UndirectedRelaxation => "relaxation",
        }
    }
    pub fn title(self) -> &'static str {
        match self {
            Mode::Fractional => "Fractional",
            Mode::Integral => "Integral",
            Mode::UndirectedRelaxation => "Undirected relaxation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fractional" => Ok(Mode::Fractional),
            "integral" => Ok(Mode::Integral),
            "relaxation" => Ok(Mode::UndirectedRelaxation),
            _ => Err(format!(
                "unknown mode `{}` (expected fractional, integral or relaxation)",
                s
            )),
        }
    }
}

/// Arc attributes of the flow network
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Arc {
    /// edge of the instance this arc belongs to
    pub edge: EdgeIndex,
    /// the arc points from the edge target to the edge source
    pub reversed: bool,
}

#[derive(Debug, Clone)]
pub struct FlowNetwork<'a> {
    instance: &'a Instance,
    mode: Mode,
    graph: DiGraph<(), Arc>,
    commodities: Vec<NodeIndex>,
    /// arcs of each edge, indexed by the edge index
    edge_arcs: Vec<Vec<ArcIndex>>,
}

impl<'a> FlowNetwork<'a> {
    ///
    /// Derive arcs, commodities and requirements of the instance for the mode.
    ///
    /// Forward arcs come first in edge order, then (in bidirected modes) the
    /// reversed arcs in edge order.
    ///
    pub fn new(instance: &'a Instance, mode: Mode) -> Result<FlowNetwork<'a>, SteinerError> {
        let root = instance.root();
        let commodities: Vec<NodeIndex> = instance
            .terminals()
            .iter()
            .copied()
            .filter(|&t| t != root)
            .collect();
        if commodities.is_empty() {
            return Err(SteinerError::EmptyCommoditySet);
        }

        let n_arcs = if mode.is_bidirected() {
            2 * instance.num_edges()
        } else {
            instance.num_edges()
        };
        let mut graph = DiGraph::with_capacity(instance.num_nodes(), n_arcs);
        for _ in instance.nodes() {
            graph.add_node(());
        }
        let mut edge_arcs = vec![Vec::with_capacity(2); instance.num_edges()];
        for (e, s, t, _) in instance.edges() {
            let a = graph.add_edge(
                s,
                t,
                Arc {
                    edge: e,
                    reversed: false,
                },
            );
            edge_arcs[e.index()].push(a);
        }
        if mode.is_bidirected() {
            for (e, s, t, _) in instance.edges() {
                let a = graph.add_edge(
                    t,
                    s,
                    Arc {
                        edge: e,
                        reversed: true,
                    },
                );
                edge_arcs[e.index()].push(a);
            }
        }

        Ok(FlowNetwork {
            instance,
            mode,
            graph,
            commodities,
            edge_arcs,
        })
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    /// network graph whose node indices coincide with the instance
    pub fn graph(&self) -> &DiGraph<(), Arc> {
        &self.graph
    }
    pub fn num_arcs(&self) -> usize {
        self.graph.edge_count()
    }
    /// Iterator over `(arc, source, target, attributes)` in arc order.
    pub fn arcs(&self) -> impl Iterator<Item = (ArcIndex, NodeIndex, NodeIndex, &Arc)> + '_ {
        self.graph
            .edge_references()
            .map(|a| (a.id(), a.source(), a.target(), a.weight()))
    }
    pub fn arc(&self, arc: ArcIndex) -> &Arc {
        &self.graph[arc]
    }
    /// `(source, target)` of the arc
    pub fn arc_endpoints(&self, arc: ArcIndex) -> (NodeIndex, NodeIndex) {
        let a = &self.graph.raw_edges()[arc.index()];
        (a.source(), a.target())
    }
    /// arcs leaving the node
    pub fn out_arcs(&self, node: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|a| a.id())
    }
    /// arcs entering the node
    pub fn in_arcs(&self, node: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|a| a.id())
    }
    /// the arcs (one or two) that consume the capacity of the edge
    pub fn arcs_of_edge(&self, edge: EdgeIndex) -> &[ArcIndex] {
        &self.edge_arcs[edge.index()]
    }
    /// terminals (other than the root) that receive one unit of flow each
    pub fn commodities(&self) -> &[NodeIndex] {
        &self.commodities
    }
    pub fn num_commodities(&self) -> usize {
        self.commodities.len()
    }
    pub fn commodity_indices(&self) -> std::ops::Range<CommodityIndex> {
        0..self.commodities.len()
    }

    ///
    /// Required net outflow of commodity `k` at `node`:
    /// `+1` at the root, `-1` at the terminal of the commodity, `0` elsewhere.
    ///
    pub fn requirement(&self, node: NodeIndex, k: CommodityIndex) -> i32 {
        if node == self.instance.root() {
            1
        } else if node == self.commodities[k] {
            -1
        } else {
            0
        }
    }
}

//
// tests
//
