//!
//! Checks of a `SteinerSolution` against the network it was solved on.
//!
//! - flow conservation: net outflow of each commodity equals the requirement
//! - coupling: flow on an edge never exceeds its selection value
//!
use crate::network::{CommodityIndex, FlowNetwork};
use crate::solve::SteinerSolution;
use approx::abs_diff_eq;
use petgraph::graph::NodeIndex;

///
/// Net outflow (out-going minus in-coming flow) of commodity `k` at the node.
///
pub fn net_outflow(
    network: &FlowNetwork,
    solution: &SteinerSolution,
    node: NodeIndex,
    k: CommodityIndex,
) -> f64 {
    let out_flow: f64 = network.out_arcs(node).map(|a| solution.arc_flow(a, k)).sum();
    let in_flow: f64 = network.in_arcs(node).map(|a| solution.arc_flow(a, k)).sum();
    out_flow - in_flow
}

///
/// For each commodity and node, the net outflow equals the requirement
/// (+1 root, -1 commodity terminal, 0 elsewhere) up to `eps`.
///
pub fn is_satisfying_flow_conservation(
    network: &FlowNetwork,
    solution: &SteinerSolution,
    eps: f64,
) -> bool {
    network.commodity_indices().all(|k| {
        network.instance().nodes().all(|v| {
            abs_diff_eq!(
                net_outflow(network, solution, v, k),
                network.requirement(v, k) as f64,
                epsilon = eps
            )
        })
    })
}

///
/// For each edge and commodity, the flow summed over the arcs of the edge
/// is non-negative and does not exceed the selection value of the edge.
///
pub fn is_within_selection(network: &FlowNetwork, solution: &SteinerSolution, eps: f64) -> bool {
    network.instance().edges().all(|(e, _, _, _)| {
        let x = solution.selection(e);
        network.commodity_indices().all(|k| {
            let arcs = network.arcs_of_edge(e);
            let nonnegative = arcs.iter().all(|&a| solution.arc_flow(a, k) >= -eps);
            let f: f64 = arcs.iter().map(|&a| solution.arc_flow(a, k)).sum();
            nonnegative && f <= x + eps
        })
    })
}

/// both conservation and coupling hold
pub fn is_valid_solution(network: &FlowNetwork, solution: &SteinerSolution, eps: f64) -> bool {
    is_satisfying_flow_conservation(network, solution, eps)
        && is_within_selection(network, solution, eps)
}

//
// tests
//
