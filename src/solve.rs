//!
//! Solve orchestration
//!
//! instance -> flow network -> linear model -> solver -> `SteinerSolution`
//!
//! Each call builds its own network and model and issues a single backend call.
//! Failures are returned, never retried.
//!
use crate::error::SteinerError;
use crate::instance::{Instance, Weight};
use crate::model::SteinerModel;
use crate::network::{ArcIndex, CommodityIndex, FlowNetwork, Mode};
use crate::solver::{SolveStatus, Solver};
use crate::verify::is_valid_solution;
use derive_new::new;
use log::{debug, info, warn};
use petgraph::graph::EdgeIndex;
use serde::Serialize;

/// selection values at or below this are reported as unselected
pub const DEFAULT_SELECTION_THRESHOLD: f64 = 1e-6;

/// tolerance used when checking a backend solution
pub const FEASIBILITY_EPS: f64 = 1e-6;

/// Options of a solve call
#[derive(Debug, Copy, Clone, PartialEq, new)]
pub struct SolveConfig {
    /// edges whose selection value exceeds this are reported
    pub selection_threshold: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
        }
    }
}

/// An edge with a non-negligible selection value
#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct SelectedEdge {
    #[serde(skip)]
    pub edge: EdgeIndex,
    pub source: String,
    pub target: String,
    pub weight: Weight,
    pub value: f64,
}

///
/// Optimal solution of one mode.
///
/// Holds the selection value of every edge and the flow of every
/// (arc, commodity) pair of the network the model was built from.
///
#[derive(Debug, Clone, Serialize)]
pub struct SteinerSolution {
    pub(crate) mode: Mode,
    pub(crate) status: SolveStatus,
    pub(crate) objective: f64,
    pub(crate) selected: Vec<SelectedEdge>,
    #[serde(skip)]
    pub(crate) selection: Vec<f64>,
    #[serde(skip)]
    pub(crate) flow: Vec<Vec<f64>>,
}

impl SteinerSolution {
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn status(&self) -> SolveStatus {
        self.status
    }
    /// total weight of the (fractionally) selected edges
    pub fn objective(&self) -> f64 {
        self.objective
    }
    /// edges above the selection threshold, in edge order
    pub fn selected_edges(&self) -> &[SelectedEdge] {
        &self.selected
    }
    /// selection value of any edge
    pub fn selection(&self, edge: EdgeIndex) -> f64 {
        self.selection[edge.index()]
    }
    /// flow of commodity `k` on the arc
    pub fn arc_flow(&self, arc: ArcIndex, k: CommodityIndex) -> f64 {
        self.flow[arc.index()][k]
    }
    /// every selection value is within `eps` of 0 or 1
    pub fn is_integral(&self, eps: f64) -> bool {
        self.selection
            .iter()
            .all(|&x| x.abs() <= eps || (x - 1.0).abs() <= eps)
    }
}

///
/// Solve the instance in one mode.
///
/// `InvalidInstance` and `EmptyCommoditySet` are returned before the backend is called.
///
pub fn solve<S: Solver + ?Sized>(
    instance: &Instance,
    mode: Mode,
    solver: &S,
    config: &SolveConfig,
) -> Result<SteinerSolution, SteinerError> {
    let network = FlowNetwork::new(instance, mode)?;
    solve_network(&network, solver, config)
}

///
/// Solve a flow network that has already been derived.
///
pub fn solve_network<S: Solver + ?Sized>(
    network: &FlowNetwork,
    solver: &S,
    config: &SolveConfig,
) -> Result<SteinerSolution, SteinerError> {
    let instance = network.instance();
    let mode = network.mode();
    let sm = SteinerModel::assemble(network);

    let values = solver.solve(sm.model()).map_err(|failure| {
        warn!(
            "{} solve with {} failed: {}",
            mode,
            solver.name(),
            failure
        );
        SteinerError::SolveFailed {
            status: failure.status,
            message: failure.message,
        }
    })?;
    if values.len() != sm.model().num_variables() {
        return Err(SteinerError::SolveFailed {
            status: SolveStatus::Error,
            message: format!(
                "backend returned {} values for {} variables",
                values.len(),
                sm.model().num_variables()
            ),
        });
    }

    let objective = sm.model().objective_value(&values);
    let selection: Vec<f64> = instance
        .edges()
        .map(|(e, _, _, _)| values[sm.selection_var(e)])
        .collect();
    let flow: Vec<Vec<f64>> = network
        .arcs()
        .map(|(a, _, _, _)| {
            network
                .commodity_indices()
                .map(|k| values[sm.flow_var(a, k)])
                .collect()
        })
        .collect();
    let selected: Vec<SelectedEdge> = instance
        .edges()
        .filter(|&(e, _, _, _)| selection[e.index()] > config.selection_threshold)
        .map(|(e, s, t, w)| {
            SelectedEdge::new(
                e,
                instance.label(s).to_string(),
                instance.label(t).to_string(),
                w,
                selection[e.index()],
            )
        })
        .collect();

    let solution = SteinerSolution {
        mode,
        status: SolveStatus::Optimal,
        objective,
        selected,
        selection,
        flow,
    };
    info!(
        "{} solution: objective={} selected_edges={}",
        mode,
        objective,
        solution.selected.len()
    );
    debug!(
        "{} solution satisfies conservation and coupling: {}",
        mode,
        is_valid_solution(network, &solution, FEASIBILITY_EPS)
    );
    Ok(solution)
}

///
/// Solve the instance in each of the modes independently.
///
/// A failure of one mode does not prevent the remaining modes from running.
///
pub fn solve_all<S: Solver + ?Sized>(
    instance: &Instance,
    modes: &[Mode],
    solver: &S,
    config: &SolveConfig,
) -> Vec<(Mode, Result<SteinerSolution, SteinerError>)> {
    modes
        .iter()
        .map(|&mode| (mode, solve(instance, mode, solver, config)))
        .collect()
}

//
// tests
//
