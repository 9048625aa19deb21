//!
//! Steiner tree as a multi-commodity flow LP/MIP
//!
//! - `instance`: graph, terminals and root
//! - `network`: arcs, commodities and flow requirements for a `Mode`
//! - `model`: linear model and the flow formulation assembler
//! - `solver`: backend trait, the `microlp` backend and `cbc` (feature)
//! - `solve`: orchestration into a `SteinerSolution`
//! - `verify`: conservation and coupling checks
//! - `io`: instance files, LP files and reports
//!
pub mod error;
pub mod instance;
pub mod io;
pub mod mocks;
pub mod model;
pub mod network;
pub mod solve;
pub mod solver;
pub mod verify;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub use error::SteinerError;
pub use instance::{Instance, Weight};
pub use network::{FlowNetwork, Mode};
pub use solve::{solve, solve_all, SelectedEdge, SolveConfig, SteinerSolution};
pub use solver::{
    available_solvers, solver_by_name, MicroLp, SolveFailure, SolveStatus, Solver,
};
#[cfg(feature = "cbc")]
pub use solver::Cbc;
