//!
//! Errors of the formulation and solve pipeline
//!
use crate::solver::SolveStatus;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SteinerError {
    /// Malformed graph or terminal data.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),
    /// The root is the only terminal, so there is nothing to connect.
    #[error("no terminal other than the root (the Steiner tree is empty)")]
    EmptyCommoditySet,
    /// The backend did not return an optimal solution.
    #[error("solve failed with status {status}: {message}")]
    SolveFailed { status: SolveStatus, message: String },
}

impl SteinerError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> SteinerError {
        SteinerError::InvalidInstance(message.into())
    }
    /// status of the backend if this is a solver failure
    pub fn solve_status(&self) -> Option<SolveStatus> {
        match self {
            SteinerError::SolveFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
