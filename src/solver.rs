//!
//! LP/MIP backends
//!
//! `Solver` is the only capability the formulation needs: minimize the
//! objective of a `LinearModel` and return a value for every variable.
//! `MicroLp` implements it with the pure-Rust `microlp` solver through `good_lp`,
//! `Cbc` (feature `cbc`) with COIN-OR CBC for larger integral models.
//!
use crate::model::{Domain, LinearExpr, LinearModel, Sense};
use good_lp::solvers::Solver as LpBackend;
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
};
use log::{debug, info};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// outcome status of a backend call
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

/// non-optimal outcome with the diagnostic of the backend
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{status}: {message}")]
pub struct SolveFailure {
    pub status: SolveStatus,
    pub message: String,
}

impl SolveFailure {
    pub fn new<S: Into<String>>(status: SolveStatus, message: S) -> SolveFailure {
        SolveFailure {
            status,
            message: message.into(),
        }
    }
}

/// Common interface for LP/MIP backends
pub trait Solver {
    /// Minimize the objective of the model.
    ///
    /// Returns the optimal value of every variable (indexed by `VarId`),
    /// or the failure status and diagnostic.
    fn solve(&self, model: &LinearModel) -> Result<Vec<f64>, SolveFailure>;

    /// Get the solver name for logging
    fn name(&self) -> &str;
}

/// `microlp` backend (simplex with branch-and-bound for integer variables)
#[derive(Debug, Default, Copy, Clone)]
pub struct MicroLp;

impl Solver for MicroLp {
    fn solve(&self, model: &LinearModel) -> Result<Vec<f64>, SolveFailure> {
        solve_with(model, self.name(), good_lp::solvers::microlp::microlp, |_| {})
    }

    fn name(&self) -> &str {
        "microlp"
    }
}

/// COIN-OR CBC backend (needs the `cbc` feature and the Cbc library)
#[cfg(feature = "cbc")]
#[derive(Debug, Default, Copy, Clone)]
pub struct Cbc;

#[cfg(feature = "cbc")]
impl Solver for Cbc {
    fn solve(&self, model: &LinearModel) -> Result<Vec<f64>, SolveFailure> {
        solve_with(model, self.name(), good_lp::solvers::coin_cbc::coin_cbc, |problem| {
            // cbc prints its progress to stdout otherwise
            problem.set_parameter("log", "0");
        })
    }

    fn name(&self) -> &str {
        "cbc"
    }
}

/// names accepted by `solver_by_name`, default first
pub fn available_solvers() -> Vec<&'static str> {
    let mut names = vec!["microlp"];
    if cfg!(feature = "cbc") {
        names.push("cbc");
    }
    names
}

///
/// Backend for a name in `available_solvers()`
///
pub fn solver_by_name(name: &str) -> Option<Box<dyn Solver>> {
    match name {
        "microlp" => Some(Box::new(MicroLp)),
        #[cfg(feature = "cbc")]
        "cbc" => Some(Box::new(Cbc)),
        _ => None,
    }
}

///
/// Translate `model` into a good_lp problem for `backend`, solve it and read
/// back the value of every variable.
///
fn solve_with<B, F>(
    model: &LinearModel,
    name: &str,
    backend: B,
    configure: F,
) -> Result<Vec<f64>, SolveFailure>
where
    B: LpBackend,
    B::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(&mut B::Model),
{
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|def| {
            let mut v = variable().name(def.name.clone()).min(def.lower);
            if let Some(upper) = def.upper {
                v = v.max(upper);
            }
            if def.domain == Domain::Binary {
                v = v.integer();
            }
            vars.add(v)
        })
        .collect();

    let objective = to_expression(model.objective(), &handles);
    let mut problem = vars.minimise(objective).using(backend);
    configure(&mut problem);

    let mut n_added = 0;
    for c in model.constraints() {
        // rows without terms are decided here, the backend never sees them
        if c.expr.is_empty() {
            if c.is_satisfied(&[], 0.0) {
                continue;
            }
            return Err(SolveFailure::new(
                SolveStatus::Infeasible,
                format!("constraint {} reduces to 0 {} {}", c.name, c.sense, c.rhs),
            ));
        }
        let lhs = to_expression(&c.expr, &handles);
        let constraint = match c.sense {
            Sense::Eq => lhs.eq(c.rhs),
            Sense::Le => lhs.leq(c.rhs),
            Sense::Ge => lhs.geq(c.rhs),
        };
        problem.add_constraint(constraint);
        n_added += 1;
    }
    debug!(
        "{}: {} of {} constraints passed to {}",
        model.name(),
        n_added,
        model.num_constraints(),
        name
    );

    let solution = problem.solve().map_err(to_failure)?;
    info!("{}: solved by {}", model.name(), name);
    Ok(handles.iter().map(|&v| solution.value(v)).collect())
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut e = Expression::with_capacity(expr.terms().len());
    for &(var, coef) in expr.terms() {
        e.add_mul(coef, handles[var]);
    }
    e
}

fn to_failure(err: ResolutionError) -> SolveFailure {
    let status = match &err {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Unbounded,
        _ => SolveStatus::Error,
    };
    SolveFailure::new(status, err.to_string())
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, VariableDef};

    /// min x + y  s.t.  x + y >= rhs,  x - y = 0
    fn toy_model(rhs: f64, domain: Domain) -> LinearModel {
        let mut m = LinearModel::new("toy");
        let x = m.add_variable(VariableDef::new("x".into(), domain, 0.0, Some(1.0)));
        let y = m.add_variable(VariableDef::new("y".into(), domain, 0.0, Some(1.0)));
        let mut objective = LinearExpr::new();
        objective.add_term(x, 1.0);
        objective.add_term(y, 1.0);
        m.set_objective(objective);
        let mut sum = LinearExpr::new();
        sum.add_term(x, 1.0);
        sum.add_term(y, 1.0);
        m.add_constraint(Constraint::new("sum".into(), sum, Sense::Ge, rhs));
        let mut diff = LinearExpr::new();
        diff.add_term(x, 1.0);
        diff.add_term(y, -1.0);
        m.add_constraint(Constraint::new("diff".into(), diff, Sense::Eq, 0.0));
        m
    }

    #[test]
    fn microlp_continuous() {
        let m = toy_model(1.0, Domain::Continuous);
        let values = MicroLp.solve(&m).unwrap();
        assert_abs_diff_eq!(values[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(values[1], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(m.objective_value(&values), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn microlp_binary() {
        let m = toy_model(1.0, Domain::Binary);
        let values = MicroLp.solve(&m).unwrap();
        assert_abs_diff_eq!(values[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(values[1], 1.0, epsilon = 1e-6);
        assert!(m.is_feasible(&values, 1e-6));
    }

    #[test]
    fn microlp_infeasible() {
        let m = toy_model(3.0, Domain::Continuous);
        let failure = MicroLp.solve(&m).unwrap_err();
        assert_eq!(failure.status, SolveStatus::Infeasible);
    }

    #[test]
    fn empty_row_is_decided_without_backend() {
        let mut m = toy_model(1.0, Domain::Continuous);
        m.add_constraint(Constraint::new(
            "trivial".into(),
            LinearExpr::new(),
            Sense::Eq,
            0.0,
        ));
        assert!(MicroLp.solve(&m).is_ok());
        m.add_constraint(Constraint::new(
            "isolated".into(),
            LinearExpr::new(),
            Sense::Eq,
            -1.0,
        ));
        let failure = MicroLp.solve(&m).unwrap_err();
        assert_eq!(failure.status, SolveStatus::Infeasible);
        assert!(failure.message.contains("isolated"));
    }

    #[test]
    fn solvers_by_name() {
        assert_eq!(available_solvers()[0], "microlp");
        for name in available_solvers() {
            let solver = solver_by_name(name).unwrap();
            assert_eq!(solver.name(), name);
            let values = solver.solve(&toy_model(1.0, Domain::Binary)).unwrap();
            assert_abs_diff_eq!(values[0], 1.0, epsilon = 1e-6);
        }
        assert!(solver_by_name("glpk").is_none());
    }

    #[cfg(feature = "cbc")]
    #[test]
    fn cbc_binary_and_infeasible() {
        let m = toy_model(1.0, Domain::Binary);
        let values = Cbc.solve(&m).unwrap();
        assert!(m.is_feasible(&values, 1e-6));
        assert_abs_diff_eq!(m.objective_value(&values), 2.0, epsilon = 1e-6);
        let failure = Cbc.solve(&toy_model(3.0, Domain::Continuous)).unwrap_err();
        assert_eq!(failure.status, SolveStatus::Infeasible);
    }

    #[test]
    fn status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "Optimal");
        let failure = SolveFailure::new(SolveStatus::Unbounded, "ray");
        assert_eq!(failure.to_string(), "Unbounded: ray");
    }
}
