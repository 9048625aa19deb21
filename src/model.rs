//!
//! # Linear model
//!
//! Backend independent linear / mixed-integer program, and the assembler that
//! writes the multi-commodity flow formulation of a `FlowNetwork` into it.
//!
//! ```text
//! min  sum_e w(e) x(e)
//! s.t. sum_{a in out(i)} f(a,k) - sum_{a in in(i)} f(a,k) = req(i,k)   for each k, i
//!      sum_{a in arcs(e)} f(a,k) - x(e) <= 0                           for each e, k
//!      0 <= x(e) <= 1 (binary if integral), f(a,k) >= 0
//! ```
//!
use crate::network::{ArcIndex, CommodityIndex, FlowNetwork};
use derive_new::new;
use itertools::Itertools;
use log::{debug, info};
use petgraph::graph::EdgeIndex;
use std::fmt;

/// index of a variable in a `LinearModel`
pub type VarId = usize;

/// domain of a variable
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Domain {
    Continuous,
    Binary,
}

/// Variable declaration: name, domain and bounds `[lower, upper]`.
/// `upper == None` means unbounded above.
#[derive(Debug, Clone, PartialEq, new)]
pub struct VariableDef {
    pub name: String,
    pub domain: Domain,
    pub lower: f64,
    pub upper: Option<f64>,
}

/// sparse linear expression `sum coef * var`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> LinearExpr {
        LinearExpr::default()
    }
    pub fn with_capacity(capacity: usize) -> LinearExpr {
        LinearExpr {
            terms: Vec::with_capacity(capacity),
        }
    }
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
    /// value of the expression for the variable assignment
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(var, coef)| coef * values[var]).sum()
    }
}

/// relation between the expression and the right-hand side
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Eq => write!(f, "="),
            Sense::Le => write!(f, "<="),
            Sense::Ge => write!(f, ">="),
        }
    }
}

/// `expr (sense) rhs`
#[derive(Debug, Clone, PartialEq, new)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    /// the constraint holds for the assignment, up to `eps`
    pub fn is_satisfied(&self, values: &[f64], eps: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Eq => (lhs - self.rhs).abs() <= eps,
            Sense::Le => lhs <= self.rhs + eps,
            Sense::Ge => lhs >= self.rhs - eps,
        }
    }
}

///
/// Minimization problem over declared variables.
///
/// Built once, then only read by a solver or a writer.
///
#[derive(Debug, Clone, Default)]
pub struct LinearModel {
    name: String,
    variables: Vec<VariableDef>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
}

impl LinearModel {
    pub fn new<S: Into<String>>(name: S) -> LinearModel {
        LinearModel {
            name: name.into(),
            ..LinearModel::default()
        }
    }
    pub fn add_variable(&mut self, def: VariableDef) -> VarId {
        self.variables.push(def);
        self.variables.len() - 1
    }
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }
    pub fn variable(&self, var: VarId) -> &VariableDef {
        &self.variables[var]
    }
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
    /// objective to be minimized
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    pub fn num_integer_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.domain == Domain::Binary)
            .count()
    }
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }
    ///
    /// Check bounds, integrality and every constraint for the assignment.
    ///
    pub fn is_feasible(&self, values: &[f64], eps: f64) -> bool {
        values.len() == self.variables.len()
            && self.variables.iter().zip(values).all(|(def, &x)| {
                let in_bounds = x >= def.lower - eps && def.upper.map_or(true, |u| x <= u + eps);
                let integral = def.domain == Domain::Continuous || (x - x.round()).abs() <= eps;
                in_bounds && integral
            })
            && self.constraints.iter().all(|c| c.is_satisfied(values, eps))
    }
}

///
/// Flow formulation of a `FlowNetwork` together with the variable lookup
/// tables needed to read a solution back.
///
#[derive(Debug, Clone)]
pub struct SteinerModel {
    model: LinearModel,
    /// selection variable of each edge
    selection: Vec<VarId>,
    /// flow variable of each arc, then each commodity
    flow: Vec<Vec<VarId>>,
}

impl SteinerModel {
    ///
    /// Assemble variables, objective, conservation and coupling constraints.
    ///
    /// Variables: x per edge (edge order), then f per arc and commodity (arc order).
    /// Constraints: conservation per commodity and node, then coupling per edge
    /// and commodity.
    ///
    pub fn assemble(network: &FlowNetwork) -> SteinerModel {
        let instance = network.instance();
        let mode = network.mode();
        let domain = if mode.is_integral() {
            Domain::Binary
        } else {
            Domain::Continuous
        };
        let label = move |v| instance.label(v);
        let mut model = LinearModel::new(format!("steiner_tree_{}", mode.name()));

        // (1) variables
        let selection: Vec<VarId> = instance
            .edges()
            .map(|(_, s, t, _)| {
                let name = format!("x_{}_{}", label(s), label(t));
                model.add_variable(VariableDef::new(name, domain, 0.0, Some(1.0)))
            })
            .collect();
        let flow: Vec<Vec<VarId>> = network
            .arcs()
            .map(|(_, s, t, _)| {
                network
                    .commodities()
                    .iter()
                    .map(|&k| {
                        let name = format!("f_{}_{}_{}", label(s), label(t), label(k));
                        model.add_variable(VariableDef::new(name, Domain::Continuous, 0.0, None))
                    })
                    .collect()
            })
            .collect();

        // (2) objective
        let mut objective = LinearExpr::with_capacity(selection.len());
        for (e, _, _, w) in instance.edges() {
            objective.add_term(selection[e.index()], w);
        }
        model.set_objective(objective);

        // (3) flow conservation
        for (k, &terminal) in network.commodities().iter().enumerate() {
            for node in instance.nodes() {
                let mut expr = LinearExpr::new();
                for a in network.out_arcs(node).sorted() {
                    expr.add_term(flow[a.index()][k], 1.0);
                }
                for a in network.in_arcs(node).sorted() {
                    expr.add_term(flow[a.index()][k], -1.0);
                }
                let rhs = network.requirement(node, k) as f64;
                let name = format!("conservation_{}_{}", label(node), label(terminal));
                debug!("{}: {} terms = {}", name, expr.terms().len(), rhs);
                model.add_constraint(Constraint::new(name, expr, Sense::Eq, rhs));
            }
        }

        // (4) coupling of flow and selection
        for (e, s, t, _) in instance.edges() {
            for (k, &terminal) in network.commodities().iter().enumerate() {
                let arcs = network.arcs_of_edge(e);
                let mut expr = LinearExpr::with_capacity(arcs.len() + 1);
                for a in arcs {
                    expr.add_term(flow[a.index()][k], 1.0);
                }
                expr.add_term(selection[e.index()], -1.0);
                let name = format!("coupling_{}_{}_{}", label(s), label(t), label(terminal));
                model.add_constraint(Constraint::new(name, expr, Sense::Le, 0.0));
            }
        }

        info!(
            "assembled {}: {} variables ({} integer), {} constraints",
            model.name(),
            model.num_variables(),
            model.num_integer_variables(),
            model.num_constraints()
        );

        SteinerModel {
            model,
            selection,
            flow,
        }
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
    pub fn selection_var(&self, edge: EdgeIndex) -> VarId {
        self.selection[edge.index()]
    }
    pub fn flow_var(&self, arc: ArcIndex, k: CommodityIndex) -> VarId {
        self.flow[arc.index()][k]
    }
    pub fn num_edges(&self) -> usize {
        self.selection.len()
    }
    pub fn num_arcs(&self) -> usize {
        self.flow.len()
    }
}

//
// tests
//
