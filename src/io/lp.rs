//!
//! CPLEX LP text format writer for `LinearModel`
//!
//! The written file can be handed to external solvers (CBC, HiGHS, Gurobi, ...)
//! to cross-check the built-in backend.
//!
use crate::model::{Domain, LinearExpr, LinearModel, Sense};
use std::collections::HashSet;
use std::io::{self, Write};

/// terms per output line; LP readers limit the line length
const TERMS_PER_LINE: usize = 8;

///
/// Names usable in LP files: `[A-Za-z0-9_]` only, not starting with a digit,
/// unique within the model.
///
fn lp_names(model: &LinearModel) -> Vec<String> {
    let mut used = HashSet::with_capacity(model.num_variables());
    model
        .variables()
        .iter()
        .enumerate()
        .map(|(i, def)| {
            let base = sanitize(&def.name);
            let mut name = base.clone();
            let mut suffix = i;
            while !used.insert(name.clone()) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

fn sanitize(name: &str) -> String {
    let mut s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

fn write_expr<W: Write>(writer: &mut W, expr: &LinearExpr, names: &[String]) -> io::Result<()> {
    if expr.is_empty() {
        // a constant row still needs one term
        return match names.first() {
            Some(name) => write!(writer, " 0 {}", name),
            None => Ok(()),
        };
    }
    for (i, &(var, coef)) in expr.terms().iter().enumerate() {
        if i > 0 && i % TERMS_PER_LINE == 0 {
            write!(writer, "\n   ")?;
        }
        let sign = if coef < 0.0 { '-' } else { '+' };
        if i == 0 && sign == '+' {
            write!(writer, " {} {}", coef.abs(), names[var])?;
        } else {
            write!(writer, " {} {} {}", sign, coef.abs(), names[var])?;
        }
    }
    Ok(())
}

///
/// Write the model as a minimization problem in LP format.
///
pub fn write_lp<W: Write>(writer: &mut W, model: &LinearModel) -> io::Result<()> {
    let names = lp_names(model);

    writeln!(writer, "\\ Problem: {}", model.name())?;
    writeln!(writer, "Minimize")?;
    write!(writer, " obj:")?;
    write_expr(writer, model.objective(), &names)?;
    writeln!(writer)?;

    writeln!(writer, "Subject To")?;
    for (i, c) in model.constraints().iter().enumerate() {
        write!(writer, " c{}_{}:", i, sanitize(&c.name))?;
        write_expr(writer, &c.expr, &names)?;
        let sense = match c.sense {
            Sense::Eq => "=",
            Sense::Le => "<=",
            Sense::Ge => ">=",
        };
        writeln!(writer, " {} {}", sense, c.rhs)?;
    }

    writeln!(writer, "Bounds")?;
    for (def, name) in model.variables().iter().zip(&names) {
        match def.upper {
            Some(upper) => writeln!(writer, " {} <= {} <= {}", def.lower, name, upper)?,
            None => writeln!(writer, " {} >= {}", name, def.lower)?,
        }
    }

    let binaries: Vec<&String> = model
        .variables()
        .iter()
        .zip(&names)
        .filter(|(def, _)| def.domain == Domain::Binary)
        .map(|(_, name)| name)
        .collect();
    if !binaries.is_empty() {
        writeln!(writer, "Binaries")?;
        for name in binaries {
            writeln!(writer, " {}", name)?;
        }
    }
    writeln!(writer, "End")
}

/// LP text of the model
pub fn to_lp_string(model: &LinearModel) -> String {
    let mut buf = Vec::new();
    // writing into a Vec<u8> cannot fail
    let _ = write_lp(&mut buf, model);
    String::from_utf8_lossy(&buf).into_owned()
}

//
// tests
//
