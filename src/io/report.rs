//!
//! Human readable and JSON reports of a `SteinerSolution`
//!
//! ```text
//! Fractional Solution:
//! Status: Optimal
//!
//! Edge weights (fractional solution):
//! (A, B): 1.00
//! (B, C): 0.50
//!
//! Total fractional cost of the resultant Steiner Tree: 5.50
//! ```
//!
use crate::solve::SteinerSolution;
use std::fmt;

/// decimal places used when the formatter does not specify a precision
pub const DEFAULT_PRECISION: usize = 2;

/// `{:.4}` sets the number of decimal places of edge values and the cost.
impl fmt::Display for SteinerSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_PRECISION);
        let mode = self.mode();
        writeln!(f, "{} Solution:", mode.title())?;
        writeln!(f, "Status: {}", self.status())?;
        writeln!(f)?;
        writeln!(f, "Edge weights ({} solution):", mode.name())?;
        for e in self.selected_edges() {
            writeln!(
                f,
                "({}, {}): {:.*}",
                e.source, e.target, precision, e.value
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "Total {} cost of the resultant Steiner Tree: {:.*}",
            mode.name(),
            precision,
            self.objective()
        )
    }
}

/// JSON object with mode, status, objective and the selected edges
pub fn to_json(solution: &SteinerSolution) -> serde_json::Result<String> {
    serde_json::to_string_pretty(solution)
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::mock_shortcut;
    use crate::network::Mode;
    use crate::solve::{solve, SolveConfig};
    use crate::solver::MicroLp;

    #[test]
    fn text_report() {
        let instance = mock_shortcut();
        let s = solve(&instance, Mode::Integral, &MicroLp, &SolveConfig::default()).unwrap();
        let text = format!("{}", s);
        let expected = "Integral Solution:\n\
                        Status: Optimal\n\
                        \n\
                        Edge weights (integral solution):\n\
                        (a, b): 1.00\n\
                        (b, c): 1.00\n\
                        \n\
                        Total integral cost of the resultant Steiner Tree: 3.00";
        assert_eq!(text, expected);
        let text = format!("{:.4}", s);
        assert!(text.ends_with("Steiner Tree: 3.0000"));
        assert!(text.contains("(a, b): 1.0000\n"));
    }

    #[test]
    fn json_report() {
        let instance = mock_shortcut();
        let s = solve(&instance, Mode::Fractional, &MicroLp, &SolveConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_json(&s).unwrap()).unwrap();
        assert_eq!(value["mode"], "fractional");
        assert_eq!(value["status"], "optimal");
        assert!((value["objective"].as_f64().unwrap() - 3.0).abs() < 1e-6);
        let selected = value["selected"].as_array().unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0]["source"], "a");
        assert_eq!(selected[0]["target"], "b");
        assert_eq!(selected[1]["weight"], 2.0);
        assert!(value.get("selection").is_none());
    }
}
