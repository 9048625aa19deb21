//!
//! Small instances shared by unit tests, integration tests and benchmarks.
//!
use crate::instance::Instance;

///
/// ```text
///        A
///        |
///        B
///      / | \
///     C  D  E
///    /\ /\ /\
///    X  Y  Z     C-{X,Y}, D-{X,Z}, E-{Y,Z}
/// ```
/// unit weights, terminals `A, X, Y, Z`, root `A`.
///
/// Fractional optimum 5.5 (every edge below B at 0.5), integral optimum 6.
///
pub fn mock_gap_example() -> Instance {
    Instance::from_edges(
        &[
            ("A", "B", 1.0),
            ("B", "C", 1.0),
            ("B", "D", 1.0),
            ("B", "E", 1.0),
            ("C", "X", 1.0),
            ("C", "Y", 1.0),
            ("D", "X", 1.0),
            ("D", "Z", 1.0),
            ("E", "Y", 1.0),
            ("E", "Z", 1.0),
        ],
        &["A", "X", "Y", "Z"],
        None,
    )
    .unwrap()
}

///
/// ```text
///     1     2
/// a ---> b ---> c
///  \___________/
///        4
/// ```
/// terminals `a, c`. Optimum 3 through `b`.
///
pub fn mock_shortcut() -> Instance {
    Instance::from_edges(
        &[("a", "b", 1.0), ("b", "c", 2.0), ("a", "c", 4.0)],
        &["a", "c"],
        None,
    )
    .unwrap()
}

///
/// Two components `A - B` and `C - D` with terminals `A, D`.
///
pub fn mock_disconnected() -> Instance {
    Instance::from_edges(&[("A", "B", 1.0), ("C", "D", 1.0)], &["A", "D"], None).unwrap()
}

///
/// The root is the only terminal.
///
pub fn mock_single_terminal() -> Instance {
    Instance::from_edges(&[("a", "b", 1.0)], &["a"], None).unwrap()
}

///
/// Two parallel `a -> b` edges of weight 3 and 1, then `b -> c` of weight 1.
/// Terminals `a, c`. Optimum 2 through the cheaper parallel edge.
///
pub fn mock_parallel_edges() -> Instance {
    Instance::from_edges(
        &[("a", "b", 3.0), ("a", "b", 1.0), ("b", "c", 1.0)],
        &["a", "c"],
        None,
    )
    .unwrap()
}

///
/// `a -> b <- c` with terminals `a, c`: `c` is reachable from the root `a`
/// only against the direction of `c -> b`.
///
pub fn mock_against_direction() -> Instance {
    Instance::from_edges(&[("a", "b", 1.0), ("c", "b", 1.0)], &["a", "c"], None).unwrap()
}

///
/// Skutella's graph: root `r*`, one Steiner node `a_1` and one terminal `a_2`
/// for every non-zero `a` in GF(2)^3. `a_1` is joined to `b_2` iff `a . b = 1`.
/// Unit weights, 35 edges.
///
/// Fractional optimum 8.75 (all edges at 1/4), integral optimum 10.
///
pub fn mock_skutella() -> Instance {
    let vectors = ["001", "010", "011", "100", "101", "110", "111"];
    let bits = |s: &str| u8::from_str_radix(s, 2).unwrap_or(0);
    let mut edges: Vec<(String, String, f64)> = Vec::new();
    for a in vectors.iter() {
        edges.push(("r*".to_string(), format!("{}_1", a), 1.0));
    }
    for a in vectors.iter() {
        for b in vectors.iter() {
            if (bits(a) & bits(b)).count_ones() % 2 == 1 {
                edges.push((format!("{}_1", a), format!("{}_2", b), 1.0));
            }
        }
    }
    let terminals: Vec<String> = vectors.iter().map(|a| format!("{}_2", a)).collect();
    Instance::from_edges(&edges, &terminals, Some("r*")).unwrap()
}

/// `mock_shortcut` in the instance file format, with unrelated lines interleaved
pub const MOCK_SHORTCUT_STP: &str = "33D32945 STP File, STP Format Version 1.0

SECTION Comment
Name \"shortcut\"
E 9 9 9
END

SECTION Graph
Nodes 3
Edges 3
E 1 2 1
# comment inside the graph section
E 2 3 2
E 1 3 4
END

SECTION Terminals
Terminals 2
T 1
T 3
END

EOF
";
