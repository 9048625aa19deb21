//! Solve Steiner tree instance files with the flow formulation.
//! Results (and per-file errors) go to stdout, logs to stderr (`RUST_LOG`).

use clap::Parser;
use log::{info, warn};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use steinerflow::io::{load_instance, lp::to_lp_string, report, write_string};
use steinerflow::model::SteinerModel;
use steinerflow::solve::DEFAULT_SELECTION_THRESHOLD;
use steinerflow::{
    available_solvers, solve_all, solver_by_name, FlowNetwork, Instance, Mode, SolveConfig, Solver,
};

/// `--mode` values; `all` expands to every formulation
#[derive(Debug, Copy, Clone, PartialEq)]
enum ModeArg {
    One(Mode),
    All,
}

impl FromStr for ModeArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(ModeArg::All)
        } else {
            s.parse().map(ModeArg::One)
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Opts {
    /// Instance files (SECTION Graph / SECTION Terminals format)
    instances: Vec<PathBuf>,
    /// fractional, integral, relaxation or all (default: fractional and integral)
    #[clap(short, long = "mode")]
    modes: Vec<ModeArg>,
    /// Decimal places of reported values
    #[clap(short, long, default_value_t = 2)]
    precision: usize,
    /// Edges with a selection value above this are reported
    #[clap(long, default_value_t = DEFAULT_SELECTION_THRESHOLD)]
    threshold: f64,
    /// Print each solution as JSON
    #[clap(long)]
    json: bool,
    /// Write the assembled models as `<instance>.<mode>.lp` into this directory
    #[clap(long)]
    write_lp: Option<PathBuf>,
    /// LP/MIP backend: microlp, or cbc when built with the `cbc` feature
    #[clap(long, default_value = "microlp")]
    solver: String,
}

impl Opts {
    fn modes(&self) -> Vec<Mode> {
        if self.modes.is_empty() {
            return vec![Mode::Fractional, Mode::Integral];
        }
        let mut modes = Vec::new();
        for arg in &self.modes {
            let expanded = match arg {
                ModeArg::One(mode) => vec![*mode],
                ModeArg::All => vec![Mode::Fractional, Mode::Integral, Mode::UndirectedRelaxation],
            };
            for mode in expanded {
                if !modes.contains(&mode) {
                    modes.push(mode);
                }
            }
        }
        modes
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };
    if opts.instances.is_empty() {
        println!("usage: steinerflow [OPTIONS] <INSTANCE>...");
        println!("  see `steinerflow --help` for the options");
        std::process::exit(1);
    }

    let solver = match solver_by_name(&opts.solver) {
        Some(solver) => solver,
        None => {
            println!(
                "unknown solver {}, available: {}",
                opts.solver,
                available_solvers().join(", ")
            );
            std::process::exit(1);
        }
    };
    let config = SolveConfig::new(opts.threshold);
    let modes = opts.modes();
    info!("opts={:?} modes={:?}", opts, modes);

    for path in &opts.instances {
        if let Err(err) = run_instance(path, &modes, solver.as_ref(), &config, &opts) {
            println!("{}: {}", path.display(), err);
        }
    }
}

/// Solve one instance file in every mode; solver failures are reported, not returned.
fn run_instance(
    path: &Path,
    modes: &[Mode],
    solver: &dyn Solver,
    config: &SolveConfig,
    opts: &Opts,
) -> Result<(), Box<dyn Error>> {
    let instance = load_instance(path)?;
    let name = path.file_name().map_or_else(
        || path.display().to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    if !opts.json {
        println!(
            "{}: {} nodes, {} edges, {} terminals",
            name,
            instance.num_nodes(),
            instance.num_edges(),
            instance.num_terminals()
        );
    }
    if let Some(dir) = &opts.write_lp {
        write_models(dir, &name, &instance, modes)?;
    }

    for (mode, result) in solve_all(&instance, modes, solver, config) {
        match result {
            Ok(solution) if opts.json => println!("{}", report::to_json(&solution)?),
            Ok(solution) => println!("\n{:.*}", opts.precision, solution),
            Err(err) => println!("\n{} solve of {} failed: {}", mode, name, err),
        }
    }
    Ok(())
}

fn write_models(dir: &Path, name: &str, instance: &Instance, modes: &[Mode]) -> Result<(), Box<dyn Error>> {
    for &mode in modes {
        let network = match FlowNetwork::new(instance, mode) {
            Ok(network) => network,
            Err(err) => {
                warn!("{}: no {} model written: {}", name, mode, err);
                continue;
            }
        };
        let sm = SteinerModel::assemble(&network);
        let path = dir.join(format!("{}.{}.lp", name, mode.name()));
        write_string(&path, &to_lp_string(sm.model()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
