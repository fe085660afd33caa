//! LabSim - Electrical Engineering Lab Simulator
//!
//! Runs one experiment headlessly and prints its samples as CSV.
//!
//! # Usage
//!
//! ```bash
//! labsim ohms_law -p Vs=12 -p R=4.7k --ticks 10
//! labsim diode_iv --sweep Vs --from -2 --to 5 --steps 141 > iv.csv
//! RUST_LOG=labsim_core=debug labsim waveform -p shape=custom --expr "A*sin(w*t)^3"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::de::DeserializeOwned;

use labsim_core::{
    engine::SweepRange,
    error::{LabSimError, Result},
    output::CsvOutput,
    Params, Registry, Simulator, SimulatorConfig,
};

/// Electrical engineering lab simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario id (see --list)
    #[arg(value_name = "SCENARIO", required_unless_present = "list")]
    scenario: Option<String>,

    /// Number of steps to run in continuous mode
    #[arg(short, long, default_value_t = 50)]
    ticks: usize,

    /// Elapsed seconds per step
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Parameter assignment, e.g. -p R=4.7k (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// JSON object of parameters, applied before -p assignments
    #[arg(long = "params", value_name = "FILE")]
    params_file: Option<PathBuf>,

    /// Sweep a parameter instead of running continuously. Without a value,
    /// sweeps the scenario's default parameter
    #[arg(long, value_name = "PARAM", num_args = 0..=1, default_missing_value = "")]
    sweep: Option<String>,

    /// Sweep start value
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    from: f64,

    /// Sweep end value
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    to: f64,

    /// Number of sweep points
    #[arg(long, default_value_t = 101)]
    steps: usize,

    /// Simulator configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom waveform expression
    #[arg(long = "expr", value_name = "EXPR")]
    expression: Option<String>,

    /// List the available scenarios and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labsim_core=info,labsim=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.list {
        list_scenarios();
        return Ok(());
    }

    let scenario = args.scenario.as_deref().unwrap_or_default();

    let config = match &args.config {
        Some(path) => load_json::<SimulatorConfig>(path)?,
        None => SimulatorConfig::default(),
    };
    config.validate()?;

    // Build the parameter set
    let mut params = match &args.params_file {
        Some(path) => load_json::<Params>(path)?,
        None => Params::new(),
    };
    for assignment in &args.params {
        let (key, value) = Params::parse_assignment(assignment)?;
        params.set(&key, value);
    }

    let mut simulator = Simulator::with_config(scenario, config);
    simulator.replace_params(params);

    if let Some(expression) = &args.expression {
        simulator.set_expression(expression)?;
    }

    let mut out = CsvOutput::stdout();

    match &args.sweep {
        Some(param) => {
            let range = if param.is_empty() {
                simulator.default_sweep(args.from, args.to, args.steps)?
            } else {
                SweepRange::new(param.as_str(), args.from, args.to, args.steps)?
            };
            let param = range.param().to_string();
            let steps = range.steps();
            simulator.start_sweep(range);
            for _ in 0..steps {
                simulator.step(args.dt);
            }
            let curve = simulator.stop_sweep().unwrap_or_default();
            out.write_curve(&param, &curve)?;
        }
        None => {
            let entry = *simulator.entry();
            out.write_header(&entry)?;
            for _ in 0..args.ticks {
                if let Some(sample) = simulator.step(args.dt) {
                    out.write_sample(&entry, sample)?;
                }
            }
        }
    }

    out.flush()?;
    tracing::info!(scenario, rows = out.rows(), "done");

    Ok(())
}

fn list_scenarios() {
    for entry in Registry::builtin().entries() {
        println!("{:<24} {}", entry.id, entry.title);
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| LabSimError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
