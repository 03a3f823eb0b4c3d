use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::Context;
use clap::{builder::RangedU64ValueParser, Parser, Subcommand};
use gatesim::{
    config::{SimulationConfig, DEFAULT_MAX_PROPAGATION_DEPTH},
    import,
    interpreter::Interpreter,
    simulation::{Circuit, GateKindTable},
    table,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gatesim")]
#[command(about = "Zero-delay simulator for small combinational logic circuits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a command script against a new circuit
    Run {
        /// Script to read commands from. Standard input when omitted.
        file: Option<PathBuf>,

        /// JSON netlist loaded into the circuit before the script runs
        #[arg(long)]
        netlist: Option<PathBuf>,

        /// Deepest cascade a single drive may cause before it is reported as cyclic
        #[arg(
            long,
            env = "GATESIM_MAX_DEPTH",
            default_value_t = DEFAULT_MAX_PROPAGATION_DEPTH,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        max_depth: usize,

        /// Propagate without any depth limit
        #[arg(long)]
        no_depth_limit: bool,
    },

    /// Print the truth table of a gate kind
    Table {
        /// Kind name, e.g. AND or 1BitComparator
        kind: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run { file, netlist, max_depth, no_depth_limit } => {
            let config = if no_depth_limit {
                SimulationConfig::default().without_depth_limit()
            } else {
                SimulationConfig::default().with_max_propagation_depth(max_depth)
            };
            run(Circuit::new(config), file, netlist)
        }
        Commands::Table { kind } => {
            let table = table::truth_table(&GateKindTable::standard(), &kind)?;
            print!("{table}");
            Ok(())
        }
    }
}

fn run(mut circuit: Circuit, file: Option<PathBuf>, netlist: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(netlist) = netlist {
        import::import(&netlist, &mut circuit).with_context(|| format!("failed to import netlist {}", netlist.display()))?;
    }

    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut circuit, stdout.lock());
    let summary = match file {
        Some(path) => {
            let script = File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
            interpreter.run(&path.display().to_string(), BufReader::new(script))?
        }
        None => interpreter.run("<stdin>", io::stdin().lock())?,
    };

    if !summary.errors.is_empty() {
        tracing::warn!(errors = summary.errors.len(), "some commands failed");
    }
    Ok(())
}
