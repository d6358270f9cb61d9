use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

mod output;
mod sweep;

use output::OutputFormat;
use sweep::{Function, Row, SweepSpec};

/// Print reference tables for the fixed-point functions
///
/// Each sweep evaluates one function over an arithmetic progression of raw
/// inputs and prints the raw result next to an f64 reference.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Print a SHA-256 digest of the raw outputs after the table
    #[arg(long, default_value_t = false, global = true)]
    digest: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep a single function
    Sweep(SweepArgs),
    /// Run every sweep listed in a JSON plan file
    Plan {
        /// JSON array of sweep specifications
        path: PathBuf,
    },
    /// Run the default sweep of every function
    All,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Function to evaluate
    #[arg(value_enum)]
    function: Function,

    /// First raw input (defaults per function)
    #[arg(long, allow_hyphen_values = true)]
    start: Option<i32>,

    /// Increment between raw inputs (defaults per function)
    #[arg(long, allow_hyphen_values = true)]
    step: Option<i32>,

    /// Number of inputs
    #[arg(long, default_value_t = 16)]
    count: usize,

    /// Exponent for the power-of-two operations
    #[arg(long, allow_hyphen_values = true)]
    exponent: Option<i32>,

    /// Integer bits of the exp_negative input format
    #[arg(long)]
    integer_bits: Option<i32>,

    /// First raw value of the second operand (binary functions)
    #[arg(long, allow_hyphen_values = true)]
    second_start: Option<i32>,

    /// Increment of the second operand (binary functions)
    #[arg(long, allow_hyphen_values = true)]
    second_step: Option<i32>,

    /// Value selected where the mask bit is set
    #[arg(long, default_value_t = 100, allow_hyphen_values = true)]
    then_val: i32,

    /// Value selected where the mask bit is clear
    #[arg(long, default_value_t = 200, allow_hyphen_values = true)]
    else_val: i32,
}

impl From<SweepArgs> for SweepSpec {
    fn from(args: SweepArgs) -> Self {
        SweepSpec {
            function: args.function,
            start: args.start,
            step: args.step,
            count: args.count,
            exponent: args.exponent,
            integer_bits: args.integer_bits,
            second_start: args.second_start,
            second_step: args.second_step,
            then_val: args.then_val,
            else_val: args.else_val,
        }
    }
}

fn load_plan(path: &Path) -> Result<Vec<SweepSpec>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read plan {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid plan {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let specs = match cli.command {
        Command::Sweep(args) => vec![SweepSpec::from(args)],
        Command::Plan { path } => load_plan(&path)?,
        Command::All => Function::ALL.iter().map(|&f| SweepSpec::new(f)).collect(),
    };
    info!("running {} sweep(s)", specs.len());

    let mut all_rows: Vec<Row> = Vec::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for spec in &specs {
        let rows = sweep::run_sweep(spec)?;
        output::write_rows(&mut out, &rows, cli.format)?;
        all_rows.extend(rows);
    }

    if cli.digest {
        let digest = output::digest(&all_rows);
        match cli.format {
            OutputFormat::Text => writeln!(out, "# sha256 {}", digest)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::json!({ "sha256": digest }))?,
        }
    }
    info!("{} row(s) written", all_rows.len());
    Ok(())
}
