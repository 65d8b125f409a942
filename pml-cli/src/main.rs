//! Command-line front end for PML documents.
//!
//! Usage:
//!   pml check <file>                      - Parse and report the specification count
//!   pml dump <file> [--format pml|json]   - Print the parsed specifications
//!   pml run <file> [--cycles N]           - Poll the document against simulated devices

mod simulated;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pml_parser::{parse_with, serialize, ParseOptions, PipelineSpecification};
use pml_pipeline::Poller;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "pml", version, about = "Check, dump and run PML pipeline documents")]
struct Cli {
    /// Log at debug level (PML_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Filter for the first process of a set that declares none
    #[arg(long, global = true, default_value = "changed")]
    default_filter: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a document and report how many specifications it holds
    Check { file: PathBuf },
    /// Print the parsed specifications
    Dump {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Pml)]
        format: Format,
    },
    /// Bind a document to simulated devices and poll it
    Run {
        file: PathBuf,
        #[arg(short, long, default_value_t = 10)]
        cycles: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pml,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// `PML_LOG` takes precedence; otherwise `warn`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("PML_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let options = ParseOptions::default().with_default_filter(cli.default_filter);

    match cli.command {
        Command::Check { file } => {
            let specs = load(&file, &options)?;
            println!("{}: {} specification(s)", file.display(), specs.len());
        }
        Command::Dump { file, format } => {
            let specs = load(&file, &options)?;
            match format {
                Format::Pml => print!("{}", serialize(&specs)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&specs)?),
            }
        }
        Command::Run { file, cycles } => {
            let specs = load(&file, &options)?;
            run(&specs, cycles)?;
        }
    }
    Ok(())
}

fn load(path: &Path, options: &ParseOptions) -> Result<Vec<PipelineSpecification>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let specs =
        parse_with(&text, options).with_context(|| format!("cannot parse {}", path.display()))?;
    debug!(path = %path.display(), count = specs.len(), "document parsed");
    Ok(specs)
}

fn run(specs: &[PipelineSpecification], cycles: u64) -> Result<()> {
    let clock = simulated::Clock::default();
    let binder = simulated::binder(&clock, specs.iter().map(|spec| spec.callback()))?;
    let mut poller = Poller::bind(&binder, specs)?;
    info!(bindings = poller.len(), cycles, "polling");

    let mut forwarded = 0;
    for cycle in 0..cycles {
        let count = poller
            .poll()
            .with_context(|| format!("cycle {cycle} failed"))?;
        forwarded += count;
        clock.tick();
    }
    println!("{cycles} cycle(s), {forwarded} sample(s) forwarded");
    Ok(())
}
