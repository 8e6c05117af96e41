// Command-line entry point for jstrace.

use anyhow::{Context, Result};
use clap::Parser;
use jstrace::{init_tracing, transform_file, InstrumentOptions, SourceKind};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Instruments a JavaScript file to trace its execution"
)]
struct Cli {
    /// Input file name
    #[arg(short, long)]
    input: PathBuf,

    /// Output file name
    #[arg(short, long)]
    output: PathBuf,

    /// JSON options file (hooks, sourceKind, jsx)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Entry hook identifier
    #[arg(long)]
    entry_hook: Option<String>,

    /// Exit hook identifier
    #[arg(long)]
    exit_hook: Option<String>,

    /// Parse the input as an ES module
    #[arg(long)]
    module: bool,

    /// Accept JSX syntax
    #[arg(long)]
    jsx: bool,

    /// Write a JSON report of the instrumented functions
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Result<InstrumentOptions> {
        let mut options = match &self.config {
            Some(path) => InstrumentOptions::from_json_file(path)?,
            None => InstrumentOptions::default(),
        };
        if let Some(entry) = &self.entry_hook {
            options.hooks.entry = entry.clone();
        }
        if let Some(exit) = &self.exit_hook {
            options.hooks.exit = exit.clone();
        }
        if self.module {
            options.source_kind = SourceKind::Module;
        }
        options.jsx |= self.jsx;
        Ok(options)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options()?;

    let report = transform_file(&cli.input, &cli.output, &options)
        .with_context(|| format!("failed to instrument {}", cli.input.display()))?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    run(&Cli::parse())
}
