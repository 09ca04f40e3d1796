//! Recell - reactive cell grid from the command line.
//!
//! Loads initial inputs, applies edits in order with full propagation, and
//! prints the resulting grid.

mod config;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use recell_core::storage::{parse_grd, write_markdown};
use recell_core::{CellRef, GridSize, Sheet};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "recell")]
#[command(about = "Reactive cell grid with formula propagation and cycle detection")]
#[command(version)]
struct Cli {
    /// Initial inputs (.grd: one `KEY: INPUT` per line)
    file: Option<PathBuf>,

    /// Edit to apply after loading, as KEY=INPUT (e.g. -e 'B1==A1+1'); repeatable
    #[arg(short, long = "edit", value_name = "KEY=INPUT", value_parser = parse_edit)]
    edits: Vec<(CellRef, String)>,

    /// File of edits to apply after -e edits (.grd format, applied in order)
    #[arg(long, value_name = "FILE")]
    edits_file: Option<PathBuf>,

    /// Number of columns (overrides config)
    #[arg(long)]
    columns: Option<usize>,

    /// Number of rows (overrides config)
    #[arg(long)]
    rows: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Config file (defaults to config.toml in the user config dir)
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore the user config file
    #[arg(long)]
    no_config: bool,

    /// Exit with status 1 if any cell ends in formula-error
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

fn parse_edit(arg: &str) -> Result<(CellRef, String), String> {
    let (key, input) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=INPUT, got '{}'", arg))?;
    let key = key.trim().to_ascii_uppercase();
    let cell_ref = key.parse::<CellRef>()?;
    Ok((cell_ref, input.to_string()))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, warnings) = config::load_config(cli.config.as_deref(), cli.no_config);
    for warning in warnings {
        tracing::warn!("{}", warning);
    }

    let size = GridSize::new(
        cli.columns.unwrap_or(config.grid.columns),
        cli.rows.unwrap_or(config.grid.rows),
    );

    let mut sheet = match &cli.file {
        Some(path) => Sheet::load_file(size, path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Sheet::new(size)?,
    };

    sheet.edit_cells(&cli.edits)?;

    if let Some(path) = &cli.edits_file {
        let edits =
            parse_grd(path).with_context(|| format!("Failed to read edits {}", path.display()))?;
        sheet.edit_cells(&edits)?;
    }

    let mut stdout = std::io::stdout().lock();
    match cli.format {
        Format::Markdown => write_markdown(&mut stdout, &sheet)?,
        Format::Json => {
            let views: Vec<_> = sheet.views().collect();
            serde_json::to_writer_pretty(&mut stdout, &views)?;
            writeln!(stdout)?;
        }
    }

    if cli.strict && sheet.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
