//! `ross-sections`: print every conflict-free schedule for a catalog.

use anyhow::{Context, Result};
use clap::Parser;
use ross_sections::catalog::{self, snapshot};
use ross_sections::config::{OutputFormat, SolverConfig};
use ross_sections::export;
use ross_sections::telemetry::init_tracing;
use ross_sections::{Catalog, CatalogIndex, Coverage, Solution, Solver};
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "ross-sections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Enumerate conflict-free course schedules", long_about = None)]
struct Cli {
    /// Catalog file (.json registrar response, .xlsx sheet, .bin snapshot);
    /// the built-in sample catalog when omitted
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Lecture section / course ids to schedule (default: all)
    #[arg(short, long = "want", value_name = "COURSE_ID")]
    want: Vec<u64>,

    /// Solver configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report the schedules with the most courses instead of only full ones
    #[arg(long)]
    best: bool,

    /// Allow taking a course without one of its offered labs
    #[arg(long)]
    optional_labs: bool,

    /// Stop after this many schedules
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Output format for stdout
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also write the schedules to an xlsx workbook
    #[arg(long, value_name = "PATH")]
    xlsx: Option<PathBuf>,

    /// Save the loaded catalog as a binary snapshot
    #[arg(long, value_name = "PATH")]
    save_snapshot: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { Level::DEBUG } else { Level::INFO });

    let mut config = match &cli.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if cli.best {
        config.search.coverage = Coverage::Best;
    }
    if cli.optional_labs {
        config.search.optional_labs = true;
    }
    if cli.limit.is_some() {
        config.search.max_solutions = cli.limit;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let catalog = match &cli.catalog {
        Some(path) => catalog::load_path(path, &cli.want)?,
        None => Catalog::sample(),
    };
    if let Some(path) = &cli.save_snapshot {
        snapshot::save_snapshot(&catalog, path)?;
        info!(path = %path.display(), "saved catalog snapshot");
    }

    let mut index = CatalogIndex::build(&catalog);
    if !cli.want.is_empty() {
        index = index.restrict(&cli.want)?;
    }
    info!(meetings = catalog.len(), courses = index.len(), "searching");

    let solver = Solver::new(&catalog, &index, config.search.clone())?;
    let keep_all = config.output.format == OutputFormat::Json || cli.xlsx.is_some();
    let mut kept: Vec<Solution> = Vec::new();
    let mut write_error: Option<io::Error> = None;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    solver.solve_with(|solution| {
        if config.output.format == OutputFormat::Text {
            if let Err(e) = export::write_solution(&mut out, solution) {
                write_error = Some(e);
                return ControlFlow::Break(());
            }
        }
        if keep_all {
            kept.push(solution.clone());
        }
        ControlFlow::Continue(())
    });
    if let Some(e) = write_error {
        return Err(anyhow::Error::new(e).context("failed to write schedules"));
    }

    if config.output.format == OutputFormat::Json {
        writeln!(out, "{}", export::render_json(&kept)?)?;
    }
    out.flush()?;

    if let Some(path) = &cli.xlsx {
        export::write_workbook(&kept, path).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), schedules = kept.len(), "wrote workbook");
    }
    Ok(())
}
