use std::fs;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use eb_chart::{
    chart_spec_for, classify, parse_table, row_kind, ChartConfig, RowKind, Selection, Table,
    MAX_SELECTED,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Energy breakdown chart CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the chart specification JSON for a breakdown CSV
    Spec(SpecArgs),
    /// Inspect a breakdown CSV and report how its rows classify
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SpecArgs {
    /// Breakdown CSV to ingest
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output JSON path (`-` for stdout)
    #[arg(
        short,
        long,
        default_value = "chart_spec.json",
        value_hint = ValueHint::FilePath
    )]
    output: PathBuf,

    /// Configuration columns to plot, comma separated (defaults to all,
    /// capped at 32)
    #[arg(long)]
    columns: Option<String>,

    /// Verbose logging with stage timings
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Breakdown CSV to inspect
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Optional classification report CSV path
    #[arg(long, value_hint = ValueHint::FilePath)]
    report: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match &cli.command {
        Command::Spec(args) => {
            if args.verbose {
                "debug"
            } else {
                "info"
            }
        }
        Command::Inspect(args) => {
            if args.verbose {
                "debug"
            } else {
                "info"
            }
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Spec(args) => handle_spec(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn load_table(path: &Path) -> Result<Table> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_table(&data).with_context(|| format!("failed to parse {}", path.display()))
}

fn handle_spec(args: SpecArgs) -> Result<()> {
    let t_parse = Instant::now();
    let table = load_table(&args.input)?;
    if args.verbose {
        info!(
            "Parse stage: {:.1} ms ({} rows, {} columns)",
            t_parse.elapsed().as_secs_f64() * 1000.0,
            table.rows.len(),
            table.columns.len()
        );
    }

    let config = ChartConfig::default();
    let selection = match args.columns.as_ref() {
        Some(list) => parse_column_list(list, &table)?,
        None => Selection::all_of(&table.columns),
    };
    info!(
        "Plotting {} of {} configuration columns",
        selection.len(),
        table.columns.len()
    );

    let classified = classify(&table, &config);
    for extra in &classified.extras {
        warn!(
            "Unrecognized row label '{}'; stacked after canonical components",
            extra
        );
    }

    let t_assemble = Instant::now();
    let spec = chart_spec_for(&table, selection.columns(), &config);
    if args.verbose {
        info!(
            "Assemble stage: {:.1} ms ({} traces)",
            t_assemble.elapsed().as_secs_f64() * 1000.0,
            spec.traces.len()
        );
    }

    let json = serde_json::to_string_pretty(&spec)?;
    if args.output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(json.as_bytes())?;
        handle.write_all(b"\n")?;
    } else {
        fs::write(&args.output, json)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!("Wrote chart spec: {}", args.output.display());
    }
    Ok(())
}

fn parse_column_list(list: &str, table: &Table) -> Result<Selection> {
    let mut wanted = Vec::new();
    for token in list.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !table.columns.iter().any(|c| c == token) {
            return Err(anyhow!(
                "unknown column '{}' (available: {})",
                token,
                table.columns.join(", ")
            ));
        }
        wanted.push(token.to_string());
    }
    if wanted.is_empty() {
        return Err(anyhow!("--columns list was empty"));
    }
    if wanted.len() > MAX_SELECTED {
        warn!(
            "--columns lists {} columns; keeping the first {}",
            wanted.len(),
            MAX_SELECTED
        );
    }
    Ok(Selection::from_columns(wanted))
}

fn handle_inspect(args: InspectArgs) -> Result<()> {
    let table = load_table(&args.input)?;
    let config = ChartConfig::default();
    let classified = classify(&table, &config);

    println!("label column: {}", table.label_column);
    println!("configuration columns ({}):", table.columns.len());
    for column in &table.columns {
        println!("  {column}");
    }
    println!("stacked components ({}):", classified.component_rows.len());
    for name in &classified.component_rows {
        let tag = match row_kind(name, &config) {
            RowKind::Recognized => "canonical",
            _ => "extra",
        };
        println!("  {name} [{tag}]");
    }
    match classified.emissions_row.as_deref() {
        Some(name) => println!("emissions row: {name}"),
        None => println!("emissions row: (absent)"),
    }
    let has_total = table.rows.iter().any(|r| r.label == config.total_row);
    println!(
        "total row: {}",
        if has_total {
            "present (dropped from output)"
        } else {
            "(absent)"
        }
    );

    for extra in &classified.extras {
        warn!("Unrecognized row label '{}'", extra);
    }

    if let Some(path) = args.report.as_ref() {
        write_report_csv(&table, &config, path)?;
        info!("Wrote classification report: {}", path.display());
    }
    Ok(())
}

fn write_report_csv(table: &Table, config: &ChartConfig, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["label", "kind", "color"])?;
    for row in &table.rows {
        let kind = match row_kind(&row.label, config) {
            RowKind::Total => "total",
            RowKind::Emissions => "emissions",
            RowKind::Recognized => "component",
            RowKind::Extra => "extra",
        };
        writer.write_record([row.label.as_str(), kind, config.color_for(&row.label)])?;
    }
    writer.flush()?;
    Ok(())
}
