//! Reserve Study CLI
//!
//! Command-line interface for running reserve fund projections

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use reserve_study::inventory::loader::{load_component_records_json, read_component_records};
use reserve_study::projection::{ContributionFloor, InterestTreatment, ScheduleMode};
use reserve_study::{FundingPolicy, ProjectionResult, StudyRequest, StudyRunner};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Funding goals and yearly table for the terminal
    Table,
    /// Full projection result
    Json,
    /// Yearly rows only
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "reserve_study", version, about = "Project reserve fund balances for a SIRS")]
struct Cli {
    /// JSON study request with components, financial and optional config
    #[arg(long, conflicts_with = "components")]
    request: Option<PathBuf>,

    /// Component inventory (.csv, or .json array of records)
    #[arg(long)]
    components: Option<PathBuf>,

    /// Reserve balance at the start of the projection
    #[arg(long)]
    starting_balance: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    years: Option<u32>,

    /// Calendar year of the first projected year (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,

    /// Annual interest rate on the reserve balance (decimal, e.g. 0.02)
    #[arg(long)]
    interest_rate: Option<f64>,

    /// Contribution the association currently budgets
    #[arg(long)]
    current_contribution: Option<f64>,

    /// Credit interest to balances each year
    #[arg(long)]
    compound_interest: bool,

    /// Re-schedule components every useful life inside the horizon
    #[arg(long)]
    recurring: bool,

    /// Report negative contributions instead of flooring them at zero
    #[arg(long)]
    no_floor: bool,

    /// Threshold target as a fraction of the fully funded balance
    #[arg(long)]
    threshold_ratio: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// CSV layout of the yearly table
#[derive(Debug, Serialize)]
struct CsvYearRow {
    year: u32,
    calendar_year: Option<i32>,
    expenditures: f64,
    baseline_balance: f64,
    threshold_balance: f64,
    fully_funded_balance: f64,
    current_balance: Option<f64>,
}

fn read_request(cli: &Cli) -> Result<StudyRequest> {
    let mut request = if let Some(path) = &cli.request {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
    } else if let Some(path) = &cli.components {
        StudyRequest {
            components: read_inventory(path)?,
            ..Default::default()
        }
    } else {
        bail!("either --request or --components is required");
    };

    let financial = &mut request.financial;
    if cli.starting_balance.is_some() {
        financial.starting_balance = cli.starting_balance;
    }
    if cli.years.is_some() {
        financial.projection_years = cli.years;
    }
    if cli.interest_rate.is_some() {
        financial.interest_rate = cli.interest_rate;
    }
    if cli.current_contribution.is_some() {
        financial.current_contribution = cli.current_contribution;
    }
    financial.start_year = cli
        .start_year
        .or(financial.start_year)
        .or_else(|| Some(chrono::Local::now().year()));

    let config = request.config.get_or_insert_with(Default::default);
    if cli.recurring {
        config.schedule_mode = ScheduleMode::Recurring;
    }
    if cli.compound_interest {
        config.interest = InterestTreatment::Compound;
    }
    if cli.no_floor {
        config.contribution_floor = ContributionFloor::Unbounded;
    }
    if let Some(ratio) = cli.threshold_ratio {
        config.threshold_ratio = ratio;
    }

    Ok(request)
}

fn read_inventory(path: &Path) -> Result<Vec<reserve_study::ComponentRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let records = if is_json {
        load_component_records_json(file)
    } else {
        read_component_records(file)
    };
    records.with_context(|| format!("reading inventory {}", path.display()))
}

fn write_table(out: &mut dyn Write, result: &ProjectionResult) -> io::Result<()> {
    writeln!(out, "Reserve Study Projection")?;
    writeln!(out, "========================\n")?;
    writeln!(out, "  Starting Balance:     ${:>14.2}", result.starting_balance)?;
    writeln!(out, "  Fully Funded Balance: ${:>14.2}", result.fully_funded_balance)?;
    writeln!(out, "  Percent Funded:       {:>14.1}%", result.percent_funded)?;
    if let Some(current) = result.current_contribution {
        writeln!(out, "  Current Contribution: ${:>14.2}", current)?;
    }
    writeln!(out)?;

    writeln!(out, "Funding Goals:")?;
    for policy in FundingPolicy::ALL {
        writeln!(out, "  {:<18} ${:>12.0} / year", policy.name(), result.funding_goal(policy))?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "{:>6} {:>14} {:>16} {:>16} {:>16}",
        "Year", "Expenditures", "Baseline", "Threshold", "Fully Funded"
    )?;
    writeln!(out, "{}", "-".repeat(72))?;
    for row in &result.yearly_data {
        writeln!(
            out,
            "{:>6} {:>14.2} {:>16.2} {:>16.2} {:>16.2}",
            row.label(),
            row.expenditures,
            row.baseline_balance,
            row.threshold_balance,
            row.fully_funded_balance,
        )?;
    }

    if !result.long_life_components.is_empty() {
        writeln!(out, "\nBeyond the horizon: {}", result.long_life_components.join(", "))?;
    }

    let summary = result.summary();
    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Total Expenditures: ${:.2}", summary.total_expenditures)?;
    for policy in &summary.policies {
        match policy.first_underfunded_year {
            Some(year) => writeln!(
                out,
                "  {:<18} min balance ${:.2}, first negative in year {}",
                policy.policy.name(),
                policy.min_balance,
                year
            )?,
            None => writeln!(
                out,
                "  {:<18} min balance ${:.2}",
                policy.policy.name(),
                policy.min_balance
            )?,
        }
    }
    Ok(())
}

fn write_csv(out: &mut dyn Write, result: &ProjectionResult) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in &result.yearly_data {
        writer.serialize(CsvYearRow {
            year: row.year,
            calendar_year: row.calendar_year,
            expenditures: row.expenditures,
            baseline_balance: row.baseline_balance,
            threshold_balance: row.threshold_balance,
            fully_funded_balance: row.fully_funded_balance,
            current_balance: row.current_balance,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let request = read_request(&cli)?;
    let result = match StudyRunner::new().run(&request) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Input has {} problem(s):", err.issues.len());
            for issue in &err.issues {
                eprintln!("  - {}", issue);
            }
            std::process::exit(2);
        }
    };

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match cli.format {
        OutputFormat::Table => write_table(&mut out, &result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &result)?,
    }
    out.flush()?;

    if let Some(path) = &cli.output {
        log::info!("projection written to {}", path.display());
    }
    Ok(())
}
