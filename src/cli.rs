//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::data_locator::{DEFAULT_FLOWS_FILE, DataLocation};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonFileAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{parse_coordinate, parse_list, validate_config};
use crate::domain::coordinates::{Coordinate, CountryCoordinates};
use crate::domain::country::{CountrySummary, DEFAULT_TOP_COUNTRIES, summarize_countries, top_countries};
use crate::domain::error::FlowError;
use crate::domain::flow::{FlowRecord, FlowsByYear};
use crate::domain::inspect::{Inspection, Shape, inspect};
use crate::domain::normalize::{FilterConfig, NormalizeOutcome, Normalizer, RejectReason};
use crate::domain::query::{FlowQuery, Region};
use crate::domain::stats::{DatasetStats, KG_PER_TONNE};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_RAW_INPUTS: [&str; 2] = ["TradeData2002.json", "TradeData2014.json"];
pub const DEFAULT_RESULTS_FILE: &str = "analysis_results.json";

#[derive(Parser, Debug)]
#[command(
    name = "plastic-flows",
    about = "Plastic waste trade flow normalizer and statistics"
)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize raw trade exports into a year-keyed flows file
    Process {
        #[arg(short, long = "input")]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute dataset statistics from a flows file
    Stats {
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        no_save: bool,
    },
    /// Describe the structure of a JSON file
    Inspect { path: PathBuf },
    /// Per-country export/import balances
    Countries {
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        top: Option<usize>,
    },
    /// List one year's flows, optionally filtered
    Flows {
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        region: Option<Region>,
        #[arg(long)]
        min_weight: Option<f64>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Command::Process { inputs, output } => run_process(&config, &inputs, output.as_ref()),
        Command::Stats {
            data,
            output,
            no_save,
        } => run_stats(&config, data.as_ref(), output.as_ref(), no_save),
        Command::Inspect { path } => run_inspect(&JsonFileAdapter::new(), &path).map(|_| ()),
        Command::Countries { data, year, top } => {
            run_countries(&config, data.as_ref(), year, top)
        }
        Command::Flows {
            data,
            year,
            region,
            min_weight,
        } => run_flows(&config, data.as_ref(), year, region, min_weight),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Loads and validates the config file; without one every default applies.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, FlowError> {
    let adapter = match path {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| FlowError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_filter_config(config: &dyn ConfigPort) -> FilterConfig {
    let defaults = FilterConfig::default();
    let get = |key: &str| config.get_string("filter", key).map(|v| v.trim().to_string());
    FilterConfig {
        commodity_code: get("commodity_code").unwrap_or(defaults.commodity_code),
        flow_keyword: get("flow_keyword").unwrap_or(defaults.flow_keyword),
        world_codes: get("world_codes")
            .map(|v| parse_list(&v))
            .unwrap_or(defaults.world_codes),
        world_name: get("world_name").unwrap_or(defaults.world_name),
    }
}

/// Built-in table plus `[coordinates]` entries, whose keys are upper-cased.
pub fn build_coordinates(config: &dyn ConfigPort) -> Result<CountryCoordinates, FlowError> {
    let mut table = CountryCoordinates::builtin();
    for key in config.keys("coordinates") {
        let value = config.get_string("coordinates", &key).unwrap_or_default();
        let (lon, lat) = parse_coordinate(&value).map_err(|reason| FlowError::ConfigInvalid {
            section: "coordinates".into(),
            key: key.clone(),
            reason,
        })?;
        table = table.with_entry(&key.to_uppercase(), Coordinate::new(lon, lat));
    }
    Ok(table)
}

/// Command-line path, then `[data] flows_file`, then `[data] flows_candidates`,
/// then the default candidates.
pub fn resolve_data_location(explicit: Option<&PathBuf>, config: &dyn ConfigPort) -> DataLocation {
    if let Some(path) = explicit {
        return DataLocation::Explicit(path.clone());
    }
    if let Some(path) = config.get_string("data", "flows_file") {
        return DataLocation::Explicit(PathBuf::from(path.trim()));
    }
    if let Some(list) = config.get_string("data", "flows_candidates") {
        return DataLocation::Candidates(parse_list(&list).into_iter().map(PathBuf::from).collect());
    }
    DataLocation::default_candidates()
}

pub fn resolve_results_path(explicit: Option<&PathBuf>, config: &dyn ConfigPort) -> PathBuf {
    explicit
        .cloned()
        .or_else(|| config.get_string("data", "results_file").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FILE))
}

/// CSV for `.csv` paths, JSON otherwise.
pub fn report_adapter_for(path: &Path) -> Box<dyn ReportPort> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvReportAdapter)
    } else {
        Box::new(JsonReportAdapter)
    }
}

fn run_process(
    config: &dyn ConfigPort,
    inputs: &[PathBuf],
    output: Option<&PathBuf>,
) -> Result<(), FlowError> {
    let inputs: Vec<PathBuf> = if inputs.is_empty() {
        DEFAULT_RAW_INPUTS.iter().map(PathBuf::from).collect()
    } else {
        inputs.to_vec()
    };
    let output = output
        .cloned()
        .or_else(|| config.get_string("data", "flows_file").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FLOWS_FILE));

    let filter = build_filter_config(config);
    let coordinates = build_coordinates(config)?;

    run_process_pipeline(&JsonFileAdapter::new(), &inputs, &output, &filter, &coordinates)
        .map(|_| ())
}

/// Loads every input, normalizes the concatenation, and writes the flows file.
/// Any unreadable input aborts before anything is written.
pub fn run_process_pipeline(
    data_port: &dyn DataPort,
    inputs: &[PathBuf],
    output: &Path,
    filter: &FilterConfig,
    coordinates: &CountryCoordinates,
) -> Result<NormalizeOutcome, FlowError> {
    let mut records = Vec::new();
    for input in inputs {
        records.extend(data_port.load_raw_records(input)?);
    }
    tracing::info!("total raw records: {}", records.len());

    let outcome = Normalizer::new(filter, coordinates).normalize(&records);
    tracing::info!(
        accepted = outcome.accepted,
        rejected = outcome.rejected,
        "normalized records"
    );
    for reason in RejectReason::ALL {
        let count = outcome.rejections_for(reason);
        if count > 0 {
            tracing::info!("  skipped {count}: {reason}");
        }
    }
    log_weight_summary(&outcome.flows);

    println!("Valid records: {}", outcome.accepted);
    println!("Skipped records: {}", outcome.rejected);
    println!("\nData by year:");
    for (year, flows) in &outcome.flows {
        println!("  {year}: {} flows", flows.len());
    }

    data_port.save_flows(&outcome.flows, output)?;
    println!("\nSaved processed data to {}", output.display());

    if let Some(sample) = outcome.flows.values().flatten().next() {
        if let Ok(json) = serde_json::to_string_pretty(sample) {
            println!("\nSample processed record:\n{json}");
        }
    }

    Ok(outcome)
}

fn log_weight_summary(flows: &FlowsByYear) {
    let weights: Vec<f64> = flows.values().flatten().map(|f| f.weight_kg).collect();
    if weights.is_empty() {
        return;
    }
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = weights.iter().sum::<f64>() / weights.len() as f64;
    tracing::info!("weight kg: min {min}, max {max}, average {avg:.2}");
}

fn run_stats(
    config: &dyn ConfigPort,
    data: Option<&PathBuf>,
    output: Option<&PathBuf>,
    no_save: bool,
) -> Result<(), FlowError> {
    let path = resolve_data_location(data, config).resolve()?;
    let save = !no_save && config.get_bool("report", "save_results", true);
    let results_path = resolve_results_path(output, config);
    let reporter = report_adapter_for(&results_path);
    let report = save.then_some((reporter.as_ref(), results_path.as_path()));

    run_stats_pipeline(&JsonFileAdapter::new(), &path, report).map(|_| ())
}

/// Aggregates the flows file and optionally persists the result. A failed
/// write is logged; the computed statistics are still returned.
pub fn run_stats_pipeline(
    data_port: &dyn DataPort,
    path: &Path,
    report: Option<(&dyn ReportPort, &Path)>,
) -> Result<DatasetStats, FlowError> {
    let flows = data_port.load_flows(path)?;
    let stats = DatasetStats::compute(&flows);
    print_stats(&stats);

    if let Some((reporter, output)) = report {
        match reporter.write(&stats, output) {
            Ok(()) => println!("\nResults saved to {}", output.display()),
            Err(e) => tracing::warn!("could not save results: {e}"),
        }
    }

    Ok(stats)
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

fn fmt_year(year: Option<i32>) -> String {
    year.map_or_else(|| "n/a".to_string(), |y| y.to_string())
}

/// Groups digits in thousands: 1234567 -> "1,234,567".
pub fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn print_stats(stats: &DatasetStats) {
    let span = stats.dataset_span().unwrap_or_else(|| "n/a".to_string());

    println!("=== Dataset Statistics ({} years: {}) ===", stats.total_years, span);
    println!(
        "Average annual weight:  {}M tonnes",
        fmt_opt(stats.avg_annual_megatonnes, 1)
    );
    println!(
        "Average annual value:   ${}B",
        fmt_opt(stats.avg_annual_value_billion, 1)
    );
    println!("Total countries:        {}", stats.total_countries);
    println!("Total trade flows:      {}", with_thousands(stats.total_flows));
    println!(
        "Total weight:           {:.1}M tonnes",
        stats.total_weight_megatonnes()
    );
    println!("Total value:            ${:.1}B", stats.total_value_billion());

    if !stats.yearly_totals.is_empty() {
        println!("\n=== Year-by-Year ===");
        for (year, s) in &stats.yearly_totals {
            println!(
                "  {}: {:.2}M tonnes, ${:.2}B, {} countries, {} flows",
                year, s.weight_megatonnes, s.value_billion_usd, s.countries, s.flows
            );
        }
    }

    let yearly = |year: Option<i32>| year.and_then(|y| stats.yearly_totals.get(&y));
    println!("\n=== Extremes ===");
    println!(
        "Highest weight year:    {} ({}M tonnes)",
        fmt_year(stats.peak_weight_year),
        fmt_opt(yearly(stats.peak_weight_year).map(|s| s.weight_megatonnes), 2)
    );
    println!(
        "Lowest weight year:     {} ({}M tonnes)",
        fmt_year(stats.low_weight_year),
        fmt_opt(yearly(stats.low_weight_year).map(|s| s.weight_megatonnes), 2)
    );
    println!(
        "Highest value year:     {} (${}B)",
        fmt_year(stats.peak_value_year),
        fmt_opt(yearly(stats.peak_value_year).map(|s| s.value_billion_usd), 2)
    );
    println!(
        "Most countries year:    {} ({} countries)",
        fmt_year(stats.peak_countries_year),
        yearly(stats.peak_countries_year).map_or_else(|| "n/a".to_string(), |s| s.countries.to_string())
    );

    println!("\n=== Insights ===");
    println!("Growth over span:       {}%", fmt_opt(stats.growth_rate_percent, 1));
    println!(
        "Average flow size:      {} tonnes",
        fmt_opt(stats.avg_flow_tonnes, 0)
    );
    println!(
        "Average value per tonne: ${}",
        fmt_opt(stats.avg_value_per_tonne, 0)
    );
}

/// Reads and describes any JSON file without modifying it.
pub fn run_inspect(data_port: &dyn DataPort, path: &Path) -> Result<Inspection, FlowError> {
    let document = data_port.load_document(path)?;
    let report = inspect(&document);
    print_inspection(path, &report);
    Ok(report)
}

fn print_inspection(path: &Path, report: &Inspection) {
    println!("File: {}", path.display());
    println!("Data type: {}", report.type_name);
    if let Some(size) = report.size {
        println!("Length/Size: {size}");
    }

    match &report.shape {
        Shape::YearKeyed { years, total_flows } => {
            println!("Data is organized by years:");
            for y in years {
                println!(
                    "  Year {}: {} flows, {} source countries, {} target countries",
                    y.year, y.flows, y.source_countries, y.target_countries
                );
                if let Some(json) = y.sample.as_ref().and_then(|s| serde_json::to_string_pretty(s).ok()) {
                    println!("  Sample flow for {}:\n{json}", y.year);
                }
            }
            println!("Total flows across all years: {total_flows}");
        }
        Shape::RawRecords {
            count,
            sample,
            fields,
            key_fields,
        } => {
            println!("Data is a list of raw trade records");
            println!("Total records: {count}");
            if let Some(json) = sample.as_ref().and_then(|s| serde_json::to_string_pretty(s).ok()) {
                println!("Sample record:\n{json}");
            }
            if !fields.is_empty() {
                println!("\nAvailable fields:");
                for (i, field) in fields.iter().enumerate() {
                    println!("  {i}: {field}");
                }
            }
            println!("\nKey field check:");
            for (field, value) in key_fields {
                match value {
                    Some(v) => println!("  ok      {field}: {v}"),
                    None => println!("  missing {field}"),
                }
            }
        }
        Shape::Unrecognized { top_level_keys } => {
            println!("Data structure is not recognized.");
            if !top_level_keys.is_empty() {
                println!("Top-level keys: {}", top_level_keys.join(", "));
            }
        }
    }
}

fn load_located_flows(
    config: &dyn ConfigPort,
    data: Option<&PathBuf>,
) -> Result<FlowsByYear, FlowError> {
    let path = resolve_data_location(data, config).resolve()?;
    JsonFileAdapter::new().load_flows(&path)
}

fn flows_for_year(flows: &FlowsByYear, year: i32) -> Result<&[FlowRecord], FlowError> {
    flows
        .get(&year)
        .map(Vec::as_slice)
        .ok_or(FlowError::UnknownYear { year })
}

fn run_countries(
    config: &dyn ConfigPort,
    data: Option<&PathBuf>,
    year: Option<i32>,
    top: Option<usize>,
) -> Result<(), FlowError> {
    let flows = load_located_flows(config, data)?;
    let top = match top {
        Some(n) => n,
        None => usize::try_from(config.get_int("report", "top_countries", DEFAULT_TOP_COUNTRIES as i64))
            .unwrap_or(DEFAULT_TOP_COUNTRIES),
    };

    let summaries = match year {
        Some(year) => summarize_countries(flows_for_year(&flows, year)?),
        None => summarize_countries(flows.values().flatten()),
    };
    print_country_summaries(&summaries);

    println!("\nTop {top} countries by traded weight (all years):");
    for (rank, code) in top_countries(&flows, top).iter().enumerate() {
        println!("  {}. {code}", rank + 1);
    }
    Ok(())
}

fn print_country_summaries(summaries: &[CountrySummary]) {
    println!(
        "{:<5} {:<28} {:>14} {:>14} {:>14}  {:<13} {}",
        "Code", "Name", "Exports (t)", "Imports (t)", "Net (t)", "Status", "Top partner"
    );
    for s in summaries {
        let status = if s.is_net_exporter() {
            "Net Exporter"
        } else {
            "Net Importer"
        };
        println!(
            "{:<5} {:<28} {:>14.1} {:>14.1} {:>14.1}  {:<13} {}",
            s.code,
            s.name,
            s.exports_kg / KG_PER_TONNE,
            s.imports_kg / KG_PER_TONNE,
            s.net_balance_kg() / KG_PER_TONNE,
            status,
            s.top_partner.as_deref().unwrap_or("N/A"),
        );
    }
}

fn run_flows(
    config: &dyn ConfigPort,
    data: Option<&PathBuf>,
    year: i32,
    region: Option<Region>,
    min_weight: Option<f64>,
) -> Result<(), FlowError> {
    if let Some(min) = min_weight {
        if !min.is_finite() || min < 0.0 {
            return Err(FlowError::InvalidArgument {
                name: "--min-weight".into(),
                reason: "must be a non-negative number of kilograms".into(),
            });
        }
    }

    let flows = load_located_flows(config, data)?;
    let query = FlowQuery {
        region,
        min_weight_kg: min_weight,
    };
    let matched = query.apply(flows_for_year(&flows, year)?);

    for flow in &matched {
        println!(
            "{} -> {}  {:.1} t  ${:.0}",
            flow.source_country,
            flow.target_country,
            flow.weight_kg / KG_PER_TONNE,
            flow.trade_value
        );
    }
    println!("{} flows in {year}", matched.len());
    Ok(())
}
