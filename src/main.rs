use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::PathBuf;

use etrs89_converter::config::{self, ModeKind, RunConfig, SourceDatum};
use etrs89_converter::errors::PipelineError;
use etrs89_converter::exporter;
use etrs89_converter::file_processor::{self, InputFormat};
use etrs89_converter::interactive;
use etrs89_converter::pipeline;
use etrs89_converter::transform::Proj4Transformer;

#[derive(Parser, Debug)]
#[command(name = "etrs89-convert")]
#[command(about = "Convert lat/lon tables (CSV or spreadsheet) to ETRS89 / UTM X/Y in metres", long_about = None)]
struct Args {
    /// Input CSV or spreadsheet file
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "convertido_ETRS89_UTM.csv")]
    output: PathBuf,

    /// JSON run configuration; explicit flags override its values
    #[arg(long, env = "ETRS89_CONFIG")]
    config: Option<PathBuf>,

    /// Latitude column (detected from the headers when omitted)
    #[arg(long, env = "ETRS89_LAT")]
    lat: Option<String>,

    /// Longitude column (detected from the headers when omitted)
    #[arg(long, env = "ETRS89_LON")]
    lon: Option<String>,

    /// Lat/lon values use a decimal comma (41,8435)
    #[arg(long)]
    comma_decimal: bool,

    /// Datum of the input coordinates
    #[arg(long, value_enum, env = "ETRS89_DATUM")]
    datum: Option<SourceDatum>,

    /// How the destination UTM zone is chosen
    #[arg(long, value_enum, env = "ETRS89_MODE")]
    mode: Option<ModeKind>,

    /// Zone for --mode manual (29, 30 or 31)
    #[arg(long, env = "ETRS89_ZONE")]
    zone: Option<u8>,

    /// In auto mode, snap points outside zones 29-31 to the nearest one
    #[arg(long)]
    clamp_auto_zone: bool,

    /// Fractional digits for X/Y (minimum 3)
    #[arg(long)]
    decimals: Option<usize>,

    /// CSV delimiter (detected when omitted)
    #[arg(long)]
    delimiter: Option<char>,

    /// Force the input format instead of using the file extension
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Write skipped rows and their reasons to this CSV
    #[arg(long)]
    errors_out: Option<PathBuf>,

    /// Also write skipped rows to the main output, with an Error column
    #[arg(long)]
    include_errors: bool,

    /// Choose columns and options with prompts
    #[arg(long)]
    interactive: bool,
}

impl Args {
    fn apply_overrides(&self, mut config: RunConfig) -> RunConfig {
        if let Some(lat) = &self.lat {
            config.latitude_column = Some(lat.clone());
        }
        if let Some(lon) = &self.lon {
            config.longitude_column = Some(lon.clone());
        }
        if self.comma_decimal {
            config.comma_decimal = true;
        }
        if let Some(datum) = self.datum {
            config.source_datum = datum;
        }
        if let Some(mode) = self.mode {
            config.output_mode = mode;
        }
        if let Some(zone) = self.zone {
            config.manual_zone = Some(zone);
        }
        if self.clamp_auto_zone {
            config.clamp_auto_zone = true;
        }
        if let Some(decimals) = self.decimals {
            config.decimals = decimals;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = Some(delimiter);
        }
        if self.include_errors {
            config.include_errors = true;
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => RunConfig::default(),
    };
    let mut run_config = args.apply_overrides(base);

    let table = file_processor::process_file(&args.input, args.format, run_config.delimiter)
        .with_context(|| format!("Failed to read input {}", args.input.display()))?;

    if args.interactive {
        run_config = interactive::prompt_run_config(&table.headers, &run_config)
            .context("Interactive configuration aborted")?;
    }

    // Configuration errors stop the run here, before any row is converted
    let resolved = run_config.resolve(&table.headers).map_err(PipelineError::from)?;
    info!(
        "Latitude column '{}', longitude column '{}', datum {}, mode {}",
        resolved.latitude.name, resolved.longitude.name, run_config.source_datum, resolved.mode
    );

    let progress = ProgressBar::new(table.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    let mut transformer = Proj4Transformer::new();
    let report = pipeline::convert_table_with_progress(&table, &resolved, &mut transformer, &progress);
    progress.finish_and_clear();
    debug!("Built {} transformation contexts", transformer.cached_pairs());

    if !table.is_empty() && report.rows.is_empty() {
        for err in &report.errors {
            warn!("Row {}: {}", err.row_number(), err.error);
        }
        return Err(PipelineError::NoValidRows { total: table.len() }.into());
    }

    exporter::export_results(&args.output, &report, resolved.decimals, resolved.include_errors)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote {} rows to {}", report.n_valid(), args.output.display());

    if let Some(path) = &args.errors_out {
        exporter::export_error_report(path, &report.errors)
            .with_context(|| format!("Failed to write error report {}", path.display()))?;
        info!("Wrote {} skipped rows to {}", report.n_dropped(), path.display());
    }

    report.metrics.print_summary();
    println!("Conversión completada. {}.", report.metrics.headline());

    Ok(())
}
