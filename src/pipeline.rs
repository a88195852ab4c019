//! Row pipeline: normalize -> resolve zone -> transform -> assemble.
//!
//! Rows are independent. A failure on one row is recorded with its index and
//! the batch carries on; only configuration problems stop a run, and those
//! are caught by [`RunConfig::resolve`] before the first row is touched.

use crate::config::{ResolvedConfig, RunConfig};
use crate::data_models::{ConversionReport, InputRow, InputTable, OutputRow, ParsedCoordinate, RowError};
use crate::errors::{ConversionError, PipelineError};
use crate::metrics::RunMetrics;
use crate::transform::{CoordinateTransformer, Proj4Transformer};
use crate::utils::normalize_coordinate;
use crate::validation::Axis;
use crate::zone::resolve_zone;
use indicatif::ProgressBar;
use log::{info, warn};
use std::time::Instant;

pub fn parse_coordinate(row: &InputRow, config: &ResolvedConfig) -> Result<ParsedCoordinate, ConversionError> {
    let latitude = normalize_coordinate(row.field(config.latitude.index), config.comma_decimal, Axis::Latitude)?;
    let longitude = normalize_coordinate(row.field(config.longitude.index), config.comma_decimal, Axis::Longitude)?;
    Ok(ParsedCoordinate { latitude, longitude })
}

/// Convert one row, or say why it can't be.
pub fn convert_row<T: CoordinateTransformer>(
    row: &InputRow,
    config: &ResolvedConfig,
    transformer: &mut T,
) -> Result<OutputRow, ConversionError> {
    let coordinate = parse_coordinate(row, config)?;
    let destination = resolve_zone(coordinate.longitude, config.mode)?;
    let (x, y) = transformer.transform(config.source, destination.epsg, coordinate.latitude, coordinate.longitude)?;

    Ok(OutputRow {
        index: row.index,
        fields: row.fields.clone(),
        x,
        y,
        epsg: destination.epsg,
        zone: destination.zone,
    })
}

pub fn convert_table<T: CoordinateTransformer>(
    table: &InputTable,
    config: &ResolvedConfig,
    transformer: &mut T,
) -> ConversionReport {
    convert_table_with_progress(table, config, transformer, &ProgressBar::hidden())
}

pub fn convert_table_with_progress<T: CoordinateTransformer>(
    table: &InputTable,
    config: &ResolvedConfig,
    transformer: &mut T,
    progress: &ProgressBar,
) -> ConversionReport {
    let started = Instant::now();
    info!(
        "Converting {} rows: lat='{}', lon='{}', source {}, mode {}",
        table.len(),
        config.latitude.name,
        config.longitude.name,
        config.source,
        config.mode
    );

    let mut rows = Vec::with_capacity(table.len());
    let mut errors = Vec::new();

    for row in &table.rows {
        match convert_row(row, config, transformer) {
            Ok(output) => rows.push(output),
            Err(error) => {
                warn!("Skipping row {}: {}", row.row_number(), error);
                errors.push(RowError {
                    index: row.index,
                    fields: row.fields.clone(),
                    error,
                });
            }
        }
        progress.inc(1);
    }

    let metrics = RunMetrics::collect(table.len(), &rows, &errors, started);
    info!("Conversion finished: {}", metrics.headline());

    ConversionReport {
        headers: table.headers.clone(),
        rows,
        errors,
        metrics,
    }
}

/// Resolve `config` against the table headers and convert every row with a
/// fresh [`Proj4Transformer`].
pub fn run(table: &InputTable, config: &RunConfig) -> Result<ConversionReport, PipelineError> {
    let resolved = config.resolve(&table.headers)?;
    let mut transformer = Proj4Transformer::new();
    Ok(convert_table(table, &resolved, &mut transformer))
}
