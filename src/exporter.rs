//! CSV export of conversion results and of the skipped-row report.

use crate::data_models::{ConversionReport, RowError};
use crate::errors::PipelineError;
use csv::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Computed columns appended after the passthrough columns.
pub const RESULT_COLUMNS: [&str; 4] = ["X_ETRS89", "Y_ETRS89", "EPSG_destino", "Huso"];
pub const ERROR_COLUMN: &str = "Error";
pub const ERROR_REPORT_COLUMNS: [&str; 3] = ["fila", "etapa", "mensaje"];

fn passthrough(fields: &[String], width: usize) -> Vec<String> {
    let mut fields = fields.to_vec();
    fields.resize(width, String::new());
    fields
}

/// Write converted rows: every input column, then X/Y with `decimals`
/// fractional digits, destination EPSG and zone.
///
/// With `include_errors` the skipped rows are interleaved in input order
/// with empty computed columns, and a trailing `Error` column is added.
pub fn write_results<W: Write>(
    writer: W,
    report: &ConversionReport,
    decimals: usize,
    include_errors: bool,
) -> Result<(), PipelineError> {
    let mut wtr = Writer::from_writer(writer);
    let width = report.headers.len();

    let mut header = report.headers.clone();
    header.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));
    if include_errors {
        header.push(ERROR_COLUMN.to_string());
    }
    wtr.write_record(&header)?;

    let mut errors = report.errors.iter().peekable();
    for row in &report.rows {
        if include_errors {
            while let Some(err) = errors.next_if(|e| e.index < row.index) {
                wtr.write_record(&error_record(err, width))?;
            }
        }

        let mut record = passthrough(&row.fields, width);
        record.push(format!("{:.*}", decimals, row.x));
        record.push(format!("{:.*}", decimals, row.y));
        record.push(row.epsg.to_string());
        record.push(row.zone.number().to_string());
        if include_errors {
            record.push(String::new());
        }
        wtr.write_record(&record)?;
    }
    if include_errors {
        for err in errors {
            wtr.write_record(&error_record(err, width))?;
        }
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn error_record(err: &RowError, width: usize) -> Vec<String> {
    let mut record = passthrough(&err.fields, width);
    record.extend(std::iter::repeat(String::new()).take(RESULT_COLUMNS.len()));
    record.push(err.error.to_string());
    record
}

/// One line per skipped row: 1-based data row number, stage, message.
pub fn write_error_report<W: Write>(writer: W, errors: &[RowError]) -> Result<(), PipelineError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(ERROR_REPORT_COLUMNS)?;
    for err in errors {
        wtr.write_record([
            err.row_number().to_string(),
            err.error.stage().to_string(),
            err.error.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>, PipelineError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| PipelineError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
}

pub fn export_results(path: &Path, report: &ConversionReport, decimals: usize, include_errors: bool) -> Result<(), PipelineError> {
    write_results(create_output(path)?, report, decimals, include_errors)
}

pub fn export_error_report(path: &Path, errors: &[RowError]) -> Result<(), PipelineError> {
    write_error_report(create_output(path)?, errors)
}
