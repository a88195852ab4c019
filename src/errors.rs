use crate::config::Epsg;
use crate::validation::Axis;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse JSON configuration in {path}: {source}")]
    JsonParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("Column '{column}' not found in input (available: {available:?})")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    #[error("No {axis} column selected and none could be detected from the headers {available:?}")]
    MissingColumn { axis: Axis, available: Vec<String> },
    #[error("Latitude and longitude both point at column '{0}'")]
    SameColumn(String),
    #[error("manual_zone must be provided when output_mode is 'manual'")]
    MissingManualZone,
    #[error("manual_zone must be one of 29, 30, or 31 (got {0})")]
    UnsupportedZone(u8),
    #[error("decimals must be at least 3 to keep millimetre precision (got {0})")]
    Precision(usize),
    #[error("Delimiter must be a single ASCII character (got {0:?})")]
    InvalidDelimiter(char),
}

/// Row-level failure while turning a text field into degrees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty {axis} value")]
    Empty { axis: Axis },
    #[error("invalid {axis} value '{value}'")]
    Malformed { axis: Axis, value: String },
    #[error("{axis} {value} out of range [{min}, {max}]")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("no projection definition available for {0}")]
    UnknownCrs(Epsg),
    #[error("cannot build projection for {epsg}: {message}")]
    Definition { epsg: Epsg, message: String },
    #[error("transformation {from} -> {to} failed: {message}")]
    Failed {
        from: Epsg,
        to: Epsg,
        message: String,
    },
    #[error("transformation {from} -> {to} produced non-finite output")]
    NonFinite { from: Epsg, to: Epsg },
}

/// Anything that can knock a single row out of the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("UTM zone {zone} computed from longitude {longitude} is outside the supported range 29-31")]
    ZoneOutOfRange { zone: i32, longitude: f64 },
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ConversionError {
    /// Short stage label used in reports.
    pub fn stage(&self) -> &'static str {
        match self {
            ConversionError::Parse(_) => "parse",
            ConversionError::ZoneOutOfRange { .. } => "zone",
            ConversionError::Transform(_) => "transform",
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error reading data file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error reading CSV headers in {path}: {source}")]
    HeaderReadError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("CSV parsing error in {path} at data row {row}: {source}")]
    CsvRecordError {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Spreadsheet error in {path}: {message}")]
    SpreadsheetError { path: PathBuf, message: String },
    #[error("Input {path} has no header row")]
    EmptyInput { path: PathBuf },
    #[error("Unsupported format type '{format_type}' for file {path}")]
    UnsupportedFormat { format_type: String, path: PathBuf },
    #[error("Failed to write output: {0}")]
    Export(#[from] csv::Error),
    #[error("No valid rows: all {total} input rows were discarded")]
    NoValidRows { total: usize },
}
