use crate::config::{Epsg, UtmZone};
use crate::errors::ConversionError;
use crate::metrics::RunMetrics;
use log::warn;

/// Header row plus raw data rows, as read from CSV or a spreadsheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<InputRow>,
}

impl InputTable {
    /// Rows wider than the header row get generated column names
    /// (`columna_<n>`, 1-based) so every cell reaches the export.
    pub fn new(mut headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width > headers.len() {
            warn!(
                "Input has rows with {} cells but only {} headers; naming the extra columns",
                width,
                headers.len()
            );
            let named = headers.len();
            headers.extend((named..width).map(|n| format!("columna_{}", n + 1)));
        }

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, fields)| InputRow { index, fields })
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One raw data row. `index` is 0-based and does not count the header.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub index: usize,
    pub fields: Vec<String>,
}

impl InputRow {
    /// Missing trailing cells read as empty.
    pub fn field(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// 1-based position among data rows, as shown to users.
    pub fn row_number(&self) -> usize {
        self.index + 1
    }
}

/// Validated coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A successfully converted row: passthrough fields plus the computed values.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub index: usize,
    pub fields: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub epsg: Epsg,
    pub zone: UtmZone,
}

/// A row excluded from the output, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub index: usize,
    pub fields: Vec<String>,
    pub error: ConversionError,
}

impl RowError {
    pub fn row_number(&self) -> usize {
        self.index + 1
    }
}

/// Everything one conversion run produced.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub headers: Vec<String>,
    pub rows: Vec<OutputRow>,
    pub errors: Vec<RowError>,
    pub metrics: RunMetrics,
}

impl ConversionReport {
    pub fn n_valid(&self) -> usize {
        self.rows.len()
    }

    pub fn n_dropped(&self) -> usize {
        self.errors.len()
    }
}
