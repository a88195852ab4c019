use crate::data_models::InputTable;
use crate::errors::PipelineError;
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use std::path::Path;

/// Text form of a cell. Numbers keep their shortest round-trip form so a
/// latitude typed as 41.84346 comes back as "41.84346".
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

/// Read the first worksheet of an xlsx/xlsm/xlsb/xls/ods workbook. The
/// first row is the header row.
pub fn parse_spreadsheet(path: &Path) -> Result<InputTable, PipelineError> {
    debug!("Entering parse_spreadsheet for {}", path.display());
    let spreadsheet_error = |message: String| PipelineError::SpreadsheetError {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| spreadsheet_error(format!("failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_error("no worksheet found".to_string()))?
        .map_err(|e| spreadsheet_error(format!("failed to read first worksheet: {}", e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| PipelineError::EmptyInput {
            path: path.to_path_buf(),
        })?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    Ok(InputTable::new(headers, rows.collect()))
}
