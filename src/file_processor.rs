use crate::data_models::InputTable;
use crate::errors::PipelineError;
use crate::parsers;
use log::info;
use std::path::Path;

/// Tabular input formats understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    /// Guess the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" | "tsv" => Ok(InputFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Spreadsheet),
            other => Err(PipelineError::UnsupportedFormat {
                format_type: other.to_string(),
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads a single input file with the parser for its format.
/// `format` overrides extension-based detection.
pub fn process_file(path: &Path, format: Option<InputFormat>, delimiter: Option<char>) -> Result<InputTable, PipelineError> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(path)?,
    };
    info!("Reading {} as {:?}", path.display(), format);

    let table = match format {
        InputFormat::Csv => parsers::csv_parser::parse_csv(path, delimiter)?,
        InputFormat::Spreadsheet => parsers::spreadsheet_parser::parse_spreadsheet(path)?,
    };

    info!(
        "Read {} data rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.csv")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.xlsx")).unwrap(), InputFormat::Spreadsheet);
        assert_eq!(InputFormat::from_path(Path::new("a.xls")).unwrap(), InputFormat::Spreadsheet);
        assert!(matches!(
            InputFormat::from_path(Path::new("a.shp")),
            Err(PipelineError::UnsupportedFormat { .. })
        ));
        assert!(InputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_format_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.dat");
        std::fs::write(&path, "Lat,Lon\n41.0,1.0\n").unwrap();

        assert!(process_file(&path, None, None).is_err());
        let table = process_file(&path, Some(InputFormat::Csv), None).unwrap();
        assert_eq!(table.len(), 1);
    }
}
