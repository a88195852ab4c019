use crate::data_models::InputTable;
use crate::errors::{ConfigError, PipelineError};
use csv::ReaderBuilder;
use encoding_rs::{UTF_8, WINDOWS_1252};
use log::{debug, info, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 10;

/// Detect delimiter from content (comma, semicolon, tab, pipe).
///
/// Each candidate is scored on the first lines by average count divided by
/// (1 + standard deviation); the first candidate wins ties.
pub fn detect_delimiter(content: &str) -> u8 {
    let sample_lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    if sample_lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0.0f64;

    for &delimiter in &DELIMITER_CANDIDATES {
        let counts: Vec<f64> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count() as f64)
            .collect();

        let avg = counts.iter().sum::<f64>() / counts.len() as f64;
        let variance = counts.iter().map(|&c| (c - avg).powi(2)).sum::<f64>() / counts.len() as f64;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

pub fn delimiter_byte(delimiter: char) -> Result<u8, ConfigError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(ConfigError::InvalidDelimiter(delimiter))
    }
}

/// Parse CSV text. The first record is the header row; short rows are
/// allowed and read as empty trailing cells.
pub fn parse_csv_content(content: &str, delimiter: u8, path: &Path) -> Result<InputTable, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::HeaderReadError {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(PipelineError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| PipelineError::CsvRecordError {
            path: path.to_path_buf(),
            row: row + 1,
            source: e,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(InputTable::new(headers, rows))
}

/// Decode raw file bytes as UTF-8 (BOM stripped), falling back to
/// Windows-1252 for files saved by Excel with a Western European locale.
pub fn decode_content(buffer: &[u8]) -> Cow<'_, str> {
    let (content, _, had_errors) = UTF_8.decode(buffer);
    if !had_errors {
        return content;
    }
    warn!("Input is not valid UTF-8, decoding as {}", WINDOWS_1252.name());
    let (content, _, _) = WINDOWS_1252.decode(buffer);
    content
}

pub fn parse_csv(path: &Path, delimiter: Option<char>) -> Result<InputTable, PipelineError> {
    debug!("Entering parse_csv for {}", path.display());
    let mut file = File::open(path).map_err(|e| PipelineError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).map_err(|e| PipelineError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let content = decode_content(&buffer);
    let content: &str = &content;

    let delimiter = match delimiter {
        Some(c) => delimiter_byte(c)?,
        None => {
            let detected = detect_delimiter(content);
            info!(
                "Detected delimiter {:?} for {}",
                detected as char,
                path.display()
            );
            detected
        }
    };

    parse_csv_content(content, delimiter, path)
}
