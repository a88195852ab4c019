use crate::config::Epsg;
use crate::data_models::{OutputRow, RowError};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Counters for a single conversion run. Built fresh for every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    pub rows_read: usize,
    pub rows_converted: usize,
    pub rows_skipped: usize,
    pub skipped_by_stage: BTreeMap<&'static str, usize>,
    pub rows_by_destination: BTreeMap<Epsg, usize>,
    pub elapsed: Duration,
}

impl RunMetrics {
    pub fn collect(rows_read: usize, rows: &[OutputRow], errors: &[RowError], started: Instant) -> Self {
        let mut metrics = Self {
            rows_read,
            rows_converted: rows.len(),
            rows_skipped: errors.len(),
            elapsed: started.elapsed(),
            ..Default::default()
        };
        for row in rows {
            *metrics.rows_by_destination.entry(row.epsg).or_default() += 1;
        }
        for err in errors {
            *metrics.skipped_by_stage.entry(err.error.stage()).or_default() += 1;
        }
        metrics
    }

    pub fn get_throughput(&self) -> f64 {
        let duration_secs = self.elapsed.as_secs_f64();
        if duration_secs > 0.0 {
            self.rows_read as f64 / duration_secs
        } else {
            0.0
        }
    }

    /// "N filas válidas; M descartadas", the line shown after each run.
    pub fn headline(&self) -> String {
        format!(
            "{} filas válidas; {} descartadas",
            self.rows_converted, self.rows_skipped
        )
    }

    pub fn print_summary(&self) {
        println!("\n========== Conversion Summary ==========");
        println!("Total Duration: {:.2?}", self.elapsed);
        println!("Rows Read: {}", self.rows_read);
        println!("Rows Converted: {}", self.rows_converted);
        println!("Rows Skipped: {}", self.rows_skipped);
        for (stage, count) in &self.skipped_by_stage {
            println!("  {}: {}", stage, count);
        }
        if !self.rows_by_destination.is_empty() {
            println!("Destinations:");
            for (epsg, count) in &self.rows_by_destination {
                println!("  {}: {} rows", epsg, count);
            }
        }
        println!("Throughput: {:.2} rows/sec", self.get_throughput());
        println!("========================================\n");
    }
}
