pub mod config;
pub mod data_models;
pub mod errors;
pub mod exporter;
pub mod file_processor;
pub mod interactive;
pub mod metrics;
pub mod parsers;
pub mod pipeline;
pub mod transform;
pub mod utils;
pub mod validation;
pub mod zone;

pub use config::{Epsg, OutputMode, RunConfig, SourceDatum, UtmZone};
pub use data_models::{ConversionReport, InputTable, OutputRow, RowError};
pub use errors::{ConfigError, ConversionError, ParseError, PipelineError, TransformError};
pub use pipeline::{convert_table, run};
pub use transform::{CoordinateTransformer, Proj4Transformer};
