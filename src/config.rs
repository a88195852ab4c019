use crate::errors::ConfigError;
use crate::validation::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Lowest accepted number of fractional digits in exported X/Y.
pub const MIN_DECIMALS: usize = 3;

/// Numeric EPSG identifier, rendered as `EPSG:<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epsg(pub u16);

impl fmt::Display for Epsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Geographic datum the input lat/lon values are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceDatum {
    #[default]
    Etrs89,
    Wgs84,
}

impl SourceDatum {
    pub fn epsg(self) -> Epsg {
        match self {
            SourceDatum::Etrs89 => Epsg(4258),
            SourceDatum::Wgs84 => Epsg(4326),
        }
    }
}

impl fmt::Display for SourceDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDatum::Etrs89 => write!(f, "ETRS89 ({})", self.epsg()),
            SourceDatum::Wgs84 => write!(f, "WGS84 ({})", self.epsg()),
        }
    }
}

/// One of the three ETRS89 / UTM zones covering mainland Spain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UtmZone {
    Zone29,
    Zone30,
    Zone31,
}

impl UtmZone {
    pub const ALL: [UtmZone; 3] = [UtmZone::Zone29, UtmZone::Zone30, UtmZone::Zone31];

    pub fn number(self) -> u8 {
        match self {
            UtmZone::Zone29 => 29,
            UtmZone::Zone30 => 30,
            UtmZone::Zone31 => 31,
        }
    }

    pub fn from_number(zone: i32) -> Option<Self> {
        match zone {
            29 => Some(UtmZone::Zone29),
            30 => Some(UtmZone::Zone30),
            31 => Some(UtmZone::Zone31),
            _ => None,
        }
    }

    /// ETRS89 / UTM zone NN N is EPSG:258NN.
    pub fn epsg(self) -> Epsg {
        Epsg(25800 + u16::from(self.number()))
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}N", self.number())
    }
}

/// How the destination zone is picked for each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Always ETRS89 / UTM 31N.
    Forced31N,
    /// Per row from longitude; out-of-range zones fail unless `clamp`.
    Auto { clamp: bool },
    /// One zone for the whole run.
    Manual(UtmZone),
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Forced31N => write!(f, "forced 31N ({})", UtmZone::Zone31.epsg()),
            OutputMode::Auto { clamp: false } => f.write_str("automatic by zone (29-31)"),
            OutputMode::Auto { clamp: true } => f.write_str("automatic by zone (clamped to 29-31)"),
            OutputMode::Manual(zone) => write!(f, "manual zone {} ({})", zone, zone.epsg()),
        }
    }
}

/// Mode selector as it appears in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Forced31n,
    Auto,
    Manual,
}

/// Per-run settings as supplied by the caller. Validated into a
/// [`ResolvedConfig`] once the input headers are known.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub latitude_column: Option<String>,
    pub longitude_column: Option<String>,
    pub comma_decimal: bool,
    pub source_datum: SourceDatum,
    pub output_mode: ModeKind,
    pub manual_zone: Option<u8>,
    pub clamp_auto_zone: bool,
    pub decimals: usize,
    pub delimiter: Option<char>,
    pub include_errors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            latitude_column: None,
            longitude_column: None,
            comma_decimal: false,
            source_datum: SourceDatum::Etrs89,
            output_mode: ModeKind::Forced31n,
            manual_zone: None,
            clamp_auto_zone: false,
            decimals: MIN_DECIMALS,
            delimiter: None,
            include_errors: false,
        }
    }
}

/// A selected input column, by header name and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
    pub index: usize,
}

/// Immutable configuration for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub latitude: ColumnRef,
    pub longitude: ColumnRef,
    pub comma_decimal: bool,
    pub source: Epsg,
    pub mode: OutputMode,
    pub decimals: usize,
    pub include_errors: bool,
}

impl RunConfig {
    pub fn output_mode(&self) -> Result<OutputMode, ConfigError> {
        match self.output_mode {
            ModeKind::Forced31n => Ok(OutputMode::Forced31N),
            ModeKind::Auto => Ok(OutputMode::Auto {
                clamp: self.clamp_auto_zone,
            }),
            ModeKind::Manual => {
                let zone = self.manual_zone.ok_or(ConfigError::MissingManualZone)?;
                UtmZone::from_number(i32::from(zone))
                    .map(OutputMode::Manual)
                    .ok_or(ConfigError::UnsupportedZone(zone))
            }
        }
    }

    /// Check every setting against the input headers. Nothing here looks at
    /// row data, so a failure aborts the run before any row is processed.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedConfig, ConfigError> {
        let mode = self.output_mode()?;
        if self.decimals < MIN_DECIMALS {
            return Err(ConfigError::Precision(self.decimals));
        }

        let latitude = select_column(headers, self.latitude_column.as_deref(), Axis::Latitude)?;
        let longitude = select_column(headers, self.longitude_column.as_deref(), Axis::Longitude)?;
        if latitude.index == longitude.index {
            return Err(ConfigError::SameColumn(latitude.name));
        }

        Ok(ResolvedConfig {
            latitude,
            longitude,
            comma_decimal: self.comma_decimal,
            source: self.source_datum.epsg(),
            mode,
            decimals: self.decimals,
            include_errors: self.include_errors,
        })
    }
}

fn select_column(headers: &[String], requested: Option<&str>, axis: Axis) -> Result<ColumnRef, ConfigError> {
    match requested {
        Some(name) => headers
            .iter()
            .position(|h| h.trim() == name.trim())
            .map(|index| ColumnRef {
                name: headers[index].clone(),
                index,
            })
            .ok_or_else(|| ConfigError::ColumnNotFound {
                column: name.to_string(),
                available: headers.to_vec(),
            }),
        None => detect_column(headers, axis).ok_or_else(|| ConfigError::MissingColumn {
            axis,
            available: headers.to_vec(),
        }),
    }
}

/// First header containing `lat` (or `lon`), case-insensitively.
pub fn detect_column(headers: &[String], axis: Axis) -> Option<ColumnRef> {
    let needle = match axis {
        Axis::Latitude => "lat",
        Axis::Longitude => "lon",
    };
    headers
        .iter()
        .position(|h| h.to_lowercase().contains(needle))
        .map(|index| ColumnRef {
            name: headers[index].clone(),
            index,
        })
}

/// Read a [`RunConfig`] from a JSON file. Keys left out take their defaults.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let config: RunConfig = serde_json::from_reader(reader).map_err(|e| ConfigError::JsonParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!("Loaded run configuration from {}: {:?}", path.display(), config);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zone_epsg_lookup() {
        assert_eq!(UtmZone::Zone29.epsg(), Epsg(25829));
        assert_eq!(UtmZone::Zone30.epsg(), Epsg(25830));
        assert_eq!(UtmZone::Zone31.epsg().to_string(), "EPSG:25831");
        assert_eq!(UtmZone::from_number(28), None);
        assert_eq!(UtmZone::from_number(32), None);
    }

    #[test]
    fn test_source_datum_codes() {
        assert_eq!(SourceDatum::Etrs89.epsg(), Epsg(4258));
        assert_eq!(SourceDatum::Wgs84.epsg(), Epsg(4326));
    }

    #[test]
    fn test_resolve_defaults_detect_columns() {
        let config = RunConfig::default();
        let resolved = config.resolve(&headers(&["id", "Latitud", "Longitud"])).unwrap();
        assert_eq!(resolved.latitude, ColumnRef { name: "Latitud".into(), index: 1 });
        assert_eq!(resolved.longitude, ColumnRef { name: "Longitud".into(), index: 2 });
        assert_eq!(resolved.mode, OutputMode::Forced31N);
        assert_eq!(resolved.source, Epsg(4258));
        assert_eq!(resolved.decimals, 3);
    }

    #[test]
    fn test_resolve_missing_named_column() {
        let config = RunConfig {
            latitude_column: Some("Lat".into()),
            longitude_column: Some("Lon".into()),
            ..RunConfig::default()
        };
        let err = config.resolve(&headers(&["Lat"])).unwrap_err();
        match err {
            ConfigError::ColumnNotFound { column, .. } => assert_eq!(column, "Lon"),
            other => panic!("unexpected error: {other}"),
        }
        let err = config.resolve(&headers(&["Lon"])).unwrap_err();
        assert!(err.to_string().contains("'Lat'"));
    }

    #[test]
    fn test_resolve_undetectable_column() {
        let err = RunConfig::default().resolve(&headers(&["x", "y"])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingColumn { axis: Axis::Latitude, .. }));
    }

    #[test]
    fn test_resolve_same_column_twice() {
        let config = RunConfig {
            latitude_column: Some("coord".into()),
            longitude_column: Some("coord".into()),
            ..RunConfig::default()
        };
        assert!(matches!(
            config.resolve(&headers(&["coord"])),
            Err(ConfigError::SameColumn(_))
        ));
    }

    #[test]
    fn test_manual_mode_requires_zone() {
        let config = RunConfig {
            output_mode: ModeKind::Manual,
            ..RunConfig::default()
        };
        assert!(matches!(config.output_mode(), Err(ConfigError::MissingManualZone)));
    }

    #[test]
    fn test_manual_mode_rejects_unsupported_zone() {
        for zone in [28u8, 32] {
            let config = RunConfig {
                output_mode: ModeKind::Manual,
                manual_zone: Some(zone),
                ..RunConfig::default()
            };
            let err = config.output_mode().unwrap_err();
            assert!(err.to_string().contains("29, 30, or 31"));
        }
    }

    #[test]
    fn test_manual_and_auto_modes() {
        let manual = RunConfig {
            output_mode: ModeKind::Manual,
            manual_zone: Some(30),
            ..RunConfig::default()
        };
        assert_eq!(manual.output_mode().unwrap(), OutputMode::Manual(UtmZone::Zone30));

        let auto = RunConfig {
            output_mode: ModeKind::Auto,
            clamp_auto_zone: true,
            ..RunConfig::default()
        };
        assert_eq!(auto.output_mode().unwrap(), OutputMode::Auto { clamp: true });
    }

    #[test]
    fn test_precision_below_minimum_rejected() {
        let config = RunConfig {
            decimals: 2,
            ..RunConfig::default()
        };
        assert!(matches!(
            config.resolve(&headers(&["lat", "lon"])),
            Err(ConfigError::Precision(2))
        ));
    }

    #[test]
    fn test_load_config_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        let mut f = File::create(&path).unwrap();
        writeln!(
            f,
            r#"{{"latitude_column": "Lat", "comma_decimal": true, "source_datum": "WGS84",
                "output_mode": "manual", "manual_zone": 29, "decimals": 4}}"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.latitude_column.as_deref(), Some("Lat"));
        assert_eq!(config.longitude_column, None);
        assert!(config.comma_decimal);
        assert_eq!(config.source_datum, SourceDatum::Wgs84);
        assert_eq!(config.output_mode, ModeKind::Manual);
        assert_eq!(config.manual_zone, Some(29));
        assert_eq!(config.decimals, 4);
        assert!(!config.include_errors);
    }

    #[test]
    fn test_load_config_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_config(&missing), Err(ConfigError::NotFound { .. })));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"output_mode": "sideways"}"#).unwrap();
        assert!(matches!(load_config(&bad), Err(ConfigError::JsonParseError { .. })));
    }
}
