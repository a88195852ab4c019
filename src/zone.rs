//! UTM zone selection.
//!
//! Every row ends up in one of the three ETRS89 / UTM zones that cover
//! mainland Spain. Which one depends on the run's [`OutputMode`]; only the
//! automatic mode looks at the longitude.

use crate::config::{Epsg, OutputMode, UtmZone};
use crate::errors::ConversionError;

/// Zone and projected CRS a row is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub zone: UtmZone,
    pub epsg: Epsg,
}

impl From<UtmZone> for Destination {
    fn from(zone: UtmZone) -> Self {
        Self {
            zone,
            epsg: zone.epsg(),
        }
    }
}

/// Standard 6-degree UTM band for a longitude, without any range limit.
pub fn utm_zone_number(longitude: f64) -> i32 {
    ((longitude + 180.0) / 6.0).floor() as i32 + 1
}

pub fn resolve_zone(longitude: f64, mode: OutputMode) -> Result<Destination, ConversionError> {
    match mode {
        OutputMode::Forced31N => Ok(UtmZone::Zone31.into()),
        OutputMode::Manual(zone) => Ok(zone.into()),
        OutputMode::Auto { clamp } => {
            let zone = utm_zone_number(longitude);
            let zone = if clamp { zone.clamp(29, 31) } else { zone };
            UtmZone::from_number(zone)
                .map(Destination::from)
                .ok_or(ConversionError::ZoneOutOfRange { zone, longitude })
        }
    }
}
