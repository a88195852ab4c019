//! Range checks for geographic coordinates.

use crate::errors::ParseError;
use std::fmt;

/// Which coordinate a value belongs to; decides the valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Inclusive (min, max) in decimal degrees.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-180.0, 180.0),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// Rejects (never clamps) a value outside the axis bounds.
pub fn validate_range(value: f64, axis: Axis) -> Result<f64, ParseError> {
    let (min, max) = axis.bounds();
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParseError::OutOfRange {
            axis,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_bounds_are_inclusive() {
        assert_eq!(validate_range(90.0, Axis::Latitude), Ok(90.0));
        assert_eq!(validate_range(-90.0, Axis::Latitude), Ok(-90.0));
        assert!(matches!(
            validate_range(90.0001, Axis::Latitude),
            Err(ParseError::OutOfRange { axis: Axis::Latitude, .. })
        ));
    }

    #[test]
    fn test_longitude_bounds_are_inclusive() {
        assert_eq!(validate_range(180.0, Axis::Longitude), Ok(180.0));
        assert_eq!(validate_range(-180.0, Axis::Longitude), Ok(-180.0));
        assert!(validate_range(180.0001, Axis::Longitude).is_err());
        assert!(validate_range(-180.0001, Axis::Longitude).is_err());
    }

    #[test]
    fn test_latitude_range_is_narrower() {
        // A valid longitude is not automatically a valid latitude
        assert!(validate_range(120.0, Axis::Longitude).is_ok());
        assert!(validate_range(120.0, Axis::Latitude).is_err());
    }
}
