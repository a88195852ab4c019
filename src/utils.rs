use crate::errors::ParseError;
use crate::validation::{validate_range, Axis};

/// Parse a float that may use comma as decimal separator
pub fn parse_locale_float(s: &str, comma_decimal: bool) -> Result<f64, std::num::ParseFloatError> {
    if comma_decimal {
        s.replace(',', ".").parse::<f64>()
    } else {
        s.parse::<f64>()
    }
}

/// Turn a raw latitude/longitude field into validated decimal degrees.
///
/// Surrounding whitespace is ignored. `inf`/`NaN` literals are refused even
/// though `f64::from_str` accepts them.
pub fn normalize_coordinate(raw: &str, comma_decimal: bool, axis: Axis) -> Result<f64, ParseError> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return Err(ParseError::Empty { axis });
    }

    let value = parse_locale_float(cleaned, comma_decimal)
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::Malformed {
            axis,
            value: cleaned.to_string(),
        })?;

    validate_range(value, axis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_and_dot_give_same_value() {
        let comma = normalize_coordinate("41,84346", true, Axis::Latitude).unwrap();
        let dot = normalize_coordinate("41.84346", false, Axis::Latitude).unwrap();
        assert_eq!(comma, dot);
        assert_eq!(comma, 41.84346);
    }

    #[test]
    fn test_dot_still_parses_with_comma_flag() {
        assert_eq!(normalize_coordinate("1.03335", true, Axis::Longitude), Ok(1.03335));
    }

    #[test]
    fn test_comma_without_flag_is_malformed() {
        assert_eq!(
            normalize_coordinate("41,84346", false, Axis::Latitude),
            Err(ParseError::Malformed {
                axis: Axis::Latitude,
                value: "41,84346".to_string()
            })
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(normalize_coordinate("  -3.5 \t", false, Axis::Longitude), Ok(-3.5));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(
            normalize_coordinate("   ", false, Axis::Longitude),
            Err(ParseError::Empty { axis: Axis::Longitude })
        );
    }

    #[test]
    fn test_non_finite_literals_are_rejected() {
        for raw in ["inf", "-infinity", "NaN"] {
            assert!(matches!(
                normalize_coordinate(raw, false, Axis::Latitude),
                Err(ParseError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(matches!(
            normalize_coordinate("90.0001", false, Axis::Latitude),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(normalize_coordinate("90.0", false, Axis::Latitude).is_ok());
        assert!(normalize_coordinate("-180,0", true, Axis::Longitude).is_ok());
        assert!(normalize_coordinate("180,0001", true, Axis::Longitude).is_err());
    }
}
