//! Terminal prompts that build a [`RunConfig`] for a loaded table.

use crate::config::{detect_column, ModeKind, RunConfig, SourceDatum, UtmZone};
use crate::validation::Axis;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

/// Pre-selected entry for a column picker: the requested column if present,
/// else the detected one, else the first.
fn column_default(headers: &[String], requested: Option<&str>, axis: Axis) -> usize {
    requested
        .and_then(|name| headers.iter().position(|h| h == name))
        .or_else(|| detect_column(headers, axis).map(|c| c.index))
        .unwrap_or(0)
}

fn mode_default(mode: ModeKind) -> usize {
    match mode {
        ModeKind::Forced31n => 0,
        ModeKind::Auto => 1,
        ModeKind::Manual => 2,
    }
}

/// Ask for every setting, starting from `defaults`.
pub fn prompt_run_config(headers: &[String], defaults: &RunConfig) -> Result<RunConfig, dialoguer::Error> {
    let theme = ColorfulTheme::default();
    let mut config = defaults.clone();

    let lat = Select::with_theme(&theme)
        .with_prompt("Columna de Latitud")
        .items(headers)
        .default(column_default(headers, defaults.latitude_column.as_deref(), Axis::Latitude))
        .interact()?;
    let lon = Select::with_theme(&theme)
        .with_prompt("Columna de Longitud")
        .items(headers)
        .default(column_default(headers, defaults.longitude_column.as_deref(), Axis::Longitude))
        .interact()?;
    config.latitude_column = Some(headers[lat].clone());
    config.longitude_column = Some(headers[lon].clone());

    config.comma_decimal = Confirm::with_theme(&theme)
        .with_prompt("¿Lat/lon usan coma decimal? (ej. 41,8435)")
        .default(defaults.comma_decimal)
        .interact()?;

    let datums = [SourceDatum::Etrs89, SourceDatum::Wgs84];
    let datum = Select::with_theme(&theme)
        .with_prompt("Datum de entrada (lat/lon)")
        .items(&datums.map(|d| d.to_string()))
        .default(datums.iter().position(|d| *d == defaults.source_datum).unwrap_or(0))
        .interact()?;
    config.source_datum = datums[datum];

    let modes = [
        "Forzar ETRS89 / UTM 31N (EPSG:25831)",
        "Auto por huso (ETRS89 / UTM 29-31N)",
        "Huso fijo",
    ];
    config.output_mode = match Select::with_theme(&theme)
        .with_prompt("Modo de salida")
        .items(&modes)
        .default(mode_default(defaults.output_mode))
        .interact()?
    {
        0 => ModeKind::Forced31n,
        1 => ModeKind::Auto,
        _ => ModeKind::Manual,
    };

    match config.output_mode {
        ModeKind::Manual => {
            let zones = UtmZone::ALL;
            let default_zone = defaults
                .manual_zone
                .and_then(|z| zones.iter().position(|zone| zone.number() == z))
                .unwrap_or(2);
            let zone = Select::with_theme(&theme)
                .with_prompt("Huso UTM")
                .items(&zones.map(|z| format!("{} ({})", z, z.epsg())))
                .default(default_zone)
                .interact()?;
            config.manual_zone = Some(zones[zone].number());
        }
        ModeKind::Auto => {
            config.clamp_auto_zone = Confirm::with_theme(&theme)
                .with_prompt("¿Ajustar puntos fuera de los husos 29-31 al huso más cercano?")
                .default(defaults.clamp_auto_zone)
                .interact()?;
        }
        ModeKind::Forced31n => {}
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["id".into(), "LATITUD".into(), "lon_x".into()]
    }

    #[test]
    fn test_column_default_prefers_request_then_detection() {
        assert_eq!(column_default(&headers(), Some("id"), Axis::Latitude), 0);
        assert_eq!(column_default(&headers(), None, Axis::Latitude), 1);
        assert_eq!(column_default(&headers(), Some("missing"), Axis::Longitude), 2);
        assert_eq!(column_default(&["a".to_string()], None, Axis::Longitude), 0);
    }

    #[test]
    fn test_mode_default() {
        assert_eq!(mode_default(ModeKind::Forced31n), 0);
        assert_eq!(mode_default(ModeKind::Manual), 2);
    }
}
