//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

/// Parst einen Prozent-Parameter (0.0 ..= 1.0)
///
/// Pass-through numerischer Parse: fehlerhafte Eingaben ergeben 0.0,
/// Werte außerhalb des Bereichs werden hier bewusst nicht validiert.
///
/// # Beispiele
///
/// ```
/// # use esp_core::parse_percent;
/// assert_eq!(parse_percent("0.5"), 0.5);
/// assert_eq!(parse_percent("kaputt"), 0.0);
/// ```
pub fn parse_percent(parameter: &str) -> f32 {
    parameter.trim().parse().unwrap_or(0.0)
}

/// Rechnet einen Öffnungsgrad in eine absolute Zielposition um
///
/// `down_position` ist der einzige Skalenfaktor: 0.0 = ganz geschlossen
/// (Ziel = `down_position`), 1.0 = ganz offen (Ziel = 0). Das Ergebnis
/// wird Richtung Null abgeschnitten.
pub fn target_steps(percent: f32, down_position: i32) -> i32 {
    ((1.0 - percent) * down_position as f32) as i32
}

/// Rechnet einen normierten Parameter in einen Ausgangspegel um
///
/// Geklemmt auf 0.0 ..= 1.0, skaliert auf 0 ..= 255.
pub fn level_from_parameter(parameter: &str) -> u8 {
    (parse_percent(parameter).clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent_valid() {
        assert_eq!(parse_percent("0.0"), 0.0);
        assert_eq!(parse_percent("0.5"), 0.5);
        assert_eq!(parse_percent("1.0"), 1.0);
        assert_eq!(parse_percent(" 0.25 "), 0.25);
    }

    #[test]
    fn test_parse_percent_malformed_is_zero() {
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent("auf"), 0.0);
        assert_eq!(parse_percent("0,5"), 0.0);
    }

    #[test]
    fn test_parse_percent_out_of_range_passes_through() {
        assert_eq!(parse_percent("1.5"), 1.5);
        assert_eq!(parse_percent("-0.5"), -0.5);
    }

    #[test]
    fn test_target_steps_endpoints() {
        assert_eq!(target_steps(0.0, 1000), 1000);
        assert_eq!(target_steps(1.0, 1000), 0);
        assert_eq!(target_steps(0.5, 1000), 500);
    }

    #[test]
    fn test_target_steps_uncalibrated_scale() {
        // down_position == 0 skaliert jedes Ziel auf 0
        assert_eq!(target_steps(0.0, 0), 0);
        assert_eq!(target_steps(0.7, 0), 0);
    }

    #[test]
    fn test_target_steps_truncates() {
        assert_eq!(target_steps(0.333, 1000), 667);
    }

    #[test]
    fn test_level_from_parameter() {
        assert_eq!(level_from_parameter("1.0"), 255);
        assert_eq!(level_from_parameter("0.0"), 0);
        assert_eq!(level_from_parameter("0.5"), 127);
        // geklemmt statt überlaufen
        assert_eq!(level_from_parameter("7.0"), 255);
        assert_eq!(level_from_parameter("-1.0"), 0);
    }
}
