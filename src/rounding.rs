use crate::schema::{DisplayConfig, RoundingMode};

/// Rounds `value` for presentation.
///
/// `f64::round` already rounds half away from zero. `Unrounded` rounds at
/// `fraction_digits` decimals instead of truncating.
pub fn round_for_display(value: f64, mode: RoundingMode, fraction_digits: u32) -> f64 {
    match mode {
        RoundingMode::Nearest => value.round(),
        RoundingMode::Floor => value.floor(),
        RoundingMode::Unrounded => round_to_digits(value, fraction_digits),
    }
}

pub fn round_with(value: f64, display: &DisplayConfig) -> f64 {
    round_for_display(value, display.rounding_mode, display.fraction_digits)
}

fn round_to_digits(value: f64, fraction_digits: u32) -> f64 {
    let factor = 10f64.powi(fraction_digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest() {
        assert_eq!(round_for_display(10.6, RoundingMode::Nearest, 3), 11.0);
        assert_eq!(round_for_display(10.4, RoundingMode::Nearest, 3), 10.0);
        assert_eq!(round_for_display(10.5, RoundingMode::Nearest, 3), 11.0);
        assert_eq!(round_for_display(-10.5, RoundingMode::Nearest, 3), -11.0);
    }

    #[test]
    fn test_floor() {
        assert_eq!(round_for_display(10.6, RoundingMode::Floor, 3), 10.0);
        assert_eq!(round_for_display(10.999, RoundingMode::Floor, 3), 10.0);
    }

    #[test]
    fn test_unrounded_rounds_at_fraction_digits() {
        assert_eq!(round_for_display(10.6789, RoundingMode::Unrounded, 3), 10.679);
        assert_eq!(round_for_display(10.6784, RoundingMode::Unrounded, 3), 10.678);
        assert_eq!(round_for_display(10.6789, RoundingMode::Unrounded, 1), 10.7);
        assert_eq!(round_for_display(42.0, RoundingMode::Unrounded, 3), 42.0);
    }

    #[test]
    fn test_round_with_config() {
        let display = DisplayConfig {
            rounding_mode: RoundingMode::Unrounded,
            fraction_digits: 2,
        };
        assert_eq!(round_with(3.14159, &display), 3.14);
        assert_eq!(round_with(1234.5, &DisplayConfig::default()), 1235.0);
    }
}
