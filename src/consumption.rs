use crate::error::{MeterError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    pub amount: f64,
    /// The counter wrapped past `max_value` between the two readings.
    pub overflow_occurred: bool,
}

/// f64 represents every integer up to 2^53 exactly, about 15 decimal digits.
pub const MAX_LEADING_DIGITS: u32 = 15;

/// Largest value a counter with `leading_digits` integer digits can show.
///
/// Inputs above `MAX_LEADING_DIGITS` are clamped to it.
pub fn max_value_for_digits(leading_digits: u32) -> f64 {
    10f64.powi(leading_digits.min(MAX_LEADING_DIGITS) as i32) - 1.0
}

pub fn validate_reading(value: f64, max_value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 || value > max_value {
        return Err(MeterError::InvalidReading { value, max_value });
    }
    Ok(value)
}

/// Rejects readings with more than `fraction_digits` decimals.
pub fn validate_precision(value: f64, fraction_digits: u32) -> Result<f64> {
    let scaled = value * 10f64.powi(fraction_digits as i32);
    if (scaled - scaled.round()).abs() > 1e-6 {
        return Err(MeterError::ExcessPrecision {
            value,
            fraction_digits,
        });
    }
    Ok(value)
}

/// Consumption from `old_reading` to `new_reading`.
///
/// A new reading below the old one means the counter rolled over. The meter
/// has `max_value + 1` distinct states, so the wrap contributes
/// `max_value + 1 - old_reading` units before counting up to `new_reading`.
pub fn consumption_between(old_reading: f64, new_reading: f64, max_value: f64) -> Result<Consumption> {
    validate_reading(old_reading, max_value)?;
    validate_reading(new_reading, max_value)?;
    Ok(forward_distance(old_reading, new_reading, max_value))
}

/// Rollover-aware distance for readings already known to be on the dial.
///
/// Projected readings come out of `normalize_reading` and may carry a
/// fraction above `max_value`, so they skip the anchor range check.
pub(crate) fn forward_distance(old_reading: f64, new_reading: f64, max_value: f64) -> Consumption {
    if new_reading >= old_reading {
        return Consumption {
            amount: new_reading - old_reading,
            overflow_occurred: false,
        };
    }

    let amount = (max_value + 1.0 - old_reading) + new_reading;
    debug!(
        "Rollover from {} to {} (max {}): consumption {}",
        old_reading, new_reading, max_value, amount
    );

    Consumption {
        amount,
        overflow_occurred: true,
    }
}

/// Wraps any real value onto the dial, `[0, max_value + 1)`.
pub fn normalize_reading(value: f64, max_value: f64) -> f64 {
    let modulus = max_value + 1.0;
    let wrapped = value.rem_euclid(modulus);

    // rem_euclid may round a tiny negative remainder up to the modulus itself.
    if wrapped >= modulus {
        0.0
    } else {
        wrapped
    }
}
