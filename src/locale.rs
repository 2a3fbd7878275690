//! German text conventions at the boundary of the calculator.
//!
//! Readings are written as `1.234,567` (dot thousands separator, decimal
//! comma) and dates as `31.12.2025`. The projection core never calls into this
//! module; callers parse first and format the results afterwards.

use crate::consumption::max_value_for_digits;
use crate::error::{MeterError, Result};
use chrono::NaiveDate;

/// Parses a reading such as `1.234,567`, `1234,5` or `0`.
pub fn parse_reading(text: &str, leading_digits: u32, fraction_digits: u32) -> Result<f64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let malformed = || MeterError::MalformedReading(text.to_string());

    if cleaned.is_empty() {
        return Err(malformed());
    }

    let (integer_part, fraction_part) = match cleaned.split_once(',') {
        Some((int, frac)) => (int, Some(frac)),
        None => (cleaned.as_str(), None),
    };

    let integer_digits = parse_integer_groups(integer_part).ok_or_else(malformed)?;

    let fraction_digits_text = match fraction_part {
        Some(frac) => {
            let valid = !frac.is_empty()
                && frac.len() <= fraction_digits as usize
                && frac.chars().all(|c| c.is_ascii_digit());
            if !valid {
                return Err(malformed());
            }
            frac
        }
        None => "0",
    };

    let value: f64 = format!("{}.{}", integer_digits, fraction_digits_text)
        .parse()
        .map_err(|_| malformed())?;

    let max_value = max_value_for_digits(leading_digits);
    if value > max_value {
        return Err(MeterError::InvalidReading { value, max_value });
    }

    Ok(value)
}

/// Accepts plain digits or 1-3 leading digits followed by `.ddd` groups.
fn parse_integer_groups(text: &str) -> Option<String> {
    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    if !text.contains('.') {
        return is_digits(text).then(|| text.to_string());
    }

    let mut groups = text.split('.');
    let first = groups.next()?;
    if !is_digits(first) || first.len() > 3 || (first.starts_with('0') && first.len() > 1) {
        return None;
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !is_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

/// Parses `TT.MM.JJJJ`; also accepts `-` or `/` separators, single-digit day
/// and month, and two-digit years (below 70 means 20xx).
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    let invalid = |reason: &str| MeterError::InvalidDate(format!("'{}': {}", trimmed, reason));

    let parts: Vec<&str> = trimmed.split(['.', '-', '/']).collect();
    if parts.len() != 3 {
        return Err(invalid("expected TT.MM.JJJJ"));
    }

    let numeric = |s: &str, lens: &[usize]| -> Option<u32> {
        if lens.contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit()) {
            s.parse().ok()
        } else {
            None
        }
    };

    let day = numeric(parts[0], &[1, 2]).ok_or_else(|| invalid("bad day"))?;
    let month = numeric(parts[1], &[1, 2]).ok_or_else(|| invalid("bad month"))?;
    let year_raw = numeric(parts[2], &[2, 4]).ok_or_else(|| invalid("bad year"))?;

    let year = if parts[2].len() == 2 {
        if year_raw < 70 {
            2000 + year_raw
        } else {
            1900 + year_raw
        }
    } else {
        year_raw
    };

    if !(1900..=2100).contains(&year) {
        return Err(invalid("year must be between 1900 and 2100"));
    }

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| invalid("no such calendar day"))
}

/// Formats with thousands dots and a decimal comma, trimming trailing zeros.
pub fn format_reading(value: f64, max_fraction_digits: u32) -> String {
    let text = format!("{:.*}", max_fraction_digits as usize, value.abs());
    let (integer, fraction) = match text.split_once('.') {
        Some((int, frac)) => (int.to_string(), frac.trim_end_matches('0').to_string()),
        None => (text.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let is_zero = grouped.chars().all(|c| c == '0' || c == '.') && fraction.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, fraction)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reading_formats() {
        assert_eq!(parse_reading("1.234,567", 6, 3).unwrap(), 1234.567);
        assert_eq!(parse_reading("1234,56", 6, 3).unwrap(), 1234.56);
        assert_eq!(parse_reading("123456", 6, 3).unwrap(), 123456.0);
        assert_eq!(parse_reading("0", 6, 3).unwrap(), 0.0);
        assert_eq!(parse_reading("0,0", 6, 3).unwrap(), 0.0);
        assert_eq!(parse_reading(" 12.345 ", 6, 3).unwrap(), 12345.0);
    }

    #[test]
    fn test_parse_reading_rejects_malformed() {
        for text in ["", "abc", "1,2345", "12.34", "1.234.5", ",5", "1,", "1,2,3"] {
            assert!(
                matches!(parse_reading(text, 6, 3), Err(MeterError::MalformedReading(_))),
                "{} should be malformed",
                text
            );
        }
    }

    #[test]
    fn test_parse_reading_leading_digit_bound() {
        assert!(matches!(
            parse_reading("1.000.000", 6, 3),
            Err(MeterError::InvalidReading { .. })
        ));
        assert_eq!(parse_reading("001234", 4, 3).unwrap(), 1234.0);
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_date("31.12.2025").unwrap(), expected);
        assert_eq!(parse_date("31-12-2025").unwrap(), expected);
        assert_eq!(parse_date("31/12/25").unwrap(), expected);
        assert_eq!(
            parse_date("1.2.99").unwrap(),
            NaiveDate::from_ymd_opt(1999, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_invalid() {
        for text in ["31.02.2025", "2025-12-31", "12.2025", "01.01.1899", "aa.bb.cccc", ""] {
            assert!(
                matches!(parse_date(text), Err(MeterError::InvalidDate(_))),
                "{} should be invalid",
                text
            );
        }
    }

    #[test]
    fn test_format_reading() {
        assert_eq!(format_reading(1234.567, 3), "1.234,567");
        assert_eq!(format_reading(1234.5, 3), "1.234,5");
        assert_eq!(format_reading(999_999.0, 3), "999.999");
        assert_eq!(format_reading(12.0, 3), "12");
        assert_eq!(format_reading(0.0, 3), "0");
        assert_eq!(format_reading(-1234.25, 2), "-1.234,25");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(format_date(date), "01.01.2026");
    }
}
