use crate::consumption::consumption_between;
use crate::dates::{count_season_days, days_between, SeasonDays};
use crate::error::{MeterError, Result};
use crate::schema::{ReferencePeriod, SeasonConfig};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Daily consumption rates derived from a reference period.
///
/// Every projection, inside or outside the period, is evaluated from this
/// pair. With winter mode off both rates are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRates {
    pub summer_per_day: f64,
    pub winter_per_day: f64,
    /// Months the winter rate applies to. Empty when winter mode is off.
    pub winter_months: Vec<u32>,
}

impl DailyRates {
    pub fn uniform(per_day: f64) -> Self {
        Self {
            summer_per_day: per_day,
            winter_per_day: per_day,
            winter_months: Vec::new(),
        }
    }

    pub fn consumption_for(&self, days: SeasonDays) -> f64 {
        days.summer_days as f64 * self.summer_per_day
            + days.winter_days as f64 * self.winter_per_day
    }

    /// Mean consumption per calendar day over `days`.
    pub fn average_per_day(&self, days: SeasonDays) -> f64 {
        let total = days.total();
        if total == 0 {
            return self.summer_per_day;
        }
        self.consumption_for(days) / total as f64
    }
}

pub fn validate_season_config(season: &SeasonConfig, winter_mode: bool) -> Result<()> {
    if let Some(month) = season.winter_months.iter().find(|m| !(1..=12).contains(*m)) {
        return Err(MeterError::Configuration(format!(
            "Winter month {} is outside 1..=12",
            month
        )));
    }

    let factor_ok = season.winter_factor.is_finite() && season.winter_factor > 1.0;

    if winter_mode {
        if season.winter_months.is_empty() {
            return Err(MeterError::Configuration(
                "Winter mode is enabled but no winter months are configured".to_string(),
            ));
        }
        if !factor_ok {
            return Err(MeterError::Configuration(format!(
                "Winter factor must be greater than 1.0, got {}",
                season.winter_factor
            )));
        }
    } else if !factor_ok {
        warn!(
            "Winter factor {} would not raise winter consumption; it is ignored while winter mode is off",
            season.winter_factor
        );
    }

    Ok(())
}

pub fn derive_rates(
    period: &ReferencePeriod,
    season: &SeasonConfig,
    winter_mode: bool,
    max_value: f64,
) -> Result<DailyRates> {
    let total_days = days_between(period.start.date, period.end.date);
    if total_days <= 0 {
        return Err(MeterError::DegeneratePeriod {
            start: period.start.date.to_string(),
            end: period.end.date.to_string(),
        });
    }

    let total = consumption_between(period.start.reading, period.end.reading, max_value)?;

    if !winter_mode {
        let per_day = total.amount / total_days as f64;
        debug!(
            "Uniform rate: {} over {} days = {} per day",
            total.amount, total_days, per_day
        );
        return Ok(DailyRates::uniform(per_day));
    }

    validate_season_config(season, winter_mode)?;

    let days = count_season_days(period.start.date, period.end.date, &season.winter_months);
    let effective_days = days.summer_days as f64 + days.winter_days as f64 * season.winter_factor;
    let summer_per_day = total.amount / effective_days;
    let winter_per_day = summer_per_day * season.winter_factor;

    debug!(
        "Seasonal rates: {} summer days, {} winter days, {} effective days -> summer {} / winter {} per day",
        days.summer_days, days.winter_days, effective_days, summer_per_day, winter_per_day
    );

    Ok(DailyRates {
        summer_per_day,
        winter_per_day,
        winter_months: season.winter_months.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Anchor;
    use chrono::NaiveDate;

    const MAX: f64 = 999_999.0;

    fn period(start: (i32, u32, u32), start_reading: f64, end: (i32, u32, u32), end_reading: f64) -> ReferencePeriod {
        ReferencePeriod::new(
            Anchor::new(
                NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
                start_reading,
                MAX,
            )
            .unwrap(),
            Anchor::new(
                NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
                end_reading,
                MAX,
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_rate() {
        let p = period((2025, 1, 1), 1000.0, (2025, 1, 11), 1100.0);
        let rates = derive_rates(&p, &SeasonConfig::default(), false, MAX).unwrap();
        assert!((rates.summer_per_day - 10.0).abs() < 1e-12);
        assert_eq!(rates.summer_per_day, rates.winter_per_day);
        assert!(rates.winter_months.is_empty());
    }

    #[test]
    fn test_uniform_rate_over_rollover() {
        let p = period((2025, 1, 1), 999_990.0, (2025, 1, 11), 10.0);
        let rates = derive_rates(&p, &SeasonConfig::default(), false, MAX).unwrap();
        assert!((rates.summer_per_day - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_winter_rates_reproduce_total() {
        // Oct 1 -> Dec 1: 31 summer days, 30 winter days
        let p = period((2025, 10, 1), 0.0, (2025, 12, 1), 6130.0);
        let season = SeasonConfig::default();
        let rates = derive_rates(&p, &season, true, MAX).unwrap();

        assert!((rates.winter_per_day / rates.summer_per_day - 1.02).abs() < 1e-12);

        let days = count_season_days(p.start.date, p.end.date, &season.winter_months);
        assert_eq!(days.summer_days, 31);
        assert_eq!(days.winter_days, 30);
        assert!((rates.consumption_for(days) - 6130.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_summer_period_matches_uniform() {
        let p = period((2025, 5, 1), 0.0, (2025, 7, 1), 610.0);
        let seasonal = derive_rates(&p, &SeasonConfig::default(), true, MAX).unwrap();
        let uniform = derive_rates(&p, &SeasonConfig::default(), false, MAX).unwrap();
        assert!((seasonal.summer_per_day - uniform.summer_per_day).abs() < 1e-12);
    }

    #[test]
    fn test_average_per_day() {
        let rates = DailyRates {
            summer_per_day: 10.0,
            winter_per_day: 20.0,
            winter_months: vec![1],
        };
        let days = SeasonDays {
            winter_days: 1,
            summer_days: 3,
        };
        assert!((rates.average_per_day(days) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_winter_mode_rejects_bad_config() {
        let p = period((2025, 1, 1), 0.0, (2025, 2, 1), 100.0);

        let empty = SeasonConfig {
            winter_months: vec![],
            winter_factor: 1.02,
        };
        assert!(matches!(
            derive_rates(&p, &empty, true, MAX),
            Err(MeterError::Configuration(_))
        ));

        let flat = SeasonConfig {
            winter_months: vec![1],
            winter_factor: 1.0,
        };
        assert!(matches!(
            derive_rates(&p, &flat, true, MAX),
            Err(MeterError::Configuration(_))
        ));

        // Ignored while winter mode is off.
        assert!(derive_rates(&p, &flat, false, MAX).is_ok());
    }

    #[test]
    fn test_month_out_of_range() {
        let season = SeasonConfig {
            winter_months: vec![13],
            winter_factor: 1.1,
        };
        assert!(validate_season_config(&season, false).is_err());
    }
}
