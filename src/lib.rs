//! # Meter Projection
//!
//! A library for projecting utility meter readings (electricity, gas, water)
//! from two known readings to any other date.
//!
//! ## Core Concepts
//!
//! - **Reference Period**: Two anchor readings with dates. All rates are derived from it.
//! - **Rollover**: A meter with `n` integer digits wraps from `10^n - 1` back to zero.
//!   Consumption across the wrap counts the zero state, so `999997 -> 3` is 6 units.
//! - **Winter Mode**: Days in winter months consume `winter_factor` times as much as
//!   summer days. The reference period total is preserved.
//! - **Interpolation / Extrapolation**: The same daily rates are evaluated for dates
//!   inside, before and after the reference period.
//! - **Billing Mode**: Calendar-adjacent dates (31.12. -> 01.01.) share one frozen
//!   reading, so that day carries zero consumption.
//!
//! ## Example
//!
//! ```rust,ignore
//! use meter_projection::*;
//! use chrono::NaiveDate;
//!
//! let input = CalculationInput::new(
//!     999_500.0,
//!     1_500.0,
//!     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
//! )
//! .with_future_date(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
//!
//! let report = MeterCalculator::calculate(&input, &MeterConfig::default()).unwrap();
//! assert!(report.total.overflow_occurred);
//! ```

pub mod cache;
pub mod consumption;
pub mod dates;
pub mod error;
pub mod locale;
pub mod projection;
pub mod rounding;
pub mod schema;
pub mod seasonality;

pub use cache::CachedCalculator;
pub use consumption::{
    consumption_between, max_value_for_digits, normalize_reading, validate_reading, Consumption,
};
pub use dates::{are_adjacent_days, count_season_days, days_between, is_winter_month, SeasonDays};
pub use error::{MeterError, Result};
pub use projection::{project_reading, segment_between, ProjectionResult, Projector, ReadingOrigin};
pub use rounding::{round_for_display, round_with};
pub use schema::*;
pub use seasonality::{derive_rates, validate_season_config, DailyRates};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

/// Result for an optional target date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TargetOutcome {
    Projected(ProjectionResult),
    /// No target date was supplied.
    NotApplicable,
    /// A target date was supplied but could not be projected.
    Failed(MeterError),
}

impl TargetOutcome {
    fn from_result(label: &str, result: Result<ProjectionResult>) -> Self {
        match result {
            Ok(projection) => TargetOutcome::Projected(projection),
            Err(e) => {
                warn!("{} target not projected: {}", label, e);
                TargetOutcome::Failed(e)
            }
        }
    }

    pub fn projection(&self) -> Option<&ProjectionResult> {
        match self {
            TargetOutcome::Projected(p) => Some(p),
            _ => None,
        }
    }

    fn rounded(&self, display: &DisplayConfig) -> Self {
        match self {
            TargetOutcome::Projected(p) => TargetOutcome::Projected(p.rounded(display)),
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationReport {
    pub max_value: f64,
    /// Start anchor to end anchor.
    pub total: ProjectionResult,
    pub rates: DailyRates,
    /// Weighted mean consumption per calendar day over the reference period.
    pub average_per_day: f64,
    /// Start anchor to the between date.
    pub between: TargetOutcome,
    /// Between date (or start anchor when there is none) to end anchor.
    pub current: ProjectionResult,
    /// End anchor to the future date.
    pub future: TargetOutcome,
}

impl CalculationReport {
    /// Applies the display rounding policy to every reading, consumption and rate.
    pub fn rounded(&self, display: &DisplayConfig) -> Self {
        Self {
            max_value: self.max_value,
            total: self.total.rounded(display),
            rates: DailyRates {
                summer_per_day: round_with(self.rates.summer_per_day, display),
                winter_per_day: round_with(self.rates.winter_per_day, display),
                winter_months: self.rates.winter_months.clone(),
            },
            average_per_day: round_with(self.average_per_day, display),
            between: self.between.rounded(display),
            current: self.current.rounded(display),
            future: self.future.rounded(display),
        }
    }
}

pub struct MeterCalculator;

impl MeterCalculator {
    pub fn calculate(input: &CalculationInput, config: &MeterConfig) -> Result<CalculationReport> {
        config.validate()?;

        let max_value = config.max_value();
        let period = input.reference_period(config)?;

        info!(
            "Calculating meter projection for {} ({}) -> {} ({}), max value {}",
            period.start.date, period.start.reading, period.end.date, period.end.reading, max_value
        );
        debug!(
            "Winter mode: {}, billing mode: {}, between: {:?}, future: {:?}",
            config.winter_mode, config.billing_mode, input.between_date, input.future_date
        );

        let rates = derive_rates(&period, &config.season, config.winter_mode, max_value)?;
        let projector = Projector::from_config(config);

        let total = projector.segment(period.start, period.end)?;
        let season_days = count_season_days(period.start.date, period.end.date, &rates.winter_months);
        let average_per_day = rates.average_per_day(season_days);

        let between = match input.between_date {
            None => TargetOutcome::NotApplicable,
            Some(date) => TargetOutcome::from_result(
                "Between",
                Self::project_between(&projector, &period, &rates, date),
            ),
        };

        let current = match between.projection() {
            Some(b) => projector.segment(b.as_anchor(), period.end)?,
            None => total.clone(),
        };

        let future = match input.future_date {
            None => TargetOutcome::NotApplicable,
            Some(date) => TargetOutcome::from_result(
                "Future",
                Self::project_future(&projector, &period, &rates, date),
            ),
        };

        debug!(
            "Total consumption {} over {} days (overflow: {}), average {} per day",
            total.consumption, total.elapsed_days, total.overflow_occurred, average_per_day
        );

        Ok(CalculationReport {
            max_value,
            total,
            rates,
            average_per_day,
            between,
            current,
            future,
        })
    }

    /// Projects an arbitrary date, measured from the start anchor.
    pub fn project_at(
        input: &CalculationInput,
        config: &MeterConfig,
        target: NaiveDate,
    ) -> Result<ProjectionResult> {
        config.validate()?;
        let max_value = config.max_value();
        let period = input.reference_period(config)?;
        let rates = derive_rates(&period, &config.season, config.winter_mode, max_value)?;
        Projector::from_config(config).project(&period, &rates, target)
    }

    fn project_between(
        projector: &Projector,
        period: &ReferencePeriod,
        rates: &DailyRates,
        date: NaiveDate,
    ) -> Result<ProjectionResult> {
        if date <= period.start.date || date >= period.end.date {
            return Err(MeterError::InvalidDate(format!(
                "between date {} must lie strictly between {} and {}",
                date, period.start.date, period.end.date
            )));
        }

        let projected = projector.project(period, rates, date)?;
        Self::rebase(projector, period.start, projected)
    }

    fn project_future(
        projector: &Projector,
        period: &ReferencePeriod,
        rates: &DailyRates,
        date: NaiveDate,
    ) -> Result<ProjectionResult> {
        if date <= period.end.date {
            return Err(MeterError::InvalidDate(format!(
                "future date {} must lie after {}",
                date, period.end.date
            )));
        }

        let projected = projector.project(period, rates, date)?;
        Self::rebase(projector, period.end, projected)
    }

    /// Measures a projection from `from` while keeping its origin and overflow flag.
    fn rebase(projector: &Projector, from: Anchor, projected: ProjectionResult) -> Result<ProjectionResult> {
        let rebased = projector.segment(from, projected.as_anchor())?;
        Ok(ProjectionResult {
            origin: projected.origin,
            overflow_occurred: rebased.overflow_occurred || projected.overflow_occurred,
            ..rebased
        })
    }
}
