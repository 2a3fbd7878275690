use crate::consumption::{forward_distance, normalize_reading};
use crate::dates::{are_adjacent_days, count_season_days};
use crate::error::Result;
use crate::rounding::round_with;
use crate::schema::{Anchor, DisplayConfig, MeterConfig, ReferencePeriod};
use crate::seasonality::DailyRates;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingOrigin {
    /// One of the two supplied readings
    Anchor,
    /// Inside the reference period
    Interpolated,
    /// Before the start or after the end of the reference period
    Extrapolated,
    /// Held at an adjacent anchor's reading by the billing convention
    BillingFreeze,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub date: NaiveDate,
    pub origin: ReadingOrigin,
    /// Reading on the dial, `[0, max_value + 1)`.
    pub reading: f64,
    /// Non-negative, rollover-aware consumption between the compared endpoints.
    pub consumption: f64,
    pub elapsed_days: i64,
    pub overflow_occurred: bool,
}

impl ProjectionResult {
    pub fn rounded(&self, display: &DisplayConfig) -> Self {
        Self {
            reading: round_with(self.reading, display),
            consumption: round_with(self.consumption, display),
            ..self.clone()
        }
    }

    pub fn as_anchor(&self) -> Anchor {
        Anchor {
            date: self.date,
            reading: self.reading,
        }
    }
}

/// Projects the reading at `target` from the period start using `rates`.
///
/// Targets before the start extrapolate backwards. Anchor dates return the
/// anchor reading itself. The returned consumption compares the start reading
/// with the projected one in calendar order.
///
/// `overflow_occurred` is set when the reading wrapped, when the compared
/// segment crosses zero, or when the reference period itself rolled over.
pub fn project_reading(
    period: &ReferencePeriod,
    rates: &DailyRates,
    target: NaiveDate,
    max_value: f64,
) -> Result<ProjectionResult> {
    let start = period.start;

    if target == start.date {
        return Ok(ProjectionResult {
            date: target,
            origin: ReadingOrigin::Anchor,
            reading: start.reading,
            consumption: 0.0,
            elapsed_days: 0,
            overflow_occurred: false,
        });
    }

    if target == period.end.date {
        return segment_between(start, period.end, max_value);
    }

    let forward = target > start.date;
    let days = if forward {
        count_season_days(start.date, target, &rates.winter_months)
    } else {
        count_season_days(target, start.date, &rates.winter_months)
    };

    let mut consumption = rates.consumption_for(days);
    if !forward {
        consumption = -consumption;
    }

    let period_rolled_over = period.end.reading < start.reading;
    let raw_reading = start.reading + consumption;
    let reading = normalize_reading(raw_reading, max_value);
    let wrapped = raw_reading != reading;

    let shown = if forward {
        forward_distance(start.reading, reading, max_value)
    } else {
        forward_distance(reading, start.reading, max_value)
    };

    debug!(
        "Projected {} -> {}: {} days, raw {} -> reading {} (wrapped: {})",
        start.date,
        target,
        days.total(),
        raw_reading,
        reading,
        wrapped
    );

    let origin = if forward && target < period.end.date {
        ReadingOrigin::Interpolated
    } else {
        ReadingOrigin::Extrapolated
    };

    Ok(ProjectionResult {
        date: target,
        origin,
        reading,
        consumption: shown.amount,
        elapsed_days: days.total(),
        overflow_occurred: wrapped || shown.overflow_occurred || period_rolled_over,
    })
}

/// Consumption and elapsed days between two known readings.
pub fn segment_between(from: Anchor, to: Anchor, max_value: f64) -> Result<ProjectionResult> {
    let consumption = forward_distance(from.reading, to.reading, max_value);
    Ok(ProjectionResult {
        date: to.date,
        origin: ReadingOrigin::Anchor,
        reading: to.reading,
        consumption: consumption.amount,
        elapsed_days: (to.date - from.date).num_days(),
        overflow_occurred: consumption.overflow_occurred,
    })
}

fn frozen_at(anchor: Anchor, target: NaiveDate) -> ProjectionResult {
    ProjectionResult {
        date: target,
        origin: ReadingOrigin::BillingFreeze,
        reading: anchor.reading,
        consumption: 0.0,
        elapsed_days: 1,
        overflow_occurred: false,
    }
}

/// Applies the billing convention on top of the rate model.
pub struct Projector {
    max_value: f64,
    billing_mode: bool,
}

impl Projector {
    pub fn new(max_value: f64, billing_mode: bool) -> Self {
        Self {
            max_value,
            billing_mode,
        }
    }

    pub fn from_config(config: &MeterConfig) -> Self {
        Self::new(config.max_value(), config.billing_mode)
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// In billing mode a target one calendar day away from an anchor keeps
    /// that anchor's reading. The end anchor is checked first. Anchor dates
    /// always keep their own reading.
    pub fn project(
        &self,
        period: &ReferencePeriod,
        rates: &DailyRates,
        target: NaiveDate,
    ) -> Result<ProjectionResult> {
        let is_anchor = target == period.start.date || target == period.end.date;

        if self.billing_mode && !is_anchor {
            for anchor in [period.end, period.start] {
                if are_adjacent_days(anchor.date, target) {
                    debug!(
                        "Billing mode: {} is adjacent to anchor {}, reading frozen at {}",
                        target, anchor.date, anchor.reading
                    );
                    return Ok(frozen_at(anchor, target));
                }
            }
        }

        project_reading(period, rates, target, self.max_value)
    }

    pub fn segment(&self, from: Anchor, to: Anchor) -> Result<ProjectionResult> {
        if self.billing_mode && are_adjacent_days(from.date, to.date) && from.reading == to.reading {
            return Ok(frozen_at(to, to.date));
        }
        segment_between(from, to, self.max_value)
    }
}
