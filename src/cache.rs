use crate::error::Result;
use crate::schema::{CalculationInput, MeterConfig};
use crate::{CalculationReport, MeterCalculator};
use log::debug;

/// Remembers the most recent calculation and returns it again for an
/// identical input and configuration.
#[derive(Debug, Default)]
pub struct CachedCalculator {
    last: Option<(CalculationInput, MeterConfig, CalculationReport)>,
    hits: u64,
}

impl CachedCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculate(
        &mut self,
        input: &CalculationInput,
        config: &MeterConfig,
    ) -> Result<CalculationReport> {
        if let Some((cached_input, cached_config, report)) = &self.last {
            if cached_input == input && cached_config == config {
                self.hits += 1;
                debug!("Reusing cached calculation ({} hits)", self.hits);
                return Ok(report.clone());
            }
        }

        let report = MeterCalculator::calculate(input, config)?;
        self.last = Some((input.clone(), config.clone(), report.clone()));
        Ok(report)
    }

    pub fn last_report(&self) -> Option<&CalculationReport> {
        self.last.as_ref().map(|(_, _, report)| report)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input() -> CalculationInput {
        CalculationInput::new(
            100.0,
            400.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        )
    }

    #[test]
    fn test_identical_request_hits_cache() {
        let mut calc = CachedCalculator::new();
        let config = MeterConfig::default();

        let first = calc.calculate(&input(), &config).unwrap();
        let second = calc.calculate(&input(), &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(calc.hits(), 1);
    }

    #[test]
    fn test_changed_config_recalculates() {
        let mut calc = CachedCalculator::new();
        let config = MeterConfig::default();
        calc.calculate(&input(), &config).unwrap();

        let winter = MeterConfig {
            winter_mode: true,
            ..MeterConfig::default()
        };
        let report = calc.calculate(&input(), &winter).unwrap();

        assert_eq!(calc.hits(), 0);
        assert!(report.rates.winter_per_day > report.rates.summer_per_day);
        assert_eq!(calc.last_report(), Some(&report));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut calc = CachedCalculator::new();
        let bad = CalculationInput::new(
            100.0,
            400.0,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        assert!(calc.calculate(&bad, &MeterConfig::default()).is_err());
        assert!(calc.last_report().is_none());

        calc.calculate(&input(), &MeterConfig::default()).unwrap();
        calc.clear();
        assert!(calc.last_report().is_none());
    }
}
