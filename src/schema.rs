use crate::consumption::{
    max_value_for_digits, validate_precision, validate_reading, MAX_LEADING_DIGITS,
};
use crate::error::{MeterError, Result};
use crate::seasonality::validate_season_config;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEADING_DIGITS: u32 = 6;
pub const DEFAULT_FRACTION_DIGITS: u32 = 3;
pub const DEFAULT_WINTER_MONTHS: [u32; 4] = [11, 12, 1, 2];
pub const DEFAULT_WINTER_FACTOR: f64 = 1.02;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RoundingMode {
    #[default]
    #[schemars(description = "Round half away from zero to a whole number (commercial rounding).")]
    Nearest,

    #[schemars(description = "Always round down to the next whole number.")]
    Floor,

    #[schemars(
        description = "Keep the fractional part, rounded half away from zero at `fraction_digits` decimals."
    )]
    Unrounded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct DisplayConfig {
    #[schemars(description = "Rounding policy applied to every displayed reading and consumption.")]
    pub rounding_mode: RoundingMode,

    #[schemars(description = "Decimal places kept in Unrounded mode. Defaults to 3.")]
    pub fraction_digits: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rounding_mode: RoundingMode::Nearest,
            fraction_digits: DEFAULT_FRACTION_DIGITS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SeasonConfig {
    #[schemars(
        description = "Calendar months (1 = January, 12 = December) treated as winter. Defaults to November through February."
    )]
    pub winter_months: Vec<u32>,

    #[schemars(
        description = "Multiplier applied to the daily consumption of winter days. Must be greater than 1.0; 1.02 means +2% in winter."
    )]
    pub winter_factor: f64,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            winter_months: DEFAULT_WINTER_MONTHS.to_vec(),
            winter_factor: DEFAULT_WINTER_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct MeterConfig {
    #[schemars(
        description = "Number of integer digits on the meter display. The largest reading is 10^leading_digits - 1 (6 digits -> 999999)."
    )]
    pub leading_digits: u32,

    #[schemars(description = "Maximum number of decimal places a reading may carry. Defaults to 3.")]
    pub fraction_digits: u32,

    #[schemars(description = "Weight winter days higher than summer days when distributing consumption.")]
    pub winter_mode: bool,

    #[schemars(description = "Winter months and winter factor used when winter_mode is enabled.")]
    pub season: SeasonConfig,

    #[schemars(description = "How results are rounded for presentation.")]
    pub display: DisplayConfig,

    #[schemars(
        description = "Billing convention: calendar-adjacent dates (e.g. 31.12. and 01.01.) share one frozen reading, giving zero consumption over exactly one day."
    )]
    pub billing_mode: bool,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            leading_digits: DEFAULT_LEADING_DIGITS,
            fraction_digits: DEFAULT_FRACTION_DIGITS,
            winter_mode: false,
            season: SeasonConfig::default(),
            display: DisplayConfig::default(),
            billing_mode: false,
        }
    }
}

impl MeterConfig {
    pub fn max_value(&self) -> f64 {
        max_value_for_digits(self.leading_digits)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LEADING_DIGITS).contains(&self.leading_digits) {
            return Err(MeterError::Configuration(format!(
                "leading_digits must be between 1 and {}, got {}",
                MAX_LEADING_DIGITS, self.leading_digits
            )));
        }

        if self.fraction_digits > 6 {
            return Err(MeterError::Configuration(format!(
                "fraction_digits must be at most 6, got {}",
                self.fraction_digits
            )));
        }

        if self.display.fraction_digits > 6 {
            return Err(MeterError::Configuration(format!(
                "display fraction_digits must be at most 6, got {}",
                self.display.fraction_digits
            )));
        }

        validate_season_config(&self.season, self.winter_mode)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: MeterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MeterConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// The already-parsed values of one calculation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CalculationInput {
    #[schemars(description = "Reading at start_date (the older reading).")]
    pub old_reading: f64,

    #[schemars(description = "Reading at end_date (the newer reading). May be lower than old_reading after a rollover.")]
    pub new_reading: f64,

    #[schemars(description = "Date of the older reading, YYYY-MM-DD.")]
    pub start_date: NaiveDate,

    #[schemars(description = "Date of the newer reading, YYYY-MM-DD. Must be after start_date.")]
    pub end_date: NaiveDate,

    #[serde(default)]
    #[schemars(description = "Optional date strictly between start_date and end_date to interpolate.")]
    pub between_date: Option<NaiveDate>,

    #[serde(default)]
    #[schemars(description = "Optional date after end_date to extrapolate.")]
    pub future_date: Option<NaiveDate>,
}

impl CalculationInput {
    pub fn new(
        old_reading: f64,
        new_reading: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            old_reading,
            new_reading,
            start_date,
            end_date,
            between_date: None,
            future_date: None,
        }
    }

    pub fn with_between_date(mut self, date: NaiveDate) -> Self {
        self.between_date = Some(date);
        self
    }

    pub fn with_future_date(mut self, date: NaiveDate) -> Self {
        self.future_date = Some(date);
        self
    }

    /// Validates both readings against the meter's digit bounds.
    pub fn reference_period(&self, config: &MeterConfig) -> Result<ReferencePeriod> {
        let max_value = config.max_value();
        validate_precision(self.old_reading, config.fraction_digits)?;
        validate_precision(self.new_reading, config.fraction_digits)?;
        ReferencePeriod::new(
            Anchor::new(self.start_date, self.old_reading, max_value)?,
            Anchor::new(self.end_date, self.new_reading, max_value)?,
        )
    }
}

/// A known reading on a known date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Anchor {
    pub date: NaiveDate,
    pub reading: f64,
}

impl Anchor {
    pub fn new(date: NaiveDate, reading: f64, max_value: f64) -> Result<Self> {
        Ok(Self {
            date,
            reading: validate_reading(reading, max_value)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferencePeriod {
    pub start: Anchor,
    pub end: Anchor,
}

impl ReferencePeriod {
    pub fn new(start: Anchor, end: Anchor) -> Result<Self> {
        if end.date == start.date {
            return Err(MeterError::DegeneratePeriod {
                start: start.date.to_string(),
                end: end.date.to_string(),
            });
        }
        if end.date < start.date {
            return Err(MeterError::InvalidDate(format!(
                "end date {} is before start date {}",
                end.date, start.date
            )));
        }
        Ok(Self { start, end })
    }
}
