//! Project-level settings that affect how raw values are interpreted.

use serde::{Deserialize, Serialize};

use crate::duration::TimeUnit;

/// Project calendar options and defaults.
///
/// Raw MPP durations are stored in tenths of a minute; turning them into
/// days, weeks or months requires the project's notion of a working day.
/// All fields have defaults so a partial JSON document can be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectProperties {
    /// Working minutes in one day (default: 480).
    pub minutes_per_day: u32,
    /// Working minutes in one week (default: 2400).
    pub minutes_per_week: u32,
    /// Working days in one month (default: 20).
    pub days_per_month: u32,
    /// Units used when a stored duration asks for the project default.
    pub default_duration_units: TimeUnit,
    /// Units timephased work is reported in after normalisation.
    pub timephased_work_units: TimeUnit,
    /// Digits after the decimal point for currency values.
    pub currency_digits: u8,
}

impl Default for ProjectProperties {
    fn default() -> Self {
        Self {
            minutes_per_day: 480,
            minutes_per_week: 2400,
            days_per_month: 20,
            default_duration_units: TimeUnit::Days,
            timephased_work_units: TimeUnit::Hours,
            currency_digits: 2,
        }
    }
}

impl ProjectProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_minutes_per_day(mut self, minutes: u32) -> Self {
        self.minutes_per_day = minutes;
        self
    }

    #[must_use]
    pub fn with_minutes_per_week(mut self, minutes: u32) -> Self {
        self.minutes_per_week = minutes;
        self
    }

    #[must_use]
    pub fn with_days_per_month(mut self, days: u32) -> Self {
        self.days_per_month = days;
        self
    }

    #[must_use]
    pub fn with_default_duration_units(mut self, units: TimeUnit) -> Self {
        self.default_duration_units = units;
        self
    }

    #[must_use]
    pub fn with_timephased_work_units(mut self, units: TimeUnit) -> Self {
        self.timephased_work_units = units;
        self
    }

    /// Working minutes in one month.
    #[must_use]
    pub fn minutes_per_month(&self) -> f64 {
        f64::from(self.minutes_per_day) * f64::from(self.days_per_month)
    }

    /// Working minutes in one year (52 working weeks).
    #[must_use]
    pub fn minutes_per_year(&self) -> f64 {
        f64::from(self.minutes_per_week) * 52.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let props: ProjectProperties =
            serde_json::from_str(r#"{"minutes_per_day": 450}"#).expect("parse properties");
        assert_eq!(props.minutes_per_day, 450);
        assert_eq!(props.minutes_per_week, 2400);
        assert_eq!(props.days_per_month, 20);
        assert_eq!(props.default_duration_units, TimeUnit::Days);
    }

    #[test]
    fn month_minutes() {
        let props = ProjectProperties::default().with_days_per_month(22);
        assert_eq!(props.minutes_per_month(), 480.0 * 22.0);
    }
}
