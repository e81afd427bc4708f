//! Time units and durations.
//!
//! Durations carry their own units. Conversion between calendar-relative
//! units (days, weeks, months) depends on the project's configured working
//! hours, so conversions take a [`ProjectProperties`] reference. Elapsed
//! units always use fixed 24-hour days, 7-day weeks and 30-day months.

use serde::{Deserialize, Serialize};

use crate::properties::ProjectProperties;

/// Units a [`Duration`] or rate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeUnit {
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
    Months,
    Years,
    Percent,
    ElapsedMinutes,
    ElapsedHours,
    ElapsedDays,
    ElapsedWeeks,
    ElapsedMonths,
    ElapsedYears,
    ElapsedPercent,
}

impl TimeUnit {
    /// Whether this unit measures wall-clock time rather than working time.
    #[must_use]
    pub const fn is_elapsed(self) -> bool {
        matches!(
            self,
            Self::ElapsedMinutes
                | Self::ElapsedHours
                | Self::ElapsedDays
                | Self::ElapsedWeeks
                | Self::ElapsedMonths
                | Self::ElapsedYears
                | Self::ElapsedPercent
        )
    }

    /// Number of minutes in one of these units, or `None` for percentages.
    #[must_use]
    pub fn minutes_per_unit(self, properties: &ProjectProperties) -> Option<f64> {
        let minutes = match self {
            Self::Minutes | Self::ElapsedMinutes => 1.0,
            Self::Hours | Self::ElapsedHours => 60.0,
            Self::Days => f64::from(properties.minutes_per_day),
            Self::Weeks => f64::from(properties.minutes_per_week),
            Self::Months => properties.minutes_per_month(),
            Self::Years => properties.minutes_per_year(),
            Self::ElapsedDays => 24.0 * 60.0,
            Self::ElapsedWeeks => 7.0 * 24.0 * 60.0,
            Self::ElapsedMonths => 30.0 * 24.0 * 60.0,
            Self::ElapsedYears => 365.0 * 24.0 * 60.0,
            Self::Percent | Self::ElapsedPercent => return None,
        };
        Some(minutes)
    }

    /// Short display suffix, as MS Project shows it.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
            Self::Weeks => "w",
            Self::Months => "mo",
            Self::Years => "y",
            Self::Percent => "%",
            Self::ElapsedMinutes => "em",
            Self::ElapsedHours => "eh",
            Self::ElapsedDays => "ed",
            Self::ElapsedWeeks => "ew",
            Self::ElapsedMonths => "emo",
            Self::ElapsedYears => "ey",
            Self::ElapsedPercent => "e%",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A quantity of time in specific units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    pub value: f64,
    pub units: TimeUnit,
}

impl Duration {
    #[must_use]
    pub const fn new(value: f64, units: TimeUnit) -> Self {
        Self { value, units }
    }

    #[must_use]
    pub const fn minutes(value: f64) -> Self {
        Self::new(value, TimeUnit::Minutes)
    }

    #[must_use]
    pub const fn hours(value: f64) -> Self {
        Self::new(value, TimeUnit::Hours)
    }

    #[must_use]
    pub const fn zero(units: TimeUnit) -> Self {
        Self::new(0.0, units)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Convert to other units.
    ///
    /// Percentages cannot be converted; a percentage duration is returned
    /// unchanged, as is any conversion into a percentage.
    #[must_use]
    pub fn convert_units(self, target: TimeUnit, properties: &ProjectProperties) -> Self {
        if self.units == target {
            return self;
        }
        match (
            self.units.minutes_per_unit(properties),
            target.minutes_per_unit(properties),
        ) {
            (Some(from), Some(to)) if to != 0.0 => Self::new(self.value * from / to, target),
            _ => self,
        }
    }

    /// Duration expressed in minutes of working time.
    #[must_use]
    pub fn to_minutes(self, properties: &ProjectProperties) -> f64 {
        self.convert_units(TimeUnit::Minutes, properties).value
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.units)
    }
}
