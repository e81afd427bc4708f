//! Duration unit codes and calendar-aware duration conversion.

use mpp_model::{Duration, ProjectProperties, TimeUnit};
use tracing::debug;

/// Unit code meaning "use the project's default duration units".
pub const PROJECT_DEFAULT_UNITS: u16 = 21;

/// Decode a stored duration-unit code.
///
/// The upper bits of the code carry flags and are masked off. Unrecognised
/// codes fall back to days.
#[must_use]
pub fn duration_time_units(code: u16, properties: &ProjectProperties) -> TimeUnit {
    match code & 0x1F {
        3 => TimeUnit::Minutes,
        4 => TimeUnit::ElapsedMinutes,
        5 => TimeUnit::Hours,
        6 => TimeUnit::ElapsedHours,
        7 => TimeUnit::Days,
        8 => TimeUnit::ElapsedDays,
        9 => TimeUnit::Weeks,
        10 => TimeUnit::ElapsedWeeks,
        11 => TimeUnit::Months,
        12 => TimeUnit::ElapsedMonths,
        19 => TimeUnit::Percent,
        20 => TimeUnit::ElapsedPercent,
        PROJECT_DEFAULT_UNITS => properties.default_duration_units,
        other => {
            debug!(code = other, "unknown duration unit code, using days");
            TimeUnit::Days
        }
    }
}

/// Convert a raw duration in tenths of a minute into `units`, using fixed
/// conversion factors (an eight-hour day, a five-day week, a twenty-day month).
#[must_use]
pub fn duration_from_tenths(tenths: f64, units: TimeUnit) -> Duration {
    let divisor = match units {
        TimeUnit::Minutes | TimeUnit::ElapsedMinutes => 10.0,
        TimeUnit::Hours | TimeUnit::ElapsedHours => 600.0,
        TimeUnit::Days => 4_800.0,
        TimeUnit::ElapsedDays => 14_400.0,
        TimeUnit::Weeks => 24_000.0,
        TimeUnit::ElapsedWeeks => 100_800.0,
        TimeUnit::Months => 96_000.0,
        TimeUnit::ElapsedMonths => 432_000.0,
        TimeUnit::Years => 1_248_000.0,
        TimeUnit::ElapsedYears => 5_256_000.0,
        TimeUnit::Percent | TimeUnit::ElapsedPercent => 1.0,
    };
    Duration::new(tenths / divisor, units)
}

/// Convert a raw duration in tenths of a minute into `units`, using the
/// project's working hours for days, weeks and months.
///
/// A raw value of -1 marks an unset duration.
#[must_use]
pub fn adjusted_duration(
    properties: &ProjectProperties,
    tenths: i32,
    units: TimeUnit,
) -> Option<Duration> {
    if tenths == -1 {
        return None;
    }
    let value = f64::from(tenths);
    let duration = match units {
        TimeUnit::Days => {
            let per_day = f64::from(properties.minutes_per_day) * 10.0;
            Duration::new(ratio(value, per_day), units)
        }
        TimeUnit::ElapsedDays => Duration::new(value / (24.0 * 600.0), units),
        TimeUnit::Weeks => {
            let per_week = f64::from(properties.minutes_per_week) * 10.0;
            Duration::new(ratio(value, per_week), units)
        }
        TimeUnit::ElapsedWeeks => Duration::new(value / (60.0 * 24.0 * 7.0 * 10.0), units),
        TimeUnit::Months => {
            let per_month = properties.minutes_per_month() * 10.0;
            Duration::new(ratio(value, per_month), units)
        }
        TimeUnit::ElapsedMonths => Duration::new(value / (60.0 * 24.0 * 30.0 * 10.0), units),
        _ => duration_from_tenths(value, units),
    };
    Some(duration)
}

fn ratio(value: f64, divisor: f64) -> f64 {
    if divisor == 0.0 { 0.0 } else { value / divisor }
}
