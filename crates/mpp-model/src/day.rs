//! Weekdays and day types.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Day of the week, numbered the way MPP files number them (Sunday = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Day {
    /// All days, Sunday first, matching the on-disk order of weekly patterns.
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Day from its 1-based MPP number.
    #[must_use]
    pub fn from_value(value: i32) -> Option<Self> {
        usize::try_from(value - 1)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// 1-based MPP number.
    #[must_use]
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// 0-based index, Sunday = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Sunday => Weekday::Sun,
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
        }
    }
}

/// Whether a day in a weekly pattern is worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayType {
    NonWorking,
    Working,
    /// Inherit from the base calendar.
    #[default]
    Default,
}

impl From<bool> for DayType {
    fn from(working: bool) -> Self {
        if working {
            Self::Working
        } else {
            Self::NonWorking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpp_numbering_starts_on_sunday() {
        assert_eq!(Day::from_value(1), Some(Day::Sunday));
        assert_eq!(Day::from_value(7), Some(Day::Saturday));
        assert_eq!(Day::from_value(0), None);
        assert_eq!(Day::from_value(8), None);
        assert_eq!(Day::Wednesday.index(), 3);
    }

    #[test]
    fn weekday_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(Day::of(date), Day::Monday);
        assert_eq!(Weekday::from(Day::Friday), Weekday::Fri);
    }
}
