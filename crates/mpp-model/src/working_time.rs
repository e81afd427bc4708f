//! Working-time arithmetic over calendars.
//!
//! Everything here is a pure function of a calendar and the date/time values
//! passed in. Implementors of [`WorkingTime`] only answer one question, the
//! working ranges on a given date; the provided methods build the rest.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};

use crate::calendar::{ProjectCalendar, ProjectCalendars, TimeRange, WeekPattern};
use crate::day::{Day, DayType};

/// How far ahead to look for working time before giving up.
const MAX_SEARCH_DAYS: u32 = 5 * 366;

/// Base calendars deeper than this are treated as missing.
const MAX_PARENT_DEPTH: usize = 16;

pub trait WorkingTime {
    /// Working ranges on `date`, in order. Empty for a non-working date.
    fn working_ranges(&self, date: NaiveDate) -> Vec<TimeRange>;

    fn is_working_date(&self, date: NaiveDate) -> bool {
        !self.working_ranges(date).is_empty()
    }

    /// Minutes of working time between two instants.
    fn work_minutes(&self, start: NaiveDateTime, finish: NaiveDateTime) -> f64 {
        if finish <= start {
            return 0.0;
        }
        let mut total = ChronoDuration::zero();
        let mut date = start.date();
        while date <= finish.date() {
            for range in self.working_ranges(date) {
                let (range_start, range_end) = range_bounds(date, range);
                let from = range_start.max(start);
                let to = range_end.min(finish);
                if to > from {
                    total += to - from;
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        total.num_milliseconds() as f64 / 60_000.0
    }

    /// End of the last working range on `date`.
    fn finish_time(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        self.working_ranges(date)
            .last()
            .map(|range| range_bounds(date, *range).1)
    }

    /// The first working instant at or after `from`.
    fn next_work_start(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut date = from.date();
        for _ in 0..MAX_SEARCH_DAYS {
            for range in self.working_ranges(date) {
                let (range_start, range_end) = range_bounds(date, range);
                if range_end > from {
                    return Some(range_start.max(from));
                }
            }
            date = date.succ_opt()?;
        }
        None
    }

    /// The instant reached after `minutes` of working time from `start`.
    ///
    /// When the work ends exactly at the end of a working range,
    /// `next_work_start` chooses between that range end and the start of
    /// the following working range.
    fn add_work(&self, start: NaiveDateTime, minutes: f64, next_work_start: bool) -> NaiveDateTime {
        let mut remaining = ChronoDuration::milliseconds((minutes.max(0.0) * 60_000.0).round() as i64);
        let mut current = start;
        if remaining.is_zero() {
            return if next_work_start {
                self.next_work_start(current).unwrap_or(current)
            } else {
                current
            };
        }

        let mut date = start.date();
        for _ in 0..MAX_SEARCH_DAYS {
            for range in self.working_ranges(date) {
                let (range_start, range_end) = range_bounds(date, range);
                if range_end <= current {
                    continue;
                }
                let from = range_start.max(current);
                let available = range_end - from;
                if remaining < available {
                    return from + remaining;
                }
                remaining -= available;
                current = range_end;
                if remaining.is_zero() {
                    return if next_work_start {
                        self.next_work_start(current).unwrap_or(current)
                    } else {
                        current
                    };
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        current
    }
}

fn range_bounds(date: NaiveDate, range: TimeRange) -> (NaiveDateTime, NaiveDateTime) {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    (
        midnight + ChronoDuration::minutes(i64::from(range.start_minute())),
        midnight + ChronoDuration::minutes(i64::from(range.end_minute())),
    )
}

/// Ranges a weekly pattern defines for a day, or `None` to defer to the base.
fn pattern_ranges(week: &WeekPattern, day: Day) -> Option<Vec<TimeRange>> {
    match week.working_day(day) {
        DayType::Working => Some(week.hours(day).to_vec()),
        DayType::NonWorking => Some(Vec::new()),
        DayType::Default => None,
    }
}

/// Ranges a calendar defines itself for `date`, before any inheritance.
fn own_ranges(calendar: &ProjectCalendar, date: NaiveDate) -> Option<Vec<TimeRange>> {
    if let Some(exception) = calendar.exception_for(date) {
        return Some(exception.ranges.clone());
    }
    let day = Day::of(date);
    if let Some(ranges) = calendar
        .work_week_for(date)
        .and_then(|week| pattern_ranges(&week.week, day))
    {
        return Some(ranges);
    }
    pattern_ranges(&calendar.week, day)
}

fn default_week_ranges(date: NaiveDate) -> Vec<TimeRange> {
    let week = WeekPattern::default_working_week();
    week.hours(Day::of(date)).to_vec()
}

/// A calendar on its own; `Default` days fall back to the default week.
impl WorkingTime for ProjectCalendar {
    fn working_ranges(&self, date: NaiveDate) -> Vec<TimeRange> {
        own_ranges(self, date).unwrap_or_else(|| default_week_ranges(date))
    }
}

/// A calendar resolved against its project's calendars, so `Default` days
/// inherit from the base calendar chain.
#[derive(Debug, Clone, Copy)]
pub struct CalendarView<'a> {
    calendars: &'a ProjectCalendars,
    calendar: &'a ProjectCalendar,
}

impl<'a> CalendarView<'a> {
    #[must_use]
    pub fn new(calendars: &'a ProjectCalendars, calendar: &'a ProjectCalendar) -> Self {
        Self { calendars, calendar }
    }

    #[must_use]
    pub fn calendar(&self) -> &'a ProjectCalendar {
        self.calendar
    }
}

impl ProjectCalendars {
    /// Working-time view of the calendar with `unique_id`.
    #[must_use]
    pub fn view(&self, unique_id: i32) -> Option<CalendarView<'_>> {
        self.by_unique_id(unique_id)
            .map(|calendar| CalendarView::new(self, calendar))
    }
}

impl WorkingTime for CalendarView<'_> {
    fn working_ranges(&self, date: NaiveDate) -> Vec<TimeRange> {
        let mut calendar = self.calendar;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Some(ranges) = own_ranges(calendar, date) {
                return ranges;
            }
            match calendar
                .parent_unique_id
                .and_then(|parent| self.calendars.by_unique_id(parent))
            {
                Some(parent) => calendar = parent,
                None => break,
            }
        }
        default_week_ranges(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn work_minutes_across_weekend() {
        let calendar = ProjectCalendar::default_base();
        // Friday 2024-01-05 10:00 to Monday 2024-01-08 10:00
        let minutes = calendar.work_minutes(at(2024, 1, 5, 10, 0), at(2024, 1, 8, 10, 0));
        assert_eq!(minutes, 6.0 * 60.0 + 2.0 * 60.0);
    }

    #[test]
    fn next_work_start_skips_lunch_and_weekend() {
        let calendar = ProjectCalendar::default_base();
        assert_eq!(
            calendar.next_work_start(at(2024, 1, 5, 12, 30)),
            Some(at(2024, 1, 5, 13, 0))
        );
        assert_eq!(
            calendar.next_work_start(at(2024, 1, 5, 17, 0)),
            Some(at(2024, 1, 8, 8, 0))
        );
    }

    #[test]
    fn add_work_lands_on_range_end_or_next_start() {
        let calendar = ProjectCalendar::default_base();
        let start = at(2024, 1, 5, 8, 0);
        assert_eq!(calendar.add_work(start, 480.0, false), at(2024, 1, 5, 17, 0));
        assert_eq!(calendar.add_work(start, 480.0, true), at(2024, 1, 8, 8, 0));
        assert_eq!(calendar.add_work(start, 300.0, false), at(2024, 1, 5, 14, 0));
    }

    #[test]
    fn exception_overrides_week() {
        let mut calendar = ProjectCalendar::default_base();
        let holiday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        calendar.add_calendar_exception(holiday, holiday);
        assert!(!calendar.is_working_date(holiday));
        assert!(calendar.is_working_date(holiday.succ_opt().unwrap()));
    }

    #[test]
    fn derived_calendar_inherits_default_days() {
        let mut calendars = ProjectCalendars::new();
        let mut base = ProjectCalendar::default_base();
        base.unique_id = Some(1);
        calendars.add(base);

        let mut derived = ProjectCalendar::default_derived();
        derived.unique_id = Some(2);
        derived.parent_unique_id = Some(1);
        derived.set_working_day(Day::Monday, DayType::NonWorking);
        calendars.add(derived);

        let view = calendars.view(2).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert!(!view.is_working_date(monday));
        assert_eq!(view.working_ranges(tuesday).len(), 2);
    }
}
