//! Project calendars.
//!
//! A calendar is a weekly pattern of working days and hours, plus dated
//! exceptions and work weeks that override the pattern for a range of dates.
//! A derived calendar names a base calendar by unique ID and inherits every
//! day marked [`DayType::Default`] from it.
//!
//! The decoder populates calendars in two phases: every calendar is built
//! first with its base-calendar ID held provisionally, then
//! [`ProjectCalendars::resolve_base_calendars`] links children to parents
//! and removes children whose base cannot be resolved.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::day::{Day, DayType};
use crate::recurrence::RecurringData;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Working days of the default week, Sunday first.
pub const DEFAULT_WORKING_WEEK: [bool; 7] = [false, true, true, true, true, true, false];

/// Morning shift of the default working day, 08:00-12:00.
pub const DEFAULT_WORKING_MORNING: TimeRange = TimeRange::from_minutes_const(8 * 60, 12 * 60);

/// Afternoon shift of the default working day, 13:00-17:00.
pub const DEFAULT_WORKING_AFTERNOON: TimeRange = TimeRange::from_minutes_const(13 * 60, 17 * 60);

/// A span of working time within one day.
///
/// Stored as minutes after midnight. An end of 1440 means midnight at the
/// end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    start: u32,
    end: u32,
}

impl TimeRange {
    const fn from_minutes_const(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Range from a start minute and a length in minutes, clamped to the day.
    #[must_use]
    pub fn from_minutes(start: u32, length: u32) -> Self {
        let start = start.min(MINUTES_PER_DAY);
        let end = start.saturating_add(length).min(MINUTES_PER_DAY);
        Self { start, end }
    }

    /// Range between two times of day; an end of 00:00 means end of day.
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        let start = minute_of_day(start);
        let mut end = minute_of_day(end);
        if end <= start {
            end = MINUTES_PER_DAY;
        }
        Self { start, end }
    }

    #[must_use]
    pub const fn start_minute(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn end_minute(&self) -> u32 {
        self.end
    }

    #[must_use]
    pub fn start(&self) -> NaiveTime {
        time_of_minute(self.start)
    }

    /// End time; midnight at the end of the day is reported as 00:00.
    #[must_use]
    pub fn end(&self) -> NaiveTime {
        time_of_minute(self.end % MINUTES_PER_DAY)
    }

    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start().format("%H:%M"), self.end().format("%H:%M"))
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_of_minute(minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Working day types and hours for each day of a week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekPattern {
    day_types: [DayType; 7],
    hours: [Vec<TimeRange>; 7],
}

impl WeekPattern {
    /// The default working week: Monday to Friday, 08:00-12:00 and 13:00-17:00.
    #[must_use]
    pub fn default_working_week() -> Self {
        let mut week = Self::default();
        for day in Day::ALL {
            let working = DEFAULT_WORKING_WEEK[day.index()];
            week.set_working_day(day, DayType::from(working));
            if working {
                let hours = week.add_calendar_hours(day);
                hours.push(DEFAULT_WORKING_MORNING);
                hours.push(DEFAULT_WORKING_AFTERNOON);
            }
        }
        week
    }

    pub fn set_working_day(&mut self, day: Day, day_type: DayType) {
        self.day_types[day.index()] = day_type;
    }

    #[must_use]
    pub fn working_day(&self, day: Day) -> DayType {
        self.day_types[day.index()]
    }

    /// Hours container for a day, cleared for fresh population.
    pub fn add_calendar_hours(&mut self, day: Day) -> &mut Vec<TimeRange> {
        let hours = &mut self.hours[day.index()];
        hours.clear();
        hours
    }

    #[must_use]
    pub fn hours(&self, day: Day) -> &[TimeRange] {
        &self.hours[day.index()]
    }
}

/// A dated override of a calendar's working time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarException {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub name: Option<String>,
    pub ranges: Vec<TimeRange>,
    pub recurring: Option<RecurringData>,
}

impl CalendarException {
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            name: None,
            ranges: Vec::new(),
            recurring: None,
        }
    }

    pub fn add(&mut self, range: TimeRange) {
        self.ranges.push(range);
    }

    /// An exception with no ranges makes its dates non-working.
    #[must_use]
    pub fn is_working(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Whether the exception applies on `date`.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        match &self.recurring {
            Some(recurring) => recurring.occurs_on(date),
            None => self.from <= date && date <= self.to,
        }
    }
}

/// A named range of dates with its own weekly pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkWeek {
    pub name: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub week: WeekPattern,
}

impl WorkWeek {
    pub fn set_working_day(&mut self, day: Day, day_type: DayType) {
        self.week.set_working_day(day, day_type);
    }

    pub fn add_calendar_hours(&mut self, day: Day) -> &mut Vec<TimeRange> {
        self.week.add_calendar_hours(day)
    }

    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from <= date && date <= to)
    }
}

/// A base or derived calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCalendar {
    pub unique_id: Option<i32>,
    pub name: Option<String>,
    /// Unique ID of the base calendar, set once base calendars are resolved.
    pub parent_unique_id: Option<i32>,
    /// Resource this calendar belongs to, for resource calendars.
    pub resource_unique_id: Option<i32>,
    pub week: WeekPattern,
    pub exceptions: Vec<CalendarException>,
    pub work_weeks: Vec<WorkWeek>,
}

impl ProjectCalendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Base calendar with the default working week.
    #[must_use]
    pub fn default_base() -> Self {
        Self {
            name: Some("Standard".to_string()),
            week: WeekPattern::default_working_week(),
            ..Self::default()
        }
    }

    /// Derived calendar inheriting every day from its base.
    #[must_use]
    pub fn default_derived() -> Self {
        Self::default()
    }

    pub fn set_working_day(&mut self, day: Day, day_type: DayType) {
        self.week.set_working_day(day, day_type);
    }

    #[must_use]
    pub fn working_day(&self, day: Day) -> DayType {
        self.week.working_day(day)
    }

    pub fn add_calendar_hours(&mut self, day: Day) -> &mut Vec<TimeRange> {
        self.week.add_calendar_hours(day)
    }

    #[must_use]
    pub fn hours(&self, day: Day) -> &[TimeRange] {
        self.week.hours(day)
    }

    pub fn add_calendar_exception(&mut self, from: NaiveDate, to: NaiveDate) -> &mut CalendarException {
        self.exceptions.push(CalendarException::new(from, to));
        let index = self.exceptions.len() - 1;
        &mut self.exceptions[index]
    }

    pub fn add_work_week(&mut self) -> &mut WorkWeek {
        self.work_weeks.push(WorkWeek::default());
        let index = self.work_weeks.len() - 1;
        &mut self.work_weeks[index]
    }

    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.parent_unique_id.is_some()
    }

    /// The last exception covering `date`; later exceptions take precedence.
    #[must_use]
    pub fn exception_for(&self, date: NaiveDate) -> Option<&CalendarException> {
        self.exceptions.iter().rev().find(|exception| exception.covers(date))
    }

    #[must_use]
    pub fn work_week_for(&self, date: NaiveDate) -> Option<&WorkWeek> {
        self.work_weeks.iter().rev().find(|week| week.covers(date))
    }
}

/// All calendars of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCalendars {
    calendars: Vec<ProjectCalendar>,
}

impl ProjectCalendars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, calendar: ProjectCalendar) -> &mut ProjectCalendar {
        self.calendars.push(calendar);
        let index = self.calendars.len() - 1;
        &mut self.calendars[index]
    }

    pub fn remove(&mut self, unique_id: i32) -> Option<ProjectCalendar> {
        let index = self
            .calendars
            .iter()
            .position(|calendar| calendar.unique_id == Some(unique_id))?;
        Some(self.calendars.remove(index))
    }

    #[must_use]
    pub fn by_unique_id(&self, unique_id: i32) -> Option<&ProjectCalendar> {
        self.calendars
            .iter()
            .find(|calendar| calendar.unique_id == Some(unique_id))
    }

    pub fn by_unique_id_mut(&mut self, unique_id: i32) -> Option<&mut ProjectCalendar> {
        self.calendars
            .iter_mut()
            .find(|calendar| calendar.unique_id == Some(unique_id))
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ProjectCalendar> {
        self.calendars
            .iter()
            .find(|calendar| calendar.name.as_deref() == Some(name))
    }

    #[must_use]
    pub fn contains(&self, unique_id: i32) -> bool {
        self.by_unique_id(unique_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectCalendar> {
        self.calendars.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Link derived calendars to their base calendars.
    ///
    /// `links` pairs a derived calendar's unique ID with the base calendar
    /// unique ID it declared. A base must exist and carry a name; otherwise
    /// the derived calendar is removed. Returns the removed unique IDs.
    pub fn resolve_base_calendars(&mut self, links: &[(i32, i32)]) -> Vec<i32> {
        let mut removed = Vec::new();
        for &(child, base) in links {
            let valid_base = self
                .by_unique_id(base)
                .is_some_and(|calendar| calendar.name.is_some());
            if valid_base {
                if let Some(calendar) = self.by_unique_id_mut(child) {
                    calendar.parent_unique_id = Some(base);
                }
            } else if self.remove(child).is_some() {
                removed.push(child);
            }
        }
        removed
    }
}

impl<'a> IntoIterator for &'a ProjectCalendars {
    type Item = &'a ProjectCalendar;
    type IntoIter = std::slice::Iter<'a, ProjectCalendar>;

    fn into_iter(self) -> Self::IntoIter {
        self.calendars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(unique_id: i32, name: Option<&str>) -> ProjectCalendar {
        ProjectCalendar {
            unique_id: Some(unique_id),
            name: name.map(str::to_string),
            ..ProjectCalendar::default()
        }
    }

    #[test]
    fn time_range_end_of_day() {
        let range = TimeRange::from_minutes(22 * 60, 4 * 60);
        assert_eq!(range.end_minute(), MINUTES_PER_DAY);
        assert_eq!(range.end(), NaiveTime::MIN);
        assert_eq!(range.duration_minutes(), 120);
        assert_eq!(range.to_string(), "22:00-00:00");
    }

    #[test]
    fn default_week_matches_constants() {
        let week = WeekPattern::default_working_week();
        assert_eq!(week.working_day(Day::Sunday), DayType::NonWorking);
        assert_eq!(week.working_day(Day::Monday), DayType::Working);
        assert_eq!(
            week.hours(Day::Friday),
            &[DEFAULT_WORKING_MORNING, DEFAULT_WORKING_AFTERNOON]
        );
        assert!(week.hours(Day::Saturday).is_empty());
    }

    #[test]
    fn resolve_links_and_removes_dangling() {
        let mut calendars = ProjectCalendars::new();
        calendars.add(named(1, Some("Standard")));
        calendars.add(named(2, None));
        calendars.add(named(3, None));
        calendars.add(named(4, None));

        // 3 points at an unnamed calendar, 4 at one that never appears
        let removed = calendars.resolve_base_calendars(&[(2, 1), (3, 2), (4, 99)]);

        assert_eq!(removed, vec![3, 4]);
        assert_eq!(calendars.len(), 2);
        assert_eq!(calendars.by_unique_id(2).unwrap().parent_unique_id, Some(1));
    }
}
