//! Recurrence rules attached to calendar exceptions.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::day::Day;

/// Upper bound on expanded occurrences, for rules with neither a count nor
/// a usable finish date.
const MAX_OCCURRENCES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A repeating date pattern.
///
/// `day_number` is the day of the month for absolute rules, or the
/// ordinal (1-4, 5 = last) of `day_of_week` for relative rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringData {
    pub recurrence_type: RecurrenceType,
    pub relative: bool,
    pub start_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
    pub occurrences: Option<u32>,
    pub frequency: u32,
    pub weekly_days: Vec<Day>,
    pub day_of_week: Option<Day>,
    pub day_number: Option<u32>,
    pub month_number: Option<u32>,
}

impl RecurringData {
    #[must_use]
    pub fn new(recurrence_type: RecurrenceType, start_date: NaiveDate) -> Self {
        Self {
            recurrence_type,
            relative: false,
            start_date,
            finish_date: None,
            occurrences: None,
            frequency: 1,
            weekly_days: Vec::new(),
            day_of_week: None,
            day_number: None,
            month_number: None,
        }
    }

    /// True for the implicit rule of an ordinary exception: daily, once.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.recurrence_type == RecurrenceType::Daily && self.occurrences == Some(1)
    }

    /// Set the weekly days from a bitmap where bit `n` (0 = Sunday) is day `n + 1`.
    pub fn set_weekly_days_from_bitmap(&mut self, bitmap: u8) {
        self.weekly_days = Day::ALL
            .into_iter()
            .filter(|day| bitmap & (1 << day.index()) != 0)
            .collect();
    }

    /// Every date this rule produces, in order.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.expand(None)
    }

    /// Whether `date` is one of the dates this rule produces.
    ///
    /// Dates that cannot match the pattern are rejected without expanding
    /// the rule; otherwise expansion stops at `date`.
    #[must_use]
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date || self.past_finish(date) {
            return false;
        }
        let candidate = match self.recurrence_type {
            RecurrenceType::Daily => {
                (date - self.start_date).num_days() % i64::from(self.frequency.max(1)) == 0
            }
            RecurrenceType::Weekly => self.weekly_days.contains(&Day::of(date)),
            RecurrenceType::Monthly => self.date_in_month(date.year(), date.month()) == Some(date),
            RecurrenceType::Yearly => {
                date.month() == self.month_number.unwrap_or(self.start_date.month())
                    && self.date_in_month(date.year(), date.month()) == Some(date)
            }
        };
        candidate && self.expand(Some(date)).last() == Some(&date)
    }

    /// Expand the rule, stopping after `until` when given.
    fn expand(&self, until: Option<NaiveDate>) -> Vec<NaiveDate> {
        let limit = match self.occurrences {
            Some(count) if count > 0 => count as usize,
            _ if self.finish_date.is_some() => MAX_OCCURRENCES,
            _ => 1,
        };
        let frequency = self.frequency.max(1);
        let mut dates = Vec::new();
        let push = |date: NaiveDate, dates: &mut Vec<NaiveDate>| -> bool {
            if self.past_finish(date)
                || until.is_some_and(|until| date > until)
                || dates.len() >= limit
            {
                return false;
            }
            if date >= self.start_date {
                dates.push(date);
            }
            dates.len() < limit
        };

        match self.recurrence_type {
            RecurrenceType::Daily => {
                let mut date = self.start_date;
                while push(date, &mut dates) {
                    match date.checked_add_days(Days::new(u64::from(frequency))) {
                        Some(next) => date = next,
                        None => break,
                    }
                }
            }
            RecurrenceType::Weekly => {
                if self.weekly_days.is_empty() {
                    return dates;
                }
                let mut days = self.weekly_days.clone();
                days.sort();
                let offset = u64::from(self.start_date.weekday().num_days_from_sunday());
                let Some(mut week_start) = self.start_date.checked_sub_days(Days::new(offset))
                else {
                    return dates;
                };
                'weeks: for _ in 0..MAX_OCCURRENCES {
                    for day in &days {
                        let Some(date) = week_start.checked_add_days(Days::new(day.index() as u64))
                        else {
                            break 'weeks;
                        };
                        if date < self.start_date {
                            continue;
                        }
                        if !push(date, &mut dates) {
                            break 'weeks;
                        }
                    }
                    match week_start.checked_add_days(Days::new(7 * u64::from(frequency))) {
                        Some(next) => week_start = next,
                        None => break,
                    }
                }
            }
            RecurrenceType::Monthly => {
                let first = self.start_date.with_day(1).unwrap_or(self.start_date);
                for step in 0..MAX_OCCURRENCES as u32 {
                    let Some(month) = first.checked_add_months(Months::new(step * frequency)) else {
                        break;
                    };
                    let Some(date) = self.date_in_month(month.year(), month.month()) else {
                        continue;
                    };
                    if date < self.start_date {
                        continue;
                    }
                    if !push(date, &mut dates) {
                        break;
                    }
                }
            }
            RecurrenceType::Yearly => {
                let month = self.month_number.unwrap_or(self.start_date.month());
                for step in 0..MAX_OCCURRENCES as i32 {
                    let year = self.start_date.year() + step;
                    let Some(date) = self.date_in_month(year, month) else {
                        continue;
                    };
                    if date < self.start_date {
                        continue;
                    }
                    if !push(date, &mut dates) {
                        break;
                    }
                }
            }
        }
        dates
    }

    fn past_finish(&self, date: NaiveDate) -> bool {
        match (self.occurrences, self.finish_date) {
            (Some(count), _) if count > 0 => false,
            (_, Some(finish)) => date > finish,
            _ => false,
        }
    }

    fn date_in_month(&self, year: i32, month: u32) -> Option<NaiveDate> {
        if self.relative {
            let weekday = Weekday::from(self.day_of_week?);
            let ordinal = self.day_number.unwrap_or(1);
            if ordinal >= 5 {
                last_weekday_of_month(year, month, weekday)
            } else {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, ordinal as u8)
            }
        } else {
            let day = self.day_number.unwrap_or(1).max(1);
            let last = last_day_of_month(year, month)?;
            NaiveDate::from_ymd_opt(year, month, day.min(last.day()))
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    let back = (7 + last.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    last.checked_sub_days(Days::new(u64::from(back)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_with_occurrences() {
        let mut rd = RecurringData::new(RecurrenceType::Daily, date(2024, 1, 1));
        rd.frequency = 3;
        rd.occurrences = Some(3);
        assert_eq!(rd.dates(), vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7)]);
    }

    #[test]
    fn weekly_until_finish() {
        let mut rd = RecurringData::new(RecurrenceType::Weekly, date(2024, 1, 3));
        rd.set_weekly_days_from_bitmap(0b0000_0010 | 0b0010_0000); // Monday, Friday
        rd.finish_date = Some(date(2024, 1, 15));
        assert_eq!(
            rd.dates(),
            vec![date(2024, 1, 5), date(2024, 1, 8), date(2024, 1, 12), date(2024, 1, 15)]
        );
    }

    #[test]
    fn monthly_relative_last_friday() {
        let mut rd = RecurringData::new(RecurrenceType::Monthly, date(2024, 1, 1));
        rd.relative = true;
        rd.day_of_week = Some(Day::Friday);
        rd.day_number = Some(5);
        rd.occurrences = Some(2);
        assert_eq!(rd.dates(), vec![date(2024, 1, 26), date(2024, 2, 23)]);
    }

    #[test]
    fn monthly_absolute_clamps_to_month_end() {
        let mut rd = RecurringData::new(RecurrenceType::Monthly, date(2024, 1, 31));
        rd.day_number = Some(31);
        rd.occurrences = Some(2);
        assert_eq!(rd.dates(), vec![date(2024, 1, 31), date(2024, 2, 29)]);
    }

    #[test]
    fn yearly_absolute() {
        let mut rd = RecurringData::new(RecurrenceType::Yearly, date(2024, 3, 1));
        rd.month_number = Some(12);
        rd.day_number = Some(25);
        rd.occurrences = Some(2);
        assert_eq!(rd.dates(), vec![date(2024, 12, 25), date(2025, 12, 25)]);
    }

    #[test]
    fn occurs_on_matches_expansion() {
        let mut weekly = RecurringData::new(RecurrenceType::Weekly, date(2024, 1, 3));
        weekly.set_weekly_days_from_bitmap(0b0000_0010 | 0b0010_0000);
        weekly.frequency = 2;
        weekly.occurrences = Some(5);

        let mut monthly = RecurringData::new(RecurrenceType::Monthly, date(2024, 1, 1));
        monthly.relative = true;
        monthly.day_of_week = Some(Day::Friday);
        monthly.day_number = Some(5);
        monthly.frequency = 2;
        monthly.finish_date = Some(date(2024, 12, 31));

        let mut daily = RecurringData::new(RecurrenceType::Daily, date(2024, 1, 1));
        daily.frequency = 3;
        daily.occurrences = Some(4);

        for rd in [weekly, monthly, daily] {
            let dates = rd.dates();
            let mut day = date(2023, 12, 1);
            while day < date(2025, 2, 1) {
                assert_eq!(rd.occurs_on(day), dates.contains(&day), "{rd:?} on {day}");
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn default_rule() {
        let mut rd = RecurringData::new(RecurrenceType::Daily, date(2024, 1, 1));
        rd.occurrences = Some(1);
        assert!(rd.is_default());
        rd.occurrences = Some(2);
        assert!(!rd.is_default());
    }
}
