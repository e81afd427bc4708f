//! Timephased work normalisation.

use mpp_model::{Duration, ProjectProperties, TimeUnit, Timephased, TimephasedWork, WorkingTime};

use crate::timephased::Normaliser;
use crate::timephased::split::{self, FirstDayWork};

/// Per-day work amounts closer than this many minutes are treated as equal.
pub const SAME_WORK_EPSILON: f64 = 0.1;

/// Working minutes in the nominal day MS Project apportions part-days
/// against, whatever the calendar says.
pub const NOMINAL_DAY_MINUTES: f64 = 8.0 * 60.0;

/// Turns raw work spans into day-aligned spans.
///
/// Stages: split at day boundaries, merge fragments of the same day, merge
/// runs of equal per-day work, convert to the project's timephased units.
#[derive(Debug, Clone, Default)]
pub struct WorkNormaliser {
    properties: ProjectProperties,
}

impl WorkNormaliser {
    #[must_use]
    pub fn new(properties: ProjectProperties) -> Self {
        Self { properties }
    }

    /// Apply the first three stages, leaving amounts in minutes.
    pub fn normalise_minutes<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        spans: Vec<TimephasedWork>,
    ) -> Vec<TimephasedWork> {
        let spans = spans
            .into_iter()
            .map(|span| self.in_minutes(span))
            .collect();
        let spans = split_days(calendar, spans);
        let spans = merge_same_day(calendar, spans);
        merge_same_work(spans)
    }

    fn in_minutes(&self, span: TimephasedWork) -> TimephasedWork {
        Timephased {
            total_amount: span
                .total_amount
                .convert_units(TimeUnit::Minutes, &self.properties),
            amount_per_day: span
                .amount_per_day
                .convert_units(TimeUnit::Minutes, &self.properties),
            ..span
        }
    }
}

impl Normaliser for WorkNormaliser {
    type Amount = Duration;

    fn normalise<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        spans: Vec<TimephasedWork>,
    ) -> Vec<TimephasedWork> {
        let spans = self.normalise_minutes(calendar, spans);
        convert_units(spans, self.properties.timephased_work_units, &self.properties)
    }
}

/// Split spans at day boundaries.
///
/// A part-day is apportioned as `amount per day * worked minutes / 480`; a
/// whole working day gets the span's amount per day.
pub fn split_days<C: WorkingTime + ?Sized>(
    calendar: &C,
    spans: Vec<TimephasedWork>,
) -> Vec<TimephasedWork> {
    split::split_days(calendar, spans, |span, work: FirstDayWork| {
        let per_day = span.amount_per_day.value;
        if work.split_minutes == work.day_minutes {
            per_day
        } else {
            per_day * work.split_minutes / NOMINAL_DAY_MINUTES
        }
    })
}

/// Merge adjacent fragments that fall on the same day.
///
/// Fragments merge when the second starts where the first finishes, or at
/// the first's next working time. A zero fragment straight after non-zero
/// work on the same day is dropped, as is any span with neither work nor
/// working time.
pub fn merge_same_day<C: WorkingTime + ?Sized>(
    calendar: &C,
    spans: Vec<TimephasedWork>,
) -> Vec<TimephasedWork> {
    let mut result: Vec<TimephasedWork> = Vec::with_capacity(spans.len());
    for mut span in spans {
        if let Some(previous) = result.last()
            && previous.start_day() == span.start_day()
        {
            if !previous.total_amount.is_zero() && span.total_amount.is_zero() {
                continue;
            }
            let contiguous = previous.finish == span.start
                || calendar.next_work_start(previous.finish) == Some(span.start);
            if contiguous {
                if let Some(previous) = result.pop() {
                    span = Timephased {
                        start: previous.start,
                        total_amount: Duration::new(
                            previous.total_amount.value + span.total_amount.value,
                            span.total_amount.units,
                        ),
                        modified: previous.modified || span.modified,
                        ..span
                    };
                }
            } else if span.total_amount.is_zero() {
                continue;
            }
        }

        if span.total_amount.is_zero() && calendar.work_minutes(span.start, span.finish) == 0.0 {
            continue;
        }
        span.amount_per_day = span.total_amount;
        result.push(span);
    }
    result
}

/// Merge consecutive spans whose daily work is equal.
pub fn merge_same_work(spans: Vec<TimephasedWork>) -> Vec<TimephasedWork> {
    let mut result: Vec<TimephasedWork> = Vec::with_capacity(spans.len());
    for mut span in spans {
        match result.last_mut() {
            Some(previous)
                if (previous.amount_per_day.value - span.total_amount.value).abs()
                    < SAME_WORK_EPSILON =>
            {
                previous.finish = span.finish;
                previous.total_amount.value += span.total_amount.value;
                previous.amount_per_day = span.total_amount;
                previous.modified |= span.modified;
            }
            _ => {
                span.amount_per_day = span.total_amount;
                result.push(span);
            }
        }
    }
    result
}

/// Express every span's amounts in `units`.
#[must_use]
pub fn convert_units(
    spans: Vec<TimephasedWork>,
    units: TimeUnit,
    properties: &ProjectProperties,
) -> Vec<TimephasedWork> {
    spans
        .into_iter()
        .map(|span| Timephased {
            total_amount: span.total_amount.convert_units(units, properties),
            amount_per_day: span.amount_per_day.convert_units(units, properties),
            ..span
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use mpp_model::ProjectCalendar;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn span(start: NaiveDateTime, finish: NaiveDateTime, total: f64, per_day: f64) -> TimephasedWork {
        TimephasedWork::new(start, finish, Duration::minutes(total), Duration::minutes(per_day))
    }

    fn total(spans: &[TimephasedWork]) -> f64 {
        spans.iter().map(|span| span.total_amount.value).sum()
    }

    #[test]
    fn test_split_three_full_days() {
        let calendar = ProjectCalendar::default_base();
        // Monday 08:00 to Wednesday 17:00, 8 hours a day
        let spans = split_days(&calendar, vec![span(at(8, 8, 0), at(10, 17, 0), 1440.0, 480.0)]);

        assert_eq!(spans.len(), 3);
        assert!(spans.iter().all(TimephasedWork::is_single_day));
        assert!(spans.iter().all(|span| span.total_amount.value == 480.0));
        assert_eq!(spans[1].start, at(9, 8, 0));
        assert_eq!(spans[1].finish, at(9, 17, 0));
    }

    #[test]
    fn test_part_day_uses_nominal_day() {
        let calendar = ProjectCalendar::default_base();
        // Monday 13:00 to Tuesday 17:00: 240 minutes on Monday
        let spans = split_days(&calendar, vec![span(at(8, 13, 0), at(9, 17, 0), 720.0, 480.0)]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].total_amount.value, 240.0);
        assert_eq!(spans[1].total_amount.value, 480.0);
    }

    #[test]
    fn test_split_skips_weekend() {
        let calendar = ProjectCalendar::default_base();
        // Friday 08:00 to Monday 17:00
        let spans = split_days(&calendar, vec![span(at(5, 8, 0), at(8, 17, 0), 960.0, 480.0)]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].start, at(8, 8, 0));
        assert_eq!(total(&spans), 960.0);
    }

    #[test]
    fn test_merge_same_day_contiguous() {
        let calendar = ProjectCalendar::default_base();
        let spans = merge_same_day(
            &calendar,
            vec![
                span(at(8, 8, 0), at(8, 12, 0), 240.0, 0.0),
                span(at(8, 13, 0), at(8, 17, 0), 120.0, 0.0),
            ],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].total_amount.value, 360.0);
        assert_eq!(spans[0].amount_per_day.value, 360.0);
    }

    #[test]
    fn test_merge_same_day_drops_trailing_zero() {
        let calendar = ProjectCalendar::default_base();
        let spans = merge_same_day(
            &calendar,
            vec![
                span(at(8, 8, 0), at(8, 10, 0), 120.0, 0.0),
                span(at(8, 14, 0), at(8, 15, 0), 0.0, 0.0),
            ],
        );
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_merge_same_day_drops_empty_non_working() {
        let calendar = ProjectCalendar::default_base();
        // Saturday, no work
        let spans = merge_same_day(&calendar, vec![span(at(6, 8, 0), at(6, 17, 0), 0.0, 0.0)]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_merge_same_work() {
        let spans = merge_same_work(vec![
            span(at(8, 8, 0), at(8, 17, 0), 480.0, 480.0),
            span(at(9, 8, 0), at(9, 17, 0), 480.05, 480.05),
            span(at(10, 8, 0), at(10, 17, 0), 240.0, 240.0),
        ]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].finish, at(9, 17, 0));
        assert!((spans[0].total_amount.value - 960.05).abs() < 1e-9);
    }

    #[test]
    fn test_full_pipeline_in_hours() {
        let calendar = ProjectCalendar::default_base();
        let normaliser = WorkNormaliser::default();
        let spans = normaliser.normalise(
            &calendar,
            vec![span(at(8, 8, 0), at(10, 17, 0), 1440.0, 480.0)],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].total_amount, Duration::hours(24.0));
        assert_eq!(spans[0].amount_per_day, Duration::hours(8.0));
    }
}
