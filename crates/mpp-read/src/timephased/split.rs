//! Splitting multi-day spans at day boundaries.

use chrono::NaiveDateTime;
use mpp_model::{Timephased, WorkingTime};

use crate::timephased::Amount;

/// Calendar minutes used to apportion the first day of a span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstDayWork {
    /// Working minutes from the span start to the end of its first day.
    pub split_minutes: f64,
    /// Working minutes in the whole of the first day.
    pub day_minutes: f64,
    /// Working minutes across the whole span.
    pub span_minutes: f64,
}

/// Break every span crossing a day boundary into one span per working day.
///
/// `first_day` decides how much of a span's amount falls on its first day.
/// The result is clamped to the span's total, and the rest is carried into
/// a remainder span starting at the next working time. Spans without
/// working time are kept whole.
pub fn split_days<T, C, F>(calendar: &C, spans: Vec<Timephased<T>>, first_day: F) -> Vec<Timephased<T>>
where
    T: Amount,
    C: WorkingTime + ?Sized,
    F: Fn(&Timephased<T>, FirstDayWork) -> f64,
{
    let mut result = Vec::with_capacity(spans.len());
    for span in spans {
        let mut current = Some(span);
        while let Some(span) = current.take() {
            if span.is_single_day() {
                result.push(span);
                break;
            }
            match split_first_day(calendar, &span, &first_day) {
                Some((first, rest)) => {
                    result.extend(first);
                    current = rest;
                }
                None => result.push(span),
            }
        }
    }
    result
}

type Parts<T> = (Option<Timephased<T>>, Option<Timephased<T>>);

fn split_first_day<T, C, F>(calendar: &C, span: &Timephased<T>, first_day: &F) -> Option<Parts<T>>
where
    T: Amount,
    C: WorkingTime + ?Sized,
    F: Fn(&Timephased<T>, FirstDayWork) -> f64,
{
    let span_minutes = calendar.work_minutes(span.start, span.finish);
    if span_minutes == 0.0 {
        return None;
    }
    let total = span.total_amount.value();

    let (mut first, split_finish) = match calendar
        .finish_time(span.start.date())
        .filter(|&finish| finish > span.start)
    {
        Some(split_finish) => {
            let work = FirstDayWork {
                split_minutes: calendar.work_minutes(span.start, split_finish),
                day_minutes: day_minutes(calendar, span.start),
                span_minutes,
            };
            let amount = clamp(first_day(span, work), total);
            let fragment = fragment(span, span.start, split_finish, amount);
            (Some(fragment), split_finish)
        }
        None => (None, span.start),
    };

    let rest_start = calendar
        .next_work_start(split_finish)
        .filter(|&start| start < span.finish);
    let Some(rest_start) = rest_start else {
        // nothing left to work after the first day
        let first = first.take().map(|mut first| {
            first.total_amount = first.total_amount.with_value(total);
            first
        });
        return first.map(|first| (Some(first), None));
    };
    if rest_start <= span.start {
        return None;
    }

    let split = first.as_ref().map_or(0.0, |first| first.total_amount.value());
    let rest = fragment(span, rest_start, span.finish, total - split);
    Some((first, Some(rest)))
}

fn fragment<T: Amount>(
    span: &Timephased<T>,
    start: NaiveDateTime,
    finish: NaiveDateTime,
    amount: f64,
) -> Timephased<T> {
    Timephased {
        start,
        finish,
        total_amount: span.total_amount.with_value(amount),
        amount_per_day: span.amount_per_day,
        modified: span.modified,
    }
}

fn day_minutes<C: WorkingTime + ?Sized>(calendar: &C, at: NaiveDateTime) -> f64 {
    calendar
        .working_ranges(at.date())
        .iter()
        .map(|range| f64::from(range.duration_minutes()))
        .sum()
}

fn clamp(amount: f64, total: f64) -> f64 {
    if amount.is_nan() {
        0.0
    } else if total >= 0.0 {
        amount.clamp(0.0, total)
    } else {
        amount.clamp(total, 0.0)
    }
}
