//! Timephased cost normalisation.

use mpp_model::{Timephased, TimephasedCost, WorkingTime};

use crate::timephased::Normaliser;
use crate::timephased::split::{self, FirstDayWork};

/// Per-day costs closer than this are treated as equal.
pub const SAME_COST_EPSILON: f64 = 0.01;

/// Turns raw cost spans into day-aligned spans.
///
/// Costs are apportioned by working time alone, and there is no unit
/// conversion stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostNormaliser;

impl Normaliser for CostNormaliser {
    type Amount = f64;

    fn normalise<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        spans: Vec<TimephasedCost>,
    ) -> Vec<TimephasedCost> {
        let spans = split_days(calendar, spans);
        let spans = merge_same_day(spans);
        merge_same_cost(spans)
    }
}

/// Split spans at day boundaries, pro rata to working time.
pub fn split_days<C: WorkingTime + ?Sized>(
    calendar: &C,
    spans: Vec<TimephasedCost>,
) -> Vec<TimephasedCost> {
    split::split_days(calendar, spans, |span, work: FirstDayWork| {
        span.total_amount * work.split_minutes / work.span_minutes
    })
}

/// Merge consecutive spans starting on the same day.
pub fn merge_same_day(spans: Vec<TimephasedCost>) -> Vec<TimephasedCost> {
    let mut result: Vec<TimephasedCost> = Vec::with_capacity(spans.len());
    for mut span in spans {
        if let Some(previous) = result.last_mut()
            && previous.start_day() == span.start_day()
        {
            previous.finish = span.finish;
            previous.total_amount += span.total_amount;
            previous.amount_per_day = previous.total_amount;
            previous.modified |= span.modified;
            continue;
        }
        span.amount_per_day = span.total_amount;
        result.push(span);
    }
    result
}

/// Merge consecutive spans whose daily cost is equal.
pub fn merge_same_cost(spans: Vec<TimephasedCost>) -> Vec<TimephasedCost> {
    let mut result: Vec<TimephasedCost> = Vec::with_capacity(spans.len());
    for mut span in spans {
        match result.last_mut() {
            Some(previous)
                if (previous.amount_per_day - span.total_amount).abs() < SAME_COST_EPSILON =>
            {
                *previous = Timephased {
                    start: previous.start,
                    total_amount: previous.total_amount + span.total_amount,
                    amount_per_day: span.total_amount,
                    modified: previous.modified || span.modified,
                    ..span
                };
            }
            _ => {
                span.amount_per_day = span.total_amount;
                result.push(span);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use mpp_model::ProjectCalendar;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_cost_split_pro_rata() {
        let calendar = ProjectCalendar::default_base();
        // Monday 13:00 to Tuesday 17:00: 4 of 12 working hours on Monday
        let spans = split_days(&calendar, vec![TimephasedCost::new(at(8, 13), at(9, 17), 300.0, 0.0)]);
        assert_eq!(spans.len(), 2);
        assert!((spans[0].total_amount - 100.0).abs() < 1e-9);
        assert!((spans[1].total_amount - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_pipeline_merges_equal_days() {
        let calendar = ProjectCalendar::default_base();
        let spans = CostNormaliser.normalise(
            &calendar,
            vec![TimephasedCost::new(at(8, 8), at(10, 17), 300.0, 0.0)],
        );
        assert_eq!(spans.len(), 1);
        assert!((spans[0].total_amount - 300.0).abs() < 1e-9);
        assert!((spans[0].amount_per_day - 100.0).abs() < 1e-9);
        assert_eq!(spans[0].finish, at(10, 17));
    }

    #[test]
    fn test_merge_same_day_sums() {
        let spans = merge_same_day(vec![
            TimephasedCost::new(at(8, 8), at(8, 10), 10.0, 0.0),
            TimephasedCost::new(at(8, 14), at(8, 16), 5.0, 0.0),
            TimephasedCost::new(at(9, 8), at(9, 10), 1.0, 0.0),
        ]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].total_amount, 15.0);
        assert_eq!(spans[0].finish, at(8, 16));
    }
}
