//! Raw timephased spans from assignment data blocks.
//!
//! # Complete work
//!
//! | Offset | Field        | Type | Description                          |
//! |--------|--------------|------|--------------------------------------|
//! | 0-1    | block count  | u16  |                                      |
//! | 24-27  | finish       | i32  | work to finish, 1/80 minute          |
//! | 32+    | blocks       | 20   | start, cumulative work, work per day |
//!
//! Planned work uses the same header with 28-byte blocks from byte 40.
//! Baseline work and cost blocks carry absolute timestamps instead of work
//! offsets.

use chrono::NaiveDateTime;
use mpp_model::{Duration, TimephasedCost, TimephasedWork, WorkingTime};
use tracing::trace;

use crate::bytes::{get_double, get_int, get_short, get_timestamp_from_tenths};
use crate::options::ReaderOptions;
use crate::timephased::{CostNormaliser, Normaliser, WorkNormaliser};

const COMPLETE_BLOCKS_OFFSET: usize = 32;
const COMPLETE_BLOCK_SIZE: usize = 20;
const PLANNED_BLOCKS_OFFSET: usize = 40;
const PLANNED_BLOCK_SIZE: usize = 28;
const BASELINE_WORK_HEADER: usize = 8;
const BASELINE_WORK_BLOCK_SIZE: usize = 40;
const BASELINE_COST_HEADER: usize = 16;
const BASELINE_COST_BLOCK_SIZE: usize = 20;

/// Work offsets are stored in 1/80 of a minute.
const WORK_OFFSET_SCALE: f64 = 80.0;

/// Cumulative work is stored in 1/1000 of a minute.
const CUMULATIVE_WORK_SCALE: f64 = 1000.0;

/// Baseline work is apportioned against a fixed eight-hour day.
const BASELINE_WORK_PER_DAY: f64 = 480.0;

/// Reads raw timephased spans and normalises them as configured.
#[derive(Debug, Clone)]
pub struct TimephasedDataFactory {
    work_normaliser: WorkNormaliser,
    normalise: bool,
}

impl Default for TimephasedDataFactory {
    fn default() -> Self {
        Self::new(&ReaderOptions::default())
    }
}

impl TimephasedDataFactory {
    #[must_use]
    pub fn new(options: &ReaderOptions) -> Self {
        Self {
            work_normaliser: WorkNormaliser::new(options.properties.clone()),
            normalise: options.normalise_timephased,
        }
    }

    /// Completed work, placed on the calendar from the assignment start.
    pub fn complete_work<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        assignment_start: NaiveDateTime,
        data: &[u8],
    ) -> Vec<TimephasedWork> {
        let mut list: Vec<TimephasedWork> = Vec::new();
        let block_count = usize::from(get_short(data, 0));
        if data.len() <= 2 || block_count == 0 {
            return list;
        }

        let finish_time = f64::from(get_int(data, 24));
        let mut previous_cumulative = 0.0;
        let mut index = COMPLETE_BLOCKS_OFFSET;
        for _ in 0..block_count {
            if index + COMPLETE_BLOCK_SIZE > data.len() {
                break;
            }
            // offsets outside the assignment are meaningless; pin them to the start
            let raw = f64::from(get_int(data, index));
            let start_work = if raw < 0.0 || raw > finish_time {
                0.0
            } else {
                raw / WORK_OFFSET_SCALE
            };

            let cumulative = get_double(data, index + 4).trunc();
            let total = (cumulative - previous_cumulative) / CUMULATIVE_WORK_SCALE;
            previous_cumulative = cumulative;
            let per_day = get_double(data, index + 12).trunc() / 125.0 * 6.0;

            let start = if start_work == 0.0 {
                assignment_start
            } else {
                calendar.add_work(assignment_start, start_work, true)
            };
            close_previous(&mut list, calendar.add_work(assignment_start, start_work, false));
            list.push(TimephasedWork::new(
                start,
                start,
                Duration::minutes(total),
                Duration::minutes(per_day),
            ));
            index += COMPLETE_BLOCK_SIZE;
        }

        let finish_work = finish_time / WORK_OFFSET_SCALE;
        close_previous(&mut list, calendar.add_work(assignment_start, finish_work, false));
        trace!(spans = list.len(), "complete work");
        list
    }

    /// Planned work, anchored at the finish of the last complete span, or
    /// the assignment start when nothing is complete. `units` is the
    /// assignment's units as a percentage.
    pub fn planned_work<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        assignment_start: NaiveDateTime,
        units: f64,
        data: &[u8],
        complete: &[TimephasedWork],
    ) -> Vec<TimephasedWork> {
        let mut list: Vec<TimephasedWork> = Vec::new();
        if data.is_empty() {
            return list;
        }

        let block_count = usize::from(get_short(data, 0));
        if block_count == 0 {
            if let Some(last) = complete.last()
                && units != 0.0
            {
                let Some(start) = calendar.next_work_start(last.finish) else {
                    return list;
                };
                let total = get_double(data, 16) / CUMULATIVE_WORK_SCALE * 100.0 / units;
                let finish = calendar.add_work(start, total, false);
                let per_day = get_double(data, 8) / 2000.0 * 6.0;
                if start != finish {
                    list.push(TimephasedWork::new(
                        start,
                        finish,
                        Duration::minutes(total),
                        Duration::minutes(per_day),
                    ));
                }
            }
            return list;
        }

        let anchor = complete.last().map_or(assignment_start, |last| last.finish);
        let mut previous_cumulative = 0.0;
        let mut index = PLANNED_BLOCKS_OFFSET;
        for block in 0..block_count {
            if index + PLANNED_BLOCK_SIZE > data.len() {
                break;
            }
            let offset_work = f64::from(get_int(data, index)) / WORK_OFFSET_SCALE;
            let start = if offset_work == 0.0 {
                anchor
            } else {
                calendar.add_work(anchor, offset_work, true)
            };

            let cumulative = get_double(data, index + 4);
            let total = (cumulative - previous_cumulative) / CUMULATIVE_WORK_SCALE;
            previous_cumulative = cumulative;
            let per_day = get_double(data, index + 12) / 2000.0 * 6.0;

            let flags = get_short(data, index + 22);
            let modified = (flags == 0 && block != 0) || flags & 0x3000 != 0;

            close_previous(&mut list, calendar.add_work(anchor, offset_work, false));
            let mut span = TimephasedWork::new(
                start,
                start,
                Duration::minutes(total),
                Duration::minutes(per_day),
            );
            span.modified = modified;
            list.push(span);
            index += PLANNED_BLOCK_SIZE;
        }

        let finish_work = f64::from(get_int(data, 24)) / WORK_OFFSET_SCALE;
        close_previous(&mut list, calendar.add_work(anchor, finish_work, false));
        trace!(spans = list.len(), "planned work");
        list
    }

    /// Baseline work. The last span runs to the assignment finish.
    pub fn baseline_work(
        &self,
        assignment_finish: NaiveDateTime,
        data: &[u8],
    ) -> Vec<TimephasedWork> {
        let mut list: Vec<TimephasedWork> = Vec::new();
        if data.len() < BASELINE_WORK_HEADER + BASELINE_WORK_BLOCK_SIZE {
            return list;
        }

        let mut index = BASELINE_WORK_HEADER;
        let mut block_start = get_timestamp_from_tenths(data, index + 36);
        index += BASELINE_WORK_BLOCK_SIZE;
        let mut previous_cumulative = 0.0;

        while index + BASELINE_WORK_BLOCK_SIZE <= data.len() {
            let block_end = get_timestamp_from_tenths(data, index + 36);
            let cumulative = get_double(data, index + 20).trunc() / CUMULATIVE_WORK_SCALE;
            if (cumulative - previous_cumulative).abs() > 0.000_01
                && let (Some(start), Some(finish)) = (block_start, block_end)
            {
                let normal_actual = f64::from(get_int(data, index + 8)) / 10.0;
                let normal_remaining = f64::from(get_int(data, index + 28)) / 10.0;
                let normal = normal_actual + normal_remaining;
                let work = cumulative - previous_cumulative;
                let overtime_factor = if normal == 0.0 {
                    0.0
                } else {
                    (work - normal) / normal
                };
                let per_day = BASELINE_WORK_PER_DAY * (1.0 + overtime_factor);
                list.push(TimephasedWork::new(
                    start,
                    finish,
                    Duration::minutes(work),
                    Duration::minutes(per_day),
                ));
                previous_cumulative = cumulative;
            }
            block_start = block_end;
            index += BASELINE_WORK_BLOCK_SIZE;
        }

        if let Some(last) = list.last_mut() {
            last.finish = assignment_finish;
        }
        trace!(spans = list.len(), "baseline work");
        list
    }

    /// Baseline cost.
    pub fn baseline_cost(&self, data: &[u8]) -> Vec<TimephasedCost> {
        let mut list = Vec::new();
        if data.len() < BASELINE_COST_HEADER + BASELINE_COST_BLOCK_SIZE {
            return list;
        }

        let mut index = BASELINE_COST_HEADER;
        let mut block_start = get_timestamp_from_tenths(data, index + 16);
        index += BASELINE_COST_BLOCK_SIZE;
        let mut previous_total = 0.0;

        while index + BASELINE_COST_BLOCK_SIZE <= data.len() {
            let block_end = get_timestamp_from_tenths(data, index + 16);
            let total = get_double(data, index + 8).trunc() / 100.0;
            if (total - previous_total).abs() > 0.000_01
                && let (Some(start), Some(finish)) = (block_start, block_end)
            {
                list.push(TimephasedCost::new(start, finish, total - previous_total, 0.0));
                previous_total = total;
            }
            block_start = block_end;
            index += BASELINE_COST_BLOCK_SIZE;
        }
        trace!(spans = list.len(), "baseline cost");
        list
    }

    /// Normalise work spans, unless raw timephased data was requested.
    pub fn normalise_work<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        spans: Vec<TimephasedWork>,
    ) -> Vec<TimephasedWork> {
        if self.normalise {
            self.work_normaliser.normalise(calendar, spans)
        } else {
            spans
        }
    }

    /// Normalise cost spans, unless raw timephased data was requested.
    pub fn normalise_cost<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        spans: Vec<TimephasedCost>,
    ) -> Vec<TimephasedCost> {
        if self.normalise {
            CostNormaliser.normalise(calendar, spans)
        } else {
            spans
        }
    }
}

/// Set the finish of the last span; a span that ends where it starts is
/// dropped.
fn close_previous(list: &mut Vec<TimephasedWork>, finish: NaiveDateTime) {
    if let Some(last) = list.last_mut() {
        last.finish = finish;
        if last.start == last.finish {
            list.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::epoch;
    use chrono::NaiveDate;
    use mpp_model::ProjectCalendar;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn tenths(date: NaiveDateTime) -> i32 {
        ((date - epoch()).num_minutes() * 10) as i32
    }

    fn put_i32(data: &mut [u8], offset: usize, value: i32) {
        data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn put_f64(data: &mut [u8], offset: usize, value: f64) {
        data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn test_complete_work_two_days() {
        let mut data = vec![0u8; 72];
        data[0..2].copy_from_slice(&2u16.to_le_bytes());
        put_i32(&mut data, 24, 960 * 80);
        put_f64(&mut data, 36, 480_000.0);
        put_f64(&mut data, 44, 10_000.0);
        put_i32(&mut data, 52, 480 * 80);
        put_f64(&mut data, 56, 960_000.0);
        put_f64(&mut data, 64, 10_000.0);

        let calendar = ProjectCalendar::default_base();
        let spans = TimephasedDataFactory::default().complete_work(&calendar, at(8, 8), &data);

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].finish), (at(8, 8), at(8, 17)));
        assert_eq!((spans[1].start, spans[1].finish), (at(9, 8), at(9, 17)));
        assert_eq!(spans[1].total_amount, Duration::minutes(480.0));
        assert_eq!(spans[0].amount_per_day, Duration::minutes(480.0));
    }

    #[test]
    fn test_complete_work_empty() {
        let calendar = ProjectCalendar::default_base();
        let factory = TimephasedDataFactory::default();
        assert!(factory.complete_work(&calendar, at(8, 8), &[]).is_empty());
        assert!(factory.complete_work(&calendar, at(8, 8), &[0u8; 40]).is_empty());
    }

    #[test]
    fn test_planned_work_follows_complete() {
        let mut data = vec![0u8; 68];
        data[0..2].copy_from_slice(&1u16.to_le_bytes());
        put_i32(&mut data, 24, 480 * 80);
        put_f64(&mut data, 44, 480_000.0);
        put_f64(&mut data, 52, 160_000.0);

        let calendar = ProjectCalendar::default_base();
        let complete = vec![TimephasedWork::new(
            at(8, 8),
            at(8, 17),
            Duration::minutes(480.0),
            Duration::minutes(480.0),
        )];
        let spans = TimephasedDataFactory::default().planned_work(
            &calendar,
            at(8, 8),
            100.0,
            &data,
            &complete,
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, at(8, 17));
        assert_eq!(spans[0].finish, at(9, 17));
        assert_eq!(spans[0].amount_per_day, Duration::minutes(480.0));
        assert!(!spans[0].modified);
    }

    #[test]
    fn test_baseline_work() {
        let mut data = vec![0u8; 128];
        put_i32(&mut data, 44, tenths(at(8, 8)));
        put_i32(&mut data, 56, 4800);
        put_f64(&mut data, 68, 480_000.0);
        put_i32(&mut data, 84, tenths(at(8, 17)));
        put_i32(&mut data, 96, 4800);
        put_f64(&mut data, 108, 960_000.0);
        put_i32(&mut data, 124, tenths(at(9, 17)));

        let spans = TimephasedDataFactory::default().baseline_work(at(9, 18), &data);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, at(8, 8));
        assert_eq!(spans[0].finish, at(8, 17));
        assert_eq!(spans[0].total_amount, Duration::minutes(480.0));
        assert_eq!(spans[0].amount_per_day, Duration::minutes(480.0));
        assert_eq!(spans[1].finish, at(9, 18));
    }

    #[test]
    fn test_baseline_cost() {
        let mut data = vec![0u8; 76];
        put_i32(&mut data, 32, tenths(at(8, 8)));
        put_f64(&mut data, 44, 15_000.0);
        put_i32(&mut data, 52, tenths(at(8, 17)));
        put_f64(&mut data, 64, 15_000.0);
        put_i32(&mut data, 72, tenths(at(9, 17)));

        let spans = TimephasedDataFactory::default().baseline_cost(&data);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].total_amount, 150.0);
        assert_eq!(spans[0].finish, at(8, 17));
    }

    #[test]
    fn test_raw_option_skips_normalisation() {
        let calendar = ProjectCalendar::default_base();
        let factory = TimephasedDataFactory::new(&ReaderOptions::new().raw_timephased());
        let spans = vec![TimephasedWork::new(
            at(8, 8),
            at(10, 17),
            Duration::minutes(1440.0),
            Duration::minutes(480.0),
        )];
        assert_eq!(factory.normalise_work(&calendar, spans.clone()), spans);
    }
}
