//! Weekly working hours.
//!
//! Seven 60-byte day blocks, Sunday first.
//!
//! | Offset | Field         | Type     | Description                         |
//! |--------|---------------|----------|-------------------------------------|
//! | 0-1    | default flag  | u16      | 1 = inherit / default working week  |
//! | 2-3    | period count  | u16      | 0 = non-working                     |
//! | 8-17   | start times   | u16[5]   | tenths of a minute after midnight   |
//! | 20-39  | durations     | i32[5]   | tenths of a minute                  |

use mpp_model::{
    DEFAULT_WORKING_AFTERNOON, DEFAULT_WORKING_MORNING, DEFAULT_WORKING_WEEK, Day, DayType,
    ProjectCalendar, TimeRange,
};

use crate::bytes::{get_int, get_short, get_time_minutes};

/// Size of one day block.
pub const DAY_BLOCK_SIZE: usize = 60;

/// Most periods a day block or exception record can hold.
pub const MAX_PERIODS: usize = 5;

/// Read `count` time ranges from parallel arrays of start times (2 bytes
/// each) and durations (4 bytes each).
pub(crate) fn read_time_ranges(
    data: &[u8],
    starts: usize,
    durations: usize,
    count: usize,
) -> Vec<TimeRange> {
    (0..count.min(MAX_PERIODS))
        .map(|index| {
            let start = get_time_minutes(data, starts + index * 2);
            let tenths = get_int(data, durations + index * 4);
            TimeRange::from_minutes(start, u32::try_from(tenths / 10).unwrap_or(0))
        })
        .collect()
}

/// Populate a calendar's weekly pattern.
///
/// Without data every day takes the default flag. A flagged day of a base
/// calendar gets the default working week; a flagged day of a derived
/// calendar inherits from its base.
pub fn process_calendar_hours(
    data: Option<&[u8]>,
    hours_offset: usize,
    calendar: &mut ProjectCalendar,
    is_base: bool,
) {
    for day in Day::ALL {
        let offset = hours_offset + DAY_BLOCK_SIZE * day.index();
        let default_flag = data.map_or(1, |data| get_short(data, offset));

        if default_flag == 1 {
            if is_base {
                let working = DEFAULT_WORKING_WEEK[day.index()];
                calendar.set_working_day(day, DayType::from(working));
                if working {
                    let hours = calendar.add_calendar_hours(day);
                    hours.push(DEFAULT_WORKING_MORNING);
                    hours.push(DEFAULT_WORKING_AFTERNOON);
                }
            } else {
                calendar.set_working_day(day, DayType::Default);
            }
            continue;
        }

        let Some(data) = data else { continue };
        let period_count = usize::from(get_short(data, offset + 2));
        if period_count == 0 {
            calendar.set_working_day(day, DayType::NonWorking);
        } else {
            calendar.set_working_day(day, DayType::Working);
            let ranges = read_time_ranges(data, offset + 8, offset + 20, period_count);
            calendar.add_calendar_hours(day).extend(ranges);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_block(flag: u16, periods: &[(u16, i32)]) -> Vec<u8> {
        let mut block = vec![0u8; DAY_BLOCK_SIZE];
        block[0..2].copy_from_slice(&flag.to_le_bytes());
        block[2..4].copy_from_slice(&(periods.len() as u16).to_le_bytes());
        for (index, (start, duration)) in periods.iter().enumerate() {
            block[8 + index * 2..10 + index * 2].copy_from_slice(&start.to_le_bytes());
            block[20 + index * 4..24 + index * 4].copy_from_slice(&duration.to_le_bytes());
        }
        block
    }

    #[test]
    fn test_explicit_hours() {
        let mut data = Vec::new();
        data.extend(day_block(0, &[])); // Sunday
        data.extend(day_block(0, &[(4200, 3000)])); // Monday 07:00 for 5 hours
        for _ in 2..7 {
            data.extend(day_block(1, &[]));
        }
        let mut calendar = ProjectCalendar::new();
        process_calendar_hours(Some(&data), 0, &mut calendar, false);

        assert_eq!(calendar.working_day(Day::Sunday), DayType::NonWorking);
        assert_eq!(calendar.working_day(Day::Monday), DayType::Working);
        assert_eq!(calendar.hours(Day::Monday), &[TimeRange::from_minutes(420, 300)]);
        assert_eq!(calendar.working_day(Day::Tuesday), DayType::Default);
    }

    #[test]
    fn test_no_data_base_calendar() {
        let mut calendar = ProjectCalendar::new();
        process_calendar_hours(None, 0, &mut calendar, true);
        assert_eq!(calendar.working_day(Day::Saturday), DayType::NonWorking);
        assert_eq!(calendar.hours(Day::Wednesday).len(), 2);
    }

    #[test]
    fn test_period_count_clamped() {
        let mut block = day_block(0, &[]);
        block[2..4].copy_from_slice(&40u16.to_le_bytes());
        let ranges = read_time_ranges(&block, 8, 20, 40);
        assert_eq!(ranges.len(), MAX_PERIODS);
    }
}
