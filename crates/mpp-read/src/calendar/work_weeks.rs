//! Work weeks.
//!
//! The work-week list opens with a 4-byte header. Each work week is seven
//! 60-byte day blocks, a start date, a finish date, 8 unknown bytes, a
//! 4-byte name length and the name, padded to a multiple of 4 bytes. Blocks
//! are read until too few bytes remain for another.

use mpp_model::{Day, DayType, ProjectCalendar};
use tracing::trace;

use crate::bytes::{align4, get_date, get_int, get_short, get_unicode_string_max};
use crate::calendar::hours::{DAY_BLOCK_SIZE, read_time_ranges};

/// Bytes a work week occupies before its name.
pub const WORK_WEEK_FIXED_SIZE: usize = 7 * DAY_BLOCK_SIZE + 2 + 2 + 8 + 4;

/// Read the work-week list at `offset` into `calendar`.
pub fn process_work_weeks(data: &[u8], offset: usize, calendar: &mut ProjectCalendar) {
    let mut offset = offset + 4;
    while data.len() >= offset + WORK_WEEK_FIXED_SIZE {
        let week = calendar.add_work_week();
        for day in Day::ALL {
            let block = offset + DAY_BLOCK_SIZE * day.index();
            if get_short(data, block) == 1 {
                week.set_working_day(day, DayType::Default);
                continue;
            }
            let range_count = usize::from(get_short(data, block + 2));
            let ranges = read_time_ranges(data, block + 8, block + 20, range_count);
            week.set_working_day(day, DayType::from(!ranges.is_empty()));
            week.add_calendar_hours(day).extend(ranges);
        }
        offset += 7 * DAY_BLOCK_SIZE;

        week.from = get_date(data, offset);
        week.to = get_date(data, offset + 2);
        offset += 4 + 8;

        let name_length = usize::try_from(get_int(data, offset)).map_or(0, align4);
        offset += 4;
        if name_length != 0 {
            let name = get_unicode_string_max(data, offset, name_length);
            week.name = (!name.is_empty()).then_some(name);
            offset += name_length;
        }
        trace!(name = ?week.name, from = ?week.from, to = ?week.to, "work week");
    }
}
