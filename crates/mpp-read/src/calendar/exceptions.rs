//! Calendar exceptions.
//!
//! The exception list opens with a 2-byte count and 2 bytes of padding,
//! followed by one 92-byte record per exception. A named exception carries
//! its name directly after the record, padded to a multiple of 4 bytes.
//!
//! | Offset | Field            | Type   |
//! |--------|------------------|--------|
//! | 0-1    | from date        | date   |
//! | 2-3    | to date          | date   |
//! | 4-5    | occurrences      | u16    |
//! | 6-7    | period count     | u16    |
//! | 12-21  | start times      | u16[5] |
//! | 24-43  | durations        | i32[5] |
//! | 72-73  | recurrence type  | u16    |
//! | 76-79  | recurrence data  | varies |
//! | 88-91  | name length      | i32    |
//!
//! The meaning of bytes 76-79 depends on the recurrence type. Type 0 marks
//! a plain exception with no recurrence.

use chrono::NaiveDate;
use mpp_model::{Day, ProjectCalendar, RecurrenceType, RecurringData};
use tracing::{debug, trace, warn};

use crate::bytes::{align4, get_byte, get_date, get_int, get_short, get_unicode_string_max};
use crate::calendar::hours::read_time_ranges;

/// Size of an exception record, excluding its name.
pub const EXCEPTION_RECORD_SIZE: usize = 92;

/// Read the exception list at `offset` into `calendar`.
///
/// Returns the offset just past the list, or `None` when the data ends
/// before the list header.
pub fn process_calendar_exceptions(
    data: &[u8],
    offset: usize,
    calendar: &mut ProjectCalendar,
) -> Option<usize> {
    if data.len() < offset + 4 {
        return None;
    }
    let count = get_short(data, offset);
    let mut offset = offset + 4;

    for index in 0..count {
        if data.len() < offset + EXCEPTION_RECORD_SIZE {
            warn!(
                index,
                count,
                calendar = ?calendar.unique_id,
                "calendar exception list truncated"
            );
            break;
        }
        let record = &data[offset..offset + EXCEPTION_RECORD_SIZE];

        let name_length = usize::try_from(get_int(record, 88)).map_or(0, align4);
        let name = (name_length != 0)
            .then(|| get_unicode_string_max(data, offset + EXCEPTION_RECORD_SIZE, name_length))
            .filter(|name| !name.is_empty());
        offset += EXCEPTION_RECORD_SIZE + name_length;

        let (Some(from), Some(to)) = (get_date(record, 0), get_date(record, 2)) else {
            warn!(index, calendar = ?calendar.unique_id, "calendar exception without dates");
            continue;
        };

        let period_count = usize::from(get_short(record, 6));
        let recurring = read_recurrence(record, from, to);
        trace!(%from, %to, periods = period_count, "calendar exception");

        let exception = calendar.add_calendar_exception(from, to);
        exception.name = name;
        exception.ranges = read_time_ranges(record, 12, 24, period_count);
        exception.recurring = recurring.filter(|recurring| !recurring.is_default());
    }
    Some(offset)
}

/// Decode the recurrence descriptor of an exception record.
fn read_recurrence(record: &[u8], from: NaiveDate, to: NaiveDate) -> Option<RecurringData> {
    let type_code = get_short(record, 72);
    if type_code == 0 {
        return None;
    }
    let recurrence_type = match type_code {
        2 | 3 => RecurrenceType::Yearly,
        4 | 5 => RecurrenceType::Monthly,
        6 => RecurrenceType::Weekly,
        _ => RecurrenceType::Daily,
    };

    let mut rd = RecurringData::new(recurrence_type, from);
    rd.finish_date = Some(to);
    rd.occurrences = Some(u32::from(get_short(record, 4)));

    match type_code {
        1 => rd.frequency = 1,
        7 => rd.frequency = u32::from(get_short(record, 76)),
        2 => {
            rd.month_number = Some(u32::from(get_byte(record, 76)) + 1);
            rd.day_number = Some(u32::from(get_byte(record, 77)));
        }
        3 => {
            rd.relative = true;
            rd.month_number = Some(u32::from(get_byte(record, 76)) + 1);
            rd.day_number = Some(u32::from(get_byte(record, 77)) + 1);
            rd.day_of_week = Day::from_value(i32::from(get_byte(record, 78)) - 2);
        }
        4 => {
            rd.day_number = Some(u32::from(get_byte(record, 76)));
            rd.frequency = u32::from(get_byte(record, 78));
        }
        5 => {
            rd.relative = true;
            rd.day_number = Some(u32::from(get_byte(record, 76)) + 1);
            rd.day_of_week = Day::from_value(i32::from(get_byte(record, 77)) - 2);
            rd.frequency = u32::from(get_short(record, 78));
        }
        6 => {
            rd.set_weekly_days_from_bitmap(get_byte(record, 76));
            rd.frequency = u32::from(get_short(record, 78));
        }
        other => {
            debug!(
                code = other,
                record = %hex::encode(&record[72..80]),
                "unknown recurrence type, reading as daily"
            );
            rd.frequency = u32::from(get_short(record, 76));
        }
    }
    rd.frequency = rd.frequency.max(1);
    Some(rd)
}
