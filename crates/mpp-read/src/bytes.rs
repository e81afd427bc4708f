//! Typed reads from raw MPP byte buffers.
//!
//! All multi-byte values are little-endian. Readers never mutate the buffer
//! and never panic: bytes past the end of the buffer read as zero, so a
//! truncated record yields zeroes rather than an abort. Offsets are the
//! caller's responsibility; the table layers only hand out offsets they
//! have already checked.
//!
//! # Date and time encodings
//!
//! | Encoding              | Width | Meaning                                          |
//! |-----------------------|-------|--------------------------------------------------|
//! | date                  | 2     | days since 1983-12-31, `0xFFFF` = no value        |
//! | time                  | 2     | tenths of a minute since midnight                |
//! | duration              | 4     | tenths of a minute                               |
//! | timestamp             | 4     | time (2 bytes) then date (2 bytes)               |
//! | timestamp from tenths | 4     | tenths of a minute since the epoch               |

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
use mpp_model::Color;
use uuid::Uuid;

/// Day counts at or above this value mark an unset date.
pub const NULL_DATE: u16 = 0xFFFF;

/// Timestamps with fewer days than this since the epoch are placeholders.
pub const MIN_TIMESTAMP_DAYS: u16 = 100;

/// Milliseconds in a tenth of a minute.
pub const MS_PER_TENTH_MINUTE: i64 = 6_000;

/// The MPP epoch, 1983-12-31.
#[must_use]
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1983, 12, 31)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Copy `N` bytes from `offset`, zero-filling anything past the end.
fn array<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut buf = [0u8; N];
    if let Some(available) = data.get(offset..) {
        let len = available.len().min(N);
        buf[..len].copy_from_slice(&available[..len]);
    }
    buf
}

#[must_use]
pub fn get_byte(data: &[u8], offset: usize) -> u8 {
    data.get(offset).copied().unwrap_or(0)
}

/// Unsigned 16-bit value.
#[must_use]
pub fn get_short(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(array(data, offset))
}

/// Signed 32-bit value.
#[must_use]
pub fn get_int(data: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(array(data, offset))
}

/// Unsigned 32-bit value.
#[must_use]
pub fn get_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(array(data, offset))
}

/// Unsigned 24-bit value, as used for packed unique IDs.
#[must_use]
pub fn get_int3(data: &[u8], offset: usize) -> i32 {
    let [a, b, c] = array::<3>(data, offset);
    i32::from_le_bytes([a, b, c, 0])
}

/// Unsigned 48-bit value.
#[must_use]
pub fn get_long6(data: &[u8], offset: usize) -> u64 {
    let bytes = array::<6>(data, offset);
    let mut buf = [0u8; 8];
    buf[..6].copy_from_slice(&bytes);
    u64::from_le_bytes(buf)
}

/// Signed 64-bit value.
#[must_use]
pub fn get_long(data: &[u8], offset: usize) -> i64 {
    i64::from_le_bytes(array(data, offset))
}

/// IEEE-754 double; NaN is stored as an "unset" marker and reads as 0.0.
#[must_use]
pub fn get_double(data: &[u8], offset: usize) -> f64 {
    let value = f64::from_le_bytes(array(data, offset));
    if value.is_nan() { 0.0 } else { value }
}

/// Date stored as a day count since the epoch.
#[must_use]
pub fn get_date(data: &[u8], offset: usize) -> Option<NaiveDate> {
    let days = get_short(data, offset);
    if days == NULL_DATE {
        return None;
    }
    epoch()
        .date()
        .checked_add_days(chrono::Days::new(u64::from(days)))
}

/// Time of day as minutes after midnight.
#[must_use]
pub fn get_time_minutes(data: &[u8], offset: usize) -> u32 {
    (u32::from(get_short(data, offset)) / 10) % (24 * 60)
}

/// Time of day.
#[must_use]
pub fn get_time(data: &[u8], offset: usize) -> NaiveTime {
    let minutes = get_time_minutes(data, offset);
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Duration in tenths of a minute.
#[must_use]
pub fn get_duration_tenths(data: &[u8], offset: usize) -> i32 {
    get_int(data, offset)
}

/// Duration in milliseconds.
#[must_use]
pub fn get_duration(data: &[u8], offset: usize) -> i64 {
    i64::from(get_int(data, offset)) * MS_PER_TENTH_MINUTE
}

/// Timestamp stored as a time of day followed by a day count.
///
/// Day counts below 100 show as "NA" in MS Project and are treated as
/// unset, as is the `0xFFFF` sentinel. A time of `0xFFFF` reads as midnight.
#[must_use]
pub fn get_timestamp(data: &[u8], offset: usize) -> Option<NaiveDateTime> {
    let days = get_short(data, offset + 2);
    if days < MIN_TIMESTAMP_DAYS || days == NULL_DATE {
        return None;
    }
    let mut time = get_short(data, offset);
    if time == 0xFFFF {
        time = 0;
    }
    Some(
        epoch()
            + ChronoDuration::days(i64::from(days))
            + ChronoDuration::milliseconds(i64::from(time) * MS_PER_TENTH_MINUTE),
    )
}

/// Timestamp stored as tenths of a minute since the epoch; -1 is unset.
#[must_use]
pub fn get_timestamp_from_tenths(data: &[u8], offset: usize) -> Option<NaiveDateTime> {
    let tenths = get_int(data, offset);
    if tenths == -1 {
        return None;
    }
    Some(epoch() + ChronoDuration::milliseconds(i64::from(tenths) * MS_PER_TENTH_MINUTE))
}

/// UTF-16LE string, terminated by a zero code unit or the end of the buffer.
#[must_use]
pub fn get_unicode_string(data: &[u8], offset: usize) -> String {
    get_unicode_string_max(data, offset, usize::MAX)
}

/// UTF-16LE string of at most `max_length` bytes.
#[must_use]
pub fn get_unicode_string_max(data: &[u8], offset: usize, max_length: usize) -> String {
    let Some(available) = data.get(offset..) else {
        return String::new();
    };
    let limit = available.len().min(max_length);
    let units: Vec<u16> = available[..limit]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

/// Single-byte string, terminated by a zero byte or the end of the buffer.
#[must_use]
pub fn get_string(data: &[u8], offset: usize) -> String {
    data.get(offset..)
        .unwrap_or_default()
        .iter()
        .take_while(|&&byte| byte != 0)
        .map(|&byte| char::from(byte))
        .collect()
}

/// GUID in the mixed-endian on-disk layout: the first three fields are
/// little-endian, the last eight bytes are literal.
#[must_use]
pub fn get_guid(data: &[u8], offset: usize) -> Option<Uuid> {
    let bytes: [u8; 16] = data.get(offset..offset.checked_add(16)?)?.try_into().ok()?;
    Some(Uuid::from_bytes_le(bytes))
}

/// RGB color followed by an "automatic" flag byte; automatic reads as `None`.
#[must_use]
pub fn get_color(data: &[u8], offset: usize) -> Option<Color> {
    if get_byte(data, offset + 3) != 0 {
        return None;
    }
    Some(Color::new(
        get_byte(data, offset),
        get_byte(data, offset + 1),
        get_byte(data, offset + 2),
    ))
}

/// Copy of up to `len` bytes from `offset`, shorter if the buffer ends first.
#[must_use]
pub fn get_byte_array(data: &[u8], offset: usize, len: usize) -> Vec<u8> {
    data.get(offset..)
        .map(|available| available[..available.len().min(len)].to_vec())
        .unwrap_or_default()
}

/// Round a 4-byte-aligned length up, as name blocks are padded.
#[must_use]
pub fn align4(len: usize) -> usize {
    len.div_ceil(4) * 4
}
