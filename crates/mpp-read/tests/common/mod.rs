//! Synthetic stream builders shared by the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use mpp_read::block::{FIXED_META_MAGIC, VAR_META_MAGIC};
use mpp_read::bytes::epoch;

/// FixedMeta stream with 10-byte records pointing at `offsets`.
pub fn fixed_meta(offsets: &[i32]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&FIXED_META_MAGIC.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&(offsets.len() as i32).to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    for offset in offsets {
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&offset.to_le_bytes());
        data.extend_from_slice(&[0, 0]);
    }
    data
}

/// Wide VarMeta and Var2Data streams for `(unique ID, type, payload)`.
pub fn var_streams(entries: &[(i32, u16, &[u8])]) -> (Vec<u8>, Vec<u8>) {
    let mut meta = Vec::new();
    meta.extend_from_slice(&VAR_META_MAGIC.to_le_bytes());
    meta.extend_from_slice(&0u32.to_le_bytes());
    meta.extend_from_slice(&(entries.len() as i32).to_le_bytes());
    meta.extend_from_slice(&[0u8; 12]);

    let mut data = Vec::new();
    for (id, field_type, payload) in entries {
        meta.extend_from_slice(&id.to_le_bytes());
        meta.extend_from_slice(&(data.len() as i32).to_le_bytes());
        meta.extend_from_slice(&field_type.to_le_bytes());
        meta.extend_from_slice(&0u16.to_le_bytes());

        data.extend_from_slice(&(payload.len() as i32).to_le_bytes());
        data.extend_from_slice(payload);
    }
    (meta, data)
}

/// Packed VarMeta and Var2Data streams for `(unique ID, type, payload)`.
pub fn packed_var_streams(entries: &[(i32, u8, &[u8])]) -> (Vec<u8>, Vec<u8>) {
    let mut meta = Vec::new();
    meta.extend_from_slice(&VAR_META_MAGIC.to_le_bytes());
    meta.extend_from_slice(&0u32.to_le_bytes());
    meta.extend_from_slice(&(entries.len() as i32).to_le_bytes());
    meta.extend_from_slice(&[0u8; 12]);

    let mut data = Vec::new();
    for (id, field_type, payload) in entries {
        meta.extend_from_slice(&id.to_le_bytes()[..3]);
        meta.push(*field_type);
        meta.extend_from_slice(&(data.len() as i32).to_le_bytes());

        data.extend_from_slice(&(payload.len() as i32).to_le_bytes());
        data.extend_from_slice(payload);
    }
    (meta, data)
}

/// UTF-16LE bytes of `text` with a terminating zero.
pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

/// Stored day count for `date`.
pub fn day_number(date: NaiveDate) -> u16 {
    (date - epoch().date()).num_days() as u16
}

/// A 60-byte calendar day block.
pub fn day_block(default_flag: u16, periods: &[(u16, i32)]) -> Vec<u8> {
    let mut block = vec![0u8; 60];
    block[0..2].copy_from_slice(&default_flag.to_le_bytes());
    block[2..4].copy_from_slice(&(periods.len() as u16).to_le_bytes());
    for (index, (start, duration)) in periods.iter().enumerate() {
        block[8 + index * 2..10 + index * 2].copy_from_slice(&start.to_le_bytes());
        block[20 + index * 4..24 + index * 4].copy_from_slice(&duration.to_le_bytes());
    }
    block
}

/// A 92-byte calendar exception record without a name.
pub fn exception_record(
    from: NaiveDate,
    to: NaiveDate,
    occurrences: u16,
    recurrence: u16,
    recurrence_data: [u8; 4],
) -> Vec<u8> {
    let mut record = vec![0u8; 92];
    record[0..2].copy_from_slice(&day_number(from).to_le_bytes());
    record[2..4].copy_from_slice(&day_number(to).to_le_bytes());
    record[4..6].copy_from_slice(&occurrences.to_le_bytes());
    record[72..74].copy_from_slice(&recurrence.to_le_bytes());
    record[76..80].copy_from_slice(&recurrence_data);
    record
}

/// Tenths of a minute after midnight.
pub fn tenths(hour: u16, minute: u16) -> u16 {
    (hour * 60 + minute) * 10
}

/// UTF-16LE bytes of `text`, unterminated, as a stored length and the
/// bytes padded to a multiple of 4.
fn stored_name(text: &str) -> (i32, Vec<u8>) {
    let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let length = bytes.len() as i32;
    bytes.resize(bytes.len().div_ceil(4) * 4, 0);
    (length, bytes)
}

/// A 92-byte non-working exception record followed by its name.
pub fn named_exception(from: NaiveDate, to: NaiveDate, name: &str) -> Vec<u8> {
    let mut record = exception_record(from, to, 1, 1, [0; 4]);
    let (length, bytes) = stored_name(name);
    record[88..92].copy_from_slice(&length.to_le_bytes());
    record.extend(bytes);
    record
}

/// A work week: seven day blocks, its dates and its name.
pub fn work_week(from: NaiveDate, to: NaiveDate, name: &str, days: [Vec<u8>; 7]) -> Vec<u8> {
    let mut data: Vec<u8> = days.into_iter().flatten().collect();
    data.extend_from_slice(&day_number(from).to_le_bytes());
    data.extend_from_slice(&day_number(to).to_le_bytes());
    data.extend_from_slice(&[0u8; 8]);
    let (length, bytes) = stored_name(name);
    data.extend_from_slice(&length.to_le_bytes());
    data.extend(bytes);
    data
}
