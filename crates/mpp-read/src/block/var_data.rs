//! Var2Data payload stores.
//!
//! Each payload is a 4-byte length followed by that many bytes, located at
//! an offset named by the [`VarMeta`] index. Offsets in the index are not in
//! stream order and several keys may share one payload.
//!
//! Lookups never fail. An entity or field type with no stored value yields
//! `None` for strings, byte arrays and dates and zero for numbers, since
//! optional fields are routinely left out of real files.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::block::var_meta::VarMeta;
use crate::bytes;

/// Var2Data payloads keyed through their index.
#[derive(Debug, Clone, Default)]
pub struct Var2Data {
    meta: VarMeta,
    payloads: BTreeMap<usize, Vec<u8>>,
}

impl Var2Data {
    /// Read every payload the index refers to.
    ///
    /// Payloads whose declared length runs past the end of the stream are
    /// skipped.
    #[must_use]
    pub fn new(meta: VarMeta, data: &[u8]) -> Self {
        let mut payloads = BTreeMap::new();
        for offset in meta.offsets() {
            let Some(start) = offset.checked_add(4).filter(|&start| start <= data.len()) else {
                warn!(offset, len = data.len(), "Var2Data offset out of range");
                continue;
            };
            let length = bytes::get_int(data, offset);
            let end = usize::try_from(length)
                .ok()
                .and_then(|length| start.checked_add(length))
                .filter(|&end| end <= data.len());
            match end {
                Some(end) => {
                    payloads.insert(offset, data[start..end].to_vec());
                }
                None => warn!(
                    offset,
                    length,
                    remaining = data.len() - start,
                    "Var2Data payload overruns stream, skipping"
                ),
            }
        }
        debug!(payloads = payloads.len(), "read Var2Data");
        Self { meta, payloads }
    }

    #[must_use]
    pub fn meta(&self) -> &VarMeta {
        &self.meta
    }

    /// Payload stored at a stream offset.
    #[must_use]
    pub fn byte_array_at_offset(&self, offset: usize) -> Option<&[u8]> {
        self.payloads.get(&offset).map(Vec::as_slice)
    }

    #[must_use]
    pub fn byte_array(&self, unique_id: i32, field_type: i32) -> Option<&[u8]> {
        let offset = self.meta.offset(unique_id, field_type)?;
        self.byte_array_at_offset(offset)
    }

    /// UTF-16LE string payload.
    #[must_use]
    pub fn unicode_string(&self, unique_id: i32, field_type: i32) -> Option<String> {
        self.byte_array(unique_id, field_type)
            .map(|data| bytes::get_unicode_string(data, 0))
    }

    /// Single-byte string payload.
    #[must_use]
    pub fn string(&self, unique_id: i32, field_type: i32) -> Option<String> {
        self.byte_array(unique_id, field_type)
            .map(|data| bytes::get_string(data, 0))
    }

    #[must_use]
    pub fn byte(&self, unique_id: i32, field_type: i32) -> u8 {
        self.read(unique_id, field_type, 0, bytes::get_byte)
    }

    #[must_use]
    pub fn short(&self, unique_id: i32, field_type: i32) -> u16 {
        self.short_at(unique_id, field_type, 0)
    }

    #[must_use]
    pub fn int(&self, unique_id: i32, field_type: i32) -> i32 {
        self.int_at(unique_id, field_type, 0)
    }

    #[must_use]
    pub fn long(&self, unique_id: i32, field_type: i32) -> i64 {
        self.read(unique_id, field_type, 0, bytes::get_long)
    }

    #[must_use]
    pub fn double(&self, unique_id: i32, field_type: i32) -> f64 {
        self.double_at(unique_id, field_type, 0)
    }

    #[must_use]
    pub fn timestamp(&self, unique_id: i32, field_type: i32) -> Option<NaiveDateTime> {
        self.timestamp_at(unique_id, field_type, 0)
    }

    #[must_use]
    pub fn short_at(&self, unique_id: i32, field_type: i32, offset: usize) -> u16 {
        self.read(unique_id, field_type, offset, bytes::get_short)
    }

    #[must_use]
    pub fn int_at(&self, unique_id: i32, field_type: i32, offset: usize) -> i32 {
        self.read(unique_id, field_type, offset, bytes::get_int)
    }

    #[must_use]
    pub fn double_at(&self, unique_id: i32, field_type: i32, offset: usize) -> f64 {
        self.read(unique_id, field_type, offset, bytes::get_double)
    }

    #[must_use]
    pub fn timestamp_at(
        &self,
        unique_id: i32,
        field_type: i32,
        offset: usize,
    ) -> Option<NaiveDateTime> {
        self.byte_array(unique_id, field_type)
            .and_then(|data| bytes::get_timestamp(data, offset))
    }

    fn read<T: Default>(
        &self,
        unique_id: i32,
        field_type: i32,
        offset: usize,
        reader: fn(&[u8], usize) -> T,
    ) -> T {
        self.byte_array(unique_id, field_type)
            .map(|data| reader(data, offset))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::var_meta::VAR_META_MAGIC;

    fn meta(entries: &[(i32, u16, i32)]) -> VarMeta {
        let mut data = Vec::new();
        data.extend_from_slice(&VAR_META_MAGIC.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(entries.len() as i32).to_le_bytes());
        data.extend_from_slice(&[0u8; 12]);
        for (id, field_type, offset) in entries {
            data.extend_from_slice(&id.to_le_bytes());
            data.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&field_type.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        VarMeta::parse_wide(&data).unwrap()
    }

    fn payload(data: &mut Vec<u8>, bytes: &[u8]) {
        data.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
        data.extend_from_slice(bytes);
    }

    #[test]
    fn test_typed_lookups() {
        let mut data = Vec::new();
        payload(&mut data, &[b'H', 0, b'i', 0, 0, 0]); // offset 0
        payload(&mut data, &1234i32.to_le_bytes()); // offset 10
        let store = Var2Data::new(meta(&[(1, 1, 0), (1, 2, 10), (2, 2, 10)]), &data);

        assert_eq!(store.unicode_string(1, 1).as_deref(), Some("Hi"));
        assert_eq!(store.int(1, 2), 1234);
        assert_eq!(store.int(2, 2), 1234);
        assert_eq!(store.short_at(1, 2, 2), 0);
    }

    #[test]
    fn test_missing_defaults() {
        let store = Var2Data::new(meta(&[]), &[]);
        assert_eq!(store.unicode_string(1, 1), None);
        assert_eq!(store.int(1, 1), 0);
        assert_eq!(store.double(1, 1), 0.0);
        assert_eq!(store.timestamp(1, 1), None);
    }

    #[test]
    fn test_overrunning_payload_skipped() {
        let mut data = Vec::new();
        payload(&mut data, &[1, 2, 3, 4]); // offset 0
        data.extend_from_slice(&100i32.to_le_bytes()); // offset 8, claims 100 bytes
        data.extend_from_slice(&[0u8; 4]);
        let store = Var2Data::new(meta(&[(1, 1, 0), (1, 2, 8)]), &data);
        assert_eq!(store.byte_array(1, 1), Some(&[1u8, 2, 3, 4][..]));
        assert_eq!(store.byte_array(1, 2), None);
    }
}
