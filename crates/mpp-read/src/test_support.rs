//! Builders for synthetic streams used by unit tests.

use crate::block::var_meta::VAR_META_MAGIC;
use crate::block::{Var2Data, VarMeta};

/// Build a wide VarMeta stream and its Var2Data from `(unique ID, type, payload)`.
pub(crate) fn var_store(entries: &[(i32, u16, &[u8])]) -> Var2Data {
    let (meta, data) = var_streams(entries);
    let meta = VarMeta::parse_wide(&meta).unwrap();
    Var2Data::new(meta, &data)
}

/// Raw VarMeta and Var2Data bytes for `(unique ID, type, payload)`.
pub(crate) fn var_streams(entries: &[(i32, u16, &[u8])]) -> (Vec<u8>, Vec<u8>) {
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

/// UTF-16LE bytes of `text` with a terminating zero.
pub(crate) fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}
