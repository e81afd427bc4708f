//! VarMeta index streams.
//!
//! The index maps `(unique ID, field type)` to an offset in the companion
//! Var2Data stream. Two record layouts exist.
//!
//! # Header (24 bytes)
//!
//! | Offset | Field      | Type |
//! |--------|------------|------|
//! | 0-3    | magic      | u32  |
//! | 4-7    | unknown    | u32  |
//! | 8-11   | item count | i32  |
//! | 12-19  | unknown    |      |
//! | 20-23  | data size  | i32  |
//!
//! # Records
//!
//! | Layout   | Size | Fields                                         |
//! |----------|------|------------------------------------------------|
//! | VarMeta12| 12   | id: i32, offset: i32, type: u16, unknown: u16  |
//! | VarMeta9 | 8    | id: u24, type: u8, offset: i32                 |

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::bytes::{get_byte, get_int, get_int3, get_short, get_u32};
use crate::error::{MppError, Result};

/// Magic number of a VarMeta header.
pub const VAR_META_MAGIC: u32 = 0xFADF_ADBA;

/// Size of the VarMeta header.
pub const VAR_META_HEADER_SIZE: usize = 24;

/// Record layout of a VarMeta stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarMetaLayout {
    /// 4-byte unique IDs, 12-byte records.
    Wide,
    /// Packed 3-byte unique IDs, 8-byte records.
    Packed,
}

impl VarMetaLayout {
    #[must_use]
    pub const fn record_size(self) -> usize {
        match self {
            Self::Wide => 12,
            Self::Packed => 8,
        }
    }

    /// Decode `(unique ID, field type, offset)` from one record.
    fn decode(self, record: &[u8]) -> (i32, i32, i32) {
        match self {
            Self::Wide => (
                get_int(record, 0),
                i32::from(get_short(record, 8)),
                get_int(record, 4),
            ),
            Self::Packed => (
                get_int3(record, 0),
                i32::from(get_byte(record, 3)),
                get_int(record, 4),
            ),
        }
    }
}

/// Parsed VarMeta index.
#[derive(Debug, Clone, Default)]
pub struct VarMeta {
    item_count: usize,
    data_size: usize,
    index: BTreeMap<i32, BTreeMap<i32, usize>>,
}

impl VarMeta {
    /// Parse an index with 4-byte unique IDs.
    pub fn parse_wide(data: &[u8]) -> Result<Self> {
        Self::parse(data, VarMetaLayout::Wide)
    }

    /// Parse an index with packed 3-byte unique IDs.
    pub fn parse_packed(data: &[u8]) -> Result<Self> {
        Self::parse(data, VarMetaLayout::Packed)
    }

    pub fn parse(data: &[u8], layout: VarMetaLayout) -> Result<Self> {
        if data.len() < VAR_META_HEADER_SIZE {
            return Err(MppError::truncated("VarMeta", VAR_META_HEADER_SIZE, data.len()));
        }
        let magic = get_u32(data, 0);
        if magic != VAR_META_MAGIC {
            return Err(MppError::BadMagic {
                block: "VarMeta",
                found: magic,
            });
        }

        let declared = usize::try_from(get_int(data, 8)).unwrap_or(0);
        let data_size = usize::try_from(get_int(data, 20)).unwrap_or(0);
        let records = &data[VAR_META_HEADER_SIZE..];
        let available = records.len() / layout.record_size();
        if declared > available {
            warn!(declared, available, "VarMeta item count exceeds stream, truncating");
        }

        let mut index: BTreeMap<i32, BTreeMap<i32, usize>> = BTreeMap::new();
        for record in records
            .chunks_exact(layout.record_size())
            .take(declared.min(available))
        {
            let (unique_id, field_type, offset) = layout.decode(record);
            let Ok(offset) = usize::try_from(offset) else {
                warn!(unique_id, field_type, offset, "negative VarMeta offset, skipping entry");
                continue;
            };
            index.entry(unique_id).or_default().insert(field_type, offset);
        }
        debug!(
            entities = index.len(),
            items = declared.min(available),
            "parsed VarMeta"
        );

        Ok(Self {
            item_count: declared.min(available),
            data_size,
            index,
        })
    }

    /// Number of index records read.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Size of the companion data stream, as declared.
    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    #[must_use]
    pub fn offset(&self, unique_id: i32, field_type: i32) -> Option<usize> {
        self.index.get(&unique_id)?.get(&field_type).copied()
    }

    #[must_use]
    pub fn contains(&self, unique_id: i32, field_type: i32) -> bool {
        self.offset(unique_id, field_type).is_some()
    }

    pub fn unique_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.index.keys().copied()
    }

    /// Field types stored for an entity.
    pub fn types(&self, unique_id: i32) -> impl Iterator<Item = i32> + '_ {
        self.index
            .get(&unique_id)
            .into_iter()
            .flat_map(|types| types.keys().copied())
    }

    /// Every distinct offset referenced by the index, in ascending order.
    #[must_use]
    pub fn offsets(&self) -> BTreeSet<usize> {
        self.index
            .values()
            .flat_map(|types| types.values().copied())
            .collect()
    }
}
