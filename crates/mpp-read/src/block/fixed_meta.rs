//! FixedMeta tables.
//!
//! A FixedMeta stream describes the records of its companion FixedData
//! stream: one fixed-size metadata record per item.
//!
//! # Header (16 bytes)
//!
//! | Offset | Field      | Type | Description                     |
//! |--------|------------|------|---------------------------------|
//! | 0-3    | magic      | u32  | `0xFADFADBA` (0 also accepted)  |
//! | 4-7    | unknown    | u32  |                                 |
//! | 8-11   | item count | i32  | Declared record count           |
//! | 12-15  | unknown    | u32  |                                 |
//!
//! The declared count is not trusted. The number of records actually read
//! is `(stream length - 16) / item size`.

use tracing::{debug, warn};

use crate::bytes::{get_int, get_short, get_u32};
use crate::error::{MppError, Result};

/// Magic number of a FixedMeta header.
pub const FIXED_META_MAGIC: u32 = 0xFADF_ADBA;

/// Size of the FixedMeta header.
pub const FIXED_META_HEADER_SIZE: usize = 16;

/// Offset of the data offset within a metadata record.
pub const META_DATA_OFFSET: usize = 4;

/// How the size of each metadata record is determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSize {
    /// Every record has this size.
    Fixed(usize),
    /// Pick a size from candidates, reconciling the declared item count,
    /// the bytes available and the item count of a sibling table.
    Heuristic {
        candidates: Vec<usize>,
        sibling_count: usize,
    },
}

impl ItemSize {
    /// Resolve to a concrete record size.
    ///
    /// A candidate that divides the available bytes exactly and yields the
    /// sibling's item count wins outright. Otherwise the candidate whose
    /// `declared * size` comes closest to the available bytes without
    /// exceeding them is used. When every candidate overshoots, the one
    /// overshooting least is used. `None` only when there is no non-zero
    /// size to choose from.
    #[must_use]
    pub fn resolve(&self, declared: usize, available: usize) -> Option<usize> {
        match self {
            Self::Fixed(size) => (*size > 0).then_some(*size),
            Self::Heuristic {
                candidates,
                sibling_count,
            } => {
                let mut best: Option<(usize, usize)> = None;
                let mut least_over: Option<(usize, usize)> = None;
                for &size in candidates.iter().filter(|&&size| size > 0) {
                    if available % size == 0 && available / size == *sibling_count {
                        return Some(size);
                    }
                    let needed = declared.saturating_mul(size);
                    let (slot, gap) = if needed <= available {
                        (&mut best, available - needed)
                    } else {
                        (&mut least_over, needed - available)
                    };
                    if slot.is_none_or(|(_, best_gap)| gap < best_gap) {
                        *slot = Some((size, gap));
                    }
                }
                if best.is_none()
                    && let Some((size, overshoot)) = least_over
                {
                    warn!(
                        declared,
                        available,
                        item_size = size,
                        overshoot,
                        "every FixedMeta item size overshoots the declared count"
                    );
                }
                best.or(least_over).map(|(size, _)| size)
            }
        }
    }
}

/// A view of one metadata record.
#[derive(Debug, Clone, Copy)]
pub struct MetaRecord<'a> {
    data: &'a [u8],
}

impl<'a> MetaRecord<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Flag word at the start of the record.
    #[must_use]
    pub fn flags(&self) -> u16 {
        get_short(self.data, 0)
    }

    /// A non-zero flag word marks a deleted record. Only two bytes are read.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.flags() != 0
    }

    /// Offset of the record's item in the FixedData stream.
    #[must_use]
    pub fn data_offset(&self) -> i32 {
        get_int(self.data, META_DATA_OFFSET)
    }
}

/// Parsed FixedMeta stream.
#[derive(Debug, Clone)]
pub struct FixedMeta {
    declared_item_count: usize,
    item_size: usize,
    records: Vec<Vec<u8>>,
}

impl FixedMeta {
    /// Parse a FixedMeta stream.
    ///
    /// Fails only when the stream is too short for a header, carries the
    /// wrong magic number, or the size strategy offers no non-zero size.
    pub fn parse(data: &[u8], item_size: &ItemSize) -> Result<Self> {
        if data.len() < FIXED_META_HEADER_SIZE {
            return Err(MppError::truncated(
                "FixedMeta",
                FIXED_META_HEADER_SIZE,
                data.len(),
            ));
        }
        let magic = get_u32(data, 0);
        if magic != FIXED_META_MAGIC && magic != 0 {
            return Err(MppError::BadMagic {
                block: "FixedMeta",
                found: magic,
            });
        }

        let declared_item_count = usize::try_from(get_int(data, 8)).unwrap_or(0);
        let available = data.len() - FIXED_META_HEADER_SIZE;
        let size = item_size
            .resolve(declared_item_count, available)
            .ok_or_else(|| MppError::invalid_format("FixedMeta item size strategy has no non-zero size"))?;

        let records: Vec<Vec<u8>> = data[FIXED_META_HEADER_SIZE..]
            .chunks_exact(size)
            .map(<[u8]>::to_vec)
            .collect();

        if records.len() != declared_item_count {
            warn!(
                declared = declared_item_count,
                adjusted = records.len(),
                item_size = size,
                "FixedMeta item count does not match stream length"
            );
        }
        debug!(items = records.len(), item_size = size, "parsed FixedMeta");

        Ok(Self {
            declared_item_count,
            item_size: size,
            records,
        })
    }

    /// Item count as declared in the header.
    #[must_use]
    pub fn declared_item_count(&self) -> usize {
        self.declared_item_count
    }

    /// Number of records actually present.
    #[must_use]
    pub fn adjusted_item_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    #[must_use]
    pub fn record_bytes(&self, index: usize) -> Option<&[u8]> {
        self.records.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn record(&self, index: usize) -> Option<MetaRecord<'_>> {
        self.record_bytes(index).map(MetaRecord::new)
    }

    pub fn records(&self) -> impl Iterator<Item = MetaRecord<'_>> {
        self.records.iter().map(|record| MetaRecord::new(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(magic: u32, count: i32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&magic.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data
    }

    #[test]
    fn test_parse_fixed_size() {
        let mut data = header(FIXED_META_MAGIC, 2);
        data.extend_from_slice(&[0, 0, 0, 0, 10, 0, 0, 0]);
        data.extend_from_slice(&[2, 0, 0, 0, 20, 0, 0, 0]);
        let meta = FixedMeta::parse(&data, &ItemSize::Fixed(8)).unwrap();

        assert_eq!(meta.adjusted_item_count(), 2);
        assert_eq!(meta.record(0).unwrap().data_offset(), 10);
        assert!(!meta.record(0).unwrap().is_deleted());
        assert!(meta.record(1).unwrap().is_deleted());
    }

    #[test]
    fn test_zero_magic_accepted() {
        let data = header(0, 0);
        assert!(FixedMeta::parse(&data, &ItemSize::Fixed(10)).is_ok());
    }

    #[test]
    fn test_bad_magic() {
        let data = header(0x1234_5678, 0);
        let err = FixedMeta::parse(&data, &ItemSize::Fixed(10)).unwrap_err();
        assert!(matches!(err, MppError::BadMagic { found: 0x1234_5678, .. }));
    }

    #[test]
    fn test_truncated_header() {
        let err = FixedMeta::parse(&[0xBA, 0xAD], &ItemSize::Fixed(10)).unwrap_err();
        assert!(matches!(err, MppError::Truncated { .. }));
    }

    #[test]
    fn test_adjusted_count_ignores_declared() {
        let mut data = header(FIXED_META_MAGIC, 5);
        data.extend_from_slice(&[0u8; 24]);
        let meta = FixedMeta::parse(&data, &ItemSize::Fixed(12)).unwrap();
        assert_eq!(meta.declared_item_count(), 5);
        assert_eq!(meta.adjusted_item_count(), 2);
    }

    #[test]
    fn test_heuristic_prefers_sibling_match() {
        let heuristic = ItemSize::Heuristic {
            candidates: vec![10, 12],
            sibling_count: 10,
        };
        // 120 bytes: 12 * 10 matches the sibling count
        assert_eq!(heuristic.resolve(9, 120), Some(12));
    }

    #[test]
    fn test_heuristic_closest_without_overshoot() {
        let heuristic = ItemSize::Heuristic {
            candidates: vec![10, 12, 14],
            sibling_count: 0,
        };
        // 9 items in 115 bytes: 90 and 108 fit, 126 overshoots
        assert_eq!(heuristic.resolve(9, 115), Some(12));
        // 100 items overshoot with every size; 10 overshoots least
        assert_eq!(heuristic.resolve(100, 115), Some(10));
        assert_eq!(ItemSize::Fixed(0).resolve(1, 10), None);
    }

    #[test]
    fn test_overstated_count_still_reads_records() {
        let mut data = header(FIXED_META_MAGIC, 50);
        for index in 0..10u8 {
            let mut record = [0u8; 10];
            record[4] = index * 10;
            data.extend_from_slice(&record);
        }
        let heuristic = ItemSize::Heuristic {
            candidates: vec![10, 12],
            sibling_count: 0,
        };
        let meta = FixedMeta::parse(&data, &heuristic).unwrap();

        assert_eq!(meta.item_size(), 10);
        assert_eq!(meta.declared_item_count(), 50);
        assert_eq!(meta.adjusted_item_count(), 10);
        assert_eq!(meta.record(9).unwrap().data_offset(), 90);
    }
}
