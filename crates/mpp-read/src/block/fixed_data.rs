//! FixedData tables.
//!
//! Items are sliced from the stream at the offsets their metadata records
//! declare. Sizes are not stored; an item runs up to the next item's offset,
//! and the last item runs to the end of the stream.

use tracing::{debug, warn};

use crate::block::fixed_meta::FixedMeta;

/// Items sliced from a FixedData stream. Items whose offset lies outside
/// the stream are left as holes.
#[derive(Debug, Clone, Default)]
pub struct FixedData {
    items: Vec<Option<Vec<u8>>>,
    offsets: Vec<Option<usize>>,
}

impl FixedData {
    /// Slice items using sizes derived from consecutive offsets.
    ///
    /// A derived size of zero becomes `min_size`. A negative size, or one
    /// running past the end of the stream, becomes whatever remains of the
    /// stream. Sizes are then clamped to `max_size` unless it is zero.
    #[must_use]
    pub fn from_meta(meta: &FixedMeta, data: &[u8], max_size: usize, min_size: usize) -> Self {
        let count = meta.adjusted_item_count();
        let mut table = Self::with_capacity(count);
        for index in 0..count {
            let Some(offset) = item_offset(meta, index, data.len()) else {
                table.push_hole();
                continue;
            };
            let available = data.len() - offset;
            let derived = if index + 1 == count {
                available as i64
            } else {
                meta.record(index + 1)
                    .map_or(available as i64, |next| {
                        i64::from(next.data_offset()) - offset as i64
                    })
            };

            let mut size = if derived == 0 { min_size as i64 } else { derived };
            if size < 0 || size > available as i64 {
                size = if max_size == 0 {
                    available as i64
                } else {
                    max_size.min(available) as i64
                };
            }
            let mut size = usize::try_from(size).unwrap_or(0);
            if max_size != 0 && size > max_size {
                size = max_size;
            }
            table.push(offset, &data[offset..offset + size]);
        }
        debug!(items = table.items.len(), "sliced FixedData by offset");
        table
    }

    /// Slice items of exactly `item_size` bytes at each declared offset,
    /// ignoring the spacing between offsets. Items are cut short at the end
    /// of the stream.
    #[must_use]
    pub fn with_item_size(meta: &FixedMeta, data: &[u8], item_size: usize) -> Self {
        let count = meta.adjusted_item_count();
        let mut table = Self::with_capacity(count);
        for index in 0..count {
            match item_offset(meta, index, data.len()) {
                Some(offset) => {
                    let end = offset.saturating_add(item_size).min(data.len());
                    table.push(offset, &data[offset..end]);
                }
                None => table.push_hole(),
            }
        }
        debug!(items = table.items.len(), item_size, "sliced FixedData by size");
        table
    }

    /// Slice the stream into consecutive items of `item_size` bytes, without
    /// a metadata table. A trailing partial item is kept only when
    /// `allow_remainder` is set.
    #[must_use]
    pub fn from_stride(data: &[u8], item_size: usize, allow_remainder: bool) -> Self {
        let mut table = Self::default();
        if item_size == 0 {
            return table;
        }
        let mut offset = 0;
        for chunk in data.chunks(item_size) {
            if chunk.len() < item_size && !allow_remainder {
                break;
            }
            table.push(offset, chunk);
            offset += chunk.len();
        }
        table
    }

    fn with_capacity(count: usize) -> Self {
        Self {
            items: Vec::with_capacity(count),
            offsets: Vec::with_capacity(count),
        }
    }

    fn push(&mut self, offset: usize, item: &[u8]) {
        self.items.push(Some(item.to_vec()));
        self.offsets.push(Some(offset));
    }

    fn push_hole(&mut self) {
        self.items.push(None);
        self.offsets.push(None);
    }

    /// Number of slots, holes included.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.items.get(index)?.as_deref()
    }

    /// Whether `index` names an item that was actually read.
    #[must_use]
    pub fn is_valid_offset(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Stream offset an item was read from.
    #[must_use]
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied().flatten()
    }

    /// Index of the item read from stream offset `offset`.
    #[must_use]
    pub fn index_from_offset(&self, offset: usize) -> Option<usize> {
        self.offsets.iter().position(|&item| item == Some(offset))
    }

    /// Items that were read, with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u8])> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.as_deref().map(|item| (index, item)))
    }
}

fn item_offset(meta: &FixedMeta, index: usize, len: usize) -> Option<usize> {
    let raw = meta.record(index)?.data_offset();
    match usize::try_from(raw) {
        Ok(offset) if offset <= len => Some(offset),
        _ => {
            warn!(index, offset = raw, len, "FixedData offset out of range, skipping item");
            None
        }
    }
}
