//! FixDeferFix chained blocks.
//!
//! An item is split across a linked list of 36-byte physical blocks. The
//! first block of a chain carries the next-block offset, the item size and
//! 28 payload bytes; each continuation block carries the next-block offset
//! and 32 payload bytes. A next-block offset of -1 ends the chain.

use std::collections::HashSet;

use tracing::warn;

use crate::bytes::get_int;

/// Payload bytes in the first block of a chain.
pub const FIRST_BLOCK_PAYLOAD: usize = 28;

/// Payload bytes in a continuation block.
pub const CONTINUATION_BLOCK_PAYLOAD: usize = 32;

/// Next-block offset that ends a chain.
pub const END_OF_CHAIN: i32 = -1;

/// A FixDeferFix stream.
#[derive(Debug, Clone)]
pub struct FixDeferFix {
    data: Vec<u8>,
}

impl FixDeferFix {
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Reassemble the item whose chain starts at `offset`.
    ///
    /// Returns `None` when the offset or declared item size is out of
    /// range. A chain that runs off the end of the stream or revisits a
    /// block is cut short; the bytes not reached stay zero.
    #[must_use]
    pub fn byte_array(&self, offset: i32) -> Option<Vec<u8>> {
        let len = self.data.len();
        let start = usize::try_from(offset).ok().filter(|&start| start > 0 && start < len)?;
        let item_size = usize::try_from(get_int(&self.data, start + 4))
            .ok()
            .filter(|&size| size > 0 && size < len)?;

        let mut result = vec![0u8; item_size];
        let mut visited = HashSet::from([start]);
        let mut copied = self.copy(start + 8, &mut result, 0, FIRST_BLOCK_PAYLOAD);
        let mut next = get_int(&self.data, start);

        while next != END_OF_CHAIN && copied < item_size {
            let Some(block) = usize::try_from(next).ok().filter(|&block| block + 4 <= len) else {
                warn!(offset, next, "FixDeferFix chain points outside stream");
                break;
            };
            if !visited.insert(block) {
                warn!(offset, block, "FixDeferFix chain revisits a block");
                break;
            }
            copied = self.copy(block + 4, &mut result, copied, CONTINUATION_BLOCK_PAYLOAD);
            next = get_int(&self.data, block);
        }
        Some(result)
    }

    /// Copy up to `capacity` bytes from `source` into `target[copied..]`,
    /// returning the new copied count.
    fn copy(&self, source: usize, target: &mut [u8], copied: usize, capacity: usize) -> usize {
        let available = self.data.len().saturating_sub(source);
        let count = capacity.min(target.len() - copied).min(available);
        if count == 0 {
            return copied;
        }
        target[copied..copied + count].copy_from_slice(&self.data[source..source + count]);
        copied + count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_block(next: i32, size: i32, payload: &[u8]) -> Vec<u8> {
        let mut block = Vec::new();
        block.extend_from_slice(&next.to_le_bytes());
        block.extend_from_slice(&size.to_le_bytes());
        block.extend_from_slice(payload);
        block.resize(36, 0);
        block
    }

    #[test]
    fn test_single_block() {
        let mut data = vec![0u8; 36];
        data.extend(first_block(END_OF_CHAIN, 5, b"hello"));
        let store = FixDeferFix::new(data);
        assert_eq!(store.byte_array(36).unwrap(), b"hello");
    }

    #[test]
    fn test_offset_and_size_bounds() {
        let mut data = vec![0u8; 36];
        data.extend(first_block(END_OF_CHAIN, 500, b""));
        let store = FixDeferFix::new(data);
        assert_eq!(store.byte_array(0), None);
        assert_eq!(store.byte_array(-1), None);
        assert_eq!(store.byte_array(1000), None);
        assert_eq!(store.byte_array(36), None);
    }
}
