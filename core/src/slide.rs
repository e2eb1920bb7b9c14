use alloc::vec::Vec;
use core::ops::Range;
use log::debug;

use crate::{
    block::{BLOCK_SIZE, BlockStore, DATA_SIZE, TAG_SIZE},
    error::BuildError,
    layout::locate_first_free_block,
    protocol::Protocol,
};

pub const SLIDE_WIDTH: usize = 720;
pub const SLIDE_HEIGHT: usize = 364;
pub const SLIDE_ROW_BYTES: usize = SLIDE_WIDTH / 8;
/// Size of one packed 1bpp slide, rows byte-aligned.
pub const SLIDE_SIZE: usize = SLIDE_ROW_BYTES * SLIDE_HEIGHT;
/// A slide is cut into 532-byte chunks, one per block; the last one is short.
pub const BLOCKS_PER_SLIDE: usize = SLIDE_SIZE.div_ceil(BLOCK_SIZE);

const _: () = assert!(SLIDE_WIDTH % 8 == 0);
const _: () = assert!(SLIDE_SIZE == 32_760);
const _: () = assert!(BLOCKS_PER_SLIDE == 62);
// The final chunk still has to fill a whole tag.
const _: () = assert!(SLIDE_SIZE % BLOCK_SIZE >= TAG_SIZE);

/// Data bytes in the last block of a slide that carry bitmap, not padding.
pub const LAST_BLOCK_DATA_LEN: usize = SLIDE_SIZE % BLOCK_SIZE - TAG_SIZE;
const _: () = assert!(LAST_BLOCK_DATA_LEN == 288 && LAST_BLOCK_DATA_LEN < DATA_SIZE);

/// Blocks that hold slide `index`, checked against the store's capacity.
pub fn slide_blocks(
    store: &BlockStore,
    protocol: &Protocol,
    index: usize,
) -> Result<Range<usize>, BuildError> {
    let first_free = locate_first_free_block(store.tags(), &protocol.boundary_marker)?;
    let overflow = BuildError::Capacity {
        required: usize::MAX,
        capacity: store.len(),
    };
    let start = index
        .checked_mul(BLOCKS_PER_SLIDE)
        .and_then(|offset| offset.checked_add(first_free))
        .ok_or(overflow)?;
    let end = start.checked_add(BLOCKS_PER_SLIDE).ok_or(overflow)?;
    if end > store.len() {
        return Err(BuildError::Capacity {
            required: end,
            capacity: store.len(),
        });
    }
    Ok(start..end)
}

/// Write a packed slide bitmap into the blocks reserved for slide `index`.
///
/// Every 532-byte chunk of the bitmap becomes one block, its first 20 bytes
/// going into the tag. The last chunk is zero padded. Nothing is written
/// unless the whole slide fits.
pub fn place_slide(
    store: &mut BlockStore,
    protocol: &Protocol,
    index: usize,
    bitmap: &[u8],
) -> Result<Range<usize>, BuildError> {
    if bitmap.len() != SLIDE_SIZE {
        return Err(BuildError::Size {
            expected: SLIDE_SIZE,
            actual: bitmap.len(),
        });
    }
    let range = slide_blocks(store, protocol, index)?;
    debug!("Placing slide {index} in blocks {}..{}", range.start, range.end);

    let blocks = &mut store.blocks_mut()[range.clone()];
    for (block, chunk) in blocks.iter_mut().zip(bitmap.chunks(BLOCK_SIZE)) {
        let (tag, data) = chunk.split_at(TAG_SIZE);
        block.tag.copy_from_slice(tag);
        block.data[..data.len()].copy_from_slice(data);
        block.data[data.len()..].fill(0);
    }
    Ok(range)
}

/// Reassemble the bitmap of an already placed slide.
pub fn read_slide(
    store: &BlockStore,
    protocol: &Protocol,
    index: usize,
) -> Result<Vec<u8>, BuildError> {
    let range = slide_blocks(store, protocol, index)?;
    let mut bitmap = Vec::with_capacity(BLOCKS_PER_SLIDE * BLOCK_SIZE);
    for block in &store.blocks()[range] {
        bitmap.extend_from_slice(&block.tag);
        bitmap.extend_from_slice(&block.data);
    }
    bitmap.truncate(SLIDE_SIZE);
    Ok(bitmap)
}
