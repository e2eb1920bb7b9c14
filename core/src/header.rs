use log::{debug, info};

use crate::{
    block::BlockStore,
    checksum::Checksum,
    error::{BuildError, Magic},
    protocol::{FIRST_BLOCK_MAGIC, FIRST_BLOCK_OFFSET, Protocol, SLIDE_COUNT_MAGIC, SLIDE_COUNT_OFFSET},
};

/// Largest block index the boot program can address.
pub const MAX_FIRST_BLOCK: usize = 0x00FF_FFFF;

const SLIDE_COUNT: core::ops::Range<usize> = SLIDE_COUNT_OFFSET..SLIDE_COUNT_OFFSET + 2;
const FIRST_BLOCK: core::ops::Range<usize> = FIRST_BLOCK_OFFSET..FIRST_BLOCK_OFFSET + 3;

/// Slide show parameters as the boot program will read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    pub num_slides: u16,
    pub first_block: u32,
}

/// Write the slide count and the first slide block into the boot program's
/// header, then fix up that block's checksum.
///
/// Both placeholders are checked before anything is written, so a failure
/// leaves the block untouched.
pub fn patch_header(
    store: &mut BlockStore,
    protocol: &Protocol,
    checksum: &impl Checksum,
    num_slides: usize,
    first_block: usize,
) -> Result<(), BuildError> {
    let count = u16::try_from(num_slides).map_err(|_| BuildError::TooManySlides(num_slides))?;
    if first_block > MAX_FIRST_BLOCK {
        return Err(BuildError::FirstBlockOutOfRange(first_block));
    }
    check_header(store, protocol)?;
    let capacity = store.len();
    let block = store
        .block_mut(protocol.header_block)
        .ok_or(BuildError::Capacity {
            required: protocol.header_block + 1,
            capacity,
        })?;

    block.data[SLIDE_COUNT].copy_from_slice(&count.to_be_bytes());
    block.data[FIRST_BLOCK].copy_from_slice(&(first_block as u32).to_be_bytes()[1..]);
    let sum = checksum.checksum(&block.data);
    block.tag[..2].copy_from_slice(&sum);
    debug!("Header block checksum now {:02X}{:02X}", sum[0], sum[1]);

    info!(
        "Patched header block {}: {count} slides starting at block {first_block}",
        protocol.header_block
    );
    Ok(())
}

/// Make sure the header block exists and still holds both placeholders.
pub fn check_header(store: &BlockStore, protocol: &Protocol) -> Result<(), BuildError> {
    let block = store
        .block(protocol.header_block)
        .ok_or(BuildError::Capacity {
            required: protocol.header_block + 1,
            capacity: store.len(),
        })?;
    if block.data[SLIDE_COUNT] != SLIDE_COUNT_MAGIC {
        return Err(BuildError::MagicMismatch(Magic::SlideCount));
    }
    if block.data[FIRST_BLOCK] != FIRST_BLOCK_MAGIC {
        return Err(BuildError::MagicMismatch(Magic::FirstBlock));
    }
    Ok(())
}

/// Read back the parameters from a patched header block.
pub fn read_header(store: &BlockStore, protocol: &Protocol) -> Option<HeaderFields> {
    let data = &store.block(protocol.header_block)?.data;
    let num_slides = u16::from_be_bytes([data[SLIDE_COUNT_OFFSET], data[SLIDE_COUNT_OFFSET + 1]]);
    let mut first_block = [0u8; 4];
    first_block[1..].copy_from_slice(&data[FIRST_BLOCK]);
    Some(HeaderFields {
        num_slides,
        first_block: u32::from_be_bytes(first_block),
    })
}
