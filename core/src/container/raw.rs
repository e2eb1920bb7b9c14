//! Tagged raw drive images: every block stored as its 20-byte tag followed by
//! its 512 bytes of data, in block order.

use alloc::vec::Vec;
use embedded_io::{Read, Write};
use log::info;
use zerocopy::IntoBytes;

use super::ContainerError;
use crate::block::{BLOCK_SIZE, Block, BlockStore};

/// Read a tagged raw image of `size` bytes.
pub fn read<R: Read>(reader: &mut R, size: usize) -> Result<BlockStore, ContainerError> {
    if size == 0 || size % BLOCK_SIZE != 0 {
        return Err(ContainerError::InvalidData);
    }
    let count = size / BLOCK_SIZE;
    let mut blocks = Vec::with_capacity(count);
    for _ in 0..count {
        let mut block = Block::zeroed();
        reader
            .read_exact(block.as_mut_bytes())
            .map_err(ContainerError::from_read_exact_error)?;
        blocks.push(block);
    }
    info!("Read tagged raw image of {count} blocks");
    Ok(BlockStore::from_blocks(blocks))
}

pub fn write<W: Write>(writer: &mut W, store: &BlockStore) -> Result<(), ContainerError> {
    if store.is_empty() {
        return Err(ContainerError::InvalidData);
    }
    for block in store.blocks() {
        writer
            .write_all(block.as_bytes())
            .map_err(ContainerError::from_io_error)?;
    }
    writer.flush().map_err(ContainerError::from_io_error)?;
    info!("Wrote tagged raw image of {} blocks", store.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn round_trip() {
        let mut store = BlockStore::new(3);
        store.block_mut(1).unwrap().tag[0] = 0xAB;
        store.block_mut(2).unwrap().data[511] = 0xCD;

        let mut out = Vec::new();
        write(&mut out, &store).unwrap();
        assert_eq!(out.len(), 3 * BLOCK_SIZE);
        assert_eq!(out[BLOCK_SIZE], 0xAB);
        assert_eq!(out[3 * BLOCK_SIZE - 1], 0xCD);

        let mut input = &out[..];
        assert_eq!(read(&mut input, out.len()).unwrap(), store);
    }

    #[test]
    fn empty_drive_is_not_written() {
        let mut out = Vec::new();
        assert_eq!(write(&mut out, &BlockStore::new(0)), Err(ContainerError::InvalidData));
        assert!(out.is_empty());
    }

    #[test]
    fn partial_block_is_invalid() {
        let data = vec![0u8; BLOCK_SIZE + 1];
        let mut input = &data[..];
        assert_eq!(read(&mut input, data.len()), Err(ContainerError::InvalidData));
    }

    #[test]
    fn short_stream_is_invalid() {
        let data = vec![0u8; BLOCK_SIZE];
        let mut input = &data[..];
        assert_eq!(
            read(&mut input, 2 * BLOCK_SIZE),
            Err(ContainerError::InvalidData)
        );
    }
}
