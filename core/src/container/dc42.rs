//! Disk Copy 4.2 drive images.
//!
//! An 84-byte big-endian header is followed by the data of every block, then
//! the tags of every block.

use alloc::vec::Vec;
use embedded_io::{Read, Write};
use log::{debug, info};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::big_endian::{U16, U32},
};

use super::ContainerError;
use crate::block::{Block, BlockStore, DATA_SIZE, TAG_SIZE};

const PRIVATE: u16 = 0x0100;
const NAME_MAX: usize = 63;
/// The first block's leading tag bytes aren't covered by the tag checksum.
const TAG_CHECKSUM_SKIP: usize = 12;
/// A 10 MB ProFile's worth of blocks.
const PREALLOCATE_MAX: usize = 19_456;

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
struct Dc42Header {
    /// Pascal string: length byte, then up to 63 characters.
    name: [u8; NAME_MAX + 1],
    data_size: U32,
    tag_size: U32,
    data_checksum: U32,
    tag_checksum: U32,
    disk_format: u8,
    format_byte: u8,
    private: U16,
}

const _: () = assert!(core::mem::size_of::<Dc42Header>() == 84);

/// Header fields that don't describe the blocks themselves, kept so a
/// rewritten image looks like the one it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dc42Info {
    pub name: heapless::Vec<u8, NAME_MAX>,
    pub disk_format: u8,
    pub format_byte: u8,
}

impl Default for Dc42Info {
    fn default() -> Self {
        Dc42Info {
            name: heapless::Vec::from_slice(b"-not a Macintosh disk-").unwrap_or_default(),
            disk_format: 0,
            format_byte: 0,
        }
    }
}

/// Running Disk Copy checksum: add each big-endian word, rotate right by one.
#[derive(Debug, Default, Clone, Copy)]
struct Dc42Sum(u32);

impl Dc42Sum {
    fn update(&mut self, bytes: &[u8]) {
        for word in bytes.chunks_exact(2) {
            let word = u16::from_be_bytes([word[0], word[1]]) as u32;
            self.0 = self.0.wrapping_add(word).rotate_right(1);
        }
    }
}

/// Data and tag checksums of a whole drive.
pub fn checksums(store: &BlockStore) -> (u32, u32) {
    let mut data = Dc42Sum::default();
    let mut tags = Dc42Sum::default();
    for (index, block) in store.blocks().iter().enumerate() {
        data.update(&block.data);
        let skip = if index == 0 { TAG_CHECKSUM_SKIP } else { 0 };
        tags.update(&block.tag[skip..]);
    }
    (data.0, tags.0)
}

pub fn read<R: Read>(reader: &mut R) -> Result<(BlockStore, Dc42Info), ContainerError> {
    let mut header_bytes = [0u8; core::mem::size_of::<Dc42Header>()];
    reader
        .read_exact(&mut header_bytes)
        .map_err(ContainerError::from_read_exact_error)?;
    let header =
        Dc42Header::read_from_bytes(&header_bytes).map_err(|_| ContainerError::InvalidData)?;

    let name_len = header.name[0] as usize;
    if header.private.get() != PRIVATE || name_len > NAME_MAX {
        return Err(ContainerError::InvalidSignature);
    }
    let data_size = header.data_size.get() as usize;
    let tag_size = header.tag_size.get() as usize;
    if data_size == 0 || data_size % DATA_SIZE != 0 {
        return Err(ContainerError::InvalidData);
    }
    let count = data_size / DATA_SIZE;
    if tag_size != 0 && tag_size != count * TAG_SIZE {
        return Err(ContainerError::InvalidData);
    }
    debug!("Disk Copy 4.2 image: {count} blocks, {tag_size} bytes of tags");

    // The header's sizes aren't trusted until the data is actually there.
    let mut blocks = Vec::with_capacity(count.min(PREALLOCATE_MAX));
    for _ in 0..count {
        let mut block = Block::zeroed();
        reader
            .read_exact(&mut block.data)
            .map_err(ContainerError::from_read_exact_error)?;
        blocks.push(block);
    }
    if tag_size != 0 {
        for block in blocks.iter_mut() {
            reader
                .read_exact(&mut block.tag)
                .map_err(ContainerError::from_read_exact_error)?;
        }
    }
    let store = BlockStore::from_blocks(blocks);

    let (data_checksum, tag_checksum) = checksums(&store);
    if data_checksum != header.data_checksum.get() || tag_checksum != header.tag_checksum.get() {
        return Err(ContainerError::ChecksumMismatch);
    }

    let name = heapless::Vec::from_slice(&header.name[1..=name_len])
        .map_err(|_| ContainerError::InvalidData)?;
    info!("Read Disk Copy 4.2 image of {count} blocks");
    Ok((
        store,
        Dc42Info {
            name,
            disk_format: header.disk_format,
            format_byte: header.format_byte,
        },
    ))
}

pub fn write<W: Write>(
    writer: &mut W,
    store: &BlockStore,
    info: &Dc42Info,
) -> Result<(), ContainerError> {
    if store.is_empty() {
        return Err(ContainerError::InvalidData);
    }
    let (data_checksum, tag_checksum) = checksums(store);
    let mut name = [0u8; NAME_MAX + 1];
    name[0] = info.name.len() as u8;
    name[1..=info.name.len()].copy_from_slice(&info.name);
    let header = Dc42Header {
        name,
        data_size: U32::new((store.len() * DATA_SIZE) as u32),
        tag_size: U32::new((store.len() * TAG_SIZE) as u32),
        data_checksum: U32::new(data_checksum),
        tag_checksum: U32::new(tag_checksum),
        disk_format: info.disk_format,
        format_byte: info.format_byte,
        private: U16::new(PRIVATE),
    };

    writer
        .write_all(header.as_bytes())
        .map_err(ContainerError::from_io_error)?;
    for block in store.blocks() {
        writer
            .write_all(&block.data)
            .map_err(ContainerError::from_io_error)?;
    }
    for block in store.blocks() {
        writer
            .write_all(&block.tag)
            .map_err(ContainerError::from_io_error)?;
    }
    writer.flush().map_err(ContainerError::from_io_error)?;
    info!("Wrote Disk Copy 4.2 image of {} blocks", store.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_SIZE: usize = 84;

    fn sample_store() -> BlockStore {
        let mut store = BlockStore::new(3);
        store.block_mut(0).unwrap().tag[..4].copy_from_slice(b"BOOT");
        store.block_mut(1).unwrap().data[100] = 0x42;
        store.block_mut(2).unwrap().tag[19] = 0xFF;
        store
    }

    #[test]
    fn checksum_rotates_every_word() {
        let mut store = BlockStore::new(1);
        store.block_mut(0).unwrap().data[1] = 0x01;
        // 256 words, 256 rotations: the lone 1 comes back around.
        assert_eq!(checksums(&store), (1, 0));
    }

    #[test]
    fn tag_checksum_skips_first_twelve_bytes() {
        let mut store = BlockStore::new(2);
        store.block_mut(0).unwrap().tag[..TAG_CHECKSUM_SKIP].fill(0xFF);
        assert_eq!(checksums(&store).1, 0);
        store.block_mut(0).unwrap().tag[TAG_CHECKSUM_SKIP] = 0x01;
        assert_ne!(checksums(&store).1, 0);
    }

    #[test]
    fn round_trip_keeps_info() {
        let store = sample_store();
        let mut info = Dc42Info::default();
        info.name.clear();
        info.name.extend_from_slice(b"Slides").unwrap();
        info.disk_format = 2;
        info.format_byte = 0x24;

        let mut out = Vec::new();
        write(&mut out, &store, &info).unwrap();
        assert_eq!(out.len(), HEADER_SIZE + 3 * (DATA_SIZE + TAG_SIZE));
        assert_eq!(&out[..7], b"\x06Slides");
        assert_eq!(&out[82..84], &[0x01, 0x00]);
        assert_eq!(out[HEADER_SIZE + DATA_SIZE + 100], 0x42);
        assert_eq!(&out[HEADER_SIZE + 3 * DATA_SIZE..][..4], b"BOOT");

        let mut input = &out[..];
        let (read_store, read_info) = read(&mut input).unwrap();
        assert_eq!(read_store, store);
        assert_eq!(read_info, info);
    }

    #[test]
    fn corrupted_data_is_detected() {
        let mut out = Vec::new();
        write(&mut out, &sample_store(), &Dc42Info::default()).unwrap();
        out[HEADER_SIZE + 5] ^= 0x10;
        let mut input = &out[..];
        assert_eq!(read(&mut input), Err(ContainerError::ChecksumMismatch));
    }

    #[test]
    fn corrupted_tags_are_detected() {
        let mut out = Vec::new();
        write(&mut out, &sample_store(), &Dc42Info::default()).unwrap();
        let last = out.len() - 1;
        out[last] ^= 0x01;
        let mut input = &out[..];
        assert_eq!(read(&mut input), Err(ContainerError::ChecksumMismatch));
    }

    #[test]
    fn wrong_private_word_is_rejected() {
        let mut out = Vec::new();
        write(&mut out, &sample_store(), &Dc42Info::default()).unwrap();
        out[82] = 0x00;
        let mut input = &out[..];
        assert_eq!(read(&mut input), Err(ContainerError::InvalidSignature));
    }

    #[test]
    fn oversized_header_fails_on_missing_data() {
        let mut out = Vec::new();
        write(&mut out, &sample_store(), &Dc42Info::default()).unwrap();
        // Claim 0xFFFFFE00 bytes of data, far more than follows.
        out[64..68].copy_from_slice(&[0xFF, 0xFF, 0xFE, 0x00]);
        out[68..72].copy_from_slice(&[0, 0, 0, 0]);
        let mut input = &out[..];
        assert_eq!(read(&mut input), Err(ContainerError::InvalidData));
    }

    #[test]
    fn empty_drive_is_not_written() {
        let mut out = Vec::new();
        assert_eq!(
            write(&mut out, &BlockStore::new(0), &Dc42Info::default()),
            Err(ContainerError::InvalidData)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn truncated_image_is_invalid() {
        let mut out = Vec::new();
        write(&mut out, &sample_store(), &Dc42Info::default()).unwrap();
        out.truncate(out.len() - 10);
        let mut input = &out[..];
        assert_eq!(read(&mut input), Err(ContainerError::InvalidData));
    }
}
