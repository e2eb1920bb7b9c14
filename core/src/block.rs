use alloc::{boxed::Box, vec, vec::Vec};
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout, Unaligned};

pub const TAG_SIZE: usize = 20;
pub const DATA_SIZE: usize = 512;
/// A block as it appears in a tagged raw drive image: tag first, then data.
pub const BLOCK_SIZE: usize = TAG_SIZE + DATA_SIZE;

/// One addressable unit of a Lisa parallel-port hard drive.
#[repr(C)]
#[derive(Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Block {
    pub tag: [u8; TAG_SIZE],
    pub data: [u8; DATA_SIZE],
}

const _: () = assert!(core::mem::size_of::<Block>() == BLOCK_SIZE);

impl Block {
    pub fn zeroed() -> Self {
        Self::new_zeroed()
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Block")
            .field("tag", &self.tag)
            .field("data", &&self.data[..16])
            .finish_non_exhaustive()
    }
}

/// Fixed-capacity sequence of blocks making up a whole drive.
///
/// Blocks are only ever overwritten in place; the capacity chosen at
/// construction never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStore {
    blocks: Box<[Block]>,
}

impl BlockStore {
    /// A drive of `capacity` blocks, all tags and data zeroed.
    pub fn new(capacity: usize) -> Self {
        BlockStore {
            blocks: vec![Block::zeroed(); capacity].into_boxed_slice(),
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        BlockStore {
            blocks: blocks.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn tags(&self) -> impl Iterator<Item = &[u8; TAG_SIZE]> + '_ {
        self.blocks.iter().map(|block| &block.tag)
    }
}
