use crate::{
    block::TAG_SIZE,
    error::BuildError,
};

/// Block holding the head of the boot program, where the slide show
/// parameters get patched in.
pub const DEFAULT_HEADER_BLOCK: usize = 2;

pub const SLIDE_COUNT_OFFSET: usize = 2;
pub const SLIDE_COUNT_MAGIC: [u8; 2] = [0xA5, 0xA5];

pub const FIRST_BLOCK_OFFSET: usize = 4;
pub const FIRST_BLOCK_MAGIC: [u8; 3] = [0x5A, 0x5A, 0x5A];

/// Constants shared with the bootloader and the boot program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    pub header_block: usize,
    pub boundary_marker: heapless::Vec<u8, TAG_SIZE>,
}

impl Protocol {
    pub fn new(boundary_marker: &[u8]) -> Result<Self, BuildError> {
        if boundary_marker.is_empty() {
            return Err(BuildError::InvalidMarker);
        }
        let boundary_marker =
            heapless::Vec::from_slice(boundary_marker).map_err(|_| BuildError::InvalidMarker)?;
        Ok(Protocol {
            header_block: DEFAULT_HEADER_BLOCK,
            boundary_marker,
        })
    }

    pub fn with_header_block(mut self, header_block: usize) -> Self {
        self.header_block = header_block;
        self
    }
}
