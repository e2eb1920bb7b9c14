use log::trace;

use crate::{block::TAG_SIZE, error::BuildError};

/// Index of the first block after the boot loader and boot program.
///
/// The bootloader marks the tag of the last block it loads; everything after
/// it is free for slides. A plain linear scan: the marker is almost always
/// within the first few blocks.
pub fn locate_first_free_block<'a, I>(tags: I, marker: &[u8]) -> Result<usize, BuildError>
where
    I: IntoIterator<Item = &'a [u8; TAG_SIZE]>,
{
    if marker.is_empty() {
        return Err(BuildError::InvalidMarker);
    }
    let last_boot_block = tags
        .into_iter()
        .position(|tag| tag.ends_with(marker))
        .ok_or(BuildError::Layout)?;
    trace!("Boundary marker found in block {last_boot_block}");
    Ok(last_boot_block + 1)
}
