use log::{debug, info};

use crate::{
    block::BlockStore,
    checksum::Checksum,
    error::BuildError,
    header::{MAX_FIRST_BLOCK, check_header, patch_header},
    layout::locate_first_free_block,
    protocol::Protocol,
    slide::{BLOCKS_PER_SLIDE, SLIDE_SIZE, place_slide, slide_blocks},
};

/// Where a finished slide show ended up on the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckSummary {
    pub num_slides: usize,
    /// First block of slide 0.
    pub first_block: usize,
    /// One past the last block of the last slide.
    pub end_block: usize,
}

/// Lay out `slides` in order after the boot program and point the boot
/// program's header at them.
///
/// Everything that could fail is checked before the first slide is written,
/// so an error leaves the store as it was.
pub fn build_deck<S: AsRef<[u8]>>(
    store: &mut BlockStore,
    protocol: &Protocol,
    checksum: &impl Checksum,
    slides: &[S],
) -> Result<DeckSummary, BuildError> {
    let Some(last) = slides.len().checked_sub(1) else {
        return Err(BuildError::NoSlides);
    };
    let mut sizes = slides.iter().map(|slide| slide.as_ref().len());
    if let Some(actual) = sizes.find(|&len| len != SLIDE_SIZE) {
        return Err(BuildError::Size {
            expected: SLIDE_SIZE,
            actual,
        });
    }
    if slides.len() > u16::MAX as usize {
        return Err(BuildError::TooManySlides(slides.len()));
    }
    let first_block = locate_first_free_block(store.tags(), &protocol.boundary_marker)?;
    if first_block > MAX_FIRST_BLOCK {
        return Err(BuildError::FirstBlockOutOfRange(first_block));
    }
    let end_block = slide_blocks(store, protocol, last)?.end;
    check_header(store, protocol)?;

    for (index, slide) in slides.iter().enumerate() {
        place_slide(store, protocol, index, slide.as_ref())?;
    }
    debug!("Placed {} slides", slides.len());

    patch_header(store, protocol, checksum, slides.len(), first_block)?;

    info!(
        "Slide show of {} slides occupies blocks {first_block}..{end_block} of {}",
        slides.len(),
        store.len()
    );
    debug_assert_eq!(end_block - first_block, slides.len() * BLOCKS_PER_SLIDE);
    Ok(DeckSummary {
        num_slides: slides.len(),
        first_block,
        end_block,
    })
}
