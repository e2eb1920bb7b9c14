use std::{fmt, path::Path};

use image::{
    GrayImage,
    imageops::{self, BiLevel},
};
use log::debug;
use teslerpoint_core::slide::{SLIDE_HEIGHT, SLIDE_ROW_BYTES, SLIDE_SIZE, SLIDE_WIDTH};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideError {
    Dimensions { width: u32, height: u32 },
}

impl fmt::Display for SlideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideError::Dimensions { width, height } => write!(
                f,
                "slide images must be {SLIDE_WIDTH}x{SLIDE_HEIGHT}, not {width}x{height}"
            ),
        }
    }
}

/// Load an image file as a packed slide bitmap.
pub fn load_slide(path: &Path) -> Result<Vec<u8>, AppError> {
    let image = image::open(path)?;
    if image.width() as usize != SLIDE_WIDTH || image.height() as usize != SLIDE_HEIGHT {
        return Err(SlideError::Dimensions {
            width: image.width(),
            height: image.height(),
        }
        .into());
    }
    debug!("Dithering {}", path.display());
    Ok(dither(image.into_luma8()))
}

/// Floyd-Steinberg dither a slide-sized grayscale image down to 1bpp.
///
/// Rows are packed MSB first; a set bit is a black pixel, which is how the
/// Lisa's video memory wants it.
pub fn dither(mut image: GrayImage) -> Vec<u8> {
    debug_assert_eq!(image.dimensions(), (SLIDE_WIDTH as u32, SLIDE_HEIGHT as u32));
    imageops::dither(&mut image, &BiLevel);

    let mut packed = vec![0u8; SLIDE_SIZE];
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[0] == 0 {
            let (x, y) = (x as usize, y as usize);
            packed[y * SLIDE_ROW_BYTES + x / 8] |= 0x80 >> (x % 8);
        }
    }
    packed
}
