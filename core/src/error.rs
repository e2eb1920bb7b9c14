use core::fmt;

/// Which of the two placeholder sequences in the header block was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// `A5 A5` at data offset 2, replaced by the slide count.
    SlideCount,
    /// `5A 5A 5A` at data offset 4, replaced by the first slide block.
    FirstBlock,
}

/// Everything that can stop a slide deck from being laid out.
///
/// None of these are recoverable: a drive image that doesn't honour the boot
/// program's layout will not boot, so the build must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// No tag ends with the boundary marker; the drive image lacks the boot
    /// loader.
    Layout,
    /// A slide bitmap had the wrong number of bytes.
    Size { expected: usize, actual: usize },
    /// Writing would run past the end of the drive.
    Capacity { required: usize, capacity: usize },
    /// The header block doesn't hold the expected placeholder; the boot
    /// program is an unknown version.
    MagicMismatch(Magic),
    /// The slide count doesn't fit in 16 bits.
    TooManySlides(usize),
    /// The first slide block doesn't fit in 24 bits.
    FirstBlockOutOfRange(usize),
    /// The boundary marker is empty or longer than a tag.
    InvalidMarker,
    /// A slide show needs at least one slide.
    NoSlides,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Layout => write!(
                f,
                "no block tag ends with the boundary marker; was the drive image built with the hard drive bootloader?"
            ),
            BuildError::Size { expected, actual } => {
                write!(f, "slide bitmap is {actual} bytes, expected {expected}")
            }
            BuildError::Capacity { required, capacity } => write!(
                f,
                "drive image needs {required} blocks but only has {capacity}"
            ),
            BuildError::MagicMismatch(Magic::SlideCount) => write!(
                f,
                "boot program bytes 2..4 aren't $A5A5; not sure where to put the presentation length"
            ),
            BuildError::MagicMismatch(Magic::FirstBlock) => write!(
                f,
                "boot program bytes 4..7 aren't $5A5A5A; not sure where to put the presentation's first block"
            ),
            BuildError::TooManySlides(count) => {
                write!(f, "{count} slides is more than the boot program can count")
            }
            BuildError::FirstBlockOutOfRange(block) => {
                write!(f, "first slide block {block} doesn't fit in 24 bits")
            }
            BuildError::InvalidMarker => {
                write!(f, "boundary marker must be between 1 and 20 bytes long")
            }
            BuildError::NoSlides => write!(f, "a slide show needs at least one slide"),
        }
    }
}

impl core::error::Error for BuildError {}
