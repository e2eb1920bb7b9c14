use std::fmt;

use teslerpoint_core::{container::ContainerError, error::BuildError};

use crate::slide::SlideError;

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Image(image::ImageError),
    Slide(SlideError),
    Build(BuildError),
    Container(ContainerError),
    /// The boundary marker given on the command line isn't valid hex.
    Marker(String),
    /// The base image's header block tag isn't the checksum of its data.
    ChecksumAlgorithm(usize),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "{err}"),
            AppError::Image(err) => write!(f, "couldn't load slide image: {err}"),
            AppError::Slide(err) => write!(f, "{err}"),
            AppError::Build(err) => write!(f, "couldn't lay out slides: {err}"),
            AppError::Container(err) => write!(f, "{err}"),
            AppError::Marker(marker) => write!(f, "boundary marker {marker:?} isn't a hex string"),
            AppError::ChecksumAlgorithm(block) => write!(
                f,
                "header block {block} doesn't carry a word sum checksum; the bootloader uses a different algorithm"
            ),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Image(err)
    }
}

impl From<SlideError> for AppError {
    fn from(err: SlideError) -> Self {
        AppError::Slide(err)
    }
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        AppError::Build(err)
    }
}

impl From<ContainerError> for AppError {
    fn from(err: ContainerError) -> Self {
        AppError::Container(err)
    }
}
