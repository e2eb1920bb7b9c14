use core::{fmt, str::FromStr};

pub mod dc42;
pub mod raw;

/// Error type for reading and writing drive image files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    IoError(embedded_io::ErrorKind),
    InvalidSignature,
    InvalidData,
    ChecksumMismatch,
}

impl ContainerError {
    pub(crate) fn from_io_error(error: impl embedded_io::Error) -> Self {
        ContainerError::IoError(error.kind())
    }

    pub(crate) fn from_read_exact_error<E: embedded_io::Error>(
        error: embedded_io::ReadExactError<E>,
    ) -> Self {
        match error {
            embedded_io::ReadExactError::UnexpectedEof => ContainerError::InvalidData,
            embedded_io::ReadExactError::Other(e) => ContainerError::from_io_error(e),
        }
    }
}

impl embedded_io::Error for ContainerError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            ContainerError::IoError(kind) => *kind,
            ContainerError::InvalidSignature
            | ContainerError::InvalidData
            | ContainerError::ChecksumMismatch => embedded_io::ErrorKind::InvalidData,
        }
    }
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::IoError(kind) => write!(f, "I/O error: {kind:?}"),
            ContainerError::InvalidSignature => write!(f, "not a drive image of the expected format"),
            ContainerError::InvalidData => write!(f, "drive image is truncated or malformed"),
            ContainerError::ChecksumMismatch => write!(f, "drive image checksum doesn't match its contents"),
        }
    }
}

impl core::error::Error for ContainerError {}

/// Drive image file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Disk Copy 4.2, as used by LisaEm.
    #[default]
    Dc42,
    /// Sequential 532-byte blocks, tag first, as used by Cameo/Aphid and IDLE.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat;

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of: dc42, raw")
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dc42") {
            Ok(Format::Dc42)
        } else if s.eq_ignore_ascii_case("raw") {
            Ok(Format::Raw)
        } else {
            Err(UnknownFormat)
        }
    }
}
