use crate::block::DATA_SIZE;

/// Integrity check stored in the first two tag bytes of a block.
///
/// The bootloader decides the algorithm, so it's supplied by whoever built the
/// drive image. Any `Fn(&[u8; DATA_SIZE]) -> [u8; 2]` will do.
pub trait Checksum {
    fn checksum(&self, data: &[u8; DATA_SIZE]) -> [u8; 2];

    /// Whether `tag` already carries the checksum of `data`.
    fn matches(&self, tag: &[u8], data: &[u8; DATA_SIZE]) -> bool {
        tag.get(..2) == Some(&self.checksum(data)[..])
    }
}

impl<F> Checksum for F
where
    F: Fn(&[u8; DATA_SIZE]) -> [u8; 2],
{
    fn checksum(&self, data: &[u8; DATA_SIZE]) -> [u8; 2] {
        self(data)
    }
}

/// Wrapping sum of the data's big-endian 16-bit words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordSum;

impl Checksum for WordSum {
    fn checksum(&self, data: &[u8; DATA_SIZE]) -> [u8; 2] {
        data.chunks_exact(2)
            .map(|word| u16::from_be_bytes([word[0], word[1]]))
            .fold(0u16, u16::wrapping_add)
            .to_be_bytes()
    }
}
