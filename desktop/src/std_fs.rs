use std::{fs, io, path::Path};

use embedded_io::ErrorType;
use log::info;

/// Bridges a `std::io` reader or writer to `embedded-io`, which the core
/// container codecs are written against.
pub struct StdIo<T> {
    inner: T,
}

impl<T> StdIo<T> {
    pub fn new(inner: T) -> Self {
        StdIo { inner }
    }
}

impl<T> ErrorType for StdIo<T> {
    type Error = io::Error;
}

impl<T: io::Read> embedded_io::Read for StdIo<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: io::Write> embedded_io::Write for StdIo<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Open `path` for buffered reading, returning it with its size in bytes.
pub fn open_read(path: &Path) -> io::Result<(StdIo<io::BufReader<fs::File>>, usize)> {
    let file = fs::File::open(path)?;
    let size = file.metadata()?.len() as usize;
    info!("Opened {} ({size} bytes)", path.display());
    Ok((StdIo::new(io::BufReader::new(file)), size))
}

/// Create `path` for buffered writing. An existing file is never overwritten.
pub fn create_new(path: &Path) -> io::Result<StdIo<io::BufWriter<fs::File>>> {
    let file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    Ok(StdIo::new(io::BufWriter::new(file)))
}
