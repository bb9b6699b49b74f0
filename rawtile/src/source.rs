use std::{
    collections::TryReserveError,
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Where tile bytes come from.
///
/// The decoder opens a reader, reads the padded extent in one pass,
/// then hands the reader back to [`TileSource::close`]. A failure at
/// any of the three steps fails the decode.
pub trait TileSource {
    type Reader: Read;

    fn open(&self, path: &Path) -> io::Result<Self::Reader>;

    /// Returns how many bytes `reader` can deliver, if known up front.
    ///
    /// Lets the decoder reject a short source before allocating the
    /// raw buffer.
    fn len_hint(&self, _reader: &Self::Reader) -> Option<u64> {
        None
    }

    fn close(&self, reader: Self::Reader) -> io::Result<()>;
}

/// Reads tiles from the local file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl TileSource for FsSource {
    type Reader = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn len_hint(&self, file: &File) -> Option<u64> {
        file.metadata().ok().map(|m| m.len())
    }

    #[cfg(unix)]
    fn close(&self, file: File) -> io::Result<()> {
        use std::os::fd::IntoRawFd;
        // Dropping a File discards close(2) errors.
        nix::unistd::close(file.into_raw_fd()).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn close(&self, file: File) -> io::Result<()> {
        drop(file);
        Ok(())
    }
}

/// Serves the same in-memory bytes for every path.
///
/// Useful when the tile file has already been fetched or mapped by
/// the caller.
#[derive(Clone, Copy, Debug)]
pub struct MemSource<'a>(pub &'a [u8]);

impl<'a> TileSource for MemSource<'a> {
    type Reader = &'a [u8];

    fn open(&self, _path: &Path) -> io::Result<&'a [u8]> {
        Ok(self.0)
    }

    fn len_hint(&self, reader: &&'a [u8]) -> Option<u64> {
        u64::try_from(reader.len()).ok()
    }

    fn close(&self, _reader: &'a [u8]) -> io::Result<()> {
        Ok(())
    }
}

/// Raw bytes of one decode call.
///
/// Owned by the decode stack frame and released when it goes out of
/// scope, whichever way the call exits.
pub(crate) struct RawBuffer {
    bytes: Vec<u8>,
    filled: usize,
}

impl RawBuffer {
    /// Allocates `len` zeroed bytes, failing instead of aborting when
    /// the allocator refuses. Any tail left unfilled by a short read
    /// decodes as zero samples.
    pub(crate) fn try_zeroed(len: usize) -> Result<Self, TryReserveError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len)?;
        bytes.resize(len, 0);
        Ok(Self { bytes, filled: 0 })
    }

    /// Reads from `src` until the buffer is full or `src` reports EOF,
    /// returning the number of bytes now filled.
    pub(crate) fn fill_from(&mut self, src: &mut impl Read) -> io::Result<usize> {
        while self.filled < self.bytes.len() {
            match src.read(&mut self.bytes[self.filled..]) {
                Ok(0) => break,
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(self.filled)
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
