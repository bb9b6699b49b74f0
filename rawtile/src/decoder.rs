use crate::{
    source::RawBuffer, Elev, FsSource, OutputTile, Remap, TileError, TileRequest, TileSource,
    WordSize,
};
use log::{debug, trace, warn};
use std::{mem::size_of, path::Path};

/// Knobs for [`TileDecoder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Which part of the padded extent lands in the output.
    pub remap: Remap,

    /// Accept files shorter than the padded extent.
    ///
    /// Missing samples decode as `0.0`.
    pub allow_short_read: bool,
}

impl DecodeOptions {
    #[must_use]
    pub fn remap(mut self, remap: Remap) -> Self {
        self.remap = remap;
        self
    }

    #[must_use]
    pub fn allow_short_read(mut self, allow: bool) -> Self {
        self.allow_short_read = allow;
        self
    }
}

/// Decodes raw sample files into caller-owned tiles.
///
/// The decoder holds no per-call state, so one instance may serve any
/// number of requests, from any number of threads when `S` allows.
#[derive(Clone, Debug, Default)]
pub struct TileDecoder<S = FsSource> {
    source: S,
    options: DecodeOptions,
}

impl TileDecoder {
    /// Returns a decoder that reads from the local file system.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: TileSource> TileDecoder<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            options: DecodeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decodes `req` into `out`.
    ///
    /// The request and output length are validated before the file is
    /// touched. On error `out` is left unmodified.
    pub fn decode_into(&self, req: &TileRequest, out: &mut [Elev]) -> Result<(), TileError> {
        let word = WordSize::try_from(req.word_size())?;
        let plan = self.options.remap.plan(req)?;
        let required = plan.output_len();
        if out.len() < required {
            return Err(TileError::OutputLen {
                required,
                actual: out.len(),
            });
        }
        debug!(
            "decoding {:?}: dimensions {:?}, offset {:?}, {:?}",
            req.path(),
            req.dimensions(),
            req.offset(),
            self.options.remap,
        );

        let raw = self.read_raw(req.path(), req.byte_len()?)?;
        let count = raw.len() / word.bytes();
        let mut samples: Vec<Elev> = Vec::new();
        samples
            .try_reserve_exact(count)
            .map_err(|_| TileError::Alloc {
                bytes: count.saturating_mul(size_of::<Elev>()),
            })?;
        samples.extend(
            raw.as_bytes()
                .chunks_exact(word.bytes())
                .map(|src| word.parse_elev(src)),
        );
        plan.apply(&samples, out);
        Ok(())
    }

    /// Decodes `req` into `tile`, which must have been sized for this
    /// request and remap policy.
    pub fn decode_tile(&self, req: &TileRequest, tile: &mut OutputTile) -> Result<(), TileError> {
        self.decode_into(req, tile.values_mut())
    }

    /// Runs the open → read → close sequence for `len` bytes.
    ///
    /// The buffer is only allocated once the source is open and, when
    /// its length is known, long enough.
    #[allow(clippy::cast_possible_truncation)]
    fn read_raw(&self, path: &Path, len: usize) -> Result<RawBuffer, TileError> {
        let mut reader = self.source.open(path).map_err(|source| TileError::Open {
            path: path.to_owned(),
            source,
        })?;
        if let Some(available) = self.source.len_hint(&reader) {
            if available < len as u64 && !self.options.allow_short_read {
                return Err(TileError::ShortRead {
                    path: path.to_owned(),
                    expected: len,
                    actual: available as usize,
                });
            }
        }
        let mut raw = RawBuffer::try_zeroed(len).map_err(|_| TileError::Alloc { bytes: len })?;
        let filled = raw.fill_from(&mut reader).map_err(|source| TileError::Read {
            path: path.to_owned(),
            source,
        })?;
        self.source
            .close(reader)
            .map_err(|source| TileError::Close {
                path: path.to_owned(),
                source,
            })?;
        trace!("read {filled} of {} bytes from {path:?}", raw.len());

        if filled < raw.len() {
            if !self.options.allow_short_read {
                return Err(TileError::ShortRead {
                    path: path.to_owned(),
                    expected: raw.len(),
                    actual: filled,
                });
            }
            warn!(
                "short read from {path:?}: {filled} of {} bytes, zero filling",
                raw.len()
            );
        }
        Ok(raw)
    }
}
