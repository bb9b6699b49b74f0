use crate::{Remap, TileError, WordSize};
use std::path::{Path, PathBuf};

/// Describes one tile to pull out of a raw sample file.
///
/// The file is read over a padded extent of `dx + x_offset` columns by
/// `dy + y_offset` rows. Derived sizes are recomputed on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRequest {
    path: PathBuf,
    dx: usize,
    dy: usize,
    x_offset: usize,
    y_offset: usize,
    word_size: usize,
}

impl TileRequest {
    /// Returns a request for a `dx × dy` tile of 16-bit samples with
    /// no padding.
    pub fn new<P: Into<PathBuf>>(path: P, (dx, dy): (usize, usize)) -> Self {
        Self {
            path: path.into(),
            dx,
            dy,
            x_offset: 0,
            y_offset: 0,
            word_size: WordSize::Two.bytes(),
        }
    }

    #[must_use]
    pub fn with_offset(mut self, (x_offset, y_offset): (usize, usize)) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Sets the on-disk sample width in bytes.
    ///
    /// Any value is accepted here; unsupported widths are rejected
    /// when the request is decoded.
    #[must_use]
    pub fn with_word_size(mut self, word_size: usize) -> Self {
        self.word_size = word_size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the requested (dx, dy) tile dimensions.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.dx, self.dy)
    }

    /// Returns the (x, y) padding offsets.
    pub fn offset(&self) -> (usize, usize) {
        (self.x_offset, self.y_offset)
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    /// Returns the padded (columns, rows) extent read from the file.
    pub fn padded_extent(&self) -> Result<(usize, usize), TileError> {
        if self.dx == 0 || self.dy == 0 {
            return Err(TileError::EmptyTile {
                dx: self.dx,
                dy: self.dy,
            });
        }
        let cols = self
            .dx
            .checked_add(self.x_offset)
            .ok_or(TileError::ExtentOverflow)?;
        let rows = self
            .dy
            .checked_add(self.y_offset)
            .ok_or(TileError::ExtentOverflow)?;
        Ok((cols, rows))
    }

    /// Returns the number of samples in the padded extent.
    pub fn sample_count(&self) -> Result<usize, TileError> {
        let (cols, rows) = self.padded_extent()?;
        cols.checked_mul(rows).ok_or(TileError::ExtentOverflow)
    }

    /// Returns the number of bytes read from the file.
    pub fn byte_len(&self) -> Result<usize, TileError> {
        self.sample_count()?
            .checked_mul(self.word_size)
            .ok_or(TileError::ExtentOverflow)
    }

    /// Returns the minimum output length for `remap`.
    pub fn output_len(&self, remap: Remap) -> Result<usize, TileError> {
        remap.plan(self).map(|plan| plan.output_len())
    }

    /// Returns the output length needed by [`Remap::Padded`], which
    /// exceeds `dx * dy` whenever an offset is non-zero.
    pub fn padded_output_len(&self) -> Result<usize, TileError> {
        self.output_len(Remap::Padded)
    }
}
