//! Reordering of file-order samples into the caller's layout.
//!
//! The file is row-major with a row stride of `dx + x_offset`. The
//! caller addresses its output as a column-major `tile(dx, dy)`, so
//! output index `i * dx + j` receives sample `stride * j + i`.

use crate::{Elev, TileError, TileRequest};
use itertools::iproduct;

/// Which part of the padded extent is written to the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Remap {
    /// Write exactly `dx × dy` values. The offset region is read from
    /// the file but never lands in the output.
    #[default]
    Cropped,

    /// Walk the whole padded extent, writing up to
    /// [`TileRequest::padded_output_len`] values. This matches tools
    /// that expect the padding to spill past `dx * dy`.
    Padded,
}

impl Remap {
    /// Validates `req` against this policy and returns the index
    /// mapping to apply.
    pub(crate) fn plan(self, req: &TileRequest) -> Result<Transpose, TileError> {
        let (stride, rows) = req.padded_extent()?;
        let (dx, dy) = req.dimensions();
        let len = req.sample_count()?;
        let (cols, rows) = match self {
            Self::Cropped => (dx, dy),
            Self::Padded => (stride, rows),
        };
        let plan = Transpose {
            dx,
            stride,
            cols,
            rows,
        };
        // The largest source and destination indices are both reached
        // at the last (i, j).
        let index = (cols - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(rows - 1))
            .ok_or(TileError::ExtentOverflow)?;
        if index >= len {
            return Err(TileError::TransposeOutOfRange { index, len });
        }
        (rows - 1)
            .checked_mul(dx)
            .and_then(|n| n.checked_add(cols))
            .ok_or(TileError::ExtentOverflow)?;
        Ok(plan)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transpose {
    dx: usize,
    stride: usize,
    /// Exclusive bound on `j`.
    cols: usize,
    /// Exclusive bound on `i`.
    rows: usize,
}

impl Transpose {
    pub(crate) fn output_len(&self) -> usize {
        (self.rows - 1) * self.dx + self.cols
    }

    /// # Panics
    ///
    /// Panics if `samples` or `out` are shorter than the plan requires.
    pub(crate) fn apply(&self, samples: &[Elev], out: &mut [Elev]) {
        for (j, i) in iproduct!(0..self.cols, 0..self.rows) {
            out[i * self.dx + j] = samples[self.stride * j + i];
        }
    }
}
