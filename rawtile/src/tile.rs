use crate::{Elev, Remap, TileError, TileRequest};
#[cfg(feature = "image")]
use image::{ImageBuffer, Luma};
#[cfg(feature = "image")]
use num_traits::AsPrimitive;
use std::mem::size_of;

/// Caller-owned storage for a decoded tile.
///
/// Values are laid out column-major, so `(x, y)` lives at
/// `x + y * dx`. Storage sized for [`Remap::Padded`] holds extra
/// values past `dx * dy`; they are kept in [`Self::values`] but not
/// reachable through [`Self::get`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OutputTile {
    dx: usize,
    dy: usize,
    values: Vec<Elev>,
}

impl OutputTile {
    /// Returns a zeroed `dx × dy` tile.
    pub fn new((dx, dy): (usize, usize)) -> Result<Self, TileError> {
        let len = dx.checked_mul(dy).ok_or(TileError::ExtentOverflow)?;
        Self::zeroed((dx, dy), len)
    }

    /// Returns a zeroed tile with room for everything `remap` writes
    /// for `req`.
    pub fn for_request(req: &TileRequest, remap: Remap) -> Result<Self, TileError> {
        Self::zeroed(req.dimensions(), req.output_len(remap)?)
    }

    fn zeroed((dx, dy): (usize, usize), len: usize) -> Result<Self, TileError> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| TileError::Alloc {
                bytes: len.saturating_mul(size_of::<Elev>()),
            })?;
        values.resize(len, 0.0);
        Ok(Self { dx, dy, values })
    }

    /// Returns this tile's (dx, dy) dimensions.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.dx, self.dy)
    }

    /// Returns the value at `(x, y)`, if inside `dx × dy`.
    pub fn get(&self, (x, y): (usize, usize)) -> Option<Elev> {
        if x < self.dx && y < self.dy {
            self.values.get(x + y * self.dx).copied()
        } else {
            None
        }
    }

    pub fn values(&self) -> &[Elev] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Elev] {
        &mut self.values
    }

    /// Returns an iterator over the `dx × dy` values, one slice per `y`.
    pub fn rows(&self) -> impl Iterator<Item = &[Elev]> + '_ {
        self.values[..self.dx * self.dy].chunks_exact(self.dx.max(1))
    }

    /// Returns the lowest and highest values in `dx × dy`, ignoring
    /// NaN, or `None` if there are none.
    pub fn min_max(&self) -> Option<(Elev, Elev)> {
        self.rows()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(feature = "image")]
impl OutputTile {
    /// Returns an [`ImageBuffer`] of this tile.
    ///
    /// The image is scaled so that the lowest value is `0` and the
    /// highest is `Pix::max_value()`. A flat tile renders as all
    /// zeroes.
    ///
    /// The original value can be recovered with:
    /// `(pixel_value / Pix::MAX) * (max - min) + min`
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_image<Pix>(&self) -> ImageBuffer<Luma<Pix>, Vec<Pix>>
    where
        Pix: image::Primitive + 'static,
        f32: AsPrimitive<Pix> + From<Pix>,
    {
        let mut img = ImageBuffer::new(self.dx as u32, self.dy as u32);
        let (min, max) = self.min_max().unwrap_or((0.0, 0.0));
        let range = max - min;
        let scale = |v: Elev| {
            if range > 0.0 && !v.is_nan() {
                (v - min) / range * f32::from(Pix::max_value())
            } else {
                0.0
            }
        };
        for (y, row) in self.rows().enumerate() {
            for (x, v) in row.iter().enumerate() {
                img.put_pixel(x as u32, y as u32, Luma([scale(*v).as_()]));
            }
        }
        img
    }
}
