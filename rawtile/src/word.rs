use crate::{Elev, TileError};
use byteorder::{BigEndian, ByteOrder};

/// Width of a stored sample.
///
/// Samples are big-endian two's-complement integers. Widening to
/// [`Elev`] preserves sign and magnitude, so `0xFF 0xFF` is `-1` and
/// `0x80 0x00` is `-32768` for [`WordSize::Two`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordSize {
    One,
    Two,
    Four,
}

impl WordSize {
    /// Number of bytes per sample.
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Parses one sample from the front of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than [`Self::bytes`].
    #[allow(clippy::cast_possible_wrap)]
    pub fn parse(self, src: &[u8]) -> i32 {
        match self {
            Self::One => i32::from(src[0] as i8),
            Self::Two => i32::from(BigEndian::read_i16(src)),
            Self::Four => BigEndian::read_i32(src),
        }
    }

    /// Parses one sample and widens it to an elevation.
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    pub fn parse_elev(self, src: &[u8]) -> Elev {
        self.parse(src) as Elev
    }
}

impl TryFrom<usize> for WordSize {
    type Error = TileError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        match bytes {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(TileError::UnsupportedWordSize(other)),
        }
    }
}
