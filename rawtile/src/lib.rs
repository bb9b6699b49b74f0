// #![deny(missing_docs)]

//! Raw elevation grid tile decoding.
//!
//! Reads a rectangular tile out of a headerless file of big-endian,
//! two's-complement samples (the same layout as SRTM `.hgt` files,
//! minus the fixed dimensions) and reorders it for column-major
//! callers.
//!
//! ```no_run
//! use rawtile::{OutputTile, TileDecoder, TileRequest};
//!
//! let req = TileRequest::new("N44W072.hgt", (1201, 1201));
//! let mut tile = OutputTile::new(req.dimensions())?;
//! TileDecoder::new().decode_tile(&req, &mut tile)?;
//! # Ok::<(), rawtile::TileError>(())
//! ```
//!
//! # References
//!
//! 1. [HGT file layout](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod decoder;
mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
mod remap;
mod request;
mod source;
pub mod status;
mod tile;
mod word;

pub use crate::{
    decoder::{DecodeOptions, TileDecoder},
    error::TileError,
    remap::Remap,
    request::TileRequest,
    source::{FsSource, MemSource, TileSource},
    status::get_tile,
    tile::OutputTile,
    word::WordSize,
};

/// Decoded sample type.
///
/// Matches the single precision `real` arrays of the numerical code
/// that consumes tiles.
pub type Elev = f32;
