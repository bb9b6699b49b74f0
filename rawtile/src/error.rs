use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TileError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to close {}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("short read from {}: expected {expected} bytes, got {actual}", path.display())]
    ShortRead {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("failed to allocate {bytes} bytes for tile samples")]
    Alloc { bytes: usize },

    #[error("unsupported word size {0}, expected one of 1, 2, or 4 bytes")]
    UnsupportedWordSize(usize),

    #[error("tile dimensions must be non-zero, got {dx}x{dy}")]
    EmptyTile { dx: usize, dy: usize },

    #[error("padded tile extent overflows usize")]
    ExtentOverflow,

    #[error("output holds {actual} values, need at least {required}")]
    OutputLen { required: usize, actual: usize },

    #[error("transpose reads sample {index} but the padded extent holds {len}")]
    TransposeOutOfRange { index: usize, len: usize },

    #[error("invalid tile parameter {name}: {value}")]
    InvalidParam { name: &'static str, value: i64 },
}
