//! Integer status entry point for numerical callers.

use crate::{Elev, TileDecoder, TileError, TileRequest};
use log::error;
use std::{error::Error, fmt::Write, path::Path};

pub const SUCCESS: i32 = 1;
pub const FAILURE: i32 = -1;

/// Decodes a `dx × dy` tile into `tile` and returns [`SUCCESS`] or
/// [`FAILURE`].
///
/// This is the flat contract used by array-language callers: scalar
/// parameters in, a status code out, and failure detail only on the
/// error log. `tile` is addressed column-major as `tile(dx, dy)` and is
/// left unmodified on failure.
pub fn get_tile<P: AsRef<Path>>(
    path: P,
    dx: i32,
    dy: i32,
    x_offset: i32,
    y_offset: i32,
    word_size: i32,
    tile: &mut [Elev],
) -> i32 {
    match try_get_tile(path.as_ref(), [dx, dy, x_offset, y_offset, word_size], tile) {
        Ok(()) => SUCCESS,
        Err(e) => {
            error!("{}", report(&e));
            FAILURE
        }
    }
}

fn try_get_tile(path: &Path, params: [i32; 5], tile: &mut [Elev]) -> Result<(), TileError> {
    const NAMES: [&str; 5] = ["dx", "dy", "x_offset", "y_offset", "word_size"];
    let mut converted = [0usize; 5];
    for ((dst, &value), name) in converted.iter_mut().zip(&params).zip(NAMES) {
        *dst = usize::try_from(value).map_err(|_| TileError::InvalidParam {
            name,
            value: i64::from(value),
        })?;
    }
    let [dx, dy, x_offset, y_offset, word_size] = converted;
    let req = TileRequest::new(path, (dx, dy))
        .with_offset((x_offset, y_offset))
        .with_word_size(word_size);
    TileDecoder::new().decode_into(&req, tile)
}

/// Formats `err` with its chain of sources.
fn report(err: &TileError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(msg, ": {cause}");
        source = cause.source();
    }
    msg
}
