//! C ABI for [`get_tile`](crate::get_tile).
//!
//! Matches the interface bound from Fortran as:
//!
//! ```fortran
//! function c_get_tile(file, dx, dy, x_offset, y_offset, word_size, tile) bind(C)
//!     character (c_char), intent(in) :: file
//!     integer (c_int), intent(in), value :: dx, dy, x_offset, y_offset, word_size
//!     real (c_float) :: tile(dx, dy)
//! end function c_get_tile
//! ```
//!
//! `file` must be NUL terminated (`trim(path) // c_null_char`).

use crate::status::{get_tile, FAILURE};
use log::error;
use std::{
    ffi::{c_char, c_float, c_int, CStr},
    slice,
};

/// Decodes a `dx × dy` tile into `tile`. Returns `1` on success and
/// `-1` on failure.
///
/// # Safety
///
/// `file` must point to a NUL-terminated string and `tile` must be
/// valid for writes of `dx * dy` floats. Either may be null, in which
/// case `-1` is returned.
#[no_mangle]
pub unsafe extern "C" fn c_get_tile(
    file: *const c_char,
    dx: c_int,
    dy: c_int,
    x_offset: c_int,
    y_offset: c_int,
    word_size: c_int,
    tile: *mut c_float,
) -> c_int {
    if file.is_null() || tile.is_null() {
        error!("c_get_tile: null file or tile pointer");
        return FAILURE;
    }
    let Ok(path) = CStr::from_ptr(file).to_str() else {
        error!("c_get_tile: file name is not valid UTF-8");
        return FAILURE;
    };
    let len = match (usize::try_from(dx), usize::try_from(dy)) {
        (Ok(w), Ok(h)) => w.checked_mul(h),
        _ => None,
    };
    let Some(len) = len else {
        error!("c_get_tile: invalid tile dimensions {dx}x{dy}");
        return FAILURE;
    };
    let tile = slice::from_raw_parts_mut(tile, len);
    get_tile(path, dx, dy, x_offset, y_offset, word_size, tile)
}

#[cfg(test)]
mod tests {
    use super::c_get_tile;
    use crate::status::FAILURE;
    use std::{ffi::CString, ptr};

    #[test]
    fn test_null_pointers() {
        let mut tile = [0.0f32; 1];
        let status = unsafe { c_get_tile(ptr::null(), 1, 1, 0, 0, 2, tile.as_mut_ptr()) };
        assert_eq!(status, FAILURE);
        let path = CString::new("t").unwrap();
        let status = unsafe { c_get_tile(path.as_ptr(), 1, 1, 0, 0, 2, ptr::null_mut()) };
        assert_eq!(status, FAILURE);
    }

    #[test]
    fn test_missing_file() {
        let mut tile = [7.0f32; 4];
        let path = CString::new("/nonexistent/rawtile/N00E000.hgt").unwrap();
        let status = unsafe { c_get_tile(path.as_ptr(), 2, 2, 0, 0, 2, tile.as_mut_ptr()) };
        assert_eq!(status, FAILURE);
        assert_eq!(tile, [7.0; 4]);
    }
}
