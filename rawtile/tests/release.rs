//! Checks that the raw byte buffer is freed exactly once on every exit
//! path of a decode, and never allocated when the source fails first.

use rawtile::{MemSource, TileDecoder, TileError, TileRequest, TileSource};
use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
    io::{self, Read},
    path::Path,
};

/// Counts allocations of one watched size on the current thread.
struct Tracking;

thread_local! {
    static WATCH: Cell<usize> = const { Cell::new(0) };
    static ALLOCS: Cell<usize> = const { Cell::new(0) };
    static FREES: Cell<usize> = const { Cell::new(0) };
}

fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>, size: usize) {
    let watched = WATCH.try_with(Cell::get).unwrap_or(0);
    if watched != 0 && size == watched {
        let _ = counter.try_with(|c| c.set(c.get() + 1));
    }
}

unsafe impl GlobalAlloc for Tracking {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump(&ALLOCS, layout.size());
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        bump(&ALLOCS, layout.size());
        System.alloc_zeroed(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        bump(&FREES, layout.size());
        System.dealloc(ptr, layout);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        bump(&FREES, layout.size());
        bump(&ALLOCS, new_size);
        System.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static GLOBAL: Tracking = Tracking;

/// Runs `f` while counting allocations of `size` bytes and returns
/// (allocs, frees).
fn track(size: usize, f: impl FnOnce()) -> (usize, usize) {
    ALLOCS.with(|c| c.set(0));
    FREES.with(|c| c.set(0));
    WATCH.with(|c| c.set(size));
    f();
    WATCH.with(|c| c.set(0));
    (ALLOCS.with(Cell::get), FREES.with(Cell::get))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fail {
    Never,
    Open,
    Read,
    Close,
}

struct Injecting<'a> {
    bytes: &'a [u8],
    at: Fail,
}

struct InjectingReader<'a> {
    bytes: &'a [u8],
    fail: bool,
}

impl Read for InjectingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.bytes.read(buf)
    }
}

impl<'a> TileSource for Injecting<'a> {
    type Reader = InjectingReader<'a>;

    fn open(&self, _path: &Path) -> io::Result<Self::Reader> {
        if self.at == Fail::Open {
            return Err(io::ErrorKind::PermissionDenied.into());
        }
        Ok(InjectingReader {
            bytes: self.bytes,
            fail: self.at == Fail::Read,
        })
    }

    fn close(&self, _reader: Self::Reader) -> io::Result<()> {
        if self.at == Fail::Close {
            return Err(io::ErrorKind::Interrupted.into());
        }
        Ok(())
    }
}

// 24 x 24 16-bit samples; no other allocation in a decode has this size.
const DIM: usize = 24;
const RAW_LEN: usize = DIM * DIM * 2;

#[test]
fn test_open_failure_allocates_nothing() {
    let bytes = vec![0x12u8; RAW_LEN];
    let req = TileRequest::new("inject", (DIM, DIM));
    let decoder = TileDecoder::with_source(Injecting {
        bytes: &bytes,
        at: Fail::Open,
    });
    let mut out = vec![0.0f32; DIM * DIM];
    let (allocs, frees) = track(RAW_LEN, || {
        let err = decoder.decode_into(&req, &mut out).unwrap_err();
        assert!(matches!(err, TileError::Open { .. }));
    });
    assert_eq!((allocs, frees), (0, 0));
}

#[test]
fn test_buffer_released_on_every_failure() {
    let bytes = vec![0x12u8; RAW_LEN];
    let req = TileRequest::new("inject", (DIM, DIM));
    for at in [Fail::Read, Fail::Close] {
        let decoder = TileDecoder::with_source(Injecting { bytes: &bytes, at });
        let mut out = vec![0.0f32; DIM * DIM];
        let (allocs, frees) = track(RAW_LEN, || {
            let err = decoder.decode_into(&req, &mut out).unwrap_err();
            assert!(matches!(
                (at, err),
                (Fail::Read, TileError::Read { .. }) | (Fail::Close, TileError::Close { .. })
            ));
        });
        assert_eq!((allocs, frees), (1, 1));
    }
}

#[test]
fn test_short_source_rejected_before_allocating() {
    let bytes = vec![0u8; RAW_LEN - 2];
    let req = TileRequest::new("short", (DIM, DIM));
    let decoder = TileDecoder::with_source(MemSource(&bytes));
    let mut out = vec![0.0f32; DIM * DIM];
    let (allocs, frees) = track(RAW_LEN, || {
        assert!(matches!(
            decoder.decode_into(&req, &mut out),
            Err(TileError::ShortRead { .. })
        ));
    });
    assert_eq!((allocs, frees), (0, 0));
}

#[test]
fn test_buffer_released_on_unhinted_short_read() {
    // No length hint, so the short read is only seen after filling.
    let bytes = vec![0u8; RAW_LEN - 2];
    let req = TileRequest::new("short", (DIM, DIM));
    let decoder = TileDecoder::with_source(Injecting {
        bytes: &bytes,
        at: Fail::Never,
    });
    let mut out = vec![0.0f32; DIM * DIM];
    let (allocs, frees) = track(RAW_LEN, || {
        assert!(matches!(
            decoder.decode_into(&req, &mut out),
            Err(TileError::ShortRead { .. })
        ));
    });
    assert_eq!((allocs, frees), (1, 1));
}

#[test]
fn test_buffer_released_on_success() {
    let bytes = vec![0u8; RAW_LEN];
    let req = TileRequest::new("ok", (DIM, DIM));
    let decoder = TileDecoder::with_source(MemSource(&bytes));
    let mut out = vec![-1.0f32; DIM * DIM];
    let (allocs, frees) = track(RAW_LEN, || {
        decoder.decode_into(&req, &mut out).unwrap();
    });
    assert_eq!((allocs, frees), (1, 1));
    assert!(out.iter().all(|v| *v == 0.0));
}

#[test]
fn test_validation_failures_allocate_nothing() {
    let bytes = vec![0u8; RAW_LEN];
    let decoder = TileDecoder::with_source(MemSource(&bytes));
    let req = TileRequest::new("bad", (DIM, DIM)).with_word_size(3);
    let mut out = vec![0.0f32; DIM * DIM];
    let (allocs, frees) = track(DIM * DIM * 3, || {
        assert!(decoder.decode_into(&req, &mut out).is_err());
    });
    assert_eq!((allocs, frees), (0, 0));
}
