//! Memory management for Ignis programs
//!
//! This module provides the C-compatible allocation functions that are
//! called by compiled Ignis code. Blocks come straight from the C
//! allocator, so generated code may hand them to C libraries as well.

use std::alloc::{Layout, handle_alloc_error};
use std::ffi::c_void;
use std::ptr::NonNull;

use tracing::{error, trace};

use crate::error::{RuntimeError, RuntimeResult};

/// Alignment `malloc` guarantees on every supported target.
const MALLOC_ALIGN: usize = 2 * std::mem::size_of::<usize>();

/// Allocate `size` uninitialized bytes.
///
/// Returns `Ok(None)` for a zero-sized request.
pub fn allocate(size: usize) -> RuntimeResult<Option<NonNull<u8>>> {
    if size == 0 {
        return Ok(None);
    }
    let ptr = unsafe { libc::malloc(size) } as *mut u8;
    let Some(block) = NonNull::new(ptr) else {
        return Err(RuntimeError::out_of_memory(size));
    };
    #[cfg(feature = "watchman")]
    crate::watchman::record(block, size);
    trace!(addr = block.as_ptr() as usize, size, "allocated block");
    Ok(Some(block))
}

/// Return a block obtained from [`allocate`] to the allocator.
///
/// # Safety
///
/// `block` must come from [`allocate`] (or `ignis_alloc`) and must not have
/// been released already. With the `watchman` feature, a violation is
/// reported as [`RuntimeError::UntrackedRelease`] instead of reaching the
/// allocator.
pub unsafe fn release(block: NonNull<u8>) -> RuntimeResult<()> {
    #[cfg(feature = "watchman")]
    crate::watchman::forget(block)?;
    trace!(addr = block.as_ptr() as usize, "releasing block");
    unsafe { libc::free(block.as_ptr() as *mut c_void) };
    Ok(())
}

/// Allocate a raw block of at least `size` bytes
///
/// Returns null when `size` is zero. Aborts the process through the
/// standard allocation-failure path if the allocator is exhausted.
#[unsafe(no_mangle)]
pub extern "C" fn ignis_alloc(size: usize) -> *mut c_void {
    match allocate(size) {
        Ok(Some(block)) => block.as_ptr() as *mut c_void,
        Ok(None) => std::ptr::null_mut(),
        Err(err) => {
            error!(%err, "ignis_alloc failed");
            match Layout::from_size_align(size, MALLOC_ALIGN) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => std::process::abort(),
            }
        }
    }
}

/// Free a block allocated by `ignis_alloc`
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by `ignis_alloc` that has not
/// been freed yet. Null is a no-op.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ignis_free(ptr: *mut c_void) {
    let Some(block) = NonNull::new(ptr as *mut u8) else {
        return;
    };
    if let Err(err) = unsafe { release(block) } {
        error!(%err, "ignis_free ignored");
    }
}
