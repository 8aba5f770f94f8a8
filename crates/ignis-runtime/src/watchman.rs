//! Watchman: allocation tracking for `ignis_alloc` / `ignis_free`
//!
//! Every live block is recorded with its size. Releasing an address the
//! Watchman does not know about (a double free, or a pointer that never
//! came from `ignis_alloc`) is reported and the release is skipped, so
//! the C allocator never sees it.

use std::ptr::NonNull;
use std::sync::OnceLock;

use dashmap::DashMap;

use crate::error::{RuntimeError, RuntimeResult};

/// Live blocks, keyed by address.
fn live() -> &'static DashMap<usize, usize> {
    static LIVE: OnceLock<DashMap<usize, usize>> = OnceLock::new();
    LIVE.get_or_init(DashMap::new)
}

pub(crate) fn record(block: NonNull<u8>, size: usize) {
    live().insert(block.as_ptr() as usize, size);
}

pub(crate) fn forget(block: NonNull<u8>) -> RuntimeResult<usize> {
    let addr = block.as_ptr() as usize;
    live()
        .remove(&addr)
        .map(|(_, size)| size)
        .ok_or_else(|| RuntimeError::untracked_release(addr))
}

/// Number of blocks allocated and not yet released.
pub fn live_blocks() -> usize {
    live().len()
}

/// Total bytes held by live blocks.
pub fn live_bytes() -> usize {
    live().iter().map(|entry| *entry.value()).sum()
}

/// Number of outstanding `ignis_alloc` blocks
#[unsafe(no_mangle)]
pub extern "C" fn ignis_watchman_live_blocks() -> usize {
    live_blocks()
}

/// Bytes held by outstanding `ignis_alloc` blocks
#[unsafe(no_mangle)]
pub extern "C" fn ignis_watchman_live_bytes() -> usize {
    live_bytes()
}
