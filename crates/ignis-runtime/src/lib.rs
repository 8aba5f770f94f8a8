//! Ignis runtime library.
//!
//! Provides the native functions that code emitted by the Ignis compiler
//! links against:
//! - Integer and byte output (`print_int`, `ignis_putchar`)
//! - Byte input (`ignis_getchar`)
//! - Heap allocation (`ignis_alloc`, `ignis_free`)
//! - Allocation tracking through the Watchman (`watchman` feature)
//!
//! The matching C declarations live in `include/ignis_runtime.h` and are
//! rendered by [`abi::render_header`].

pub mod abi;
pub mod error;
pub mod memory;
pub mod stream;
#[cfg(feature = "watchman")]
pub mod watchman;

pub use error::{RuntimeError, RuntimeResult};
pub use memory::{ignis_alloc, ignis_free};
pub use stream::{IGNIS_EOF, ignis_getchar, ignis_putchar, print_int};
#[cfg(feature = "watchman")]
pub use watchman::{ignis_watchman_live_blocks, ignis_watchman_live_bytes};

use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostics filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "IGNIS_LOG";

/// Route runtime diagnostics to stderr when `IGNIS_LOG` is set.
///
/// Returns whether a subscriber was installed. Nothing happens when the
/// variable is unset or invalid, or when the host already installed a
/// global subscriber. Stdout belongs to the program and is never used.
pub fn init_tracing() -> bool {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Initialize runtime diagnostics (optional; generated code may skip it)
#[unsafe(no_mangle)]
pub extern "C" fn ignis_runtime_init() {
    init_tracing();
}
