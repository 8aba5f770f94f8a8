//! Error types for the runtime's safe Rust layer
//!
//! The `extern "C"` entry points never return these to generated code:
//! stream errors are dropped there and allocation failure is fatal.

use derive_more::{Display, Error, From};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Display, Debug, Error, From)]
pub enum RuntimeError {
    #[display("Stream error: {_0}")]
    #[from]
    Io(#[error(source)] std::io::Error),

    #[display("Out of memory: cannot allocate {size} bytes")]
    OutOfMemory { size: usize },

    #[display("Release of untracked block at {addr:#x}")]
    UntrackedRelease { addr: usize },
}

impl RuntimeError {
    pub(crate) fn out_of_memory(size: usize) -> Self {
        RuntimeError::OutOfMemory { size }
    }

    #[cfg_attr(not(feature = "watchman"), allow(dead_code))]
    pub(crate) fn untracked_release(addr: usize) -> Self {
        RuntimeError::UntrackedRelease { addr }
    }

    #[cfg(test)]
    pub(crate) fn is_io(&self) -> bool {
        matches!(self, RuntimeError::Io(_))
    }
}
