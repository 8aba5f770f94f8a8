//! Call contract between generated code and the runtime
//!
//! A code generator uses the symbol constants to emit calls, and ships
//! the C declarations from [`render_header`] next to its output.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RuntimeResult;

pub const PRINT_INT: &str = "print_int";
pub const PUTCHAR: &str = "ignis_putchar";
pub const GETCHAR: &str = "ignis_getchar";
pub const ALLOC: &str = "ignis_alloc";
pub const FREE: &str = "ignis_free";
pub const INIT: &str = "ignis_runtime_init";

/// End-of-input value returned by `ignis_getchar`.
pub const EOF: i32 = crate::stream::IGNIS_EOF;

pub const HEADER_FILENAME: &str = "ignis_runtime.h";

/// One exported runtime function, described in C terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeFunction {
    pub symbol: &'static str,
    pub returns: &'static str,
    pub params: &'static str,
    pub doc: &'static str,
}

impl RuntimeFunction {
    /// The C prototype, e.g. `void print_int(int64_t value);`.
    pub fn declaration(&self) -> String {
        let sep = if self.returns.ends_with('*') { "" } else { " " };
        format!("{}{sep}{}({});", self.returns, self.symbol, self.params)
    }
}

pub const RUNTIME_FUNCTIONS: &[RuntimeFunction] = &[
    RuntimeFunction {
        symbol: PRINT_INT,
        returns: "void",
        params: "int64_t value",
        doc: "Print a signed integer in decimal, without a trailing newline.",
    },
    RuntimeFunction {
        symbol: PUTCHAR,
        returns: "void",
        params: "char value",
        doc: "Print one byte.",
    },
    RuntimeFunction {
        symbol: GETCHAR,
        returns: "int",
        params: "void",
        doc: "Read one byte (0..255), or IGNIS_EOF once input is exhausted.",
    },
    RuntimeFunction {
        symbol: ALLOC,
        returns: "void *",
        params: "size_t size",
        doc: "Allocate size uninitialized bytes; NULL when size is 0. Aborts when memory is exhausted.",
    },
    RuntimeFunction {
        symbol: FREE,
        returns: "void",
        params: "void *ptr",
        doc: "Free a block returned by ignis_alloc. NULL is ignored.",
    },
    RuntimeFunction {
        symbol: INIT,
        returns: "void",
        params: "void",
        doc: "Optional: log runtime diagnostics to stderr, filtered by IGNIS_LOG.",
    },
];

/// Present only when the runtime is built with the `watchman` feature.
pub const WATCHMAN_FUNCTIONS: &[RuntimeFunction] = &[
    RuntimeFunction {
        symbol: "ignis_watchman_live_blocks",
        returns: "size_t",
        params: "void",
        doc: "Number of outstanding ignis_alloc blocks.",
    },
    RuntimeFunction {
        symbol: "ignis_watchman_live_bytes",
        returns: "size_t",
        params: "void",
        doc: "Bytes held by outstanding ignis_alloc blocks.",
    },
];

/// Every function the runtime can export, watchman ones included.
pub fn all_functions() -> impl Iterator<Item = &'static RuntimeFunction> {
    RUNTIME_FUNCTIONS.iter().chain(WATCHMAN_FUNCTIONS)
}

pub fn lookup(symbol: &str) -> Option<&'static RuntimeFunction> {
    all_functions().find(|func| func.symbol == symbol)
}

/// Render the C header declaring the runtime (C and C++ compatible).
pub fn render_header() -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "/* {HEADER_FILENAME}: generated by ignis-runtime, do not edit. */\n\
         #ifndef IGNIS_RUNTIME_H\n\
         #define IGNIS_RUNTIME_H\n\
         \n\
         #include <stddef.h>\n\
         #include <stdint.h>\n\
         \n\
         #ifdef __cplusplus\n\
         extern \"C\" {{\n\
         #endif\n\
         \n\
         /* Returned by ignis_getchar at end of input. */\n\
         #define IGNIS_EOF ({EOF})\n"
    ));
    for func in RUNTIME_FUNCTIONS {
        push_declaration(&mut out, func);
    }
    out.push_str(
        "\n/* Exported only by a runtime built with the watchman feature.\n   \
         Define IGNIS_WATCHMAN before including this header to declare them. */\n\
         #ifdef IGNIS_WATCHMAN\n",
    );
    for func in WATCHMAN_FUNCTIONS {
        push_declaration(&mut out, func);
    }
    out.push_str(
        "#endif\n\
         \n\
         #ifdef __cplusplus\n\
         }\n\
         #endif\n\
         \n\
         #endif /* IGNIS_RUNTIME_H */\n",
    );
    out
}

fn push_declaration(out: &mut String, func: &RuntimeFunction) {
    out.push_str(&format!("\n/* {} */\n{}\n", func.doc, func.declaration()));
}

/// Write `ignis_runtime.h` into `dir`, returning its path.
pub fn write_header(dir: impl AsRef<Path>) -> RuntimeResult<PathBuf> {
    let path = dir.as_ref().join(HEADER_FILENAME);
    fs::write(&path, render_header())?;
    debug!(path = %path.display(), "wrote runtime header");
    Ok(path)
}
