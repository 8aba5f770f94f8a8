//! Standard stream builtins
//!
//! Generated code prints integers and single bytes and reads single bytes
//! through these functions. Every write is flushed before returning: the
//! host's `main` is generated code, so nothing flushes Rust's stdout buffer
//! at exit.

use std::ffi::{c_char, c_int};
use std::io::{self, ErrorKind, Read, Write};

use tracing::debug;

use crate::error::RuntimeResult;

/// Returned by `ignis_getchar` once standard input is exhausted.
///
/// Lies outside `0..=255`, so it never collides with a real byte.
pub const IGNIS_EOF: c_int = -1;

/// Write the decimal text of `value`, without a trailing newline.
pub fn write_int<W: Write + ?Sized>(out: &mut W, value: i64) -> RuntimeResult<()> {
    write!(out, "{value}")?;
    out.flush()?;
    Ok(())
}

/// Write a single raw byte.
pub fn write_byte<W: Write + ?Sized>(out: &mut W, byte: u8) -> RuntimeResult<()> {
    out.write_all(&[byte])?;
    out.flush()?;
    Ok(())
}

/// Read a single byte, returning `None` at end of stream.
pub fn read_byte<R: Read + ?Sized>(input: &mut R) -> RuntimeResult<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Print a signed 64-bit integer to stdout (no newline)
#[unsafe(no_mangle)]
pub extern "C" fn print_int(value: i64) {
    if let Err(err) = write_int(&mut io::stdout().lock(), value) {
        debug!(%err, value, "print_int: stdout write failed");
    }
}

/// Print one byte to stdout
#[unsafe(no_mangle)]
pub extern "C" fn ignis_putchar(value: c_char) {
    // c_char is signed on some targets; the bit pattern is what gets written.
    let byte = value as u8;
    if let Err(err) = write_byte(&mut io::stdout().lock(), byte) {
        debug!(%err, byte, "ignis_putchar: stdout write failed");
    }
}

/// Read one byte from stdin, or `IGNIS_EOF` when input is exhausted
#[unsafe(no_mangle)]
pub extern "C" fn ignis_getchar() -> c_int {
    match read_byte(&mut io::stdin().lock()) {
        Ok(Some(byte)) => c_int::from(byte),
        Ok(None) => IGNIS_EOF,
        Err(err) => {
            debug!(%err, "ignis_getchar: stdin read failed, reporting end of stream");
            IGNIS_EOF
        }
    }
}
