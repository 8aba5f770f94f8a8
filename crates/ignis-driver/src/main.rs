//! Ignis runtime driver
//!
//! Calls the runtime through the same exported symbols that generated code
//! links against, so standard streams behave as in a compiled program.
//!
//! # Usage
//!
//! ```bash
//! ignis-driver print-int -42
//! printf 'hi' | ignis-driver echo
//! ignis-driver header --out build/
//! ```

use std::ffi::{c_char, c_void};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ignis_runtime::{
    IGNIS_EOF, abi, ignis_alloc, ignis_free, ignis_getchar, ignis_putchar, ignis_runtime_init,
    print_int,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ignis-driver")]
#[command(about = "Exercise the Ignis runtime from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print an integer with print_int
    PrintInt {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Print raw bytes with ignis_putchar
    Putchar {
        #[arg(required = true)]
        bytes: Vec<u8>,
    },
    /// Call ignis_getchar COUNT times, printing each result followed by a space
    Read { count: usize },
    /// Copy stdin to stdout one byte at a time
    Echo,
    /// Allocate SIZE bytes, fill and verify them, then free the block
    Roundtrip { size: usize },
    /// Print an integer from several threads at once, one per line
    Concurrent {
        #[arg(allow_negative_numbers = true)]
        value: i64,
        #[arg(long, default_value_t = 8)]
        threads: usize,
        #[arg(long, default_value_t = 200)]
        count: usize,
    },
    /// Print the C header, or write it into a directory
    Header {
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    ignis_runtime_init();
    let cli = Cli::parse();

    match cli.command {
        Command::PrintInt { value } => print_int(value),
        Command::Putchar { bytes } => {
            for byte in bytes {
                ignis_putchar(byte as c_char);
            }
        }
        Command::Read { count } => {
            for _ in 0..count {
                print_int(i64::from(ignis_getchar()));
                ignis_putchar(b' ' as c_char);
            }
        }
        Command::Echo => loop {
            let c = ignis_getchar();
            if c == IGNIS_EOF {
                break;
            }
            ignis_putchar(c as u8 as c_char);
        },
        Command::Roundtrip { size } => return Ok(roundtrip(size)),
        Command::Concurrent {
            value,
            threads,
            count,
        } => concurrent(value, threads, count),
        Command::Header { out: Some(dir) } => {
            let path = abi::write_header(dir)?;
            info!(path = %path.display(), "header written");
        }
        Command::Header { out: None } => print!("{}", abi::render_header()),
    }

    Ok(ExitCode::SUCCESS)
}

fn concurrent(value: i64, threads: usize, count: usize) {
    std::thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                for _ in 0..count {
                    print_int(value);
                    ignis_putchar(b'\n' as c_char);
                }
            });
        }
    });
}

/// Prints the number of bytes that read back intact.
fn roundtrip(size: usize) -> ExitCode {
    let ptr = ignis_alloc(size) as *mut u8;
    if ptr.is_null() {
        print_int(0);
        return ExitCode::SUCCESS;
    }

    let pattern = |i: usize| (i % 251) as u8;
    let verified = unsafe {
        for i in 0..size {
            ptr.add(i).write(pattern(i));
        }
        let intact = (0..size).filter(|&i| ptr.add(i).read() == pattern(i)).count();
        ignis_free(ptr as *mut c_void);
        intact
    };

    print_int(verified as i64);
    if verified == size {
        ExitCode::SUCCESS
    } else {
        error!(size, verified, "block did not read back intact");
        ExitCode::FAILURE
    }
}
