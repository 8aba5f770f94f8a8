//! Process-level tests: real stdin/stdout through the runtime's exports

use std::io::{Seek, SeekFrom, Write};
use std::process::{Command, Output, Stdio};

fn run(args: &[&str], stdin: Stdio) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_ignis-driver"))
        .args(args)
        .stdin(stdin)
        .env_remove("IGNIS_LOG")
        .output()
        .expect("Failed to execute ignis-driver");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("ignis-driver {args:?} failed: {stderr}");
    }
    output
}

/// Stdin backed by a temp file holding `bytes`.
fn stdin_from(bytes: &[u8]) -> Stdio {
    let mut file = tempfile::tempfile().expect("Failed to create temp file");
    file.write_all(bytes).expect("Failed to write stdin");
    file.seek(SeekFrom::Start(0)).expect("Failed to rewind temp file");
    Stdio::from(file)
}

#[test]
fn test_print_int_exact_text() {
    for (value, expected) in [
        ("0", "0"),
        ("42", "42"),
        ("-42", "-42"),
        ("9223372036854775807", "9223372036854775807"),
        ("-9223372036854775808", "-9223372036854775808"),
    ] {
        let output = run(&["print-int", value], Stdio::null());
        assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
    }
}

#[test]
fn test_putchar_writes_raw_bytes() {
    let output = run(&["putchar", "72", "105", "10", "0", "255"], Stdio::null());
    assert_eq!(output.stdout, [72, 105, 10, 0, 255]);
}

#[test]
fn test_getchar_single_byte_then_eof() {
    let output = run(&["read", "3"], stdin_from(b"A"));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "65 -1 -1 ");
}

#[test]
fn test_getchar_on_empty_stdin() {
    let output = run(&["read", "1"], Stdio::null());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "-1 ");
}

#[test]
fn test_getchar_high_byte_is_not_eof() {
    let output = run(&["read", "2"], stdin_from(&[0xFF]));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "255 -1 ");
}

#[test]
fn test_echo_preserves_every_byte() {
    let input: Vec<u8> = (0..=255u8).chain(b"Ignis\n".iter().copied()).collect();
    let output = run(&["echo"], stdin_from(&input));
    assert_eq!(output.stdout, input);
}

#[test]
fn test_alloc_roundtrip() {
    let output = run(&["roundtrip", "16"], Stdio::null());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "16");

    let output = run(&["roundtrip", "100000"], Stdio::null());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "100000");
}

#[test]
fn test_alloc_zero_roundtrip() {
    let output = run(&["roundtrip", "0"], Stdio::null());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "0");
}

#[test]
fn test_header_matches_renderer() {
    let output = run(&["header"], Stdio::null());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        ignis_runtime::abi::render_header()
    );
}

#[test]
fn test_header_written_to_directory() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dir_arg = dir.path().to_str().expect("temp dir path is UTF-8");
    let output = run(&["header", "--out", dir_arg], Stdio::null());
    assert!(output.stdout.is_empty());

    let header = std::fs::read_to_string(dir.path().join("ignis_runtime.h")).unwrap();
    assert!(header.contains("void print_int(int64_t value);"));
    assert!(header.contains("#define IGNIS_EOF (-1)"));
}

#[test]
fn test_diagnostics_stay_off_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_ignis-driver"))
        .args(["roundtrip", "16"])
        .env("IGNIS_LOG", "trace")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute ignis-driver");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "16");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("allocated block"), "stderr: {stderr}");
    assert!(stderr.contains("releasing block"), "stderr: {stderr}");
}

#[test]
fn test_unsatisfiable_allocation_aborts() {
    let output = Command::new(env!("CARGO_BIN_EXE_ignis-driver"))
        .args(["roundtrip", "9223372036854775000"])
        .env_remove("IGNIS_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute ignis-driver");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("memory allocation"), "stderr: {stderr}");
}

#[test]
fn test_concurrent_prints_never_split_an_integer() {
    let text = i64::MIN.to_string();
    let (threads, count) = (8, 200);
    let output = run(
        &[
            "concurrent",
            &text,
            "--threads",
            &threads.to_string(),
            "--count",
            &count.to_string(),
        ],
        Stdio::null(),
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    // Newlines come from separate calls and may land between integers,
    // but no integer's digits may be split by another thread's output.
    assert_eq!(stdout.matches('\n').count(), threads * count);
    assert_eq!(stdout.replace('\n', ""), text.repeat(threads * count));
}
