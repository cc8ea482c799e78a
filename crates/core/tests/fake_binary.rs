//! Process plumbing tests against stand-in shell scripts.
//!
//! The scripts ignore their arguments (or echo them), which lets these tests
//! check piping, argument passing and failure reporting without gif2webp.

#![cfg(unix)]

mod common;

use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::OnceLock;

use tempfile::TempDir;
use webpbin_core::{BinaryConfig, ConverterError, Gif2WebP};

use common::{sample_animation, sample_gif_bytes};

const SCRIPTS: &[(&str, &str)] = &[
    ("cat", "#!/bin/sh\ncat\n"),
    ("args", "#!/bin/sh\nprintf '%s\\n' \"$@\"\n"),
    (
        "fail",
        "#!/bin/sh\necho \"Error! Could not read input\" >&2\nexit 1\n",
    ),
    ("exit0", "#!/bin/sh\nexit 0\n"),
    ("exit1", "#!/bin/sh\nexit 1\n"),
    ("cat-last", "#!/bin/sh\nfor last; do :; done\ncat \"$last\"\n"),
    ("version", "#!/bin/sh\necho 1.4.0\necho 'libsharpyuv: 0.4.0'\n"),
    ("silent", "#!/bin/sh\n"),
];

/// All scripts are written once, before any test spawns a process, so no
/// script is still open for writing when another thread forks.
fn scripts_dir() -> &'static TempDir {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = TempDir::new().expect("Failed to create script dir");
        for (name, body) in SCRIPTS {
            let path = dir.path().join(name);
            std::fs::write(&path, body).expect("Failed to write script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to mark script executable");
        }
        dir
    })
}

fn script(name: &str) -> PathBuf {
    scripts_dir().path().join(name)
}

fn converter<'a>(name: &str) -> Gif2WebP<'a> {
    Gif2WebP::new(&BinaryConfig::with_path(script(name)))
}

#[test]
fn test_stream_bytes_reach_stdin_and_come_back() {
    let gif = sample_gif_bytes();
    let mut out: Vec<u8> = Vec::new();

    let mut converter = converter("cat");
    converter
        .input_stream(Cursor::new(gif.clone()))
        .output_stream(&mut out);
    converter.run().unwrap();
    drop(converter);

    assert_eq!(out, gif);
}

#[test]
fn test_image_is_piped_as_gif() {
    let mut out: Vec<u8> = Vec::new();

    let mut converter = converter("cat");
    converter
        .input_image(sample_animation())
        .output_stream(&mut out);
    converter.run().unwrap();
    drop(converter);

    assert!(out.starts_with(b"GIF89a"));
}

#[test]
fn test_large_stream_does_not_deadlock() {
    let payload: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let mut out: Vec<u8> = Vec::new();

    let mut converter = converter("cat");
    converter
        .input_stream(Cursor::new(payload.clone()))
        .output_stream(&mut out);
    converter.run().unwrap();
    drop(converter);

    assert_eq!(out.len(), payload.len());
    assert_eq!(out, payload);
}

#[test]
fn test_arguments_for_file_input() {
    let mut out: Vec<u8> = Vec::new();

    let mut converter = converter("args");
    converter
        .quality(80)
        .mixed(true)
        .input_file("source.gif")
        .output_stream(&mut out);
    converter.run().unwrap();
    drop(converter);

    let args = String::from_utf8(out).unwrap();
    assert_eq!(
        args.lines().collect::<Vec<_>>(),
        ["-q", "80", "-mixed", "-o", "-", "source.gif"]
    );
}

#[test]
fn test_arguments_for_piped_input() {
    let mut out: Vec<u8> = Vec::new();

    let mut converter = converter("args");
    converter
        .input_stream(Cursor::new(Vec::<u8>::new()))
        .output_stream(&mut out);
    converter.run().unwrap();
    drop(converter);

    let args = String::from_utf8(out).unwrap();
    assert_eq!(args.lines().collect::<Vec<_>>(), ["-o", "-", "--", "-"]);
}

#[test]
fn test_nonzero_exit_carries_stderr() {
    let mut converter = converter("fail");
    converter
        .input_file("source.gif")
        .output_file("target.webp");

    let err = converter.run().unwrap_err();
    assert!(matches!(err, ConverterError::ExecutionFailed { .. }));
    assert_eq!(err.stderr().map(str::trim), Some("Error! Could not read input"));
    let message = err.to_string();
    assert!(message.contains("exit status: 1"));
    assert!(message.contains("Error! Could not read input"));
}

#[test]
fn test_successful_exit_without_reading_stdin() {
    let payload = vec![0u8; 4 * 1024 * 1024];

    let mut converter = converter("exit0");
    converter
        .input_stream(Cursor::new(payload))
        .output_file("target.webp");

    converter.run().unwrap();
}

#[test]
fn test_failed_exit_without_reading_stdin_reports_status() {
    let payload = vec![0u8; 4 * 1024 * 1024];

    let mut converter = converter("exit1");
    converter
        .input_stream(Cursor::new(payload))
        .output_file("target.webp");

    let err = converter.run().unwrap_err();
    assert!(matches!(err, ConverterError::ExecutionFailed { .. }));
    assert!(err.to_string().contains("exit status: 1"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_input_path_reaches_the_tool() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let source = dir.path().join(OsStr::from_bytes(b"caf\xe9.gif"));
    std::fs::write(&source, b"GIF89a-latin1-name").unwrap();
    let mut out: Vec<u8> = Vec::new();

    let mut converter = converter("cat-last");
    converter.input_file(&source).output_stream(&mut out);
    converter.run().unwrap();
    drop(converter);

    assert_eq!(out, b"GIF89a-latin1-name");
}

#[test]
fn test_file_output_leaves_stdout_alone() {
    let mut converter = converter("silent");
    converter
        .input_file("source.gif")
        .output_file("target.webp");

    converter.run().unwrap();
}

#[test]
fn test_version_takes_first_line() {
    let converter = converter("version");
    assert_eq!(converter.version().unwrap(), "1.4.0");
}

#[test]
fn test_version_of_failing_tool() {
    let converter = converter("fail");
    let err = converter.version().unwrap_err();
    assert!(err.to_string().contains("Error! Could not read input"));
}

#[test]
fn test_validation_happens_before_spawn() {
    let mut converter = converter("fail");
    converter.output_file("target.webp");

    let err = converter.run().unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, ConverterError::UndefinedInput));
}
