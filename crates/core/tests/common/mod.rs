//! Shared helpers for converter integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use webpbin_core::image::{Delay, Frame, Rgba, RgbaImage};
use webpbin_core::{load_config_from_env, Gif2WebP, GifAnimation};

/// Small three-frame animation cycling red, green and blue.
pub fn sample_animation() -> GifAnimation {
    let frames = [
        Rgba([255, 0, 0, 255]),
        Rgba([0, 255, 0, 255]),
        Rgba([0, 0, 255, 255]),
    ]
    .into_iter()
    .map(|color| {
        Frame::from_parts(
            RgbaImage::from_pixel(16, 16, color),
            0,
            0,
            Delay::from_numer_denom_ms(80, 1),
        )
    })
    .collect();
    GifAnimation::from_frames(frames)
}

pub fn sample_gif_bytes() -> Vec<u8> {
    sample_animation()
        .encode()
        .expect("Failed to encode sample GIF")
}

/// Writes the sample animation to `dir/source.gif`.
pub fn write_sample_gif(dir: &Path) -> PathBuf {
    let path = dir.join("source.gif");
    std::fs::write(&path, sample_gif_bytes()).expect("Failed to write sample GIF");
    path
}

/// Set to make end-to-end tests fail instead of skip without gif2webp.
pub const REQUIRE_ENV: &str = "WEBPBIN_REQUIRE_GIF2WEBP";

/// Whether a missing gif2webp must fail the test: either required
/// explicitly, or a binary was configured and should therefore work.
pub fn tool_required() -> bool {
    let required = std::env::var(REQUIRE_ENV)
        .map(|value| !value.is_empty() && value != "0")
        .unwrap_or(false);
    required || std::env::var_os("WEBPBIN_GIF2WEBP__BINARY_PATH").is_some()
}

/// A converter for the installed gif2webp, or `None` when the tool is
/// missing and not required so the calling test can bail out.
pub fn installed_converter<'a>() -> Option<Gif2WebP<'a>> {
    let config = load_config_from_env().expect("Failed to load config from env");
    let converter = Gif2WebP::new(&config.gif2webp);
    match converter.version() {
        Ok(_) => Some(converter),
        Err(e) if tool_required() => panic!(
            "gif2webp at {:?} is required but unusable: {}",
            converter.binary_path(),
            e
        ),
        Err(e) => {
            eprintln!("skipping: gif2webp unavailable ({})", e);
            None
        }
    }
}

/// Checks the RIFF/WEBP container header.
pub fn assert_webp(bytes: &[u8]) {
    assert!(bytes.len() > 12, "WebP output too short: {} bytes", bytes.len());
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WEBP");
}

pub fn assert_webp_file(path: &Path) {
    let bytes = std::fs::read(path).expect("Failed to read WebP output");
    assert_webp(&bytes);
}
