//! Input, output and option types for the converter.

use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;

use super::animation::GifAnimation;

/// Where the GIF comes from. Only one source is active at a time.
#[derive(Default)]
pub enum Input<'a> {
    #[default]
    Unset,
    /// GIF file on disk, passed to gif2webp as a positional argument.
    File(PathBuf),
    /// Decoded animation, re-encoded to GIF and piped through stdin.
    Image(GifAnimation),
    /// Raw GIF bytes piped through stdin.
    Stream(Box<dyn Read + 'a>),
}

impl fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Image(animation) => f.debug_tuple("Image").field(animation).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Where the WebP goes. Only one sink is active at a time.
#[derive(Default)]
pub enum Output<'a> {
    #[default]
    Unset,
    /// WebP file written by gif2webp itself.
    File(PathBuf),
    /// Sink receiving everything gif2webp writes to stdout.
    Stream(Box<dyn Write + 'a>),
}

impl Output<'_> {
    /// Whether gif2webp writes to its stdout.
    pub fn is_piped(&self) -> bool {
        matches!(self, Self::Stream(_))
    }
}

impl fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Encoder flags forwarded to gif2webp. `None`/`false` leaves the tool default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    /// `-q`: compression factor for RGB channels, 0..=100.
    pub quality: Option<u32>,
    /// `-lossy`: encode frames with lossy compression.
    pub lossy: bool,
    /// `-mixed`: pick lossy or lossless per frame.
    pub mixed: bool,
    /// `-m`: compression method, 0 (fast) ..= 6 (slowest).
    pub method: Option<u32>,
    /// `-min_size`: minimize output size. Slow.
    pub min_size: bool,
    /// `-mt`: use multi-threading when available.
    pub multi_threaded: bool,
}

impl EncoderOptions {
    pub const MAX_QUALITY: u32 = 100;
    pub const MAX_METHOD: u32 = 6;

    /// Appends the flags in the order gif2webp documents them.
    pub fn push_args(&self, args: &mut Vec<String>) {
        if let Some(quality) = self.quality {
            args.extend(["-q".to_string(), quality.to_string()]);
        }
        if self.lossy {
            args.push("-lossy".to_string());
        }
        if self.mixed {
            args.push("-mixed".to_string());
        }
        if let Some(method) = self.method {
            args.extend(["-m".to_string(), method.to_string()]);
        }
        if self.min_size {
            args.push("-min_size".to_string());
        }
        if self.multi_threaded {
            args.push("-mt".to_string());
        }
    }
}
