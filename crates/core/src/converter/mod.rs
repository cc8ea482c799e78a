//! Converter module for turning animated GIFs into WebP.
//!
//! This module does no encoding itself. It drives the `gif2webp` tool from
//! libwebp: builds its command line, feeds it the GIF and collects the WebP.
//!
//! # Inputs and outputs
//!
//! - Input: a GIF file path, a [`GifAnimation`] held in memory, or any reader
//!   producing GIF bytes. The last one set wins.
//! - Output: a WebP file path or any writer. The last one set wins.
//!
//! # Example
//!
//! ```ignore
//! use webpbin_core::converter::{BinaryConfig, Gif2WebP, GifAnimation};
//!
//! let mut converter = Gif2WebP::new(&BinaryConfig::default());
//! println!("gif2webp {}", converter.version()?);
//!
//! // File to file
//! converter.input_file("source.gif").output_file("target.webp").quality(80);
//! converter.run()?;
//!
//! // Decoded animation to memory
//! let mut webp: Vec<u8> = Vec::new();
//! let mut converter = Gif2WebP::with_defaults();
//! converter
//!     .input_image(GifAnimation::open("source.gif")?)
//!     .output_stream(&mut webp);
//! converter.run()?;
//! ```

mod animation;
mod config;
mod error;
mod gif2webp;
mod types;
mod version;

pub use animation::GifAnimation;
pub use config::BinaryConfig;
pub use error::ConverterError;
pub use gif2webp::Gif2WebP;
pub use types::{EncoderOptions, Input, Output};

pub use image::codecs::gif::Repeat;
