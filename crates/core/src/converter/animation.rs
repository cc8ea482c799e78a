//! Decoded animated GIFs kept in memory.

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::metadata::LoopCount;
use image::{AnimationDecoder, Frame, ImageResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// An animated image held as decoded RGBA frames.
///
/// This is what `Gif2WebP::input_image` consumes. Before the converter runs it
/// is encoded back into a GIF container and piped to gif2webp.
#[derive(Clone)]
pub struct GifAnimation {
    frames: Vec<Frame>,
    repeat: Repeat,
}

impl std::fmt::Debug for GifAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifAnimation")
            .field("frames", &self.frames.len())
            .field("dimensions", &self.dimensions())
            .field("repeat", &self.repeat)
            .finish()
    }
}

impl GifAnimation {
    /// Builds an animation that loops forever.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            repeat: Repeat::Infinite,
        }
    }

    /// Sets the loop behaviour written into the re-encoded GIF.
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Decodes every frame of a GIF stream, keeping its loop count.
    pub fn decode<R: BufRead + Seek>(reader: R) -> ImageResult<Self> {
        let decoder = GifDecoder::new(reader)?;
        let repeat = match decoder.loop_count() {
            LoopCount::Infinite => Repeat::Infinite,
            LoopCount::Finite(n) => Repeat::Finite(u16::try_from(n.get()).unwrap_or(u16::MAX)),
        };
        let frames = decoder.into_frames().collect_frames()?;
        Ok(Self::from_frames(frames).with_repeat(repeat))
    }

    /// Decodes a GIF file.
    pub fn open(path: impl AsRef<Path>) -> ImageResult<Self> {
        let file = File::open(path)?;
        Self::decode(BufReader::new(file))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// Canvas size, taken from the first frame. `(0, 0)` when empty.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| f.buffer().dimensions())
            .unwrap_or((0, 0))
    }

    /// Encodes the frames back into GIF bytes.
    pub fn encode(&self) -> ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(self.repeat)?;
            encoder.encode_frames(self.frames.iter().cloned())?;
        }
        Ok(bytes)
    }
}
