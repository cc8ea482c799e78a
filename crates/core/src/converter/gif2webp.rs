//! gif2webp-based converter implementation.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::animation::GifAnimation;
use super::config::BinaryConfig;
use super::error::ConverterError;
use super::types::{EncoderOptions, Input, Output};
use super::version::query_version;

/// Token gif2webp reads as "stdin" for input and "stdout" for `-o`.
const STD_STREAM: &str = "-";

/// Converts animated GIFs to WebP by running gif2webp.
///
/// Configuration is accumulated through the setters and kept across calls to
/// [`run`](Self::run); the argument list is rebuilt for every run.
///
/// ```ignore
/// use webpbin_core::Gif2WebP;
///
/// let mut converter = Gif2WebP::with_defaults();
/// converter
///     .input_file("source.gif")
///     .output_file("target.webp")
///     .quality(80);
/// converter.run()?;
/// ```
#[derive(Debug)]
pub struct Gif2WebP<'a> {
    binary: PathBuf,
    input: Input<'a>,
    output: Output<'a>,
    options: EncoderOptions,
}

impl<'a> Gif2WebP<'a> {
    /// Creates a converter using the binary located by `config`.
    pub fn new(config: &BinaryConfig) -> Self {
        Self {
            binary: config.resolve(),
            input: Input::Unset,
            output: Output::Unset,
            options: EncoderOptions::default(),
        }
    }

    /// Creates a converter with the default locating strategy.
    pub fn with_defaults() -> Self {
        Self::new(&BinaryConfig::default())
    }

    /// Path of the executable this converter spawns.
    pub fn binary_path(&self) -> &Path {
        &self.binary
    }

    pub fn input(&self) -> &Input<'a> {
        &self.input
    }

    pub fn output(&self) -> &Output<'a> {
        &self.output
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Reports the version of the gif2webp binary.
    pub fn version(&self) -> Result<String, ConverterError> {
        query_version(&self.binary)
    }

    /// Sets a GIF file to convert. Replaces any stream or image input.
    pub fn input_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.input = Input::File(path.into());
        self
    }

    /// Sets a reader producing GIF bytes. Replaces any file or image input.
    pub fn input_stream(&mut self, reader: impl Read + 'a) -> &mut Self {
        self.input = Input::Stream(Box::new(reader));
        self
    }

    /// Sets a decoded animation to convert. Replaces any file or stream input.
    pub fn input_image(&mut self, image: GifAnimation) -> &mut Self {
        self.input = Input::Image(image);
        self
    }

    /// Sets the WebP file to write. Replaces any output stream.
    pub fn output_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output = Output::File(path.into());
        self
    }

    /// Sets a writer receiving the WebP bytes. Replaces any output file.
    pub fn output_stream(&mut self, writer: impl Write + 'a) -> &mut Self {
        self.output = Output::Stream(Box::new(writer));
        self
    }

    /// Compression factor for RGB channels between 0 and 100; gif2webp
    /// defaults to 75. Values above 100 are stored as 100.
    ///
    /// A small factor produces a smaller file with lower quality. Best
    /// quality is achieved with 100.
    pub fn quality(&mut self, quality: u32) -> &mut Self {
        self.options.quality = Some(quality.min(EncoderOptions::MAX_QUALITY));
        self
    }

    /// Encode frames with lossy compression.
    pub fn lossy(&mut self, lossy: bool) -> &mut Self {
        self.options.lossy = lossy;
        self
    }

    /// Let gif2webp choose lossy or lossless per frame.
    pub fn mixed(&mut self, mixed: bool) -> &mut Self {
        self.options.mixed = mixed;
        self
    }

    /// Compression method between 0 (fastest) and 6 (slowest, smallest).
    /// Values above 6 are stored as 6.
    pub fn method(&mut self, method: u32) -> &mut Self {
        self.options.method = Some(method.min(EncoderOptions::MAX_METHOD));
        self
    }

    /// Trade encoding speed for the smallest output.
    pub fn min_size(&mut self, min_size: bool) -> &mut Self {
        self.options.min_size = min_size;
        self
    }

    pub fn multi_threaded(&mut self, multi_threaded: bool) -> &mut Self {
        self.options.multi_threaded = multi_threaded;
        self
    }

    /// Restores the encoder options to the gif2webp defaults.
    /// Input and output are left untouched.
    pub fn reset(&mut self) -> &mut Self {
        self.options = EncoderOptions::default();
        self
    }

    /// Arguments the next [`run`](Self::run) would pass to gif2webp.
    ///
    /// Paths are passed through as-is, including ones that are not UTF-8.
    pub fn args(&self) -> Result<Vec<OsString>, ConverterError> {
        let mut flags = Vec::new();
        self.options.push_args(&mut flags);
        let mut args: Vec<OsString> = flags.into_iter().map(OsString::from).collect();

        let output = match &self.output {
            Output::Stream(_) => OsString::from(STD_STREAM),
            Output::File(path) => path.clone().into_os_string(),
            Output::Unset => return Err(ConverterError::UndefinedOutput),
        };
        args.extend([OsString::from("-o"), output]);

        match &self.input {
            Input::Stream(_) | Input::Image(_) => {
                args.extend([OsString::from("--"), OsString::from(STD_STREAM)]);
            }
            Input::File(path) => args.push(path.clone().into_os_string()),
            Input::Unset => return Err(ConverterError::UndefinedInput),
        }

        Ok(args)
    }

    /// Runs gif2webp and blocks until it exits.
    ///
    /// Fails with [`ConverterError::UndefinedOutput`] or
    /// [`ConverterError::UndefinedInput`] before spawning anything when the
    /// converter is not fully configured.
    pub fn run(&mut self) -> Result<(), ConverterError> {
        let start = Instant::now();
        let args = self.args()?;
        let stdin_bytes = self.stdin_bytes()?;

        debug!(
            "Running {} {}",
            self.binary.display(),
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let result = self.execute(&args, stdin_bytes);
        match &result {
            Ok(()) => info!(
                "gif2webp finished in {} ms",
                start.elapsed().as_millis()
            ),
            Err(e) => warn!("gif2webp failed: {}", e),
        }
        result
    }

    /// Bytes to feed through stdin, if the input is piped.
    fn stdin_bytes(&mut self) -> Result<Option<Vec<u8>>, ConverterError> {
        match &mut self.input {
            Input::Stream(reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
            Input::Image(image) => Ok(Some(image.encode()?)),
            Input::File(_) => Ok(None),
            Input::Unset => Err(ConverterError::UndefinedInput),
        }
    }

    fn execute(
        &mut self,
        args: &[OsString],
        stdin_bytes: Option<Vec<u8>>,
    ) -> Result<(), ConverterError> {
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(if stdin_bytes.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(if self.output.is_piped() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&self.binary, e))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let output = &mut self.output;

        // stdin and stderr are serviced on scoped threads so a full pipe on
        // one side cannot stall the process while we copy stdout here.
        let (fed, copied, stderr_text) = thread::scope(|scope| {
            let feeder = scope.spawn(move || -> io::Result<()> {
                if let (Some(mut stdin), Some(bytes)) = (stdin, stdin_bytes) {
                    stdin.write_all(&bytes)?;
                }
                Ok(())
            });
            let collector = scope.spawn(move || {
                let mut bytes = Vec::new();
                if let Some(mut stderr) = stderr {
                    if let Err(e) = stderr.read_to_end(&mut bytes) {
                        warn!("Failed to read gif2webp stderr: {}", e);
                    }
                }
                String::from_utf8_lossy(&bytes).into_owned()
            });

            let copied = match (stdout, output) {
                (Some(mut stdout), Output::Stream(sink)) => {
                    let copied = io::copy(&mut stdout, &mut *sink).and_then(|_| sink.flush());
                    if copied.is_err() {
                        let _ = io::copy(&mut stdout, &mut io::sink());
                    }
                    copied
                }
                _ => Ok(()),
            };

            let fed = feeder
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            let stderr_text = collector.join().unwrap_or_default();
            (fed, copied, stderr_text)
        });

        let status = child
            .wait()
            .map_err(|e| ConverterError::execution_failed(e.to_string(), stderr_text.clone()))?;

        check_status(status, &stderr_text)?;
        // A successful tool may exit before consuming all of stdin
        let fed = fed.or_else(|e| match e.kind() {
            io::ErrorKind::BrokenPipe => Ok(()),
            _ => Err(e),
        });
        fed.map_err(|e| {
            ConverterError::execution_failed(format!("writing to stdin: {}", e), &stderr_text)
        })?;
        copied.map_err(|e| {
            ConverterError::execution_failed(format!("reading from stdout: {}", e), &stderr_text)
        })?;

        Ok(())
    }
}

fn check_status(status: ExitStatus, stderr: &str) -> Result<(), ConverterError> {
    if status.success() {
        Ok(())
    } else {
        Err(ConverterError::execution_failed(status.to_string(), stderr))
    }
}

/// Maps a failed spawn to an execution error naming the binary.
pub(crate) fn spawn_error(binary: &Path, e: io::Error) -> ConverterError {
    if e.kind() == io::ErrorKind::NotFound {
        ConverterError::execution_failed(
            format!("gif2webp not found at path: {}", binary.display()),
            "",
        )
    } else {
        ConverterError::execution_failed(format!("failed to start {}: {}", binary.display(), e), "")
    }
}
