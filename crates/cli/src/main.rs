use std::io::{self, Cursor, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webpbin_core::{
    load_config, load_config_from_env, validate_config, Config, Gif2WebP, GifAnimation,
};

/// Command-line token for stdin/stdout.
const STD_STREAM: &str = "-";

#[derive(Parser)]
#[command(name = "webpbin")]
#[command(about = "Convert animated GIFs to WebP using gif2webp")]
#[command(version)]
struct Cli {
    /// TOML configuration file; WEBPBIN_* environment variables override it
    #[arg(long, global = true, env = "WEBPBIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a GIF to WebP
    Convert(ConvertArgs),
    /// Print the gif2webp version
    Version,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input GIF, or "-" to read stdin
    input: String,

    /// Output WebP, or "-" to write stdout
    #[arg(short, long)]
    output: String,

    /// Compression factor for RGB channels (0-100, above 100 is treated as 100)
    #[arg(short, long)]
    quality: Option<u32>,

    /// Decode the GIF here and hand gif2webp the re-encoded frames
    #[arg(long)]
    decode: bool,

    /// Encode frames with lossy compression
    #[arg(long)]
    lossy: bool,

    /// Choose lossy or lossless per frame
    #[arg(long)]
    mixed: bool,

    /// Compression method (0 fastest, 6 slowest)
    #[arg(short, long)]
    method: Option<u32>,

    /// Minimize output size
    #[arg(long)]
    min_size: bool,

    /// Use multi-threading when available
    #[arg(long = "mt")]
    multi_threaded: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Logs go to stderr; stdout may carry WebP bytes
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to load config from environment")?,
    };
    validate_config(&config).context("Configuration validation failed")?;

    match cli.command {
        Commands::Convert(args) => convert(&config, args),
        Commands::Version => version(&config),
    }
}

fn version(config: &Config) -> Result<()> {
    let converter = Gif2WebP::new(&config.gif2webp);
    let version = converter
        .version()
        .context("Failed to query gif2webp version")?;
    println!("{}", version);
    Ok(())
}

fn convert(config: &Config, args: ConvertArgs) -> Result<()> {
    let mut converter = Gif2WebP::new(&config.gif2webp);
    info!("Using gif2webp at {:?}", converter.binary_path());

    if let Some(quality) = args.quality {
        converter.quality(quality);
    }
    if let Some(method) = args.method {
        converter.method(method);
    }
    converter
        .lossy(args.lossy)
        .mixed(args.mixed)
        .min_size(args.min_size)
        .multi_threaded(args.multi_threaded);

    match (args.input.as_str(), args.decode) {
        (STD_STREAM, true) => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read GIF from stdin")?;
            let animation =
                GifAnimation::decode(Cursor::new(bytes)).context("Failed to decode GIF")?;
            info!("Decoded {} frames from stdin", animation.frame_count());
            converter.input_image(animation);
        }
        (STD_STREAM, false) => {
            converter.input_stream(io::stdin().lock());
        }
        (path, true) => {
            let animation = GifAnimation::open(path)
                .with_context(|| format!("Failed to decode GIF {:?}", path))?;
            info!("Decoded {} frames from {:?}", animation.frame_count(), path);
            converter.input_image(animation);
        }
        (path, false) => {
            converter.input_file(path);
        }
    }

    if args.output == STD_STREAM {
        converter.output_stream(io::stdout().lock());
    } else {
        converter.output_file(&args.output);
    }

    converter.run().context("Conversion failed")?;
    Ok(())
}
