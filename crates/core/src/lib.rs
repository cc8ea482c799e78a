pub mod config;
pub mod converter;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError,
};
pub use converter::{
    BinaryConfig, ConverterError, EncoderOptions, Gif2WebP, GifAnimation, Input, Output, Repeat,
};

pub use image;
