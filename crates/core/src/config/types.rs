use serde::{Deserialize, Serialize};

use crate::converter::BinaryConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Locating strategy for the gif2webp binary
    #[serde(default)]
    pub gif2webp: BinaryConfig,
}
