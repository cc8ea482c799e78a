//! Where to find the gif2webp executable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Locating strategy for the gif2webp binary.
///
/// Resolution order: an explicit `binary_path`, then `exe_name` inside
/// `vendor_dir` if such a file exists, then the bare `exe_name` which the OS
/// looks up through `PATH` when the process is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// Explicit path to the gif2webp binary. Skips every other lookup.
    #[serde(default)]
    pub binary_path: Option<PathBuf>,

    /// Directory holding vendored libwebp tools.
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: PathBuf,

    /// Executable name, without platform suffix.
    #[serde(default = "default_exe_name")]
    pub exe_name: String,
}

fn default_vendor_dir() -> PathBuf {
    PathBuf::from("vendor/webp")
}

fn default_exe_name() -> String {
    "gif2webp".to_string()
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            vendor_dir: default_vendor_dir(),
            exe_name: default_exe_name(),
        }
    }
}

impl BinaryConfig {
    /// Creates a config pinned to a specific binary.
    pub fn with_path(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: Some(binary_path.into()),
            ..Default::default()
        }
    }

    /// Sets the vendor directory.
    pub fn with_vendor_dir(mut self, vendor_dir: impl Into<PathBuf>) -> Self {
        self.vendor_dir = vendor_dir.into();
        self
    }

    /// Sets the executable name.
    pub fn with_exe_name(mut self, exe_name: impl Into<String>) -> Self {
        self.exe_name = exe_name.into();
        self
    }

    /// Executable file name with the platform suffix (`.exe` on Windows).
    pub fn exe_file_name(&self) -> String {
        format!("{}{}", self.exe_name, std::env::consts::EXE_SUFFIX)
    }

    /// Resolves the program to hand to the OS.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.binary_path {
            debug!("Using configured gif2webp binary {:?}", path);
            return path.clone();
        }

        let vendored = self.vendor_dir.join(self.exe_file_name());
        if vendored.is_file() {
            debug!("Using vendored gif2webp binary {:?}", vendored);
            return vendored;
        }

        debug!("Looking up {} through PATH", self.exe_file_name());
        PathBuf::from(self.exe_file_name())
    }
}
