//! gif2webp version query.

use std::path::Path;
use std::process::{Command, Stdio};

use super::error::ConverterError;
use super::gif2webp::spawn_error;

/// Runs `<binary> -version` and returns the reported version.
pub(crate) fn query_version(binary: &Path) -> Result<String, ConverterError> {
    let output = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(binary, e))?;

    if !output.status.success() {
        return Err(ConverterError::execution_failed(
            output.status.to_string(),
            String::from_utf8_lossy(&output.stderr),
        ));
    }

    parse_version(&String::from_utf8_lossy(&output.stdout))
}

/// Newer libwebp builds append library versions on extra lines
/// (`libsharpyuv: 0.4.0`); only the first line is the tool's own.
pub(crate) fn parse_version(output: &str) -> Result<String, ConverterError> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConverterError::VersionParse {
            output: output.to_string(),
        })
}
