use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - The executable name is not empty
/// - An explicit binary path, when given, is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let binary = &config.gif2webp;

    if binary.exe_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "gif2webp.exe_name cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &binary.binary_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "gif2webp.binary_path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
