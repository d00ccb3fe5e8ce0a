use std::path::Path;

use super::{AppConfig, ConfigError, API_BASE_ENV, API_KEY_ENV, PORT_ENV};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;

    Ok(config)
}

/// Apply environment overrides on top of a loaded configuration.
///
/// `lookup` resolves a variable name to its value; the binary passes
/// `std::env::var`, tests pass a map.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        config.backend.api_key = Some(key);
    }

    if let Some(port) = lookup(PORT_ENV) {
        config.server.port = port.trim().parse().map_err(|_| {
            ConfigError::Validation(format!("{} must be a port number, got {:?}", PORT_ENV, port))
        })?;
    }

    if let Some(url) = lookup(API_BASE_ENV).filter(|u| !u.trim().is_empty()) {
        config.backend.url = url;
    }

    Ok(())
}
