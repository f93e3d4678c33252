//! Configuration commands.

use std::path::Path;

use crate::config::{ClientConfig, CredentialOverrides};
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    print!("{}", render_dump(config, path)?);
    Ok(())
}

fn render_dump(config: &ClientConfig, path: &Path) -> ClientResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!("# config.toml ({})\n{}", path.display(), toml_str))
}

/// Validate the configuration, including Google credentials if any are set.
pub fn validate(config: &ClientConfig, overrides: &CredentialOverrides) -> ClientResult<()> {
    config.report.validate().map_err(ClientError::Config)?;

    let has_credentials = config.google.is_some()
        || overrides.client_id.is_some()
        || overrides.credentials_file.is_some();
    if has_credentials {
        config.google_config(overrides)?;
        println!("Google credentials are valid.");
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
