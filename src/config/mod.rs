//! Configuration loading.
//!
//! Settings come from three layers, later ones winning: the TOML
//! configuration file (created from the embedded default on first run),
//! `FOLIO_`-prefixed environment variables, and command-line flags (applied
//! by the binary after loading).

use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::info;
use serde::Deserialize;

/// Resolved settings for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the accounting API.
    pub base_url: String,
    /// Opaque API session token, sent as `x-auth-token`.
    pub auth_token: Option<String>,
    /// Opaque portfolio selector, sent as `x-portfolio-token`.
    pub portfolio_token: Option<String>,
    /// Directory export documents are delivered to.
    pub output_dir: String,
}

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

pub fn load_configuration(path: &Path) -> Result<Settings> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let cfg = Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(Environment::with_prefix("FOLIO").prefix_separator("_").separator("__"))
        .build()
        .context("Could not build config")?;

    cfg.try_deserialize().context("Invalid configuration")
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_is_bootstrapped_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/config.toml");

        let settings = load_configuration(&path).unwrap();

        assert!(path.exists());
        assert_eq!(settings.base_url, "https://api.koinly.io");
        assert_eq!(settings.output_dir, "data/exports");
        assert!(settings.auth_token.is_none());
    }

    #[test]
    fn file_values_are_picked_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_config_to(
            &path,
            "base_url = \"http://localhost:9999\"\nauth_token = \"abc\"\nportfolio_token = \"def\"\noutput_dir = \"out\"",
        )
        .unwrap();

        let settings = load_configuration(&path).unwrap();

        assert_eq!(settings.base_url, "http://localhost:9999");
        assert_eq!(settings.auth_token.as_deref(), Some("abc"));
        assert_eq!(settings.portfolio_token.as_deref(), Some("def"));
        assert_eq!(settings.output_dir, "out");
    }
}
