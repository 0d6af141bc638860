//
//  deployer-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads the client's configuration from a TOML file stored in a platform-specific
//! directory.
//!
//! ## Overview
//!
//! - **Environments**: one block per deployment environment with the API base URL,
//!   the browser deploy-flow base URL and the request timeout. The active block is
//!   chosen by `DEPLOYER_ENV` (default `development`); a missing block is fatal.
//! - **Categories**: free-form target type references mapped to a canonical type.
//! - **Organizations**: the local organization records the CLI acts for.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/deployer/config.toml`
//! - **macOS**: `~/Library/Application Support/deployer/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\deployer\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [environments.production]
//! url = "https://deployer.example.com"
//! deploy = "https://deploy.example.com"
//! timeout_secs = 20
//!
//! [categories]
//! "Amazon EC2" = "aws"
//! "Google App Engine" = "gae"
//!
//! [organizations.acme]
//! id = 42
//! name = "acme"
//! owner_email = "ops@acme.test"
//! deploy_login = "acme"
//! deploy_password = "keyring:organization-42"
//!
//! [organizations.acme.limits]
//! deploy_destinations_limit = 3
//! ```

mod categories;

pub use categories::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::DeployerError;
use crate::org::Organization;

/// Environment variable selecting the active environment block.
pub const ENVIRONMENT_VAR: &str = "DEPLOYER_ENV";

/// Environment used when [`ENVIRONMENT_VAR`] is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Top-level configuration.
///
/// All sections default to empty so a partial file still loads; missing pieces
/// are reported when they are looked up.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Environment blocks keyed by environment name.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,

    /// Target type references mapped to canonical types (`ssh`, `gae`, `aws`, `for`).
    #[serde(default)]
    pub categories: BTreeMap<String, String>,

    /// Local organization records keyed by organization name.
    #[serde(default)]
    pub organizations: BTreeMap<String, Organization>,
}

/// Endpoints and transport settings for one environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    /// Base URL of the Deployer REST API.
    pub url: String,

    /// Base URL of the browser deploy flow.
    pub deploy: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`; a missing file yields the default.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Returns the path to the default configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Name of the active environment, from `DEPLOYER_ENV`.
    pub fn active_environment_name() -> String {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    /// Returns the block for environment `name`.
    ///
    /// # Errors
    ///
    /// [`DeployerError::Config`] when the block is missing.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig, DeployerError> {
        self.environments
            .get(name)
            .ok_or_else(|| DeployerError::Config(format!("Missing {name} block in deployer config")))
    }

    /// Builds the category resolver from the `[categories]` table.
    pub fn category_resolver(&self) -> StaticCategories {
        StaticCategories::from_table(&self.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[environments.production]
url = "https://deployer.example.com"
deploy = "https://deploy.example.com"

[categories]
"Amazon EC2" = "aws"

[organizations.acme]
id = 42
name = "acme"
owner_email = "ops@acme.test"
deploy_login = "acme"

[organizations.acme.limits]
deploy_destinations_limit = 3
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let production = config.environment("production").unwrap();
        assert_eq!(production.url, "https://deployer.example.com");
        assert_eq!(production.timeout_secs, 30);

        let acme = &config.organizations["acme"];
        assert_eq!(acme.id, 42);
        assert_eq!(acme.deploy_password, None);
        assert_eq!(acme.limits.deploy_destinations_limit, 3);
    }

    #[test]
    fn test_missing_environment_is_config_error() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let err = config.environment("staging").unwrap_err();
        assert!(matches!(err, DeployerError::Config(_)));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config: Config = toml::from_str(SAMPLE).unwrap();

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
