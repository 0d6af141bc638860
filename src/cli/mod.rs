//
//  deployer-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod completion;
mod link;
mod org;
mod project;
mod recipe;
mod target;
mod wizard;

pub use api::ApiCommand;
pub use completion::CompletionCommand;
pub use link::LinkCommand;
pub use org::OrgCommand;
pub use project::ProjectCommand;
pub use recipe::RecipeCommand;
pub use target::TargetCommand;
pub use wizard::WizardCommand;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use crate::api::{DeployerClient, Params};
use crate::auth::{KeyringCipher, Session};
use crate::config::Config;
use crate::org::Organization;
use crate::output::{OutputFormat, OutputWriter};

/// Deployer CLI - Manage deploy targets, recipes and deployments
#[derive(Parser, Debug)]
#[command(
    name = "deployer",
    version,
    about = "Manage Deployer targets, recipes and deployments from the command line",
    long_about = "deployer talks to the Deployer provisioning API on behalf of a customer organization.\n\n\
                  It manages projects, deploy targets and their settings, links recipes to targets, \
                  answers recipe questions and hands deployments off to the browser.",
    propagate_version = true,
    after_help = "Use 'deployer <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Path to the configuration file
    #[arg(long, global = true, env = "DEPLOYER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Environment block to use (defaults to DEPLOYER_ENV, then "development")
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// Organization to act for
    #[arg(long, short = 'o', global = true, env = "DEPLOYER_ORG")]
    pub org: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// The configured output writer.
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }

    /// Path of the configuration file in use.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_path(),
        }
    }

    /// Loads the configuration file in use.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_from(&self.config_path()?)
    }

    /// Name of the environment block to use.
    pub fn environment_name(&self) -> String {
        self.env
            .clone()
            .unwrap_or_else(Config::active_environment_name)
    }

    /// The organization record to act for.
    ///
    /// `--org` picks one by name; without it the configuration must hold exactly
    /// one organization.
    pub fn organization(&self, config: &Config) -> Result<Organization> {
        if let Some(name) = &self.org {
            return config
                .organizations
                .get(name)
                .cloned()
                .with_context(|| format!("Unknown organization '{name}'. Add it to the config file."));
        }
        let mut organizations = config.organizations.values();
        match (organizations.next(), organizations.next()) {
            (Some(organization), None) => Ok(organization.clone()),
            (None, _) => bail!("No organizations configured. Add one to the config file."),
            (Some(_), Some(_)) => bail!("Several organizations configured. Pick one with --org."),
        }
    }

    /// Builds a client for the selected environment and organization.
    pub fn connect(&self) -> Result<DeployerClient> {
        let config = self.load_config()?;
        self.connect_with(&config)
    }

    /// Builds a client from an already loaded configuration.
    pub fn connect_with(&self, config: &Config) -> Result<DeployerClient> {
        let environment = config.environment(&self.environment_name())?;
        let organization = self.organization(config)?;
        tracing::debug!(organization = %organization.name, url = %environment.url, "connecting");

        let session = Session::new(organization, Arc::new(KeyringCipher::new()));
        let client = DeployerClient::new(environment, session)?
            .with_categories(Arc::new(config.category_resolver()));
        Ok(client)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the organization's Deployer account
    Org(OrgCommand),

    /// Manage projects
    #[command(visible_alias = "proj")]
    Project(ProjectCommand),

    /// Manage deploy targets and their settings
    Target(TargetCommand),

    /// Manage links between targets and recipes
    Link(LinkCommand),

    /// Browse published recipes
    Recipe(RecipeCommand),

    /// Answer recipe questions
    Wizard(WizardCommand),

    /// Make API requests
    Api(ApiCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

/// Parses `key=value` fields into request parameters.
///
/// Values are read as JSON scalars where possible (`true`, `3`, `null`), then
/// as JSON arrays or objects, and otherwise kept as strings. Dotted keys build
/// nested objects.
pub(crate) fn parse_fields(fields: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for field in fields {
        let Some((key, raw)) = field.split_once('=') else {
            bail!("Invalid field format: {}. Expected key=value", field);
        };
        set_nested_value(&mut params, key, parse_value(raw));
    }
    Ok(params)
}

fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let nested = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !nested.is_object() {
                *nested = Value::Object(Map::new());
            }
            if let Value::Object(nested) = nested {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use serde_json::json;

    #[test]
    fn test_parse_fields() {
        let fields = vec![
            "name=web".to_string(),
            "port=22".to_string(),
            "enabled=true".to_string(),
            "aws.region=eu-west-1".to_string(),
            "tags=[\"a\"]".to_string(),
        ];
        let params = parse_fields(&fields).unwrap();
        assert_eq!(
            Value::Object(params),
            json!({
                "name": "web",
                "port": 22,
                "enabled": true,
                "aws": { "region": "eu-west-1" },
                "tags": ["a"]
            })
        );
        assert!(parse_fields(&["novalue".to_string()]).is_err());
    }

    fn config_with(names: &[&str]) -> Config {
        let mut config = Config::default();
        for (id, name) in names.iter().enumerate() {
            config.organizations.insert(
                name.to_string(),
                Organization {
                    id: id as u64 + 1,
                    name: name.to_string(),
                    ..Default::default()
                },
            );
        }
        config
    }

    #[test]
    fn test_organization_selection() {
        let global = GlobalOptions::default();
        assert_eq!(global.organization(&config_with(&["acme"])).unwrap().name, "acme");
        assert!(global.organization(&config_with(&[])).is_err());
        assert!(global.organization(&config_with(&["acme", "globex"])).is_err());

        let global = GlobalOptions {
            org: Some("globex".into()),
            ..Default::default()
        };
        assert_eq!(global.organization(&config_with(&["acme", "globex"])).unwrap().id, 2);
    }

    #[test]
    fn test_connect_requires_environment_block() {
        let global = GlobalOptions {
            env: Some("staging".into()),
            ..Default::default()
        };
        let mut config = config_with(&["acme"]);
        let err = global.connect_with(&config).unwrap_err();
        assert!(err.downcast_ref::<crate::DeployerError>().is_some());

        config.environments.insert(
            "staging".into(),
            EnvironmentConfig {
                url: "https://deployer.example.test".into(),
                deploy: "https://deploy.example.test".into(),
                timeout_secs: 5,
            },
        );
        let client = global.connect_with(&config).unwrap();
        assert_eq!(client.base_url(), "https://deployer.example.test");
    }
}
