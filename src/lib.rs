//
//  deployer-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Deployer Client Library
//!
//! A typed client for the Deployer provisioning API: the external service that owns
//! deploy targets, recipes and the question wizard used to configure a recipe before
//! it is deployed to a customer project.
//!
//! ## Overview
//!
//! The client is split into three layers:
//!
//! - **Session management** ([`auth`]): lazy password login per organization, with the
//!   resulting bearer token cached for the lifetime of the session.
//! - **Request gateway** ([`api::client`]): the single place where HTTP requests are
//!   built, authenticated, dispatched and decoded.
//! - **Resource operations** ([`api::resources`]): organizations, projects, deploy
//!   targets, recipes and the question wizard, each normalizing the API's inconsistent
//!   response envelopes into stable Rust types.
//!
//! ## Module Structure
//!
//! - [`api`]: Gateway, envelope decoding and resource operations
//! - [`auth`]: Session state and password storage
//! - [`config`]: Environment-keyed configuration and category lookup
//! - [`org`]: The local organization record and its persistence seam
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Table and JSON output for the CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deployer_client::{Config, DeployerClient};
//! use deployer_client::auth::{KeyringCipher, Session};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let environment = config.environment(&Config::active_environment_name())?;
//! let organization = config.organizations["acme"].clone();
//!
//! let session = Session::new(organization, Arc::new(KeyringCipher::new()));
//! let client = DeployerClient::new(environment, session)?;
//!
//! for target in client.deploy_targets("shop", None, None).await? {
//!     println!("{} ({} recipes)", target.name, target.recipes.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Deployer API access.
///
/// Contains the request gateway, the envelope decoding helpers and every
/// resource operation built on top of them.
pub mod api;

/// Session state and password storage.
pub mod auth;

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Configuration file management.
///
/// Configuration is stored in platform-specific locations:
/// - Linux: `~/.config/deployer/config.toml`
/// - macOS: `~/Library/Application Support/deployer/config.toml`
/// - Windows: `%APPDATA%\deployer\config.toml`
pub mod config;

/// The local organization record.
pub mod org;

/// Output formatting for the CLI (tables and JSON).
pub mod output;

#[cfg(test)]
mod testing;

pub use api::{DeployerClient, DeployerError};
pub use cli::Cli;
pub use config::Config;
pub use org::Organization;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "deployer";

/// Application version constant, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8+`: Configuration issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error, including transport failures against the Deployer API.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Raised for precondition violations detected before any request is sent,
    /// such as an unsupported HTTP method or too many SSH hosts.
    pub const USAGE: i32 = 2;

    /// Login to the Deployer API failed or credentials are missing.
    pub const AUTH_ERROR: i32 = 4;

    /// The configuration file is missing the active environment block.
    pub const CONFIG_ERROR: i32 = 8;
}
