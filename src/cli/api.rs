//
//  deployer-client
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends a request through the same gateway the other commands use: the path
//! is normalized to `api/<path>.json` and the organization's session token is
//! added unless `--no-auth` is given. It's useful for endpoints no other
//! command covers, or for debugging.
//!
//! ## Examples
//!
//! ```bash
//! # List the targets of a project
//! deployer api get org_deploy_target -F project_name=shop
//!
//! # Update a target-recipe link
//! deployer api put org_deploy_target_pub_recipe/31 -F comments="nightly"
//!
//! # Log in by hand
//! deployer api get sessions/get --no-auth -F login=acme -F password=secret
//! ```

use anyhow::Result;
use clap::Args;

use super::{parse_fields, GlobalOptions};

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// HTTP method: get, put, post, delete, options or head
    pub method: String,

    /// Resource path, e.g. org_deploy_target/4
    pub path: String,

    /// Add a parameter as key=value (repeat for several)
    ///
    /// Values are parsed as JSON when possible: true, false, null, numbers,
    /// arrays and objects. Use dot notation for nested keys: -F aws.region=eu-west-1
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Send without the session token
    #[arg(long)]
    pub no_auth: bool,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let params = parse_fields(&self.field)?;
        let client = global.connect()?;
        let output = global.output();

        match client
            .request(&self.method, &self.path, params, self.no_auth)
            .await?
        {
            Some(body) => output.write_value(&body),
            None => {
                output.write_warning("Deployer returned no data (non-200 response).");
                Ok(())
            }
        }
    }
}
