//
//  deployer-client
//  cli/org.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Organization commands
//!
//! An organization is registered on the Deployer side once. Registration
//! generates its password, keeps it in the OS keyring and writes the returned
//! login to the config file. Deleting it also drops the keyring password.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::resources::{RegisteredUser, RemoteOrganization};
use crate::auth::KeyringCipher;
use crate::org::ConfigOrganizationStore;
use crate::output::{display_value, print_field, print_header, TableOutput};

use super::GlobalOptions;

/// Manage the organization's Deployer account
#[derive(Args, Debug)]
pub struct OrgCommand {
    #[command(subcommand)]
    pub command: OrgSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OrgSubcommand {
    /// Show the organization as Deployer knows it
    #[command(visible_alias = "view")]
    Show,

    /// Register the organization with Deployer
    Register,

    /// Delete the organization on the Deployer side
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Deployer organization id (looked up by name when omitted)
    pub id: Option<u64>,

    /// Skip the safety check
    #[arg(long)]
    pub confirm: bool,
}

impl TableOutput for RemoteOrganization {
    fn print_table(&self, color: bool) {
        print_header(&self.name);
        print_field("ID", &self.id.to_string(), color);
        for (key, value) in &self.attributes {
            print_field(key, &display_value(value), color);
        }
    }
}

impl TableOutput for RegisteredUser {
    fn print_table(&self, color: bool) {
        print_field("Login", &self.login, color);
        if let Some(id) = self.organization_id {
            print_field("Organization ID", &id.to_string(), color);
        }
    }
}

impl OrgCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            OrgSubcommand::Show => self.show(global).await,
            OrgSubcommand::Register => self.register(global).await,
            OrgSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn show(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        match client.organization().await? {
            Some(remote) => output.write(&remote),
            None => {
                output.write_warning(&format!(
                    "Organization '{}' is not registered with Deployer.",
                    client.session().organization().name
                ));
                Ok(())
            }
        }
    }

    async fn register(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let client = global.connect_with(&config)?;
        let output = global.output();

        let mut organization = client.session().organization().clone();
        if organization.deploy_login.is_some() {
            bail!(
                "Organization '{}' is already registered as '{}'.",
                organization.name,
                organization.deploy_login.as_deref().unwrap_or_default()
            );
        }

        let store = ConfigOrganizationStore::new(global.config_path()?);
        match client.add_organization(&mut organization, &store).await? {
            Some(user) => {
                output.write_success(&format!("Registered {} as {}", organization.name, user.login));
                if global.json {
                    output.write(&user)?;
                }
                Ok(())
            }
            None => bail!(
                "Registration of '{}' failed. Run with DEPLOYER_LOG=debug for details.",
                organization.name
            ),
        }
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let name = client.session().organization().name.clone();

        if !args.confirm {
            bail!("Deleting '{}' removes its targets and links on Deployer. Re-run with --confirm.", name);
        }

        let id = match args.id {
            Some(id) => id,
            None => match client.organization().await? {
                Some(remote) => remote.id,
                None => bail!("Organization '{}' is not registered with Deployer.", name),
            },
        };

        client.delete_organization(id).await?;

        if let Err(e) = KeyringCipher::new().forget(client.session().organization().id) {
            tracing::warn!("failed to remove the keyring password for {}: {}", name, e);
        }

        if global.json {
            let result = serde_json::json!({ "success": true, "deleted": id });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Deleted organization {}", style("✓").green(), style(&name).red());
        }
        Ok(())
    }
}
