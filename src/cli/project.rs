//
//  deployer-client
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project commands

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::GlobalOptions;

/// Manage projects
#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// Show a project
    #[command(visible_alias = "view")]
    Show(ShowArgs),

    /// Create a project
    Create(CreateArgs),

    /// Delete a project
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project name
    pub name: String,

    /// Project description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project id
    pub id: u64,

    /// Skip the safety check
    #[arg(long)]
    pub confirm: bool,
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ProjectSubcommand::Show(args) => self.show(args, global).await,
            ProjectSubcommand::Create(args) => self.create(args, global).await,
            ProjectSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        match client.project(&args.name).await? {
            Some(project) => output.write_value(&project),
            None => bail!("Project '{}' not found.", args.name),
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        match client.add_project(&args.name, &args.description).await? {
            Some(created) => {
                output.write_success(&format!("Created project {}", args.name));
                if global.json {
                    output.write_value(&created)?;
                }
                Ok(())
            }
            None => bail!("Deployer did not create project '{}'.", args.name),
        }
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        if !args.confirm {
            bail!("Deleting project {} removes its targets. Re-run with --confirm.", args.id);
        }
        let client = global.connect()?;

        client.delete_project(args.id).await?;

        if global.json {
            let result = serde_json::json!({ "success": true, "deleted": args.id });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Deleted project {}",
                style("✓").green(),
                style(args.id).red()
            );
        }
        Ok(())
    }
}
