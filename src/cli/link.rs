//
//  deployer-client
//  cli/link.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Target-recipe link commands
//!
//! A link attaches a recipe to a target. Its deploy URL hands the deployment
//! off to the browser flow.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::{parse_fields, GlobalOptions};

/// Manage links between targets and recipes
#[derive(Args, Debug)]
pub struct LinkCommand {
    #[command(subcommand)]
    pub command: LinkSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LinkSubcommand {
    /// Link a recipe to a target
    Add(AddArgs),

    /// Update a link
    Update(UpdateArgs),

    /// Remove a link
    Delete(DeleteArgs),

    /// Print (or open) the browser deploy URL of a link
    Url(UrlArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Target id
    #[arg(long)]
    pub target: u64,

    /// Recipe id
    #[arg(long)]
    pub recipe: u64,

    /// Link name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Link comments
    #[arg(long, short = 'c')]
    pub comments: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Link id
    pub id: u64,

    /// Field to change as key=value (repeat for several)
    #[arg(long, short = 'F', action = clap::ArgAction::Append, required = true)]
    pub field: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Link id
    pub id: u64,

    /// Skip the safety check
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Target id
    #[arg(long)]
    pub target: u64,

    /// Link id
    #[arg(long)]
    pub link: u64,

    /// Recipe id
    #[arg(long)]
    pub recipe: u64,

    /// Open the URL in the default browser
    #[arg(long)]
    pub open: bool,
}

impl LinkCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            LinkSubcommand::Add(args) => self.add(args, global).await,
            LinkSubcommand::Update(args) => self.update(args, global).await,
            LinkSubcommand::Delete(args) => self.delete(args, global).await,
            LinkSubcommand::Url(args) => self.url(args, global).await,
        }
    }

    async fn add(&self, args: &AddArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        let link = client
            .add_target_recipe_link(
                args.target,
                args.recipe,
                args.name.as_deref(),
                args.comments.as_deref(),
            )
            .await?;

        match link {
            Some(link) => {
                output.write_success(&format!(
                    "Linked recipe {} to target {}",
                    args.recipe, args.target
                ));
                output.write_value(&link)
            }
            None => bail!(
                "Deployer did not link recipe {} to target {}.",
                args.recipe,
                args.target
            ),
        }
    }

    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        let fields = parse_fields(&args.field)?;
        match client.update_target_recipe_link(args.id, fields).await? {
            Some(result) => {
                output.write_success(&format!("Updated link {}", args.id));
                if global.json {
                    output.write_value(&result)?;
                }
                Ok(())
            }
            None => bail!("Deployer did not update link {}.", args.id),
        }
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        if !args.confirm {
            bail!("Re-run with --confirm to remove link {}.", args.id);
        }
        let client = global.connect()?;

        client.delete_target_recipe_link(args.id).await?;

        if global.json {
            let result = serde_json::json!({ "success": true, "deleted": args.id });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Removed link {}", style("✓").green(), style(args.id).red());
        }
        Ok(())
    }

    async fn url(&self, args: &UrlArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let url = client.deploy_url(args.target, args.link, args.recipe).await?;

        if args.open {
            webbrowser::open(&url)?;
            global.output().write_success("Opened deploy flow in browser");
        } else if global.json {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "url": url }))?);
        } else {
            println!("{url}");
        }
        Ok(())
    }
}
