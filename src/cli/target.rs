//
//  deployer-client
//  cli/target.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Deploy target commands
//!
//! Targets live in a project. Their settings are kept per target type (`ssh`,
//! `gae`, `aws`, `for`, or any category from the config file); SSH hosts are
//! capped by the organization's plan.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::resources::{
    all_target_recipes_count, DeployTarget, TargetOptions, TargetOptionsUpdate, TargetTotals,
};
use crate::output::{
    display_value, format_bool, print_field, print_header, truncate, TableBuilder, TableOutput,
};

use super::{parse_fields, GlobalOptions};

/// Manage deploy targets and their settings
#[derive(Args, Debug)]
pub struct TargetCommand {
    #[command(subcommand)]
    pub command: TargetSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TargetSubcommand {
    /// List the targets of a project
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a target
    Create(CreateArgs),

    /// Delete a target
    Delete(DeleteArgs),

    /// Check whether a target name is free
    Available(AvailableArgs),

    /// Count targets and recipe links
    Count(CountArgs),

    /// Show a target's settings
    Options(OptionsArgs),

    /// Change a target's settings
    #[command(name = "set-options")]
    SetOptions(SetOptionsArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Project name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Only this target
    #[arg(long)]
    pub target_id: Option<u64>,

    /// Only links to this recipe
    #[arg(long)]
    pub recipe_id: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Target name
    pub name: String,

    /// Project name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Target description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Operating system type (defaults to All)
    #[arg(long)]
    pub os_type: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Target id
    pub id: u64,

    /// Project name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Skip the safety check
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct AvailableArgs {
    /// Target name
    pub name: String,

    /// Project name
    #[arg(long, short = 'p')]
    pub project: String,
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Also count recipe links in this project
    #[arg(long, short = 'p')]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Target id
    pub id: u64,

    /// Project name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Target type or category
    #[arg(long = "type", short = 't')]
    pub target_type: String,
}

#[derive(Args, Debug)]
pub struct SetOptionsArgs {
    /// Target id
    pub id: u64,

    /// Project name
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Target type or category
    #[arg(long = "type", short = 't')]
    pub target_type: String,

    /// Target description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// SSH host (repeat for several)
    #[arg(long = "host", action = clap::ArgAction::Append)]
    pub hosts: Vec<String>,

    /// Other setting as key=value (repeat for several)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,
}

impl TableOutput for DeployTarget {
    fn print_table(&self, color: bool) {
        print_header(&format!("{} (#{})", self.name, self.id));
        print_field("Project", &self.project_name, color);
        print_field("Type", &self.target_type, color);
        print_field("Description", &self.description, color);
        if self.recipes.is_empty() {
            print_field("Recipes", "none", color);
            return;
        }
        TableBuilder::new()
            .color(color)
            .headers(["Link ID", "Link", "Recipe ID", "Recipe", "Comments"])
            .rows(self.recipes.iter().map(|link| {
                [
                    link.target_recipe_id.to_string(),
                    link.target_recipe_name.clone(),
                    link.recipe.id.to_string(),
                    link.recipe.name.clone().unwrap_or_default(),
                    truncate(&link.target_recipe_comments, 40),
                ]
            }))
            .print();
    }

    fn print_rows(values: &[Self], color: bool) {
        TableBuilder::new()
            .color(color)
            .headers(["ID", "Name", "Type", "Recipes", "Description"])
            .rows(values.iter().map(|target| {
                [
                    target.id.to_string(),
                    target.name.clone(),
                    target.target_type.clone(),
                    target.recipes.len().to_string(),
                    truncate(&target.description, 50),
                ]
            }))
            .print();
    }
}

impl TableOutput for TargetOptions {
    fn print_table(&self, color: bool) {
        print_header(&format!("Target #{} ({})", self.target_id, self.target_type.option_name()));
        print_field("SSH hosts", &self.ssh_host.join(", "), color);
        for (key, value) in &self.fields {
            print_field(key, &display_value(value), color);
        }
    }
}

/// Totals, with the project's link count when one was asked for.
#[derive(Debug, Serialize)]
struct Counts {
    #[serde(flatten)]
    totals: TargetTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_recipes: Option<usize>,
}

impl TableOutput for Counts {
    fn print_table(&self, color: bool) {
        print_field("Targets", &self.totals.total_targets.to_string(), color);
        print_field("Recipes", &self.totals.total_recipes.to_string(), color);
        if let Some(count) = self.project_recipes {
            print_field("Project recipe links", &count.to_string(), color);
        }
    }
}

#[derive(Debug, Serialize)]
struct Availability {
    name: String,
    project: String,
    available: bool,
}

impl TableOutput for Availability {
    fn print_table(&self, color: bool) {
        print_field(
            &format!("'{}' available in {}", self.name, self.project),
            &format_bool(self.available, color),
            color,
        );
    }
}

impl TargetCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            TargetSubcommand::List(args) => self.list(args, global).await,
            TargetSubcommand::Create(args) => self.create(args, global).await,
            TargetSubcommand::Delete(args) => self.delete(args, global).await,
            TargetSubcommand::Available(args) => self.available(args, global).await,
            TargetSubcommand::Count(args) => self.count(args, global).await,
            TargetSubcommand::Options(args) => self.options(args, global).await,
            TargetSubcommand::SetOptions(args) => self.set_options(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let targets = client
            .deploy_targets(&args.project, args.target_id, args.recipe_id)
            .await?;

        let output = global.output();
        match (args.target_id, targets.as_slice()) {
            (Some(_), [target]) => output.write(target),
            _ => output.write_list(&targets),
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        if !client.is_target_available(&args.name, &args.project).await? {
            bail!("Target '{}' already exists in {}.", args.name, args.project);
        }

        let created = client
            .add_deploy_target(&args.name, &args.project, &args.description, args.os_type.as_deref())
            .await?;
        match created {
            Some(created) => {
                output.write_success(&format!("Created target {} in {}", args.name, args.project));
                if global.json {
                    output.write_value(&created)?;
                }
                Ok(())
            }
            None => bail!("Deployer did not create target '{}'.", args.name),
        }
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        if !args.confirm {
            bail!("Deleting target {} also removes its recipe links. Re-run with --confirm.", args.id);
        }
        let client = global.connect()?;

        client.delete_deploy_target(args.id, &args.project).await?;

        if global.json {
            let result = serde_json::json!({ "success": true, "deleted": args.id });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Deleted target {}", style("✓").green(), style(args.id).red());
        }
        Ok(())
    }

    async fn available(&self, args: &AvailableArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let available = client.is_target_available(&args.name, &args.project).await?;

        global.output().write(&Availability {
            name: args.name.clone(),
            project: args.project.clone(),
            available,
        })
    }

    async fn count(&self, args: &CountArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let totals = client.all_deploy_targets_count().await?;

        let project_recipes = match &args.project {
            Some(project) => {
                let targets = client.deploy_targets(project, None, None).await?;
                Some(all_target_recipes_count(&targets))
            }
            None => None,
        };

        global.output().write(&Counts {
            totals,
            project_recipes,
        })
    }

    async fn options(&self, args: &OptionsArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;

        match client
            .deploy_target_options(args.id, &args.project, &args.target_type)
            .await?
        {
            Some(options) => global.output().write(&options),
            None => bail!("No {} settings for target {}.", args.target_type, args.id),
        }
    }

    async fn set_options(&self, args: &SetOptionsArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let output = global.output();

        let update = TargetOptionsUpdate {
            target_id: args.id,
            target_type: args.target_type.clone(),
            project_name: args.project.clone(),
            description: args.description.clone(),
            ssh_host: (!args.hosts.is_empty()).then(|| args.hosts.clone()),
            fields: parse_fields(&args.field)?,
        };

        match client.update_deploy_target_options(update).await? {
            Some(result) => {
                output.write_success(&format!("Updated settings of target {}", args.id));
                if global.json {
                    output.write_value(&result)?;
                }
            }
            None => output.write_warning("Nothing was updated."),
        }
        Ok(())
    }
}
