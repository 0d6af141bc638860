//
//  deployer-client
//  cli/recipe.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Recipe commands

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use crate::api::resources::{RecentRecipe, Recipe, DEFAULT_RECIPE_TYPE, RECENT_RECIPES_LIMIT};
use crate::output::{display_value, print_field, print_header, TableBuilder, TableOutput};

use super::GlobalOptions;

/// Browse published recipes
#[derive(Args, Debug)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecipeSubcommand {
    /// List published recipes
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one recipe
    #[command(visible_alias = "view")]
    Show(ShowArgs),

    /// Most recently updated recipes linked in the given projects
    Recent(RecentArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Recipe type
    #[arg(long = "type", short = 't', default_value = DEFAULT_RECIPE_TYPE)]
    pub recipe_type: String,

    /// Operating system
    #[arg(long, default_value = "")]
    pub os: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Recipe id
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct RecentArgs {
    /// Project names (repeat for several)
    #[arg(long = "project", short = 'p', required = true, action = clap::ArgAction::Append)]
    pub projects: Vec<String>,

    /// Maximum number of recipes to show
    #[arg(long, short = 'l', default_value_t = RECENT_RECIPES_LIMIT)]
    pub limit: usize,
}

impl TableOutput for Recipe {
    fn print_table(&self, color: bool) {
        print_header(self.name.as_deref().unwrap_or("Recipe"));
        print_field("ID", &self.id.to_string(), color);
        print_field("Type", self.recipe_type.as_deref().unwrap_or_default(), color);
        print_field("OS", self.os.as_deref().unwrap_or_default(), color);
        print_field("Updated", self.updated_at.as_deref().unwrap_or_default(), color);
        for (key, value) in &self.attributes {
            print_field(key, &display_value(value), color);
        }
    }

    fn print_rows(values: &[Self], color: bool) {
        TableBuilder::new()
            .color(color)
            .headers(["ID", "Name", "Type", "OS", "Updated"])
            .rows(values.iter().map(|recipe| {
                [
                    recipe.id.to_string(),
                    recipe.name.clone().unwrap_or_default(),
                    recipe.recipe_type.clone().unwrap_or_default(),
                    recipe.os.clone().unwrap_or_default(),
                    updated(recipe),
                ]
            }))
            .print();
    }
}

impl TableOutput for RecentRecipe {
    fn print_table(&self, color: bool) {
        Self::print_rows(std::slice::from_ref(self), color);
    }

    fn print_rows(values: &[Self], color: bool) {
        TableBuilder::new()
            .color(color)
            .headers(["Project", "Target", "Link", "Recipe", "Updated"])
            .rows(values.iter().map(|recent| {
                [
                    recent.project_name.clone(),
                    recent.target_name.clone(),
                    recent.link.target_recipe_name.clone(),
                    recent.link.recipe.name.clone().unwrap_or_default(),
                    updated(&recent.link.recipe),
                ]
            }))
            .print();
    }
}

fn updated(recipe: &Recipe) -> String {
    match recipe.updated_at_time() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => recipe.updated_at.clone().unwrap_or_default(),
    }
}

impl RecipeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RecipeSubcommand::List(args) => self.list(args, global).await,
            RecipeSubcommand::Show(args) => self.show(args, global).await,
            RecipeSubcommand::Recent(args) => self.recent(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let recipes = client
            .recipes(None, Some(&args.recipe_type), Some(&args.os))
            .await?;
        global.output().write_list(&recipes)
    }

    async fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        match client.recipe(args.id).await? {
            Some(recipe) => global.output().write(&recipe),
            None => bail!("Recipe {} not found.", args.id),
        }
    }

    async fn recent(&self, args: &RecentArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.connect()?;
        let recent = client.all_target_recipes(&args.projects, args.limit).await?;
        global.output().write_list(&recent)
    }
}
