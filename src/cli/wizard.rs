//
//  deployer-client
//  cli/wizard.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Question wizard commands
//!
//! Answers are given per question id, either inline (`-a 12=yes`) or as a JSON
//! object (`--answers '{"12": "yes"}'`, or `--answers-file answers.json`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use crate::api::resources::{AnswerContext, Answers, Question};
use crate::output::{display_value, TableBuilder, TableOutput};

use super::GlobalOptions;

/// Answer recipe questions
#[derive(Args, Debug)]
pub struct WizardCommand {
    #[command(subcommand)]
    pub command: WizardSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WizardSubcommand {
    /// List the questions of a recipe or link
    Questions(ContextArgs),

    /// Submit answers
    Answer(AnswerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// Recipe id
    #[arg(long)]
    pub recipe: Option<u64>,

    /// Target id
    #[arg(long)]
    pub target: Option<u64>,

    /// Target-recipe link id
    #[arg(long)]
    pub target_recipe: Option<u64>,
}

impl From<&ContextArgs> for AnswerContext {
    fn from(args: &ContextArgs) -> Self {
        AnswerContext {
            recipe_id: args.recipe,
            target_id: args.target,
            target_recipe_id: args.target_recipe,
        }
    }
}

#[derive(Args, Debug)]
pub struct AnswerArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Answer as QUESTION_ID=VALUE (repeat for several)
    #[arg(long = "answer", short = 'a', action = clap::ArgAction::Append)]
    pub answer: Vec<String>,

    /// Answers as a JSON object keyed by question id
    #[arg(long, conflicts_with = "answers_file")]
    pub answers: Option<String>,

    /// File holding the answers JSON object
    #[arg(long)]
    pub answers_file: Option<PathBuf>,
}

impl AnswerArgs {
    fn collect(&self) -> Result<Answers> {
        let mut answers = match (&self.answers, &self.answers_file) {
            (Some(json), _) => Answers::from_json(json)?,
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Answers::from_json(&text)?
            }
            (None, None) => Answers::default(),
        };
        for answer in &self.answer {
            let Some((id, value)) = answer.split_once('=') else {
                bail!("Invalid answer format: {}. Expected QUESTION_ID=VALUE", answer);
            };
            answers.insert(id.trim(), value);
        }
        Ok(answers)
    }
}

impl TableOutput for Question {
    fn print_table(&self, color: bool) {
        Self::print_rows(std::slice::from_ref(self), color);
    }

    fn print_rows(values: &[Self], color: bool) {
        TableBuilder::new()
            .color(color)
            .headers(["ID", "Field", "Question"])
            .rows(values.iter().map(|question| {
                let text = ["question", "text", "name"]
                    .iter()
                    .find_map(|key| question.attributes.get(*key))
                    .map(display_value)
                    .unwrap_or_default();
                [question.id.to_string(), question.answer_field(), text]
            }))
            .print();
    }
}

impl WizardCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WizardSubcommand::Questions(args) => self.questions(args, global).await,
            WizardSubcommand::Answer(args) => self.answer(args, global).await,
        }
    }

    async fn questions(&self, args: &ContextArgs, global: &GlobalOptions) -> Result<()> {
        if args.recipe.is_none() && args.target_recipe.is_none() {
            bail!("Pass --recipe or --target-recipe.");
        }
        let client = global.connect()?;

        match client.questions(&AnswerContext::from(args)).await? {
            Some(questions) => global.output().write_list(&questions),
            None => bail!("Deployer returned no questions."),
        }
    }

    async fn answer(&self, args: &AnswerArgs, global: &GlobalOptions) -> Result<()> {
        let answers = args.collect()?;
        let client = global.connect()?;
        let output = global.output();

        match client
            .save_answers(&AnswerContext::from(&args.context), &answers)
            .await?
        {
            Some(result) => {
                output.write_success("Answers saved");
                if global.json {
                    output.write_value(&result)?;
                }
                Ok(())
            }
            None => bail!("Deployer did not accept the answers."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_answers_override_json() {
        let args = AnswerArgs {
            context: ContextArgs {
                recipe: None,
                target: None,
                target_recipe: Some(5),
            },
            answer: vec!["3=no".to_string()],
            answers: Some(r#"{"3": "yes", "4": "maybe"}"#.to_string()),
            answers_file: None,
        };

        let answers = args.collect().unwrap();

        assert_eq!(answers.get(3), Some(&json!("no")));
        assert_eq!(answers.get(4), Some(&json!("maybe")));
    }

    #[test]
    fn test_malformed_inline_answer() {
        let args = AnswerArgs {
            context: ContextArgs {
                recipe: Some(1),
                target: Some(2),
                target_recipe: None,
            },
            answer: vec!["yes".to_string()],
            answers: None,
            answers_file: None,
        };
        assert!(args.collect().is_err());
    }
}
