//
//  deployer-client
//  api/resources/wizard.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Question wizard and the browser deploy link.
//!
//! A recipe (or a recipe already linked to a target) asks configuration
//! questions before it can be deployed. Answers are keyed by question id on the
//! way in and by a per-question field name on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

use crate::api::client::{DeployerClient, Method, AUTH_TOKEN_PARAM};
use crate::api::common::{de, params, DeployerError, Params};

const RESOURCE: &str = "question_wizard";

/// A configuration question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "de::id")]
    pub id: u64,

    #[serde(default, alias = "pub-question-id", deserialize_with = "de::opt_id")]
    pub pub_question_id: Option<u64>,

    #[serde(default, alias = "config-question-id", deserialize_with = "de::opt_id")]
    pub config_question_id: Option<u64>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Question {
    /// Wire field carrying the answer to this question.
    ///
    /// Published questions win over config questions, which win over the raw id.
    pub fn answer_field(&self) -> String {
        match (self.pub_question_id, self.config_question_id) {
            (Some(pub_id), _) => format!("answer_pub_question_{pub_id}"),
            (None, Some(_)) => format!("answer_config_question_{}", self.id),
            (None, None) => format!("answer_{}", self.id),
        }
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers(Map<String, Value>);

impl Answers {
    /// Parses answers from a JSON object of `{"<question id>": answer}`.
    ///
    /// # Errors
    ///
    /// [`DeployerError::InvalidArgument`] when `text` is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, DeployerError> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(DeployerError::InvalidArgument(
                "Answers parameter must be a JSON object ({\"key\": value})".to_string(),
            )),
        }
    }

    /// Sets the answer to question `question_id`.
    pub fn insert(&mut self, question_id: impl ToString, answer: impl Into<Value>) {
        self.0.insert(question_id.to_string(), answer.into());
    }

    /// The answer to `question_id`, if given.
    pub fn get(&self, question_id: u64) -> Option<&Value> {
        self.0.get(&question_id.to_string())
    }
}

/// What a set of questions belongs to.
///
/// Either `target_recipe_id`, or both `recipe_id` and `target_id`, identify an
/// answerable context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerContext {
    pub recipe_id: Option<u64>,
    pub target_id: Option<u64>,
    pub target_recipe_id: Option<u64>,
}

impl AnswerContext {
    fn is_answerable(&self) -> bool {
        self.target_recipe_id.is_some() || (self.recipe_id.is_some() && self.target_id.is_some())
    }

    fn params(&self) -> Params {
        params(json!({
            "recipe_id": self.recipe_id,
            "target_id": self.target_id,
            "target_recipe_id": self.target_recipe_id,
        }))
    }
}

impl DeployerClient {
    /// Questions for a recipe or a target-recipe link.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without a request when neither a recipe nor a target-recipe id
    /// is given, and when the API returns no data.
    pub async fn questions(
        &self,
        context: &AnswerContext,
    ) -> Result<Option<Vec<Question>>, DeployerError> {
        if context.recipe_id.is_none() && context.target_recipe_id.is_none() {
            return Ok(None);
        }
        let list = self.fetch_list(RESOURCE, context.params()).await?;
        Ok(list.map(|list| list.decode(RESOURCE)))
    }

    /// Submits answers for every question of `context`.
    ///
    /// Questions without an answer are sent with a `null` value.
    ///
    /// # Errors
    ///
    /// [`DeployerError::InvalidArgument`] when `context` does not identify a
    /// target-recipe link or a recipe on a target.
    pub async fn save_answers(
        &self,
        context: &AnswerContext,
        answers: &Answers,
    ) -> Result<Option<Value>, DeployerError> {
        if !context.is_answerable() {
            return Err(DeployerError::InvalidArgument(
                "Answers need a target recipe id, or both a recipe id and a target id".to_string(),
            ));
        }
        let Some(questions) = self.questions(context).await? else {
            return Ok(None);
        };

        let mut data = Params::new();
        for question in &questions {
            let answer = answers.get(question.id).cloned().unwrap_or(Value::Null);
            data.insert(question.answer_field(), answer);
        }
        data.extend(context.params());

        self.execute(Method::Post, RESOURCE, data, false).await
    }

    /// Link that opens the deploy flow for a recipe on a target in a browser.
    ///
    /// The link embeds the session token, logging in first if needed.
    pub async fn deploy_url(
        &self,
        target_id: u64,
        odtpr_id: u64,
        recipe_id: u64,
    ) -> Result<String, DeployerError> {
        let token = self.token().await?;
        let base = format!("{}/question_wizard/deploy", self.deploy_base_url());
        let mut url = Url::parse(&base)
            .map_err(|e| DeployerError::Config(format!("invalid deploy url {base}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("type", "pub_recipe")
            .append_pair("download_type", "deploy")
            .append_pair("org_deploy_target_id1", &target_id.to_string())
            .append_pair("odtpr_id", &odtpr_id.to_string())
            .append_pair("pub_recipe_id", &recipe_id.to_string())
            .append_pair(AUTH_TOKEN_PARAM, &token);
        Ok(url.into())
    }
}
