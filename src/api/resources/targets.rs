//
//  deployer-client
//  api/resources/targets.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Deploy Targets
//!
//! Targets belong to a project and carry their recipes through target-recipe
//! links. The API returns both halves of that association on every target (the
//! links under `org_deploy_target_pub_recipes`, the recipes under `pub_recipes`);
//! [`DeployerClient::deploy_targets`] joins them into [`RecipeLink`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example(client: &deployer_client::DeployerClient) -> Result<(), deployer_client::DeployerError> {
//! for target in client.deploy_targets("shop", None, None).await? {
//!     println!("{} ({} recipes)", target.name, target.recipes.len());
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::recipes::Recipe;
use crate::api::client::{DeployerClient, Method};
use crate::api::common::{de, member, params, DeployerError, HashEnvelope, Params};

const RESOURCE: &str = "org_deploy_target";
const LINK_RESOURCE: &str = "org_deploy_target_pub_recipe";

/// Target type shown when the API reports `All` or nothing.
const ANY_OS: &str = "All";

/// Default number of entries returned by [`DeployerClient::all_target_recipes`].
pub const RECENT_RECIPES_LIMIT: usize = 10;

/// A deploy target with its linked recipes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployTarget {
    pub id: u64,
    pub name: String,
    /// Operating system type; empty when the target accepts any.
    #[serde(rename = "type")]
    pub target_type: String,
    pub description: String,
    pub project_name: String,
    pub recipes: Vec<RecipeLink>,
}

/// A recipe as linked to one target, with the link's own metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeLink {
    pub target_recipe_id: u64,
    pub target_recipe_name: String,
    pub target_recipe_comments: String,
    pub recipe: Recipe,
}

/// Totals across every target of the organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTotals {
    #[serde(default, deserialize_with = "de::count")]
    pub total_targets: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub total_recipes: u64,
}

/// A linked recipe together with the target and project it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRecipe {
    pub project_name: String,
    pub target_id: u64,
    pub target_name: String,
    pub link: RecipeLink,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    #[serde(deserialize_with = "de::id")]
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "os-type")]
    os_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "org-deploy-target-pub-recipes", deserialize_with = "de::seq")]
    org_deploy_target_pub_recipes: Vec<RawTargetRecipe>,
    #[serde(default, alias = "pub-recipes", deserialize_with = "de::seq")]
    pub_recipes: Vec<Recipe>,
}

#[derive(Debug, Deserialize)]
struct RawTargetRecipe {
    #[serde(deserialize_with = "de::id")]
    id: u64,
    #[serde(default, alias = "pub-recipe-id", deserialize_with = "de::opt_id")]
    pub_recipe_id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    comments: Option<String>,
}

impl RawTarget {
    fn into_target(self, project_name: &str, filter_recipe_id: Option<u64>) -> DeployTarget {
        let RawTarget {
            id,
            name,
            os_type,
            description,
            org_deploy_target_pub_recipes: links,
            pub_recipes: recipes,
        } = self;

        let recipes = links
            .into_iter()
            .filter(|link| filter_recipe_id.is_none() || link.pub_recipe_id == filter_recipe_id)
            .filter_map(|link| {
                let recipe = recipes
                    .iter()
                    .find(|recipe| Some(recipe.id) == link.pub_recipe_id)
                    .cloned();
                if recipe.is_none() {
                    warn!(target_id = id, link_id = link.id, "target recipe link without recipe");
                }
                recipe.map(|recipe| RecipeLink {
                    target_recipe_id: link.id,
                    target_recipe_name: link.name.unwrap_or_default(),
                    target_recipe_comments: link.comments.unwrap_or_default(),
                    recipe,
                })
            })
            .collect();

        DeployTarget {
            id,
            name,
            target_type: os_type.filter(|os| os != ANY_OS).unwrap_or_default(),
            description: description.unwrap_or_default(),
            project_name: project_name.to_string(),
            recipes,
        }
    }
}

/// Number of recipe links across `targets`.
pub fn all_target_recipes_count(targets: &[DeployTarget]) -> usize {
    targets.iter().map(|target| target.recipes.len()).sum()
}

impl DeployerClient {
    /// Lists the targets of a project with their linked recipes.
    ///
    /// # Parameters
    ///
    /// * `project_name` - Project whose targets to list
    /// * `filter_target_id` - Keep only this target
    /// * `filter_recipe_id` - Keep only links to this recipe
    pub async fn deploy_targets(
        &self,
        project_name: &str,
        filter_target_id: Option<u64>,
        filter_recipe_id: Option<u64>,
    ) -> Result<Vec<DeployTarget>, DeployerError> {
        let list = self
            .list_resource(RESOURCE, params(json!({ "project_name": project_name })))
            .await?;

        Ok(list
            .decode::<RawTarget>(RESOURCE)
            .into_iter()
            .filter(|target| filter_target_id.map_or(true, |id| id == target.id))
            .map(|target| target.into_target(project_name, filter_recipe_id))
            .collect())
    }

    /// Creates a target in a project. `os_type` defaults to `All`.
    pub async fn add_deploy_target(
        &self,
        name: &str,
        project_name: &str,
        description: &str,
        os_type: Option<&str>,
    ) -> Result<Option<Value>, DeployerError> {
        let data = params(json!({
            "project_name": project_name,
            "name": name,
            "description": description,
            "os_type": os_type.unwrap_or(ANY_OS),
        }));
        self.execute(Method::Post, RESOURCE, data, false).await
    }

    /// Whether `name` is still free in the project.
    pub async fn is_target_available(
        &self,
        name: &str,
        project_name: &str,
    ) -> Result<bool, DeployerError> {
        let targets = self.deploy_targets(project_name, None, None).await?;
        Ok(!targets.iter().any(|target| target.name == name))
    }

    /// Deletes a target.
    pub async fn delete_deploy_target(
        &self,
        target_id: u64,
        project_name: &str,
    ) -> Result<Option<Value>, DeployerError> {
        let path = format!("{RESOURCE}/{target_id}");
        let data = params(json!({ "project_name": project_name }));
        self.execute(Method::Delete, &path, data, false).await
    }

    /// Target and recipe totals for the organization; zero when unknown.
    pub async fn all_deploy_targets_count(&self) -> Result<TargetTotals, DeployerError> {
        let path = format!("{RESOURCE}/org_total_targets");
        let body = self.execute(Method::Get, &path, Params::new(), false).await?;
        Ok(HashEnvelope::<TargetTotals>::from_body(body).unwrap_or_else(|| {
            warn!("target totals response carried no hash");
            TargetTotals::default()
        }))
    }

    /// The most recently updated recipe links across `projects`.
    ///
    /// Projects are queried one after the other. Links are ordered newest first
    /// by recipe `updated_at` and cut to `limit`.
    pub async fn all_target_recipes(
        &self,
        projects: &[String],
        limit: usize,
    ) -> Result<Vec<RecentRecipe>, DeployerError> {
        let mut recent = Vec::new();
        for project_name in projects {
            for target in self.deploy_targets(project_name, None, None).await? {
                for link in target.recipes {
                    recent.push(RecentRecipe {
                        project_name: project_name.clone(),
                        target_id: target.id,
                        target_name: target.name.clone(),
                        link,
                    });
                }
            }
        }
        recent.sort_by(|a, b| {
            b.link
                .recipe
                .updated_at_time()
                .cmp(&a.link.recipe.updated_at_time())
        });
        recent.truncate(limit);
        Ok(recent)
    }

    /// Links a recipe to a target; returns the created link.
    pub async fn add_target_recipe_link(
        &self,
        target_id: u64,
        recipe_id: u64,
        name: Option<&str>,
        comments: Option<&str>,
    ) -> Result<Option<Value>, DeployerError> {
        let data = params(json!({
            "deploy_target_id": target_id,
            "recipe_id": recipe_id,
            "name": name,
            "comments": comments,
        }));
        let body = self.execute(Method::Post, LINK_RESOURCE, data, false).await?;
        Ok(member(body, LINK_RESOURCE))
    }

    /// Updates a target-recipe link.
    pub async fn update_target_recipe_link(
        &self,
        target_recipe_id: u64,
        data: Params,
    ) -> Result<Option<Value>, DeployerError> {
        let path = format!("{LINK_RESOURCE}/{target_recipe_id}");
        self.execute(Method::Put, &path, data, false).await
    }

    /// Removes a target-recipe link.
    pub async fn delete_target_recipe_link(
        &self,
        target_recipe_id: u64,
    ) -> Result<Option<Value>, DeployerError> {
        let path = format!("{LINK_RESOURCE}/{target_recipe_id}");
        self.execute(Method::Delete, &path, Params::new(), false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with_token, organization};
    use mockito::Matcher;

    const TWO_TARGETS: &str = r#"{
        "org-deploy-targets": [
            {
                "id": 1,
                "name": "web",
                "os_type": "All",
                "description": "front",
                "org_deploy_target_pub_recipes": [
                    {"id": 11, "pub_recipe_id": 7, "name": "lamp on web", "comments": "nightly"}
                ],
                "pub_recipes": [{"id": 7, "name": "LAMP", "updated_at": "2025-11-02T10:00:00Z"}]
            },
            {
                "id": 2,
                "name": "db",
                "os_type": "linux",
                "org_deploy_target_pub_recipes": {
                    "org_deploy_target_pub_recipe": {"id": 12, "pub_recipe_id": "8", "name": "pg"}
                },
                "pub_recipes": {"pub_recipe": {"id": 8, "updated_at": "2025-12-01T10:00:00Z"}}
            }
        ]
    }"#;

    async fn targets_server() -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/org_deploy_target.json")
            .match_query(Matcher::UrlEncoded("project_name".into(), "shop".into()))
            .with_status(200)
            .with_body(TWO_TARGETS)
            .create_async()
            .await;
        server
    }

    #[tokio::test]
    async fn test_target_filter_and_link_metadata() {
        let server = targets_server().await;
        let client = client_with_token(&server, organization(5), "T");

        let targets = client.deploy_targets("shop", Some(1), None).await.unwrap();

        assert_eq!(targets.len(), 1);
        let target = &targets[0];
        assert_eq!(target.name, "web");
        assert_eq!(target.target_type, "");
        assert_eq!(target.project_name, "shop");
        assert_eq!(target.recipes.len(), 1);
        let link = &target.recipes[0];
        assert_eq!(link.target_recipe_id, 11);
        assert_eq!(link.target_recipe_name, "lamp on web");
        assert_eq!(link.target_recipe_comments, "nightly");
        assert_eq!(link.recipe.id, 7);
    }

    #[tokio::test]
    async fn test_wrapped_single_links_and_recipe_filter() {
        let server = targets_server().await;
        let client = client_with_token(&server, organization(5), "T");

        let targets = client.deploy_targets("shop", None, Some(8)).await.unwrap();

        assert_eq!(targets.len(), 2);
        assert!(targets[0].recipes.is_empty());
        assert_eq!(targets[1].target_type, "linux");
        assert_eq!(targets[1].recipes[0].target_recipe_id, 12);
        assert_eq!(all_target_recipes_count(&targets), 1);
    }

    #[tokio::test]
    async fn test_target_availability() {
        let server = targets_server().await;
        let client = client_with_token(&server, organization(5), "T");

        assert!(!client.is_target_available("web", "shop").await.unwrap());
        assert!(client.is_target_available("cache", "shop").await.unwrap());
    }

    #[tokio::test]
    async fn test_recent_recipes_newest_first() {
        let server = targets_server().await;
        let client = client_with_token(&server, organization(5), "T");

        let recent = client
            .all_target_recipes(&["shop".to_string()], 1)
            .await
            .unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].target_name, "db");
        assert_eq!(recent[0].link.recipe.id, 8);
    }

    #[tokio::test]
    async fn test_totals_fall_back_to_zero() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/org_deploy_target/org_total_targets.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"hash": {"total_targets": "4"}}"#)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let totals = client.all_deploy_targets_count().await.unwrap();

        assert_eq!(
            totals,
            TargetTotals {
                total_targets: 4,
                total_recipes: 0
            }
        );
    }

    #[tokio::test]
    async fn test_add_link_returns_sub_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/org_deploy_target_pub_recipe.json")
            .match_body(Matcher::PartialJson(json!({
                "deploy_target_id": 1,
                "recipe_id": 7,
                "name": "nightly"
            })))
            .with_status(200)
            .with_body(r#"{"org-deploy-target-pub-recipe": {"id": 31}}"#)
            .expect(1)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let link = client
            .add_target_recipe_link(1, 7, Some("nightly"), None)
            .await
            .unwrap();

        assert_eq!(link, Some(json!({"id": 31})));
        mock.assert_async().await;
    }
}
