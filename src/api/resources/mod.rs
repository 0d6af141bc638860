//
//  deployer-client
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Deployer resource operations.
//!
//! Every operation here is an `impl DeployerClient` block built on the gateway
//! ([`DeployerClient::execute`]) and on [`DeployerClient::list_resource`], which
//! normalizes the API's list envelopes.
//!
//! # Module Organization
//!
//! - [`organizations`] - Organization registration and lookup
//! - [`projects`] - Project CRUD
//! - [`targets`] - Deploy targets and target-recipe links
//! - [`options`] - Per-target settings (SSH hosts, cloud credentials)
//! - [`recipes`] - Published recipes
//! - [`wizard`] - Question wizard and the browser deploy link
//!
//! # Example
//!
//! ```rust,no_run
//! use deployer_client::DeployerClient;
//! use serde_json::json;
//! use deployer_client::api::common::params;
//!
//! # async fn example(client: &DeployerClient) -> Result<(), deployer_client::DeployerError> {
//! let list = client.list_resource("pub_recipes", params(json!({ "id": 7 }))).await?;
//! println!("{} recipe(s)", list.items.len());
//! # Ok(())
//! # }
//! ```

pub mod options;
pub mod organizations;
pub mod projects;
pub mod recipes;
pub mod targets;
pub mod wizard;

pub use options::*;
pub use organizations::*;
pub use recipes::*;
pub use targets::*;
pub use wizard::*;

use serde_json::Value;
use tracing::warn;

use super::client::{DeployerClient, Method};
use super::common::{param_text, DeployerError, ItemList, ListEnvelope, Params};

impl DeployerClient {
    /// Lists `resource`, normalizing the response envelope.
    ///
    /// An `id` filter is moved into the path (`resource/<id>`); remaining filters
    /// are sent as query parameters. The result is always a sequence, even when
    /// the API returns a single object.
    pub async fn list_resource(
        &self,
        resource: &str,
        filters: Params,
    ) -> Result<ItemList, DeployerError> {
        Ok(self.fetch_list(resource, filters).await?.unwrap_or_default())
    }

    /// Like [`list_resource`](Self::list_resource), but `None` when the request
    /// returned no data at all.
    pub async fn fetch_list(
        &self,
        resource: &str,
        mut filters: Params,
    ) -> Result<Option<ItemList>, DeployerError> {
        let path = match filters.remove("id") {
            None | Some(Value::Null) => resource.to_string(),
            Some(id) => format!("{resource}/{}", param_text(&id)),
        };

        let body = self.execute(Method::Get, &path, filters, false).await?;
        if body.is_none() {
            warn!(resource, "list request returned no data");
            return Ok(None);
        }

        let items = ListEnvelope::resolve(resource, body).into_items();
        Ok(Some(ItemList { items }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::params;
    use crate::testing::{client_with_token, organization};
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_id_filter_moves_into_path_and_single_item_is_wrapped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/pub_recipes/7.json")
            .match_query(Matcher::UrlEncoded("auth_token".into(), "T".into()))
            .with_status(200)
            .with_body(r#"{"pub-recipes": {"pub-recipe": {"id": 7, "name": "LAMP"}}}"#)
            .expect(1)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let list = client
            .list_resource("pub_recipes", params(json!({ "id": 7 })))
            .await
            .unwrap();

        assert_eq!(list.items, vec![json!({"id": 7, "name": "LAMP"})]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_action_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/question_wizard.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"action": [{"id": 1}, {"id": 2}]}"#)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let list = client.list_resource("question_wizard", Params::new()).await.unwrap();

        assert_eq!(list.items.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_body_is_empty_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        assert_eq!(client.fetch_list("projects", Params::new()).await.unwrap(), None);
        assert!(client.list_resource("projects", Params::new()).await.unwrap().items.is_empty());
    }
}
