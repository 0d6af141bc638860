//
//  deployer-client
//  api/resources/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects.

use serde_json::{json, Value};

use crate::api::client::{DeployerClient, Method};
use crate::api::common::{params, DeployerError, Params};

const RESOURCE: &str = "projects";

impl DeployerClient {
    /// Creates a project.
    pub async fn add_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Option<Value>, DeployerError> {
        let data = params(json!({ "name": name, "description": description }));
        self.execute(Method::Post, RESOURCE, data, false).await
    }

    /// Looks up a project by name; `None` when there is none.
    pub async fn project(&self, name: &str) -> Result<Option<Value>, DeployerError> {
        let list = self
            .fetch_list(RESOURCE, params(json!({ "name": name })))
            .await?;
        Ok(list.and_then(|list| list.items.into_iter().next()))
    }

    /// Deletes a project.
    pub async fn delete_project(&self, id: u64) -> Result<Option<Value>, DeployerError> {
        let path = format!("{RESOURCE}/{id}");
        self.execute(Method::Delete, &path, Params::new(), false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with_token, organization};
    use mockito::Matcher;

    #[tokio::test]
    async fn test_project_lookup() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::UrlEncoded("name".into(), "shop".into()))
            .with_status(200)
            .with_body(r#"{"projects": [{"id": 3, "name": "shop"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::UrlEncoded("name".into(), "blog".into()))
            .with_status(200)
            .with_body(r#"{"nil_classes": null}"#)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        assert_eq!(
            client.project("shop").await.unwrap(),
            Some(json!({"id": 3, "name": "shop"}))
        );
        assert_eq!(client.project("blog").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_error_body_is_not_a_project() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error": "no such project", "status": "failed"}"#)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        assert_eq!(client.project("ghost").await.unwrap(), None);
        assert!(client
            .list_resource("projects", Params::new())
            .await
            .unwrap()
            .items
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_project_uses_id_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/projects/3.json")
            .match_query(Matcher::UrlEncoded("auth_token".into(), "T".into()))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        assert_eq!(client.delete_project(3).await.unwrap(), Some(Value::Null));
        mock.assert_async().await;
    }
}
