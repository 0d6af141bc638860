//
//  deployer-client
//  api/resources/recipes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Published recipes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::DeployerClient;
use crate::api::common::{de, params, DeployerError};

/// Recipe type listed when the caller does not ask for one.
pub const DEFAULT_RECIPE_TYPE: &str = "Team Edition Deploy";

const RESOURCE: &str = "pub_recipes";

/// A published deployment recipe.
///
/// Only the fields the client reasons about are typed; the rest of the payload
/// is kept in `attributes`, in the order the API sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(deserialize_with = "de::id")]
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub recipe_type: Option<String>,

    #[serde(default)]
    pub os: Option<String>,

    #[serde(default, alias = "updated-at")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Recipe {
    /// `updated_at` as a timestamp, when it parses as RFC 3339.
    pub fn updated_at_time(&self) -> Option<DateTime<Utc>> {
        self.updated_at
            .as_deref()
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
            .map(|time| time.with_timezone(&Utc))
    }
}

impl DeployerClient {
    /// Fetches one recipe by id; `None` when the API returns none.
    pub async fn recipe(&self, id: u64) -> Result<Option<Recipe>, DeployerError> {
        let list = self.list_resource(RESOURCE, params(json!({ "id": id }))).await?;
        Ok(list.first(RESOURCE))
    }

    /// Lists recipes.
    ///
    /// # Parameters
    ///
    /// * `id` - Restrict to one recipe
    /// * `recipe_type` - Defaults to [`DEFAULT_RECIPE_TYPE`]
    /// * `os` - Operating system filter; empty for all
    pub async fn recipes(
        &self,
        id: Option<u64>,
        recipe_type: Option<&str>,
        os: Option<&str>,
    ) -> Result<Vec<Recipe>, DeployerError> {
        let filters = params(json!({
            "id": id,
            "os": os.unwrap_or_default(),
            "type": recipe_type.unwrap_or(DEFAULT_RECIPE_TYPE),
        }));
        Ok(self.list_resource(RESOURCE, filters).await?.decode(RESOURCE))
    }
}
