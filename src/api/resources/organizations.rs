//
//  deployer-client
//  api/resources/organizations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Organizations on the Deployer side.
//!
//! Registering an organization creates a Deployer user for it with a generated
//! password. The password is encrypted through the session's
//! [`PasswordCipher`](crate::auth::PasswordCipher) and, together with the login
//! the API hands back, written to the local record.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::api::client::{DeployerClient, Method};
use crate::api::common::{de, member, params, DeployerError};
use crate::org::{Organization, OrganizationStore};

const RESOURCE: &str = "organizations";

const PASSWORD_LENGTH: usize = 10;

/// An organization as the Deployer API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteOrganization {
    #[serde(deserialize_with = "de::id")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// The user created when an organization registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub login: String,
    #[serde(default, alias = "organization-id", deserialize_with = "de::opt_id")]
    pub organization_id: Option<u64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

impl DeployerClient {
    /// Looks up the session's organization by name.
    ///
    /// `Ok(None)` when the API knows no such organization.
    pub async fn organization(&self) -> Result<Option<RemoteOrganization>, DeployerError> {
        let name = self.session().organization().name.clone();
        let list = self
            .fetch_list(RESOURCE, params(json!({ "name": name })))
            .await?;
        Ok(list.and_then(|list| list.first(RESOURCE)))
    }

    /// Registers `organization` as a Deployer user.
    ///
    /// Generates a password, stores it encrypted on `organization`, creates the
    /// user, then records the returned login and saves the record through
    /// `store`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))` on success
    /// - `Ok(None)` when the response carries no user, or saving fails
    ///
    /// # Errors
    ///
    /// [`DeployerError::Credentials`] when the password cannot be encrypted, and
    /// any gateway error.
    pub async fn add_organization(
        &self,
        organization: &mut Organization,
        store: &dyn OrganizationStore,
    ) -> Result<Option<RegisteredUser>, DeployerError> {
        let password = generate_password();
        organization.deploy_password =
            Some(self.session().cipher().encrypt(organization.id, &password)?);

        let data = params(json!({
            "name": organization.name,
            "password": password,
            "email": organization.owner_email,
        }));
        let body = self.execute(Method::Post, "users", data, true).await?;

        let user = member(body, "user")
            .and_then(|user| serde_json::from_value::<RegisteredUser>(user).ok());
        let Some(user) = user else {
            warn!(organization = %organization.name, "registration response carried no user");
            return Ok(None);
        };

        organization.deploy_login = Some(user.login.clone());
        if let Err(e) = store.save(organization) {
            warn!(organization = %organization.name, error = %e, "failed to save organization");
            return Ok(None);
        }

        info!(organization = %organization.name, login = %user.login, "organization registered");
        Ok(Some(user))
    }

    /// Deletes an organization on the Deployer side.
    pub async fn delete_organization(&self, id: u64) -> Result<Option<Value>, DeployerError> {
        let path = format!("{RESOURCE}/{id}");
        self.execute(Method::Delete, &path, Default::default(), false).await
    }
}
