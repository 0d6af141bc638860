//
//  deployer-client
//  testing.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};

use crate::api::{DeployerClient, DeployerError};
use crate::auth::{PasswordCipher, Session};
use crate::org::{Organization, OrganizationLimits, OrganizationStore};

/// Cipher that stores passwords as `plain:<password>`.
pub struct PlainCipher;

impl PasswordCipher for PlainCipher {
    fn encrypt(&self, _organization_id: u64, plaintext: &str) -> Result<String, DeployerError> {
        Ok(format!("plain:{plaintext}"))
    }

    fn decrypt(&self, _organization_id: u64, ciphertext: &str) -> Result<String, DeployerError> {
        ciphertext
            .strip_prefix("plain:")
            .map(str::to_string)
            .ok_or_else(|| DeployerError::Credentials("not a plain: value".into()))
    }
}

/// Store that records saved organizations, optionally failing.
#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<Vec<Organization>>,
    pub fail: bool,
}

impl OrganizationStore for MemoryStore {
    fn save(&self, organization: &Organization) -> Result<()> {
        if self.fail {
            bail!("disk full");
        }
        self.saved
            .lock()
            .map_err(|_| anyhow::anyhow!("poisoned"))?
            .push(organization.clone());
        Ok(())
    }
}

/// A registered organization with the given SSH host limit.
pub fn organization(host_limit: i64) -> Organization {
    Organization {
        id: 42,
        name: "acme".to_string(),
        owner_email: "ops@acme.test".to_string(),
        deploy_login: Some("acme-login".to_string()),
        deploy_password: Some("plain:s3cret".to_string()),
        limits: OrganizationLimits {
            deploy_destinations_limit: host_limit,
        },
    }
}

/// Client pointed at a mock server, with no token yet.
pub fn client(server: &mockito::ServerGuard, organization: Organization) -> DeployerClient {
    let session = Session::new(organization, Arc::new(PlainCipher));
    build(server, session)
}

/// Client pointed at a mock server, already holding `token`.
pub fn client_with_token(
    server: &mockito::ServerGuard,
    organization: Organization,
    token: &str,
) -> DeployerClient {
    let session = Session::new(organization, Arc::new(PlainCipher)).with_token(token);
    build(server, session)
}

fn build(server: &mockito::ServerGuard, session: Session) -> DeployerClient {
    let url = server.url();
    DeployerClient::with_urls(&url, "https://deploy.example.test", Duration::from_secs(5), session)
        .expect("client builds")
}
