//
//  deployer-client
//  org/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Organization Records
//!
//! The local view of a customer organization: its identity, the Deployer
//! credentials stored for it, and its plan limits. Registration on the Deployer
//! side writes the returned login back through an [`OrganizationStore`].

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// A customer organization as known locally.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Organization {
    /// Local organization id; keys the password cipher.
    pub id: u64,

    /// Organization name, also its name on the Deployer side.
    pub name: String,

    /// Email of the organization owner, used at registration.
    #[serde(default)]
    pub owner_email: String,

    /// Deployer login, set once the organization is registered.
    #[serde(default)]
    pub deploy_login: Option<String>,

    /// Encrypted Deployer password (see [`PasswordCipher`](crate::auth::PasswordCipher)).
    #[serde(default)]
    pub deploy_password: Option<String>,

    /// Plan limits.
    #[serde(default)]
    pub limits: OrganizationLimits,
}

/// Plan limits of an organization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationLimits {
    /// Maximum SSH hosts per deploy target; negative means unlimited.
    #[serde(default = "unlimited")]
    pub deploy_destinations_limit: i64,
}

fn unlimited() -> i64 {
    -1
}

impl Default for OrganizationLimits {
    fn default() -> Self {
        Self {
            deploy_destinations_limit: unlimited(),
        }
    }
}

impl OrganizationLimits {
    /// The host limit, or `None` when unlimited.
    pub fn host_limit(&self) -> Option<usize> {
        usize::try_from(self.deploy_destinations_limit).ok()
    }
}

/// Persists organization records.
pub trait OrganizationStore: Send + Sync {
    /// Saves `organization`, replacing any record with the same name.
    fn save(&self, organization: &Organization) -> Result<()>;
}

/// Stores organizations in the `[organizations]` table of a config file.
#[derive(Debug, Clone)]
pub struct ConfigOrganizationStore {
    path: PathBuf,
}

impl ConfigOrganizationStore {
    /// Creates a store writing to the config file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OrganizationStore for ConfigOrganizationStore {
    fn save(&self, organization: &Organization) -> Result<()> {
        let mut config = Config::load_from(&self.path)?;
        config
            .organizations
            .insert(organization.name.clone(), organization.clone());
        config.save_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_limit_is_unlimited() {
        assert_eq!(OrganizationLimits::default().host_limit(), None);
        let limits = OrganizationLimits {
            deploy_destinations_limit: 2,
        };
        assert_eq!(limits.host_limit(), Some(2));
    }

    #[test]
    fn test_config_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = ConfigOrganizationStore::new(&path);
        let organization = Organization {
            id: 3,
            name: "acme".into(),
            owner_email: "ops@acme.test".into(),
            deploy_login: Some("acme".into()),
            deploy_password: Some("keyring:organization-3".into()),
            limits: OrganizationLimits::default(),
        };

        store.save(&organization).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.organizations["acme"], organization);
    }
}
