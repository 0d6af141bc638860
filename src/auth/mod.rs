//
//  deployer-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Session state for the Deployer API.
//!
//! The API uses a single scheme: the organization's login and password are sent to
//! `sessions/get`, which answers with an opaque bearer token. The token is cached in
//! the [`Session`] and reused for every later request; it is never refreshed and
//! never persisted.
//!
//! ## Module Structure
//!
//! - [`Session`]: per-organization credentials and the cached token
//! - [`PasswordCipher`]: the seam through which stored passwords are encrypted and
//!   decrypted, keyed by organization id
//! - [`keyring`]: [`KeyringCipher`], which keeps the plaintext in the OS keyring
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use deployer_client::auth::{KeyringCipher, Session};
//! use deployer_client::Organization;
//!
//! let organization = Organization {
//!     id: 42,
//!     name: "acme".to_string(),
//!     ..Default::default()
//! };
//! let session = Session::new(organization, Arc::new(KeyringCipher::new()))
//!     .with_token("token-from-an-earlier-login");
//! assert_eq!(session.organization().name, "acme");
//! ```

mod keyring;

pub use keyring::*;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::api::DeployerError;
use crate::org::Organization;

/// Encrypts and decrypts organization passwords.
///
/// Implementations are keyed by organization id so that a ciphertext stored for
/// one organization cannot be decrypted on behalf of another.
pub trait PasswordCipher: Send + Sync {
    /// Encrypts `plaintext` for the organization, returning the value to store.
    fn encrypt(&self, organization_id: u64, plaintext: &str) -> Result<String, DeployerError>;

    /// Recovers the plaintext from a value produced by [`encrypt`](Self::encrypt).
    fn decrypt(&self, organization_id: u64, ciphertext: &str) -> Result<String, DeployerError>;
}

/// Login and password resolved for a `sessions/get` request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Deployer login
    pub login: String,
    /// Plaintext password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication state for one organization.
///
/// Holds a snapshot of the organization's stored credentials, the cipher used to
/// decrypt its password, and the lazily acquired token. The token lock is held
/// across the login request, so concurrent callers sharing a session trigger at
/// most one login.
pub struct Session {
    organization: Organization,
    cipher: Arc<dyn PasswordCipher>,
    token: Mutex<Option<String>>,
}

impl Session {
    /// Creates a session with no token; the first authenticated request logs in.
    pub fn new(organization: Organization, cipher: Arc<dyn PasswordCipher>) -> Self {
        Self {
            organization,
            cipher,
            token: Mutex::new(None),
        }
    }

    /// Seeds the session with a token obtained elsewhere.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
            ..self
        }
    }

    /// The organization this session acts for.
    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    /// The cipher used for this organization's password.
    pub fn cipher(&self) -> &dyn PasswordCipher {
        self.cipher.as_ref()
    }

    /// Returns the cached token without logging in.
    pub async fn cached_token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    pub(crate) async fn lock_token(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().await
    }

    /// Resolves the login and plaintext password to authenticate with.
    ///
    /// Returns `Ok(None)` when the organization has no stored login or no stored
    /// password, even if overrides are given. The stored password is only
    /// decrypted when no override replaces it.
    pub fn credentials(
        &self,
        login_override: Option<&str>,
        password_override: Option<&str>,
    ) -> Result<Option<Credentials>, DeployerError> {
        let (Some(login), Some(encrypted)) = (
            self.organization.deploy_login.as_deref(),
            self.organization.deploy_password.as_deref(),
        ) else {
            return Ok(None);
        };

        let password = match password_override {
            Some(password) => password.to_string(),
            None => self.cipher.decrypt(self.organization.id, encrypted)?,
        };

        Ok(Some(Credentials {
            login: login_override.unwrap_or(login).to_string(),
            password,
        }))
    }

    pub(crate) fn authentication_error(&self) -> DeployerError {
        DeployerError::Authentication {
            organization: self.organization.name.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("organization", &self.organization.name)
            .finish_non_exhaustive()
    }
}
