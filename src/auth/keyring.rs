//
//  deployer-client
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Keyring-Backed Password Storage
//!
//! [`KeyringCipher`] implements [`PasswordCipher`] on top of the system's native
//! keyring. The plaintext password never leaves the keyring; what the organization
//! record stores is a reference of the form `keyring:organization-<id>`.
//!
//! ## Platform Support
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! ## Storage Model
//!
//! - **Service**: `deployer-client`
//! - **Account**: `organization-<id>`
//! - **Secret**: the organization's Deployer password

use keyring::Entry;

use super::PasswordCipher;
use crate::api::DeployerError;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "deployer-client";

/// Prefix marking a stored password as a keyring reference.
const REFERENCE_PREFIX: &str = "keyring:";

fn account_name(organization_id: u64) -> String {
    format!("organization-{organization_id}")
}

fn keyring_error(e: keyring::Error) -> DeployerError {
    DeployerError::Credentials(e.to_string())
}

/// Password cipher storing secrets in the system keyring.
///
/// # Example
///
/// ```rust,no_run
/// use deployer_client::auth::{KeyringCipher, PasswordCipher};
///
/// let cipher = KeyringCipher::new();
/// let stored = cipher.encrypt(42, "s3cret")?;
/// assert_eq!(stored, "keyring:organization-42");
/// assert_eq!(cipher.decrypt(42, &stored)?, "s3cret");
/// # Ok::<(), deployer_client::DeployerError>(())
/// ```
///
/// # Notes
///
/// - The keyring may require user interaction on first access.
/// - On Linux, a secret service daemon must be running.
pub struct KeyringCipher {
    service: String,
}

impl Default for KeyringCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringCipher {
    /// Creates a cipher using the default service name.
    ///
    /// No keyring access occurs during construction.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Returns the keyring account referenced by `stored`, checking it belongs
    /// to `organization_id`.
    fn account_for(organization_id: u64, stored: &str) -> Result<String, DeployerError> {
        let account = stored.strip_prefix(REFERENCE_PREFIX).ok_or_else(|| {
            DeployerError::Credentials("stored password is not a keyring reference".to_string())
        })?;
        let expected = account_name(organization_id);
        if account != expected {
            return Err(DeployerError::Credentials(format!(
                "stored password belongs to {account}, not {expected}"
            )));
        }
        Ok(expected)
    }

    /// Removes the organization's password from the keyring.
    ///
    /// Deleting a missing entry succeeds.
    pub fn forget(&self, organization_id: u64) -> Result<(), DeployerError> {
        let entry = Entry::new(&self.service, &account_name(organization_id)).map_err(keyring_error)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_error(e)),
        }
    }
}

impl PasswordCipher for KeyringCipher {
    fn encrypt(&self, organization_id: u64, plaintext: &str) -> Result<String, DeployerError> {
        let account = account_name(organization_id);
        let entry = Entry::new(&self.service, &account).map_err(keyring_error)?;
        entry.set_password(plaintext).map_err(keyring_error)?;
        Ok(format!("{REFERENCE_PREFIX}{account}"))
    }

    fn decrypt(&self, organization_id: u64, ciphertext: &str) -> Result<String, DeployerError> {
        let account = Self::account_for(organization_id, ciphertext)?;
        let entry = Entry::new(&self.service, &account).map_err(keyring_error)?;
        match entry.get_password() {
            Ok(password) => Ok(password),
            Err(keyring::Error::NoEntry) => Err(DeployerError::Credentials(format!(
                "no password stored in the keyring for {account}"
            ))),
            Err(e) => Err(keyring_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_must_carry_prefix() {
        let err = KeyringCipher::new().decrypt(7, "plaintext").unwrap_err();
        assert!(matches!(err, DeployerError::Credentials(_)));
    }

    #[test]
    fn test_reference_must_match_organization() {
        let err = KeyringCipher::new()
            .decrypt(7, "keyring:organization-8")
            .unwrap_err();
        assert!(err.to_string().contains("organization-8"));
    }

    #[test]
    fn test_account_for_own_reference() {
        assert_eq!(
            KeyringCipher::account_for(7, "keyring:organization-7").unwrap(),
            "organization-7"
        );
    }
}
