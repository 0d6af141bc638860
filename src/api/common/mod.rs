//
//  deployer-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Deployer client
//!
//! This module provides the error type shared by every operation, the parameter
//! map sent with each request, and (through its submodules) the typed envelopes
//! and lenient deserializers used to read the API's responses.
//!
//! # Overview
//!
//! - [`DeployerError`] - Unified error type for all client operations
//! - [`Params`] - Ordered request parameter map
//! - [`envelope`] - Typed response envelopes (login, list, `hash` wrappers)
//! - [`de`] - Deserializers tolerant of stringly-typed numbers and wrapped sequences
//!
//! # Example
//!
//! ```rust
//! use deployer_client::api::common::{params, DeployerError};
//! use serde_json::json;
//!
//! let filters = params(json!({ "project_name": "shop", "os": null }));
//! assert_eq!(filters.len(), 2);
//!
//! fn describe(result: Result<(), DeployerError>) -> &'static str {
//!     match result {
//!         Ok(()) => "ok",
//!         Err(DeployerError::Authentication { .. }) => "log in again",
//!         Err(DeployerError::InvalidArgument(_)) => "fix the call",
//!         Err(_) => "try later",
//!     }
//! }
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use super::client::Method;

pub mod de;
pub mod envelope;

pub use envelope::*;

/// Ordered request parameters.
///
/// Insertion order is preserved so the wire order matches the order in which
/// an operation assembled its parameters.
pub type Params = Map<String, Value>;

/// Unified error type for all Deployer client operations.
///
/// | Variant | Raised when | Network call made |
/// |---------|-------------|-------------------|
/// | `Config` | Environment block missing, bad base URL | No |
/// | `InvalidArgument` | Precondition violated by the caller | No |
/// | `Authentication` | Login impossible or returned no token | Login only |
/// | `Transport` | Connection-level failure | Yes |
/// | `Decode` | 200 response with a non-JSON body | Yes |
/// | `Credentials` | Password storage failed | No |
///
/// Non-200 responses are not errors; see [`DeployerClient::request`](super::DeployerClient::request).
#[derive(Error, Debug)]
pub enum DeployerError {
    /// The configuration is missing or unusable. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller passed arguments the operation rejects before any request is sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No token could be obtained for the organization.
    ///
    /// Callers should prompt for new credentials rather than retry.
    #[error("Can't login to deployer server for organization: {organization}")]
    Authentication {
        /// Name of the organization whose login failed
        organization: String,
    },

    /// The request could not be completed at the transport level.
    #[error("Error in connection to deploy server: {method} {path}: {source}")]
    Transport {
        /// HTTP method of the failed request
        method: Method,
        /// Resource path as given by the caller
        path: String,
        /// The underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered 200 with a body that is not valid JSON.
    #[error("Malformed response from deploy server: {method} {path}: {source}")]
    Decode {
        /// HTTP method of the request
        method: Method,
        /// Resource path as given by the caller
        path: String,
        /// The JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// Encrypting or decrypting the organization password failed.
    #[error("Credential storage error: {0}")]
    Credentials(String),
}

/// Builds a [`Params`] map from a JSON object literal.
///
/// Anything other than an object yields an empty map.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Renders a parameter value the way it appears in a URL.
///
/// Strings are used verbatim; every other value uses its JSON text.
pub fn param_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Flattens parameters into query-string pairs, skipping nulls.
pub fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), param_text(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_skip_nulls_and_keep_order() {
        let params = params(json!({ "name": "ssh_option", "os": null, "targetId": 4, "all": true }));
        assert_eq!(
            query_pairs(&params),
            vec![
                ("name".to_string(), "ssh_option".to_string()),
                ("targetId".to_string(), "4".to_string()),
                ("all".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_from_non_object() {
        assert!(params(json!([1, 2])).is_empty());
    }
}
