//
//  deployer-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the Deployer REST API.
//!
//! ## Architecture
//!
//! - [`client`]: The request gateway. Builds URLs, injects the session token,
//!   dispatches the request and decodes the JSON body.
//! - [`common`]: Shared types: the error enum, request parameters, and the typed
//!   envelopes the API wraps its payloads in.
//! - [`resources`]: Organizations, projects, deploy targets, recipes and the
//!   question wizard, all built on the gateway.
//!
//! ## Wire Contract
//!
//! Every request goes to `{base_url}/api/{resource}[/{id}].json`. The session token
//! travels as the `auth_token` parameter. Reads send their parameters in the query
//! string; writes send a JSON body.
//!
//! ## Error Handling
//!
//! Operations return [`DeployerError`]:
//!
//! - `InvalidArgument`: rejected before any request was sent
//! - `Authentication`: login preconditions unmet or no token returned
//! - `Transport`: connection-level failure, wrapped with method and path
//! - `Decode`: a 200 response whose body was not JSON
//!
//! Unexpected response shapes are not errors: they are logged and normalized to
//! `None` or an empty sequence.

/// The request gateway and session token handling.
pub mod client;

/// Errors, parameters and envelope types shared by every operation.
pub mod common;

/// Resource operations built on the gateway.
pub mod resources;

pub use client::{DeployerClient, Method};
pub use common::{DeployerError, Params};
