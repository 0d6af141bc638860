//
//  deployer-client
//  api/common/envelope.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Response Envelopes for the Deployer API
//!
//! The Deployer API wraps its payloads in a handful of ad-hoc shapes. This module
//! resolves each shape once, at the gateway boundary, so resource operations only
//! ever see typed values.
//!
//! # Shapes
//!
//! | Type | Wire shape |
//! |------|------------|
//! | [`LoginResponse`] | `{"hash": {"auth_token": "..."}}` |
//! | [`HashEnvelope`] | `{"hash": {...}}` |
//! | [`ListEnvelope::ByAction`] | `{"action": [...]}` |
//! | [`ListEnvelope::ByResourceKey`] | `{"pub-recipes": [...]}` |
//! | [`ListEnvelope::Bare`] | `[...]` |
//! | [`ListEnvelope::Empty`] | `{"nil-classes": ...}`, no body, or any other object |
//!
//! Collections holding a single element frequently arrive wrapped one level deeper
//! (`{"pub-recipes": {"pub-recipe": {...}}}`); [`flatten_items`] undoes that.
//!
//! # Example
//!
//! ```rust
//! use deployer_client::api::common::ListEnvelope;
//! use serde_json::json;
//!
//! let body = json!({ "pub-recipes": { "pub-recipe": { "id": 7 } } });
//! let envelope = ListEnvelope::resolve("pub_recipes", Some(body));
//! assert_eq!(envelope.into_items(), vec![json!({ "id": 7 })]);
//! ```
//!
//! # Notes
//!
//! - Keys may be hyphenated or underscored; [`lookup`] accepts either spelling
//! - A missing or unexpected shape is never an error here, only an empty result

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Key the API uses for an empty collection.
const NIL_KEY: &str = "nil_classes";

/// Looks up `key` in `map`, accepting hyphenated and underscored spellings.
pub fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key)
        .or_else(|| map.get(&key.replace('_', "-")))
        .or_else(|| map.get(&key.replace('-', "_")))
}

/// Removes `key` from `map`, accepting hyphenated and underscored spellings.
pub fn take(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.remove(key)
        .or_else(|| map.remove(&key.replace('_', "-")))
        .or_else(|| map.remove(&key.replace('-', "_")))
}

/// Normalizes a collection payload into a flat sequence of items.
///
/// - arrays yield their elements
/// - a mapping with exactly one entry is unwrapped and its value flattened once
/// - any other object is a single item
/// - `null` yields nothing
pub fn flatten_items(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
            Some((_, Value::Array(items))) => items,
            Some((_, Value::Null)) | None => Vec::new(),
            Some((_, item)) => vec![item],
        },
        item => vec![item],
    }
}

/// A list response, classified by where its collection was found.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEnvelope {
    /// Collection under the `action` key.
    ByAction(Value),
    /// Collection under the pluralized, hyphenated resource name.
    ByResourceKey(Value),
    /// A top-level array; the body itself is the collection.
    Bare(Value),
    /// No body, the API's explicit empty marker, or an object with no known key.
    Empty,
}

impl ListEnvelope {
    /// Classifies a decoded list response for `resource`.
    ///
    /// `action` wins over the resource key; the resource key is
    /// `<resource with '_' replaced by '-'>s`, or the hyphenated name itself for
    /// resources that are already plural (`pub_recipes`). Any other object is
    /// logged and treated as empty.
    pub fn resolve(resource: &str, body: Option<Value>) -> Self {
        let mut map = match body {
            None | Some(Value::Null) => return Self::Empty,
            Some(Value::Object(map)) => map,
            Some(Value::Array(items)) => return Self::Bare(Value::Array(items)),
            Some(_) => {
                warn!(resource, "list response is not an object or array");
                return Self::Empty;
            }
        };
        if let Some(collection) = map.remove("action") {
            return Self::ByAction(collection);
        }
        let key = resource.replace('_', "-");
        for candidate in [format!("{key}s"), key] {
            if let Some(collection) = take(&mut map, &candidate) {
                return Self::ByResourceKey(collection);
            }
        }
        if lookup(&map, NIL_KEY).is_none() {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            warn!(resource, ?keys, "unrecognized list envelope");
        }
        Self::Empty
    }

    /// Returns the items of the collection as a flat sequence.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Empty => Vec::new(),
            Self::ByAction(collection)
            | Self::ByResourceKey(collection)
            | Self::Bare(collection) => flatten_items(collection),
        }
    }
}

/// The normalized result of a list request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemList {
    /// Items in the order the API returned them.
    pub items: Vec<Value>,
}

impl ItemList {
    /// Decodes every item as `T`, dropping (and logging) items that do not fit.
    pub fn decode<T: DeserializeOwned>(self, resource: &str) -> Vec<T> {
        self.items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(resource, error = %e, "skipping malformed item");
                    None
                }
            })
            .collect()
    }

    /// Decodes the first item as `T`.
    pub fn first<T: DeserializeOwned>(self, resource: &str) -> Option<T> {
        self.items
            .into_iter()
            .next()
            .and_then(|item| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(resource, error = %e, "malformed item");
                    None
                }
            })
    }
}

/// Payload wrapped in a `hash` key, as used by single-object responses.
#[derive(Debug, Clone, Deserialize)]
pub struct HashEnvelope<T> {
    /// The wrapped payload.
    pub hash: T,
}

impl<T: DeserializeOwned> HashEnvelope<T> {
    /// Decodes `{"hash": {...}}`; any other shape yields `None`.
    pub fn from_body(body: Option<Value>) -> Option<T> {
        body.and_then(|value| serde_json::from_value::<Self>(value).ok())
            .map(|envelope| envelope.hash)
    }
}

/// Response of `GET sessions/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Session data.
    pub hash: LoginHash,
}

/// Session data carried by a [`LoginResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct LoginHash {
    /// Opaque bearer token for subsequent requests.
    #[serde(alias = "auth-token")]
    pub auth_token: String,
}

impl LoginResponse {
    /// Extracts the token; any response that is not a well-formed mapping yields `None`.
    pub fn token(body: Option<Value>) -> Option<String> {
        body.and_then(|value| serde_json::from_value::<Self>(value).ok())
            .map(|response| response.hash.auth_token)
            .filter(|token| !token.is_empty())
    }
}

/// Returns the object stored under `key` in a response body, if any.
pub fn member(body: Option<Value>, key: &str) -> Option<Value> {
    match body {
        Some(Value::Object(mut map)) => take(&mut map, key).filter(|value| !value.is_null()),
        _ => None,
    }
}
