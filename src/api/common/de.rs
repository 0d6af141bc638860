//
//  deployer-client
//  api/common/de.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Lenient deserializers for Deployer payloads.
//!
//! The API serializes numbers inconsistently (sometimes as JSON numbers, sometimes
//! as strings) and wraps nested collections in an extra keyed object whenever a
//! collection holds a single element. These helpers are used with
//! `#[serde(deserialize_with = "...")]` on the typed response structs.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::envelope::flatten_items;

fn id_from_value<E: Error>(value: Value) -> Result<u64, E> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| E::custom(format!("expected a positive integer id, found {number}"))),
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected a numeric id, found {text:?}"))),
        other => Err(E::custom(format!("expected an id, found {other}"))),
    }
}

/// Identifier given as a number or a numeric string.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    id_from_value(Value::deserialize(deserializer)?)
}

/// Optional identifier. `null` and empty strings become `None`.
pub fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        other => id_from_value(other).map(Some),
    }
}

/// Counter that falls back to zero when absent or unparsable.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Sequence given as an array, a single object, a one-key wrapper or `null`.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    flatten_items(Value::deserialize(deserializer)?)
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "id")]
        id: u64,
        #[serde(default, deserialize_with = "opt_id")]
        parent_id: Option<u64>,
        #[serde(default, deserialize_with = "count")]
        total: u64,
        #[serde(default, deserialize_with = "seq")]
        children: Vec<Child>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Child {
        name: String,
    }

    #[test]
    fn test_stringly_typed_numbers() {
        let sample: Sample =
            serde_json::from_value(json!({ "id": "12", "parent_id": "", "total": "3" })).unwrap();
        assert_eq!(sample.id, 12);
        assert_eq!(sample.parent_id, None);
        assert_eq!(sample.total, 3);
        assert!(sample.children.is_empty());
    }

    #[test]
    fn test_wrapped_single_child() {
        let sample: Sample = serde_json::from_value(json!({
            "id": 1,
            "children": { "child": { "name": "only" } }
        }))
        .unwrap();
        assert_eq!(sample.children, vec![Child { name: "only".into() }]);
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        let result: Result<Sample, _> = serde_json::from_value(json!({ "id": "abc" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_count_is_zero() {
        let sample: Sample = serde_json::from_value(json!({ "id": 1, "total": "many" })).unwrap();
        assert_eq!(sample.total, 0);
    }
}
